//! sheetmap-feeds — spreadsheet source adapters for sheetmap.
//!
//! Each adapter fetches the raw CSV text of one sheet ([`Source`]), the
//! [`table`] module turns it into typed rows, and the [`loader`] runs the
//! whole thing on a tokio task and reports back over a channel.

pub mod file;
pub mod http;
pub mod loader;
pub mod stdin;
pub mod table;

pub use loader::{Layer, LoadEvent, Loader};

use std::path::PathBuf;

/// Where one sheet's CSV text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A published ("shareable link") sheet URL.
    Url(String),
    File(PathBuf),
    Stdin,
}

impl Source {
    /// Read the full CSV text of the sheet.
    pub async fn fetch(&self) -> Result<String, FeedError> {
        match self {
            Source::Url(url) => http::fetch(url).await,
            Source::File(path) => file::read(path).await,
            Source::Stdin => stdin::read().await,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Stdin => f.write_str("stdin"),
        }
    }
}

/// Anything that can go wrong between a source and a list of rows.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("watch failed: {0}")]
    Watch(#[from] notify::Error),
}
