//! Local CSV files, optionally watched for changes.
//!
//! [`watch`] uses `notify` to report every write to the file; the loader
//! re-reads and re-parses the sheet on each one, replacing the layer.

use crate::FeedError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

pub async fn read(path: &Path) -> Result<String, FeedError> {
    tracing::debug!(path = %path.display(), "reading sheet file");
    Ok(tokio::fs::read_to_string(path).await?)
}

/// Watch `path` and send `()` whenever its content may have changed.
///
/// The parent directory is watched rather than the file itself so editors
/// that replace the file (write-to-temp + rename) keep triggering reloads.
/// Dropping the returned watcher stops the notifications.
pub fn watch(path: &Path) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<()>), FeedError> {
    let (tx, rx) = mpsc::unbounded_channel();
    let target: PathBuf = std::path::absolute(path)?;
    let dir = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if touches(&event, &target) => {
            let _ = tx.send(());
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(error = %err, "file watch error"),
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    tracing::debug!(dir = %dir.display(), "watching sheet file");
    Ok((watcher, rx))
}

fn touches(event: &Event, target: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_)
    ) && event.paths.iter().any(|p| p == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn read_returns_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,description,color,lat,lon").unwrap();
        let text = read(file.path()).await.unwrap();
        assert!(text.starts_with("name,"));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = read(Path::new("/definitely/not/here.csv")).await.unwrap_err();
        assert!(matches!(err, FeedError::Io(_)));
    }

    #[test]
    fn only_events_on_the_target_count() {
        let target = Path::new("/tmp/sheet.csv");
        let hit = Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(target.to_path_buf());
        let other = Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/other.csv"));
        let removed = Event::new(EventKind::Remove(notify::event::RemoveKind::Any))
            .add_path(target.to_path_buf());
        assert!(touches(&hit, target));
        assert!(!touches(&other, target));
        assert!(!touches(&removed, target));
    }
}
