//! Published-sheet download over HTTP(S).
//!
//! One GET per load, following redirects (published Google Sheets links
//! redirect to a googleusercontent host). No retries.

use crate::FeedError;
use std::sync::LazyLock;

static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("sheetmap/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
});

/// Download the CSV text behind `url`. Non-2xx answers are errors.
pub async fn fetch(url: &str) -> Result<String, FeedError> {
    tracing::debug!(url, "fetching sheet");
    let response = CLIENT.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let text = response.text().await?;
    tracing::debug!(url, bytes = text.len(), "sheet downloaded");
    Ok(text)
}
