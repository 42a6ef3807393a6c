//! Sheet text piped on stdin (`curl … | sheetmap --stdin`). Read once, to EOF.

use crate::FeedError;
use tokio::io::AsyncReadExt;

pub async fn read() -> Result<String, FeedError> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    tracing::debug!(bytes = text.len(), "sheet read from stdin");
    Ok(text)
}
