//! Fake "published spreadsheet" server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Every sheet registered with [`FakeSheetServer::publish`] is
//! served as `text/csv` at `/sheets/{name}.csv`; unknown names answer 404 and
//! [`FakeSheetServer::break_sheet`] makes a sheet answer 500.
//!
//! # Example
//!
//! ```rust,ignore
//! let server = FakeSheetServer::start().await.unwrap();
//! server.publish("points", SHEET_ONE_POINT).await;
//! let url = server.url("points");
//! ```

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct Sheets {
    published: HashMap<String, String>,
    broken: Vec<String>,
    hits: usize,
}

/// Handle to the running fake sheet server.
pub struct FakeSheetServer {
    addr: SocketAddr,
    sheets: Arc<Mutex<Sheets>>,
}

impl FakeSheetServer {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let sheets = Arc::new(Mutex::new(Sheets::default()));

        let app = Router::new()
            .route("/sheets/{file}", get(serve_sheet))
            .with_state(sheets.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, sheets })
    }

    /// URL of sheet `name` (e.g. `http://127.0.0.1:PORT/sheets/points.csv`).
    pub fn url(&self, name: &str) -> String {
        format!("http://{}/sheets/{name}.csv", self.addr)
    }

    /// Serve `csv` as sheet `name`, replacing any previous content.
    pub async fn publish(&self, name: &str, csv: &str) {
        self.sheets
            .lock()
            .await
            .published
            .insert(name.to_string(), csv.to_string());
    }

    /// Make sheet `name` answer 500.
    pub async fn break_sheet(&self, name: &str) {
        self.sheets.lock().await.broken.push(name.to_string());
    }

    /// Number of sheet requests served so far.
    pub async fn hits(&self) -> usize {
        self.sheets.lock().await.hits
    }
}

async fn serve_sheet(
    State(sheets): State<Arc<Mutex<Sheets>>>,
    Path(file): Path<String>,
) -> Response {
    let mut sheets = sheets.lock().await;
    sheets.hits += 1;
    let name = file.trim_end_matches(".csv");
    if sheets.broken.iter().any(|b| b == name) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    match sheets.published.get(name) {
        Some(csv) => {
            ([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
