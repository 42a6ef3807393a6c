//! Loader — fetch-and-parse on a background task, results over a channel.
//!
//! The UI thread owns the receiving end and drains it between frames, so all
//! layer construction happens on the UI thread. Every load ends in exactly one
//! [`LoadEvent`]; a failed load leaves the previous layer untouched.

use crate::{file, table, FeedError, Source};
use chrono::{DateTime, Utc};
use sheetmap_core::{Row, ShapeRow};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Which sheet a load was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Points,
    Shapes,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Points => write!(f, "points"),
            Layer::Shapes => write!(f, "shapes"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum LoadEvent {
    Points {
        rows: Vec<Row>,
        loaded_at: DateTime<Utc>,
    },
    Shapes {
        rows: Vec<ShapeRow>,
        loaded_at: DateTime<Utc>,
    },
    Failed {
        layer: Layer,
        source: String,
        error: String,
    },
}

pub async fn load_points(source: &Source) -> Result<Vec<Row>, FeedError> {
    table::parse_rows(&source.fetch().await?)
}

pub async fn load_shapes(source: &Source) -> Result<Vec<ShapeRow>, FeedError> {
    table::parse_shape_rows(&source.fetch().await?)
}

/// Spawns loads for the configured sheets and reports on one channel.
#[derive(Debug, Clone)]
pub struct Loader {
    points: Source,
    shapes: Option<Source>,
    tx: mpsc::UnboundedSender<LoadEvent>,
}

impl Loader {
    pub fn new(
        points: Source,
        shapes: Option<Source>,
    ) -> (Self, mpsc::UnboundedReceiver<LoadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { points, shapes, tx }, rx)
    }

    pub fn points_source(&self) -> &Source {
        &self.points
    }

    pub fn has_shapes(&self) -> bool {
        self.shapes.is_some()
    }

    /// Start the initial load of every configured sheet.
    pub fn spawn_all(&self, rt: &Handle) {
        self.spawn(rt, Layer::Points);
        if self.shapes.is_some() {
            self.spawn(rt, Layer::Shapes);
        }
    }

    /// Re-load every configured sheet. Stdin can only be read once, so stdin
    /// sources are left alone.
    pub fn reload(&self, rt: &Handle) {
        if self.points != Source::Stdin {
            self.spawn(rt, Layer::Points);
        }
        if matches!(&self.shapes, Some(s) if *s != Source::Stdin) {
            self.spawn(rt, Layer::Shapes);
        }
    }

    /// Start one load on the runtime behind `rt`.
    pub fn spawn(&self, rt: &Handle, layer: Layer) {
        let source = match layer {
            Layer::Points => self.points.clone(),
            Layer::Shapes => match &self.shapes {
                Some(s) => s.clone(),
                None => return,
            },
        };
        let tx = self.tx.clone();
        rt.spawn(async move {
            let event = run_load(layer, &source).await;
            if tx.send(event).is_err() {
                tracing::debug!(%layer, "load finished after the UI went away");
            }
        });
    }

    /// Reload the points layer whenever the points file changes. Returns
    /// `None` when the points source is not a file. Keep the returned
    /// watcher alive for as long as reloads are wanted.
    pub fn spawn_watch(
        &self,
        rt: &Handle,
    ) -> Result<Option<notify::RecommendedWatcher>, FeedError> {
        let Source::File(path) = &self.points else {
            return Ok(None);
        };
        let (watcher, mut changes) = file::watch(path)?;
        let loader = self.clone();
        let handle = rt.clone();
        rt.spawn(async move {
            while changes.recv().await.is_some() {
                tracing::info!(source = %loader.points, "sheet file changed, reloading");
                loader.spawn(&handle, Layer::Points);
            }
        });
        Ok(Some(watcher))
    }
}

async fn run_load(layer: Layer, source: &Source) -> LoadEvent {
    let result = match layer {
        Layer::Points => load_points(source).await.map(|rows| LoadEvent::Points {
            rows,
            loaded_at: Utc::now(),
        }),
        Layer::Shapes => load_shapes(source).await.map(|rows| LoadEvent::Shapes {
            rows,
            loaded_at: Utc::now(),
        }),
    };
    match result {
        Ok(event) => {
            tracing::info!(%layer, %source, "sheet loaded");
            event
        }
        Err(err) => {
            tracing::warn!(%layer, %source, error = %err, "sheet load failed");
            LoadEvent::Failed {
                layer,
                source: source.to_string(),
                error: err.to_string(),
            }
        }
    }
}
