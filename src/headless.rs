//! Headless mode — load the sheets once and print them as GeoJSON.

use anyhow::Context;
use serde_json::Value;
use sheetmap_core::export;
use sheetmap_core::layer::{PointLayer, ShapeLayer};
use sheetmap_feeds::{loader, Source};

/// Load both sheets and build one `FeatureCollection` of points then shapes.
///
/// Any load failure is an error; rows that cannot be placed are skipped, as
/// in the interactive map.
pub async fn collect(points: &Source, shapes: Option<&Source>) -> anyhow::Result<Value> {
    let rows = loader::load_points(points)
        .await
        .with_context(|| format!("loading points from {points}"))?;
    let points = PointLayer::from_rows(&rows);

    let shapes = match shapes {
        Some(source) => {
            let rows = loader::load_shapes(source)
                .await
                .with_context(|| format!("loading shapes from {source}"))?;
            ShapeLayer::from_rows(&rows)
        }
        None => ShapeLayer::default(),
    };

    Ok(export::feature_collection(&points, &shapes))
}
