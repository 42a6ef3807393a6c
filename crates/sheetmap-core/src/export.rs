//! Export — the loaded layers as one GeoJSON `FeatureCollection`.
//!
//! Used by headless mode. Points come first, in row order, followed by the
//! shape features in the order the normalizer produced them.

use crate::geometry::{self, Geometry, FEATURE_COLLECTION};
use crate::layer::{PointLayer, ShapeLayer};
use serde_json::{json, Map, Value};

pub fn feature_collection(points: &PointLayer, shapes: &ShapeLayer) -> Value {
    let mut features: Vec<Value> = points
        .markers
        .iter()
        .map(|m| {
            let mut props = Map::new();
            props.insert("name".into(), m.name.clone().into());
            props.insert("description".into(), m.description.clone().into());
            if !m.color.trim().is_empty() {
                props.insert("color".into(), m.color.clone().into());
            }
            geometry::feature(&Geometry::point(m.position.lon, m.position.lat), props)
        })
        .collect();
    features.extend(shapes.shapes.iter().map(|s| s.feature.clone()));

    json!({
        "type": FEATURE_COLLECTION,
        "features": features,
    })
}
