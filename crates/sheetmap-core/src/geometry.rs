//! Geometry normalizer — turns loosely wrapped GeoJSON into a list of features.
//!
//! Sheets carry geometry in whatever shape the author pasted: a whole
//! `FeatureCollection`, a single `Feature`, a bare geometry object, or just a
//! coordinate array. [`normalize`] accepts all four and always yields a
//! non-empty, ordered list of features.
//!
//! # Classification order
//!
//! | Input | Output |
//! |-------|--------|
//! | `{"type":"FeatureCollection","features":[..]}` | the `features` list, borrowed |
//! | `{"type":"Feature",..}` | `[input]`, borrowed |
//! | any other object with a `type` key | `[{"type":"Feature","geometry":input}]` |
//! | bare array | geometry type guessed by [`sniff_depth`] |
//!
//! Inputs the normalizer produces itself use the typed [`Geometry`] union
//! instead; only untyped sheet cells go through the depth-sniffing shim.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::borrow::Cow;

pub const FEATURE_COLLECTION: &str = "FeatureCollection";
pub const FEATURE: &str = "Feature";

/// Why a raw value could not be normalized at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    /// Null, a scalar, or an object without a `type` tag.
    #[error("invalid geometry input: {0}")]
    InvalidInput(&'static str),
    /// A `FeatureCollection` whose `features` member is missing or empty.
    #[error("feature collection has no features")]
    EmptyCollection,
    /// Text in a sheet cell that is not JSON.
    #[error("geometry cell is not JSON: {0}")]
    Syntax(String),
}

/// Normalize any GeoJSON-ish value into an ordered list of features.
///
/// Pass-through cases borrow from `input`; synthesized features are owned.
/// The input is never modified.
pub fn normalize(input: &Value) -> Result<Vec<Cow<'_, Value>>, NormalizeError> {
    match input {
        Value::Null => Err(NormalizeError::InvalidInput("geometry is null")),
        Value::Object(obj) => match obj.get("type") {
            Some(tag) if tag == FEATURE_COLLECTION => {
                let features = obj
                    .get("features")
                    .and_then(Value::as_array)
                    .filter(|f| !f.is_empty())
                    .ok_or(NormalizeError::EmptyCollection)?;
                Ok(features.iter().map(Cow::Borrowed).collect())
            }
            Some(tag) if tag == FEATURE => Ok(vec![Cow::Borrowed(input)]),
            Some(_) => Ok(vec![Cow::Owned(json!({
                "type": FEATURE,
                "geometry": input,
            }))]),
            None => Err(NormalizeError::InvalidInput("object has no `type` tag")),
        },
        Value::Array(_) => {
            let kind = sniff_depth(input);
            tracing::debug!(kind = %kind, "guessed geometry type from coordinate depth");
            Ok(vec![Cow::Owned(json!({
                "type": FEATURE,
                "geometry": { "type": kind.as_str(), "coordinates": input },
            }))])
        }
        _ => Err(NormalizeError::InvalidInput("expected an object or an array")),
    }
}

/// Parse a sheet cell as JSON and normalize it into owned features.
pub fn normalize_str(cell: &str) -> Result<Vec<Value>, NormalizeError> {
    let value: Value =
        serde_json::from_str(cell.trim()).map_err(|e| NormalizeError::Syntax(e.to_string()))?;
    Ok(normalize(&value)?.into_iter().map(Cow::into_owned).collect())
}

// ---------------------------------------------------------------------------
// Depth sniffing (compatibility shim)
// ---------------------------------------------------------------------------

/// Geometry types the depth sniffer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessedKind {
    Point,
    LineString,
    Polygon,
    MultiPolygon,
}

impl GuessedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GuessedKind::Point => "Point",
            GuessedKind::LineString => "LineString",
            GuessedKind::Polygon => "Polygon",
            GuessedKind::MultiPolygon => "MultiPolygon",
        }
    }
}

impl std::fmt::Display for GuessedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guess a geometry type from how deep the first-element chain nests before
/// reaching a number.
///
/// Lossy by construction: a one-ring `Polygon` and a `MultiLineString` share
/// the same depth, and anything that never reaches a number within three
/// levels (including `[]`) is reported as `MultiPolygon`.
pub fn sniff_depth(coords: &Value) -> GuessedKind {
    let mut level = Some(coords);
    for kind in [GuessedKind::Point, GuessedKind::LineString, GuessedKind::Polygon] {
        level = level.and_then(Value::as_array).and_then(|a| a.first());
        if level.is_some_and(Value::is_number) {
            return kind;
        }
    }
    GuessedKind::MultiPolygon
}

// ---------------------------------------------------------------------------
// Typed geometry
// ---------------------------------------------------------------------------

/// A position as `[lon, lat]` (extra ordinates such as altitude are dropped).
pub type Position = [f64; 2];

/// Tagged geometry union used wherever sheetmap produces geometry itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        #[serde(deserialize_with = "de_position")]
        coordinates: Position,
    },
    MultiPoint {
        #[serde(deserialize_with = "de_positions")]
        coordinates: Vec<Position>,
    },
    LineString {
        #[serde(deserialize_with = "de_positions")]
        coordinates: Vec<Position>,
    },
    MultiLineString {
        #[serde(deserialize_with = "de_rings")]
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        #[serde(deserialize_with = "de_rings")]
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        #[serde(deserialize_with = "de_polygons")]
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point { coordinates: [lon, lat] }
    }

    /// Interpret a geometry JSON value. Returns `None` for unknown types or
    /// coordinates that do not match the declared type.
    pub fn from_value(value: &Value) -> Option<Self> {
        Geometry::deserialize(value).ok()
    }

    /// Every line segment chain that makes up this geometry, for drawing.
    /// Polygons contribute their rings; points contribute nothing.
    pub fn paths(&self) -> Vec<&[Position]> {
        match self {
            Geometry::Point { .. } | Geometry::MultiPoint { .. } => Vec::new(),
            Geometry::LineString { coordinates } => vec![coordinates.as_slice()],
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().map(Vec::as_slice).collect()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flat_map(|poly| poly.iter().map(Vec::as_slice))
                .collect(),
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().flat_map(Geometry::paths).collect()
            }
        }
    }

    /// Standalone vertices (points and multipoints), for drawing.
    pub fn vertices(&self) -> Vec<Position> {
        match self {
            Geometry::Point { coordinates } => vec![*coordinates],
            Geometry::MultiPoint { coordinates } => coordinates.clone(),
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().flat_map(Geometry::vertices).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for empty geometry.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut all: Vec<Position> = self.vertices();
        all.extend(self.paths().into_iter().flatten().copied());
        let (first, rest) = all.split_first()?;
        Some(rest.iter().fold((*first, *first), |(min, max), p| {
            (
                [min[0].min(p[0]), min[1].min(p[1])],
                [max[0].max(p[0]), max[1].max(p[1])],
            )
        }))
    }
}

fn to_position<E: serde::de::Error>(raw: Vec<f64>) -> Result<Position, E> {
    match raw.as_slice() {
        [x, y, ..] => Ok([*x, *y]),
        _ => Err(E::custom("position needs at least two ordinates")),
    }
}

fn de_position<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Position, D::Error> {
    to_position(Vec::<f64>::deserialize(d)?)
}

fn de_positions<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Vec<Position>, D::Error> {
    Vec::<Vec<f64>>::deserialize(d)?
        .into_iter()
        .map(to_position)
        .collect()
}

fn de_rings<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Vec<Vec<Position>>, D::Error> {
    Vec::<Vec<Vec<f64>>>::deserialize(d)?
        .into_iter()
        .map(|ring| ring.into_iter().map(to_position).collect())
        .collect()
}

fn de_polygons<'de, D: serde::Deserializer<'de>>(
    d: D,
) -> Result<Vec<Vec<Vec<Position>>>, D::Error> {
    Vec::<Vec<Vec<Vec<f64>>>>::deserialize(d)?
        .into_iter()
        .map(|poly| {
            poly.into_iter()
                .map(|ring| ring.into_iter().map(to_position).collect())
                .collect()
        })
        .collect()
}

/// Build a feature value around a typed geometry and a property map.
pub fn feature(geometry: &Geometry, properties: Map<String, Value>) -> Value {
    json!({
        "type": FEATURE,
        "geometry": geometry,
        "properties": properties,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn geometry_type<'a>(features: &'a [Cow<'a, Value>]) -> &'a str {
        features[0]["geometry"]["type"].as_str().unwrap()
    }

    #[test]
    fn collection_is_passed_through() {
        let input = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 2]}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [3, 4]}}
            ]
        });
        let out = normalize(&input).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|f| matches!(f, Cow::Borrowed(_))));
        assert_eq!(*out[1], input["features"][1]);
    }

    #[test]
    fn feature_is_wrapped_in_a_single_element_list() {
        let input = json!({"type": "Feature", "properties": {"name": "x"}, "geometry": null});
        let out = normalize(&input).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(*out[0], input);
    }

    #[test]
    fn bare_geometry_gets_a_synthetic_feature() {
        let input = json!({"type": "LineString", "coordinates": [[1, 2], [3, 4]]});
        let out = normalize(&input).unwrap();
        assert_eq!(*out[0], json!({"type": "Feature", "geometry": input}));
        assert!(out[0].get("properties").is_none());
    }

    #[test]
    fn unknown_type_tag_is_still_treated_as_geometry() {
        let input = json!({"type": 7});
        let out = normalize(&input).unwrap();
        assert_eq!(out[0]["geometry"], input);
    }

    #[rstest]
    #[case::point(json!([1, 2]), "Point")]
    #[case::line(json!([[1, 2], [3, 4]]), "LineString")]
    #[case::polygon(json!([[[1, 2], [3, 4], [1, 2]]]), "Polygon")]
    #[case::multipolygon(json!([[[[1, 2], [3, 4], [1, 2]]]]), "MultiPolygon")]
    #[case::empty(json!([]), "MultiPolygon")]
    #[case::strings(json!(["a", "b"]), "MultiPolygon")]
    fn bare_coordinates_are_sniffed(#[case] input: Value, #[case] expected: &str) {
        let out = normalize(&input).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(geometry_type(&out), expected);
        assert_eq!(out[0]["geometry"]["coordinates"], input);
    }

    #[rstest]
    #[case::null(json!(null))]
    #[case::number(json!(3))]
    #[case::string(json!("Point"))]
    #[case::untagged_object(json!({"coordinates": [1, 2]}))]
    fn invalid_inputs_are_rejected(#[case] input: Value) {
        assert!(matches!(normalize(&input), Err(NormalizeError::InvalidInput(_))));
    }

    #[test]
    fn empty_collection_is_an_error() {
        let input = json!({"type": "FeatureCollection", "features": []});
        assert_eq!(normalize(&input), Err(NormalizeError::EmptyCollection));
    }

    #[test]
    fn normalize_str_reports_bad_json() {
        assert!(matches!(normalize_str("[1, 2"), Err(NormalizeError::Syntax(_))));
        assert_eq!(normalize_str(" [1, 2] ").unwrap()[0]["geometry"]["type"], "Point");
    }

    #[test]
    fn typed_geometry_reads_polygons_and_drops_altitude() {
        let g = Geometry::from_value(&json!({
            "type": "Polygon",
            "coordinates": [[[0, 0, 5], [2, 0], [2, 1], [0, 0]]]
        }))
        .unwrap();
        assert_eq!(g.paths().len(), 1);
        assert_eq!(g.paths()[0][0], [0.0, 0.0]);
        assert_eq!(g.bounds(), Some(([0.0, 0.0], [2.0, 1.0])));
    }

    #[test]
    fn typed_geometry_rejects_mismatched_coordinates() {
        assert!(Geometry::from_value(&json!({"type": "Point", "coordinates": [[1, 2]]})).is_none());
        assert!(Geometry::from_value(&json!({"type": "Blob", "coordinates": [1, 2]})).is_none());
    }

    #[test]
    fn typed_geometry_serializes_as_geojson() {
        assert_eq!(
            serde_json::to_value(Geometry::point(12.9, 43.9)).unwrap(),
            json!({"type": "Point", "coordinates": [12.9, 43.9]})
        );
    }
}
