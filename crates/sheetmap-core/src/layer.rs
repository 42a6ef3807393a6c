//! Layers — rows turned into the visual elements the map draws.
//!
//! [`PointLayer::from_rows`] builds one [`Marker`] per point row;
//! [`ShapeLayer::from_rows`] runs every geometry cell through the normalizer
//! and keeps one [`Shape`] per resulting feature. Rows that cannot be placed
//! are skipped and remembered so the UI can report them.

use crate::geometry::{self, Geometry, NormalizeError};
use crate::types::{LatLon, Row, RowError, ShapeRow};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Marker style
// ---------------------------------------------------------------------------

/// How a point row is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerKind {
    /// Icon glyph tinted with the row colour.
    #[default]
    Marker,
    /// Circle with a radius in screen pixels.
    CircleMarker,
    /// Circle with a radius in metres.
    Circle,
}

impl MarkerKind {
    /// Parse the configured marker kind. Case-sensitive; unknown values fall
    /// back to [`MarkerKind::Marker`].
    pub fn parse(s: &str) -> Self {
        match s {
            "marker" => MarkerKind::Marker,
            "circleMarker" => MarkerKind::CircleMarker,
            "circle" => MarkerKind::Circle,
            other => {
                tracing::warn!(kind = other, "unknown marker kind, using `marker`");
                MarkerKind::Marker
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MarkerKind::Marker => "marker",
            MarkerKind::CircleMarker => "circleMarker",
            MarkerKind::Circle => "circle",
        }
    }

    /// Circle kinds draw an outline in the row colour and no icon glyph.
    pub fn is_circle(self) -> bool {
        matches!(self, MarkerKind::CircleMarker | MarkerKind::Circle)
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker colour tokens understood in the `color` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerColor {
    Red,
    DarkRed,
    LightRed,
    Orange,
    Beige,
    Green,
    DarkGreen,
    LightGreen,
    Blue,
    DarkBlue,
    LightBlue,
    CadetBlue,
    Purple,
    DarkPurple,
    Pink,
    White,
    Gray,
    LightGray,
    Black,
}

impl MarkerColor {
    /// Parse a colour token. Surrounding whitespace and case are ignored;
    /// unknown tokens return `None` and the default marker style is used.
    pub fn parse(token: &str) -> Option<Self> {
        Some(match token.trim().to_ascii_lowercase().as_str() {
            "red" => MarkerColor::Red,
            "darkred" => MarkerColor::DarkRed,
            "lightred" => MarkerColor::LightRed,
            "orange" => MarkerColor::Orange,
            "beige" => MarkerColor::Beige,
            "green" => MarkerColor::Green,
            "darkgreen" => MarkerColor::DarkGreen,
            "lightgreen" => MarkerColor::LightGreen,
            "blue" => MarkerColor::Blue,
            "darkblue" => MarkerColor::DarkBlue,
            "lightblue" => MarkerColor::LightBlue,
            "cadetblue" => MarkerColor::CadetBlue,
            "purple" => MarkerColor::Purple,
            "darkpurple" => MarkerColor::DarkPurple,
            "pink" => MarkerColor::Pink,
            "white" => MarkerColor::White,
            "gray" | "grey" => MarkerColor::Gray,
            "lightgray" | "lightgrey" => MarkerColor::LightGray,
            "black" => MarkerColor::Black,
            _ => return None,
        })
    }

    /// Approximate RGB of the marker body.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            MarkerColor::Red => (0xd6, 0x3e, 0x2a),
            MarkerColor::DarkRed => (0xa2, 0x33, 0x36),
            MarkerColor::LightRed => (0xff, 0x8e, 0x7f),
            MarkerColor::Orange => (0xf6, 0x97, 0x30),
            MarkerColor::Beige => (0xff, 0xcb, 0x92),
            MarkerColor::Green => (0x72, 0xb0, 0x26),
            MarkerColor::DarkGreen => (0x72, 0x82, 0x24),
            MarkerColor::LightGreen => (0xbb, 0xf9, 0x70),
            MarkerColor::Blue => (0x38, 0xaa, 0xdd),
            MarkerColor::DarkBlue => (0x00, 0x67, 0xa3),
            MarkerColor::LightBlue => (0x8a, 0xda, 0xff),
            MarkerColor::CadetBlue => (0x43, 0x69, 0x78),
            MarkerColor::Purple => (0xd2, 0x52, 0xb9),
            MarkerColor::DarkPurple => (0x5b, 0x39, 0x6b),
            MarkerColor::Pink => (0xff, 0x91, 0xea),
            MarkerColor::White => (0xfb, 0xfb, 0xfb),
            MarkerColor::Gray => (0x57, 0x57, 0x57),
            MarkerColor::LightGray => (0xa3, 0xa3, 0xa3),
            MarkerColor::Black => (0x30, 0x30, 0x30),
        }
    }
}

/// Resolved style of one marker. `color == None` means the default style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub color: Option<MarkerColor>,
    pub icon: char,
}

impl MarkerStyle {
    pub const DEFAULT_ICON: char = '◉';

    pub fn from_token(token: &str) -> Self {
        let color = MarkerColor::parse(token);
        if color.is_none() && !token.trim().is_empty() {
            tracing::debug!(token, "unknown colour token, using default marker style");
        }
        Self { color, icon: Self::DEFAULT_ICON }
    }
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

/// A point visual built from one sheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub description: String,
    pub position: LatLon,
    /// The row's colour cell as published, recognised or not.
    pub color: String,
    pub style: MarkerStyle,
}

/// All markers built from one load of the points sheet.
#[derive(Debug, Clone, Default)]
pub struct PointLayer {
    pub markers: Vec<Marker>,
    /// `(row index, reason)` for rows left off the map.
    pub skipped: Vec<(usize, RowError)>,
}

impl PointLayer {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut layer = PointLayer::default();
        for (idx, row) in rows.iter().enumerate() {
            match row.position() {
                Ok(position) => layer.markers.push(Marker {
                    name: row.name.clone(),
                    description: row.description.clone(),
                    position,
                    color: row.color.clone(),
                    style: MarkerStyle::from_token(&row.color),
                }),
                Err(err) => {
                    tracing::warn!(row = idx, name = %row.name, error = %err, "skipping row");
                    layer.skipped.push((idx, err));
                }
            }
        }
        tracing::debug!(
            markers = layer.markers.len(),
            skipped = layer.skipped.len(),
            "point layer built"
        );
        layer
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// One drawable feature from the shapes sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub description: String,
    pub color: Option<MarkerColor>,
    pub geometry: Geometry,
    /// The normalized feature, with the row's columns merged into its
    /// properties.
    pub feature: Value,
}

/// Why a shapes row (or one of its features) was left off the map.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("feature {0} has no drawable geometry")]
    Undrawable(usize),
}

#[derive(Debug, Clone, Default)]
pub struct ShapeLayer {
    pub shapes: Vec<Shape>,
    pub skipped: Vec<(usize, ShapeError)>,
}

impl ShapeLayer {
    pub fn from_rows(rows: &[ShapeRow]) -> Self {
        let mut layer = ShapeLayer::default();
        for (idx, row) in rows.iter().enumerate() {
            let features = match geometry::normalize_str(&row.geometry) {
                Ok(features) => features,
                Err(err) => {
                    tracing::warn!(row = idx, name = %row.name, error = %err, "skipping shape row");
                    layer.skipped.push((idx, err.into()));
                    continue;
                }
            };
            for (n, feature) in features.into_iter().enumerate() {
                match shape_from_feature(row, feature) {
                    Some(shape) => layer.shapes.push(shape),
                    None => {
                        tracing::warn!(row = idx, feature = n, "feature has no drawable geometry");
                        layer.skipped.push((idx, ShapeError::Undrawable(n)));
                    }
                }
            }
        }
        layer
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Merge the row's descriptive columns into the feature's properties (keys
/// already present on the feature win) and resolve its typed geometry.
fn shape_from_feature(row: &ShapeRow, mut feature: Value) -> Option<Shape> {
    let geometry = Geometry::from_value(feature.get("geometry")?)?;

    let obj = feature.as_object_mut()?;
    let props = obj
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    if !props.is_object() {
        *props = Value::Object(Map::new());
    }
    let props = props.as_object_mut()?;
    let cells = [
        ("name", &row.name),
        ("description", &row.description),
        ("color", &row.color),
    ];
    for (key, value) in cells {
        props
            .entry(key)
            .or_insert_with(|| Value::String(value.clone()));
    }

    let text = |key: &str| props.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
    let name = text("name");
    let description = text("description");
    let color = MarkerColor::parse(&text("color"));

    Some(Shape { name, description, color, geometry, feature })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn shape_row(geometry: &str) -> ShapeRow {
        ShapeRow {
            name: "Walls".into(),
            description: "Old town walls".into(),
            color: "darkred".into(),
            geometry: geometry.into(),
        }
    }

    #[test]
    fn unknown_marker_kind_falls_back() {
        assert_eq!(MarkerKind::parse("circleMarker"), MarkerKind::CircleMarker);
        assert_eq!(MarkerKind::parse("circlemarker"), MarkerKind::Marker);
        assert_eq!(MarkerKind::parse(""), MarkerKind::Marker);
    }

    #[test]
    fn unknown_colour_uses_default_style() {
        assert_eq!(MarkerStyle::from_token(" DarkGreen ").color, Some(MarkerColor::DarkGreen));
        assert_eq!(MarkerStyle::from_token("chartreuse").color, None);
    }

    #[test]
    fn one_marker_per_valid_row() {
        let mut bad = Row::new("B", "", "blue", 0.0, 0.0);
        bad.lat = "n/a".into();
        let layer = PointLayer::from_rows(&[Row::new("A", "d1", "red", 43.9, 12.9), bad]);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.markers[0].position, LatLon::new(43.9, 12.9));
        assert_eq!(layer.markers[0].style.color, Some(MarkerColor::Red));
        assert_eq!(layer.skipped.len(), 1);
        assert_eq!(layer.skipped[0].0, 1);
    }

    #[test]
    fn bare_coordinates_become_a_shape_with_row_properties() {
        let layer = ShapeLayer::from_rows(&[shape_row("[[12.9, 43.9], [12.95, 43.95]]")]);
        assert_eq!(layer.len(), 1);
        let shape = &layer.shapes[0];
        assert_eq!(shape.name, "Walls");
        assert_eq!(shape.color, Some(MarkerColor::DarkRed));
        assert!(matches!(shape.geometry, Geometry::LineString { .. }));
        assert_eq!(shape.feature["properties"]["description"], "Old town walls");
    }

    #[test]
    fn feature_properties_win_over_row_columns() {
        let cell = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "North gate"},
                 "geometry": {"type": "Point", "coordinates": [12.9, 43.9]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "Point", "coordinates": [12.8, 43.8]}}
            ]
        })
        .to_string();
        let layer = ShapeLayer::from_rows(&[shape_row(&cell)]);
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.shapes[0].name, "North gate");
        assert_eq!(layer.shapes[0].description, "Old town walls");
        assert_eq!(layer.shapes[1].name, "Walls");
    }

    #[test]
    fn bad_cells_are_skipped_not_fatal() {
        let layer = ShapeLayer::from_rows(&[
            shape_row("not json"),
            shape_row(r#"{"type": "Feature", "geometry": null}"#),
            shape_row("[1, 2]"),
        ]);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.skipped.len(), 2);
        assert!(matches!(layer.skipped[0].1, ShapeError::Normalize(NormalizeError::Syntax(_))));
        assert_eq!(layer.skipped[1], (1, ShapeError::Undrawable(0)));
    }
}
