//! Core types for sheetmap-core.
//!
//! This module defines the records read from a published sheet: the point
//! [`Row`], the [`ShapeRow`] carrying a JSON geometry cell, and the
//! [`LatLon`] position a row resolves to.

use serde::{Deserialize, Deserializer, Serialize};

/// One record from the points sheet.
///
/// Column names are consumed verbatim (case-sensitive). Coordinates are kept
/// as the text the sheet published; [`Row::position`] parses them on demand
/// so a bad cell only affects the row it belongs to.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Row {
    #[serde(default)]
    pub name: String,
    /// Free text shown in the side panel. May contain HTML-ish markup.
    #[serde(default)]
    pub description: String,
    /// Marker colour token (`red`, `darkgreen`, …). Unknown tokens fall back
    /// to the default marker style.
    #[serde(default)]
    pub color: String,
    #[serde(deserialize_with = "text_or_number")]
    pub lat: String,
    #[serde(deserialize_with = "text_or_number")]
    pub lon: String,
}

impl Row {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            color: color.into(),
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    /// Parse the row's `lat`/`lon` cells into a position.
    pub fn position(&self) -> Result<LatLon, RowError> {
        let lat = parse_coordinate("lat", &self.lat)?;
        let lon = parse_coordinate("lon", &self.lon)?;
        Ok(LatLon { lat, lon })
    }
}

/// One record from the shapes sheet: the usual descriptive columns plus a
/// `geometry` cell holding GeoJSON-ish text (a collection, a feature, a bare
/// geometry or just a coordinate array).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ShapeRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    pub geometry: String,
}

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// A row whose coordinates cannot be placed on the map.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("column `{column}` is not a number: {value:?}")]
    NotANumber { column: &'static str, value: String },
    #[error("column `{column}` is out of range: {value}")]
    OutOfRange { column: &'static str, value: f64 },
}

fn parse_coordinate(column: &'static str, raw: &str) -> Result<f64, RowError> {
    let value: f64 = raw.trim().parse().map_err(|_| RowError::NotANumber {
        column,
        value: raw.to_string(),
    })?;
    let limit = if column == "lat" { 90.0 } else { 180.0 };
    if !value.is_finite() || value.abs() > limit {
        return Err(RowError::OutOfRange { column, value });
    }
    Ok(value)
}

/// Accept a coordinate cell published either as text or as a JSON number.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Number(f64),
        Text(String),
    }

    Ok(match Cell::deserialize(deserializer)? {
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) => s,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
