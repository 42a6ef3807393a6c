//! Test builders — ergonomic constructors for rows and sheets.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use sheetmap_core::{Row, ShapeRow};

// ---------------------------------------------------------------------------
// RowBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Row`] fixtures.
///
/// ```rust,ignore
/// let row = RowBuilder::new("A").at(43.9, 12.9).color("red").build();
/// ```
pub struct RowBuilder {
    row: Row,
}

impl RowBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            row: Row {
                name: name.into(),
                description: String::new(),
                color: String::new(),
                lat: "0".to_string(),
                lon: "0".to_string(),
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.row.description = description.into();
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.row.color = color.into();
        self
    }

    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.row.lat = lat.to_string();
        self.row.lon = lon.to_string();
        self
    }

    /// Raw cell text, for rows that should fail to place.
    pub fn cells(mut self, lat: &str, lon: &str) -> Self {
        self.row.lat = lat.to_string();
        self.row.lon = lon.to_string();
        self
    }

    pub fn build(self) -> Row {
        self.row
    }
}

/// A shapes row with the given geometry cell.
pub fn shape_row(name: &str, geometry: &str) -> ShapeRow {
    ShapeRow {
        name: name.to_string(),
        description: format!("{name} description"),
        color: String::new(),
        geometry: geometry.to_string(),
    }
}

/// Render rows back into a points sheet.
pub fn points_sheet(rows: &[Row]) -> String {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(["name", "description", "color", "lat", "lon"])
        .expect("write header");
    for r in rows {
        w.write_record([&r.name, &r.description, &r.color, &r.lat, &r.lon])
            .expect("write row");
    }
    String::from_utf8(w.into_inner().expect("flush")).expect("utf-8")
}
