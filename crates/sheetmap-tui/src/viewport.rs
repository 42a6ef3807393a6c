//! Map viewport — which part of the world the map pane shows.
//!
//! Projection is a local equirectangular approximation of web-mercator zoom
//! levels: one terminal column spans `360 / (2^zoom * 32)` degrees of
//! longitude, and since a cell is roughly twice as tall as it is wide, one row
//! spans twice that in latitude, scaled by `cos(lat)` at the centre.

use crate::event::Direction;
use ratatui::layout::Rect;
use sheetmap_core::config::MapConfig;
use sheetmap_core::LatLon;

/// Terminal columns per 256-pixel web-map tile.
const CELLS_PER_TILE: f64 = 32.0;
/// Screen pixels per terminal column, for pixel-sized circle markers.
pub const PX_PER_CELL: f64 = 8.0;
const METRES_PER_DEGREE: f64 = 111_320.0;
const MAX_LAT: f64 = 85.0;
/// Cells moved per pan step.
const PAN_CELLS: f64 = 4.0;
/// Keeps positions exactly on a cell edge from rounding into the previous cell.
const EDGE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: u8,
    min_zoom: u8,
    max_zoom: u8,
    home: LatLon,
    home_zoom: u8,
}

impl Viewport {
    pub fn from_config(map: &MapConfig) -> Self {
        let min_zoom = map.min_zoom.min(map.max_zoom);
        let max_zoom = map.max_zoom.max(min_zoom);
        let home = LatLon::new(map.center_lat.clamp(-MAX_LAT, MAX_LAT), wrap_lon(map.center_lon));
        let home_zoom = map.zoom.clamp(min_zoom, max_zoom);
        Self {
            center: home,
            zoom: home_zoom,
            min_zoom,
            max_zoom,
            home,
            home_zoom,
        }
    }

    pub fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// Degrees of longitude spanned by one terminal column.
    pub fn lon_per_cell(&self) -> f64 {
        360.0 / (2f64.powi(i32::from(self.zoom)) * CELLS_PER_TILE)
    }

    /// Degrees of latitude spanned by one terminal row.
    pub fn lat_per_cell(&self) -> f64 {
        2.0 * self.lon_per_cell() * self.center.lat.to_radians().cos()
    }

    /// Canvas bounds `([west, east], [south, north])` for a pane of `area`.
    pub fn bounds(&self, area: Rect) -> ([f64; 2], [f64; 2]) {
        let half_w = f64::from(area.width) * self.lon_per_cell() / 2.0;
        let half_h = f64::from(area.height) * self.lat_per_cell() / 2.0;
        (
            [self.center.lon - half_w, self.center.lon + half_w],
            [self.center.lat - half_h, self.center.lat + half_h],
        )
    }

    /// Map position under the centre of terminal cell (`col`, `row`), or
    /// `None` when the cell is outside `area`.
    pub fn cell_to_latlon(&self, area: Rect, col: u16, row: u16) -> Option<LatLon> {
        if !area.contains((col, row).into()) {
            return None;
        }
        let ([west, _], [_, north]) = self.bounds(area);
        let lon = west + (f64::from(col - area.x) + 0.5) * self.lon_per_cell();
        let lat = north - (f64::from(row - area.y) + 0.5) * self.lat_per_cell();
        Some(LatLon::new(lat, lon))
    }

    /// Terminal cell containing `pos`, or `None` when it is off screen.
    pub fn latlon_to_cell(&self, area: Rect, pos: LatLon) -> Option<(u16, u16)> {
        let ([west, _], [_, north]) = self.bounds(area);
        let x = ((pos.lon - west) / self.lon_per_cell() + EDGE_EPSILON).floor();
        let y = ((north - pos.lat) / self.lat_per_cell() + EDGE_EPSILON).floor();
        if x < 0.0 || y < 0.0 || x >= f64::from(area.width) || y >= f64::from(area.height) {
            return None;
        }
        Some((area.x + x as u16, area.y + y as u16))
    }

    pub fn pan(&mut self, dir: Direction) {
        let (dlat, dlon) = match dir {
            Direction::Up => (PAN_CELLS * self.lat_per_cell(), 0.0),
            Direction::Down => (-PAN_CELLS * self.lat_per_cell(), 0.0),
            Direction::Left => (0.0, -PAN_CELLS * self.lon_per_cell()),
            Direction::Right => (0.0, PAN_CELLS * self.lon_per_cell()),
        };
        self.center_on(LatLon::new(self.center.lat + dlat, self.center.lon + dlon));
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.saturating_sub(1));
    }

    /// Set the zoom level, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        tracing::debug!(zoom = self.zoom, "zoom changed");
    }

    pub fn center_on(&mut self, pos: LatLon) {
        self.center = LatLon::new(pos.lat.clamp(-MAX_LAT, MAX_LAT), wrap_lon(pos.lon));
    }

    /// Back to the configured centre and zoom.
    pub fn reset(&mut self) {
        self.center = self.home;
        self.zoom = self.home_zoom;
    }

    /// Half-size `(lat, lon)` of the box a click must land in to hit a marker.
    pub fn hit_tolerance(&self) -> (f64, f64) {
        (self.lat_per_cell(), self.lon_per_cell())
    }

    /// Radii `(lat, lon)` in degrees of a circle with a ground radius of `metres`.
    pub fn metres_to_degrees(&self, at: LatLon, metres: f64) -> (f64, f64) {
        let lat = metres / METRES_PER_DEGREE;
        let lon = lat / at.lat.to_radians().cos().max(f64::EPSILON);
        (lat, lon)
    }

    /// Radii `(lat, lon)` in degrees of a circle with a radius of `px` screen pixels.
    pub fn pixels_to_degrees(&self, px: f64) -> (f64, f64) {
        let cells = px / PX_PER_CELL;
        let lon = cells * self.lon_per_cell();
        (lon * self.center.lat.to_radians().cos(), lon)
    }
}

fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
