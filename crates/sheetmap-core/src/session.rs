//! Map session — the one context object a running map carries around.
//!
//! A [`MapSession`] owns the loaded layers, the marker settings and the side
//! panel. Presentation code resolves a click to a [`ClickTarget`] (usually via
//! [`MapSession::hit_test`]) and hands it to [`MapSession::click`]; a click
//! resolves to exactly one target, so a marker click never also reaches the
//! background.

use crate::config::Config;
use crate::layer::{Marker, MarkerKind, PointLayer, Shape, ShapeLayer};
use crate::markup;
use crate::panel::{PanelState, SidePanel};
use crate::types::{LatLon, Row, ShapeRow};

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Marker(usize),
    Shape(usize),
    Background,
}

#[derive(Debug, Clone)]
pub struct MapSession {
    pub points: PointLayer,
    pub shapes: ShapeLayer,
    pub marker_kind: MarkerKind,
    /// Pixels for `circleMarker`, metres for `circle`.
    pub marker_radius: f64,
    panel: SidePanel,
    /// Marker most recently opened in the panel, for keyboard cycling.
    selected: Option<ClickTarget>,
}

impl MapSession {
    pub fn new(config: &Config) -> Self {
        Self {
            points: PointLayer::default(),
            shapes: ShapeLayer::default(),
            marker_kind: MarkerKind::parse(&config.markers.kind),
            marker_radius: config.markers.radius,
            panel: SidePanel::new(&config.panel),
            selected: None,
        }
    }

    pub fn panel(&self) -> &SidePanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut SidePanel {
        &mut self.panel
    }

    pub fn panel_state(&self) -> &PanelState {
        self.panel.state()
    }

    pub fn selected(&self) -> Option<ClickTarget> {
        self.selected
    }

    /// Replace the point layer with freshly loaded rows.
    pub fn set_points(&mut self, rows: &[Row]) {
        self.points = PointLayer::from_rows(rows);
        if matches!(self.selected, Some(ClickTarget::Marker(i)) if i >= self.points.len()) {
            self.selected = None;
        }
    }

    /// Replace the shape layer with freshly loaded rows.
    pub fn set_shapes(&mut self, rows: &[ShapeRow]) {
        self.shapes = ShapeLayer::from_rows(rows);
        if matches!(self.selected, Some(ClickTarget::Shape(i)) if i >= self.shapes.len()) {
            self.selected = None;
        }
    }

    pub fn marker(&self, idx: usize) -> Option<&Marker> {
        self.points.markers.get(idx)
    }

    pub fn shape(&self, idx: usize) -> Option<&Shape> {
        self.shapes.shapes.get(idx)
    }

    /// Apply a click. Markers and shapes fill and open the panel; the
    /// background closes it. Indices that no longer exist act like the
    /// background.
    pub fn click(&mut self, target: ClickTarget) {
        let content = match target {
            ClickTarget::Marker(i) => {
                self.marker(i).map(|m| (m.name.clone(), m.description.clone()))
            }
            ClickTarget::Shape(i) => self.shape(i).map(|s| (s.name.clone(), s.description.clone())),
            ClickTarget::Background => None,
        };
        match content {
            Some((title, body)) => {
                tracing::debug!(?target, title = %title, "feature clicked");
                self.panel.show(&title, &markup::to_plain_text(&body));
                self.selected = Some(target);
            }
            None => {
                tracing::debug!("background clicked");
                self.panel.close();
            }
        }
    }

    /// Open the next (`forward`) or previous marker in the panel, wrapping.
    pub fn cycle_selection(&mut self, forward: bool) {
        let len = self.points.len();
        if len == 0 {
            return;
        }
        let next = match self.selected {
            Some(ClickTarget::Marker(i)) if forward => (i + 1) % len,
            Some(ClickTarget::Marker(i)) => (i + len - 1) % len,
            _ if forward => 0,
            _ => len - 1,
        };
        self.click(ClickTarget::Marker(next));
    }

    /// Resolve a map position to a click target.
    ///
    /// `tolerance` is the half-size, in degrees `(lat, lon)`, of the box a
    /// marker must fall in to count as hit. The closest marker wins; shapes
    /// are only considered when no marker is hit, and the smallest shape
    /// whose (tolerance-padded) bounding box contains the point wins.
    pub fn hit_test(&self, at: LatLon, tolerance: (f64, f64)) -> ClickTarget {
        let (tol_lat, tol_lon) = tolerance;
        let marker = self
            .points
            .markers
            .iter()
            .enumerate()
            .filter_map(|(i, m)| {
                let dlat = (m.position.lat - at.lat).abs();
                let dlon = (m.position.lon - at.lon).abs();
                let dist = (dlat / tol_lat.max(f64::EPSILON))
                    .hypot(dlon / tol_lon.max(f64::EPSILON));
                (dlat <= tol_lat && dlon <= tol_lon).then_some((i, dist))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((i, _)) = marker {
            return ClickTarget::Marker(i);
        }

        let shape = self
            .shapes
            .shapes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                let (min, max) = s.geometry.bounds()?;
                let inside = at.lon >= min[0] - tol_lon
                    && at.lon <= max[0] + tol_lon
                    && at.lat >= min[1] - tol_lat
                    && at.lat <= max[1] + tol_lat;
                inside.then(|| (i, (max[0] - min[0]) * (max[1] - min[1])))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match shape {
            Some((i, _)) => ClickTarget::Shape(i),
            None => ClickTarget::Background,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> MapSession {
        let mut s = MapSession::new(&Config::defaults());
        s.set_points(&[
            Row::new("A", "d1", "red", 43.9, 12.9),
            Row::new("B", "<b>d2</b>", "blue", 43.91, 12.91),
        ]);
        s
    }

    #[test]
    fn marker_then_background() {
        let mut s = session();
        s.click(ClickTarget::Marker(0));
        assert_eq!(s.panel_state(), &PanelState::Open("A".into()));
        assert_eq!(s.panel().body(), "d1");
        s.click(ClickTarget::Background);
        assert_eq!(s.panel_state(), &PanelState::Closed);
    }

    #[test]
    fn panel_body_is_plain_text() {
        let mut s = session();
        s.click(ClickTarget::Marker(1));
        assert_eq!(s.panel().body(), "d2");
    }

    #[test]
    fn stale_index_acts_like_background() {
        let mut s = session();
        s.click(ClickTarget::Marker(0));
        s.click(ClickTarget::Marker(9));
        assert_eq!(s.panel_state(), &PanelState::Closed);
    }

    #[test]
    fn hit_test_prefers_closest_marker() {
        let s = session();
        let tol = (0.02, 0.02);
        assert_eq!(s.hit_test(LatLon::new(43.908, 12.908), tol), ClickTarget::Marker(1));
        assert_eq!(s.hit_test(LatLon::new(43.901, 12.901), tol), ClickTarget::Marker(0));
        assert_eq!(s.hit_test(LatLon::new(44.5, 13.5), tol), ClickTarget::Background);
    }

    #[test]
    fn hit_test_falls_back_to_shapes() {
        let mut s = session();
        s.set_shapes(&[ShapeRow {
            name: "Park".into(),
            description: String::new(),
            color: "green".into(),
            geometry: "[[[13.0, 44.0], [13.2, 44.0], [13.2, 44.2], [13.0, 44.0]]]".into(),
        }]);
        let tol = (0.001, 0.001);
        assert_eq!(s.hit_test(LatLon::new(44.1, 13.1), tol), ClickTarget::Shape(0));
        s.click(ClickTarget::Shape(0));
        assert_eq!(s.panel_state(), &PanelState::Open("Park".into()));
    }

    #[test]
    fn cycling_wraps_around() {
        let mut s = session();
        s.cycle_selection(true);
        assert_eq!(s.selected(), Some(ClickTarget::Marker(0)));
        s.cycle_selection(true);
        s.cycle_selection(true);
        assert_eq!(s.selected(), Some(ClickTarget::Marker(0)));
        s.cycle_selection(false);
        assert_eq!(s.panel_state(), &PanelState::Open("B".into()));
    }

    #[test]
    fn reload_drops_selection_past_the_end() {
        let mut s = session();
        s.click(ClickTarget::Marker(1));
        s.set_points(&[Row::new("A", "d1", "red", 43.9, 12.9)]);
        assert_eq!(s.selected(), None);
    }
}
