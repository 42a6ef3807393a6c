//! Map view — the basemap, the shape layer and the point layer on a braille
//! canvas.
//!
//! Layers are painted bottom-up: world outline, shapes, then markers, so a
//! marker is never hidden under a shape. The feature shown in the side panel
//! is drawn with the theme's selected style.

use crate::theme::Theme;
use crate::viewport::Viewport;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker as CanvasMarker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line, Map, MapResolution, Points},
        Widget,
    },
};
use sheetmap_core::geometry::Position;
use sheetmap_core::layer::MarkerKind;
use sheetmap_core::{ClickTarget, LatLon, MapSession};
use std::f64::consts::TAU;

const CIRCLE_SEGMENTS: usize = 32;

/// Which world outline to draw under the layers. `None` draws no basemap.
pub fn basemap(name: &str) -> Option<MapResolution> {
    match name.to_ascii_lowercase().as_str() {
        "high" => Some(MapResolution::High),
        "low" => Some(MapResolution::Low),
        "none" => None,
        other => {
            tracing::warn!(basemap = other, "unknown basemap, using `high`");
            Some(MapResolution::High)
        }
    }
}

pub struct MapView<'a> {
    session: &'a MapSession,
    viewport: &'a Viewport,
    basemap: Option<MapResolution>,
    theme: &'a Theme,
}

impl<'a> MapView<'a> {
    pub fn new(
        session: &'a MapSession,
        viewport: &'a Viewport,
        basemap: Option<MapResolution>,
        theme: &'a Theme,
    ) -> Self {
        Self { session, viewport, basemap, theme }
    }

    fn draw_shapes(&self, ctx: &mut Context<'_>) {
        let selected = self.session.selected().filter(|_| self.session.panel().is_open());
        for (i, shape) in self.session.shapes.shapes.iter().enumerate() {
            let color = if selected == Some(ClickTarget::Shape(i)) {
                self.theme.marker_selected.fg.unwrap_or(Color::White)
            } else {
                self.theme.shape_color(shape.color)
            };
            for path in shape.geometry.paths() {
                draw_path(ctx, path, color);
            }
            let vertices: Vec<(f64, f64)> =
                shape.geometry.vertices().iter().map(|p| (p[0], p[1])).collect();
            if !vertices.is_empty() {
                ctx.draw(&Points { coords: &vertices, color });
            }
        }
    }

    fn draw_markers(&self, ctx: &mut Context<'_>) {
        let selected = self.session.selected().filter(|_| self.session.panel().is_open());
        let kind = self.session.marker_kind;
        let radius = self.session.marker_radius;
        for (i, marker) in self.session.points.markers.iter().enumerate() {
            let mut style = self.theme.marker_style(marker.style.color);
            if selected == Some(ClickTarget::Marker(i)) {
                style = style.patch(self.theme.marker_selected);
            }
            match kind {
                MarkerKind::Marker => {
                    ctx.print(
                        marker.position.lon,
                        marker.position.lat,
                        Span::styled(marker.style.icon.to_string(), style),
                    );
                }
                MarkerKind::CircleMarker => {
                    let radii = self.viewport.pixels_to_degrees(radius);
                    draw_ellipse(ctx, marker.position, radii, style.fg.unwrap_or(Color::Blue));
                }
                MarkerKind::Circle => {
                    let radii = self.viewport.metres_to_degrees(marker.position, radius);
                    draw_ellipse(ctx, marker.position, radii, style.fg.unwrap_or(Color::Blue));
                }
            }
        }
    }
}

impl Widget for MapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (x_bounds, y_bounds) = self.viewport.bounds(area);
        let basemap_color = self.theme.basemap.fg.unwrap_or(Color::DarkGray);
        Canvas::default()
            .marker(CanvasMarker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                if let Some(resolution) = self.basemap {
                    ctx.draw(&Map { resolution, color: basemap_color });
                    ctx.layer();
                }
                self.draw_shapes(ctx);
                ctx.layer();
                self.draw_markers(ctx);
            })
            .render(area, buf);
    }
}

fn draw_path(ctx: &mut Context<'_>, path: &[Position], color: Color) {
    for w in path.windows(2) {
        ctx.draw(&Line { x1: w[0][0], y1: w[0][1], x2: w[1][0], y2: w[1][1], color });
    }
}

/// Outline of an ellipse with radii `(lat, lon)` degrees around `center`.
fn draw_ellipse(ctx: &mut Context<'_>, center: LatLon, (r_lat, r_lon): (f64, f64), color: Color) {
    let at = |k: usize| {
        let t = TAU * k as f64 / CIRCLE_SEGMENTS as f64;
        (center.lon + r_lon * t.cos(), center.lat + r_lat * t.sin())
    };
    for k in 0..CIRCLE_SEGMENTS {
        let ((x1, y1), (x2, y2)) = (at(k), at(k + 1));
        ctx.draw(&Line { x1, y1, x2, y2, color });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sheetmap_core::config::Config;
    use sheetmap_core::{Row, ShapeRow};

    fn render(session: &MapSession, viewport: &Viewport, area: Rect) -> Buffer {
        let theme = Theme::load_default();
        let mut buf = Buffer::empty(area);
        MapView::new(session, viewport, None, &theme).render(area, &mut buf);
        buf
    }

    fn symbols(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn marker_icon_is_printed_at_its_position() {
        let config = Config::defaults();
        let viewport = Viewport::from_config(&config.map);
        let mut session = MapSession::new(&config);
        session.set_points(&[Row::new("A", "", "red", 43.91, 12.92)]);
        let buf = render(&session, &viewport, Rect::new(0, 0, 40, 20));
        assert!(symbols(&buf).contains('◉'));
    }

    #[test]
    fn off_screen_markers_are_not_drawn() {
        let config = Config::defaults();
        let viewport = Viewport::from_config(&config.map);
        let mut session = MapSession::new(&config);
        session.set_points(&[Row::new("far", "", "", -33.0, 151.0)]);
        let buf = render(&session, &viewport, Rect::new(0, 0, 40, 20));
        assert!(!symbols(&buf).contains('◉'));
    }

    #[test]
    fn circles_draw_outlines_instead_of_icons() {
        let config = Config::defaults();
        let viewport = Viewport::from_config(&config.map);
        let mut session = MapSession::new(&config);
        session.marker_kind = MarkerKind::CircleMarker;
        session.marker_radius = 40.0;
        session.set_points(&[Row::new("A", "", "", 43.91, 12.92)]);
        let buf = render(&session, &viewport, Rect::new(0, 0, 40, 20));
        let text = symbols(&buf);
        assert!(!text.contains('◉'));
        assert!(text.chars().any(|c| ('\u{2801}'..='\u{28ff}').contains(&c)));
    }

    #[test]
    fn shapes_are_drawn() {
        let config = Config::defaults();
        let viewport = Viewport::from_config(&config.map);
        let mut session = MapSession::new(&config);
        session.set_shapes(&[ShapeRow {
            name: "line".into(),
            description: String::new(),
            color: "green".into(),
            geometry: "[[12.91,43.90],[12.93,43.92]]".into(),
        }]);
        let buf = render(&session, &viewport, Rect::new(0, 0, 40, 20));
        assert!(symbols(&buf).chars().any(|c| ('\u{2801}'..='\u{28ff}').contains(&c)));
    }

    #[test]
    fn basemap_names() {
        assert_eq!(basemap("high"), Some(MapResolution::High));
        assert_eq!(basemap("Low"), Some(MapResolution::Low));
        assert_eq!(basemap("none"), None);
        assert_eq!(basemap("satellite"), Some(MapResolution::High));
    }
}
