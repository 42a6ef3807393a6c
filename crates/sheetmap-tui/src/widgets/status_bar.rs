//! Status bar — one line under the map with the layer load states, the view
//! and the basemap attribution. Keybinding hints are right-aligned.

use crate::app::{AppState, LayerStatus};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

const HINT: &str = " :cmd  ?:help  q:quit ";

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

fn layer_span<'a>(label: &str, status: &LayerStatus, s: &'a AppState) -> Span<'a> {
    match status {
        LayerStatus::Loading => Span::styled(format!(" {label} loading… "), s.theme.status_bar),
        LayerStatus::Loaded { count, skipped: 0, at } => Span::styled(
            format!(" {label} {count} @{} ", at.format("%H:%M:%S")),
            s.theme.status_bar,
        ),
        LayerStatus::Loaded { count, skipped, at } => Span::styled(
            format!(" {label} {count} ({skipped} skipped) @{} ", at.format("%H:%M:%S")),
            s.theme.status_bar,
        ),
        LayerStatus::Failed(err) => Span::styled(format!(" {label}: {err} "), s.theme.status_error),
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let s = self.state;
        buf.set_style(area, s.theme.status_bar);

        let mut spans = vec![layer_span("points", &s.points_status, s)];
        if let Some(shapes) = &s.shapes_status {
            spans.push(layer_span("shapes", shapes, s));
        }
        spans.push(Span::styled(
            format!(" z{} {} │ {} ", s.viewport.zoom, s.viewport.center, s.session.marker_kind),
            s.theme.status_bar,
        ));
        spans.push(Span::styled(
            s.config.map.attribution.as_str(),
            s.theme.status_bar.add_modifier(Modifier::DIM),
        ));

        let hint_w = HINT.chars().count() as u16;
        let text_w = area.width.saturating_sub(hint_w);
        buf.set_line(area.x, area.y, &Line::from(spans), text_w);

        // Keybinding hints at the right edge
        if area.width > hint_w {
            let hint_x = area.right().saturating_sub(hint_w);
            buf.set_string(hint_x, area.y, HINT, Style::default().add_modifier(Modifier::DIM));
        }
    }
}
