//! Side panel — the feature details pane docked to one side of the map.
//!
//! Open, it is a bordered column with the feature name as title, a `✕` close
//! button in the top border and the description as wrapped plain text.
//! Closed, only its tab button (`≡`) remains, in the map's top corner on the
//! panel's side. Clicking the tab toggles the panel.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};
use sheetmap_core::config::PanelConfig;
use sheetmap_core::panel::SidePanel;

const TAB: &str = " ≡ ";
const CLOSE: &str = " ✕ ";

/// Where the panel, its buttons and the map ended up on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelLayout {
    pub map: Rect,
    pub panel: Option<Rect>,
    pub tab: Rect,
    pub close: Option<Rect>,
}

/// Split `area` between the map and the panel.
pub fn layout(area: Rect, config: &PanelConfig, open: bool) -> PanelLayout {
    let on_right = config.position.eq_ignore_ascii_case("right");
    let (map, panel) = if open {
        let pct = config.width_pct.clamp(10, 90);
        let [first, second] = if on_right {
            Layout::horizontal([Constraint::Fill(1), Constraint::Percentage(pct)]).areas(area)
        } else {
            Layout::horizontal([Constraint::Percentage(pct), Constraint::Fill(1)]).areas(area)
        };
        if on_right { (first, Some(second)) } else { (second, Some(first)) }
    } else {
        (area, None)
    };

    let tab_w = (TAB.chars().count() as u16).min(map.width);
    let tab_x = if on_right { map.right().saturating_sub(tab_w) } else { map.x };
    let tab = Rect { x: tab_x, y: map.y, width: tab_w, height: map.height.min(1) };

    let close = panel.filter(|p| p.width > 6).map(|p| Rect {
        x: p.right() - 1 - CLOSE.chars().count() as u16,
        y: p.y,
        width: CLOSE.chars().count() as u16,
        height: 1,
    });

    PanelLayout { map, panel, tab, close }
}

/// The open panel column.
pub struct SidePanelView<'a> {
    panel: &'a SidePanel,
    close: Option<Rect>,
    theme: &'a Theme,
}

impl<'a> SidePanelView<'a> {
    pub fn new(panel: &'a SidePanel, close: Option<Rect>, theme: &'a Theme) -> Self {
        Self { panel, close, theme }
    }
}

impl Widget for SidePanelView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" {} ", self.panel.title()),
                self.theme.panel_title,
            )))
            .border_style(self.theme.border_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(close) = self.close {
            buf.set_string(close.x, close.y, CLOSE, self.theme.panel_tab);
        }

        Paragraph::new(self.panel.body())
            .style(self.theme.panel_body)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

/// The panel's tab button.
pub struct PanelTab<'a> {
    open: bool,
    theme: &'a Theme,
}

impl<'a> PanelTab<'a> {
    pub fn new(open: bool, theme: &'a Theme) -> Self {
        Self { open, theme }
    }
}

impl Widget for PanelTab<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.open {
            self.theme.panel_tab
        } else {
            self.theme.panel_tab.add_modifier(Modifier::REVERSED)
        };
        buf.set_stringn(area.x, area.y, TAB, area.width as usize, style);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
