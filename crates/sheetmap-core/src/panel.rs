//! Side panel — the single detail pane opened by clicking a marker.
//!
//! ```text
//!            marker(a)                marker(b)
//! Closed ──────────────► Open(a) ──────────────► Open(b)
//!    ▲                      │
//!    └──── background ──────┘
//! ```
//!
//! There is exactly one panel per session. Its title and body persist while
//! it is closed so the tab toggle can re-open the last selection.

use crate::config::PanelConfig;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    /// Open and showing the row with this label.
    Open(String),
}

#[derive(Debug, Clone)]
pub struct SidePanel {
    id: String,
    state: PanelState,
    title: String,
    body: String,
}

impl SidePanel {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            id: config.id.clone(),
            state: PanelState::Closed,
            title: config.placeholder_title.clone(),
            body: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open(_))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Replace the content and open the panel. Opening over an already-open
    /// panel swaps content in place.
    pub fn show(&mut self, title: &str, body: &str) {
        self.title = title.to_string();
        self.body = body.to_string();
        tracing::debug!(panel = %self.id, from = ?self.state, to = title, "panel open");
        self.state = PanelState::Open(title.to_string());
    }

    pub fn close(&mut self) {
        if self.is_open() {
            tracing::debug!(panel = %self.id, "panel closed");
        }
        self.state = PanelState::Closed;
    }

    /// Tab toggle: close when open, re-open with the current content when closed.
    pub fn toggle(&mut self) {
        match self.state {
            PanelState::Open(_) => self.close(),
            PanelState::Closed => {
                tracing::debug!(panel = %self.id, "panel re-opened from tab");
                self.state = PanelState::Open(self.title.clone());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> SidePanel {
        SidePanel::new(&PanelConfig::default())
    }

    #[test]
    fn starts_closed_with_placeholder() {
        let p = panel();
        assert_eq!(p.state(), &PanelState::Closed);
        assert_eq!(p.title(), "Select a marker");
        assert_eq!(p.id(), "my-info-panel");
    }

    #[test]
    fn switching_markers_stays_open() {
        let mut p = panel();
        p.show("A", "d1");
        p.show("B", "d2");
        assert_eq!(p.state(), &PanelState::Open("B".into()));
        assert_eq!(p.body(), "d2");
    }

    #[test]
    fn close_keeps_content_for_the_tab_toggle() {
        let mut p = panel();
        p.show("A", "d1");
        p.close();
        assert!(!p.is_open());
        p.toggle();
        assert_eq!(p.state(), &PanelState::Open("A".into()));
        assert_eq!(p.body(), "d1");
        p.toggle();
        assert_eq!(p.state(), &PanelState::Closed);
    }
}
