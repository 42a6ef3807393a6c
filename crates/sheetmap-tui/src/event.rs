//! Semantic application events — crossterm key and mouse events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Keybindings
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `q`, `Ctrl+c`           | `Quit`                     |
//! | `Tab` / `Shift+Tab`     | `NextMarker` / `PrevMarker`|
//! | `↑↓←→` / `hjkl`         | `Pan(dir)`                 |
//! | `+` `=` / `-`           | `ZoomIn` / `ZoomOut`       |
//! | `0`                     | `ResetView`                |
//! | `p`                     | `TogglePanel`              |
//! | `r`                     | `Reload`                   |
//! | printable char          | `Char(c)`                  |
//! | `Backspace`             | `Backspace`                |
//! | `Enter`                 | `Enter`                    |
//! | `Esc`                   | `Escape`                   |
//! | left click              | `Click(col, row)`          |
//! | wheel up / down         | `ZoomIn` / `ZoomOut`       |
//! | terminal resize         | `Resize(w, h)`             |
//!
//! ## Insert mode
//!
//! While the command bar is open the event loop calls
//! [`to_app_event_insert`]: every printable key becomes `Char`, arrow keys
//! become `Pan` (the bar reads them as cursor movement) and mouse input is
//! ignored.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// Cardinal direction for panning and text-cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Open the next marker in the panel.
    NextMarker,
    /// Open the previous marker in the panel.
    PrevMarker,
    Pan(Direction),
    ZoomIn,
    ZoomOut,
    /// Back to the configured centre and zoom.
    ResetView,
    /// The panel's tab button.
    TogglePanel,
    /// Fetch every sheet again.
    Reload,
    /// Left mouse button pressed at terminal (column, row).
    Click(u16, u16),
    Char(char),
    Backspace,
    Enter,
    Escape,
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] (normal / map mode).
///
/// Returns `None` for events that carry no meaning for the application.
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] for the command bar.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::NextMarker),
        BackTab => Some(AppEvent::PrevMarker),

        Up | Char('k') if key.modifiers == Mod::NONE => Some(AppEvent::Pan(Direction::Up)),
        Down | Char('j') if key.modifiers == Mod::NONE => Some(AppEvent::Pan(Direction::Down)),
        Left | Char('h') if key.modifiers == Mod::NONE => Some(AppEvent::Pan(Direction::Left)),
        Right | Char('l') if key.modifiers == Mod::NONE => Some(AppEvent::Pan(Direction::Right)),

        // '+' needs SHIFT on most layouts, so match on the code alone
        Char('+') | Char('=') => Some(AppEvent::ZoomIn),
        Char('-') if key.modifiers == Mod::NONE => Some(AppEvent::ZoomOut),
        Char('0') if key.modifiers == Mod::NONE => Some(AppEvent::ResetView),

        Char('p') if key.modifiers == Mod::NONE => Some(AppEvent::TogglePanel),
        Char('r') if key.modifiers == Mod::NONE => Some(AppEvent::Reload),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Left => Some(AppEvent::Pan(Direction::Left)),
        Right => Some(AppEvent::Pan(Direction::Right)),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

fn map_mouse(mouse: MouseEvent) -> Option<AppEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(AppEvent::Click(mouse.column, mouse.row)),
        MouseEventKind::ScrollUp => Some(AppEvent::ZoomIn),
        MouseEventKind::ScrollDown => Some(AppEvent::ZoomOut),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
