// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use crate::{app::AppState, theme::Theme};
use sheetmap_core::layer::MarkerKind;
use sheetmap_core::LatLon;

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Close the app
    Quit,
    // Display help
    Help,
    // Change theme
    Theme(String),
    // Redraw points with another marker kind
    Marker(MarkerKind),
    // Jump to a zoom level
    Zoom(u8),
    // Move the view
    Center(LatLon),
    // Fetch every sheet again
    Reload,
    // Same as the panel's tab button
    Panel,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "reload" => Ok(Command::Reload),
            "panel" => Ok(Command::Panel),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            // strict, unlike MarkerKind::parse
            "marker" => match rest {
                "marker" => Ok(Command::Marker(MarkerKind::Marker)),
                "circleMarker" => Ok(Command::Marker(MarkerKind::CircleMarker)),
                "circle" => Ok(Command::Marker(MarkerKind::Circle)),
                _ => Err("usage: marker <marker|circleMarker|circle>".to_string()),
            },
            "zoom" => rest
                .parse::<u8>()
                .map(Command::Zoom)
                .map_err(|_| "usage: zoom <level>".to_string()),
            "center" => parse_center(rest),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

fn parse_center(rest: &str) -> Result<Command, String> {
    const USAGE: &str = "usage: center <lat> <lon>";
    let mut parts = rest.split(|c: char| c.is_whitespace() || c == ',').filter(|p| !p.is_empty());
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(USAGE.to_string());
    };
    let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
        return Err(USAGE.to_string());
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err("center out of range".to_string());
    }
    Ok(Command::Center(LatLon::new(lat, lon)))
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) {
    match cmd {
        Command::Quit => {
            s.quit = true;
        }
        Command::Help => {
            s.show_help = !s.show_help;
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name);
        }
        Command::Marker(kind) => {
            s.session.marker_kind = kind;
        }
        Command::Zoom(n) => {
            s.viewport.set_zoom(n);
        }
        Command::Center(pos) => {
            s.viewport.center_on(pos);
        }
        Command::Reload => {
            s.reload_requested = true;
        }
        Command::Panel => {
            s.session.panel_mut().toggle();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
