//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Sheet loads arrive on the
//! loader's channel and are applied between frames.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent},
    theme::Theme,
    viewport::Viewport,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        map_view::{self, MapView},
        side_panel::{self, PanelLayout, PanelTab, SidePanelView},
        status_bar::StatusBar,
    },
};
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self as ct_event, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Position, Rect},
    widgets::canvas::MapResolution,
    Frame, Terminal,
};
use sheetmap_core::{config::Config, MapSession};
use sheetmap_feeds::{Layer, LoadEvent, Loader};
use std::{cell::Cell, io, time::Duration};
use tokio::{runtime::Handle, sync::mpsc};

/// Clicks within this many cells of a marker hit it.
const HIT_CELLS: f64 = 1.5;

// ---------------------------------------------------------------------------
// Layer status
// ---------------------------------------------------------------------------

/// Load state of one sheet, as shown in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerStatus {
    Loading,
    Loaded {
        count: usize,
        skipped: usize,
        at: DateTime<Utc>,
    },
    /// The last load failed; the previous layer (if any) is still shown.
    Failed(String),
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub session: MapSession,
    pub viewport: Viewport,
    pub basemap: Option<MapResolution>,
    pub theme: Theme,
    pub config: Config,
    pub points_status: LayerStatus,
    /// `None` when no shape sheet is configured.
    pub shapes_status: Option<LayerStatus>,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    /// Vim-style `:` command line is active.
    pub command_mode: bool,
    pub quit: bool,
    /// Set by `r` / `:reload`; the event loop starts the loads.
    pub reload_requested: bool,
    /// Where the last frame put the map and the panel buttons.
    layout: Cell<PanelLayout>,
}

impl AppState {
    pub fn new(config: Config, theme: Theme, has_shapes: bool) -> Self {
        Self {
            session: MapSession::new(&config),
            viewport: Viewport::from_config(&config.map),
            basemap: map_view::basemap(&config.map.basemap),
            theme,
            points_status: LayerStatus::Loading,
            shapes_status: has_shapes.then_some(LayerStatus::Loading),
            config,
            show_help: false,
            command_bar: CommandBarState::default(),
            command_mode: false,
            quit: false,
            reload_requested: false,
            layout: Cell::new(PanelLayout::default()),
        }
    }

    /// The map area of the last drawn frame.
    pub fn map_area(&self) -> Rect {
        self.layout.get().map
    }

    /// Replace a layer with freshly loaded rows, or record why it failed.
    pub fn apply_load(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Points { rows, loaded_at } => {
                self.session.set_points(&rows);
                self.points_status = LayerStatus::Loaded {
                    count: self.session.points.len(),
                    skipped: self.session.points.skipped.len(),
                    at: loaded_at,
                };
            }
            LoadEvent::Shapes { rows, loaded_at } => {
                self.session.set_shapes(&rows);
                self.shapes_status = Some(LayerStatus::Loaded {
                    count: self.session.shapes.len(),
                    skipped: self.session.shapes.skipped.len(),
                    at: loaded_at,
                });
            }
            LoadEvent::Failed { layer, error, .. } => match layer {
                Layer::Points => self.points_status = LayerStatus::Failed(error),
                Layer::Shapes => self.shapes_status = Some(LayerStatus::Failed(error)),
            },
        }
    }

    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Command mode intercepts all events.
        if self.command_mode {
            match event {
                AppEvent::Escape => {
                    tracing::debug!("command bar cancelled");
                    self.command_bar.clear();
                    self.command_mode = false;
                }
                AppEvent::Enter => {
                    let input = self.command_bar.input.clone();
                    match Command::parse(&input) {
                        Ok(cmd) => {
                            tracing::debug!(command = ?cmd, "executing command");
                            self.command_bar.clear();
                            self.command_mode = false;
                            execute_command(self, cmd);
                        }
                        Err(msg) if msg.is_empty() => {
                            // Empty input — just close
                            self.command_bar.clear();
                            self.command_mode = false;
                        }
                        Err(msg) => {
                            // Show the error; bar stays open
                            self.command_bar.error = Some(msg);
                        }
                    }
                }
                AppEvent::Quit => self.quit = true,
                other => self.command_bar.handle(&other),
            }
            return;
        }

        match event {
            AppEvent::Char('?') => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }
            AppEvent::Char(':') => {
                tracing::debug!("entering command mode");
                self.command_bar.clear();
                self.command_mode = true;
            }
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }
            AppEvent::Escape => self.session.panel_mut().close(),
            AppEvent::NextMarker => self.session.cycle_selection(true),
            AppEvent::PrevMarker => self.session.cycle_selection(false),
            AppEvent::Pan(dir) => self.viewport.pan(dir),
            AppEvent::ZoomIn => self.viewport.zoom_in(),
            AppEvent::ZoomOut => self.viewport.zoom_out(),
            AppEvent::ResetView => self.viewport.reset(),
            AppEvent::TogglePanel => self.session.panel_mut().toggle(),
            AppEvent::Reload => self.reload_requested = true,
            AppEvent::Click(col, row) => self.click(col, row),
            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}
            AppEvent::Char(_) | AppEvent::Backspace | AppEvent::Enter => {}
        }
    }

    /// Route a left click: panel buttons first, then whatever on the map is
    /// under the cursor. Clicks on the panel body or the status bar do
    /// nothing.
    fn click(&mut self, col: u16, row: u16) {
        let layout = self.layout.get();
        let at = Position::new(col, row);

        if layout.tab.contains(at) {
            tracing::debug!("panel tab clicked");
            self.session.panel_mut().toggle();
            return;
        }
        if layout.close.is_some_and(|close| close.contains(at)) {
            tracing::debug!("panel close clicked");
            self.session.panel_mut().close();
            return;
        }
        let Some(pos) = self.viewport.cell_to_latlon(layout.map, col, row) else {
            return;
        };
        let (tol_lat, tol_lon) = self.viewport.hit_tolerance();
        let target = self
            .session
            .hit_test(pos, (tol_lat * HIT_CELLS, tol_lon * HIT_CELLS));
        self.session.click(target);
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
    loader: Option<(Loader, Handle)>,
    loads: Option<mpsc::UnboundedReceiver<LoadEvent>>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        App { state, loader: None, loads: None }
    }

    /// Receive sheet loads from `loads`; reloads are spawned on `rt`.
    pub fn with_loader(
        mut self,
        loader: Loader,
        loads: mpsc::UnboundedReceiver<LoadEvent>,
        rt: Handle,
    ) -> Self {
        self.loader = Some((loader, rt));
        self.loads = Some(loads);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.drain_loads();
            if std::mem::take(&mut self.state.reload_requested) {
                if let Some((loader, rt)) = &self.loader {
                    tracing::info!("reloading sheets");
                    loader.reload(rt);
                }
            }

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping while the command bar is open
                        let app_event = if self.state.command_mode {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(
                                command_mode = self.state.command_mode,
                                event = ?ev,
                                "key event"
                            );
                            self.state.handle(ev);
                        }
                    }
                    Event::Key(_) => {}
                    other => {
                        let app_event = if self.state.command_mode {
                            event::to_app_event_insert(other)
                        } else {
                            event::to_app_event(other)
                        };
                        if let Some(ev) = app_event {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn drain_loads(&mut self) {
        let Some(loads) = self.loads.as_mut() else {
            return;
        };
        while let Ok(load) = loads.try_recv() {
            self.state.apply_load(load);
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw one frame and remember where the map and panel buttons went, so the
/// next click can be routed.
pub fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: body | 1-line status bar
    let [body, status] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    let panel = state.session.panel();
    let layout = side_panel::layout(body, &state.config.panel, panel.is_open());
    state.layout.set(layout);

    frame.render_widget(
        MapView::new(&state.session, &state.viewport, state.basemap, &state.theme),
        layout.map,
    );
    if let Some(panel_area) = layout.panel {
        frame.render_widget(SidePanelView::new(panel, layout.close, &state.theme), panel_area);
    }
    frame.render_widget(PanelTab::new(panel.is_open(), &state.theme), layout.tab);
    frame.render_widget(StatusBar::new(state), status);

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Command bar overlays the status bar
    if state.command_mode {
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), status);
        let col = state.command_bar.cursor_col(status);
        frame.set_cursor_position((col, status.y));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
