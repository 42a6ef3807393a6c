//! sheetmap TUI — ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod viewport;
pub mod widgets;

pub use app::{App, AppState};

use sheetmap_core::config::Config;
use sheetmap_feeds::{LoadEvent, Loader};
use tokio::sync::mpsc;

/// Start the loads on a background runtime and run the map until the user
/// quits. With `watch`, a local points file is reloaded whenever it changes.
pub fn run(
    config: Config,
    loader: Loader,
    loads: mpsc::UnboundedReceiver<LoadEvent>,
    watch: bool,
) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    loader.spawn_all(rt.handle());
    // Dropping the watcher stops the notifications, so hold it until exit.
    let _watcher = if watch { loader.spawn_watch(rt.handle())? } else { None };

    let theme = theme::Theme::load_default();
    let state = AppState::new(config, theme, loader.has_shapes());
    App::new(state)
        .with_loader(loader, loads, rt.handle().clone())
        .run()
}
