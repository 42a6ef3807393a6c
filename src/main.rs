use clap::{CommandFactory, Parser};
use sheetmap_core::config::Config;
use sheetmap_feeds::{Loader, Source};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sheetmap",
    about = "Points and shapes from a published spreadsheet on a terminal map"
)]
struct Cli {
    /// Published CSV link of the points sheet (overrides `source.points_url`).
    #[arg(long, conflicts_with_all = ["file", "stdin"])]
    url: Option<String>,

    /// Read the points sheet from a local CSV file.
    #[arg(long, conflicts_with = "stdin")]
    file: Option<PathBuf>,

    /// Read the points sheet from stdin.
    #[arg(long)]
    stdin: bool,

    /// Published CSV link of the shapes sheet (overrides `source.shapes_url`).
    #[arg(long, conflicts_with = "shapes_file")]
    shapes_url: Option<String>,

    /// Read the shapes sheet from a local CSV file.
    #[arg(long)]
    shapes_file: Option<PathBuf>,

    /// Reload the points file whenever it changes (needs `--file`).
    #[arg(long)]
    watch: bool,

    /// Marker kind: marker, circleMarker or circle (overrides `markers.kind`).
    #[arg(long)]
    marker: Option<String>,

    /// Extra config file layered over ~/.config/sheetmap/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the loaded layers as a GeoJSON FeatureCollection and exit.
    #[arg(long)]
    headless: bool,

    /// Write debug logs to /tmp/sheetmap-debug.log (stderr with --headless).
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Cross-flag rules clap's derive attributes can't express.
    fn validate(&self) -> Result<(), clap::Error> {
        if self.watch && self.file.is_none() {
            return Err(Cli::command().error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "--watch needs a points sheet given with --file",
            ));
        }
        Ok(())
    }

    fn points_source(&self, config: &Config) -> Source {
        if self.stdin {
            Source::Stdin
        } else if let Some(path) = &self.file {
            Source::File(path.clone())
        } else {
            Source::Url(self.url.clone().unwrap_or_else(|| config.source.points_url.clone()))
        }
    }

    fn shapes_source(&self, config: &Config) -> Option<Source> {
        if let Some(path) = &self.shapes_file {
            Some(Source::File(path.clone()))
        } else if let Some(url) = &self.shapes_url {
            Some(Source::Url(url.clone()))
        } else {
            config.source.shapes_url().map(|url| Source::Url(url.to_string()))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Err(err) = cli.validate() {
        err.exit();
    }

    if cli.debug {
        init_logging(cli.headless)?;
    }

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        // An explicitly named file must load; a broken user file is not fatal.
        Err(err) if cli.config.is_some() => return Err(err),
        Err(err) => {
            tracing::warn!(error = %err, "config load failed, using defaults");
            Config::defaults()
        }
    };
    if let Some(kind) = &cli.marker {
        config.markers.kind = kind.clone();
    }

    let points = cli.points_source(&config);
    let shapes = cli.shapes_source(&config);
    tracing::info!(%points, shapes = ?shapes.as_ref().map(ToString::to_string), "starting");

    if cli.headless {
        let rt = tokio::runtime::Runtime::new()?;
        let collection = rt.block_on(sheetmap::headless::collect(&points, shapes.as_ref()))?;
        println!("{}", serde_json::to_string_pretty(&collection)?);
        return Ok(());
    }

    let (loader, loads) = Loader::new(points, shapes);
    sheetmap_tui::run(config, loader, loads, cli.watch)
}

fn init_logging(headless: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

    // stdout belongs to the TUI (or the GeoJSON), so logs go elsewhere
    if headless {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_env_filter(filter)
            .init();
        return Ok(());
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("/tmp/sheetmap-debug.log")?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    tracing::info!("sheetmap debug log started — tail -f /tmp/sheetmap-debug.log");
    Ok(())
}
