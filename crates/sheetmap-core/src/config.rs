//! Configuration types for sheetmap.
//!
//! [`Config::load`] reads `~/.config/sheetmap/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, then layers an optional extra
//! file and `SHEETMAP_*` environment variables on top. [`Config::defaults`]
//! returns the built-in defaults without touching the filesystem (useful in
//! tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[source]
points_url = "https://docs.google.com/spreadsheets/d/e/2PACX-1vRRqlP8nkCcFZYrIh6BWRdUDlCqC0Hka7rcLb0L8BQEbGhqZcoytD5TqZhLwRxCaodoyi0KJ6v2fbe6/pub?output=csv"
shapes_url = ""

[map]
center_lat  = 43.91
center_lon  = 12.92
zoom        = 14
min_zoom    = 1
max_zoom    = 19
basemap     = "high"
attribution = "© OpenStreetMap contributors © CARTO"

[markers]
kind   = "marker"
radius = 100.0

[panel]
id                = "my-info-panel"
placeholder_title = "Select a marker"
position          = "left"
width_pct         = 30
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub markers: MarkersConfig,
    #[serde(default)]
    pub panel: PanelConfig,
}

/// `[source]` section. The published CSV links ("shareable link" form).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub points_url: String,
    /// Empty means no shape layer.
    #[serde(default)]
    pub shapes_url: String,
}

impl SourceConfig {
    pub fn shapes_url(&self) -> Option<&str> {
        Some(self.shapes_url.trim()).filter(|s| !s.is_empty())
    }
}

/// `[map]` section: initial view and basemap.
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u8,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    /// `high`, `low` or `none`.
    #[serde(default = "default_basemap")]
    pub basemap: String,
    #[serde(default)]
    pub attribution: String,
}

fn default_center_lat() -> f64 { 43.91 }
fn default_center_lon() -> f64 { 12.92 }
fn default_zoom() -> u8 { 14 }
fn default_min_zoom() -> u8 { 1 }
fn default_max_zoom() -> u8 { 19 }
fn default_basemap() -> String { "high".to_string() }

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lon: default_center_lon(),
            zoom: default_zoom(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            basemap: default_basemap(),
            attribution: String::new(),
        }
    }
}

/// `[markers]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkersConfig {
    /// `marker`, `circleMarker` or `circle` (case-sensitive). Anything else
    /// renders as `marker`.
    #[serde(default = "default_marker_kind")]
    pub kind: String,
    /// Screen pixels for `circleMarker` (8 per cell column), metres for
    /// `circle`; ignored for `marker`.
    #[serde(default = "default_marker_radius")]
    pub radius: f64,
}

fn default_marker_kind() -> String { "marker".to_string() }
fn default_marker_radius() -> f64 { 100.0 }

impl Default for MarkersConfig {
    fn default() -> Self {
        Self { kind: default_marker_kind(), radius: default_marker_radius() }
    }
}

/// `[panel]` section: the side panel shown on marker click.
#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_panel_id")]
    pub id: String,
    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,
    /// `left` or `right`.
    #[serde(default = "default_panel_position")]
    pub position: String,
    #[serde(default = "default_panel_width_pct")]
    pub width_pct: u16,
}

fn default_panel_id() -> String { "my-info-panel".to_string() }
fn default_placeholder_title() -> String { "Select a marker".to_string() }
fn default_panel_position() -> String { "left".to_string() }
fn default_panel_width_pct() -> u16 { 30 }

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            id: default_panel_id(),
            placeholder_title: default_placeholder_title(),
            position: default_panel_position(),
            width_pct: default_panel_width_pct(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/sheetmap/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    /// `extra` is layered after the user file; environment variables
    /// (`SHEETMAP_MAP__ZOOM=12`) win over both.
    pub fn load(extra: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_from(&config_path(), extra, environment())
    }

    fn load_from(
        path: &Path,
        extra: Option<&Path>,
        env: config::Environment,
    ) -> anyhow::Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, DEFAULT_CONFIG.trim_start())?;
        }

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false));
        if let Some(extra) = extra {
            builder = builder.add_source(config::File::from(extra).required(true));
        }

        builder
            .add_source(env)
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Load defaults plus a single TOML string, without touching the filesystem.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `SHEETMAP_<SECTION>__<KEY>`: one underscore after the prefix, two between
/// section and key.
fn environment() -> config::Environment {
    config::Environment::with_prefix("SHEETMAP")
        .prefix_separator("_")
        .separator("__")
}

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("sheetmap")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
