//! Display configuration (`cellscreen.toml`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DisplayError, Result};

/// Which backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Cell-addressed terminal.
    #[default]
    Terminal,
    /// Pixel window emulating a character grid.
    Window,
}

/// Tri-state capability switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    /// Detect from the environment.
    #[default]
    Auto,
    /// Force on.
    On,
    /// Force off.
    Off,
}

/// Terminal backend options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerminalConfig {
    /// Italic rendering; falls back to bold when off or undetected.
    pub italic: Toggle,
    /// Ask the terminal for focus events (delivered as `REDRAW`).
    pub report_focus: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            italic: Toggle::Auto,
            report_focus: true,
        }
    }
}

/// Window backend options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Where font and geometry are persisted. `None` keeps them in memory.
    pub settings_file: Option<PathBuf>,
    /// Font used by the rasterizing glyph cache.
    pub font_file: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "cellscreen".to_string(),
            settings_file: None,
            font_file: None,
            font_size: 16.0,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CellscreenConfig {
    /// Backend to open.
    pub backend: BackendKind,
    /// `[terminal]` table.
    pub terminal: TerminalConfig,
    /// `[window]` table.
    pub window: WindowConfig,
}

impl CellscreenConfig {
    /// Default config file name.
    pub const CONFIG_FILE: &'static str = "cellscreen.toml";

    /// Parse from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| DisplayError::Config(e.to_string()))
    }

    /// Serialize to a TOML string.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Load from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DisplayError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// `<config dir>/cellscreen/cellscreen.toml`, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cellscreen").join(Self::CONFIG_FILE))
    }

    /// Load from [`Self::default_path`], falling back to defaults when the
    /// file is missing. A file that exists but does not parse is an error.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading display config");
                Self::load(&path)
            }
            _ => {
                debug!("no display config file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = CellscreenConfig::default();
        assert_eq!(cfg.backend, BackendKind::Terminal);
        assert_eq!(cfg.terminal.italic, Toggle::Auto);
        assert!(cfg.terminal.report_focus);
        assert_eq!(cfg.window.title, "cellscreen");
        assert!((cfg.window.font_size - 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_string_is_default() {
        let cfg = CellscreenConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, CellscreenConfig::default());
    }

    #[test]
    fn test_parse_full() {
        let cfg = CellscreenConfig::from_toml_str(
            r#"
backend = "window"

[terminal]
italic = "off"
report_focus = false

[window]
title = "editor"
settings_file = "/tmp/window.toml"
font_size = 20.0
"#,
        )
        .unwrap();
        assert_eq!(cfg.backend, BackendKind::Window);
        assert_eq!(cfg.terminal.italic, Toggle::Off);
        assert!(!cfg.terminal.report_focus);
        assert_eq!(cfg.window.title, "editor");
        assert_eq!(
            cfg.window.settings_file.as_deref(),
            Some(Path::new("/tmp/window.toml"))
        );
        assert!(cfg.window.font_file.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = CellscreenConfig::from_toml_str("colour = true").unwrap_err();
        assert!(matches!(err, DisplayError::Config(_)));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = CellscreenConfig::from_toml_str("backend = \"framebuffer\"").unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut cfg = CellscreenConfig::default();
        cfg.backend = BackendKind::Window;
        cfg.terminal.italic = Toggle::On;
        let parsed = CellscreenConfig::from_toml_str(&cfg.to_toml()).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[terminal]\nitalic = \"on\"").unwrap();
        let cfg = CellscreenConfig::load(file.path()).unwrap();
        assert_eq!(cfg.terminal.italic, Toggle::On);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CellscreenConfig::load(Path::new("/nonexistent/cellscreen.toml")).unwrap_err();
        assert!(matches!(err, DisplayError::Config(_)));
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = CellscreenConfig::default_path() {
            assert!(path.ends_with("cellscreen/cellscreen.toml"));
        }
    }
}
