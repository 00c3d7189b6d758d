//! Persisted font choice and window geometry.
//!
//! Persistence never fails the caller: unreadable settings load as defaults,
//! failed writes are logged and dropped.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::{FontDescriptor, WindowGeometry};

/// Where the window backend keeps its font and geometry.
pub trait SettingsStore {
    fn load_font(&self) -> Option<FontDescriptor>;
    fn store_font(&mut self, font: &FontDescriptor);
    fn load_geometry(&self) -> Option<WindowGeometry>;
    fn store_geometry(&mut self, geometry: &WindowGeometry);
    /// Forget the stored geometry so the next window opens at the default place.
    fn clear_geometry(&mut self);
}

impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    fn load_font(&self) -> Option<FontDescriptor> {
        (**self).load_font()
    }

    fn store_font(&mut self, font: &FontDescriptor) {
        (**self).store_font(font);
    }

    fn load_geometry(&self) -> Option<WindowGeometry> {
        (**self).load_geometry()
    }

    fn store_geometry(&mut self, geometry: &WindowGeometry) {
        (**self).store_geometry(geometry);
    }

    fn clear_geometry(&mut self) {
        (**self).clear_geometry();
    }
}

/// On-disk layout of the settings file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub font: Option<FontDescriptor>,
    pub geometry: Option<WindowGeometry>,
}

/// Settings kept in memory only.
#[derive(Clone, Debug, Default)]
pub struct MemorySettingsStore {
    settings: WindowSettings,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with existing settings.
    #[must_use]
    pub const fn with_settings(settings: WindowSettings) -> Self {
        Self { settings }
    }

    /// Current contents.
    #[must_use]
    pub const fn settings(&self) -> &WindowSettings {
        &self.settings
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load_font(&self) -> Option<FontDescriptor> {
        self.settings.font.clone()
    }

    fn store_font(&mut self, font: &FontDescriptor) {
        self.settings.font = Some(font.clone());
    }

    fn load_geometry(&self) -> Option<WindowGeometry> {
        self.settings.geometry
    }

    fn store_geometry(&mut self, geometry: &WindowGeometry) {
        self.settings.geometry = Some(*geometry);
    }

    fn clear_geometry(&mut self) {
        self.settings.geometry = None;
    }
}

/// Settings in a TOML file, re-read on every load.
#[derive(Clone, Debug)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    /// Default settings file name.
    pub const SETTINGS_FILE: &'static str = "window.toml";

    /// Store backed by `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/cellscreen/window.toml`, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cellscreen").join(Self::SETTINGS_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file; any failure yields defaults.
    #[must_use]
    pub fn read(&self) -> WindowSettings {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no window settings");
                return WindowSettings::default();
            }
        };
        toml::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring unreadable window settings");
            WindowSettings::default()
        })
    }

    fn write(&self, settings: &WindowSettings) {
        if let Err(e) = self.try_write(settings) {
            warn!(path = %self.path.display(), error = %e, "could not save window settings");
        }
    }

    fn try_write(&self, settings: &WindowSettings) -> std::io::Result<()> {
        let contents = toml::to_string_pretty(settings)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, contents)
    }

    fn update(&self, f: impl FnOnce(&mut WindowSettings)) {
        let mut settings = self.read();
        f(&mut settings);
        self.write(&settings);
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load_font(&self) -> Option<FontDescriptor> {
        self.read().font
    }

    fn store_font(&mut self, font: &FontDescriptor) {
        self.update(|s| s.font = Some(font.clone()));
    }

    fn load_geometry(&self) -> Option<WindowGeometry> {
        self.read().geometry
    }

    fn store_geometry(&mut self, geometry: &WindowGeometry) {
        self.update(|s| s.geometry = Some(*geometry));
    }

    fn clear_geometry(&mut self) {
        self.update(|s| s.geometry = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn geometry() -> WindowGeometry {
        WindowGeometry {
            x: 40,
            y: 30,
            width: 800,
            height: 600,
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemorySettingsStore::new();
        assert!(store.load_font().is_none());
        store.store_geometry(&geometry());
        assert_eq!(store.load_geometry(), Some(geometry()));
        store.clear_geometry();
        assert!(store.load_geometry().is_none());
    }

    #[test]
    fn test_toml_store_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("absent.toml"));
        assert_eq!(store.read(), WindowSettings::default());
    }

    #[test]
    fn test_toml_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("window.toml");
        let mut store = TomlSettingsStore::new(&path);
        let font = FontDescriptor {
            size: 22.0,
            ..FontDescriptor::default()
        };
        store.store_font(&font);
        store.store_geometry(&geometry());

        let reopened = TomlSettingsStore::new(&path);
        assert_eq!(reopened.load_font(), Some(font));
        assert_eq!(reopened.load_geometry(), Some(geometry()));
    }

    #[test]
    fn test_toml_store_clear_keeps_font() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlSettingsStore::new(dir.path().join("w.toml"));
        store.store_font(&FontDescriptor::default());
        store.store_geometry(&geometry());
        store.clear_geometry();
        assert!(store.load_geometry().is_none());
        assert!(store.load_font().is_some());
    }

    #[test]
    fn test_toml_store_garbage_is_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("w.toml");
        std::fs::write(&path, "geometry = [[[").unwrap();
        let store = TomlSettingsStore::new(&path);
        assert!(store.load_geometry().is_none());
    }

    #[test]
    fn test_toml_store_write_failure_is_ignored() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be: the write fails.
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();
        let mut store = TomlSettingsStore::new(&path);
        store.store_geometry(&geometry());
        assert!(store.load_geometry().is_none());
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn SettingsStore> = Box::new(MemorySettingsStore::new());
        store.store_font(&FontDescriptor::default());
        assert!(store.load_font().is_some());
    }
}
