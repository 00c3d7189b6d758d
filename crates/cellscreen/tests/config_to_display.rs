//! Configuration file through to an unstarted display.

use std::io::Write;

use cellscreen::{open_display, BackendKind, CellscreenConfig, DisplayError, Toggle};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn terminal_config_file_opens_terminal_display() {
    let file = write_config(
        r#"
backend = "terminal"

[terminal]
italic = "off"
report_focus = false
"#,
    );
    let config = CellscreenConfig::load(file.path()).unwrap();
    assert_eq!(config.backend, BackendKind::Terminal);
    assert_eq!(config.terminal.italic, Toggle::Off);

    let display = open_display(&config).unwrap();
    assert_eq!(display.screen_size(), (0, 0));
}

#[test]
fn window_settings_file_is_read() {
    let file = write_config(
        r#"
backend = "window"

[window]
title = "editor"
settings_file = "/tmp/cellscreen-window.toml"
font_size = 20.0
"#,
    );
    let config = CellscreenConfig::load(file.path()).unwrap();
    assert_eq!(config.backend, BackendKind::Window);
    assert_eq!(config.window.title, "editor");
    assert!(config.window.settings_file.is_some());
}

#[test]
fn unknown_keys_are_config_errors() {
    let file = write_config("backend = \"terminal\"\ncolour = true\n");
    assert!(matches!(
        CellscreenConfig::load(file.path()),
        Err(DisplayError::Config(_))
    ));
}

#[test]
fn missing_config_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("cellscreen.toml");
    assert!(matches!(
        CellscreenConfig::load(&missing),
        Err(DisplayError::Config(_))
    ));
}
