//! cellscreen-keys: show the name of every key pressed
//!
//! Run: cargo run -p cellscreen --bin cellscreen-keys [-- --backend window]
//!
//! Press `q` to quit.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use cellscreen::telemetry::init_tracing;
use cellscreen::{open_display, Attr, BackendKind, CellscreenConfig, Display, Key, Result};
use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    Terminal,
    Window,
}

impl From<Backend> for BackendKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Terminal => Self::Terminal,
            Backend::Window => Self::Window,
        }
    }
}

/// Print the cellscreen name of each key as it arrives
#[derive(Parser)]
#[command(name = "cellscreen-keys", version, about, long_about = None)]
struct Cli {
    /// Path to a cellscreen.toml (default: platform config dir)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the configured backend
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Report KEY_TIMEOUT after this many idle milliseconds (0 waits forever)
    #[arg(long, default_value = "0")]
    timeout_ms: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _telemetry = init_tracing("warn");

    let config = match &cli.config {
        Some(path) => CellscreenConfig::load(path),
        None => CellscreenConfig::load_default(),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cellscreen-keys: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }

    let timeout = (cli.timeout_ms > 0).then(|| Duration::from_millis(cli.timeout_ms));
    let mut display = match open_display(&config) {
        Ok(display) => display,
        Err(e) => {
            eprintln!("cellscreen-keys: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = display.start() {
        eprintln!("cellscreen-keys: {e}");
        return ExitCode::FAILURE;
    }

    let result = run(display.as_mut(), timeout);
    display.shutdown();

    match result {
        Ok(count) => {
            eprintln!("cellscreen-keys: {count} keys");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("cellscreen-keys: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(display: &mut dyn Display, timeout: Option<Duration>) -> Result<usize> {
    let mut log: Vec<String> = Vec::new();
    let mut count = 0;
    loop {
        draw(display, &log);
        display.sync()?;

        let key = display.get_key(timeout)?;
        if key == Key::char('q') {
            return Ok(count);
        }
        count += 1;
        log.insert(0, format!("{:>8}  {}", key.value(), display.key_name(key)));
        log.truncate(usize::from(display.screen_size().1));
    }
}

fn draw(display: &mut dyn Display, log: &[String]) {
    display.set_attributes(Attr::NONE, Attr::NONE);
    display.clear_screen();

    display.set_attributes(Attr::NONE, Attr::BOLD | Attr::UNDERLINE);
    put(display, 0, "cellscreen-keys: press keys, q to quit");

    for (row, line) in log.iter().enumerate() {
        let attr = if row == 0 { Attr::BRIGHT } else { Attr::DIM };
        display.set_attributes(Attr::NONE, attr);
        put(display, row as i32 + 2, line);
    }
    display.set_attributes(Attr::NONE, Attr::NONE);
    display.set_cursor(0, 1);
}

fn put(display: &mut dyn Display, y: i32, text: &str) {
    for (x, ch) in text.chars().enumerate() {
        display.write_char(x as i32, y, ch);
    }
}
