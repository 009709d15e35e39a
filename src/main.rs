//! kilo - a minimal raw-mode terminal editor
//!
//! kilo switches the terminal into raw mode, draws a full-screen frame of
//! `~` markers with a welcome banner, and lets the cursor roam the screen.
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Arrow keys | Move the cursor |
//! | Home / End | Jump to the left / right edge |
//! | Page Up / Page Down | Jump to the top / bottom edge |
//! | Ctrl+Q | Quit |
//!
//! # Architecture
//!
//! ```text
//! main
//! └── run
//!     ├── RawModeGuard      (termios, restored on drop)
//!     ├── viewport_size     (ioctl, cursor-probe fallback)
//!     └── loop
//!         ├── Editor::refresh_screen   (FrameBuffer -> one write)
//!         └── Editor::process_keypress (read_key -> cursor / quit)
//! ```

#[cfg(not(unix))]
compile_error!("kilo requires a Unix terminal");

mod config;
mod core;
mod editor;
mod error;
mod ui;

use std::env;

use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use crate::config::{Config, LogConfig};
use crate::core::{viewport_size, RawModeGuard, TtyReader, TtyWriter};
use crate::editor::{Action, Editor};
use crate::ui::{clear_screen, VERSION};

fn print_version() {
    eprintln!("kilo {}", VERSION);
}

fn print_help() {
    eprintln!("kilo {} - a minimal raw-mode terminal editor", VERSION);
    eprintln!();
    eprintln!("Usage: kilo [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Arrow keys            Move the cursor");
    eprintln!("  Home / End            Jump to the left / right edge");
    eprintln!("  Page Up / Page Down   Jump to the top / bottom edge");
    eprintln!("  Ctrl+Q                Quit");
    eprintln!();
    eprintln!("Configuration: ~/.kilo/config.toml");
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
enum Command {
    Run,
    Help,
    Version,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let mut command = Command::Run;
    for arg in args.into_iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => command = Command::Help,
            "-v" | "--version" => command = Command::Version,
            other => return Err(format!("Unknown option: {}", other)),
        }
    }
    Ok(command)
}

/// Send tracing output to the log file; the terminal belongs to the editor.
fn init_logging(log: &LogConfig) {
    if !log.enabled {
        return;
    }

    let path = log.path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(log.max_level())
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    match parse_args(env::args()) {
        Ok(Command::Run) => {}
        Ok(Command::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Command::Version) => {
            print_version();
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    }

    let config = Config::load();
    init_logging(&config.log);
    info!("kilo {} starting...", VERSION);

    if let Err(e) = run() {
        // Raw mode is already restored here; leave a readable screen behind
        let _ = clear_screen(&mut TtyWriter);
        error!("Fatal error in {}: {}", e.operation(), e);
        return Err(e.into());
    }

    info!("kilo exited");
    Ok(())
}

/// Run the editor until Ctrl+Q or a fatal error.
///
/// The raw mode guard lives for the whole call, so the terminal is restored
/// on every way out of here.
fn run() -> error::Result<()> {
    let _raw_mode = RawModeGuard::enable()?;

    let mut input = TtyReader::new();
    let mut out = TtyWriter;

    let viewport = viewport_size(&mut out, &mut input)?;
    let mut editor = Editor::new(viewport);

    loop {
        editor.refresh_screen(&mut out)?;

        if editor.process_keypress(&mut input)? == Action::Quit {
            clear_screen(&mut out)?;
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("kilo")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(args(&[])), Ok(Command::Run));
        assert_eq!(parse_args(args(&["-h"])), Ok(Command::Help));
        assert_eq!(parse_args(args(&["--version"])), Ok(Command::Version));
        assert!(parse_args(args(&["--shell", "sh"])).is_err());
    }
}
