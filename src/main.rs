use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use mindmap::cli::commands::Cli;
use mindmap::cli::handlers;
use mindmap::io::config_io;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("MINDMAP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// The TUI owns the terminal, so its logs go to a file beside the map
fn init_file_logging(map_path: &Path) {
    let log_path = config_io::map_dir(map_path).join(".mindmap.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);
    if let Ok(file) = file {
        fmt()
            .with_env_filter(env_filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }
}

fn init_stderr_logging() {
    fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        None => {
            // No subcommand → launch TUI
            handlers::map_path(cli.file.as_deref())
                .map_err(Into::into)
                .and_then(|path| {
                    init_file_logging(&path);
                    mindmap::tui::run(&path)
                })
        }
        Some(_) => {
            init_stderr_logging();
            handlers::dispatch(cli)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
