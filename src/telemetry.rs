//! Tracing setup.
//!
//! The terminal belongs to the TUI, so logs only go to a file:
//! - `ECO_QUIZ_LOG` sets the filter (default `info,eco_quiz=debug`).
//! - `ECO_QUIZ_LOG_FORMAT=json` switches to JSON lines.
//!
//! Without a log file no subscriber is installed.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub fn init_tracing(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env("ECO_QUIZ_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info,eco_quiz=debug"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    match std::env::var("ECO_QUIZ_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
    Ok(())
}
