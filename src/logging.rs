// File: ./src/logging.rs
// Logger setup for the binary: warnings to stderr, everything at the
// configured level to `<data_dir>/sheetcal.log`.
use crate::context::AppContext;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::OpenOptions;
use std::sync::OnceLock;

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs the global logger. Only the first call has an effect.
///
/// Failures (unwritable log file, another logger already set) are reported
/// on stderr and otherwise ignored; logging is never fatal.
pub fn init(ctx: &dyn AppContext, level: LevelFilter) {
    if INITIALIZED.set(()).is_err() {
        return;
    }

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn.min(level),
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = ctx.get_log_path() {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(e) => eprintln!("Warning: could not open log file {}: {}", path.display(), e),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Warning: could not initialize logging: {}", e);
        return;
    }

    log::info!(
        "sheetcal v{} started (log level {})",
        env!("CARGO_PKG_VERSION"),
        level
    );
}
