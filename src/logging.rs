use std::fs::File;
use std::ops::Deref;
use std::panic::PanicHookInfo;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::ensure_parent_dir;
use crate::error::AppError;

/// Routes `log` output to `path`. The terminal belongs to the game, so
/// nothing is ever written to stdout or stderr.
pub fn setup(path: &Path, debug: bool) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path)?;

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    WriteLogger::init(level, config, file)?;
    Ok(())
}

/// Logs a panic's location and message at error level.
pub fn log_panic(panic_info: &PanicHookInfo<'_>) {
    let (filename, line) = panic_info
        .location()
        .map(|loc| (loc.file(), loc.line()))
        .unwrap_or(("<unknown>", 0));

    let cause = panic_info
        .payload()
        .downcast_ref::<String>()
        .map(String::deref);

    let cause = cause.unwrap_or_else(|| {
        panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .unwrap_or("<cause unknown>")
    });

    log::error!("panic at {filename}:{line}: {cause}");
}
