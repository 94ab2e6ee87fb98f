use crate::error::Result;
use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::path::Path;

/// Picks the log level: explicit flag first, then `RUST_LOG`, then `warn`.
///
/// The shell prints its own output on stdout, so anything below `warn` stays
/// quiet unless asked for.
pub fn level(explicit: Option<LevelFilter>) -> LevelFilter {
    explicit
        .or_else(|| std::env::var("RUST_LOG").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(LevelFilter::Warn)
}

/// Installs the global logger: colored lines on stderr and, when given, plain
/// lines appended to `log_file`.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let console = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = Dispatch::new()
        .level(level)
        .level_for("rustyline", LevelFilter::Warn)
        .chain(console);

    if let Some(path) = log_file {
        let file = Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} {} {}] {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(fern::log_file(path)?);
        dispatch = dispatch.chain(file);
    }

    dispatch.apply()?;
    log::debug!("Logger initialized at level {}", level);
    Ok(())
}
