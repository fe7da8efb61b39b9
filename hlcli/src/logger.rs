use std::time::SystemTime;

use colored::Colorize;
use log::{Level, LevelFilter};

/// Stderr logger: timestamp, level, target, message.
pub struct Logger {
    level: LevelFilter,
}

impl Logger {
    /// Install as the global logger. Safe to call once per process.
    pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(Logger { level }))?;
        log::set_max_level(level);
        Ok(())
    }
}

/// Default info; `-v` debug, `-vv` trace. `-q` (warnings only) wins over `-v`.
pub fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let time = humantime::format_rfc3339_millis(SystemTime::now());
        let level = format!("{:5}", record.level());
        let level = match record.level() {
            Level::Trace => level.purple(),
            Level::Debug => level.blue(),
            Level::Info => level.green(),
            Level::Warn => level.yellow(),
            Level::Error => level.red(),
        };

        eprintln!(
            "{} {} {}{} {}",
            time.to_string().dimmed(),
            level.bold(),
            record.target().bold(),
            ":".dimmed(),
            record.args()
        );
    }

    fn flush(&self) {}
}
