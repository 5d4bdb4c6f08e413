// Tue Jan 13 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Installs the crate's stderr logger. The library itself only emits through
/// the `log` facade; hosts that already have a logger never need this.
pub struct LoggingUtils;

impl LoggingUtils {
    /// Returns `false` if another logger was already installed.
    pub fn init_logger(level: LevelFilter) -> bool {
        Self::init_logger_with_color(level, true)
    }

    pub fn init_logger_with_color(level: LevelFilter, use_color: bool) -> bool {
        let logger = Box::new(ColoredLogger::new(level, use_color));
        let installed = log::set_boxed_logger(logger).is_ok();
        if installed {
            log::set_max_level(level);
        }
        installed
    }

    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }

    pub fn level_from_verbosity(verbosity: usize) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

struct ColoredLogger {
    level: LevelFilter,
    use_color: bool,
}

impl ColoredLogger {
    fn new(level: LevelFilter, use_color: bool) -> Self {
        Self { level, use_color }
    }

    fn format_level(&self, level: Level) -> String {
        if !self.use_color {
            return format!("{:5}", level);
        }
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
        .to_string()
    }

    fn format_record(&self, record: &Record) -> String {
        let target = format!("[{}]", record.target());
        let target = if self.use_color {
            target.dimmed().to_string()
        } else {
            target
        };
        format!("{} {} {}", self.format_level(record.level()), target, record.args())
    }
}

impl Log for ColoredLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", self.format_record(record));
        }
    }

    fn flush(&self) {}
}
