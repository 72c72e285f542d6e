// ABOUTME: Log level names accepted by the CLI and the env_logger setup they drive.
// ABOUTME: Nine named levels collapse onto log's five filters; output is one compact coloured line per record.

use std::io::Write;

use clap::ValueEnum;
use log::LevelFilter;

/// Log levels selectable with `--log-level`, most verbose first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Spam,
    Debug,
    Verbose,
    Info,
    Notice,
    Warning,
    Success,
    Error,
    Critical,
}

impl LogLevel {
    /// The most verbose `log` filter that still hides every record below
    /// this level. Names that fall between two `log` levels round up.
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Spam => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Verbose | LogLevel::Info => LevelFilter::Info,
            LogLevel::Notice | LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Success | LogLevel::Error | LogLevel::Critical => LevelFilter::Error,
        }
    }
}

/// Install the global logger. `RUST_LOG` directives, when set, are layered
/// on top of `level`.
pub fn init(level: LogLevel) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level.filter())
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let letter = record.level().as_str().chars().next().unwrap_or('?');
            writeln!(
                buf,
                "{style}({}){style:#} {:<16} | {}",
                letter,
                record.target(),
                record.args()
            )
        });
    if let Err(e) = builder.try_init() {
        eprintln!("warning: logger not installed: {}", e);
    }
}
