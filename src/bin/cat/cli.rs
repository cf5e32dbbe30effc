//! # Cli
//!
//! Everything needed for parsing the CLI arguments of the Cat transpiler.

use clap::{Parser, ValueEnum};

/// Struct containing the CLI configuration for the Cat transpiler.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The Cat source file to transpile, or '-' to read from stdin. Starts an
    /// interactive REPL when omitted.
    #[arg(index = 1)]
    pub file: Option<std::path::PathBuf>,

    /// Write the emitted assembly to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,

    /// Run the emitted assembly on the MIPS simulator after transpiling.
    #[arg(long)]
    pub run: bool,

    /// Specify the log level of the transpiler.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Enum for specifying the log level of the transpiler.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// A log level, where also warnings are logged.
    #[value(alias("1"))]
    Warn,

    /// Also log information about the general state of the transpiler, e.g.,
    /// which files are written.
    #[value(alias("2"))]
    Info,

    /// Log everything which happens internally, including every register
    /// allocation. This output can be quite clunky.
    #[value(alias("3"))]
    Debug,

    /// Log extra information beyond the debug output.
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
