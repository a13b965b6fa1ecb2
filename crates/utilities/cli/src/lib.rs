#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod tracing;
pub use tracing::{LogFormat, init_test_tracing};

use ::tracing::level_filters::LevelFilter;

/// Global logging arguments.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub struct LogArgs {
    /// Verbosity level (0-5). `0` disables logging, `3` is info.
    #[arg(
        long = "verbosity",
        short = 'v',
        global = true,
        default_value_t = 3,
        env = "XDM_VERBOSITY",
        value_parser = clap::value_parser!(u8).range(0..=5),
    )]
    pub level: u8,
    /// Format of the logs written to stdout.
    #[arg(long = "logs.stdout.format", global = true, default_value = "full")]
    pub stdout_format: LogFormat,
    /// Disables logging to stdout.
    #[arg(long = "logs.stdout.quiet", short = 'q', global = true)]
    pub stdout_quiet: bool,
}

impl Default for LogArgs {
    fn default() -> Self {
        Self { level: 3, stdout_format: LogFormat::Full, stdout_quiet: false }
    }
}

/// Configuration of the stdout log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StdoutLogConfig {
    /// The format of the logs.
    pub format: LogFormat,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Level applied on top of the environment filter.
    pub global_level: LevelFilter,
    /// The stdout layer, if enabled.
    pub stdout_logs: Option<StdoutLogConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(LogArgs::default())
    }
}

impl LogConfig {
    /// Resolves [LogArgs] into a [LogConfig].
    pub fn new(args: LogArgs) -> Self {
        let global_level = match args.level {
            0 => LevelFilter::OFF,
            1 => LevelFilter::ERROR,
            2 => LevelFilter::WARN,
            3 => LevelFilter::INFO,
            4 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        let stdout_logs =
            (!args.stdout_quiet).then_some(StdoutLogConfig { format: args.stdout_format });

        Self { global_level, stdout_logs }
    }
}
