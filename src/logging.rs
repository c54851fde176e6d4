use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

use ev_schedule_dp::errors::ConfigError;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} [{M}] {m}{n}";

/// Configures the global logger: a file appender always on, a console
/// appender when `log_to_stdout` is set, both at `log_level`.
///
/// # Arguments
///
/// * 'log_path' - path to the log file
/// * 'log_level' - minimum level to record
/// * 'log_to_stdout' - whether to also echo log lines to stdout
pub fn setup_logger(log_path: &str, log_level: LevelFilter, log_to_stdout: bool) -> Result<log4rs::Handle, ConfigError> {
    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(log_path)?;

    let mut builder = LogConfig::builder().appender(Appender::builder().build("file", Box::new(file_appender)));
    let mut root_builder = Root::builder().appender("file");

    if log_to_stdout {
        let stdout = ConsoleAppender::builder().encoder(Box::new(PatternEncoder::new(PATTERN))).build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root_builder = root_builder.appender("stdout");
    }

    let config = builder.build(root_builder.build(log_level))?;
    let handle = log4rs::init_config(config)?;

    Ok(handle)
}
