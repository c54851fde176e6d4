use std::fmt;
use std::fmt::Formatter;

use thiserror::Error;

/// Errors raised before any DP work starts: a malformed parameter block or
/// activity table. Surfaced synchronously, never retried by the engine.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("bad parameter: {0}")]
    BadParameter(String),
    #[error("activity table missing dawn/dusk anchor: {0}")]
    MissingAnchor(String),
    #[error("activity row {0} invalid: {1}")]
    BadRow(usize, String),
}

/// Raised when the label arena cannot grow further during a solve.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("label arena exhausted after {0} labels")]
    ArenaExhausted(usize),
}

/// Errors raised while reading or writing CSV-formatted activity tables and
/// schedules.
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {0}: {1}")]
    BadRow(usize, String),
}

/// Errors raised while loading the TOML configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("log configuration error: {0}")]
    Log(String),
}

impl From<log4rs::config::runtime::ConfigErrors> for ConfigError {
    fn from(e: log4rs::config::runtime::ConfigErrors) -> Self {
        ConfigError::Log(e.to_string())
    }
}
impl From<log::SetLoggerError> for ConfigError {
    fn from(e: log::SetLoggerError) -> Self {
        ConfigError::Log(e.to_string())
    }
}

/// Outcome of one DP solve: either a reconstructed schedule was found, or
/// the instance was infeasible. Infeasibility is a normal return value, not
/// an error; this is a marker type used by the driver and DSSR controller
/// to distinguish "no label reached dusk" from a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Infeasible;

impl fmt::Display for Infeasible {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "no label reached dusk within the horizon")
    }
}

/// Top-level error combining everything that can go wrong running one
/// schedule solve, from config loading through reconstruction.
pub struct EngineError {
    msg: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl EngineError {
    pub fn new(msg: impl Into<String>) -> Self {
        EngineError { msg: msg.into(), source: None }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "EngineError: {}", self.msg)
    }
}

impl fmt::Debug for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "EngineError({})", self.msg)
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<InputError> for EngineError {
    fn from(e: InputError) -> Self {
        EngineError { msg: e.to_string(), source: Some(Box::new(e)) }
    }
}
impl From<ResourceError> for EngineError {
    fn from(e: ResourceError) -> Self {
        EngineError { msg: e.to_string(), source: Some(Box::new(e)) }
    }
}
impl From<CsvError> for EngineError {
    fn from(e: CsvError) -> Self {
        EngineError { msg: e.to_string(), source: Some(Box::new(e)) }
    }
}
impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError { msg: e.to_string(), source: Some(Box::new(e)) }
    }
}
