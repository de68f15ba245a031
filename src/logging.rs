//! Diagnostics go to stderr through `tracing`; stdout carries the command
//! output from [`crate::output`]. `RUST_LOG` overrides the default `info`
//! filter.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("build log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("initialize tracing subscriber: {0}")]
    Init(String),
}

pub fn init() -> Result<(), LoggingError> {
    init_with_default("info")
}

/// Like [`init`], with `default_filter` used when `RUST_LOG` is unset or
/// invalid.
pub fn init_with_default(default_filter: &str) -> Result<(), LoggingError> {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::try_new(default_filter)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| LoggingError::Init(err.to_string()))?;

    Ok(())
}
