//! Structured logging bootstrap.
//!
//! # Responsibilities
//! - Turn the resolved log level into a tracing filter
//! - Install the global subscriber exactly once, after resolution
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Events go to stderr; stdout stays clean for command output

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::schema::Logging;

/// Error installing the global tracing subscriber.
#[derive(Debug, Error)]
pub enum InitError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log level {level:?}: {source}")]
    Level {
        level: String,
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already installed.
    #[error("unable to install logger: {0}")]
    Install(#[from] TryInitError),
}

/// Install the global tracing subscriber.
///
/// The level is a free-form `EnvFilter` directive: `warn`, `debug`, or a
/// full directive list like `info,hyper=warn`.
pub fn init(logging: &Logging) -> Result<(), InitError> {
    let filter = EnvFilter::try_new(&logging.level).map_err(|source| InitError::Level {
        level: logging.level.clone(),
        source,
    })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
