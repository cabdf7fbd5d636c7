//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Cross-field invariants (credential pairing, non-empty addresses)
//! - Value ranges (timeout, concurrency, per-host cap strictly positive)
//! - Filesystem existence of referenced TLS material (stat only)
//!
//! # Design Decisions
//! - Pure function over the resolved entity: Config → Result<(), ConfigError>
//! - First violation wins; the caller gets one descriptive error
//! - Runs after defaulting, so explicitly-set empty and zero values are
//!   judged here rather than silently replaced

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::loader::ConfigError;
use crate::config::schema::Config;

/// Check every invariant a resolved configuration must satisfy.
pub(crate) fn validate(config: &Config) -> Result<(), ConfigError> {
    require_non_empty("listen address", &config.network.listen)?;
    require_non_empty("metrics listen address", &config.network.listen_metrics)?;
    require_non_empty("target endpoint", &config.target.endpoint)?;
    require_non_empty("tenant label", &config.tenant.label)?;
    require_non_empty("tenant header", &config.tenant.header)?;

    require_positive_duration("timeout", config.timing.timeout)?;
    require_positive("concurrency", config.timing.concurrency)?;
    require_positive("max_conns_per_host", config.timing.max_conns_per_host)?;

    if config.tenant.label_list.is_empty() {
        return Err(ConfigError::Validation(
            "tenant label list must not be empty".to_string(),
        ));
    }
    if config.tenant.label_list.iter().any(|label| label.is_empty()) {
        return Err(ConfigError::Validation(
            "tenant label list contains an empty label".to_string(),
        ));
    }

    if let Some(path) = &config.target.cert_file {
        require_file("cert", path)?;
    }
    if let Some(path) = &config.target.key_file {
        require_file("key", path)?;
    }
    if let Some(path) = &config.target.ca_file {
        require_file("CA", path)?;
    }

    let egress = &config.auth.egress;
    if egress.username.is_some() && egress.password.is_none() {
        return Err(ConfigError::Validation(
            "egress auth user specified, but the password is not".to_string(),
        ));
    }

    Ok(())
}

fn require_non_empty(what: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{what} must not be empty")));
    }
    Ok(())
}

fn require_positive(what: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{what} must be greater than zero"
        )));
    }
    Ok(())
}

fn require_positive_duration(what: &str, value: Duration) -> Result<(), ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::Validation(format!(
            "{what} must be greater than zero"
        )));
    }
    Ok(())
}

/// Stat a referenced TLS file. Existence only; content is the TLS
/// layer's problem.
fn require_file(kind: &str, path: &Path) -> Result<(), ConfigError> {
    if let Err(err) = fs::metadata(path) {
        return Err(ConfigError::Validation(format!(
            "unable to find {kind} file {}: {err}",
            path.display()
        )));
    }
    Ok(())
}
