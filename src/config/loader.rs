//! Configuration resolution pipeline.
//!
//! Resolution is a strict linear pipeline. The optional file is read and
//! decoded under a closed schema, `CT_*` variables overwrite decoded
//! values, documented defaults fill whatever is still absent, and the
//! result must pass cross-field validation before anyone sees it. Any
//! stage failure is terminal: nothing is retried and no partially
//! resolved configuration ever escapes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::config::env;
use crate::config::schema::{
    Auth, Config, EgressAuth, Logging, Network, RawConfig, Target, Tenant, Timing,
    DEFAULT_CONCURRENCY, DEFAULT_LISTEN, DEFAULT_LISTEN_METRICS, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_CONNS_PER_HOST, DEFAULT_TARGET_ENDPOINT, DEFAULT_TENANT_HEADER,
    DEFAULT_TENANT_LABEL, DEFAULT_TIMEOUT,
};
use crate::config::validation;

/// Error type for configuration resolution.
///
/// Four terminal classes, one per pipeline stage that can fail.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be opened or read.
    #[error("unable to read config file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is malformed or contains a key outside the schema.
    #[error("unable to parse config file {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// An environment variable's value does not convert to its field's
    /// type.
    #[error("unable to parse environment variable {var}: {message}")]
    EnvParse { var: &'static str, message: String },

    /// A structurally valid configuration that breaks a semantic
    /// invariant.
    #[error("{0}")]
    Validation(String),
}

/// Policy for the `target.insecure_skip_verify` flag.
///
/// Under [`ForceVerify`](SkipVerifyPolicy::ForceVerify) the resolved flag
/// is always `false`: upstream certificate verification stays on no
/// matter what the file or environment asked for.
/// [`Honor`](SkipVerifyPolicy::Honor) resolves the flag as configured,
/// for deployments that terminate TLS with private certificates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkipVerifyPolicy {
    /// Resolve the flag to `false` unconditionally.
    #[default]
    ForceVerify,
    /// Resolve the flag as configured.
    Honor,
}

/// Builder for configuration resolution.
///
/// [`load`] covers the common case; the builder exists for callers that
/// need to adjust policy.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    path: Option<PathBuf>,
    skip_verify: SkipVerifyPolicy,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the config file to read; without one, resolution uses the
    /// environment and defaults alone.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the policy for `target.insecure_skip_verify`.
    pub fn with_skip_verify_policy(mut self, policy: SkipVerifyPolicy) -> Self {
        self.skip_verify = policy;
        self
    }

    /// Run the pipeline: read, decode, overlay, default, validate.
    pub fn load(self) -> Result<Config, ConfigError> {
        let mut raw = match &self.path {
            Some(path) => read_document(path)?,
            None => RawConfig::default(),
        };
        env::overlay(&mut raw)?;
        let config = resolve(raw, self.skip_verify);
        validation::validate(&config)?;
        Ok(config)
    }
}

/// Resolve the gateway configuration from an optional file, the process
/// environment and the documented defaults.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    loader.load()
}

/// Read and strictly decode one YAML document. An empty file is a valid
/// file with nothing set.
fn read_document(path: &Path) -> Result<RawConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Option<RawConfig> =
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(raw.unwrap_or_default())
}

/// Defaulting stage.
///
/// Absence is the only trigger: a field that was explicitly set keeps its
/// value even when that value is empty or zero, and validation judges it
/// afterwards. The tenant label list derives from the label, so the label
/// resolves first.
pub(crate) fn resolve(raw: RawConfig, skip_verify: SkipVerifyPolicy) -> Config {
    let target = raw.target.unwrap_or_default();
    let egress = raw
        .auth
        .unwrap_or_default()
        .egress
        .unwrap_or_default();
    let tenant = raw.tenant.unwrap_or_default();

    let label = tenant
        .label
        .unwrap_or_else(|| DEFAULT_TENANT_LABEL.to_string());
    let label_list = match tenant.label_list {
        Some(list) if !list.is_empty() => list,
        _ => vec![label.clone()],
    };

    let insecure_skip_verify = match skip_verify {
        SkipVerifyPolicy::ForceVerify => false,
        SkipVerifyPolicy::Honor => target.insecure_skip_verify.unwrap_or(false),
    };

    Config {
        network: Network {
            listen: raw.listen.unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            listen_pprof: none_if_empty(raw.listen_pprof),
            listen_metrics: raw
                .listen_metrics_address
                .unwrap_or_else(|| DEFAULT_LISTEN_METRICS.to_string()),
            metrics_include_tenant: raw.metrics_include_tenant.unwrap_or(false),
            enable_ipv6: raw.enable_ipv6.unwrap_or(false),
        },
        target: Target {
            endpoint: target
                .endpoint
                .unwrap_or_else(|| DEFAULT_TARGET_ENDPOINT.to_string()),
            cert_file: none_if_empty(target.cert_file).map(PathBuf::from),
            key_file: none_if_empty(target.key_file).map(PathBuf::from),
            ca_file: none_if_empty(target.ca_file).map(PathBuf::from),
            insecure_skip_verify,
            metadata: raw.metadata.unwrap_or(false),
        },
        timing: Timing {
            timeout: raw.timeout.unwrap_or(DEFAULT_TIMEOUT),
            timeout_shutdown: raw.timeout_shutdown.unwrap_or(Duration::ZERO),
            max_conn_duration: raw.max_conn_duration.unwrap_or(Duration::ZERO),
            concurrency: raw.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
            max_conns_per_host: raw
                .max_conns_per_host
                .unwrap_or(DEFAULT_MAX_CONNS_PER_HOST),
        },
        auth: Auth {
            egress: EgressAuth {
                username: none_if_empty(egress.username),
                password: none_if_empty(egress.password),
            },
        },
        tenant: Tenant {
            label,
            label_list,
            prefix: none_if_empty(tenant.prefix),
            prefix_prefer_source: tenant.prefix_prefer_source.unwrap_or(false),
            label_remove: tenant.label_remove.unwrap_or(false),
            header: tenant
                .header
                .unwrap_or_else(|| DEFAULT_TENANT_HEADER.to_string()),
            default: none_if_empty(tenant.default),
            accept_all: tenant.accept_all.unwrap_or(false),
        },
        logging: Logging {
            level: raw
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_response_errors: raw.log_response_errors.unwrap_or(false),
        },
    }
}

/// Optional strings: explicitly empty is the same as absent.
fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
