//! Configuration document model.
//!
//! Two shapes of the same data live here. [`RawConfig`] mirrors the YAML
//! file one to one: every field is presence-tracked with `Option`, nothing
//! is defaulted, and unknown keys fail the decode. [`Config`] is the
//! resolved entity the rest of the gateway consumes: every field carries
//! its final value, grouped by concern, immutable after resolution.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bind address for the tenanted write listener.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8081";

/// Bind address for the Prometheus metrics listener.
pub const DEFAULT_LISTEN_METRICS: &str = "0.0.0.0:9090";

/// Log level when neither file nor environment sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Upstream remote-write endpoint.
pub const DEFAULT_TARGET_ENDPOINT: &str = "127.0.0.1:9090";

/// Upstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Concurrent request limit on the write listener.
pub const DEFAULT_CONCURRENCY: usize = 512;

/// Header carrying the tenant id toward the upstream.
pub const DEFAULT_TENANT_HEADER: &str = "X-Scope-OrgID";

/// Label key used to pick the tenant out of incoming series.
pub const DEFAULT_TENANT_LABEL: &str = "__tenant__";

/// Connection cap per upstream host.
pub const DEFAULT_MAX_CONNS_PER_HOST: usize = 64;

/// The configuration file as written, decoded strictly and left
/// undefaulted.
///
/// `None` means the key was absent, which is how later stages tell "not
/// configured" from "configured to an empty or zero value". Any key
/// outside this schema is a hard decode error, typos included.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub listen: Option<String>,
    pub listen_pprof: Option<String>,
    pub listen_metrics_address: Option<String>,
    pub metrics_include_tenant: Option<bool>,

    pub target: Option<RawTarget>,

    pub enable_ipv6: Option<bool>,

    pub log_level: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_duration")]
    pub timeout: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_opt_duration")]
    pub timeout_shutdown: Option<Duration>,
    pub concurrency: Option<usize>,
    pub metadata: Option<bool>,
    pub log_response_errors: Option<bool>,
    #[serde(
        default,
        rename = "max_connection_duration",
        deserialize_with = "deserialize_opt_duration"
    )]
    pub max_conn_duration: Option<Duration>,
    pub max_conns_per_host: Option<usize>,

    pub auth: Option<RawAuth>,
    pub tenant: Option<RawTenant>,
}

/// The `target` group of the file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTarget {
    pub endpoint: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    pub ca_file: Option<String>,
    pub insecure_skip_verify: Option<bool>,
}

/// The `auth` group of the file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAuth {
    pub egress: Option<RawEgress>,
}

/// The `auth.egress` credential pair.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEgress {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// The `tenant` group of the file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTenant {
    pub label: Option<String>,
    pub label_list: Option<Vec<String>>,
    pub prefix: Option<String>,
    pub prefix_prefer_source: Option<bool>,
    pub label_remove: Option<bool>,
    pub header: Option<String>,
    pub default: Option<String>,
    pub accept_all: Option<bool>,
}

/// Resolved gateway configuration.
///
/// Produced once at startup by the loader and immutable afterwards; file,
/// environment, defaulting and validation have all run by the time a
/// value of this type exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Listener addresses and address-family switches.
    pub network: Network,

    /// Upstream endpoint and its TLS client material.
    pub target: Target,

    /// Timeouts and connection limits.
    pub timing: Timing,

    /// Outbound credentials.
    pub auth: Auth,

    /// Tenant stamping and routing rules.
    pub tenant: Tenant,

    /// Logging behavior.
    pub logging: Logging,
}

impl Config {
    /// Copy with the egress password masked, for printing and logging.
    pub fn redacted(&self) -> Config {
        let mut copy = self.clone();
        if copy.auth.egress.password.is_some() {
            copy.auth.egress.password = Some("<redacted>".to_string());
        }
        copy
    }
}

/// Listener addresses and address-family switches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Network {
    /// Bind address for the tenanted write listener.
    pub listen: String,

    /// Bind address for the pprof debug listener; `None` leaves it off.
    pub listen_pprof: Option<String>,

    /// Bind address for the Prometheus metrics listener.
    pub listen_metrics: String,

    /// Attach a tenant label to per-request metrics.
    pub metrics_include_tenant: bool,

    /// Resolve and bind IPv6 addresses as well as IPv4.
    pub enable_ipv6: bool,
}

/// Upstream endpoint and its TLS client material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    /// Remote-write endpoint requests are forwarded to.
    pub endpoint: String,

    /// Client certificate path; existence-checked, never parsed here.
    pub cert_file: Option<PathBuf>,

    /// Client key path; existence-checked, never parsed here.
    pub key_file: Option<PathBuf>,

    /// CA bundle path for upstream verification; existence-checked, never
    /// parsed here.
    pub ca_file: Option<PathBuf>,

    /// Skip upstream certificate verification. Subject to the loader's
    /// [`SkipVerifyPolicy`](crate::config::loader::SkipVerifyPolicy).
    pub insecure_skip_verify: bool,

    /// Forward metric metadata requests to the upstream.
    pub metadata: bool,
}

/// Timeouts and connection limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timing {
    /// Per-request upstream timeout.
    #[serde(serialize_with = "serialize_duration")]
    pub timeout: Duration,

    /// Grace period for draining at shutdown; zero drains nothing.
    #[serde(serialize_with = "serialize_duration")]
    pub timeout_shutdown: Duration,

    /// Upper bound on a single upstream connection's lifetime; zero means
    /// unbounded.
    #[serde(serialize_with = "serialize_duration")]
    pub max_conn_duration: Duration,

    /// Concurrent request limit on the write listener.
    pub concurrency: usize,

    /// Connection cap per upstream host.
    pub max_conns_per_host: usize,
}

/// Outbound credentials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Auth {
    /// Basic-auth pair attached to upstream requests.
    pub egress: EgressAuth,
}

/// Basic-auth pair attached to upstream requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EgressAuth {
    /// Username; `None` sends unauthenticated requests.
    pub username: Option<String>,

    /// Password; required whenever a username is set.
    pub password: Option<String>,
}

/// Tenant stamping and routing rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tenant {
    /// Label key used to pick the tenant out of incoming series.
    pub label: String,

    /// All label keys inspected for a tenant id; never empty, derives
    /// from `label` when unset.
    pub label_list: Vec<String>,

    /// Prefix prepended to resolved tenant ids.
    pub prefix: Option<String>,

    /// Prefer a prefix already present on the source tenant over ours.
    pub prefix_prefer_source: bool,

    /// Strip the tenant label from series before forwarding.
    pub label_remove: bool,

    /// Header carrying the tenant id toward the upstream.
    pub header: String,

    /// Tenant id for series carrying no tenant label.
    pub default: Option<String>,

    /// Accept series for unknown tenants instead of rejecting them.
    pub accept_all: bool,
}

/// Logging behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Logging {
    /// Level directive; free-form, checked when logging initializes.
    pub level: String,

    /// Log upstream error responses at error level instead of debug.
    pub log_response_errors: bool,
}

/// Durations render as humantime strings (`10s`, `1m 30s`).
fn serialize_duration<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*value).to_string())
}

/// Durations are written as humantime strings (`10s`, `1m30s`).
fn deserialize_opt_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        Some(text) => humantime::parse_duration(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
