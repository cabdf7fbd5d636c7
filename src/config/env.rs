//! Environment variable overlay.
//!
//! Every schema field has a `CT_*` binding. A variable that is set to a
//! non-empty value overwrites whatever the file stage produced for that
//! field; a variable that is unset or empty leaves the field alone.
//! Conversion failures name the offending variable.

use std::time::Duration;

use crate::config::loader::ConfigError;
use crate::config::schema::{RawAuth, RawConfig, RawEgress, RawTarget, RawTenant};

/// Overwrite `raw` from the `CT_*` process environment.
pub(crate) fn overlay(raw: &mut RawConfig) -> Result<(), ConfigError> {
    set_string(&mut raw.listen, "CT_LISTEN");
    set_string(&mut raw.listen_pprof, "CT_LISTEN_PPROF");
    set_string(&mut raw.listen_metrics_address, "CT_LISTEN_METRICS_ADDRESS");
    set_bool(&mut raw.metrics_include_tenant, "CT_METRICS_INCLUDE_TENANT")?;
    set_bool(&mut raw.enable_ipv6, "CT_ENABLE_IPV6")?;
    set_string(&mut raw.log_level, "CT_LOG_LEVEL");
    set_duration(&mut raw.timeout, "CT_TIMEOUT")?;
    set_duration(&mut raw.timeout_shutdown, "CT_TIMEOUT_SHUTDOWN")?;
    set_usize(&mut raw.concurrency, "CT_CONCURRENCY")?;
    set_bool(&mut raw.metadata, "CT_METADATA")?;
    set_bool(&mut raw.log_response_errors, "CT_LOG_RESPONSE_ERRORS")?;
    set_duration(&mut raw.max_conn_duration, "CT_MAX_CONN_DURATION")?;
    set_usize(&mut raw.max_conns_per_host, "CT_MAX_CONNS_PER_HOST")?;

    let target = raw.target.get_or_insert_with(RawTarget::default);
    set_string(&mut target.endpoint, "CT_TARGET_ENDPOINT");
    set_string(&mut target.cert_file, "CT_TARGET_CERT_FILE");
    set_string(&mut target.key_file, "CT_TARGET_KEY_FILE");
    set_string(&mut target.ca_file, "CT_TARGET_CA_FILE");
    set_bool(&mut target.insecure_skip_verify, "CT_TARGET_INSECURE_SKIP_VERIFY")?;

    let egress = raw
        .auth
        .get_or_insert_with(RawAuth::default)
        .egress
        .get_or_insert_with(RawEgress::default);
    set_string(&mut egress.username, "CT_AUTH_EGRESS_USERNAME");
    set_string(&mut egress.password, "CT_AUTH_EGRESS_PASSWORD");

    let tenant = raw.tenant.get_or_insert_with(RawTenant::default);
    set_string(&mut tenant.label, "CT_TENANT_LABEL");
    set_list(&mut tenant.label_list, "CT_TENANT_LABEL_LIST");
    set_string(&mut tenant.prefix, "CT_TENANT_PREFIX");
    set_bool(&mut tenant.prefix_prefer_source, "CT_TENANT_PREFIX_PREFER_SOURCE")?;
    set_bool(&mut tenant.label_remove, "CT_TENANT_LABEL_REMOVE")?;
    set_string(&mut tenant.header, "CT_TENANT_HEADER");
    set_string(&mut tenant.default, "CT_TENANT_DEFAULT");
    set_bool(&mut tenant.accept_all, "CT_TENANT_ACCEPT_ALL")?;

    Ok(())
}

/// Read one variable. Unset and empty are the same thing: not configured.
fn var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn set_string(field: &mut Option<String>, key: &'static str) {
    if let Some(value) = var(key) {
        *field = Some(value);
    }
}

fn set_bool(field: &mut Option<bool>, key: &'static str) -> Result<(), ConfigError> {
    if let Some(value) = var(key) {
        let parsed = parse_bool(&value).ok_or_else(|| ConfigError::EnvParse {
            var: key,
            message: format!("{value:?} is not a boolean"),
        })?;
        *field = Some(parsed);
    }
    Ok(())
}

fn set_duration(field: &mut Option<Duration>, key: &'static str) -> Result<(), ConfigError> {
    if let Some(value) = var(key) {
        let parsed = humantime::parse_duration(&value).map_err(|err| ConfigError::EnvParse {
            var: key,
            message: format!("{value:?} is not a duration: {err}"),
        })?;
        *field = Some(parsed);
    }
    Ok(())
}

fn set_usize(field: &mut Option<usize>, key: &'static str) -> Result<(), ConfigError> {
    if let Some(value) = var(key) {
        let parsed = value.parse().map_err(|err| ConfigError::EnvParse {
            var: key,
            message: format!("{value:?} is not an integer: {err}"),
        })?;
        *field = Some(parsed);
    }
    Ok(())
}

/// Comma-separated list; items are trimmed and empty items dropped.
fn set_list(field: &mut Option<Vec<String>>, key: &'static str) {
    if let Some(value) = var(key) {
        let items = value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        *field = Some(items);
    }
}

/// Boolean forms: `1`, `t`, `T`, `TRUE`, `true`, `True` and their
/// negative counterparts.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
