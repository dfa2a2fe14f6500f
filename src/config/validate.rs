// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    ClientConfig, ConfigFile, RawConfigFile, RawServerSection, ServerConfig, ShellConfig,
};
use crate::errors::{PoolError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PoolError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let server = validate_server(raw.server)?;
        let shell = validate_shell(raw.exec.shell)?;
        let client = ClientConfig {
            timeout: parse_config_duration("[client].timeout", &raw.client.timeout)?,
        };
        Ok(ConfigFile::new_unchecked(server, shell, client))
    }
}

fn validate_server(raw: RawServerSection) -> Result<ServerConfig> {
    validate_uri(&raw.uri)?;

    if raw.max_message_bytes < 2 {
        return Err(PoolError::ConfigError(format!(
            "[server].max_message_bytes must be >= 2 (got {})",
            raw.max_message_bytes
        )));
    }

    let idle_timeout = raw
        .idle_timeout
        .as_deref()
        .map(|s| parse_config_duration("[server].idle_timeout", s))
        .transpose()?;

    Ok(ServerConfig {
        uri: raw.uri,
        idle_timeout,
        max_message_bytes: raw.max_message_bytes,
    })
}

/// Check that `uri` has the `host:port` shape with a numeric port.
pub fn validate_uri(uri: &str) -> Result<()> {
    let (host, port) = uri.rsplit_once(':').ok_or_else(|| {
        PoolError::ConfigError(format!("uri '{uri}' must have the form host:port"))
    })?;

    if host.is_empty() {
        return Err(PoolError::ConfigError(format!(
            "uri '{uri}' is missing a host"
        )));
    }

    port.parse::<u16>().map_err(|e| {
        PoolError::ConfigError(format!("uri '{uri}' has an invalid port '{port}': {e}"))
    })?;

    Ok(())
}

fn validate_shell(mut shell: Vec<String>) -> Result<ShellConfig> {
    if shell.is_empty() || shell[0].trim().is_empty() {
        return Err(PoolError::ConfigError(
            "[exec].shell must name a program, e.g. [\"sh\", \"-c\"]".to_string(),
        ));
    }
    let program = shell.remove(0);
    Ok(ShellConfig {
        program,
        args: shell,
    })
}

fn parse_config_duration(field: &str, value: &str) -> Result<Duration> {
    let duration = parse_duration(value)
        .map_err(|e| PoolError::ConfigError(format!("{field}: {e}")))?;
    if duration.is_zero() {
        return Err(PoolError::ConfigError(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(duration)
}

/// Parse durations like `"500ms"`, `"30s"`, `"5m"`, `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => secs_times(value, 60, s),
        "h" => secs_times(value, 60 * 60, s),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

fn secs_times(value: u64, factor: u64, input: &str) -> std::result::Result<Duration, String> {
    value
        .checked_mul(factor)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: '{input}'"))
}
