//! Configuration types.

use std::net::IpAddr;

use crate::error::ConfigError;
use crate::onboarding::field::DEFAULT_QUALIFICATIONS;
use crate::onboarding::flow::DEFAULT_RESET_SENTINEL;

/// Host configuration for the onboarding service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardConfig {
    /// Port for the REST/WebSocket server. `None` disables it.
    pub http_port: Option<u16>,
    /// Address the server binds to.
    pub bind_addr: IpAddr,
    /// Text that restarts the conversation from the first question.
    pub reset_sentinel: String,
    /// Options offered for the qualification question.
    pub qualifications: Vec<String>,
    /// Whether to run the terminal conversation.
    pub cli_enabled: bool,
}

impl Default for OnboardConfig {
    fn default() -> Self {
        Self {
            http_port: None,
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            reset_sentinel: DEFAULT_RESET_SENTINEL.to_string(),
            qualifications: DEFAULT_QUALIFICATIONS.iter().map(|s| s.to_string()).collect(),
            cli_enabled: true,
        }
    }
}

impl OnboardConfig {
    /// Load from `ONBOARD_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Unset or blank variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(port) = get("ONBOARD_HTTP_PORT") {
            config.http_port = Some(port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ONBOARD_HTTP_PORT".to_string(),
                message: format!("expected a port number, got '{port}'"),
            })?);
        }

        if let Some(addr) = get("ONBOARD_BIND_ADDR") {
            config.bind_addr = addr.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ONBOARD_BIND_ADDR".to_string(),
                message: format!("expected an IP address, got '{addr}'"),
            })?;
        }

        if let Some(sentinel) = get("ONBOARD_RESET_SENTINEL") {
            config.reset_sentinel = sentinel;
        }

        if let Some(list) = get("ONBOARD_QUALIFICATIONS") {
            let qualifications: Vec<String> = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if qualifications.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "ONBOARD_QUALIFICATIONS".to_string(),
                    message: "at least one qualification is required".to_string(),
                });
            }
            config.qualifications = qualifications;
        }

        if let Some(flag) = get("ONBOARD_CLI") {
            config.cli_enabled = parse_bool(&flag).ok_or_else(|| ConfigError::InvalidValue {
                key: "ONBOARD_CLI".to_string(),
                message: format!("expected true or false, got '{flag}'"),
            })?;
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
