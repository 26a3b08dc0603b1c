//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Latency the simulated backend waits before resolving.
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(1400);

/// Wizard service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Latency injected by the simulated backend before it resolves.
    pub simulated_latency: Duration,
    /// Documents required before incorporation can start.
    pub min_documents: usize,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            simulated_latency: DEFAULT_SIMULATED_LATENCY,
            min_documents: 2,
        }
    }
}

impl WizardConfig {
    /// Build config from environment variables, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = lookup("REGUEASE_BIND").unwrap_or(defaults.bind_addr);
        let port = parse_or(&lookup, "REGUEASE_PORT", defaults.port)?;
        let latency_ms = parse_or(
            &lookup,
            "REGUEASE_LATENCY_MS",
            defaults.simulated_latency.as_millis() as u64,
        )?;
        let min_documents = parse_or(&lookup, "REGUEASE_MIN_DOCUMENTS", defaults.min_documents)?;

        if min_documents == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REGUEASE_MIN_DOCUMENTS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            port,
            simulated_latency: Duration::from_millis(latency_ms),
            min_documents,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
