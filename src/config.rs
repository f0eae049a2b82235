use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "SOS Admin";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/admin";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";

pub const ENV_API_URL: &str = "SOS_ADMIN_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "SOS_ADMIN_TIMEOUT_SECS";
pub const ENV_GEOCODER_URL: &str = "SOS_ADMIN_GEOCODER_URL";
pub const ENV_GEOCODING: &str = "SOS_ADMIN_GEOCODING";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,sos_admin=debug"
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Runtime configuration for the console.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub geocoder_base_url: String,
    pub geocoding_enabled: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            geocoding_enabled: true,
        }
    }
}

impl AdminConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_base_url = non_empty(ENV_API_URL, url)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout_secs = match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: ENV_TIMEOUT_SECS,
                        value: raw,
                    })
                }
            };
        }
        if let Some(url) = lookup(ENV_GEOCODER_URL) {
            config.geocoder_base_url = non_empty(ENV_GEOCODER_URL, url)?;
        }
        if let Some(flag) = lookup(ENV_GEOCODING) {
            config.geocoding_enabled = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }

        Ok(config)
    }
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = AdminConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AdminConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:3000/api/admin");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.geocoding_enabled);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AdminConfig::from_lookup(lookup(&[
            (ENV_API_URL, " https://admin.example.org/api/admin "),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_GEOCODING, "Off"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://admin.example.org/api/admin");
        assert_eq!(config.request_timeout_secs, 5);
        assert!(!config.geocoding_enabled);
    }

    #[test]
    fn rejects_bad_timeout() {
        for value in ["0", "soon"] {
            let err = AdminConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, value)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
        }
    }

    #[test]
    fn rejects_blank_url() {
        let err = AdminConfig::from_lookup(lookup(&[(ENV_GEOCODER_URL, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty { var: ENV_GEOCODER_URL });
    }

    #[test]
    fn app_name_is_sos_admin() {
        assert_eq!(APP_NAME, "SOS Admin");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
