/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openweather_api_key: String,
    pub port: u16,
    /// Current weather endpoint host.
    pub openweather_api_url: String,
    /// Statistical (monthly aggregate) endpoint host.
    pub openweather_history_url: String,
    /// Geocoding endpoint host.
    pub openweather_geo_url: String,
    /// Score unknown sectors with the generic profile instead of rejecting them.
    pub allow_generic_sector: bool,
    pub http_timeout_secs: u64,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_API_URL: &str = "https://api.openweathermap.org";
const DEFAULT_HISTORY_URL: &str = "https://history.openweathermap.org";
const DEFAULT_GEO_URL: &str = "http://api.openweathermap.org";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openweather_api_key =
            get("OPENWEATHER_API_KEY").ok_or(ConfigError::Missing("OPENWEATHER_API_KEY"))?;

        let port = match get("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "HTTP_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let allow_generic_sector = match get("ALLOW_GENERIC_SECTOR") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                name: "ALLOW_GENERIC_SECTOR",
                value,
            })?,
            None => false,
        };

        let url = |name: &str, default: &str| {
            get(name)
                .unwrap_or_else(|| default.to_string())
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            openweather_api_key,
            port,
            openweather_api_url: url("OPENWEATHER_API_URL", DEFAULT_API_URL),
            openweather_history_url: url("OPENWEATHER_HISTORY_URL", DEFAULT_HISTORY_URL),
            openweather_geo_url: url("OPENWEATHER_GEO_URL", DEFAULT_GEO_URL),
            allow_generic_sector,
            http_timeout_secs,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[("OPENWEATHER_API_KEY", "secret")]).unwrap();

        assert_eq!(config.openweather_api_key, "secret");
        assert_eq!(config.port, 8080);
        assert_eq!(config.openweather_api_url, "https://api.openweathermap.org");
        assert_eq!(
            config.openweather_history_url,
            "https://history.openweathermap.org"
        );
        assert_eq!(config.openweather_geo_url, "http://api.openweathermap.org");
        assert!(!config.allow_generic_sector);
        assert_eq!(config.http_timeout_secs, 10);
    }

    #[test]
    fn test_missing_api_key() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("OPENWEATHER_API_KEY")
        );
        assert_eq!(
            config_from(&[("OPENWEATHER_API_KEY", "  ")]).unwrap_err(),
            ConfigError::Missing("OPENWEATHER_API_KEY")
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("OPENWEATHER_API_KEY", "secret"),
            ("PORT", "3000"),
            ("OPENWEATHER_API_URL", "http://localhost:9000/"),
            ("ALLOW_GENERIC_SECTOR", "Yes"),
            ("HTTP_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.openweather_api_url, "http://localhost:9000");
        assert!(config.allow_generic_sector);
        assert_eq!(config.http_timeout_secs, 3);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("OPENWEATHER_API_KEY", "k"), ("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_flag_and_timeout() {
        assert!(matches!(
            config_from(&[("OPENWEATHER_API_KEY", "k"), ("ALLOW_GENERIC_SECTOR", "maybe")]),
            Err(ConfigError::Invalid {
                name: "ALLOW_GENERIC_SECTOR",
                ..
            })
        ));
        assert!(matches!(
            config_from(&[("OPENWEATHER_API_KEY", "k"), ("HTTP_TIMEOUT_SECS", "0")]),
            Err(ConfigError::Invalid {
                name: "HTTP_TIMEOUT_SECS",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("on"), None);
    }
}
