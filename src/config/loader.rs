use std::{env, net::SocketAddr, time::Duration};

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, HttpConfig, LoggingConfig, RegistryConfig,
    VoiceConfig,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_DIALING_PREFIX: &str = "+1";
const DEFAULT_SEED_NUMBERS: &str = "+14155552671";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key source. Empty values count as unset.
    pub fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| source(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| invalid("BIND_ADDR", &bind_raw, "expected host:port"))?;

        let workers = match get("HTTP_WORKERS") {
            Some(raw) => Some(parse_positive("HTTP_WORKERS", &raw)?),
            None => None,
        };

        let dialing_prefix =
            get("DIALING_PREFIX").unwrap_or_else(|| DEFAULT_DIALING_PREFIX.to_string());
        if !is_plus_digits(&dialing_prefix) {
            return Err(invalid(
                "DIALING_PREFIX",
                &dialing_prefix,
                "expected '+' followed by digits",
            ));
        }

        let seed_numbers = get("SEED_SCAM_NUMBERS")
            .unwrap_or_else(|| DEFAULT_SEED_NUMBERS.to_string())
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>();
        // Seeds are stored verbatim, so they must already carry a dialing prefix.
        if let Some(bad) = seed_numbers.iter().find(|seed| !is_plus_digits(seed)) {
            return Err(invalid(
                "SEED_SCAM_NUMBERS",
                bad,
                "expected '+' followed by digits",
            ));
        }

        let phone_digits = match get("PHONE_DIGITS") {
            Some(raw) => parse_positive("PHONE_DIGITS", &raw)?,
            None => 10,
        };

        let voice = VoiceConfig {
            phone_digits,
            language: get("VOICE_LANGUAGE").unwrap_or_else(|| "en-US".to_string()),
        };

        let directories = DirectoryConfig {
            logs_dir: get("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let console_ansi = match get("LOG_ANSI").as_deref() {
            None | Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            Some(other) => return Err(invalid("LOG_ANSI", other, "expected true/false")),
        };
        let logging = LoggingConfig {
            level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            file_name: get("LOG_FILE_NAME").unwrap_or_else(|| "scam-guard.log".to_string()),
            console_ansi,
        };

        let shutdown_timeout = match get("SHUTDOWN_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .map_err(|_| invalid("SHUTDOWN_TIMEOUT_SECS", &raw, "expected seconds"))?,
            ),
            None => Duration::from_secs(5),
        };

        Ok(Self {
            http: HttpConfig { bind_addr, workers },
            registry: RegistryConfig {
                dialing_prefix,
                seed_numbers,
            },
            voice,
            directories,
            logging,
            shutdown_timeout,
        })
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match raw.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(invalid(key, raw, "expected a positive integer")),
    }
}

fn is_plus_digits(value: &str) -> bool {
    value
        .strip_prefix('+')
        .map_or(false, |digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

fn invalid(key: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason,
    }
}
