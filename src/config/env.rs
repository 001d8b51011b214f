use std::{net::SocketAddr, time::Duration};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub registry: RegistryConfig,
    pub voice: VoiceConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub shutdown_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind_addr: SocketAddr,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// International dialing code prepended to every caller-entered number.
    pub dialing_prefix: String,
    pub seed_numbers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub phone_digits: usize,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file_name: String,
    pub console_ansi: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}
