use std::io;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    config::{env::LoggingConfig, AppConfig},
    infrastructure::directories::ResolvedPaths,
};

/// Per-connection chatter from the HTTP runtime that drowns out webhook events.
const QUIET_DIRECTIVES: &[&str] = &["actix_server=warn", "mio=warn"];

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Console plus daily rolling file output. Safe to call more than once.
pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let logging = &config.logging;

        let file_appender = tracing_appender::rolling::daily(&paths.logs_dir, &logging.file_name);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let _ = GUARD.set(guard);

        let console_layer = fmt::layer()
            .with_writer(io::stdout)
            .with_target(true)
            .with_ansi(logging.console_ansi);

        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_target(true)
            .with_thread_names(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(build_filter(logging))
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        tracing::info!(
            target: "lifecycle",
            logs = %paths.logs_dir.join(&logging.file_name).display(),
            level = %logging.level,
            "tracing initialized"
        );
        Ok(())
    })?;
    Ok(())
}

/// `RUST_LOG` wins outright; otherwise the configured level plus quiet runtime targets.
fn build_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&logging.level)))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn default_directives(level: &str) -> String {
    std::iter::once(level)
        .chain(QUIET_DIRECTIVES.iter().copied())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_keep_level_first() {
        assert_eq!(default_directives("debug"), "debug,actix_server=warn,mio=warn");
    }

    #[test]
    fn configured_directives_parse() {
        for level in ["info", "debug", "sms=trace,warn"] {
            assert!(EnvFilter::try_new(default_directives(level)).is_ok(), "{level}");
        }
    }
}
