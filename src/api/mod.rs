//! HTTP surface consumed by the SMS and voice gateways.

pub mod classify;
pub mod error;
pub mod health;
pub mod markup;
pub mod sms;
pub mod voice;

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, Utc};

use crate::{config::AppConfig, registry::NumberRegistry};

use error::ApiError;

/// Shared state injected into every handler through `web::Data`.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<NumberRegistry>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, registry: Arc<NumberRegistry>) -> Self {
        Self {
            config,
            registry,
            started_at: Utc::now(),
        }
    }
}

/// Registers every route plus the JSON extractor error handler. Form-based
/// routes carry their own markup-rendering `FormConfig`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::MalformedRequest(err.to_string()).into()),
    )
    .configure(health::configure)
    .configure(sms::configure)
    .configure(voice::configure)
    .configure(classify::configure);
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use actix_web::web;

    use super::AppState;
    use crate::{config::AppConfig, registry::NumberRegistry};

    /// State built from default config with the default seed list.
    pub fn state() -> web::Data<AppState> {
        let config = AppConfig::from_source(|_| None).expect("default config");
        let registry = NumberRegistry::with_seed(
            config.registry.dialing_prefix.clone(),
            &config.registry.seed_numbers,
        );
        web::Data::new(AppState::new(Arc::new(config), Arc::new(registry)))
    }
}
