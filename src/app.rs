use std::sync::Arc;

use actix_web::{dev::Server, middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use tokio::time::timeout;

use crate::{
    api::{self, AppState},
    config::AppConfig,
    infrastructure::shutdown::Shutdown,
    registry::NumberRegistry,
};

pub struct ScamGuardApp {
    server: Server,
    shutdown: Shutdown,
    config: Arc<AppConfig>,
}

impl ScamGuardApp {
    pub fn initialize(config: AppConfig, shutdown: Shutdown) -> Result<Self> {
        let config = Arc::new(config);

        let registry = Arc::new(NumberRegistry::with_seed(
            config.registry.dialing_prefix.clone(),
            &config.registry.seed_numbers,
        ));
        tracing::info!(
            target: "registry",
            prefix = registry.prefix(),
            seeded = registry.len(),
            "scam number registry ready"
        );

        let state = web::Data::new(AppState::new(config.clone(), registry));

        let mut server = HttpServer::new(move || {
            App::new()
                .wrap(middleware::Logger::default())
                .app_data(state.clone())
                .configure(api::configure)
        })
        .disable_signals()
        .shutdown_timeout(config.shutdown_timeout.as_secs());

        if let Some(workers) = config.http.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(config.http.bind_addr)
            .with_context(|| format!("failed to bind {}", config.http.bind_addr))?
            .run();

        Ok(Self {
            server,
            shutdown,
            config,
        })
    }

    pub async fn run(self) -> Result<()> {
        let ScamGuardApp {
            server,
            shutdown,
            config,
        } = self;

        tracing::info!(
            target: "lifecycle",
            addr = %config.http.bind_addr,
            version = env!("CARGO_PKG_VERSION"),
            "scam guard listening"
        );

        let handle = server.handle();
        let mut server_future = Box::pin(server);
        let mut shutdown_listener = shutdown.subscribe();

        tokio::select! {
            _ = shutdown_listener.notified() => {
                tracing::info!(target: "lifecycle", "stopping http server");
            }
            res = &mut server_future => {
                res.context("http server exited with an error")?;
                tracing::info!(target: "lifecycle", "http server stopped");
                return Ok(());
            }
        }

        let shutdown_timeout = config.shutdown_timeout;
        let graceful = async {
            handle.stop(true).await;
            server_future.await
        };
        match timeout(shutdown_timeout, graceful).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(target: "lifecycle", error = %err, "http server failed during shutdown");
            }
            Err(_) => {
                tracing::warn!(
                    target: "lifecycle",
                    "http server did not stop within {:?}; exiting anyway",
                    shutdown_timeout
                );
            }
        }

        tracing::info!(target: "lifecycle", "shutdown complete");
        Ok(())
    }
}
