//! Application startup and lifecycle management.

use anyhow::Context;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{http_trace_layer, request_id_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::Config;
use crate::handlers;
use crate::services::{CardProcessor, StripeClient};
use crate::AppState;

/// Build the gateway router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/payment/process", post(handlers::payments::process_payment))
        .route(
            "/subscriptions/create",
            post(handlers::subscriptions::create_subscription),
        )
        .route(
            "/invoices/generate",
            post(handlers::invoices::generate_invoice),
        )
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application backed by the Stripe API.
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let stripe =
            StripeClient::new(config.stripe.clone()).context("Failed to build Stripe client")?;
        tracing::info!(
            api_base_url = %config.stripe.api_base_url,
            timeout_secs = config.stripe.timeout.as_secs(),
            "Stripe client initialized"
        );

        Self::build_with_processor(config, Arc::new(stripe)).await
    }

    /// Build the application around any card processor implementation.
    pub async fn build_with_processor(
        config: Config,
        processor: Arc<dyn CardProcessor>,
    ) -> anyhow::Result<Self> {
        for name in &config.ignored_credentials {
            tracing::warn!(
                variable = %name,
                "Alternative payment credentials are set but no endpoint uses them; ignoring"
            );
        }

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind HTTP listener to {}", addr))?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState::new(processor));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM, letting in-flight requests finish.
    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        tracing::info!(port = self.port, "Billing gateway listening");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Billing gateway stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
