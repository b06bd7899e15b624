use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::controls::ControlSource;
use crate::error::GatewayError;
use crate::router::{RateLimit, build_router};
use crate::service::IndexingService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub service: IndexingService,
    pub controls: Arc<dyn ControlSource>,
    pub started_at: Instant,
}

pub struct GatewayServer {
    addr: SocketAddr,
    secret: Option<String>,
    rate_limit: u32,
    rate_window: Duration,
    max_body_size: usize,
    service: IndexingService,
    controls: Arc<dyn ControlSource>,
    shutdown_rx: watch::Receiver<bool>,
}

impl GatewayServer {
    #[must_use]
    pub fn new(
        bind: &str,
        port: u16,
        service: IndexingService,
        controls: Arc<dyn ControlSource>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let addr: SocketAddr = format!("{bind}:{port}").parse().unwrap_or_else(|e| {
            tracing::warn!("invalid bind '{bind}': {e}, falling back to 127.0.0.1:{port}");
            SocketAddr::from(([127, 0, 0, 1], port))
        });

        if bind == "0.0.0.0" {
            tracing::warn!("gateway binding to 0.0.0.0, webhooks are reachable from any interface");
        }

        Self {
            addr,
            secret: None,
            rate_limit: 120,
            rate_window: Duration::from_secs(60),
            max_body_size: 1_048_576,
            service,
            controls,
            shutdown_rx,
        }
    }

    /// Require `?secret=<value>` on every webhook route.
    #[must_use]
    pub fn with_secret(mut self, secret: Option<String>) -> Self {
        self.secret = secret.filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, limit: u32) -> Self {
        self.rate_limit = limit;
        self
    }

    /// Length of the window `rate_limit` counts requests over.
    #[must_use]
    pub fn with_rate_window(mut self, window: Duration) -> Self {
        self.rate_window = window;
        self
    }

    #[must_use]
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Start the webhook gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or encounters a fatal I/O error.
    pub async fn serve(self) -> Result<(), GatewayError> {
        if self.secret.is_none() {
            tracing::warn!("no webhook secret configured, webhook routes accept any caller");
        }

        let state = AppState {
            service: self.service,
            controls: self.controls,
            started_at: Instant::now(),
        };

        let rate_limit = RateLimit {
            limit: self.rate_limit,
            window: self.rate_window,
        };
        let router = build_router(state, self.secret, rate_limit, self.max_body_size);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| GatewayError::Bind(self.addr.to_string(), e))?;
        tracing::info!("gateway listening on {}", self.addr);

        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            while !*shutdown_rx.borrow_and_update() {
                if shutdown_rx.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
            tracing::info!("gateway shutting down");
        })
        .await
        .map_err(|e| GatewayError::Server(format!("{e}")))?;

        Ok(())
    }
}
