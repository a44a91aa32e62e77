//! Application wiring and server lifecycle.
//!
//! [`App`] builds every service once from configuration and shares it via
//! `Arc`. [`start`] binds a listener and serves the router until the
//! returned [`ServerHandle`] is shut down.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::adapters::auth::{AdminCredentials, JwtSessionValidator};
use crate::adapters::http::admin::{AdminHandlers, SessionCookie};
use crate::adapters::http::booking::BookingHandlers;
use crate::adapters::http::middleware::AuthGate;
use crate::adapters::http::review::ReviewHandlers;
use crate::adapters::http::{build_router, HttpServices};
use crate::adapters::memory::{InMemoryBookingRepository, InMemoryReviewRepository};
use crate::adapters::notifications::{ConnectionRegistry, NotificationHub, NotificationStreamState, StreamSettings};
use crate::application::handlers::{CreateBookingHandler, CreateReviewHandler, ListBookingsHandler, ListReviewsHandler};
use crate::config::AppConfig;
use crate::ports::{BookingRepository, NotificationBroadcaster, ReviewRepository, SessionValidator};

/// Fully wired application.
pub struct App {
    config: AppConfig,
    hub: Arc<NotificationHub>,
    tokens: Arc<JwtSessionValidator>,
    shutdown: CancellationToken,
    services: HttpServices,
}

impl App {
    pub fn from_config(config: AppConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let hub = NotificationHub::new_shared(registry);
        let broadcaster: Arc<dyn NotificationBroadcaster> = hub.clone();

        let bookings: Arc<dyn BookingRepository> = Arc::new(InMemoryBookingRepository::new());
        let reviews: Arc<dyn ReviewRepository> = Arc::new(InMemoryReviewRepository::new());

        let tokens = Arc::new(JwtSessionValidator::from_config(&config.auth));
        let validator: Arc<dyn SessionValidator> = tokens.clone();
        let bypass = config.auth_bypass_active();
        if bypass {
            tracing::warn!("Admin auth bypass is active; do not use outside local development");
        }
        let gate = Arc::new(AuthGate::new(validator, config.auth.cookie_name.clone()).with_bypass(bypass));

        let shutdown = CancellationToken::new();

        let services = HttpServices {
            auth: gate.clone(),
            bookings: BookingHandlers::new(Arc::new(CreateBookingHandler::new(
                bookings.clone(),
                broadcaster.clone(),
            ))),
            reviews: ReviewHandlers::new(Arc::new(CreateReviewHandler::new(reviews.clone(), broadcaster))),
            admin: AdminHandlers::new(
                Arc::new(AdminCredentials::from_config(&config.auth)),
                tokens.clone(),
                SessionCookie {
                    name: config.auth.cookie_name.clone(),
                    secure: config.is_production(),
                },
                Arc::new(ListBookingsHandler::new(bookings)),
                Arc::new(ListReviewsHandler::new(reviews)),
            ),
            notifications: NotificationStreamState::new(
                hub.clone(),
                gate,
                StreamSettings::from(&config.notifications),
                shutdown.clone(),
            ),
        };

        Self {
            config,
            hub,
            tokens,
            shutdown,
            services,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.services.clone(), &self.config.server)
    }

    pub fn hub(&self) -> &Arc<NotificationHub> {
        &self.hub
    }

    /// Token issuer/validator, for tooling that needs to mint admin tokens.
    pub fn tokens(&self) -> &Arc<JwtSessionValidator> {
        &self.tokens
    }

    /// Cancelling this ends every open notification stream.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

/// Running server.
pub struct ServerHandle {
    pub addr: SocketAddr,
    hub: Arc<NotificationHub>,
    tokens: Arc<JwtSessionValidator>,
    shutdown: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn hub(&self) -> &Arc<NotificationHub> {
        &self.hub
    }

    pub fn tokens(&self) -> &Arc<JwtSessionValidator> {
        &self.tokens
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Ends open streams and waits for in-flight requests to finish.
    pub async fn shutdown(self) -> std::io::Result<()> {
        self.shutdown.cancel();
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }
}

/// Serves `app` on an already bound listener.
pub async fn start_with_listener(app: App, listener: TcpListener) -> std::io::Result<ServerHandle> {
    let addr = listener.local_addr()?;
    let router = app.router();
    let shutdown = app.shutdown_token();
    let signal = shutdown.clone();

    let task = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { signal.cancelled().await })
            .await
    });

    tracing::info!(%addr, "Travel desk server started");

    Ok(ServerHandle {
        addr,
        hub: app.hub.clone(),
        tokens: app.tokens.clone(),
        shutdown,
        task,
    })
}

/// Binds the configured address and serves.
pub async fn start(config: AppConfig) -> std::io::Result<ServerHandle> {
    let addr = config
        .server
        .socket_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let listener = TcpListener::bind(addr).await?;
    start_with_listener(App::from_config(config), listener).await
}
