//! HTTP server launcher.
//!
//! # Responsibilities
//! - Own the Tokio runtime the server runs on
//! - Create the Axum Router with the built-in handlers
//! - Wire up middleware (tracing, timeout, concurrency limit, request ID)
//! - Bind the listener and park the calling thread until shutdown
//!
//! # Design Decisions
//! - The launcher is driven synchronously by the bootstrap thread
//! - `start` binds before returning, so bind errors fail the start
//! - `join` releases the runtime once the server stops

use std::io;
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::app::Applications;
use crate::config::{ServerSettings, ServiceConfig};
use crate::http::handlers::{get_apps, get_health, get_info, HandlerState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown::{wait_for_shutdown, Shutdown};

/// Error type for server launch operations.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("server launcher is not configured")]
    NotConfigured,

    #[error("no handlers deployed")]
    NoHandlers,

    #[error("server has not been started")]
    NotStarted,

    #[error("invalid bind host `{host}`")]
    InvalidBindHost {
        host: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to build server runtime")]
    Runtime(#[source] io::Error),

    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server terminated with an error")]
    Serve(#[source] io::Error),

    #[error("server task did not complete")]
    Join(#[source] tokio::task::JoinError),

    #[error("launcher state lock poisoned")]
    Poisoned,
}

/// Starts and hosts the service's HTTP surface.
///
/// Calls arrive in order: `configure`, `deploy_handlers`, `start`, `join`.
pub trait ServerLauncher: Send + Sync {
    fn configure(&self, port: u16, settings: &ServerSettings) -> Result<(), LaunchError>;

    fn deploy_handlers(&self, core: &Arc<ServiceConfig>) -> Result<(), LaunchError>;

    /// Begin accepting connections.
    fn start(&self) -> Result<(), LaunchError>;

    /// Block until the server stops.
    fn join(&self) -> Result<(), LaunchError>;
}

#[derive(Default)]
struct LauncherState {
    runtime: Option<Arc<Runtime>>,
    addr: Option<SocketAddr>,
    settings: Option<ServerSettings>,
    router: Option<Router>,
    local_addr: Option<SocketAddr>,
    server: Option<JoinHandle<io::Result<()>>>,
}

/// [`ServerLauncher`] backed by Axum.
///
/// Must be driven from a thread that is not inside a Tokio runtime.
pub struct AxumLauncher {
    applications: Arc<Applications>,
    shutdown: Shutdown,
    state: Mutex<LauncherState>,
}

impl AxumLauncher {
    pub fn new(applications: Arc<Applications>) -> Self {
        Self {
            applications,
            shutdown: Shutdown::new(),
            state: Mutex::new(LauncherState::default()),
        }
    }

    /// Address the server is listening on, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.lock().ok().and_then(|state| state.local_addr)
    }

    /// Ask the server to stop; `join` returns once it has drained.
    pub fn stop(&self) {
        self.shutdown.trigger();
    }

    fn lock(&self) -> Result<MutexGuard<'_, LauncherState>, LaunchError> {
        self.state.lock().map_err(|_| LaunchError::Poisoned)
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(settings: &ServerSettings, state: HandlerState) -> Router {
        let permits = Arc::new(Semaphore::new(
            settings.max_connections.min(Semaphore::MAX_PERMITS),
        ));

        Router::new()
            .route("/health", get(get_health))
            .route("/info", get(get_info))
            .route("/apps", get(get_apps))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(settings.request_timeout_secs)))
            .layer(middleware::from_fn_with_state(permits, limit_concurrency))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }
}

fn build_runtime(settings: &ServerSettings) -> Result<Runtime, LaunchError> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all().thread_name("service-http");
    if let Some(workers) = settings.worker_threads {
        builder.worker_threads(workers);
    }
    builder.build().map_err(LaunchError::Runtime)
}

/// Hold a permit for the duration of each request (backpressure).
async fn limit_concurrency(
    State(permits): State<Arc<Semaphore>>,
    request: Request,
    next: Next,
) -> Response {
    let Ok(_permit) = permits.acquire_owned().await else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    next.run(request).await
}

impl ServerLauncher for AxumLauncher {
    fn configure(&self, port: u16, settings: &ServerSettings) -> Result<(), LaunchError> {
        let ip: IpAddr = settings
            .bind_host
            .parse()
            .map_err(|source| LaunchError::InvalidBindHost {
                host: settings.bind_host.clone(),
                source,
            })?;
        let addr = SocketAddr::new(ip, port);
        let runtime = build_runtime(settings)?;

        let mut state = self.lock()?;
        state.runtime = Some(Arc::new(runtime));
        state.addr = Some(addr);
        state.settings = Some(settings.clone());

        tracing::info!(
            address = %addr,
            max_connections = settings.max_connections,
            request_timeout_secs = settings.request_timeout_secs,
            "HTTP server configured"
        );
        Ok(())
    }

    fn deploy_handlers(&self, core: &Arc<ServiceConfig>) -> Result<(), LaunchError> {
        let mut state = self.lock()?;
        let settings = state.settings.as_ref().ok_or(LaunchError::NotConfigured)?;
        let router = Self::build_router(
            settings,
            HandlerState {
                core: Arc::clone(core),
                applications: Arc::clone(&self.applications),
            },
        );
        state.router = Some(router);

        tracing::info!(service = %core.service_name, "Handlers deployed");
        Ok(())
    }

    fn start(&self) -> Result<(), LaunchError> {
        let mut state = self.lock()?;
        let runtime = state.runtime.clone().ok_or(LaunchError::NotConfigured)?;
        let addr = state.addr.ok_or(LaunchError::NotConfigured)?;
        let router = state.router.take().ok_or(LaunchError::NoHandlers)?;

        let listener = runtime
            .block_on(TcpListener::bind(addr))
            .map_err(|source| LaunchError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| LaunchError::Bind { addr, source })?;

        let shutdown = self.shutdown.subscribe();
        let server = runtime.spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(wait_for_shutdown(shutdown))
                .await
        });

        state.local_addr = Some(local_addr);
        state.server = Some(server);

        tracing::info!(address = %local_addr, "HTTP server started");
        Ok(())
    }

    fn join(&self) -> Result<(), LaunchError> {
        let (runtime, server) = {
            let mut state = self.lock()?;
            let server = state.server.take().ok_or(LaunchError::NotStarted)?;
            let runtime = state.runtime.take().ok_or(LaunchError::NotStarted)?;
            (runtime, server)
        };

        let result = runtime.block_on(server);
        drop(runtime);

        match result {
            Ok(Ok(())) => {
                tracing::info!("HTTP server stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(LaunchError::Serve(e)),
            Err(e) => Err(LaunchError::Join(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calls_out_of_order_are_rejected() {
        let launcher = AxumLauncher::new(Arc::new(Applications::new()));
        let core = Arc::new(ServiceConfig::new("billing", "http://billing"));

        assert!(matches!(launcher.deploy_handlers(&core), Err(LaunchError::NotConfigured)));
        assert!(matches!(launcher.start(), Err(LaunchError::NotConfigured)));
        assert!(matches!(launcher.join(), Err(LaunchError::NotStarted)));

        let mut settings = ServerSettings::default();
        settings.bind_host = "127.0.0.1".into();
        settings.worker_threads = Some(1);
        launcher.configure(0, &settings).unwrap();
        assert!(matches!(launcher.start(), Err(LaunchError::NoHandlers)));
    }

    #[test]
    fn rejects_non_ip_bind_host() {
        let launcher = AxumLauncher::new(Arc::new(Applications::new()));
        let mut settings = ServerSettings::default();
        settings.bind_host = "localhost".into();

        let err = launcher.configure(8080, &settings).unwrap_err();
        assert!(matches!(err, LaunchError::InvalidBindHost { ref host, .. } if host == "localhost"));
    }

    #[test]
    fn start_then_stop_returns_from_join() {
        let launcher = AxumLauncher::new(Arc::new(Applications::new()));
        let core = Arc::new(ServiceConfig::new("billing", "http://billing"));
        let mut settings = ServerSettings::default();
        settings.bind_host = "127.0.0.1".into();
        settings.worker_threads = Some(1);

        launcher.configure(0, &settings).unwrap();
        launcher.deploy_handlers(&core).unwrap();
        launcher.start().unwrap();
        assert!(launcher.local_addr().is_some_and(|addr| addr.port() != 0));

        launcher.stop();
        launcher.join().unwrap();
        assert!(matches!(launcher.join(), Err(LaunchError::NotStarted)));
    }
}
