use crate::errors::handle_rejection;
use crate::events::EventBus;
use crate::handlers;
use crate::live::LiveStats;
use crate::middleware::with_request_logging;
use crate::store::{MemoryStore, ResultStore, SqliteStore, StoreError};
use chrono::{DateTime, Utc};
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::http::Method;
use warp::reply::{Reply, Response};
use warp::Filter;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    database: Option<PathBuf>,
    frontend_url: Option<String>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            database: None,
            frontend_url: None,
        }
    }

    /// Loopback, ephemeral port, in-memory store.
    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0)
    }

    /// Persist results in a SQLite file instead of memory.
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(path.into());
        self
    }

    /// Only this origin may make cross-origin requests.
    pub fn with_frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = Some(url.into());
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn database(&self) -> Option<&Path> {
        self.database.as_deref()
    }

    pub fn frontend_url(&self) -> Option<&str> {
        self.frontend_url.as_deref()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", DEFAULT_PORT)
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    live: Arc<LiveStats>,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl AppContext {
    /// Open the configured store and load persisted statistics.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        if let Some(url) = config.frontend_url() {
            validate_origin(url)?;
        }
        let store: Arc<dyn ResultStore> = match config.database() {
            Some(path) => {
                tracing::info!(database = %path.display(), "using SQLite result store");
                Arc::new(SqliteStore::open(path)?)
            }
            None => {
                tracing::info!("no database configured, results are kept in memory");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: ServerConfig, store: Arc<dyn ResultStore>) -> Self {
        let live = Arc::new(LiveStats::new(store, EventBus::new()));
        live.load_from_store();
        Self {
            config,
            live,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn new_for_tests() -> Self {
        Self::with_store(ServerConfig::for_tests(), Arc::new(MemoryStore::new()))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn live(&self) -> Arc<LiveStats> {
        Arc::clone(&self.live)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Origins are `scheme://host[:port]`; a trailing slash is tolerated.
fn validate_origin(url: &str) -> Result<(), ServerError> {
    let trimmed = url.trim_end_matches('/');
    let uri: warp::http::Uri = trimmed
        .parse()
        .map_err(|e| ServerError::ConfigError(format!("invalid frontend url `{url}`: {e}")))?;
    let has_path = uri
        .path_and_query()
        .is_some_and(|p| !p.as_str().is_empty() && p.as_str() != "/");
    if uri.scheme().is_none() || uri.authority().is_none() || has_path {
        return Err(ServerError::ConfigError(format!(
            "frontend url `{url}` must look like http://host:port"
        )));
    }
    Ok(())
}

/// Every API route with CORS, request logging and JSON error bodies.
pub fn routes(context: &AppContext) -> BoxedFilter<(Response,)> {
    let api = health_routes(context)
        .or(stats_routes(context))
        .unify()
        .or(sse_routes(context))
        .unify();

    let cors = match context.config().frontend_url() {
        Some(url) => warp::cors().allow_origin(url.trim_end_matches('/')),
        None => warp::cors().allow_any_origin(),
    }
    .allow_methods(vec![Method::GET, Method::POST])
    .allow_headers(vec!["content-type"]);

    let with_cors = api.with(cors).map(|reply| Reply::into_response(reply));

    with_request_logging(with_cors.recover(handle_rejection).unify()).boxed()
}

fn health_routes(context: &AppContext) -> BoxedFilter<(Response,)> {
    let health = warp::path!("health")
        .and(warp::get())
        .map(|| handlers::health().into_response());

    let started_at = context.started_at;
    let started = context.started;
    let uptime = warp::path!("api" / "uptime")
        .and(warp::get())
        .map(move || handlers::uptime(started_at, started).into_response());

    health.or(uptime).unify().boxed()
}

fn stats_routes(context: &AppContext) -> BoxedFilter<(Response,)> {
    let live = context.live();

    let get = warp::path!("api" / "stats")
        .and(warp::get())
        .and(with_live(live.clone()))
        .map(handlers::get_stats);

    let submit = warp::path!("api" / "game-result")
        .and(warp::post())
        .and(with_live(live.clone()))
        .and(warp::body::bytes())
        .and_then(handlers::submit_game_result);

    let reset = warp::path!("api" / "reset-stats")
        .and(warp::post())
        .and(with_live(live))
        .and_then(handlers::reset_stats);

    get.or(submit).unify().or(reset).unify().boxed()
}

fn sse_routes(context: &AppContext) -> BoxedFilter<(Response,)> {
    warp::path!("api" / "stats" / "events")
        .and(warp::get())
        .and(with_live(context.live()))
        .map(handlers::stream_stats)
        .boxed()
}

fn with_live(
    live: Arc<LiveStats>,
) -> impl Filter<Extract = (Arc<LiveStats>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&live))
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let context = AppContext::new(config)?;
        Ok(Self { context })
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let bind_addr = Self::bind_addr(context.config())?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(address = %addr, "web server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(io_err) = err
            .source()
            .and_then(|source| source.downcast_ref::<std::io::Error>())
        {
            return ServerError::BindError(std::io::Error::new(io_err.kind(), io_err.to_string()));
        }

        ServerError::ConfigError(err.to_string())
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        tracing::info!(address = %self.addr, "web server stopped");
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_listens_on_8080() {
        let config = ServerConfig::default();
        assert_eq!(config.port(), DEFAULT_PORT);
        assert!(config.database().is_none());
        assert!(config.frontend_url().is_none());
    }

    #[test]
    fn builder_sets_database_and_origin() {
        let config = ServerConfig::for_tests()
            .with_database("data/results.db")
            .with_frontend_url("http://localhost:3000");
        assert_eq!(config.database(), Some(Path::new("data/results.db")));
        assert_eq!(config.frontend_url(), Some("http://localhost:3000"));
    }

    #[test]
    fn origin_validation() {
        assert!(validate_origin("http://localhost:3000").is_ok());
        assert!(validate_origin("https://example.com/").is_ok());
        assert!(validate_origin("localhost:3000").is_err());
        assert!(validate_origin("http://example.com/app").is_err());
        assert!(validate_origin("not a url").is_err());
    }

    #[test]
    fn invalid_frontend_url_rejected_at_startup() {
        let config = ServerConfig::for_tests().with_frontend_url("nope");
        assert!(matches!(
            AppContext::new(config),
            Err(ServerError::ConfigError(_))
        ));
    }

    #[test]
    fn bind_addr_accepts_ip_and_socket_forms() {
        let ip = WebServer::bind_addr(&ServerConfig::new("127.0.0.1", 9000)).unwrap();
        assert_eq!(ip.port(), 9000);
        let full = WebServer::bind_addr(&ServerConfig::new("127.0.0.1:7000", 1)).unwrap();
        assert_eq!(full.port(), 7000);
    }

    #[tokio::test]
    async fn starts_and_stops_on_ephemeral_port() {
        let server = WebServer::from_context(AppContext::new_for_tests());
        let handle = server.start().await.unwrap();
        assert_ne!(handle.address().port(), 0);
        handle.shutdown().await.unwrap();
    }
}
