//! # plug-server
//!
//! HTTP service for the PLUG waitlist.
//!
//! One process serves the JSON API over axum, keeps entrants in SQLite
//! behind a single async mutex, and delivers email through a [`Mailer`].
//!
//! ## Routes
//!
//! | Method | Path                         | Handler                                 |
//! |--------|------------------------------|-----------------------------------------|
//! | POST   | `/api/waitlist`              | [`handlers::signup::signup`]            |
//! | POST   | `/api/confirm-email`         | [`handlers::confirm::confirm_email`]    |
//! | POST   | `/api/resend-confirmation`   | [`handlers::email::resend_confirmation`]|
//! | POST   | `/api/send-confirmation`     | [`handlers::email::send_confirmation`]  |
//! | GET    | `/api/stats`                 | [`handlers::feed::stats`]               |
//! | GET    | `/api/leaderboard`           | [`handlers::feed::leaderboard`]         |
//! | GET    | `/api/recent-signups`        | [`handlers::feed::recent_signups`]      |
//! | POST   | `/api/referral-visits`       | [`handlers::referral::track_visit`]     |
//! | GET    | `/api/referrals/:code`       | [`handlers::referral::progress`]        |
//! | GET    | `/healthz`                   | [`handlers::health`]                    |

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod validation;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use plug_mail::resend::ResendMailer;
use plug_mail::{LogMailer, Mailer};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::rate_limit::RateLimiter;

/// How often idle rate-limiter keys are dropped.
pub const LIMITER_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Server-wide shared state.
pub struct AppState {
    /// Database connection.
    pub db: Arc<Mutex<rusqlite::Connection>>,
    /// Configuration.
    pub config: ServerConfig,
    /// Outbound email.
    pub mailer: Arc<dyn Mailer>,
    /// Confirmation attempts per caller address.
    pub confirm_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        conn: rusqlite::Connection,
        config: ServerConfig,
        mailer: Arc<dyn Mailer>,
    ) -> Arc<Self> {
        let confirm_limiter =
            RateLimiter::new(config.limits.confirm_max_attempts, config.confirm_window());
        Arc::new(Self {
            db: Arc::new(Mutex::new(conn)),
            config,
            mailer,
            confirm_limiter,
        })
    }
}

/// Pick the mail backend: the HTTP provider when a key is configured,
/// otherwise log-only delivery.
pub fn build_mailer(config: &ServerConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    if config.email.api_key.is_empty() {
        warn!("EMAIL_API_KEY not set, emails will be logged instead of sent");
        return Ok(Arc::new(LogMailer::new()));
    }
    let mailer = ResendMailer::new(
        config.email.api_key.clone(),
        &config.email.api_base_url,
        Duration::from_secs(config.email.timeout_secs),
    )?;
    Ok(Arc::new(mailer))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            warn!(%origin, "ignoring invalid CORS origin: {e}");
            layer
        }
    }
}

/// All API routes with CORS and request tracing applied.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/waitlist", post(handlers::signup::signup))
        .route("/api/confirm-email", post(handlers::confirm::confirm_email))
        .route(
            "/api/resend-confirmation",
            post(handlers::email::resend_confirmation),
        )
        .route(
            "/api/send-confirmation",
            post(handlers::email::send_confirmation),
        )
        .route("/api/stats", get(handlers::feed::stats))
        .route("/api/leaderboard", get(handlers::feed::leaderboard))
        .route("/api/recent-signups", get(handlers::feed::recent_signups))
        .route("/api/referral-visits", post(handlers::referral::track_visit))
        .route("/api/referrals/:code", get(handlers::referral::progress))
        .route("/healthz", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Periodically drop rate-limiter keys with no live attempts.
pub fn spawn_limiter_sweeper(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = state.confirm_limiter.sweep_at(Instant::now()).await;
            if removed > 0 {
                debug!(removed, "swept idle rate-limit entries");
            }
        }
    })
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let sweeper = spawn_limiter_sweeper(state.clone());
    let app = build_router(state);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    sweeper.abort();
    result?;
    Ok(())
}

/// Open storage, bind the configured address and serve until a shutdown signal.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let db_path = config.db_path();
    let conn = plug_db::open(&db_path)?;
    info!(path = %db_path.display(), "Database opened");

    let mailer = build_mailer(&config)?;
    let listen_addr = config.server.listen_addr.clone();
    let state = AppState::new(conn, config, mailer);

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("PLUG waitlist listening on {}", listener.local_addr()?);

    serve(listener, state, shutdown_signal()).await?;

    info!("PLUG waitlist stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use plug_mail::{EmailMessage, MailError, Mailer, MemoryMailer};

    use crate::config::ServerConfig;
    use crate::AppState;

    /// Rejects every message the way the provider would.
    pub struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _message: &EmailMessage) -> plug_mail::Result<String> {
            Err(MailError::Rejected {
                status: 403,
                message: "domain not verified".into(),
            })
        }
    }

    /// In-memory state with a recording mailer.
    pub fn state() -> (Arc<AppState>, Arc<MemoryMailer>) {
        let mailer = Arc::new(MemoryMailer::new());
        (state_with_mailer(mailer.clone()), mailer)
    }

    pub fn state_with_mailer(mailer: Arc<dyn Mailer>) -> Arc<AppState> {
        let conn = plug_db::open_memory().expect("open db");
        let mut config = ServerConfig::default();
        config.server.app_url = "https://plugservices.ng".into();
        AppState::new(conn, config, mailer)
    }
}
