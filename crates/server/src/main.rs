// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod config;
mod http;
mod live;
mod routes;
mod session;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    extract::FromRef,
    routing::{delete, get, patch, post},
};
use clap::Parser;
use duty_roster::RosterState;
use duty_roster_api::{ApiError, Session, load_chart_roster, load_roster, translate_domain_error};
use duty_roster_backend::{BackendClient, BackendError, TokenStore};
use duty_roster_domain::local_wall_clock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use time::PrimitiveDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::{
    BACKEND_URL_ENV_VAR, CONFIG_FILE_ENV_VAR, FileConfig, Overrides, ServerConfig,
    TIMEZONE_ENV_VAR, WEEK_START_ENV_VAR, load_optional_file,
};
use crate::live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use crate::routes::{
    handle_assign_duty, handle_assign_duty_range, handle_audit_logs, handle_capabilities,
    handle_chart_schedules, handle_create_chart, handle_dashboard_offices, handle_delete_chart,
    handle_export_download, handle_export_preview, handle_export_roster_csv, handle_health,
    handle_import, handle_month_roster, handle_offices, handle_preview_import, handle_remove_duty,
    handle_reorder_dashboard, handle_sms_logs, handle_update_chart, handle_week_roster,
};

/// Duty Roster Server - HTTP gateway in front of the duty roster backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = CONFIG_FILE_ENV_VAR)]
    config: Option<PathBuf>,

    /// Base URL of the roster backend
    #[arg(long, env = BACKEND_URL_ENV_VAR)]
    backend_url: Option<String>,

    /// IANA timezone used for "today" and shifts in progress
    #[arg(long, env = TIMEZONE_ENV_VAR)]
    timezone: Option<String>,

    /// First day of the week, e.g. "sunday"
    #[arg(long, env = WEEK_START_ENV_VAR)]
    week_start: Option<String>,

    /// Address to bind the server to
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to bind the server to
    #[arg(short, long)]
    port: Option<u16>,

    /// Seconds a loaded roster is reused for employee and office lookups
    #[arg(long)]
    roster_cache_ttl_secs: Option<u64>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            backend_url: self.backend_url.clone(),
            timezone: self.timezone.clone(),
            week_start: self.week_start.clone(),
            bind: self.bind.clone(),
            port: self.port,
            roster_cache_ttl_secs: self.roster_cache_ttl_secs,
        }
    }
}

/// Rosters are cached per `(user id, office id)`: lookups fetched with one
/// caller's token are never handed to another caller.
type RosterKey = (i64, i64);

/// A roster and when it was stored.
#[derive(Clone)]
pub struct CachedRoster {
    pub state: RosterState,
    pub stored_at: Instant,
}

/// Application state shared across handlers.
///
/// The backend is the system of record. The roster map only keeps each
/// user's last roster per office so employee and office lookups are not
/// repeated; entries older than the configured TTL are dropped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Client without tokens; each request attaches its caller's.
    pub client: BackendClient,
    pub rosters: Arc<Mutex<HashMap<RosterKey, CachedRoster>>>,
    pub live: Arc<LiveEventBroadcaster>,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live)
    }
}

impl AppState {
    /// Creates the state for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL is invalid.
    pub fn new(config: ServerConfig) -> Result<Self, BackendError> {
        let client: BackendClient = BackendClient::new(&config.backend_url, TokenStore::new())?;
        Ok(Self {
            config: Arc::new(config),
            client,
            rosters: Arc::new(Mutex::new(HashMap::new())),
            live: Arc::new(LiveEventBroadcaster::new()),
        })
    }

    /// Wall clock of the configured timezone.
    pub fn now(&self) -> Result<PrimitiveDateTime, ApiError> {
        local_wall_clock(chrono::Utc::now(), self.config.timezone).map_err(translate_domain_error)
    }

    /// Returns the roster `user_id` last loaded for `office_id`, unless it expired.
    pub async fn cached_roster(&self, user_id: i64, office_id: i64) -> Option<RosterState> {
        let mut rosters = self.rosters.lock().await;
        let key: RosterKey = (user_id, office_id);
        let fresh: bool = rosters
            .get(&key)
            .is_some_and(|cached| cached.stored_at.elapsed() < self.config.roster_cache_ttl);
        if fresh {
            return rosters.get(&key).map(|cached| cached.state.clone());
        }
        if rosters.remove(&key).is_some() {
            debug!(user_id, office_id, "Cached roster expired");
        }
        None
    }

    pub async fn remember(&self, user_id: i64, state: &RosterState) {
        debug!(user_id, office_id = state.office_id(), "Caching roster");
        self.rosters.lock().await.insert(
            (user_id, state.office_id()),
            CachedRoster {
                state: state.clone(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Caches the roster after a mutation and tells live clients.
    pub async fn commit(&self, session: &Session, state: &RosterState, event: &LiveEvent) {
        self.remember(session.user.id, state).await;
        self.live.broadcast(event);
    }

    /// Loads an office's roster, optionally with one of its charts.
    pub async fn load_office(
        &self,
        session: &Session,
        office_id: i64,
        chart_id: Option<i64>,
    ) -> Result<RosterState, ApiError> {
        let cached: Option<RosterState> = self.cached_roster(session.user.id, office_id).await;
        let state: RosterState = load_roster(
            session,
            office_id,
            chart_id,
            self.config.week_start,
            cached.as_ref(),
        )
        .await?;
        self.remember(session.user.id, &state).await;
        Ok(state)
    }

    /// Loads the roster of a chart, whatever its office.
    pub async fn load_chart(&self, session: &Session, chart_id: i64) -> Result<RosterState, ApiError> {
        let state: RosterState =
            load_chart_roster(session, chart_id, self.config.week_start, None).await?;
        self.remember(session.user.id, &state).await;
        Ok(state)
    }
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/roster/week", get(handle_week_roster))
        .route("/roster/month", get(handle_month_roster))
        .route("/capabilities", get(handle_capabilities))
        .route("/duties", post(handle_assign_duty))
        .route("/duties/range", post(handle_assign_duty_range))
        .route("/duties/import/preview", post(handle_preview_import))
        .route("/duties/import", post(handle_import))
        .route("/duties/{id}", delete(handle_remove_duty))
        .route("/duty-charts", post(handle_create_chart))
        .route(
            "/duty-charts/{id}",
            patch(handle_update_chart).delete(handle_delete_chart),
        )
        .route("/duty-charts/{id}/schedules", get(handle_chart_schedules))
        .route("/export/preview", get(handle_export_preview))
        .route("/export/download", get(handle_export_download))
        .route("/export/roster.csv", get(handle_export_roster_csv))
        .route("/audit-logs", get(handle_audit_logs))
        .route("/sms-logs", get(handle_sms_logs))
        .route("/offices", get(handle_offices))
        .route("/dashboard-offices", get(handle_dashboard_offices))
        .route("/dashboard-offices/reorder", post(handle_reorder_dashboard))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Duty Roster Server");

    let file: FileConfig = load_optional_file(args.config.as_deref())?;
    let config: ServerConfig = ServerConfig::resolve(file, args.overrides())?;
    info!(
        backend = %config.backend_url,
        timezone = %config.timezone,
        week_start = %config.week_start,
        "Configuration loaded"
    );

    let listen: std::net::SocketAddr = config.listen;
    let app_state: AppState = AppState::new(config)?;
    let app: Router = build_router(app_state);

    info!("Server listening on {}", listen);
    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
