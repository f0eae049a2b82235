pub mod collection; // Collection Controller: fetch, filter, select, mutate
pub mod config;
pub mod detail; // Detail Dispatcher
pub mod home; // Dashboard home: tiles, tracking search, trend panel
pub mod location; // Reverse geocoding for User detail
pub mod models;
pub mod search; // Search Engine
pub mod service; // Admin API client + mock
pub mod trends; // Trend Aggregator

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::AdminConfig;
use crate::home::{Dashboard, DashboardSnapshot};
use crate::location::NominatimResolver;
use crate::service::{AdminClient, ServiceError};

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

/// Install the fmt subscriber, honouring `RUST_LOG` when set.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Headless console run: load every screen against the configured admin API
/// and return the resulting dashboard snapshot.
pub async fn run() -> Result<DashboardSnapshot, RunError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AdminConfig::from_env()?;
    tracing::info!(
        api = %config.api_base_url,
        timeout_secs = config.request_timeout_secs,
        geocoding = config.geocoding_enabled,
        "Configuration loaded"
    );

    let client = AdminClient::new(&config.api_base_url, config.request_timeout_secs)?;
    let mut dashboard = Dashboard::new();
    dashboard.load_all(&client).await;

    let resolver = if config.geocoding_enabled {
        match NominatimResolver::new(&config.geocoder_base_url, config.request_timeout_secs) {
            Ok(resolver) => Some(resolver),
            Err(e) => {
                tracing::warn!(error = %e, "Geocoding disabled");
                None
            }
        }
    } else {
        None
    };

    // Resolve the first located user so the detail view has something to show.
    let first_located = dashboard
        .users
        .records()
        .iter()
        .find(|u| u.location.is_some())
        .map(|u| u.id.clone());
    if let Some(id) = first_located {
        dashboard.select_user(&id, resolver.as_ref()).await;
        tracing::info!(
            user = %id,
            location = dashboard.user_location.status().display(),
            "Selected user"
        );
    }

    let snapshot = dashboard.snapshot();
    for tile in &snapshot.tiles {
        tracing::info!(tile = tile.label, count = tile.count, "Dashboard tile");
    }
    for (screen, message) in &snapshot.screen_messages {
        tracing::warn!(%screen, %message, "Screen message");
    }
    Ok(snapshot)
}
