//! Reverse geocoding for the User detail view.
//!
//! Best effort only: a failed or disabled lookup degrades to a fixed
//! placeholder and never blocks the rest of the detail projection.

use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{APP_NAME, APP_VERSION};
use crate::models::{GeoPoint, RecordId, User};

pub const LOCATION_NOT_AVAILABLE: &str = "Location not available";
pub const LOCATION_NOT_FOUND: &str = "Location not found";
pub const LOCATION_RESOLVING: &str = "Resolving location...";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Geocoder is not reachable: {0}")]
    Network(String),

    #[error("Geocoder returned status {0}")]
    Status(u16),

    #[error("No address found for coordinates")]
    NotFound,

    #[error("Geocoder response parsing error: {0}")]
    Parsing(String),

    #[error("Invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// Turns a coordinate pair into a human-readable address.
pub trait LocationResolver: Send + Sync {
    fn resolve(&self, point: GeoPoint) -> impl Future<Output = Result<String, LocationError>> + Send;
}

fn validate(point: GeoPoint) -> Result<(), LocationError> {
    let valid = point.latitude.is_finite()
        && point.longitude.is_finite()
        && (-90.0..=90.0).contains(&point.latitude)
        && (-180.0..=180.0).contains(&point.longitude);
    if valid {
        Ok(())
    } else {
        Err(LocationError::InvalidCoordinates {
            latitude: point.latitude,
            longitude: point.longitude,
        })
    }
}

// ═══════════════════════════════════════════
// Nominatim client
// ═══════════════════════════════════════════

#[derive(Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OpenStreetMap Nominatim `/reverse` client.
pub struct NominatimResolver {
    base_url: Url,
    client: reqwest::Client,
}

impl NominatimResolver {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, LocationError> {
        let base_url =
            Url::parse(base_url.trim()).map_err(|e| LocationError::Network(e.to_string()))?;
        // Nominatim's usage policy requires an identifying User-Agent.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(format!("{APP_NAME}/{APP_VERSION}"))
            .build()
            .map_err(|e| LocationError::Network(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn reverse_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.push("reverse");
        }
        url
    }
}

impl LocationResolver for NominatimResolver {
    async fn resolve(&self, point: GeoPoint) -> Result<String, LocationError> {
        validate(point)?;
        let response = self
            .client
            .get(self.reverse_url())
            .query(&[
                ("format", "json".to_string()),
                ("lat", point.latitude.to_string()),
                ("lon", point.longitude.to_string()),
            ])
            .send()
            .await
            .map_err(|e| LocationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::Status(status.as_u16()));
        }
        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Parsing(e.to_string()))?;
        if let Some(err) = body.error {
            tracing::debug!(error = %err, "Geocoder found no address");
            return Err(LocationError::NotFound);
        }
        body.display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(LocationError::NotFound)
    }
}

// ═══════════════════════════════════════════
// Detail view state
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationStatus {
    NotRequested,
    Resolving,
    Resolved(String),
    Unavailable,
}

impl LocationStatus {
    pub fn display(&self) -> &str {
        match self {
            LocationStatus::NotRequested => LOCATION_NOT_AVAILABLE,
            LocationStatus::Resolving => LOCATION_RESOLVING,
            LocationStatus::Resolved(address) => address,
            LocationStatus::Unavailable => LOCATION_NOT_FOUND,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationTicket {
    generation: u64,
}

/// Resolved-address state for the currently selected user.
#[derive(Debug)]
pub struct UserLocationView {
    user: Option<RecordId>,
    point: Option<GeoPoint>,
    status: LocationStatus,
    generation: u64,
}

impl Default for UserLocationView {
    fn default() -> Self {
        Self {
            user: None,
            point: None,
            status: LocationStatus::NotRequested,
            generation: 0,
        }
    }
}

impl UserLocationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &LocationStatus {
        &self.status
    }

    pub fn user(&self) -> Option<&RecordId> {
        self.user.as_ref()
    }

    /// External map link for the selected user's last known position.
    pub fn maps_url(&self) -> Option<String> {
        self.point.map(|p| p.maps_url())
    }

    /// Point the view at `user`. Returns a ticket when a lookup should be
    /// issued, `None` when the user has no known position.
    pub fn begin(&mut self, user: &User) -> Option<LocationTicket> {
        self.generation += 1;
        self.user = Some(user.id.clone());
        self.point = user.location;
        match user.location {
            Some(_) => {
                self.status = LocationStatus::Resolving;
                Some(LocationTicket {
                    generation: self.generation,
                })
            }
            None => {
                self.status = LocationStatus::NotRequested;
                None
            }
        }
    }

    /// Apply a lookup result; results for a previously selected user are ignored.
    pub fn finish(&mut self, ticket: LocationTicket, result: Result<String, LocationError>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!("Discarding stale location lookup");
            return false;
        }
        self.status = match result {
            Ok(address) => LocationStatus::Resolved(address),
            Err(e) => {
                tracing::warn!(error = %e, "Location lookup failed");
                LocationStatus::Unavailable
            }
        };
        true
    }

    pub fn clear(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            ..Self::default()
        };
    }

    /// Resolve the address for `user`. With no resolver configured the view
    /// stays at the not-available placeholder.
    pub async fn refresh<L: LocationResolver>(&mut self, resolver: Option<&L>, user: &User) {
        let (Some(ticket), Some(point)) = (self.begin(user), user.location) else {
            return;
        };
        let Some(resolver) = resolver else {
            self.status = LocationStatus::NotRequested;
            return;
        };
        let result = resolver.resolve(point).await;
        self.finish(ticket, result);
    }
}
