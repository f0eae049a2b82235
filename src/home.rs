//! Dashboard home: count tiles, tracking search, result modal and the
//! trend panel, on top of the five list screens.
//!
//! Each list screen owns its collection. The dashboard only ever learns
//! their sizes through the [`CountReporter`] handed to each screen, and the
//! tracking search fetches its own copy of the chosen collection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::collection::{CollectionController, CountReporter, ScreenLabels};
use crate::detail::{project, search_row, AnyRecord, DetailField, SearchResultRow};
use crate::location::{LocationResolver, UserLocationView};
use crate::models::{Circle, RecordId, SosEvent, User, UserCard};
use crate::search::SearchQuery;
use crate::service::{ActiveSosFeed, AdminService, RecordSource, ServiceError};
use crate::trends::{ChartSeries, TrendPanel, TrendSummary};

// ---------------------------------------------------------------------------
// Count tiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountTile {
    ActiveUsers,
    TotalSos,
    ActiveSos,
    UserCards,
    Circles,
}

impl CountTile {
    pub const ALL: [CountTile; 5] = [
        Self::ActiveUsers,
        Self::TotalSos,
        Self::ActiveSos,
        Self::UserCards,
        Self::Circles,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ActiveUsers => "Active Users",
            Self::TotalSos => "Total SOS's",
            Self::ActiveSos => "Active SOS's",
            Self::UserCards => "User Cards",
            Self::Circles => "Circles",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Tile values written by the list screens' reporters.
#[derive(Debug, Clone, Default)]
pub struct DashboardCounts {
    values: Arc<[AtomicUsize; 5]>,
}

impl DashboardCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write-only handle for one tile.
    pub fn reporter(&self, tile: CountTile) -> CountReporter {
        let values = Arc::clone(&self.values);
        CountReporter::new(move |count| {
            values[tile.index()].store(count, Ordering::Relaxed);
            tracing::debug!(tile = tile.label(), count, "Count reported");
        })
    }

    pub fn get(&self, tile: CountTile) -> usize {
        self.values[tile.index()].load(Ordering::Relaxed)
    }

    pub fn tiles(&self) -> Vec<TileValue> {
        CountTile::ALL
            .iter()
            .map(|&tile| TileValue {
                tile,
                label: tile.label(),
                count: self.get(tile),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileValue {
    pub tile: CountTile,
    pub label: &'static str,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Tracking search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    User,
    Sos,
}

impl TrackKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "Track User",
            Self::Sos => "Track SOS",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("Please enter a user name or user ID.")]
    EmptyQuery,

    #[error("Failed to fetch search results: {0}")]
    Service(#[from] ServiceError),
}

/// Outcome of one tracking search; every record carries its kind tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackResults {
    pub kind: TrackKind,
    pub query: String,
    pub records: Vec<AnyRecord>,
}

impl TrackResults {
    pub fn rows(&self) -> Vec<SearchResultRow> {
        self.records.iter().map(|r| search_row(r.as_record())).collect()
    }

    pub fn find(&self, id: &RecordId) -> Option<&AnyRecord> {
        self.records.iter().find(|r| r.as_record().id() == id)
    }
}

fn user_matches(query: &SearchQuery, user: &User) -> bool {
    query.matches(user)
        || query.matches_text(user.id.as_str())
        || user.uid.as_deref().is_some_and(|uid| query.matches_text(uid))
}

fn sos_matches(query: &SearchQuery, event: &SosEvent) -> bool {
    query.matches(event)
        || query.matches_text(event.id.as_str())
        || event
            .sender_user_id()
            .is_some_and(|uid| query.matches_text(uid))
}

/// Fetch the chosen collection and keep records matching `input` by any
/// searchable field or by identifier.
pub async fn track<S>(source: &S, kind: TrackKind, input: &str) -> Result<TrackResults, TrackError>
where
    S: RecordSource<User> + RecordSource<SosEvent>,
{
    if input.trim().is_empty() {
        return Err(TrackError::EmptyQuery);
    }
    let query = SearchQuery::new(input.trim());

    let records: Vec<AnyRecord> = match kind {
        TrackKind::User => RecordSource::<User>::list(source)
            .await?
            .into_iter()
            .filter(|u| user_matches(&query, u))
            .map(AnyRecord::User)
            .collect(),
        TrackKind::Sos => RecordSource::<SosEvent>::list(source)
            .await?
            .into_iter()
            .filter(|e| sos_matches(&query, e))
            .map(AnyRecord::Sos)
            .collect(),
    };

    tracing::info!(kind = kind.label(), hits = records.len(), "Tracking search finished");
    Ok(TrackResults {
        kind,
        query: query.as_str().to_string(),
        records,
    })
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Serializable view of the whole dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub tiles: Vec<TileValue>,
    pub trend_window: String,
    pub trend_series: ChartSeries,
    pub trend_summary: TrendSummary,
    pub trend_error: Option<String>,
    pub screen_messages: Vec<(String, String)>,
}

pub struct Dashboard {
    counts: DashboardCounts,
    pub users: CollectionController<User>,
    pub sos: CollectionController<SosEvent>,
    pub active_sos: CollectionController<SosEvent>,
    pub circles: CollectionController<Circle>,
    pub user_cards: CollectionController<UserCard>,
    pub trends: TrendPanel,
    pub user_location: UserLocationView,
    tracking: Option<TrackResults>,
    tracking_error: Option<String>,
    modal: Option<AnyRecord>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        let counts = DashboardCounts::new();
        Self {
            users: CollectionController::new(ScreenLabels::USERS)
                .with_reporter(counts.reporter(CountTile::ActiveUsers)),
            sos: CollectionController::new(ScreenLabels::SOS)
                .with_reporter(counts.reporter(CountTile::TotalSos)),
            active_sos: CollectionController::new(ScreenLabels::ACTIVE_SOS)
                .with_reporter(counts.reporter(CountTile::ActiveSos)),
            circles: CollectionController::new(ScreenLabels::CIRCLES)
                .with_reporter(counts.reporter(CountTile::Circles)),
            user_cards: CollectionController::new(ScreenLabels::USER_CARDS)
                .with_reporter(counts.reporter(CountTile::UserCards)),
            trends: TrendPanel::new(),
            user_location: UserLocationView::new(),
            tracking: None,
            tracking_error: None,
            modal: None,
            counts,
        }
    }

    pub fn counts(&self) -> &DashboardCounts {
        &self.counts
    }

    /// Mount every screen: fetch all five collections and the default trend window.
    pub async fn load_all<S: AdminService>(&mut self, source: &S) {
        tracing::info!("Loading dashboard");
        self.users.load(source).await;
        self.sync_user_location();
        self.sos.load(source).await;
        self.active_sos.load(&ActiveSosFeed(source)).await;
        self.circles.load(source).await;
        self.user_cards.load(source).await;
        self.trends.refresh(source).await;
    }

    /// Select a user on the Users screen and resolve their address.
    pub async fn select_user<L: LocationResolver>(
        &mut self,
        id: &RecordId,
        resolver: Option<&L>,
    ) -> bool {
        if !self.users.select(id) {
            return false;
        }
        if let Some(user) = self.users.selected().cloned() {
            self.user_location.refresh(resolver, &user).await;
        }
        true
    }

    /// Delete a user from the Users screen. The location view is reset when
    /// it was showing the deleted user.
    pub async fn delete_user<S: RecordSource<User>>(&mut self, source: &S, id: &RecordId) -> bool {
        let deleted = self.users.delete(source, id).await;
        self.sync_user_location();
        deleted
    }

    pub fn deselect_user(&mut self) {
        self.users.clear_selection();
        self.sync_user_location();
    }

    pub fn unmount_users(&mut self) {
        self.users.unmount();
        self.sync_user_location();
    }

    /// The location view only ever describes the currently selected user.
    fn sync_user_location(&mut self) {
        let selected = self.users.selected().map(|u| &u.id);
        let stale = self.user_location.user().is_some() && self.user_location.user() != selected;
        if stale {
            tracing::debug!("Clearing location of deselected user");
            self.user_location.clear();
        }
    }

    pub async fn track<S>(&mut self, source: &S, kind: TrackKind, input: &str) -> Option<&TrackResults>
    where
        S: RecordSource<User> + RecordSource<SosEvent>,
    {
        self.modal = None;
        match track(source, kind, input).await {
            Ok(results) => {
                self.tracking_error = None;
                self.tracking = Some(results);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Tracking search failed");
                self.tracking = None;
                self.tracking_error = Some(e.to_string());
            }
        }
        self.tracking.as_ref()
    }

    pub fn tracking(&self) -> Option<&TrackResults> {
        self.tracking.as_ref()
    }

    pub fn tracking_error(&self) -> Option<&str> {
        self.tracking_error.as_deref()
    }

    /// Open the result modal for `id`, returning its kind-dispatched detail.
    pub fn open_result(&mut self, id: &RecordId) -> Option<Vec<DetailField>> {
        let record = self.tracking.as_ref()?.find(id)?.clone();
        let fields = project(record.as_record());
        self.modal = Some(record);
        Some(fields)
    }

    pub fn modal(&self) -> Option<&AnyRecord> {
        self.modal.as_ref()
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let screen_messages = [
            (self.users.labels().title, self.users.message()),
            (self.sos.labels().title, self.sos.message()),
            (self.active_sos.labels().title, self.active_sos.message()),
            (self.circles.labels().title, self.circles.message()),
            (self.user_cards.labels().title, self.user_cards.message()),
        ]
        .into_iter()
        .filter_map(|(title, msg)| msg.map(|m| (title.to_string(), m.to_string())))
        .collect();

        DashboardSnapshot {
            tiles: self.counts.tiles(),
            trend_window: self.trends.window().label().to_string(),
            trend_series: self.trends.series(),
            trend_summary: self.trends.summary(),
            trend_error: self.trends.error().map(str::to_string),
            screen_messages,
        }
    }
}
