//! Collection Controller: fetch, filter, select and mutate one record
//! collection on one screen.
//!
//! Lifecycle: `Loading → Ready | Empty | Error`. Selection and edit mode are
//! side information on top of `Ready`. Every transition that changes the held
//! collection's size reports the new size through the screen's
//! [`CountReporter`].
//!
//! Each asynchronous operation is split into a synchronous begin/finish pair
//! around the service call so a caller can keep the controller available
//! while the call is in flight. Fetch results carry a [`FetchTicket`]; a
//! result whose ticket was superseded by a newer fetch or by
//! [`CollectionController::unmount`] is discarded.

mod labels;
mod report;

pub use labels::*;
pub use report::*;

use serde::Serialize;

use crate::models::{Editable, Record, RecordId};
use crate::search::{self, SearchQuery, Searchable};
use crate::service::{RecordSource, ServiceError, UpdateSource};

/// Coarse screen state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum CollectionState {
    Loading,
    Ready,
    Empty(String),
    Error(String),
}

/// Identifies one fetch; only the latest ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

pub struct CollectionController<R: Record> {
    labels: ScreenLabels,
    state: CollectionState,
    records: Vec<R>,
    selected: Option<RecordId>,
    editing: Option<RecordId>,
    query: SearchQuery,
    last_error: Option<String>,
    generation: u64,
    mounted: bool,
    reporter: Option<CountReporter>,
}

impl<R: Record> CollectionController<R> {
    pub fn new(labels: ScreenLabels) -> Self {
        Self {
            labels,
            state: CollectionState::Loading,
            records: Vec::new(),
            selected: None,
            editing: None,
            query: SearchQuery::default(),
            last_error: None,
            generation: 0,
            mounted: true,
            reporter: None,
        }
    }

    /// Controller with the default labels for `R`.
    pub fn for_kind() -> Self {
        Self::new(ScreenLabels::for_kind(R::KIND))
    }

    pub fn with_reporter(mut self, reporter: CountReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    // ── Read access ─────────────────────────────────────────

    pub fn labels(&self) -> &ScreenLabels {
        &self.labels
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == CollectionState::Loading
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Currently selected record; always a member of the held collection.
    pub fn selected(&self) -> Option<&R> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Id of the record in edit mode, if any.
    pub fn editing(&self) -> Option<&RecordId> {
        self.editing.as_ref()
    }

    /// Message to show in place of content: the fetch error or empty notice,
    /// otherwise the most recent mutation failure.
    pub fn message(&self) -> Option<&str> {
        match &self.state {
            CollectionState::Error(msg) | CollectionState::Empty(msg) => Some(msg),
            _ => self.last_error.as_deref(),
        }
    }

    /// Most recent mutation failure, kept until dismissed or replaced.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    // ── Fetch ───────────────────────────────────────────────

    /// Enter `Loading` and issue a ticket for the fetch about to start.
    pub fn begin_load(&mut self) -> FetchTicket {
        self.generation += 1;
        self.mounted = true;
        self.state = CollectionState::Loading;
        self.last_error = None;
        tracing::debug!(kind = %R::KIND, generation = self.generation, "Fetch started");
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Returns `false` when the ticket is stale and the
    /// result was discarded.
    pub fn finish_load(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<R>, ServiceError>,
    ) -> bool {
        if !self.mounted || ticket.generation != self.generation {
            tracing::debug!(
                kind = %R::KIND,
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale fetch result"
            );
            return false;
        }

        match result {
            Ok(records) if records.is_empty() => {
                tracing::info!(kind = %R::KIND, "Fetched empty collection");
                self.records.clear();
                self.state = CollectionState::Empty(self.labels.empty.to_string());
            }
            Ok(records) => {
                tracing::info!(kind = %R::KIND, count = records.len(), "Fetched collection");
                self.records = records;
                self.state = CollectionState::Ready;
            }
            Err(e) => {
                tracing::warn!(kind = %R::KIND, error = %e, "Fetch failed");
                self.records.clear();
                self.state = CollectionState::Error(format!("{}: {e}", self.labels.fetch_failed));
            }
        }

        self.retain_valid_selection();
        self.report_count();
        true
    }

    /// Fetch the collection from `source`.
    pub async fn load<S: RecordSource<R>>(&mut self, source: &S) -> bool {
        let ticket = self.begin_load();
        let result = source.list().await;
        self.finish_load(ticket, result)
    }

    /// Discard the collection; any in-flight result arriving later is ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
        self.records.clear();
        self.selected = None;
        self.editing = None;
        self.query = SearchQuery::default();
        self.last_error = None;
        self.state = CollectionState::Loading;
        tracing::debug!(kind = %R::KIND, "Screen unmounted");
    }

    // ── Selection ───────────────────────────────────────────

    /// Select the record with `id`. Returns `false` (and leaves the selection
    /// unchanged) when no such record is held.
    pub fn select(&mut self, id: &RecordId) -> bool {
        if self.get(id).is_none() {
            tracing::debug!(kind = %R::KIND, %id, "Ignoring selection of unknown record");
            return false;
        }
        if self.editing.as_ref().is_some_and(|e| e != id) {
            self.editing = None;
        }
        self.selected = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.editing = None;
    }

    // ── Delete ──────────────────────────────────────────────

    /// Apply the outcome of deleting `id` against the collection as held now.
    /// Returns `true` when the delete succeeded.
    pub fn finish_delete(&mut self, id: &RecordId, result: Result<(), ServiceError>) -> bool {
        if !self.mounted {
            return false;
        }
        if let Err(e) = result {
            tracing::warn!(kind = %R::KIND, %id, error = %e, "Delete failed");
            self.last_error = Some(format!("{}: {e}", self.labels.delete_failed));
            return false;
        }

        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        if self.records.len() == before {
            tracing::debug!(kind = %R::KIND, %id, "Deleted record was not held; nothing removed");
        } else {
            tracing::info!(kind = %R::KIND, %id, remaining = self.records.len(), "Record deleted");
        }

        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.editing.as_ref() == Some(id) {
            self.editing = None;
        }
        if self.records.is_empty() && self.state == CollectionState::Ready {
            self.state = CollectionState::Empty(self.labels.empty.to_string());
        }
        self.report_count();
        true
    }

    pub async fn delete<S: RecordSource<R>>(&mut self, source: &S, id: &RecordId) -> bool {
        let result = source.delete(id).await;
        self.finish_delete(id, result)
    }

    // ── Internals ───────────────────────────────────────────

    fn retain_valid_selection(&mut self) {
        if let Some(id) = &self.selected {
            if !self.records.iter().any(|r| r.id() == id) {
                self.selected = None;
            }
        }
        if let Some(id) = &self.editing {
            if !self.records.iter().any(|r| r.id() == id) {
                self.editing = None;
            }
        }
    }

    fn report_count(&self) {
        if let Some(reporter) = &self.reporter {
            reporter.report(self.records.len());
        }
    }
}

// ── Search ──────────────────────────────────────────────────

impl<R: Searchable> CollectionController<R> {
    pub fn set_query(&mut self, input: &str) {
        self.query = SearchQuery::new(input);
    }

    pub fn clear_query(&mut self) {
        self.query = SearchQuery::default();
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Records passing the live query, recomputed on every call.
    pub fn visible(&self) -> Vec<&R> {
        search::filter(&self.records, &self.query)
    }
}

// ── Update (editable kinds only) ────────────────────────────

impl<R: Editable> CollectionController<R> {
    /// Enter edit mode for `id` and return a draft seeded from the record.
    pub fn begin_edit(&mut self, id: &RecordId) -> Option<R::Patch> {
        let draft = self.get(id)?.draft_patch();
        self.selected = Some(id.clone());
        self.editing = Some(id.clone());
        Some(draft)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Apply the outcome of updating `id` with `patch`. On success the patch
    /// is merged into the held record and edit mode ends; on failure edit
    /// mode stays active. Returns `true` when the update succeeded.
    pub fn finish_update(
        &mut self,
        id: &RecordId,
        patch: &R::Patch,
        result: Result<(), ServiceError>,
    ) -> bool {
        if !self.mounted {
            return false;
        }
        if let Err(e) = result {
            tracing::warn!(kind = %R::KIND, %id, error = %e, "Update failed");
            self.last_error = Some(format!("{}: {e}", self.labels.update_failed));
            return false;
        }

        match self.records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                record.apply_patch(patch);
                tracing::info!(kind = %R::KIND, %id, "Record updated");
            }
            None => tracing::debug!(kind = %R::KIND, %id, "Updated record no longer held"),
        }
        if self.editing.as_ref() == Some(id) {
            self.editing = None;
        }
        true
    }

    pub async fn update<S: UpdateSource<R>>(
        &mut self,
        source: &S,
        id: &RecordId,
        patch: &R::Patch,
    ) -> bool {
        let result = source.update(id, patch).await;
        self.finish_update(id, patch, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Circle, RecordKind, SosEvent, User, UserPatch};
    use crate::service::{MockAdminService, MockCall};
    use std::sync::{Arc, Mutex};

    fn ann_and_bob() -> Vec<User> {
        vec![
            User::new("1", "Ann", "ann@example.com"),
            User::new("2", "Bob", "bob@example.com"),
        ]
    }

    fn recording_reporter() -> (CountReporter, Arc<Mutex<Vec<usize>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = CountReporter::new(move |n| sink.lock().unwrap().push(n));
        (reporter, seen)
    }

    fn id(s: &str) -> RecordId {
        RecordId::new(s)
    }

    #[tokio::test]
    async fn load_success_enters_ready_and_reports_count() {
        let service = MockAdminService::new().with_users(ann_and_bob());
        let (reporter, seen) = recording_reporter();
        let mut users = CollectionController::<User>::for_kind().with_reporter(reporter);

        assert!(users.is_loading());
        assert!(users.load(&service).await);
        assert_eq!(users.state(), &CollectionState::Ready);
        assert_eq!(users.len(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn load_empty_enters_empty_with_message() {
        let service = MockAdminService::new();
        let (reporter, seen) = recording_reporter();
        let mut circles = CollectionController::<Circle>::for_kind().with_reporter(reporter);

        circles.load(&service).await;
        assert_eq!(
            circles.state(),
            &CollectionState::Empty("No circles found.".into())
        );
        assert_eq!(circles.message(), Some("No circles found."));
        assert_eq!(*seen.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn load_failure_leaves_collection_empty() {
        let service = MockAdminService::new().with_users(ann_and_bob());
        service.fail(
            MockCall::List(RecordKind::User),
            ServiceError::Connection("http://localhost:3000".into()),
        );
        let mut users = CollectionController::<User>::for_kind();

        users.load(&service).await;
        assert!(users.is_empty());
        match users.state() {
            CollectionState::Error(msg) => {
                assert!(msg.starts_with("Failed to fetch users: "));
                assert!(msg.contains("not reachable"));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut users = CollectionController::<User>::for_kind();
        let first = users.begin_load();
        let second = users.begin_load();

        assert!(users.finish_load(second, Ok(ann_and_bob())));
        assert!(!users.finish_load(first, Ok(Vec::new())));
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn result_after_unmount_is_discarded() {
        let (reporter, seen) = recording_reporter();
        let mut users = CollectionController::<User>::for_kind().with_reporter(reporter);
        let ticket = users.begin_load();
        users.unmount();

        assert!(!users.finish_load(ticket, Ok(ann_and_bob())));
        assert!(users.is_empty());
        assert!(seen.lock().unwrap().is_empty());
        assert!(!users.finish_delete(&id("1"), Ok(())));
    }

    #[tokio::test]
    async fn select_requires_membership() {
        let service = MockAdminService::new().with_users(ann_and_bob());
        let mut users = CollectionController::<User>::for_kind();
        users.load(&service).await;

        assert!(users.select(&id("2")));
        assert_eq!(users.selected().map(|u| u.name.as_str()), Some("Bob"));
        assert!(!users.select(&id("99")));
        assert_eq!(users.selected().map(|u| u.name.as_str()), Some("Bob"));
    }

    #[tokio::test]
    async fn deleting_selected_record_clears_selection() {
        let service = MockAdminService::new().with_users(ann_and_bob());
        let (reporter, seen) = recording_reporter();
        let mut users = CollectionController::<User>::for_kind().with_reporter(reporter);
        users.load(&service).await;
        users.select(&id("1"));

        assert!(users.delete(&service, &id("1")).await);
        assert!(users.selected().is_none());
        assert_eq!(users.len(), 1);
        assert_eq!(*seen.lock().unwrap(), vec![2, 1]);
    }

    #[tokio::test]
    async fn delete_failure_keeps_collection_and_selection() {
        let service = MockAdminService::new().with_users(ann_and_bob());
        let mut users = CollectionController::<User>::for_kind();
        users.load(&service).await;
        users.select(&id("1"));
        service.fail(
            MockCall::Delete(RecordKind::User),
            ServiceError::Status {
                status: 500,
                message: "nope".into(),
            },
        );

        assert!(!users.delete(&service, &id("1")).await);
        assert_eq!(users.len(), 2);
        assert!(users.selected().is_some());
        assert_eq!(users.state(), &CollectionState::Ready);
        assert!(users
            .last_error()
            .is_some_and(|m| m.starts_with("Failed to delete user")));
    }

    #[test]
    fn latest_mutation_error_wins() {
        let mut users = CollectionController::<User>::for_kind();
        let ticket = users.begin_load();
        users.finish_load(ticket, Ok(ann_and_bob()));
        users.finish_delete(&id("1"), Err(ServiceError::Timeout(5)));
        users.finish_delete(&id("2"), Err(ServiceError::Rejected("locked".into())));
        assert!(users.last_error().is_some_and(|m| m.contains("locked")));
        users.dismiss_error();
        assert!(users.message().is_none());
    }

    #[test]
    fn rapid_deletes_keep_count_in_sync() {
        let (reporter, seen) = recording_reporter();
        let mut users = CollectionController::<User>::for_kind().with_reporter(reporter);
        let ticket = users.begin_load();
        users.finish_load(ticket, Ok(ann_and_bob()));

        // Responses completing out of issue order each apply to the latest state.
        users.finish_delete(&id("2"), Ok(()));
        users.finish_delete(&id("1"), Ok(()));
        users.finish_delete(&id("1"), Ok(()));

        assert_eq!(*seen.lock().unwrap(), vec![2, 1, 0, 0]);
        assert_eq!(users.state(), &CollectionState::Empty("No users found.".into()));
    }

    #[tokio::test]
    async fn search_reflects_deletes_immediately() {
        let service = MockAdminService::new().with_users(ann_and_bob());
        let mut users = CollectionController::<User>::for_kind();
        users.load(&service).await;
        users.set_query("an");
        assert_eq!(users.visible().len(), 1);

        users.delete(&service, &id("1")).await;
        assert!(users.visible().is_empty());
        users.clear_query();
        assert_eq!(users.visible().len(), 1);
    }

    #[tokio::test]
    async fn update_merges_patch_and_leaves_edit_mode() {
        let service = MockAdminService::new().with_users(ann_and_bob());
        let mut users = CollectionController::<User>::for_kind();
        users.load(&service).await;

        let mut draft = users.begin_edit(&id("1")).unwrap();
        assert_eq!(users.editing(), Some(&id("1")));
        draft.name = Some("Anne".into());

        assert!(users.update(&service, &id("1"), &draft).await);
        assert!(users.editing().is_none());
        assert_eq!(users.get(&id("1")).unwrap().name, "Anne");
        assert_eq!(users.selected().unwrap().name, "Anne");
    }

    #[tokio::test]
    async fn update_failure_stays_in_edit_mode() {
        let service = MockAdminService::new().with_users(ann_and_bob());
        let mut users = CollectionController::<User>::for_kind();
        users.load(&service).await;
        service.fail(
            MockCall::Update(RecordKind::User),
            ServiceError::Rejected("email taken".into()),
        );

        let patch = UserPatch {
            email: Some("bob@example.com".into()),
            ..Default::default()
        };
        users.begin_edit(&id("1"));
        assert!(!users.update(&service, &id("1"), &patch).await);
        assert_eq!(users.editing(), Some(&id("1")));
        assert_eq!(users.get(&id("1")).unwrap().email, "ann@example.com");
        assert!(users
            .last_error()
            .is_some_and(|m| m.starts_with("Failed to update user")));
    }

    #[tokio::test]
    async fn reload_drops_selection_of_vanished_record() {
        let service = MockAdminService::new().with_sos(vec![SosEvent::new("s1")]);
        let mut sos = CollectionController::<SosEvent>::for_kind();
        sos.load(&service).await;
        sos.select(&id("s1"));

        let ticket = sos.begin_load();
        sos.finish_load(ticket, Ok(vec![SosEvent::new("s2")]));
        assert!(sos.selected().is_none());
    }

    #[test]
    fn begin_edit_on_unknown_record_is_none() {
        let mut users = CollectionController::<User>::for_kind();
        assert!(users.begin_edit(&id("nope")).is_none());
        assert!(users.editing().is_none());
    }
}
