use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{ActiveSosSource, RecordSource, ServiceError, TrendSource, UpdateSource};
use crate::models::{
    Circle, Editable, Record, RecordId, RecordKind, SosEvent, TrendEntry, TrendWindow, User,
    UserCard, UserPatch,
};

/// Service call recorded by [`MockAdminService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    List(RecordKind),
    ListActiveSos,
    Delete(RecordKind),
    Update(RecordKind),
    Trends(TrendWindow),
}

#[derive(Default)]
struct MockState {
    users: Vec<User>,
    sos: Vec<SosEvent>,
    active_sos: Vec<SosEvent>,
    circles: Vec<Circle>,
    user_cards: Vec<UserCard>,
    trends: HashMap<TrendWindow, Vec<TrendEntry>>,
    failures: HashMap<MockCall, ServiceError>,
    calls: Vec<MockCall>,
}

impl MockState {
    fn record(&mut self, call: MockCall) -> Result<(), ServiceError> {
        self.calls.push(call);
        match self.failures.get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// In-memory admin service for tests and offline demos.
///
/// Holds one collection per kind, applies deletes and updates to them, and
/// can be scripted to fail specific calls.
#[derive(Default)]
pub struct MockAdminService {
    state: Mutex<MockState>,
}

impl MockAdminService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        self.lock().users = users;
        self
    }

    pub fn with_sos(self, sos: Vec<SosEvent>) -> Self {
        self.lock().sos = sos;
        self
    }

    pub fn with_active_sos(self, sos: Vec<SosEvent>) -> Self {
        self.lock().active_sos = sos;
        self
    }

    pub fn with_circles(self, circles: Vec<Circle>) -> Self {
        self.lock().circles = circles;
        self
    }

    pub fn with_user_cards(self, cards: Vec<UserCard>) -> Self {
        self.lock().user_cards = cards;
        self
    }

    pub fn with_trends(self, window: TrendWindow, entries: Vec<TrendEntry>) -> Self {
        self.lock().trends.insert(window, entries);
        self
    }

    /// Make every subsequent `call` fail with `err` until cleared.
    pub fn fail(&self, call: MockCall, err: ServiceError) {
        self.lock().failures.insert(call, err);
    }

    pub fn clear_failure(&self, call: MockCall) {
        self.lock().failures.remove(&call);
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn remove_by_id<R: Record>(records: &mut Vec<R>, id: &RecordId) -> Result<(), ServiceError> {
    let before = records.len();
    records.retain(|r| r.id() != id);
    if records.len() == before {
        return Err(ServiceError::Status {
            status: 404,
            message: format!("{} not found", R::KIND.label()),
        });
    }
    Ok(())
}

macro_rules! mock_source {
    ($record:ty, $field:ident) => {
        impl RecordSource<$record> for MockAdminService {
            async fn list(&self) -> Result<Vec<$record>, ServiceError> {
                let mut state = self.lock();
                state.record(MockCall::List(<$record>::KIND))?;
                Ok(state.$field.clone())
            }

            async fn delete(&self, id: &RecordId) -> Result<(), ServiceError> {
                super::ensure_id(id)?;
                let mut state = self.lock();
                state.record(MockCall::Delete(<$record>::KIND))?;
                remove_by_id(&mut state.$field, id)
            }
        }
    };
}

mock_source!(User, users);
mock_source!(Circle, circles);
mock_source!(UserCard, user_cards);

impl RecordSource<SosEvent> for MockAdminService {
    async fn list(&self) -> Result<Vec<SosEvent>, ServiceError> {
        let mut state = self.lock();
        state.record(MockCall::List(RecordKind::Sos))?;
        Ok(state.sos.clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ServiceError> {
        super::ensure_id(id)?;
        let mut state = self.lock();
        state.record(MockCall::Delete(RecordKind::Sos))?;
        state.active_sos.retain(|e| &e.id != id);
        remove_by_id(&mut state.sos, id)
    }
}

impl UpdateSource<User> for MockAdminService {
    async fn update(&self, id: &RecordId, patch: &UserPatch) -> Result<(), ServiceError> {
        super::ensure_id(id)?;
        let mut state = self.lock();
        state.record(MockCall::Update(RecordKind::User))?;
        match state.users.iter_mut().find(|u| &u.id == id) {
            Some(user) => {
                user.apply_patch(patch);
                Ok(())
            }
            None => Err(ServiceError::Status {
                status: 404,
                message: "User not found".into(),
            }),
        }
    }
}

impl ActiveSosSource for MockAdminService {
    async fn list_active(&self) -> Result<Vec<SosEvent>, ServiceError> {
        let mut state = self.lock();
        state.record(MockCall::ListActiveSos)?;
        Ok(state.active_sos.clone())
    }
}

impl TrendSource for MockAdminService {
    async fn trends(&self, window: TrendWindow) -> Result<Vec<TrendEntry>, ServiceError> {
        let mut state = self.lock();
        state.record(MockCall::Trends(window))?;
        Ok(state.trends.get(&window).cloned().unwrap_or_default())
    }
}
