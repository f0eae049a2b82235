//! Interface to the remote admin service.
//!
//! The console consumes, per record kind, a list read and a delete, plus an
//! update for users, the active-SOS subset read and the trend read. Failures
//! arrive as a single opaque [`ServiceError`] that callers surface as text.

mod http;
mod mock;

use std::future::Future;

use thiserror::Error;

use crate::models::{
    Circle, Editable, Record, RecordId, SosEvent, TrendEntry, TrendWindow, User, UserCard,
};

pub use http::*;
pub use mock::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Admin service is not reachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Admin service returned error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Admin service rejected the request: {0}")]
    Rejected(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Collection read and delete for one record kind.
pub trait RecordSource<R: Record>: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<R>, ServiceError>> + Send;

    fn delete(&self, id: &RecordId) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Partial update for kinds that support editing.
pub trait UpdateSource<R: Editable>: RecordSource<R> {
    fn update(
        &self,
        id: &RecordId,
        patch: &R::Patch,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Read of currently unresolved SOS events.
pub trait ActiveSosSource: RecordSource<SosEvent> {
    fn list_active(&self) -> impl Future<Output = Result<Vec<SosEvent>, ServiceError>> + Send;
}

/// Emergency-type counts for a time window.
pub trait TrendSource: Send + Sync {
    fn trends(
        &self,
        window: TrendWindow,
    ) -> impl Future<Output = Result<Vec<TrendEntry>, ServiceError>> + Send;
}

/// Everything the dashboard consumes from one backend.
pub trait AdminService:
    UpdateSource<User>
    + ActiveSosSource
    + RecordSource<Circle>
    + RecordSource<UserCard>
    + TrendSource
{
}

impl<T> AdminService for T where
    T: UpdateSource<User>
        + ActiveSosSource
        + RecordSource<Circle>
        + RecordSource<UserCard>
        + TrendSource
{
}

/// Adapts an [`ActiveSosSource`] so the active subset can back its own
/// collection screen. Deletes go through the regular SOS delete.
pub struct ActiveSosFeed<'a, S>(pub &'a S);

impl<S: ActiveSosSource> RecordSource<SosEvent> for ActiveSosFeed<'_, S> {
    async fn list(&self) -> Result<Vec<SosEvent>, ServiceError> {
        self.0.list_active().await
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ServiceError> {
        RecordSource::<SosEvent>::delete(self.0, id).await
    }
}

/// Reject identifiers that cannot address a record.
pub(crate) fn ensure_id(id: &RecordId) -> Result<(), ServiceError> {
    if id.is_blank() {
        return Err(ServiceError::InvalidArgument("record id is empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_rejected() {
        assert!(matches!(
            ensure_id(&RecordId::new(" ")),
            Err(ServiceError::InvalidArgument(_))
        ));
        assert!(ensure_id(&RecordId::new("a1")).is_ok());
    }

    #[test]
    fn status_error_message_is_readable() {
        let err = ServiceError::Status {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "Admin service returned error (status 500): boom"
        );
    }

    #[tokio::test]
    async fn active_feed_lists_active_subset_and_deletes_through_sos() {
        let mut open = SosEvent::new("s1");
        open.message = Some("open".into());
        let service = MockAdminService::new()
            .with_sos(vec![open.clone(), SosEvent::new("s2")])
            .with_active_sos(vec![open]);
        let feed = ActiveSosFeed(&service);

        let active = feed.list().await.unwrap();
        assert_eq!(active.len(), 1);

        feed.delete(&RecordId::new("s1")).await.unwrap();
        let remaining: Vec<SosEvent> = RecordSource::<SosEvent>::list(&service).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(feed.list().await.unwrap().is_empty());
    }
}
