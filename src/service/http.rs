use std::time::Duration;

use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    ensure_id, ActiveSosSource, RecordSource, ServiceError, TrendSource, UpdateSource,
};
use crate::models::{
    Circle, Record, RecordId, SosEvent, TrendEntry, TrendWindow, User, UserCard, UserPatch,
};

/// Record kinds addressable under the admin API root.
pub trait Resource: Record + DeserializeOwned {
    /// Collection path segment, e.g. `users` for `/users` and `/users/{id}`.
    const PATH: &'static str;
}

impl Resource for User {
    const PATH: &'static str = "users";
}

impl Resource for SosEvent {
    const PATH: &'static str = "sos";
}

impl Resource for Circle {
    const PATH: &'static str = "circles";
}

impl Resource for UserCard {
    const PATH: &'static str = "user-cards";
}

/// Response body: either the bare payload or the `{success, data, message}`
/// envelope the service wraps most collections in.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Bare(T),
    Envelope {
        #[serde(default)]
        success: Option<bool>,
        #[serde(default)]
        data: Option<T>,
        #[serde(default)]
        message: Option<String>,
    },
}

impl<T: Default> Payload<T> {
    fn into_data(self) -> Result<T, ServiceError> {
        match self {
            Payload::Bare(data) => Ok(data),
            Payload::Envelope {
                success: Some(false),
                message,
                ..
            } => Err(ServiceError::Rejected(
                message.unwrap_or_else(|| "request failed".into()),
            )),
            Payload::Envelope { data, .. } => Ok(data.unwrap_or_default()),
        }
    }
}

/// Body of mutation acknowledgements and error responses.
#[derive(Deserialize, Default)]
struct StatusBody {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the admin API.
pub struct AdminClient {
    base_url: Url,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl AdminClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:3000/api/admin`).
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ServiceError::InvalidArgument(format!("base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidArgument(format!(
                "base URL cannot carry paths: {base_url}"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServiceError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                ServiceError::Connection(self.base_url.to_string())
            } else if e.is_timeout() {
                ServiceError::Timeout(self.timeout_secs)
            } else {
                ServiceError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StatusBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "request failed".into());
            tracing::warn!(status = status.as_u16(), %message, "Admin service call failed");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, ServiceError> {
        let response = self.send(request).await?;
        let payload: Payload<Vec<T>> = response
            .json()
            .await
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;
        payload.into_data()
    }

    async fn expect_ack(&self, request: RequestBuilder) -> Result<(), ServiceError> {
        let response = self.send(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(());
        }
        let ack = serde_json::from_str::<StatusBody>(&body).unwrap_or_default();
        if ack.success == Some(false) {
            return Err(ServiceError::Rejected(
                ack.message.unwrap_or_else(|| "request failed".into()),
            ));
        }
        Ok(())
    }
}

impl<R: Resource> RecordSource<R> for AdminClient {
    async fn list(&self) -> Result<Vec<R>, ServiceError> {
        let url = self.endpoint(&[R::PATH]);
        tracing::debug!(kind = %R::KIND, %url, "Listing records");
        self.fetch_list(self.client.get(url)).await
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ServiceError> {
        ensure_id(id)?;
        let url = self.endpoint(&[R::PATH, id.as_str()]);
        tracing::debug!(kind = %R::KIND, %id, "Deleting record");
        self.expect_ack(self.client.delete(url)).await
    }
}

impl UpdateSource<User> for AdminClient {
    async fn update(&self, id: &RecordId, patch: &UserPatch) -> Result<(), ServiceError> {
        ensure_id(id)?;
        if patch.is_empty() {
            return Err(ServiceError::InvalidArgument("update has no fields".into()));
        }
        let url = self.endpoint(&[User::PATH, id.as_str()]);
        tracing::debug!(%id, "Updating user");
        self.expect_ack(self.client.put(url).json(patch)).await
    }
}

impl ActiveSosSource for AdminClient {
    async fn list_active(&self) -> Result<Vec<SosEvent>, ServiceError> {
        let url = self.endpoint(&[SosEvent::PATH, "active"]);
        self.fetch_list(self.client.get(url)).await
    }
}

impl TrendSource for AdminClient {
    async fn trends(&self, window: TrendWindow) -> Result<Vec<TrendEntry>, ServiceError> {
        let url = self.endpoint(&[SosEvent::PATH, "trends"]);
        let request = self.client.get(url).query(&[("period", window.as_str())]);
        self.fetch_list(request).await
    }
}
