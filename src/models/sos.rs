use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Record, RecordId, RecordKind};

/// Who raised the SOS, with the device battery at send time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub battery_status: Option<f64>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    #[serde(default)]
    pub address: Option<String>,
}

/// A contact notified about the event, in notification order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifiedContact {
    #[serde(default)]
    pub contact_id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notified_via: Option<String>,
    #[serde(default)]
    pub acknowledged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleRef {
    #[serde(default)]
    pub circle_id: Option<RecordId>,
    #[serde(default)]
    pub circle_name: Option<String>,
}

/// Emergency event raised by a user. Immutable apart from deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosEvent {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub emergency_type: Option<String>,
    #[serde(default)]
    pub sender: Option<Sender>,
    #[serde(default)]
    pub user_location: Option<UserLocation>,
    #[serde(default)]
    pub contacts: Vec<NotifiedContact>,
    #[serde(default)]
    pub circles: Vec<CircleRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SosEvent {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            message: None,
            emergency_type: None,
            sender: None,
            user_location: None,
            contacts: Vec::new(),
            circles: Vec::new(),
            created_at: None,
        }
    }

    pub fn sender_name(&self) -> Option<&str> {
        self.sender.as_ref().and_then(|s| s.name.as_deref())
    }

    pub fn sender_user_id(&self) -> Option<&str> {
        self.sender.as_ref().and_then(|s| s.user_id.as_deref())
    }

    pub fn sender_battery(&self) -> Option<f64> {
        self.sender.as_ref().and_then(|s| s.battery_status)
    }

    pub fn address(&self) -> Option<&str> {
        self.user_location.as_ref().and_then(|l| l.address.as_deref())
    }

    /// Names of the associated circles, skipping unnamed references.
    pub fn circle_names(&self) -> Vec<&str> {
        self.circles
            .iter()
            .filter_map(|c| c.circle_name.as_deref())
            .collect()
    }
}

impl Record for SosEvent {
    const KIND: RecordKind = RecordKind::Sos;

    fn id(&self) -> &RecordId {
        &self.id
    }
}
