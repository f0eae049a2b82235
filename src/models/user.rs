use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Editable, Record, RecordId, RecordKind};

/// Last known device position of a user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// External map link for the point.
    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

/// End user of the SOS application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    /// Application-level user id, distinct from the storage id.
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "phoneNumber", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub battery_level: Option<f64>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: impl Into<RecordId>, name: &str, email: &str) -> Self {
        Self {
            id: id.into(),
            uid: None,
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            status: None,
            battery_level: None,
            location: None,
            profile_image: None,
            created_at: None,
        }
    }
}

/// Partial update accepted by `PUT /users/{id}`.
///
/// Absent fields are left untouched on the server and in the held record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

impl Record for User {
    const KIND: RecordKind = RecordKind::User;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Editable for User {
    type Patch = UserPatch;

    fn draft_patch(&self) -> UserPatch {
        UserPatch {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            phone: self.phone.clone(),
        }
    }

    fn apply_patch(&mut self, patch: &UserPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_service_shape() {
        let json = r#"{
            "_id": {"$oid": "u1"},
            "name": "Ann",
            "email": "ann@example.com",
            "phoneNumber": "555-0101",
            "batteryLevel": 64,
            "location": {"latitude": 6.5, "longitude": 3.4},
            "createdAt": "2024-05-01T10:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.phone.as_deref(), Some("555-0101"));
        assert_eq!(user.battery_level, Some(64.0));
        assert!(user.status.is_none());
        assert!(user.created_at.is_some());
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let user: User = serde_json::from_str(r#"{"_id": "u2"}"#).unwrap();
        assert_eq!(user.name, "");
        assert!(user.location.is_none());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = UserPatch {
            phone: Some("555".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"phoneNumber": "555"}));
    }

    #[test]
    fn apply_patch_merges_fields() {
        let mut user = User::new("u1", "Ann", "ann@example.com");
        user.apply_patch(&UserPatch {
            name: Some("Anne".into()),
            email: None,
            phone: Some("555-0199".into()),
        });
        assert_eq!(user.name, "Anne");
        assert_eq!(user.email, "ann@example.com");
        assert_eq!(user.phone.as_deref(), Some("555-0199"));
    }

    #[test]
    fn draft_patch_copies_editable_fields() {
        let mut user = User::new("u1", "Ann", "ann@example.com");
        user.phone = Some("1".into());
        let draft = user.draft_patch();
        assert_eq!(draft.name.as_deref(), Some("Ann"));
        assert_eq!(draft.phone.as_deref(), Some("1"));
    }

    #[test]
    fn maps_url_uses_coordinates() {
        let point = GeoPoint { latitude: 6.5, longitude: 3.25 };
        assert_eq!(point.maps_url(), "https://www.google.com/maps?q=6.5,3.25");
    }
}
