use serde::{Deserialize, Serialize};

use super::{Record, RecordId, RecordKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMember {
    #[serde(default)]
    pub user_id: Option<RecordId>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Contact circle: a named group of users managed by one admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub circle_code: Option<String>,
    #[serde(default)]
    pub admin_id: Option<RecordId>,
    #[serde(default)]
    pub contacts: Vec<CircleMember>,
}

impl Circle {
    pub fn new(id: impl Into<RecordId>, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            circle_code: None,
            admin_id: None,
            contacts: Vec::new(),
        }
    }
}

impl Record for Circle {
    const KIND: RecordKind = RecordKind::Circle;

    fn id(&self) -> &RecordId {
        &self.id
    }
}
