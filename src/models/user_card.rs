use serde::{Deserialize, Serialize};

use super::{Record, RecordId, RecordKind};

/// Medical identity card carried by a user for first responders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub medicines: Vec<String>,
    #[serde(rename = "disease", alias = "diseases", default)]
    pub diseases: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub emergency_instructions: Option<String>,
    #[serde(default)]
    pub emergency_numbers: Vec<String>,
    #[serde(default)]
    pub insurance_details: Option<String>,
    #[serde(default)]
    pub preferred_hospital: Option<String>,
    #[serde(default)]
    pub qr_code_image: Option<String>,
}

impl UserCard {
    pub fn new(id: impl Into<RecordId>, full_name: &str) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.to_string(),
            age: None,
            address: None,
            blood_group: None,
            medicines: Vec::new(),
            diseases: Vec::new(),
            allergies: Vec::new(),
            emergency_instructions: None,
            emergency_numbers: Vec::new(),
            insurance_details: None,
            preferred_hospital: None,
            qr_code_image: None,
        }
    }
}

impl Record for UserCard {
    const KIND: RecordKind = RecordKind::UserCard;

    fn id(&self) -> &RecordId {
        &self.id
    }
}
