use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable record identifier as issued by the admin service.
///
/// The service emits identifiers either as a bare string or as an
/// extended-JSON object `{"$oid": "..."}`. Both shapes deserialize into the
/// same value; serialization always produces the bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Plain(String),
    Object {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireId::deserialize(deserializer)? {
            WireId::Plain(id) | WireId::Object { oid: id } => Ok(Self(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_plain_string() {
        let id: RecordId = serde_json::from_str("\"65a1\"").unwrap();
        assert_eq!(id, "65a1");
    }

    #[test]
    fn deserializes_oid_object() {
        let id: RecordId = serde_json::from_str(r#"{"$oid":"65a2"}"#).unwrap();
        assert_eq!(id.as_str(), "65a2");
    }

    #[test]
    fn serializes_as_bare_string() {
        let json = serde_json::to_string(&RecordId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        assert!(RecordId::new("  ").is_blank());
        assert!(!RecordId::new("x").is_blank());
    }
}
