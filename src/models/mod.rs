//! Record models for the four administered collections plus trend entries.
//!
//! Every record type implements [`Record`], which carries the explicit
//! [`RecordKind`] tag and the stable identifier. Kinds that the service lets
//! operators modify additionally implement [`Editable`].

mod circle;
mod record_id;
mod sos;
mod trend;
mod user;
mod user_card;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use circle::*;
pub use record_id::*;
pub use sos::*;
pub use trend::*;
pub use user::*;
pub use user_card::*;

/// Placeholder shown wherever an optional value is absent.
pub const FALLBACK: &str = "N/A";

/// Explicit tag for the administered record kinds.
///
/// The four shapes share no discriminating field, so the tag travels
/// alongside every record reference instead of being inferred from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    User,
    Sos,
    Circle,
    UserCard,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [Self::User, Self::Sos, Self::Circle, Self::UserCard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Sos => "sos",
            Self::Circle => "circle",
            Self::UserCard => "user_card",
        }
    }

    /// Human label used in headers and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Sos => "SOS",
            Self::Circle => "Circle",
            Self::UserCard => "User Card",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record held by a collection screen.
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> &RecordId;
}

/// Records that accept a partial update from the operator.
pub trait Editable: Record {
    type Patch: Clone + fmt::Debug + Serialize + Send + Sync;

    /// Seed an edit draft from the current field values.
    fn draft_patch(&self) -> Self::Patch;

    /// Merge a successfully applied patch into the held record.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// Render an optional text value, falling back to [`FALLBACK`] when absent or blank.
pub fn text_or_fallback(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => FALLBACK.to_string(),
    }
}

/// Render a list as a comma-joined string, or [`FALLBACK`] when empty.
pub fn join_or_fallback(values: &[String]) -> String {
    if values.is_empty() {
        FALLBACK.to_string()
    } else {
        values.join(", ")
    }
}

/// Render a timestamp in the console's fixed display format.
pub fn format_timestamp(value: Option<&chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| FALLBACK.to_string())
}

/// Render a 0–100 battery reading with a percent suffix.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.0}%", v.clamp(0.0, 100.0)),
        _ => FALLBACK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fallback_for_missing_and_blank_text() {
        assert_eq!(text_or_fallback(None), "N/A");
        assert_eq!(text_or_fallback(Some("   ")), "N/A");
        assert_eq!(text_or_fallback(Some("Ann")), "Ann");
    }

    #[test]
    fn join_uses_comma_separator() {
        let values = vec!["Aspirin".to_string(), "Insulin".to_string()];
        assert_eq!(join_or_fallback(&values), "Aspirin, Insulin");
        assert_eq!(join_or_fallback(&[]), "N/A");
    }

    #[test]
    fn timestamp_display_format() {
        let ts = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(format_timestamp(Some(&ts)), "2024-03-09 14:05:00 UTC");
        assert_eq!(format_timestamp(None), "N/A");
    }

    #[test]
    fn percent_is_clamped_and_rounded() {
        assert_eq!(format_percent(Some(87.4)), "87%");
        assert_eq!(format_percent(Some(140.0)), "100%");
        assert_eq!(format_percent(None), "N/A");
    }

    #[test]
    fn kind_labels_are_distinct() {
        let labels: std::collections::HashSet<_> =
            RecordKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels.len(), 4);
        assert_eq!(RecordKind::UserCard.to_string(), "user_card");
    }
}
