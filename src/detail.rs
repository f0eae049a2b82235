//! Detail Dispatcher: labeled field projections per record kind.
//!
//! Records travel with an explicit kind tag ([`RecordRef`] / [`AnyRecord`]);
//! projection switches on that tag and never inspects which fields happen to
//! be present. Every absent optional value renders as [`FALLBACK`].

use serde::Serialize;

use crate::models::{
    format_percent, format_timestamp, join_or_fallback, text_or_fallback, Circle, NotifiedContact,
    Record, RecordId, RecordKind, SosEvent, User, UserCard, FALLBACK,
};

/// Borrowed record tagged with its kind.
#[derive(Debug, Clone, Copy)]
pub enum RecordRef<'a> {
    User(&'a User),
    Sos(&'a SosEvent),
    Circle(&'a Circle),
    UserCard(&'a UserCard),
}

/// Owned record tagged with its kind, as returned by the dashboard search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum AnyRecord {
    User(User),
    Sos(SosEvent),
    Circle(Circle),
    UserCard(UserCard),
}

impl<'a> RecordRef<'a> {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordRef::User(_) => RecordKind::User,
            RecordRef::Sos(_) => RecordKind::Sos,
            RecordRef::Circle(_) => RecordKind::Circle,
            RecordRef::UserCard(_) => RecordKind::UserCard,
        }
    }

    pub fn id(&self) -> &'a RecordId {
        match *self {
            RecordRef::User(r) => r.id(),
            RecordRef::Sos(r) => r.id(),
            RecordRef::Circle(r) => r.id(),
            RecordRef::UserCard(r) => r.id(),
        }
    }
}

impl AnyRecord {
    pub fn as_record(&self) -> RecordRef<'_> {
        match self {
            AnyRecord::User(r) => RecordRef::User(r),
            AnyRecord::Sos(r) => RecordRef::Sos(r),
            AnyRecord::Circle(r) => RecordRef::Circle(r),
            AnyRecord::UserCard(r) => RecordRef::UserCard(r),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.as_record().kind()
    }
}

impl<'a> From<&'a User> for RecordRef<'a> {
    fn from(r: &'a User) -> Self {
        RecordRef::User(r)
    }
}

impl<'a> From<&'a SosEvent> for RecordRef<'a> {
    fn from(r: &'a SosEvent) -> Self {
        RecordRef::Sos(r)
    }
}

impl<'a> From<&'a Circle> for RecordRef<'a> {
    fn from(r: &'a Circle) -> Self {
        RecordRef::Circle(r)
    }
}

impl<'a> From<&'a UserCard> for RecordRef<'a> {
    fn from(r: &'a UserCard) -> Self {
        RecordRef::UserCard(r)
    }
}

// ═══════════════════════════════════════════
// Detail projection
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

fn field(label: &'static str, value: impl Into<String>) -> DetailField {
    DetailField {
        label,
        value: value.into(),
    }
}

/// Ordered `(label, value)` list shown in the detail panel for `record`.
pub fn project(record: RecordRef<'_>) -> Vec<DetailField> {
    let fields = match record {
        RecordRef::User(user) => project_user(user),
        RecordRef::Sos(event) => project_sos(event),
        RecordRef::Circle(circle) => project_circle(circle),
        RecordRef::UserCard(card) => project_user_card(card),
    };
    tracing::debug!(kind = %record.kind(), id = %record.id(), fields = fields.len(), "Projected detail");
    fields
}

fn project_user(user: &User) -> Vec<DetailField> {
    vec![
        field("ID", text_or_fallback(Some(user.id.as_str()))),
        field("Name", text_or_fallback(Some(&user.name))),
        field("Email", text_or_fallback(Some(&user.email))),
        field("Phone", text_or_fallback(user.phone.as_deref())),
        field("Status", text_or_fallback(user.status.as_deref())),
        field("Battery Level", format_percent(user.battery_level)),
        field(
            "Location",
            user.location
                .map(|p| format!("{}, {}", p.latitude, p.longitude))
                .unwrap_or_else(|| FALLBACK.to_string()),
        ),
        field("Created At", format_timestamp(user.created_at.as_ref())),
        field("Profile Image", text_or_fallback(user.profile_image.as_deref())),
    ]
}

fn project_sos(event: &SosEvent) -> Vec<DetailField> {
    let contacts: Vec<String> = event.contacts.iter().map(describe_contact).collect();
    let circles: Vec<String> = event.circle_names().into_iter().map(str::to_string).collect();
    vec![
        field("ID", text_or_fallback(Some(event.id.as_str()))),
        field("Message", text_or_fallback(event.message.as_deref())),
        field("Emergency Type", text_or_fallback(event.emergency_type.as_deref())),
        field("Sender", text_or_fallback(event.sender_name())),
        field("Sender Battery", format_percent(event.sender_battery())),
        field("Address", text_or_fallback(event.address())),
        field("Contacts", join_or_fallback(&contacts)),
        field("Circles", join_or_fallback(&circles)),
        field("Created At", format_timestamp(event.created_at.as_ref())),
    ]
}

fn describe_contact(contact: &NotifiedContact) -> String {
    format!(
        "{} (Notified via: {}, Acknowledged: {})",
        text_or_fallback(contact.name.as_deref()),
        text_or_fallback(contact.notified_via.as_deref()),
        yes_no(contact.acknowledged)
    )
}

fn project_circle(circle: &Circle) -> Vec<DetailField> {
    let members: Vec<String> = circle
        .contacts
        .iter()
        .map(|m| {
            format!(
                "{} ({})",
                m.user_id.as_ref().map_or(FALLBACK, |id| id.as_str()),
                text_or_fallback(m.role.as_deref())
            )
        })
        .collect();
    vec![
        field("ID", text_or_fallback(Some(circle.id.as_str()))),
        field("Name", text_or_fallback(Some(&circle.name))),
        field("Circle Code", text_or_fallback(circle.circle_code.as_deref())),
        field(
            "Admin ID",
            text_or_fallback(circle.admin_id.as_ref().map(RecordId::as_str)),
        ),
        field("Members", join_or_fallback(&members)),
    ]
}

fn project_user_card(card: &UserCard) -> Vec<DetailField> {
    vec![
        field("ID", text_or_fallback(Some(card.id.as_str()))),
        field("Full Name", text_or_fallback(Some(&card.full_name))),
        field(
            "Age",
            card.age
                .map(|a| a.to_string())
                .unwrap_or_else(|| FALLBACK.to_string()),
        ),
        field("Address", text_or_fallback(card.address.as_deref())),
        field("Blood Group", text_or_fallback(card.blood_group.as_deref())),
        field("Medicines", join_or_fallback(&card.medicines)),
        field("Diseases", join_or_fallback(&card.diseases)),
        field("Allergies", join_or_fallback(&card.allergies)),
        field(
            "Emergency Instructions",
            text_or_fallback(card.emergency_instructions.as_deref()),
        ),
        field("Emergency Numbers", join_or_fallback(&card.emergency_numbers)),
        field(
            "Insurance Details",
            text_or_fallback(card.insurance_details.as_deref()),
        ),
        field(
            "Preferred Hospital",
            text_or_fallback(card.preferred_hospital.as_deref()),
        ),
        field("QR Code", text_or_fallback(card.qr_code_image.as_deref())),
    ]
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

// ═══════════════════════════════════════════
// Unified search-result rows
// ═══════════════════════════════════════════

/// One row of the dashboard's search-result table, regardless of kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResultRow {
    pub kind: RecordKind,
    pub id: RecordId,
    pub name: String,
    /// Phone for users, message for SOS events.
    pub secondary: String,
    /// Status for users, emergency type for SOS events.
    pub status: String,
}

pub fn search_row(record: RecordRef<'_>) -> SearchResultRow {
    let (name, secondary, status) = match record {
        RecordRef::User(u) => (
            text_or_fallback(Some(&u.name)),
            text_or_fallback(u.phone.as_deref()),
            text_or_fallback(u.status.as_deref()),
        ),
        RecordRef::Sos(e) => (
            text_or_fallback(e.sender_name()),
            text_or_fallback(e.message.as_deref()),
            text_or_fallback(e.emergency_type.as_deref()),
        ),
        RecordRef::Circle(c) => (
            text_or_fallback(Some(&c.name)),
            text_or_fallback(c.circle_code.as_deref()),
            text_or_fallback(c.admin_id.as_ref().map(RecordId::as_str)),
        ),
        RecordRef::UserCard(c) => (
            text_or_fallback(Some(&c.full_name)),
            text_or_fallback(c.emergency_numbers.first().map(String::as_str)),
            text_or_fallback(c.blood_group.as_deref()),
        ),
    };
    SearchResultRow {
        kind: record.kind(),
        id: record.id().clone(),
        name,
        secondary,
        status,
    }
}
