//! Free-text search over held collections.
//!
//! Each record kind declares its searchable fields once; a query matches a
//! record when any declared field contains the query as a case-insensitive
//! substring. Nested and list-valued fields participate, and absent optional
//! fields simply do not contribute. Filtering is pure: it always runs against
//! the live collection and the live query, with nothing cached in between.

use std::fmt;

use crate::models::{Circle, Record, SosEvent, User, UserCard};

// ═══════════════════════════════════════════
// Field declarations
// ═══════════════════════════════════════════

/// Text extracted from one declared field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldText<'a> {
    Absent,
    One(&'a str),
    Many(Vec<&'a str>),
}

impl<'a> From<Option<&'a str>> for FieldText<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(FieldText::Absent, FieldText::One)
    }
}

impl FieldText<'_> {
    fn contains(&self, needle: &str) -> bool {
        match self {
            FieldText::Absent => false,
            FieldText::One(text) => contains_folded(text, needle),
            FieldText::Many(texts) => texts.iter().any(|t| contains_folded(t, needle)),
        }
    }
}

/// A record kind with a declared set of searchable fields.
pub trait Searchable: Record {
    type Field: Copy + fmt::Debug + PartialEq + Send + Sync + 'static;

    /// Fields consulted by free-text search, in declaration order.
    const FIELDS: &'static [Self::Field];

    fn field_text(&self, field: Self::Field) -> FieldText<'_>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Email,
    Phone,
}

impl Searchable for User {
    type Field = UserField;
    const FIELDS: &'static [UserField] = &[UserField::Name, UserField::Email, UserField::Phone];

    fn field_text(&self, field: UserField) -> FieldText<'_> {
        match field {
            UserField::Name => FieldText::One(&self.name),
            UserField::Email => FieldText::One(&self.email),
            UserField::Phone => self.phone.as_deref().into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosField {
    SenderName,
    Address,
    CircleName,
}

impl Searchable for SosEvent {
    type Field = SosField;
    const FIELDS: &'static [SosField] = &[SosField::SenderName, SosField::Address, SosField::CircleName];

    fn field_text(&self, field: SosField) -> FieldText<'_> {
        match field {
            SosField::SenderName => self.sender_name().into(),
            SosField::Address => self.address().into(),
            SosField::CircleName => FieldText::Many(self.circle_names()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleField {
    Name,
}

impl Searchable for Circle {
    type Field = CircleField;
    const FIELDS: &'static [CircleField] = &[CircleField::Name];

    fn field_text(&self, field: CircleField) -> FieldText<'_> {
        match field {
            CircleField::Name => FieldText::One(&self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCardField {
    FullName,
    Address,
    BloodGroup,
}

impl Searchable for UserCard {
    type Field = UserCardField;
    const FIELDS: &'static [UserCardField] = &[
        UserCardField::FullName,
        UserCardField::Address,
        UserCardField::BloodGroup,
    ];

    fn field_text(&self, field: UserCardField) -> FieldText<'_> {
        match field {
            UserCardField::FullName => FieldText::One(&self.full_name),
            UserCardField::Address => self.address.as_deref().into(),
            UserCardField::BloodGroup => self.blood_group.as_deref().into(),
        }
    }
}

// ═══════════════════════════════════════════
// Query evaluation
// ═══════════════════════════════════════════

/// Operator input normalised once per keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    needle: String,
}

impl SearchQuery {
    pub fn new(input: &str) -> Self {
        Self {
            raw: input.to_string(),
            needle: input.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Case-insensitive substring test against arbitrary text.
    pub fn matches_text(&self, text: &str) -> bool {
        self.is_empty() || contains_folded(text, &self.needle)
    }

    /// True when any declared field of `record` contains the query.
    pub fn matches<R: Searchable>(&self, record: &R) -> bool {
        if self.is_empty() {
            return true;
        }
        R::FIELDS
            .iter()
            .any(|field| record.field_text(*field).contains(&self.needle))
    }

    /// Declared fields of `record` that contain the query.
    pub fn matched_fields<R: Searchable>(&self, record: &R) -> Vec<R::Field> {
        if self.is_empty() {
            return Vec::new();
        }
        R::FIELDS
            .iter()
            .copied()
            .filter(|field| record.field_text(*field).contains(&self.needle))
            .collect()
    }
}

impl From<&str> for SearchQuery {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Free-function form of [`SearchQuery::matches`].
pub fn matches<R: Searchable>(record: &R, query: &str) -> bool {
    SearchQuery::new(query).matches(record)
}

/// Records from `records` matching `query`, in collection order.
pub fn filter<'a, R: Searchable>(records: &'a [R], query: &SearchQuery) -> Vec<&'a R> {
    let hits: Vec<&R> = records.iter().filter(|r| query.matches(*r)).collect();
    tracing::debug!(
        kind = %R::KIND,
        query = query.as_str(),
        total = records.len(),
        hits = hits.len(),
        "Filtered collection"
    );
    hits
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CircleRef, Sender, UserLocation};

    fn users() -> Vec<User> {
        vec![
            User::new("1", "Ann", "ann@example.com"),
            User::new("2", "Bob", "bob@example.com"),
        ]
    }

    fn sos_with_circle(id: &str, circle: &str) -> SosEvent {
        let mut event = SosEvent::new(id);
        event.sender = Some(Sender {
            name: Some("Zed".into()),
            ..Default::default()
        });
        event.user_location = Some(UserLocation {
            address: Some("1 Harbour St".into()),
        });
        event.circles = vec![CircleRef {
            circle_id: None,
            circle_name: Some(circle.into()),
        }];
        event
    }

    #[test]
    fn empty_query_returns_everything() {
        let all = users();
        let hits = filter(&all, &SearchQuery::new(""));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn case_insensitive_substring_on_name() {
        let all = users();
        let hits = filter(&all, &SearchQuery::new("an"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
    }

    #[test]
    fn matches_email_and_optional_phone() {
        let mut user = User::new("3", "Cy", "cy@corp.io");
        assert!(matches(&user, "CORP"));
        assert!(!matches(&user, "555"));
        user.phone = Some("555-0100".into());
        assert!(matches(&user, "555"));
    }

    #[test]
    fn nested_circle_name_matches() {
        let event = sos_with_circle("s1", "Family");
        let query = SearchQuery::new("fam");
        assert!(query.matches(&event));
        assert_eq!(query.matched_fields(&event), vec![SosField::CircleName]);
    }

    #[test]
    fn sos_sender_and_address_match() {
        let event = sos_with_circle("s1", "Family");
        let by_sender = SearchQuery::new("ZED");
        assert_eq!(by_sender.matched_fields(&event), vec![SosField::SenderName]);
        let by_address = SearchQuery::new("harbour");
        assert_eq!(by_address.matched_fields(&event), vec![SosField::Address]);
    }

    #[test]
    fn sos_without_nested_fields_never_panics() {
        let event = SosEvent::new("s2");
        assert!(!matches(&event, "x"));
        assert!(matches(&event, ""));
    }

    #[test]
    fn user_card_blood_group_matches() {
        let mut card = UserCard::new("c1", "Ann Lee");
        card.blood_group = Some("AB-".into());
        assert!(matches(&card, "ab-"));
        assert!(!matches(&card, "street"));
    }

    #[test]
    fn user_card_full_name_and_address_match() {
        let mut card = UserCard::new("c1", "Ann Lee");
        card.address = Some("9 Elm Street".into());
        let by_name = SearchQuery::new("lee");
        assert_eq!(by_name.matched_fields(&card), vec![UserCardField::FullName]);
        let by_address = SearchQuery::new("STREET");
        assert_eq!(by_address.matched_fields(&card), vec![UserCardField::Address]);
    }

    #[test]
    fn circle_searches_name_only() {
        let mut circle = Circle::new("k1", "Neighbours");
        circle.circle_code = Some("XYZ".into());
        assert!(matches(&circle, "neigh"));
        assert!(!matches(&circle, "xyz"));
    }

    #[test]
    fn filtered_records_are_subset_with_matching_field() {
        let mut all = users();
        all.push(User::new("4", "Hannah", "h@example.com"));
        let query = SearchQuery::new("AN");
        for hit in filter(&all, &query) {
            assert!(all.iter().any(|u| u.id == hit.id));
            assert!(!query.matched_fields(hit).is_empty());
        }
    }

    #[test]
    fn unicode_case_folding() {
        let user = User::new("5", "ÉLODIE", "e@example.com");
        assert!(matches(&user, "élo"));
    }
}
