use crate::models::RecordKind;

/// Display strings for one list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLabels {
    pub title: &'static str,
    pub empty: &'static str,
    pub fetch_failed: &'static str,
    pub delete_failed: &'static str,
    pub update_failed: &'static str,
}

impl ScreenLabels {
    pub const USERS: Self = Self {
        title: "User List",
        empty: "No users found.",
        fetch_failed: "Failed to fetch users",
        delete_failed: "Failed to delete user",
        update_failed: "Failed to update user",
    };

    pub const SOS: Self = Self {
        title: "SOS Records",
        empty: "No SOS records found.",
        fetch_failed: "Failed to fetch SOS records",
        delete_failed: "Failed to delete SOS record",
        update_failed: "SOS records cannot be updated",
    };

    pub const ACTIVE_SOS: Self = Self {
        title: "Active SOS Records",
        empty: "No active SOS records found.",
        fetch_failed: "Failed to fetch active SOS records",
        delete_failed: "Failed to delete SOS record",
        update_failed: "SOS records cannot be updated",
    };

    pub const CIRCLES: Self = Self {
        title: "Circles",
        empty: "No circles found.",
        fetch_failed: "Failed to fetch circles",
        delete_failed: "Failed to delete circle",
        update_failed: "Circles cannot be updated",
    };

    pub const USER_CARDS: Self = Self {
        title: "User Cards",
        empty: "No user cards found.",
        fetch_failed: "Failed to fetch user cards",
        delete_failed: "Failed to delete user card",
        update_failed: "User cards cannot be updated",
    };

    /// Default labels for the full-collection screen of `kind`.
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::User => Self::USERS,
            RecordKind::Sos => Self::SOS,
            RecordKind::Circle => Self::CIRCLES,
            RecordKind::UserCard => Self::USER_CARDS,
        }
    }
}
