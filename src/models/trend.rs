use std::fmt;

use serde::{Deserialize, Serialize};

/// Count of SOS events of one emergency type inside the selected window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
    #[serde(rename = "emergencyType", alias = "category")]
    pub category: String,
    #[serde(default)]
    pub count: u64,
}

impl TrendEntry {
    pub fn new(category: &str, count: u64) -> Self {
        Self {
            category: category.to_string(),
            count,
        }
    }
}

/// Operator-selected time range bounding the loaded trend entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendWindow {
    LastWeek,
    #[default]
    LastMonth,
    LastTwoMonths,
    LastThreeMonths,
    LastSixMonths,
    LastYear,
}

impl TrendWindow {
    pub const ALL: [TrendWindow; 6] = [
        Self::LastWeek,
        Self::LastMonth,
        Self::LastTwoMonths,
        Self::LastThreeMonths,
        Self::LastSixMonths,
        Self::LastYear,
    ];

    /// Query-string value understood by the trends endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastWeek => "lastWeek",
            Self::LastMonth => "lastMonth",
            Self::LastTwoMonths => "lastTwoMonths",
            Self::LastThreeMonths => "lastThreeMonths",
            Self::LastSixMonths => "lastSixMonths",
            Self::LastYear => "lastYear",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LastWeek => "Last Week",
            Self::LastMonth => "Last Month",
            Self::LastTwoMonths => "Last 2 Months",
            Self::LastThreeMonths => "Last 3 Months",
            Self::LastSixMonths => "Last 6 Months",
            Self::LastYear => "Last Year",
        }
    }
}

impl fmt::Display for TrendWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
