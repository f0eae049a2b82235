use serde::Serialize;

use crate::models::TrendEntry;

/// Share of one entry in the window's total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendShare {
    pub category: String,
    pub count: u64,
    /// Percentage of the total, rounded to two decimals; 0 when the total is 0.
    pub percentage: f64,
}

/// Aggregates derived from the entries of one trend window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub total: u64,
    pub average: f64,
    pub max: Option<TrendEntry>,
    pub min: Option<TrendEntry>,
    pub shares: Vec<TrendShare>,
}

impl TrendSummary {
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// Summary statistics over `entries`. Ties on max/min go to the earliest entry.
pub fn summarize(entries: &[TrendEntry]) -> TrendSummary {
    let total = entries.iter().fold(0u64, |acc, e| acc.saturating_add(e.count));
    let average = total as f64 / entries.len().max(1) as f64;

    let mut max: Option<&TrendEntry> = None;
    let mut min: Option<&TrendEntry> = None;
    for entry in entries {
        if max.map_or(true, |m| entry.count > m.count) {
            max = Some(entry);
        }
        if min.map_or(true, |m| entry.count < m.count) {
            min = Some(entry);
        }
    }

    let shares = entries
        .iter()
        .map(|e| TrendShare {
            category: e.category.clone(),
            count: e.count,
            percentage: percentage(e.count, total),
        })
        .collect();

    TrendSummary {
        total,
        average,
        max: max.cloned(),
        min: min.cloned(),
        shares,
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 100.0 / total as f64 * 100.0).round() / 100.0
}
