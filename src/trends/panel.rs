use serde::Serialize;

use super::palette::{assign_colors, HslColor};
use super::summary::{summarize, TrendSummary};
use crate::models::{TrendEntry, TrendWindow};
use crate::service::{ServiceError, TrendSource};

/// Chart-ready projection of the loaded entries. All three vectors are
/// index-aligned with the entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub colors: Vec<HslColor>,
}

impl ChartSeries {
    pub fn from_entries(entries: &[TrendEntry]) -> Self {
        Self {
            labels: entries.iter().map(|e| e.category.clone()).collect(),
            values: entries.iter().map(|e| e.count).collect(),
            colors: assign_colors(entries.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendTicket {
    window: TrendWindow,
    generation: u64,
}

/// Time-window selector plus the entries loaded for the current window.
#[derive(Debug, Default)]
pub struct TrendPanel {
    window: TrendWindow,
    entries: Vec<TrendEntry>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl TrendPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> TrendWindow {
        self.window
    }

    pub fn entries(&self) -> &[TrendEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switch windows. The previous window's entries are dropped right away
    /// and any fetch still in flight for it will be discarded.
    pub fn select_window(&mut self, window: TrendWindow) -> TrendTicket {
        if window != self.window {
            tracing::debug!(from = %self.window, to = %window, "Trend window changed");
        }
        self.window = window;
        self.begin_fetch()
    }

    pub fn begin_fetch(&mut self) -> TrendTicket {
        self.generation += 1;
        self.entries.clear();
        self.error = None;
        self.loading = true;
        TrendTicket {
            window: self.window,
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Returns `false` when it belongs to a superseded
    /// fetch.
    pub fn finish_fetch(
        &mut self,
        ticket: TrendTicket,
        result: Result<Vec<TrendEntry>, ServiceError>,
    ) -> bool {
        if ticket.generation != self.generation || ticket.window != self.window {
            tracing::debug!(window = %ticket.window, "Discarding stale trend result");
            return false;
        }
        self.loading = false;
        match result {
            Ok(entries) => {
                tracing::info!(window = %self.window, categories = entries.len(), "Trends loaded");
                self.entries = entries;
            }
            Err(e) => {
                tracing::warn!(window = %self.window, error = %e, "Trend fetch failed");
                self.entries.clear();
                self.error = Some(format!("Failed to fetch trends: {e}"));
            }
        }
        true
    }

    pub async fn refresh<S: TrendSource>(&mut self, source: &S) -> bool {
        let ticket = self.begin_fetch();
        let result = source.trends(ticket.window).await;
        self.finish_fetch(ticket, result)
    }

    pub async fn change_window<S: TrendSource>(
        &mut self,
        source: &S,
        window: TrendWindow,
    ) -> bool {
        let ticket = self.select_window(window);
        let result = source.trends(window).await;
        self.finish_fetch(ticket, result)
    }

    /// Recomputed from the current entries on every call.
    pub fn series(&self) -> ChartSeries {
        ChartSeries::from_entries(&self.entries)
    }

    pub fn summary(&self) -> TrendSummary {
        summarize(&self.entries)
    }
}
