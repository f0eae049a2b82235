//! Trend Aggregator: emergency-type counts for a time window turned into
//! chart data and summary statistics.

mod palette;
mod panel;
mod summary;

pub use palette::*;
pub use panel::*;
pub use summary::*;
