use std::time::Duration;

use crate::domain::{Mode, Range};

/// Engine configuration: endpoints, poll cadence, and default selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Price-history endpoint, queried as `?symbol=..&range=..&mode=..`.
    pub price_history_url: String,
    /// Insight endpoint, queried as `?symbol=..`; best-effort only.
    pub insight_url: String,
    pub poll_interval: Duration,
    pub default_range: Range,
    pub default_mode: Mode,
    pub request_timeout_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            price_history_url: String::from("http://localhost:8000/api/price-history"),
            insight_url: String::from("http://localhost:8000/api/generate-insights"),
            poll_interval: Duration::from_secs(30),
            default_range: Range::OneDay,
            default_mode: Mode::Price,
            request_timeout_ms: 5_000,
        }
    }
}
