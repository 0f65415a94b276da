//! Wire payload types for the price-history resource.
//!
//! Field names follow the upstream JSON (camelCase). Metrics are independently
//! optional: the upstream substitutes the string `"N/A"` for anything its own
//! provider could not supply, so numeric metrics decode `"N/A"`, `null`, and
//! absence all to `None` instead of failing the whole snapshot.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Mode, Symbol, UtcDateTime};

/// Header block: name, live price, and the server-reported day change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotHeader {
    pub name: String,
    pub symbol: Symbol,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub timestamp: UtcDateTime,
}

/// One chart sample. `value: None` is a non-trading gap, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: UtcDateTime,
    #[serde(default)]
    pub value: Option<f64>,
}

impl SeriesPoint {
    pub fn new(timestamp: UtcDateTime, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }
}

/// Chronological series plus the mode it was rendered under server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotChart {
    pub mode: Mode,
    pub series: Vec<SeriesPoint>,
}

/// Header metrics, each independently optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetrics {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub prev_close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub day_range: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fifty_two_week_range: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pe_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub volume: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dividend_yield: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub eps: Option<f64>,
}

/// One fetched payload: header, chart, and metrics for a (symbol, range, mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub header: SnapshotHeader,
    pub chart: SnapshotChart,
    pub metrics: SnapshotMetrics,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u64)
        }),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| {
        let trimmed = s.trim();
        !trimmed.is_empty() && trimmed != "N/A" && trimmed != "N/A - N/A"
    }))
}
