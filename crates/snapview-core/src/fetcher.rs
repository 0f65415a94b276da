//! Snapshot and insight fetch clients, plus fetch supersession.
//!
//! Consistency under rapid range/mode flipping comes from issue-order
//! tracking, not cancellation: every fetch carries an issue number from a
//! [`FetchSequencer`], and a result may only be applied while its issue is
//! still the newest one. Superseded requests are ignored on arrival, never
//! aborted at the transport level.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{Mode, Range, Snapshot, Symbol};
use crate::error::FetchError;
use crate::http_client::{HttpClient, HttpRequest};

const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Identity of one snapshot request: every fetch is keyed by this triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub symbol: Symbol,
    pub range: Range,
    pub mode: Mode,
}

impl FetchKey {
    pub fn new(symbol: Symbol, range: Range, mode: Mode) -> Self {
        Self {
            symbol,
            range,
            mode,
        }
    }

    /// Request URL for this key against the given endpoint.
    pub fn url(&self, base: &str) -> String {
        format!(
            "{base}?symbol={}&range={}&mode={}",
            urlencoding::encode(self.symbol.as_str()),
            self.range,
            self.mode,
        )
    }
}

/// Hands out monotonically increasing fetch issue numbers.
///
/// `issue` both allocates a number and makes it the current one, so issuing
/// a new fetch supersedes everything before it; last-writer-by-issue-order
/// wins regardless of response arrival order.
#[derive(Debug, Clone, Default)]
pub struct FetchSequencer {
    latest: Arc<AtomicU64>,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, issue: u64) -> bool {
        self.current() == issue
    }
}

/// Client for the price-history resource.
#[derive(Clone)]
pub struct SnapshotClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl SnapshotClient {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Perform one fetch for the given key.
    ///
    /// Non-2xx responses yield [`FetchError::Server`] carrying the `detail`
    /// or `error` message from the body when one is present; bodies that do
    /// not decode as a snapshot yield [`FetchError::Malformed`].
    pub async fn fetch(&self, key: &FetchKey) -> Result<Snapshot, FetchError> {
        let request = HttpRequest::get(key.url(&self.base_url)).with_timeout_ms(self.timeout_ms);
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| FetchError::Network(e.message().to_owned()))?;

        if !response.is_success() {
            return Err(FetchError::from_failure_body(response.status, &response.body));
        }

        serde_json::from_str(&response.body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct InsightBody {
    insight: String,
}

/// Client for the best-effort insight resource.
///
/// Failures here must never fail the primary view; the caller merges the
/// result when it arrives and drops the error otherwise.
#[derive(Clone)]
pub struct InsightClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl InsightClient {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub async fn fetch(&self, symbol: &Symbol) -> Result<String, FetchError> {
        let url = format!(
            "{}?symbol={}",
            self.base_url,
            urlencoding::encode(symbol.as_str())
        );
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| FetchError::Network(e.message().to_owned()))?;

        if !response.is_success() {
            return Err(FetchError::from_failure_body(response.status, &response.body));
        }

        serde_json::from_str::<InsightBody>(&response.body)
            .map(|body| body.insight)
            .map_err(|e| FetchError::Malformed(e.to_string()))
    }
}
