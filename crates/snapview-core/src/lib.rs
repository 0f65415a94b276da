//! # snapview-core
//!
//! View-state synchronization engine for a stock snapshot UI: owns the user's
//! range/mode selection, drives periodic re-fetching of a remote price-history
//! resource, derives a change-over-the-visible-period figure from the series,
//! and manages the loading/error/stale-data transitions so a render layer
//! never flashes empty or shows a mismatched range/metric pair.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`change`] | Period-change derivation from a series |
//! | [`config`] | Engine configuration |
//! | [`domain`] | Symbols, range/mode selection, wire payloads |
//! | [`error`] | Validation and fetch error types |
//! | [`fetcher`] | Snapshot/insight clients and fetch supersession |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`scheduler`] | Fixed-cadence polling |
//! | [`view`] | The view state machine and its async engine shell |
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use snapview_core::{ReqwestHttpClient, Symbol, ViewConfig, ViewEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handle = ViewEngine::spawn(
//!         ViewConfig::default(),
//!         Arc::new(ReqwestHttpClient::new()),
//!     );
//!     handle.set_symbol(Some(Symbol::parse("AAPL")?));
//!
//!     let mut frames = handle.subscribe();
//!     while frames.changed().await.is_ok() {
//!         let state = frames.borrow().clone();
//!         println!("{:?}: {:?}", state.phase(), state.period_change);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Consistency model
//!
//! All view mutation happens on one logical event queue; there is no locking.
//! Every fetch carries a monotonically increasing issue number, and a result
//! is applied only while its issue is still the newest — so under rapid
//! range/mode flipping the last-issued key wins regardless of response
//! arrival order, and an old response can never overwrite a newer selection.

pub mod change;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod scheduler;
pub mod view;

pub use change::{period_change, PeriodChange};
pub use config::ViewConfig;
pub use domain::{
    Mode, Range, RangeModeSelector, SeriesPoint, Snapshot, SnapshotChart, SnapshotHeader,
    SnapshotMetrics, Symbol, UtcDateTime,
};
pub use error::{FetchError, ValidationError};
pub use fetcher::{FetchKey, FetchSequencer, InsightClient, SnapshotClient};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, ScriptedHttpClient,
};
pub use scheduler::PollingScheduler;
pub use view::{FetchCommand, SnapshotView, ViewEngine, ViewHandle, ViewPhase, ViewState};
