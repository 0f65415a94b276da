//! Domain types for the snapshot view engine.
//!
//! All inputs validate at construction time: a [`Symbol`] is always a
//! normalized ticker, a [`Range`]/[`Mode`] pair is always a member of its
//! closed set, and a [`UtcDateTime`] is always a UTC instant. The wire
//! payloads in [`snapshot`] decode the upstream's camelCase JSON, tolerating
//! its `"N/A"` placeholders and mixed timestamp encodings.

mod selection;
mod snapshot;
mod symbol;
mod timestamp;

pub use selection::{Mode, Range, RangeModeSelector};
pub use snapshot::{SeriesPoint, Snapshot, SnapshotChart, SnapshotHeader, SnapshotMetrics};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
