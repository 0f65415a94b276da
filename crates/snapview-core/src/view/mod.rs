//! The snapshot view: state machine core and async engine shell.

mod engine;
mod machine;
mod state;

pub use engine::{ViewEngine, ViewHandle};
pub use machine::{FetchCommand, SnapshotView};
pub use state::{ViewPhase, ViewState};
