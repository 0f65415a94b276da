use crate::change::PeriodChange;
use crate::domain::{Mode, Range, Snapshot, Symbol};

/// Lifecycle phase of a snapshot view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    /// No symbol mounted.
    Idle,
    /// First fetch for a symbol, nothing to show yet.
    Loading,
    /// Data present, nothing in flight.
    Ready,
    /// Data present, fetch in flight; the stale data stays on screen.
    Refreshing,
    /// Last fetch failed; data, if any, is the last good snapshot.
    Error,
}

/// Everything the render layer needs for one frame.
///
/// Two invariants hold by construction of the transitions in
/// [`super::SnapshotView`]: an in-flight fetch never clears retained `data`
/// unless the symbol itself changed, and a present `error` always coexists
/// with either the last good snapshot or no data at all (the dedicated
/// "unavailable" rendering).
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub symbol: Option<Symbol>,
    pub data: Option<Snapshot>,
    pub loading: bool,
    pub error: Option<String>,
    pub range: Range,
    pub mode: Mode,
    /// Change over the visible period, derived client-side; deliberately a
    /// separate field from the day change inside `data.header`.
    pub period_change: Option<PeriodChange>,
    pub insight: Option<String>,
}

impl ViewState {
    pub fn new(range: Range, mode: Mode) -> Self {
        Self {
            symbol: None,
            data: None,
            loading: false,
            error: None,
            range,
            mode,
            period_change: None,
            insight: None,
        }
    }

    /// Phase is derived, never stored, so it cannot drift from the state
    /// that implies it.
    pub fn phase(&self) -> ViewPhase {
        if self.symbol.is_none() {
            return ViewPhase::Idle;
        }
        if self.loading {
            return if self.data.is_some() {
                ViewPhase::Refreshing
            } else {
                ViewPhase::Loading
            };
        }
        if self.error.is_some() {
            return ViewPhase::Error;
        }
        if self.data.is_some() {
            ViewPhase::Ready
        } else {
            ViewPhase::Loading
        }
    }
}
