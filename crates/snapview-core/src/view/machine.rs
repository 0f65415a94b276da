//! Pure transition core of the snapshot view.
//!
//! Mutations return the fetch the shell must perform (if any); fetch
//! completions are applied back with their issue number, and anything
//! superseded by a newer issue is discarded without touching state. Keeping
//! the machine synchronous makes every race this engine must survive a
//! plain unit test: issue two fetches, apply them out of order, inspect.

use tracing::{debug, warn};

use crate::change::{self, PeriodChange};
use crate::domain::{Mode, Range, RangeModeSelector, Snapshot, Symbol};
use crate::error::FetchError;
use crate::fetcher::{FetchKey, FetchSequencer};

use super::state::{ViewPhase, ViewState};

/// One fetch the shell must perform: the key plus its supersession issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    pub key: FetchKey,
    pub issue: u64,
}

/// State machine owning selection, view state, and fetch supersession.
#[derive(Debug)]
pub struct SnapshotView {
    selector: RangeModeSelector,
    sequencer: FetchSequencer,
    state: ViewState,
}

impl SnapshotView {
    pub fn new(range: Range, mode: Mode) -> Self {
        Self {
            selector: RangeModeSelector::new(range, mode),
            sequencer: FetchSequencer::new(),
            state: ViewState::new(range, mode),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> ViewPhase {
        self.state.phase()
    }

    /// Mount a symbol, switch to another one, or unmount with `None`.
    ///
    /// A changed identity resets the view: retained data belongs to the old
    /// symbol and must not flash under the new one, and anything in flight
    /// is superseded. Returns whether the identity actually changed; the
    /// first fetch for the new symbol comes from the restarted poll cadence
    /// (which fires immediately), not from here.
    pub fn set_symbol(&mut self, symbol: Option<Symbol>) -> bool {
        if self.state.symbol == symbol {
            return false;
        }
        self.sequencer.issue();
        self.state.symbol = symbol;
        self.state.data = None;
        self.state.period_change = None;
        self.state.insight = None;
        self.state.error = None;
        self.state.loading = false;
        true
    }

    /// Select a new range. No-op when unchanged; otherwise the current data
    /// is retained on screen and a fetch for the new key begins immediately.
    pub fn set_range(&mut self, range: Range) -> Option<FetchCommand> {
        if !self.selector.set_range(range) {
            return None;
        }
        self.state.range = range;
        self.begin_fetch()
    }

    /// Select a new mode; same contract as [`Self::set_range`].
    pub fn set_mode(&mut self, mode: Mode) -> Option<FetchCommand> {
        if !self.selector.set_mode(mode) {
            return None;
        }
        self.state.mode = mode;
        self.begin_fetch()
    }

    /// A poll tick fired: re-fetch the current key, keeping data on screen.
    pub fn poll_tick(&mut self) -> Option<FetchCommand> {
        self.begin_fetch()
    }

    /// Apply a successful fetch. Returns `false`, leaving state untouched,
    /// when the result's issue has been superseded.
    pub fn apply_success(&mut self, issue: u64, snapshot: Snapshot) -> bool {
        if !self.sequencer.is_current(issue) {
            debug!(issue, current = self.sequencer.current(), "discarding superseded snapshot");
            return false;
        }

        let fallback = PeriodChange::new(snapshot.header.change, snapshot.header.change_percent);
        self.state.period_change = Some(change::period_change(
            &snapshot.chart.series,
            Some(snapshot.header.price),
            fallback,
        ));
        self.state.data = Some(snapshot);
        self.state.error = None;
        self.state.loading = false;
        true
    }

    /// Apply a failed fetch: record the message, keep the last good data.
    /// Superseded failures are discarded like superseded successes.
    pub fn apply_failure(&mut self, issue: u64, error: &FetchError) -> bool {
        if !self.sequencer.is_current(issue) {
            debug!(issue, current = self.sequencer.current(), "discarding superseded failure");
            return false;
        }

        warn!(%error, "snapshot fetch failed");
        self.state.error = Some(error.to_string());
        self.state.loading = false;
        true
    }

    /// Merge a best-effort insight, but only if it still belongs to the
    /// mounted symbol.
    pub fn apply_insight(&mut self, symbol: &Symbol, insight: String) -> bool {
        if self.state.symbol.as_ref() != Some(symbol) {
            return false;
        }
        self.state.insight = Some(insight);
        true
    }

    fn begin_fetch(&mut self) -> Option<FetchCommand> {
        let symbol = self.state.symbol.clone()?;
        let (range, mode) = self.selector.current();
        self.state.loading = true;
        Some(FetchCommand {
            key: FetchKey::new(symbol, range, mode),
            issue: self.sequencer.issue(),
        })
    }
}
