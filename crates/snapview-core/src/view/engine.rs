//! Async shell around the view machine.
//!
//! One event-loop task owns the [`SnapshotView`]. User commands arrive on one
//! channel, poll ticks and fetch completions on another; the loop consumes
//! both, so no transition ever races another and ordering between a command
//! and a completion is settled by issue numbers, not by arrival luck.
//! Rendered state goes out through a watch channel; the render layer observes
//! whole frames, never intermediate mutation.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::config::ViewConfig;
use crate::domain::{Mode, Range, Snapshot, Symbol};
use crate::error::FetchError;
use crate::fetcher::{InsightClient, SnapshotClient};
use crate::http_client::HttpClient;
use crate::scheduler::PollingScheduler;

use super::machine::{FetchCommand, SnapshotView};
use super::state::ViewState;

#[derive(Debug)]
enum ViewCommand {
    SetSymbol(Option<Symbol>),
    SetRange(Range),
    SetMode(Mode),
    Shutdown,
}

#[derive(Debug)]
enum EngineEvent {
    PollTick,
    FetchDone {
        issue: u64,
        result: Result<Snapshot, FetchError>,
    },
    InsightDone {
        symbol: Symbol,
        insight: String,
    },
}

/// Handle to a running view engine.
///
/// Calling [`ViewHandle::shutdown`] or dropping every handle tears the view
/// down: the poll timer stops, and any still-in-flight fetch has nowhere left
/// to deliver, so post-teardown state mutation is impossible by construction.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    commands: mpsc::UnboundedSender<ViewCommand>,
    state: watch::Receiver<ViewState>,
}

impl ViewHandle {
    /// Mount a symbol, switch symbols, or unmount with `None`.
    pub fn set_symbol(&self, symbol: Option<Symbol>) {
        let _ = self.commands.send(ViewCommand::SetSymbol(symbol));
    }

    pub fn set_range(&self, range: Range) {
        let _ = self.commands.send(ViewCommand::SetRange(range));
    }

    pub fn set_mode(&self, mode: Mode) {
        let _ = self.commands.send(ViewCommand::SetMode(mode));
    }

    /// Latest published frame.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Subscribe to frame updates; `changed().await` on the receiver.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    pub fn shutdown(&self) {
        let _ = self.commands.send(ViewCommand::Shutdown);
    }
}

/// Spawns and wires one view instance.
pub struct ViewEngine;

impl ViewEngine {
    /// Spawn the event loop. Must be called within a tokio runtime.
    pub fn spawn(config: ViewConfig, http: Arc<dyn HttpClient>) -> ViewHandle {
        let snapshots = SnapshotClient::new(Arc::clone(&http), config.price_history_url.clone())
            .with_timeout_ms(config.request_timeout_ms);
        let insights = InsightClient::new(http, config.insight_url.clone())
            .with_timeout_ms(config.request_timeout_ms);

        let view = SnapshotView::new(config.default_range, config.default_mode);
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(view.state().clone());

        tokio::spawn(run_loop(
            config,
            view,
            snapshots,
            insights,
            commands_rx,
            state_tx,
        ));

        ViewHandle {
            commands: commands_tx,
            state: state_rx,
        }
    }
}

async fn run_loop(
    config: ViewConfig,
    mut view: SnapshotView,
    snapshots: SnapshotClient,
    insights: InsightClient,
    mut commands: mpsc::UnboundedReceiver<ViewCommand>,
    state_tx: watch::Sender<ViewState>,
) {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut scheduler: Option<PollingScheduler> = None;
    // Symbol whose first successful snapshot should kick the insight fetch.
    let mut insight_pending: Option<Symbol> = None;

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(ViewCommand::SetSymbol(symbol)) => {
                    if view.set_symbol(symbol.clone()) {
                        // Restarting the poll cadence doubles as the
                        // immediate first fetch: the scheduler fires on start.
                        scheduler = None;
                        insight_pending = symbol.clone();
                        if symbol.is_some() {
                            let ticks = events_tx.clone();
                            scheduler = Some(PollingScheduler::start(
                                config.poll_interval,
                                move || {
                                    let _ = ticks.send(EngineEvent::PollTick);
                                },
                            ));
                        }
                    }
                }
                // Range and mode changes fetch immediately but leave the
                // poll cadence alone: flipping tabs must not reset the
                // refresh clock.
                Some(ViewCommand::SetRange(range)) => {
                    if let Some(command) = view.set_range(range) {
                        dispatch_fetch(&snapshots, command, &events_tx);
                    }
                }
                Some(ViewCommand::SetMode(mode)) => {
                    if let Some(command) = view.set_mode(mode) {
                        dispatch_fetch(&snapshots, command, &events_tx);
                    }
                }
                // Every handle dropped means the same thing as shutdown.
                Some(ViewCommand::Shutdown) | None => break,
            },
            event = events_rx.recv() => match event {
                Some(EngineEvent::PollTick) => {
                    if let Some(command) = view.poll_tick() {
                        dispatch_fetch(&snapshots, command, &events_tx);
                    }
                }
                Some(EngineEvent::FetchDone { issue, result }) => match result {
                    Ok(snapshot) => {
                        if view.apply_success(issue, snapshot) {
                            if let Some(symbol) = insight_pending.take() {
                                dispatch_insight(&insights, symbol, &events_tx);
                            }
                        }
                    }
                    Err(error) => {
                        view.apply_failure(issue, &error);
                    }
                },
                Some(EngineEvent::InsightDone { symbol, insight }) => {
                    view.apply_insight(&symbol, insight);
                }
                // Unreachable while this loop holds events_tx.
                None => break,
            },
        }

        if state_tx.send(view.state().clone()).is_err() {
            // Every observer is gone; the view has no one left to render for.
            break;
        }
    }
    // Dropping the scheduler stops the timer; dropping events_rx makes any
    // in-flight completion send fail silently in its own task.
}

fn dispatch_fetch(
    snapshots: &SnapshotClient,
    command: FetchCommand,
    events: &mpsc::UnboundedSender<EngineEvent>,
) {
    let client = snapshots.clone();
    let events = events.clone();
    tokio::spawn(async move {
        let result = client.fetch(&command.key).await;
        let _ = events.send(EngineEvent::FetchDone {
            issue: command.issue,
            result,
        });
    });
}

fn dispatch_insight(
    insights: &InsightClient,
    symbol: Symbol,
    events: &mpsc::UnboundedSender<EngineEvent>,
) {
    let client = insights.clone();
    let events = events.clone();
    tokio::spawn(async move {
        match client.fetch(&symbol).await {
            Ok(insight) => {
                let _ = events.send(EngineEvent::InsightDone { symbol, insight });
            }
            // Best-effort by contract: an insight failure never surfaces.
            Err(error) => debug!(%error, %symbol, "insight fetch failed"),
        }
    });
}
