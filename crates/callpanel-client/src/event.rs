use callpanel_core::action::{Action, Endpoint};
use callpanel_core::state::CycleReport;
use serde::Serialize;
use std::fmt;

/// Why a refresh cycle started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTrigger {
    /// First load when the panel starts.
    Initial,
    /// The recurring timer.
    Timer,
    /// Right after a successful mutation, or on operator request.
    Forced,
}

impl RefreshTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            RefreshTrigger::Initial => "initial",
            RefreshTrigger::Timer => "timer",
            RefreshTrigger::Forced => "forced",
        }
    }
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a refresh call ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Applied(CycleReport),
    /// A later cycle was requested while this one was fetching; its
    /// response, if any, was discarded.
    Superseded,
    /// A timer tick found a cycle already in flight.
    Skipped,
}

/// Everything observable the panel does, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PanelEvent {
    OverlayShown,
    OverlayHidden,
    OverlayFailed { message: String },
    RequestSent { endpoint: Endpoint, action: Action },
    MutationFailed { endpoint: Endpoint, message: String },
    RefreshStarted { ticket: u64, trigger: RefreshTrigger },
    RegionSwapped { ticket: u64, generation: u64 },
    Rebound { generation: u64, bindings: usize },
    RefreshSuperseded { ticket: u64 },
    RefreshSkipped,
    RefreshFailed { ticket: u64, message: String },
    LocalToggle,
}
