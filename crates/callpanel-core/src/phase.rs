use crate::error::{CallsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the panel is within a refresh cycle.
///
/// `Idle -> Fetching -> Swapping -> Rebinding -> Idle`, plus the recovery
/// edge `Fetching -> Idle` taken when the fetch fails or the page has no
/// content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    #[default]
    Idle,
    Fetching,
    Swapping,
    Rebinding,
}

impl SyncPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncPhase::Idle => "idle",
            SyncPhase::Fetching => "fetching",
            SyncPhase::Swapping => "swapping",
            SyncPhase::Rebinding => "rebinding",
        }
    }

    pub fn can_transition_to(self, next: SyncPhase) -> bool {
        use SyncPhase::*;
        matches!(
            (self, next),
            (Idle, Fetching)
                | (Fetching, Swapping)
                | (Fetching, Idle)
                | (Swapping, Rebinding)
                | (Rebinding, Idle)
        )
    }

    /// Move to `next`, rejecting edges the cycle does not have.
    pub fn advance(&mut self, next: SyncPhase) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(CallsError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
