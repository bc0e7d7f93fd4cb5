use serde::Serialize;
use tracing::debug;

/// What the busy overlay is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OverlayState {
    Hidden,
    Busy,
    /// Spinner gone, inline error shown. The panel stays interactive.
    Failed { message: String },
}

/// Busy indicator bracketing every network round trip.
///
/// `show`, `hide` and `fail` are idempotent; each returns whether the state
/// actually changed so callers only announce real transitions.
#[derive(Debug, Clone)]
pub struct OverlayController {
    state: OverlayState,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self {
            state: OverlayState::Hidden,
        }
    }
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == OverlayState::Busy
    }

    pub fn show(&mut self) -> bool {
        self.set(OverlayState::Busy)
    }

    pub fn hide(&mut self) -> bool {
        self.set(OverlayState::Hidden)
    }

    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        self.set(OverlayState::Failed {
            message: message.into(),
        })
    }

    fn set(&mut self, next: OverlayState) -> bool {
        if self.state == next {
            return false;
        }
        debug!(from = ?self.state, to = ?next, "overlay");
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_and_hide_are_idempotent() {
        let mut overlay = OverlayController::new();
        assert!(!overlay.hide());
        assert!(overlay.show());
        assert!(!overlay.show());
        assert!(overlay.is_busy());
        assert!(overlay.hide());
        assert!(!overlay.hide());
        assert_eq!(overlay.state(), &OverlayState::Hidden);
    }

    #[test]
    fn failure_replaces_the_spinner() {
        let mut overlay = OverlayController::new();
        overlay.show();
        assert!(overlay.fail("request timed out"));
        assert!(!overlay.is_busy());
        assert_eq!(
            overlay.state(),
            &OverlayState::Failed {
                message: "request timed out".into()
            }
        );
        // A later round trip shows the spinner again.
        assert!(overlay.show());
        assert!(overlay.is_busy());
    }
}
