use crate::action::Action;
use crate::binding::{self, BindingSet, BindingSummary, ClickTarget, Handler};
use crate::error::Result;
use crate::markup;
use crate::overlay::OverlayController;
use crate::phase::SyncPhase;
use crate::region::{PageRegion, Selector};
use serde::Serialize;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Result of a click on a bound element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click needs a server round trip.
    Dispatch(Action),
    /// The click only changed local state; nothing to send.
    Local,
}

/// What a completed cycle applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub ticket: u64,
    pub generation: u64,
    pub bindings: usize,
    pub summary: BindingSummary,
}

// ---------------------------------------------------------------------------
// UiState
// ---------------------------------------------------------------------------

/// Everything the panel owns on the client side.
///
/// Built once when the panel starts and mutated in place by each refresh
/// cycle. The region is written only through [`UiState::apply_page`]; the
/// binding set is derived from it and rebuilt after every swap.
#[derive(Debug, Clone)]
pub struct UiState {
    pub region: PageRegion,
    pub bindings: BindingSet,
    pub overlay: OverlayController,
    phase: SyncPhase,
    current_ticket: u64,
    mutations_in_flight: usize,
    last_error: Option<String>,
}

impl UiState {
    pub fn new(region_marker: impl Into<String>) -> Self {
        Self {
            region: PageRegion::new(region_marker),
            bindings: BindingSet::new(),
            overlay: OverlayController::new(),
            phase: SyncPhase::Idle,
            current_ticket: 0,
            mutations_in_flight: 0,
            last_error: None,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn current_ticket(&self) -> u64 {
        self.current_ticket
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SyncPhase::Idle
    }

    // -----------------------------------------------------------------------
    // Refresh cycle
    // -----------------------------------------------------------------------

    /// Make `ticket` the current cycle and enter `Fetching`.
    ///
    /// When another cycle is already fetching, the new ticket takes it over;
    /// the older cycle will find itself superseded when its response lands.
    pub fn begin_cycle(&mut self, ticket: u64) -> Result<()> {
        if self.phase == SyncPhase::Fetching {
            debug!(
                superseded = self.current_ticket,
                ticket, "taking over in-flight fetch"
            );
        } else {
            self.phase.advance(SyncPhase::Fetching)?;
        }
        self.current_ticket = ticket;
        self.overlay.show();
        Ok(())
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current_ticket == ticket
    }

    /// Recovery edge: the fetch failed, keep the region as it is.
    pub fn fail_cycle(&mut self, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        warn!(ticket = self.current_ticket, error = %message, "refresh failed");
        self.phase.advance(SyncPhase::Idle)?;
        self.overlay.fail(message.clone());
        self.last_error = Some(message);
        Ok(())
    }

    /// The fetch for `ticket` was dropped before it finished. If that cycle
    /// is still current, go back to `Idle` with the region untouched.
    /// Returns whether the overlay came down.
    pub fn abandon_cycle(&mut self, ticket: u64) -> bool {
        if !self.is_current(ticket) || self.phase.advance(SyncPhase::Idle).is_err() {
            return false;
        }
        self.mutations_in_flight == 0 && self.overlay.hide()
    }

    /// Swap the fetched page in and rebind: `Fetching -> Swapping ->
    /// Rebinding -> Idle`.
    ///
    /// The region is extracted before anything changes, so a page without it
    /// takes the recovery edge and leaves the old region and bindings live.
    pub fn apply_page(&mut self, page: &str) -> Result<CycleReport> {
        let inner = match markup::extract_region(page, self.region.marker()) {
            Ok(inner) => inner,
            Err(e) => {
                self.fail_cycle(e.to_string())?;
                return Err(e);
            }
        };

        self.phase.advance(SyncPhase::Swapping)?;
        let generation = self.region.replace_contents(inner);

        self.phase.advance(SyncPhase::Rebinding)?;
        self.bindings.unbind_all();
        let bindings = self.bindings.bind_all(&self.region);

        self.phase.advance(SyncPhase::Idle)?;
        if self.mutations_in_flight == 0 {
            self.overlay.hide();
        }
        self.last_error = None;

        info!(
            ticket = self.current_ticket,
            generation, bindings, "region refreshed"
        );
        Ok(CycleReport {
            ticket: self.current_ticket,
            generation,
            bindings,
            summary: self.bindings.summary(),
        })
    }

    // -----------------------------------------------------------------------
    // Clicks
    // -----------------------------------------------------------------------

    pub fn target(&self, selector: &Selector, nth: usize) -> Result<ClickTarget> {
        self.bindings.target(selector, nth)
    }

    /// Fire the handler bound to `target`.
    pub fn click(&mut self, target: ClickTarget) -> Result<ClickOutcome> {
        match self.bindings.fire(&self.region, target)? {
            Handler::Dispatch { action } => Ok(ClickOutcome::Dispatch(action.clone())),
            Handler::RevealChamberCall => {
                binding::reveal_chamber_call(&mut self.region);
                debug!("chamber call controls revealed");
                Ok(ClickOutcome::Local)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn mutations_in_flight(&self) -> usize {
        self.mutations_in_flight
    }

    /// A mutation request is about to go out. Returns whether this call
    /// turned the overlay on.
    ///
    /// While any mutation is in flight a refresh finishing in between leaves
    /// the overlay up.
    pub fn begin_mutation(&mut self) -> bool {
        self.mutations_in_flight += 1;
        self.overlay.show()
    }

    /// The mutation was accepted; the follow-up refresh will hide the overlay.
    pub fn end_mutation(&mut self) {
        self.mutations_in_flight = self.mutations_in_flight.saturating_sub(1);
    }

    /// The mutation request was dropped before the server answered. Returns
    /// whether the overlay came down.
    pub fn abandon_mutation(&mut self) -> bool {
        self.end_mutation();
        self.mutations_in_flight == 0 && self.is_idle() && self.overlay.hide()
    }

    /// Record a failed mutation: spinner off, error shown, region untouched.
    pub fn fail_mutation(&mut self, message: impl Into<String>) {
        self.end_mutation();
        let message = message.into();
        self.overlay.fail(message.clone());
        self.last_error = Some(message);
    }
}
