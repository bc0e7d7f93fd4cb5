//! Fetch → swap → rebind.

use callpanel_core::overlay::OverlayState;
use callpanel_core::state::UiState;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::event::{PanelEvent, RefreshOutcome, RefreshTrigger};
use crate::panel::{CancelGuard, Panel};
use crate::transport::Transport;
use crate::Result;

impl<T: Transport> Panel<T> {
    /// First load of the region. Same as a forced refresh.
    pub async fn load(&self) -> Result<RefreshOutcome> {
        self.refresh(RefreshTrigger::Initial).await
    }

    /// Run one refresh cycle.
    ///
    /// A timer-triggered cycle is skipped while another cycle is fetching.
    /// Any other trigger supersedes the in-flight cycle: the older fetch is
    /// abandoned and only the latest requested cycle swaps the region, so a
    /// stale response can never overwrite a newer one.
    ///
    /// On failure the overlay switches to its failed state, the previous
    /// region and bindings stay live, and the error is returned.
    pub async fn refresh(&self, trigger: RefreshTrigger) -> Result<RefreshOutcome> {
        let (ticket, latest) = {
            let mut state = self.lock();
            if trigger == RefreshTrigger::Timer && !state.is_idle() {
                debug!(phase = %state.phase(), "timer tick skipped, cycle in flight");
                self.emit(PanelEvent::RefreshSkipped);
                return Ok(RefreshOutcome::Skipped);
            }

            let ticket = self.next_ticket();
            let was_busy = state.overlay.is_busy();
            state.begin_cycle(ticket)?;
            if !was_busy {
                self.emit(PanelEvent::OverlayShown);
            }
            self.emit(PanelEvent::RefreshStarted { ticket, trigger });
            self.inner.latest.send_replace(ticket);
            (ticket, self.inner.latest.subscribe())
        };
        debug!(ticket, %trigger, "refresh started");

        let url = self.inner.config.panel_url();
        let abandoned = CancelGuard::new(|| {
            debug!(ticket, "refresh dropped mid-fetch");
            let hidden = self.lock().abandon_cycle(ticket);
            if hidden {
                self.emit(PanelEvent::OverlayHidden);
            }
        });
        let fetched = tokio::select! {
            res = self.inner.transport.get_page(&url) => Some(res),
            _ = superseded(latest, ticket) => None,
        };
        abandoned.defuse();

        let mut state = self.lock();
        let fetched = match fetched {
            Some(res) if state.is_current(ticket) => res,
            _ => {
                debug!(ticket, current = state.current_ticket(), "refresh superseded");
                self.emit(PanelEvent::RefreshSuperseded { ticket });
                return Ok(RefreshOutcome::Superseded);
            }
        };

        let applied = match fetched {
            Ok(page) => state.apply_page(&page).map_err(Into::into),
            Err(e) => {
                state.fail_cycle(e.to_string())?;
                Err(e)
            }
        };

        match applied {
            Ok(report) => {
                self.emit(PanelEvent::RegionSwapped {
                    ticket,
                    generation: report.generation,
                });
                self.emit(PanelEvent::Rebound {
                    generation: report.generation,
                    bindings: report.bindings,
                });
                if state.overlay.state() == &OverlayState::Hidden {
                    self.emit(PanelEvent::OverlayHidden);
                }
                info!(ticket, %trigger, generation = report.generation, "refresh applied");
                Ok(RefreshOutcome::Applied(report))
            }
            Err(e) => {
                self.emit_failure(&state, ticket, &e.to_string());
                Err(e)
            }
        }
    }

    fn emit_failure(&self, state: &UiState, ticket: u64, message: &str) {
        if let OverlayState::Failed { message: shown } = state.overlay.state() {
            self.emit(PanelEvent::OverlayFailed {
                message: shown.clone(),
            });
        }
        self.emit(PanelEvent::RefreshFailed {
            ticket,
            message: message.to_string(),
        });
    }
}

/// Resolves once a cycle newer than `ticket` has been requested.
async fn superseded(mut latest: watch::Receiver<u64>, ticket: u64) {
    loop {
        if latest.changed().await.is_err() {
            // Sender gone with the panel; nothing can supersede us now.
            std::future::pending::<()>().await;
        }
        if *latest.borrow_and_update() != ticket {
            return;
        }
    }
}
