//! Clicks and the mutation requests they send.

use callpanel_core::action::Action;
use callpanel_core::binding::ClickTarget;
use callpanel_core::region::Selector;
use callpanel_core::state::ClickOutcome;
use serde::Serialize;
use tracing::{info, warn};

use crate::event::{PanelEvent, RefreshOutcome, RefreshTrigger};
use crate::panel::{CancelGuard, Panel};
use crate::transport::Transport;
use crate::Result;

/// What a click led to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ClickResult {
    /// Local toggle only; nothing was sent.
    Local,
    /// A mutation was accepted and the follow-up refresh ran.
    Dispatched {
        action: Action,
        refresh: RefreshOutcome,
    },
}

impl<T: Transport> Panel<T> {
    /// Send `action` to its endpoint, then refresh.
    ///
    /// The overlay goes up before the request leaves and comes down when the
    /// follow-up refresh has swapped the region. If the request fails the
    /// overlay shows the error instead and no refresh runs; the region stays
    /// as it was and can be clicked again.
    pub async fn dispatch(&self, action: Action) -> Result<RefreshOutcome> {
        let endpoint = action.endpoint();
        {
            let mut state = self.lock();
            if state.begin_mutation() {
                self.emit(PanelEvent::OverlayShown);
            }
        }
        self.emit(PanelEvent::RequestSent {
            endpoint,
            action: action.clone(),
        });

        let url = self.inner.config.endpoint_url(endpoint);
        let fields = action.form_fields();
        let abandoned = CancelGuard::new(|| {
            warn!(%endpoint, "mutation dropped before the server answered");
            let hidden = self.lock().abandon_mutation();
            if hidden {
                self.emit(PanelEvent::OverlayHidden);
            }
        });
        let posted = self.inner.transport.post_form(&url, &fields).await;
        abandoned.defuse();

        if let Err(e) = posted {
            let message = e.to_string();
            warn!(%endpoint, error = %message, "mutation failed");
            self.lock().fail_mutation(message.clone());
            self.emit(PanelEvent::OverlayFailed {
                message: message.clone(),
            });
            self.emit(PanelEvent::MutationFailed { endpoint, message });
            return Err(e);
        }

        info!(%endpoint, %action, "mutation accepted");
        self.lock().end_mutation();
        self.refresh(RefreshTrigger::Forced).await
    }

    /// Click the `nth` element bound under `selector`.
    pub async fn click(&self, selector: &Selector, nth: usize) -> Result<ClickResult> {
        let target = self.lock().target(selector, nth)?;
        self.click_target(target).await
    }

    /// Click a target resolved earlier. Fails if the region has been swapped
    /// since.
    pub async fn click_target(&self, target: ClickTarget) -> Result<ClickResult> {
        let outcome = self.lock().click(target)?;
        match outcome {
            ClickOutcome::Local => {
                self.emit(PanelEvent::LocalToggle);
                Ok(ClickResult::Local)
            }
            ClickOutcome::Dispatch(action) => {
                let refresh = self.dispatch(action.clone()).await?;
                Ok(ClickResult::Dispatched { action, refresh })
            }
        }
    }
}
