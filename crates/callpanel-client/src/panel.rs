use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use callpanel_core::config::PanelConfig;
use callpanel_core::state::UiState;
use tokio::sync::{broadcast, watch};

use crate::event::PanelEvent;
use crate::transport::{HttpTransport, Transport};
use crate::Result;

// ─── Panel ────────────────────────────────────────────────────────────────

/// One operator's view of the calls page.
///
/// Cheap to clone; all clones share the same [`UiState`], event channel and
/// cycle counter. The state lock is never held across an `.await`: every
/// region mutation happens in one synchronous step once a response is in.
pub struct Panel<T> {
    pub(crate) inner: Arc<Inner<T>>,
}

pub(crate) struct Inner<T> {
    pub(crate) config: PanelConfig,
    pub(crate) transport: T,
    state: Mutex<UiState>,
    events: broadcast::Sender<PanelEvent>,
    tickets: AtomicU64,
    /// Latest issued cycle ticket. Fetches of older cycles watch this and
    /// abandon their request when it moves.
    pub(crate) latest: watch::Sender<u64>,
}

impl<T> Clone for Panel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Panel<HttpTransport> {
    /// Panel talking HTTP to the server named in `config`.
    pub fn connect(config: PanelConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout())?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> Panel<T> {
    pub fn new(config: PanelConfig, transport: T) -> Self {
        let (events, _) = broadcast::channel(256);
        let (latest, _) = watch::channel(0);
        let state = UiState::new(config.region_marker.clone());
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                state: Mutex::new(state),
                events,
                tickets: AtomicU64::new(0),
                latest,
            }),
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.inner.config
    }

    /// Receive every [`PanelEvent`] emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.inner.events.subscribe()
    }

    /// Read the current state without holding the lock afterwards.
    pub fn with_state<R>(&self, f: impl FnOnce(&UiState) -> R) -> R {
        f(&self.lock())
    }

    /// Health check against the server's test route. Returns its body.
    pub async fn ping(&self) -> Result<String> {
        let url = self.inner.config.health_url();
        let body = self.inner.transport.get_page(&url).await?;
        Ok(body.trim().to_string())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, UiState> {
        // A panic mid-update leaves at worst a stale region; keep serving it.
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn next_ticket(&self) -> u64 {
        self.inner.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn emit(&self, event: PanelEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }
}

// ─── CancelGuard ──────────────────────────────────────────────────────────

/// Runs its closure on drop unless defused first.
///
/// Held across an `.await` so that state entered before it is unwound when
/// the future is dropped mid-request.
pub(crate) struct CancelGuard<F: FnOnce()> {
    on_cancel: Option<F>,
}

impl<F: FnOnce()> CancelGuard<F> {
    pub(crate) fn new(on_cancel: F) -> Self {
        Self {
            on_cancel: Some(on_cancel),
        }
    }

    /// The await completed; nothing to unwind.
    pub(crate) fn defuse(mut self) {
        self.on_cancel = None;
    }
}

impl<F: FnOnce()> Drop for CancelGuard<F> {
    fn drop(&mut self) {
        if let Some(on_cancel) = self.on_cancel.take() {
            on_cancel();
        }
    }
}
