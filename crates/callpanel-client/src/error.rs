use callpanel_core::CallsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Calls(#[from] CallsError),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl PanelError {
    /// True when the round trip itself failed (unreachable, timed out, or a
    /// non-success status), as opposed to a bad page or local misuse.
    pub fn is_network(&self) -> bool {
        matches!(self, PanelError::Http { .. } | PanelError::Status { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PanelError::Http { source, .. } if source.is_timeout())
    }
}
