//! `callpanel-client`: keeps an operator's calls panel in step with the
//! server.
//!
//! # Architecture
//!
//! ```text
//! click ──► Panel::click ──► UiState::click ──► Local (chamber reveal)
//!                                  │
//!                                  ▼
//!                          Panel::dispatch      overlay up, POST form
//!                                  │
//!                                  ▼
//! RefreshScheduler ──tick──► Panel::refresh     GET page, single-flight
//!                                  │
//!                                  ▼
//!                          UiState::apply_page  swap region, rebind, overlay down
//! ```
//!
//! Every step is published as a [`PanelEvent`] on a broadcast channel.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use callpanel_client::{Panel, RefreshScheduler};
//! use callpanel_core::config::PanelConfig;
//!
//! let panel = Panel::connect(PanelConfig::default())?;
//! panel.load().await?;
//! let timer = RefreshScheduler::new(panel.clone()).start();
//! panel.click(&".accept-ap".parse()?, 0).await?;
//! timer.shutdown().await;
//! ```

pub mod dispatch;
pub mod error;
pub mod event;
pub mod panel;
pub mod scheduler;
pub mod sync;
pub mod transport;


pub use dispatch::ClickResult;
pub use error::PanelError;
pub use event::{PanelEvent, RefreshOutcome, RefreshTrigger};
pub use panel::Panel;
pub use scheduler::{RefreshScheduler, SchedulerHandle};
pub use transport::{HttpTransport, Transport};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, PanelError>;
