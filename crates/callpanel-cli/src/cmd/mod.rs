pub mod action;
pub mod bindings;
pub mod click;
pub mod config;
pub mod ping;
pub mod watch;

use anyhow::Context;
use callpanel_client::Panel;
use callpanel_client::HttpTransport;
use callpanel_core::config::PanelConfig;

/// Build the runtime every network command runs on.
pub fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to start async runtime")
}

/// Connect and load the region once.
pub async fn loaded_panel(config: PanelConfig) -> anyhow::Result<Panel<HttpTransport>> {
    let url = config.panel_url();
    let panel = Panel::connect(config)?;
    panel
        .load()
        .await
        .with_context(|| format!("failed to load {url}"))?;
    Ok(panel)
}
