use crate::output::print_json;
use anyhow::Context;
use callpanel_client::ClickResult;
use callpanel_core::config::PanelConfig;
use callpanel_core::region::Selector;

use super::action::print_outcome;

pub fn run(config: PanelConfig, selector: &str, index: usize, json: bool) -> anyhow::Result<()> {
    let selector: Selector = selector
        .parse()
        .with_context(|| format!("bad selector '{selector}' (expected .class or #id)"))?;

    let rt = super::runtime()?;
    let result = rt.block_on(async move {
        let panel = super::loaded_panel(config).await?;
        let result = panel
            .click(&selector, index)
            .await
            .with_context(|| format!("click on {selector}[{index}] failed"))?;
        anyhow::Ok(result)
    })?;

    match result {
        ClickResult::Local if json => print_json(&serde_json::json!({ "result": "local" })),
        ClickResult::Local => {
            println!("Chamber call controls revealed (nothing sent).");
            Ok(())
        }
        ClickResult::Dispatched { action, refresh } => print_outcome(&action, &refresh, json),
    }
}
