use crate::output::print_json;
use anyhow::Context;
use callpanel_client::Panel;
use callpanel_core::config::PanelConfig;

pub fn run(config: PanelConfig, json: bool) -> anyhow::Result<()> {
    let url = config.health_url();
    let rt = super::runtime()?;
    let body = rt.block_on(async move {
        let panel = Panel::connect(config)?;
        panel
            .ping()
            .await
            .with_context(|| format!("server at {url} is not answering"))
    })?;

    if json {
        print_json(&serde_json::json!({ "ok": true, "server_time": body }))
    } else {
        println!("ok ({body})");
        Ok(())
    }
}
