use anyhow::Context;
use callpanel_core::config::PanelConfig;
use callpanel_core::types::Office;
use std::path::Path;

/// Resolve the panel configuration.
///
/// Priority, lowest first:
/// 1. Built-in defaults
/// 2. The YAML file named by `--config` / `CALLPANEL_CONFIG`
/// 3. `--base-url` / `CALLPANEL_URL` and `--office` / `CALLPANEL_OFFICE`
pub fn resolve_config(
    path: Option<&Path>,
    base_url: Option<String>,
    office: Option<Office>,
) -> anyhow::Result<PanelConfig> {
    let mut config = PanelConfig::load_or_default(path).context("failed to load config")?;
    if let Some(url) = base_url {
        config.base_url = url;
    }
    if let Some(office) = office {
        config.office = office;
    }
    Ok(config)
}
