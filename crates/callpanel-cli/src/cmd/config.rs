use crate::output::print_json;
use callpanel_core::config::{PanelConfig, WarnLevel};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the resolved configuration and derived URLs
    Show,

    /// Validate the configuration for common mistakes
    Validate,
}

pub fn run(config: PanelConfig, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(&config, json),
        ConfigSubcommand::Validate => validate(&config, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(config: &PanelConfig, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "config": config,
            "panel_url": config.panel_url(),
            "health_url": config.health_url(),
            "warnings": config.validate(),
        }));
    }

    print!("{}", config.to_yaml()?);
    println!();
    println!("panel:  {}", config.panel_url());
    println!("health: {}", config.health_url());
    for w in config.validate() {
        println!("[{}] {}", prefix(&w.level), w.message);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(config: &PanelConfig, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            println!("[{}] {}", prefix(&w.level), w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

fn prefix(level: &WarnLevel) -> &'static str {
    match level {
        WarnLevel::Warning => "warning",
        WarnLevel::Error => "error",
    }
}
