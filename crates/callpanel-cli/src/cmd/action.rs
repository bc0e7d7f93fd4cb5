use crate::output::print_json;
use anyhow::Context;
use callpanel_client::RefreshOutcome;
use callpanel_core::action::{Action, NetworkCall, WireCall};
use callpanel_core::config::PanelConfig;
use callpanel_core::types::Party;
use clap::Args;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct WireArgs {
    #[arg(long)]
    race_id: String,
    /// Two-letter state code
    #[arg(long)]
    statepostal: String,
    /// Reporting unit; omit (or pass "None") for statewide races
    #[arg(long)]
    reportingunit: Option<String>,
    /// Reporting level, e.g. state
    #[arg(long)]
    level: String,
}

impl WireArgs {
    fn wire_call(self) -> WireCall {
        WireCall::new(
            self.race_id,
            self.statepostal,
            self.reportingunit.as_deref(),
            self.level,
        )
    }

    pub fn accept(self) -> Action {
        Action::AcceptWireCall(self.wire_call())
    }

    pub fn reject(self) -> Action {
        Action::RejectWireCall(self.wire_call())
    }
}

#[derive(Args)]
pub struct NetworkArgs {
    #[arg(long)]
    race_id: String,
    #[arg(long)]
    result_id: String,
}

impl NetworkArgs {
    pub fn call(self) -> Action {
        Action::CallFromNetworkCall(NetworkCall::new(self.race_id, self.result_id))
    }

    pub fn uncall(self) -> Action {
        Action::UncallFromNetworkCall(NetworkCall::new(self.race_id, self.result_id))
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Send `action` straight to its endpoint and wait for the refresh.
pub fn run(config: PanelConfig, action: Action, json: bool) -> anyhow::Result<()> {
    let rt = super::runtime()?;
    let refresh = rt.block_on({
        let action = action.clone();
        async move {
            let panel = super::loaded_panel(config).await?;
            let label = action.to_string();
            panel
                .dispatch(action)
                .await
                .with_context(|| format!("{label} failed"))
        }
    })?;
    print_outcome(&action, &refresh, json)
}

pub fn run_chamber(config: PanelConfig, party: &str, json: bool) -> anyhow::Result<()> {
    let party = Party::parse_call(party)?;
    run(config, Action::SetChamberCall { party }, json)
}

pub fn print_outcome(action: &Action, refresh: &RefreshOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "action": action,
            "endpoint": action.endpoint(),
            "refresh": refresh,
        }));
    }

    println!("Sent: {action}");
    match refresh {
        RefreshOutcome::Applied(report) => println!(
            "Refreshed: generation {}, {} controls bound",
            report.generation, report.bindings
        ),
        RefreshOutcome::Superseded => println!("Refresh superseded by a later one."),
        RefreshOutcome::Skipped => println!("Refresh skipped."),
    }
    Ok(())
}
