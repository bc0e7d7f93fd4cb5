use crate::output::{print_json, print_table};
use callpanel_core::binding::{Handler, HIDDEN_CLASS};
use callpanel_core::config::PanelConfig;
use callpanel_core::state::UiState;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
struct Row {
    selector: String,
    index: usize,
    hidden: bool,
    handler: Handler,
}

pub fn run(config: PanelConfig, json: bool) -> anyhow::Result<()> {
    let rt = super::runtime()?;
    let (rows, summary, generation) = rt.block_on(async move {
        let panel = super::loaded_panel(config).await?;
        anyhow::Ok(panel.with_state(|s| {
            (rows(s), s.bindings.summary(), s.region.generation())
        }))
    })?;

    if json {
        return print_json(&serde_json::json!({
            "generation": generation,
            "summary": summary,
            "bindings": rows,
        }));
    }

    if rows.is_empty() {
        println!("No controls on the page.");
        return Ok(());
    }
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.selector.clone(),
                r.index.to_string(),
                if r.hidden { "hidden" } else { "" }.to_string(),
                describe(&r.handler),
            ]
        })
        .collect();
    print_table(&["SELECTOR", "INDEX", "STATE", "ACTION"], &table);
    println!(
        "\n{} wire calls, {} network calls, {} chamber controls",
        summary.wire_calls, summary.network_calls, summary.chamber_controls
    );
    Ok(())
}

/// Bindings in page order, each with the `--index` that clicks it.
fn rows(state: &UiState) -> Vec<Row> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    state
        .bindings
        .bindings()
        .iter()
        .map(|b| {
            let selector = b.selector.to_string();
            let index = seen.entry(selector.clone()).or_insert(0);
            let row = Row {
                hidden: state
                    .region
                    .element(b.element)
                    .is_some_and(|e| e.has_class(HIDDEN_CLASS)),
                selector,
                index: *index,
                handler: b.handler.clone(),
            };
            *index += 1;
            row
        })
        .collect()
}

fn describe(handler: &Handler) -> String {
    match handler {
        Handler::Dispatch { action } => action.to_string(),
        Handler::RevealChamberCall => "reveal chamber call".to_string(),
    }
}
