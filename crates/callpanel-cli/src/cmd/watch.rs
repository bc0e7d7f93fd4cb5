use crate::output::print_json_line;
use callpanel_client::{Panel, PanelEvent, RefreshScheduler};
use callpanel_core::config::{PanelConfig, WarnLevel};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{info, warn};

pub fn run(mut config: PanelConfig, interval: Option<u64>, json: bool) -> anyhow::Result<()> {
    if let Some(secs) = interval {
        config.refresh_interval_secs = secs;
    }
    check_config(&config)?;

    let rt = super::runtime()?;
    rt.block_on(async move {
        let panel = Panel::connect(config)?;
        let scheduler = RefreshScheduler::new(panel.clone());
        let mut events = BroadcastStream::new(panel.subscribe());

        info!(
            url = %panel.config().panel_url(),
            office = panel.config().office.officename(),
            period_secs = scheduler.period().as_secs(),
            "watching calls panel"
        );
        // A failed first load is shown on the overlay; the timer retries.
        if let Err(e) = panel.load().await {
            if e.is_timeout() {
                warn!(
                    timeout_secs = panel.config().request_timeout_secs,
                    "initial load timed out"
                );
            } else {
                warn!(error = %e, "initial load failed");
            }
        }
        let timer = scheduler.start();

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        loop {
            tokio::select! {
                _ = &mut ctrl_c => break,
                next = events.next() => match next {
                    Some(Ok(event)) => print_event(&event, json)?,
                    Some(Err(BroadcastStreamRecvError::Lagged(n))) => {
                        warn!(skipped = n, "event stream lagged");
                    }
                    None => break,
                },
            }
        }

        timer.shutdown().await;
        info!("stopped");
        Ok(())
    })
}

/// Refuse to start a loop the config would break, e.g. a zero interval.
fn check_config(config: &PanelConfig) -> anyhow::Result<()> {
    let errors: Vec<_> = config
        .validate()
        .into_iter()
        .filter(|w| w.level == WarnLevel::Error)
        .map(|w| w.message)
        .collect();
    if !errors.is_empty() {
        anyhow::bail!("invalid config: {}", errors.join("; "));
    }
    Ok(())
}

fn print_event(event: &PanelEvent, json: bool) -> anyhow::Result<()> {
    let now = chrono::Local::now();
    if json {
        print_json_line(&serde_json::json!({
            "at": now.to_rfc3339(),
            "event": event,
        }))
    } else {
        println!("[{}] {}", now.format("%H:%M:%S"), describe(event));
        Ok(())
    }
}

/// One-line operator description of an event.
pub fn describe(event: &PanelEvent) -> String {
    match event {
        PanelEvent::OverlayShown => "overlay shown".to_string(),
        PanelEvent::OverlayHidden => "overlay hidden".to_string(),
        PanelEvent::OverlayFailed { message } => format!("overlay: {message}"),
        PanelEvent::RequestSent { endpoint, action } => format!("POST {endpoint}: {action}"),
        PanelEvent::MutationFailed { endpoint, message } => {
            format!("{endpoint} failed: {message}")
        }
        PanelEvent::RefreshStarted { ticket, trigger } => {
            format!("refresh #{ticket} started ({trigger})")
        }
        PanelEvent::RegionSwapped { ticket, generation } => {
            format!("refresh #{ticket} swapped region (generation {generation})")
        }
        PanelEvent::Rebound {
            generation,
            bindings,
        } => format!("{bindings} controls bound (generation {generation})"),
        PanelEvent::RefreshSuperseded { ticket } => format!("refresh #{ticket} superseded"),
        PanelEvent::RefreshSkipped => "timer tick skipped, refresh in flight".to_string(),
        PanelEvent::RefreshFailed { ticket, message } => {
            format!("refresh #{ticket} failed: {message}")
        }
        PanelEvent::LocalToggle => "chamber call controls revealed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callpanel_client::RefreshTrigger;
    use callpanel_core::action::{Action, Endpoint};
    use callpanel_core::types::Party;

    #[test]
    fn zero_interval_is_refused() {
        let config = PanelConfig {
            refresh_interval_secs: 0,
            ..Default::default()
        };
        let err = check_config(&config).unwrap_err();
        assert!(err
            .to_string()
            .contains("refresh_interval_secs must be at least 1"));
        assert!(check_config(&PanelConfig::default()).is_ok());
    }

    #[test]
    fn describes_refresh_and_request() {
        let started = PanelEvent::RefreshStarted {
            ticket: 3,
            trigger: RefreshTrigger::Timer,
        };
        assert_eq!(describe(&started), "refresh #3 started (timer)");

        let sent = PanelEvent::RequestSent {
            endpoint: Endpoint::CallChamber,
            action: Action::SetChamberCall {
                party: Some(Party::Gop),
            },
        };
        assert_eq!(describe(&sent), "POST call-chamber: call chamber for GOP");
    }
}
