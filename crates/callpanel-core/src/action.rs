use crate::types::Party;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal the page template renders for a race with no reporting unit.
pub const NO_REPORTING_UNIT: &str = "None";

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Mutation endpoints, addressed relative to the panel URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    AcceptAp,
    CallNpr,
    CallChamber,
}

impl Endpoint {
    pub fn path_suffix(self) -> &'static str {
        match self {
            Endpoint::AcceptAp => "accept-ap",
            Endpoint::CallNpr => "call-npr",
            Endpoint::CallChamber => "call-chamber",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_suffix())
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Identifies a race for a wire-service call decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCall {
    pub race_id: String,
    pub statepostal: String,
    /// Always present; empty when the race has no reporting unit.
    pub reportingunit: String,
    pub level: String,
}

impl WireCall {
    pub fn new(
        race_id: impl Into<String>,
        statepostal: impl Into<String>,
        reportingunit: Option<&str>,
        level: impl Into<String>,
    ) -> Self {
        Self {
            race_id: race_id.into(),
            statepostal: statepostal.into(),
            reportingunit: normalize_reporting_unit(reportingunit),
            level: level.into(),
        }
    }
}

/// Identifies one candidate result for a network call toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCall {
    pub race_id: String,
    pub result_id: String,
}

impl NetworkCall {
    pub fn new(race_id: impl Into<String>, result_id: impl Into<String>) -> Self {
        Self {
            race_id: race_id.into(),
            result_id: result_id.into(),
        }
    }
}

/// Maps a missing reporting unit, or the template's `None` sentinel, to "".
pub fn normalize_reporting_unit(raw: Option<&str>) -> String {
    match raw {
        None => String::new(),
        Some(v) if v == NO_REPORTING_UNIT => String::new(),
        Some(v) => v.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A request to mutate race-call state on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    AcceptWireCall(WireCall),
    RejectWireCall(WireCall),
    CallFromNetworkCall(NetworkCall),
    UncallFromNetworkCall(NetworkCall),
    /// `None` clears the chamber call.
    SetChamberCall { party: Option<Party> },
}

impl Action {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Action::AcceptWireCall(_) | Action::RejectWireCall(_) => Endpoint::AcceptAp,
            Action::CallFromNetworkCall(_) | Action::UncallFromNetworkCall(_) => {
                Endpoint::CallNpr
            }
            Action::SetChamberCall { .. } => Endpoint::CallChamber,
        }
    }

    /// Form fields posted to [`Action::endpoint`], in wire order.
    ///
    /// Accept and reject share a body; the server toggles the stored
    /// decision. Likewise call and uncall. An uncalled chamber posts an
    /// empty `call` value, which the server reads as null.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Action::AcceptWireCall(w) | Action::RejectWireCall(w) => vec![
                ("race_id", w.race_id.clone()),
                ("statepostal", w.statepostal.clone()),
                ("reportingunit", w.reportingunit.clone()),
                ("level", w.level.clone()),
            ],
            Action::CallFromNetworkCall(n) | Action::UncallFromNetworkCall(n) => vec![
                ("race_id", n.race_id.clone()),
                ("result_id", n.result_id.clone()),
            ],
            Action::SetChamberCall { party } => vec![(
                "call",
                party.map(|p| p.as_str().to_string()).unwrap_or_default(),
            )],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::AcceptWireCall(_) => "accept wire call",
            Action::RejectWireCall(_) => "reject wire call",
            Action::CallFromNetworkCall(_) => "call from network",
            Action::UncallFromNetworkCall(_) => "uncall from network",
            Action::SetChamberCall { party: Some(_) } => "call chamber",
            Action::SetChamberCall { party: None } => "uncall chamber",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::AcceptWireCall(w) | Action::RejectWireCall(w) => {
                write!(f, "{} race {} ({})", self.label(), w.race_id, w.statepostal)
            }
            Action::CallFromNetworkCall(n) | Action::UncallFromNetworkCall(n) => {
                write!(f, "{} race {} result {}", self.label(), n.race_id, n.result_id)
            }
            Action::SetChamberCall { party: Some(p) } => write!(f, "{} for {p}", self.label()),
            Action::SetChamberCall { party: None } => f.write_str(self.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ohio() -> WireCall {
        WireCall::new("42", "OH", None, "state")
    }

    #[test]
    fn reporting_unit_sentinel_normalizes_to_empty() {
        assert_eq!(normalize_reporting_unit(None), "");
        assert_eq!(normalize_reporting_unit(Some("None")), "");
        assert_eq!(normalize_reporting_unit(Some("Cuyahoga")), "Cuyahoga");
        assert_eq!(normalize_reporting_unit(Some("")), "");
    }

    #[test]
    fn accept_and_reject_share_endpoint_and_body() {
        let accept = Action::AcceptWireCall(ohio());
        let reject = Action::RejectWireCall(ohio());
        assert_eq!(accept.endpoint(), Endpoint::AcceptAp);
        assert_eq!(reject.endpoint(), Endpoint::AcceptAp);
        assert_eq!(accept.form_fields(), reject.form_fields());
        assert_eq!(
            accept.form_fields(),
            vec![
                ("race_id", "42".to_string()),
                ("statepostal", "OH".to_string()),
                ("reportingunit", String::new()),
                ("level", "state".to_string()),
            ]
        );
    }

    #[test]
    fn network_call_posts_race_and_result() {
        let call = Action::UncallFromNetworkCall(NetworkCall::new("7", "1234"));
        assert_eq!(call.endpoint(), Endpoint::CallNpr);
        assert_eq!(
            call.form_fields(),
            vec![("race_id", "7".to_string()), ("result_id", "1234".to_string())]
        );
    }

    #[test]
    fn chamber_uncall_posts_empty_call() {
        let uncall = Action::SetChamberCall { party: None };
        assert_eq!(uncall.endpoint(), Endpoint::CallChamber);
        assert_eq!(uncall.form_fields(), vec![("call", String::new())]);

        let gop = Action::SetChamberCall {
            party: Some(Party::Gop),
        };
        assert_eq!(gop.form_fields(), vec![("call", "GOP".to_string())]);
    }

    #[test]
    fn display_names_the_target() {
        let a = Action::AcceptWireCall(ohio());
        assert_eq!(a.to_string(), "accept wire call race 42 (OH)");
        let c = Action::SetChamberCall {
            party: Some(Party::Dem),
        };
        assert_eq!(c.to_string(), "call chamber for Dem");
    }
}
