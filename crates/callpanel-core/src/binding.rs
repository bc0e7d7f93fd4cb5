use crate::action::{Action, NetworkCall, WireCall};
use crate::error::{CallsError, Result};
use crate::markup::Element;
use crate::region::{PageRegion, Selector};
use crate::types::Party;
use serde::Serialize;
use tracing::{debug, warn};

pub const ACCEPT_AP: &str = "accept-ap";
pub const REJECT_AP: &str = "reject-ap";
pub const NPR_CALL: &str = "npr-call";
pub const NPR_UNCALL: &str = "npr-uncall";

pub const ALLOW_CHAMBER_CALL: &str = "allow-chamber-call";
pub const CALL_CHAMBER_DEM: &str = "call-chamber-dem";
pub const CALL_CHAMBER_GOP: &str = "call-chamber-gop";
pub const UNCALL_CHAMBER: &str = "uncall-chamber";

/// Class that keeps a control out of reach until revealed.
pub const HIDDEN_CLASS: &str = "hidden";

// ---------------------------------------------------------------------------
// Handler / Binding
// ---------------------------------------------------------------------------

/// What a click on a bound element does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Handler {
    /// Send a mutation to the server.
    Dispatch { action: Action },
    /// Show the Dem/GOP chamber controls. Local only.
    RevealChamberCall,
}

/// One element of the current region wired to a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub element: usize,
    pub selector: Selector,
    pub handler: Handler,
}

/// A click aimed at an element of a specific region generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClickTarget {
    pub generation: u64,
    pub element: usize,
}

/// Counts of bound controls, for operator display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BindingSummary {
    pub wire_calls: usize,
    pub network_calls: usize,
    pub chamber_controls: usize,
}

// ---------------------------------------------------------------------------
// BindingSet
// ---------------------------------------------------------------------------

/// Bindings for one region generation.
///
/// `bind_all` always clears the previous set first, so re-binding the same
/// markup can never leave two handlers on one element.
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    generation: u64,
    bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop every binding. Safe on an empty or already-unbound set.
    pub fn unbind_all(&mut self) {
        if !self.bindings.is_empty() {
            debug!(
                generation = self.generation,
                bindings = self.bindings.len(),
                "unbinding region"
            );
        }
        self.bindings.clear();
    }

    /// Scan `region` and bind every actionable element. Returns the count.
    ///
    /// Optional chamber controls are bound only when present.
    pub fn bind_all(&mut self, region: &PageRegion) -> usize {
        self.unbind_all();
        self.generation = region.generation();

        for (index, element) in region.elements().iter().enumerate() {
            if let Some((selector, handler)) = handler_for(element) {
                self.bindings.push(Binding {
                    element: index,
                    selector,
                    handler,
                });
            }
        }

        debug!(
            generation = self.generation,
            bindings = self.bindings.len(),
            "bound region"
        );
        self.bindings.len()
    }

    /// Resolve the `nth` element matching `selector` to a click target.
    pub fn target(&self, selector: &Selector, nth: usize) -> Result<ClickTarget> {
        self.bindings
            .iter()
            .filter(|b| &b.selector == selector)
            .nth(nth)
            .map(|b| ClickTarget {
                generation: self.generation,
                element: b.element,
            })
            .ok_or_else(|| CallsError::NoSuchBinding(format!("{selector}[{nth}]")))
    }

    /// Look up the handler a click on `target` fires.
    ///
    /// Targets captured before the last swap are rejected: their element no
    /// longer exists. Elements currently carrying the hidden class cannot be
    /// clicked.
    pub fn fire(&self, region: &PageRegion, target: ClickTarget) -> Result<&Handler> {
        if target.generation != self.generation || target.generation != region.generation() {
            return Err(CallsError::StaleBinding {
                element: target.element,
                bound: target.generation,
                current: region.generation(),
            });
        }
        let binding = self
            .bindings
            .iter()
            .find(|b| b.element == target.element)
            .ok_or_else(|| CallsError::NoSuchBinding(format!("element {}", target.element)))?;

        let hidden = region
            .element(target.element)
            .is_some_and(|el| el.has_class(HIDDEN_CLASS));
        if hidden {
            return Err(CallsError::Hidden(binding.selector.to_string()));
        }
        Ok(&binding.handler)
    }

    pub fn summary(&self) -> BindingSummary {
        let mut summary = BindingSummary::default();
        for binding in &self.bindings {
            match &binding.handler {
                Handler::Dispatch {
                    action: Action::AcceptWireCall(_) | Action::RejectWireCall(_),
                } => summary.wire_calls += 1,
                Handler::Dispatch {
                    action: Action::CallFromNetworkCall(_) | Action::UncallFromNetworkCall(_),
                } => summary.network_calls += 1,
                Handler::Dispatch {
                    action: Action::SetChamberCall { .. },
                }
                | Handler::RevealChamberCall => summary.chamber_controls += 1,
            }
        }
        summary
    }
}

// ---------------------------------------------------------------------------
// Element → handler
// ---------------------------------------------------------------------------

fn handler_for(element: &Element) -> Option<(Selector, Handler)> {
    if let Some(id) = element.id() {
        let handler = match id {
            ALLOW_CHAMBER_CALL => Some(Handler::RevealChamberCall),
            CALL_CHAMBER_DEM => Some(chamber(Some(Party::Dem))),
            CALL_CHAMBER_GOP => Some(chamber(Some(Party::Gop))),
            UNCALL_CHAMBER => Some(chamber(None)),
            _ => None,
        };
        if let Some(handler) = handler {
            return Some((Selector::id(id), handler));
        }
    }

    for class in [ACCEPT_AP, REJECT_AP, NPR_CALL, NPR_UNCALL] {
        if !element.has_class(class) {
            continue;
        }
        let action = match class {
            ACCEPT_AP => wire_call(element).map(Action::AcceptWireCall),
            REJECT_AP => wire_call(element).map(Action::RejectWireCall),
            NPR_CALL => network_call(element).map(Action::CallFromNetworkCall),
            _ => network_call(element).map(Action::UncallFromNetworkCall),
        };
        return match action {
            Some(action) => Some((Selector::class(class), Handler::Dispatch { action })),
            None => {
                warn!(class, "action element is missing data attributes, not binding");
                None
            }
        };
    }
    None
}

fn chamber(party: Option<Party>) -> Handler {
    Handler::Dispatch {
        action: Action::SetChamberCall { party },
    }
}

fn wire_call(element: &Element) -> Option<WireCall> {
    Some(WireCall::new(
        element.data("race-id")?,
        element.data("statepostal")?,
        element.data("reportingunit"),
        element.data("level")?,
    ))
}

fn network_call(element: &Element) -> Option<NetworkCall> {
    Some(NetworkCall::new(
        element.data("race-id")?,
        element.data("result-id")?,
    ))
}

/// Hide the "allow" control and reveal the Dem/GOP controls in place.
///
/// Touches only the live element attributes; the next swap restores whatever
/// the server renders.
pub fn reveal_chamber_call(region: &mut PageRegion) {
    let allow = region.first_index(&Selector::id(ALLOW_CHAMBER_CALL));
    let dem = region.first_index(&Selector::id(CALL_CHAMBER_DEM));
    let gop = region.first_index(&Selector::id(CALL_CHAMBER_GOP));

    if let Some(el) = allow.and_then(|i| region.element_mut(i)) {
        el.add_class(HIDDEN_CLASS);
    }
    for index in [dem, gop].into_iter().flatten() {
        if let Some(el) = region.element_mut(index) {
            el.remove_class(HIDDEN_CLASS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RACES: &str = r#"<div class="container">
      <table>
        <tr>
          <td><button class="btn accept-ap" data-race-id="42" data-statepostal="OH"
                      data-reportingunit="None" data-level="state">Accept</button></td>
          <td><button class="btn reject-ap" data-race-id="43" data-statepostal="AL"
                      data-reportingunit="Jefferson" data-level="district">Reject</button></td>
          <td><button class="npr-call" data-race-id="42" data-result-id="9001">Call</button></td>
          <td><button class="npr-uncall" data-race-id="42" data-result-id="9002">Uncall</button></td>
        </tr>
      </table>
      <button id="allow-chamber-call">Allow</button>
      <button id="call-chamber-dem" class="hidden">Dem</button>
      <button id="call-chamber-gop" class="hidden">GOP</button>
      <button id="uncall-chamber">Uncall chamber</button>
    </div>"#;

    fn loaded(html: &str) -> PageRegion {
        let mut region = PageRegion::new("container");
        region.swap_from_page(html).unwrap();
        region
    }

    fn dispatched(handler: &Handler) -> &Action {
        match handler {
            Handler::Dispatch { action } => action,
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[test]
    fn binds_all_four_families_and_chamber_controls() {
        let region = loaded(RACES);
        let mut set = BindingSet::new();
        assert_eq!(set.bind_all(&region), 8);
        assert_eq!(
            set.summary(),
            BindingSummary {
                wire_calls: 2,
                network_calls: 2,
                chamber_controls: 4,
            }
        );
    }

    #[test]
    fn wire_call_binding_normalizes_reporting_unit() {
        let region = loaded(RACES);
        let mut set = BindingSet::new();
        set.bind_all(&region);

        let target = set.target(&Selector::class(ACCEPT_AP), 0).unwrap();
        let action = dispatched(set.fire(&region, target).unwrap());
        assert_eq!(
            action,
            &Action::AcceptWireCall(WireCall::new("42", "OH", None, "state"))
        );

        let target = set.target(&Selector::class(REJECT_AP), 0).unwrap();
        let Action::RejectWireCall(w) = dispatched(set.fire(&region, target).unwrap()) else {
            panic!("expected reject");
        };
        assert_eq!(w.reportingunit, "Jefferson");
    }

    #[test]
    fn rebind_on_same_markup_yields_same_mapping() {
        let region = loaded(RACES);
        let mut set = BindingSet::new();
        set.bind_all(&region);
        let before = set.bindings().to_vec();

        set.unbind_all();
        assert!(set.is_empty());
        set.bind_all(&region);
        assert_eq!(set.bindings(), before.as_slice());

        // Binding twice in a row never doubles up.
        set.bind_all(&region);
        assert_eq!(set.bindings().len(), before.len());
    }

    #[test]
    fn unbind_is_a_noop_when_nothing_is_bound() {
        let mut set = BindingSet::new();
        set.unbind_all();
        set.unbind_all();
        assert!(set.is_empty());
    }

    #[test]
    fn chamber_controls_are_optional() {
        let region = loaded(
            r#"<div class="container"><button class="npr-call" data-race-id="1" data-result-id="2">x</button></div>"#,
        );
        let mut set = BindingSet::new();
        assert_eq!(set.bind_all(&region), 1);
        assert_eq!(set.summary().chamber_controls, 0);
        assert!(matches!(
            set.target(&Selector::id(UNCALL_CHAMBER), 0),
            Err(CallsError::NoSuchBinding(_))
        ));
    }

    #[test]
    fn elements_missing_identifiers_are_skipped() {
        let region = loaded(
            r#"<div class="container"><button class="npr-call" data-race-id="1">x</button></div>"#,
        );
        let mut set = BindingSet::new();
        assert_eq!(set.bind_all(&region), 0);
    }

    #[test]
    fn hidden_controls_are_not_clickable_until_revealed() {
        let mut region = loaded(RACES);
        let mut set = BindingSet::new();
        set.bind_all(&region);

        let dem = set.target(&Selector::id(CALL_CHAMBER_DEM), 0).unwrap();
        assert!(matches!(set.fire(&region, dem), Err(CallsError::Hidden(_))));

        let allow = set.target(&Selector::id(ALLOW_CHAMBER_CALL), 0).unwrap();
        assert_eq!(set.fire(&region, allow).unwrap(), &Handler::RevealChamberCall);
        reveal_chamber_call(&mut region);

        let action = dispatched(set.fire(&region, dem).unwrap());
        assert_eq!(
            action,
            &Action::SetChamberCall {
                party: Some(Party::Dem)
            }
        );
        assert!(matches!(set.fire(&region, allow), Err(CallsError::Hidden(_))));
    }

    #[test]
    fn targets_from_an_old_generation_are_stale() {
        let mut region = loaded(RACES);
        let mut set = BindingSet::new();
        set.bind_all(&region);
        let old = set.target(&Selector::class(NPR_CALL), 0).unwrap();

        region.swap_from_page(RACES).unwrap();
        set.bind_all(&region);

        assert!(matches!(
            set.fire(&region, old),
            Err(CallsError::StaleBinding { bound: 1, current: 2, .. })
        ));
        let fresh = set.target(&Selector::class(NPR_CALL), 0).unwrap();
        assert!(set.fire(&region, fresh).is_ok());
    }
}
