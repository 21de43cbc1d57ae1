//! Validated problem instance.
//!
//! An [`Instance`] is built once from an [`InstanceDocument`] (or through
//! [`InstanceBuilder`]) and is read-only afterwards. Construction runs every
//! validation rule and fails with [`ValidationError`] if any of them reports an
//! error; warnings are kept on the instance for the caller to inspect.

use crate::costs::{FixedCosts, PairCosts};
use crate::diagnostics::{DiagnosticIssue, Diagnostics};
use crate::document::{InstanceDocument, NodeLocation, PairEntry};
use crate::error::{HubnetResult, ValidationError};
use crate::{ClientId, HubId, SatelliteId, Tier};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Immutable two-echelon network instance.
#[derive(Debug, Clone)]
pub struct Instance {
    name: Option<String>,
    hubs: Vec<HubId>,
    satellites: Vec<SatelliteId>,
    clients: Vec<ClientId>,
    demand: HashMap<ClientId, f64>,
    vehicle_capacity: f64,
    hub_costs: FixedCosts<HubId>,
    satellite_costs: FixedCosts<SatelliteId>,
    client_satellite: PairCosts<ClientId, SatelliteId>,
    satellite_hub: PairCosts<SatelliteId, HubId>,
    hub_hub: PairCosts<HubId, HubId>,
    locations: HashMap<String, NodeLocation>,
    warnings: Vec<DiagnosticIssue>,
}

impl Instance {
    /// Validate a document and build the instance from it.
    pub fn from_document(doc: InstanceDocument) -> HubnetResult<Self> {
        let diagnostics = Self::diagnose(&doc);
        if diagnostics.has_errors() {
            return Err(ValidationError::new(diagnostics.issues).into());
        }

        let mut hub_costs = FixedCosts::new();
        for hub in &doc.hubs {
            let cost = doc.costs.hub.get(hub).copied().unwrap_or_default();
            hub_costs.insert(HubId::new(hub.as_str()), cost);
        }
        let mut satellite_costs = FixedCosts::new();
        for satellite in &doc.satellites {
            let cost = doc.costs.satellite.get(satellite).copied().unwrap_or_default();
            satellite_costs.insert(SatelliteId::new(satellite.as_str()), cost);
        }

        let mut client_satellite = PairCosts::new();
        for entry in &doc.costs.client_satellite {
            client_satellite.insert(
                ClientId::new(entry.from()),
                SatelliteId::new(entry.to()),
                entry.cost,
            );
        }
        let mut satellite_hub = PairCosts::new();
        for entry in &doc.costs.satellite_hub {
            satellite_hub.insert(SatelliteId::new(entry.from()), HubId::new(entry.to()), entry.cost);
        }
        let mut hub_hub = PairCosts::new();
        for entry in &doc.costs.hub_hub {
            hub_hub.insert(HubId::new(entry.from()), HubId::new(entry.to()), entry.cost);
        }

        let demand = doc
            .demand
            .iter()
            .map(|(client, quantity)| (ClientId::new(client.as_str()), *quantity))
            .collect();

        let instance = Self {
            name: doc.name,
            hubs: doc.hubs.into_iter().map(HubId::new).collect(),
            satellites: doc.satellites.into_iter().map(SatelliteId::new).collect(),
            clients: doc.clients.into_iter().map(ClientId::new).collect(),
            demand,
            vehicle_capacity: doc.vehicle_capacity,
            hub_costs,
            satellite_costs,
            client_satellite,
            satellite_hub,
            hub_hub,
            locations: doc.locations.into_iter().collect(),
            warnings: diagnostics.issues,
        };

        debug!(
            hubs = instance.hubs.len(),
            satellites = instance.satellites.len(),
            clients = instance.clients.len(),
            warnings = instance.warnings.len(),
            "instance validated"
        );

        Ok(instance)
    }

    /// Run every validation rule against a document without building anything.
    pub fn diagnose(doc: &InstanceDocument) -> Diagnostics {
        let mut diag = Diagnostics::new();

        if !doc.vehicle_capacity.is_finite() || doc.vehicle_capacity <= 0.0 {
            diag.add_error(
                "capacity",
                &format!(
                    "vehicle capacity must be positive, got {}",
                    doc.vehicle_capacity
                ),
            );
        }

        if doc.clients.is_empty() {
            diag.add_error("nodes", "no clients declared");
        }
        if doc.satellites.is_empty() {
            diag.add_error("nodes", "no satellites declared");
        }
        if doc.hubs.is_empty() {
            diag.add_warning("nodes", "no hubs declared; every satellite will be uncovered");
        }

        let tiers = check_partition(doc, &mut diag);
        let in_tier = |id: &str, tier: Tier| tiers.get(id) == Some(&tier);

        // Demand
        for client in &doc.clients {
            match doc.demand.get(client) {
                None => diag.add_error_with_entity(
                    "demand",
                    &format!("client '{}' has no demand entry", client),
                    client,
                ),
                Some(q) if !q.is_finite() || *q < 0.0 => diag.add_error_with_entity(
                    "demand",
                    &format!("client '{}' has invalid demand {}", client, q),
                    client,
                ),
                Some(q) if doc.vehicle_capacity > 0.0 && *q > doc.vehicle_capacity => diag
                    .add_warning_with_entity(
                        "capacity",
                        &format!(
                            "client '{}' demand {} alone exceeds vehicle capacity {}",
                            client, q, doc.vehicle_capacity
                        ),
                        client,
                    ),
                Some(_) => {}
            }
        }
        for client in doc.demand.keys() {
            if !in_tier(client, Tier::Client) {
                diag.add_error_with_entity(
                    "reference",
                    &format!("demand given for unknown client '{}'", client),
                    client,
                );
            }
        }

        // Fixed costs
        check_fixed_costs(&doc.hubs, &doc.costs.hub, Tier::Hub, &tiers, &mut diag);
        check_fixed_costs(
            &doc.satellites,
            &doc.costs.satellite,
            Tier::Satellite,
            &tiers,
            &mut diag,
        );

        // Pair tables
        check_pairs(
            "client_satellite",
            &doc.costs.client_satellite,
            (Tier::Client, Tier::Satellite),
            &tiers,
            &mut diag,
        );
        check_pairs(
            "satellite_hub",
            &doc.costs.satellite_hub,
            (Tier::Satellite, Tier::Hub),
            &tiers,
            &mut diag,
        );
        check_pairs(
            "hub_hub",
            &doc.costs.hub_hub,
            (Tier::Hub, Tier::Hub),
            &tiers,
            &mut diag,
        );
        for entry in &doc.costs.hub_hub {
            if entry.from() == entry.to() {
                diag.add_error_with_entity(
                    "reference",
                    &format!("hub_hub link '{}' connects a hub to itself", entry.label()),
                    &entry.label(),
                );
            }
        }

        // Coverage: the model stays buildable, but it will be infeasible
        for client in &doc.clients {
            let served = doc
                .costs
                .client_satellite
                .iter()
                .any(|e| e.from() == client && in_tier(e.to(), Tier::Satellite));
            if !served {
                diag.add_warning_with_entity(
                    "coverage",
                    &format!("client '{}' has no allowed satellite", client),
                    client,
                );
            }
        }
        for satellite in &doc.satellites {
            let covered = doc
                .costs
                .satellite_hub
                .iter()
                .any(|e| e.from() == satellite && in_tier(e.to(), Tier::Hub));
            if !covered {
                diag.add_warning_with_entity(
                    "coverage",
                    &format!("satellite '{}' has no allowed hub", satellite),
                    satellite,
                );
            }
        }

        for id in doc.locations.keys() {
            if !tiers.contains_key(id.as_str()) {
                diag.add_warning_with_entity(
                    "reference",
                    &format!("location given for unknown node '{}'", id),
                    id,
                );
            }
        }

        diag
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn hubs(&self) -> &[HubId] {
        &self.hubs
    }

    pub fn satellites(&self) -> &[SatelliteId] {
        &self.satellites
    }

    pub fn clients(&self) -> &[ClientId] {
        &self.clients
    }

    /// Demand of a declared client.
    pub fn demand(&self, client: &ClientId) -> Option<f64> {
        self.demand.get(client).copied()
    }

    pub fn total_demand(&self) -> f64 {
        self.clients
            .iter()
            .filter_map(|client| self.demand(client))
            .sum()
    }

    pub fn vehicle_capacity(&self) -> f64 {
        self.vehicle_capacity
    }

    pub fn hub_costs(&self) -> &FixedCosts<HubId> {
        &self.hub_costs
    }

    pub fn satellite_costs(&self) -> &FixedCosts<SatelliteId> {
        &self.satellite_costs
    }

    pub fn client_satellite_costs(&self) -> &PairCosts<ClientId, SatelliteId> {
        &self.client_satellite
    }

    pub fn satellite_hub_costs(&self) -> &PairCosts<SatelliteId, HubId> {
        &self.satellite_hub
    }

    pub fn hub_hub_costs(&self) -> &PairCosts<HubId, HubId> {
        &self.hub_hub
    }

    /// Fixed opening cost of a hub (0 for an unknown hub).
    pub fn hub_fixed_cost(&self, hub: &HubId) -> f64 {
        self.hub_costs.get(hub).unwrap_or_default()
    }

    /// Fixed cost of a satellite (0 for an unknown satellite).
    pub fn satellite_fixed_cost(&self, satellite: &SatelliteId) -> f64 {
        self.satellite_costs.get(satellite).unwrap_or_default()
    }

    /// Descriptive metadata of any node, by raw id.
    pub fn location(&self, id: &str) -> Option<&NodeLocation> {
        self.locations.get(id)
    }

    /// Warnings found during validation.
    pub fn warnings(&self) -> &[DiagnosticIssue] {
        &self.warnings
    }
}

/// Record which tier every id belongs to, flagging duplicates and overlaps.
fn check_partition<'a>(doc: &'a InstanceDocument, diag: &mut Diagnostics) -> HashMap<&'a str, Tier> {
    let mut tiers: HashMap<&str, Tier> = HashMap::new();
    let sets = [
        (Tier::Hub, &doc.hubs),
        (Tier::Satellite, &doc.satellites),
        (Tier::Client, &doc.clients),
    ];
    for (tier, ids) in sets {
        for id in ids.iter() {
            match tiers.get(id.as_str()) {
                Some(existing) if *existing == tier => diag.add_error_with_entity(
                    "nodes",
                    &format!("{} '{}' is declared more than once", tier, id),
                    id,
                ),
                Some(existing) => diag.add_error_with_entity(
                    "nodes",
                    &format!("'{}' is declared both as {} and as {}", id, existing, tier),
                    id,
                ),
                None => {
                    tiers.insert(id.as_str(), tier);
                }
            }
        }
    }
    tiers
}

fn check_fixed_costs(
    declared: &[String],
    costs: &std::collections::BTreeMap<String, f64>,
    tier: Tier,
    tiers: &HashMap<&str, Tier>,
    diag: &mut Diagnostics,
) {
    for id in declared {
        match costs.get(id) {
            None => diag.add_error_with_entity(
                "cost",
                &format!("{} '{}' has no fixed cost", tier, id),
                id,
            ),
            Some(cost) if !cost.is_finite() => diag.add_error_with_entity(
                "cost",
                &format!("{} '{}' has non-finite fixed cost", tier, id),
                id,
            ),
            Some(cost) if *cost < 0.0 => diag.add_warning_with_entity(
                "cost",
                &format!("{} '{}' has negative fixed cost {}", tier, id, cost),
                id,
            ),
            Some(_) => {}
        }
    }
    for id in costs.keys() {
        if tiers.get(id.as_str()) != Some(&tier) {
            diag.add_error_with_entity(
                "reference",
                &format!("fixed cost given for unknown {} '{}'", tier, id),
                id,
            );
        }
    }
}

fn check_pairs(
    table: &str,
    entries: &[PairEntry],
    (from_tier, to_tier): (Tier, Tier),
    tiers: &HashMap<&str, Tier>,
    diag: &mut Diagnostics,
) {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for entry in entries {
        let label = entry.label();
        for (id, tier) in [(entry.from(), from_tier), (entry.to(), to_tier)] {
            if tiers.get(id) != Some(&tier) {
                diag.add_error_with_entity(
                    "reference",
                    &format!("{} pair '{}' references unknown {} '{}'", table, label, tier, id),
                    &label,
                );
            }
        }
        if !seen.insert((entry.from(), entry.to())) {
            diag.add_error_with_entity(
                "reference",
                &format!("{} pair '{}' is listed more than once", table, label),
                &label,
            );
        }
        if !entry.cost.is_finite() {
            diag.add_error_with_entity(
                "cost",
                &format!("{} pair '{}' has non-finite cost", table, label),
                &label,
            );
        } else if entry.cost < 0.0 {
            diag.add_warning_with_entity(
                "cost",
                &format!("{} pair '{}' has negative cost {}", table, label, entry.cost),
                &label,
            );
        }
    }
}

/// Builder for constructing instances in code
pub struct InstanceBuilder {
    doc: InstanceDocument,
}

impl InstanceBuilder {
    /// Start an instance with the given vehicle capacity
    pub fn new(vehicle_capacity: f64) -> Self {
        Self {
            doc: InstanceDocument {
                vehicle_capacity,
                ..InstanceDocument::default()
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.doc.name = Some(name.into());
        self
    }

    /// Declare a hub with its fixed opening cost
    pub fn hub(mut self, id: impl Into<String>, fixed_cost: f64) -> Self {
        let id = id.into();
        self.doc.costs.hub.insert(id.clone(), fixed_cost);
        self.doc.hubs.push(id);
        self
    }

    /// Declare a satellite with its fixed cost
    pub fn satellite(mut self, id: impl Into<String>, fixed_cost: f64) -> Self {
        let id = id.into();
        self.doc.costs.satellite.insert(id.clone(), fixed_cost);
        self.doc.satellites.push(id);
        self
    }

    /// Declare a client with its demand
    pub fn client(mut self, id: impl Into<String>, demand: f64) -> Self {
        let id = id.into();
        self.doc.demand.insert(id.clone(), demand);
        self.doc.clients.push(id);
        self
    }

    pub fn client_satellite(
        mut self,
        client: impl Into<String>,
        satellite: impl Into<String>,
        cost: f64,
    ) -> Self {
        self.doc
            .costs
            .client_satellite
            .push(PairEntry::new(client, satellite, cost));
        self
    }

    pub fn satellite_hub(
        mut self,
        satellite: impl Into<String>,
        hub: impl Into<String>,
        cost: f64,
    ) -> Self {
        self.doc
            .costs
            .satellite_hub
            .push(PairEntry::new(satellite, hub, cost));
        self
    }

    pub fn hub_hub(mut self, from: impl Into<String>, to: impl Into<String>, cost: f64) -> Self {
        self.doc.costs.hub_hub.push(PairEntry::new(from, to, cost));
        self
    }

    pub fn location(mut self, id: impl Into<String>, location: NodeLocation) -> Self {
        self.doc.locations.insert(id.into(), location);
        self
    }

    /// The document assembled so far
    pub fn into_document(self) -> InstanceDocument {
        self.doc
    }

    /// Validate and build the instance
    pub fn build(self) -> HubnetResult<Instance> {
        Instance::from_document(self.doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HubnetError;

    fn small_builder() -> InstanceBuilder {
        InstanceBuilder::new(30.0)
            .name("small")
            .hub("H1", 50.0)
            .hub("H2", 60.0)
            .satellite("S1", 10.0)
            .client("C1", 10.0)
            .client("C2", 15.0)
            .client_satellite("C1", "S1", 1.5)
            .client_satellite("C2", "S1", 2.0)
            .satellite_hub("S1", "H1", 3.0)
            .satellite_hub("S1", "H2", 4.0)
            .hub_hub("H1", "H2", 5.0)
    }

    fn validation_messages(err: HubnetError) -> Vec<String> {
        match err {
            HubnetError::Validation(v) => v.issues().iter().map(|i| i.message.clone()).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_produces_instance() {
        let instance = small_builder().build().unwrap();

        assert_eq!(instance.name(), Some("small"));
        assert_eq!(instance.hubs().len(), 2);
        assert_eq!(instance.clients()[1], ClientId::new("C2"));
        assert_eq!(instance.demand(&ClientId::new("C2")), Some(15.0));
        assert_eq!(instance.total_demand(), 25.0);
        assert_eq!(instance.hub_fixed_cost(&HubId::new("H2")), 60.0);
        assert_eq!(instance.satellite_fixed_cost(&SatelliteId::new("S1")), 10.0);
        assert!(instance
            .hub_hub_costs()
            .is_allowed(&HubId::new("H1"), &HubId::new("H2")));
        assert!(!instance
            .hub_hub_costs()
            .is_allowed(&HubId::new("H2"), &HubId::new("H1")));
        assert!(instance.warnings().is_empty());
    }

    #[test]
    fn test_missing_demand_is_rejected() {
        let mut doc = small_builder().into_document();
        doc.demand.remove("C2");

        let messages = validation_messages(Instance::from_document(doc).unwrap_err());
        assert!(messages.iter().any(|m| m.contains("'C2' has no demand")));
    }

    #[test]
    fn test_non_positive_capacity_is_rejected() {
        let mut doc = small_builder().into_document();
        doc.vehicle_capacity = 0.0;

        let messages = validation_messages(Instance::from_document(doc).unwrap_err());
        assert!(messages.iter().any(|m| m.contains("capacity must be positive")));
    }

    #[test]
    fn test_dangling_pair_reference_is_rejected() {
        // "S1" is a satellite, not a client
        let doc = small_builder()
            .client_satellite("S1", "S1", 1.0)
            .satellite_hub("S1", "H9", 1.0)
            .into_document();

        let messages = validation_messages(Instance::from_document(doc).unwrap_err());
        assert!(messages
            .iter()
            .any(|m| m.contains("client_satellite pair 'S1->S1' references unknown client 'S1'")));
        assert!(messages
            .iter()
            .any(|m| m.contains("satellite_hub pair 'S1->H9' references unknown hub 'H9'")));
    }

    #[test]
    fn test_overlapping_sets_are_rejected() {
        let doc = small_builder().satellite("H1", 1.0).into_document();
        let messages = validation_messages(Instance::from_document(doc).unwrap_err());
        assert!(messages
            .iter()
            .any(|m| m.contains("'H1' is declared both as hub and as satellite")));
    }

    #[test]
    fn test_uncovered_nodes_are_warnings_only() {
        let instance = small_builder()
            .satellite("S2", 12.0)
            .client("C3", 8.0)
            .build()
            .expect("coverage gaps must not block construction");

        let coverage: Vec<&str> = instance
            .warnings()
            .iter()
            .filter(|w| w.category == "coverage")
            .filter_map(|w| w.entity.as_deref())
            .collect();
        assert_eq!(coverage, vec!["C3", "S2"]);
    }

    #[test]
    fn test_diagnose_reports_everything() {
        let mut doc = small_builder().hub_hub("H1", "H1", 1.0).into_document();
        doc.vehicle_capacity = -1.0;
        doc.demand.insert("C9".into(), 3.0);
        doc.costs.client_satellite.push(PairEntry::new("C1", "S1", -2.0));

        let diag = Instance::diagnose(&doc);
        // capacity, unknown demand client, self-loop, duplicate pair
        assert_eq!(diag.error_count(), 4);
        // negative cost
        assert_eq!(diag.warning_count(), 1);
    }

    #[test]
    fn test_empty_hub_set_is_allowed() {
        let instance = InstanceBuilder::new(10.0)
            .satellite("S1", 1.0)
            .client("C1", 1.0)
            .client_satellite("C1", "S1", 1.0)
            .build()
            .unwrap();

        assert!(instance.hubs().is_empty());
        assert!(instance
            .warnings()
            .iter()
            .any(|w| w.message.contains("no hubs declared")));
    }
}
