//! Model builder
//!
//! Translates a validated [`Instance`] into the network design MILP.

use super::linear::{Comparison, LinearExpr, LinearModel, VarHandle};
use hubnet_core::{ClientId, HubId, Instance, SatelliteId};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// Decision variable attached to an allowed (from, to) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairVar<A, B> {
    pub from: A,
    pub to: B,
    pub var: VarHandle,
}

/// Positions of one pair family, keyed both ways.
#[derive(Debug, Clone)]
struct PairIndex<A, B> {
    slots: HashMap<A, HashMap<B, usize>>,
    by_from: HashMap<A, Vec<usize>>,
    by_to: HashMap<B, Vec<usize>>,
}

impl<A, B> Default for PairIndex<A, B> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            by_from: HashMap::new(),
            by_to: HashMap::new(),
        }
    }
}

impl<A, B> PairIndex<A, B>
where
    A: Clone + Eq + Hash,
    B: Clone + Eq + Hash,
{
    fn insert(&mut self, from: &A, to: &B, position: usize) {
        self.slots
            .entry(from.clone())
            .or_default()
            .insert(to.clone(), position);
        self.by_from.entry(from.clone()).or_default().push(position);
        self.by_to.entry(to.clone()).or_default().push(position);
    }

    fn slot(&self, from: &A, to: &B) -> Option<usize> {
        self.slots.get(from).and_then(|row| row.get(to)).copied()
    }

    fn leaving(&self, from: &A) -> &[usize] {
        self.by_from.get(from).map(Vec::as_slice).unwrap_or_default()
    }

    fn entering(&self, to: &B) -> &[usize] {
        self.by_to.get(to).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Column handles of the four variable families, in instance order.
///
/// Filled by [`build_model`]; lookups by key go through hashed indices.
#[derive(Debug, Clone, Default)]
pub struct DesignVariables {
    /// `OpenHub[h]`
    open_hub: Vec<(HubId, VarHandle)>,
    /// `AssignClientSatellite[c,s]`
    client_satellite: Vec<PairVar<ClientId, SatelliteId>>,
    /// `AssignSatelliteHub[s,h]`
    satellite_hub: Vec<PairVar<SatelliteId, HubId>>,
    /// `LinkHubHub[h1,h2]`
    hub_hub: Vec<PairVar<HubId, HubId>>,
    hub_slots: HashMap<HubId, usize>,
    cs_index: PairIndex<ClientId, SatelliteId>,
    sh_index: PairIndex<SatelliteId, HubId>,
    hh_index: PairIndex<HubId, HubId>,
}

impl DesignVariables {
    pub fn hub_vars(&self) -> &[(HubId, VarHandle)] {
        &self.open_hub
    }

    pub fn client_satellite_vars(&self) -> &[PairVar<ClientId, SatelliteId>] {
        &self.client_satellite
    }

    pub fn satellite_hub_vars(&self) -> &[PairVar<SatelliteId, HubId>] {
        &self.satellite_hub
    }

    pub fn hub_hub_vars(&self) -> &[PairVar<HubId, HubId>] {
        &self.hub_hub
    }

    pub fn open_hub(&self, hub: &HubId) -> Option<VarHandle> {
        self.hub_slots.get(hub).map(|&slot| self.open_hub[slot].1)
    }

    pub fn client_satellite(&self, client: &ClientId, satellite: &SatelliteId) -> Option<VarHandle> {
        self.cs_index
            .slot(client, satellite)
            .map(|slot| self.client_satellite[slot].var)
    }

    pub fn satellite_hub(&self, satellite: &SatelliteId, hub: &HubId) -> Option<VarHandle> {
        self.sh_index
            .slot(satellite, hub)
            .map(|slot| self.satellite_hub[slot].var)
    }

    pub fn hub_hub(&self, from: &HubId, to: &HubId) -> Option<VarHandle> {
        self.hh_index.slot(from, to).map(|slot| self.hub_hub[slot].var)
    }

    /// Assignment columns of one client, in instance order.
    pub fn assignments_of<'a>(
        &'a self,
        client: &ClientId,
    ) -> impl Iterator<Item = &'a PairVar<ClientId, SatelliteId>> + 'a {
        self.cs_index
            .leaving(client)
            .iter()
            .map(move |&slot| &self.client_satellite[slot])
    }

    /// Assignment columns of every client a satellite may serve.
    pub fn assignments_to<'a>(
        &'a self,
        satellite: &SatelliteId,
    ) -> impl Iterator<Item = &'a PairVar<ClientId, SatelliteId>> + 'a {
        self.cs_index
            .entering(satellite)
            .iter()
            .map(move |&slot| &self.client_satellite[slot])
    }

    /// Satellite-hub columns leaving one satellite.
    pub fn routes_of<'a>(
        &'a self,
        satellite: &SatelliteId,
    ) -> impl Iterator<Item = &'a PairVar<SatelliteId, HubId>> + 'a {
        self.sh_index
            .leaving(satellite)
            .iter()
            .map(move |&slot| &self.satellite_hub[slot])
    }

    pub fn len(&self) -> usize {
        self.open_hub.len() + self.client_satellite.len() + self.satellite_hub.len() + self.hub_hub.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_hub(&mut self, hub: HubId, var: VarHandle) {
        self.hub_slots.insert(hub.clone(), self.open_hub.len());
        self.open_hub.push((hub, var));
    }

    fn push_client_satellite(&mut self, from: ClientId, to: SatelliteId, var: VarHandle) {
        self.cs_index.insert(&from, &to, self.client_satellite.len());
        self.client_satellite.push(PairVar { from, to, var });
    }

    fn push_satellite_hub(&mut self, from: SatelliteId, to: HubId, var: VarHandle) {
        self.sh_index.insert(&from, &to, self.satellite_hub.len());
        self.satellite_hub.push(PairVar { from, to, var });
    }

    fn push_hub_hub(&mut self, from: HubId, to: HubId, var: VarHandle) {
        self.hh_index.insert(&from, &to, self.hub_hub.len());
        self.hub_hub.push(PairVar { from, to, var });
    }
}

/// Compiled model plus the map from domain keys to its columns.
#[derive(Debug, Clone)]
pub struct DesignModel {
    pub model: LinearModel,
    pub vars: DesignVariables,
}

/// Build the network design MILP for an instance.
///
/// Never fails: a client without any allowed satellite, or a satellite without
/// any allowed hub, yields a row with no terms that the solver reports as
/// infeasible.
pub fn build_model(instance: &Instance) -> DesignModel {
    let mut model = LinearModel::new();
    let mut vars = DesignVariables::default();

    // === Variables (allowed pairs only) ===
    for hub in instance.hubs() {
        let var = model.add_boolean_variable(format!("OpenHub[{}]", hub));
        vars.push_hub(hub.clone(), var);
    }
    for entry in instance.client_satellite_costs().iter() {
        let var = model.add_boolean_variable(format!(
            "AssignClientSatellite[{},{}]",
            entry.from, entry.to
        ));
        vars.push_client_satellite(entry.from.clone(), entry.to.clone(), var);
    }
    for entry in instance.satellite_hub_costs().iter() {
        let var = model.add_boolean_variable(format!(
            "AssignSatelliteHub[{},{}]",
            entry.from, entry.to
        ));
        vars.push_satellite_hub(entry.from.clone(), entry.to.clone(), var);
    }
    for entry in instance.hub_hub_costs().iter() {
        let var = model.add_boolean_variable(format!("LinkHubHub[{},{}]", entry.from, entry.to));
        vars.push_hub_hub(entry.from.clone(), entry.to.clone(), var);
    }

    // === Objective ===
    let mut objective = LinearExpr::new();
    for (hub, var) in &vars.open_hub {
        objective.add_term(*var, instance.hub_fixed_cost(hub));
    }
    // Satellite fixed cost is charged for every client assigned to the
    // satellite, not once per used satellite.
    for satellite in instance.satellites() {
        let fixed = instance.satellite_fixed_cost(satellite);
        for assign in vars.assignments_to(satellite) {
            objective.add_term(assign.var, fixed);
        }
    }
    let cs_costs = instance.client_satellite_costs();
    for assign in &vars.client_satellite {
        let cost = cs_costs.cost(&assign.from, &assign.to).unwrap_or_default();
        objective.add_term(assign.var, cost);
    }
    let sh_costs = instance.satellite_hub_costs();
    for route in &vars.satellite_hub {
        let cost = sh_costs.cost(&route.from, &route.to).unwrap_or_default();
        objective.add_term(route.var, cost);
    }
    // Hub-hub links only carry cost; no row mentions them.
    let hh_costs = instance.hub_hub_costs();
    for link in &vars.hub_hub {
        let cost = hh_costs.cost(&link.from, &link.to).unwrap_or_default();
        objective.add_term(link.var, cost);
    }
    model.set_objective(objective, true);

    // === Single assignment: Σ_s x[c,s] = 1 ===
    for client in instance.clients() {
        let expr: LinearExpr = vars.assignments_of(client).map(|p| (p.var, 1.0)).collect();
        model.add_linear_constraint(
            format!("single_assignment[{}]", client),
            expr,
            Comparison::Eq,
            1.0,
        );
    }

    // === Satellite coverage: Σ_h z[s,h] >= 1 ===
    for satellite in instance.satellites() {
        let expr: LinearExpr = vars.routes_of(satellite).map(|p| (p.var, 1.0)).collect();
        model.add_linear_constraint(
            format!("satellite_coverage[{}]", satellite),
            expr,
            Comparison::GreaterEq,
            1.0,
        );
    }

    // === Hub activation: z[s,h] - y[h] <= 0 ===
    for route in &vars.satellite_hub {
        let mut expr = LinearExpr::from(route.var);
        if let Some(open) = vars.open_hub(&route.to) {
            expr.add_term(open, -1.0);
        }
        model.add_linear_constraint(
            format!("hub_activation[{},{}]", route.from, route.to),
            expr,
            Comparison::LessEq,
            0.0,
        );
    }

    let stats = model.stats();
    debug!(
        columns = stats.columns,
        rows = stats.rows,
        nonzeros = stats.nonzeros,
        "network design model built"
    );

    DesignModel { model, vars }
}
