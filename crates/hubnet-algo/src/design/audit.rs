//! Solution audit
//!
//! Checks an optimal solution against the model's invariants and recomputes
//! the objective from the instance cost tables, independently of the
//! backend's arithmetic.

use super::builder::DesignModel;
use super::solver::Solution;
use hubnet_core::{ClientId, HubId, Instance, SatelliteId};
use serde::Serialize;

/// Objective split by term, recomputed from the cost tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// Σ fixed cost of open hubs
    pub hub_fixed: f64,
    /// Satellite fixed cost, charged once per assigned client
    pub satellite_fixed: f64,
    pub client_satellite: f64,
    pub satellite_hub: f64,
    pub hub_hub: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.hub_fixed + self.satellite_fixed + self.client_satellite + self.satellite_hub + self.hub_hub
    }
}

/// Invariant checks for one optimal solution.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionAudit {
    /// Clients not assigned to exactly one satellite, with their assignment count
    pub misassigned_clients: Vec<(ClientId, usize)>,
    /// Satellites routed to no hub
    pub uncovered_satellites: Vec<SatelliteId>,
    /// Satellite-hub routes that point at a closed hub
    pub routes_to_closed_hubs: Vec<(SatelliteId, HubId)>,
    /// Hub-hub links set to 1
    pub active_hub_links: Vec<(HubId, HubId)>,
    pub breakdown: CostBreakdown,
    pub recomputed_objective: f64,
    pub reported_objective: f64,
}

impl SolutionAudit {
    /// |recomputed - reported| relative to max(|reported|, 1).
    pub fn relative_gap(&self) -> f64 {
        (self.recomputed_objective - self.reported_objective).abs()
            / self.reported_objective.abs().max(1.0)
    }

    pub fn objective_matches(&self, tolerance: f64) -> bool {
        self.relative_gap() <= tolerance
    }

    /// True when every structural invariant of the model holds.
    pub fn is_structurally_valid(&self) -> bool {
        self.misassigned_clients.is_empty()
            && self.uncovered_satellites.is_empty()
            && self.routes_to_closed_hubs.is_empty()
    }

    /// Structural violations as messages, empty for a sound assignment.
    pub fn structural_violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (client, count) in &self.misassigned_clients {
            out.push(format!("client {} is assigned to {} satellites", client, count));
        }
        for satellite in &self.uncovered_satellites {
            out.push(format!("satellite {} is routed to no hub", satellite));
        }
        for (satellite, hub) in &self.routes_to_closed_hubs {
            out.push(format!("satellite {} is routed to closed hub {}", satellite, hub));
        }
        out
    }

    /// Human-readable violation list, empty for a clean solution.
    pub fn violations(&self, tolerance: f64) -> Vec<String> {
        let mut out = self.structural_violations();
        if !self.objective_matches(tolerance) {
            out.push(format!(
                "recomputed cost {:.6} differs from solver objective {:.6} (relative gap {:.2e})",
                self.recomputed_objective,
                self.reported_objective,
                self.relative_gap()
            ));
        }
        out
    }
}

/// Audit an optimal solution; `None` for any other status.
pub fn audit_solution(
    instance: &Instance,
    design: &DesignModel,
    solution: &Solution,
    threshold: f64,
) -> Option<SolutionAudit> {
    let reported_objective = solution.objective_value()?;
    let vars = &design.vars;
    let active = |var| solution.is_active(var, threshold);

    let misassigned_clients = instance
        .clients()
        .iter()
        .filter_map(|client| {
            let count = vars.assignments_of(client).filter(|p| active(p.var)).count();
            (count != 1).then(|| (client.clone(), count))
        })
        .collect();

    let uncovered_satellites = instance
        .satellites()
        .iter()
        .filter(|satellite| {
            !vars.routes_of(satellite).any(|p| active(p.var))
        })
        .cloned()
        .collect();

    let routes_to_closed_hubs = vars
        .satellite_hub_vars()
        .iter()
        .filter(|p| active(p.var))
        .filter(|p| !vars.open_hub(&p.to).is_some_and(|open| active(open)))
        .map(|p| (p.from.clone(), p.to.clone()))
        .collect();

    let active_hub_links = vars
        .hub_hub_vars()
        .iter()
        .filter(|p| active(p.var))
        .map(|p| (p.from.clone(), p.to.clone()))
        .collect();

    let mut breakdown = CostBreakdown::default();
    for (hub, var) in vars.hub_vars() {
        if active(*var) {
            breakdown.hub_fixed += instance.hub_fixed_cost(hub);
        }
    }
    let cs_costs = instance.client_satellite_costs();
    for p in vars.client_satellite_vars().iter().filter(|p| active(p.var)) {
        breakdown.satellite_fixed += instance.satellite_fixed_cost(&p.to);
        breakdown.client_satellite += cs_costs.cost(&p.from, &p.to).unwrap_or_default();
    }
    let sh_costs = instance.satellite_hub_costs();
    for p in vars.satellite_hub_vars().iter().filter(|p| active(p.var)) {
        breakdown.satellite_hub += sh_costs.cost(&p.from, &p.to).unwrap_or_default();
    }
    let hh_costs = instance.hub_hub_costs();
    for p in vars.hub_hub_vars().iter().filter(|p| active(p.var)) {
        breakdown.hub_hub += hh_costs.cost(&p.from, &p.to).unwrap_or_default();
    }

    Some(SolutionAudit {
        misassigned_clients,
        uncovered_satellites,
        routes_to_closed_hubs,
        active_hub_links,
        recomputed_objective: breakdown.total(),
        breakdown,
        reported_objective,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audit(recomputed: f64, reported: f64) -> SolutionAudit {
        SolutionAudit {
            misassigned_clients: Vec::new(),
            uncovered_satellites: Vec::new(),
            routes_to_closed_hubs: Vec::new(),
            active_hub_links: Vec::new(),
            breakdown: CostBreakdown::default(),
            recomputed_objective: recomputed,
            reported_objective: reported,
        }
    }

    #[test]
    fn test_relative_gap() {
        assert!(audit(118.3, 118.3).objective_matches(1e-6));
        assert!(audit(118.3 + 1e-7, 118.3).objective_matches(1e-6));
        assert!(!audit(119.0, 118.3).objective_matches(1e-6));
        // Near-zero objectives fall back to an absolute comparison
        assert!(audit(1e-8, 0.0).objective_matches(1e-6));
    }

    #[test]
    fn test_violations_listing() {
        let mut a = audit(10.0, 12.0);
        a.misassigned_clients.push((ClientId::new("C1"), 0));
        a.routes_to_closed_hubs
            .push((SatelliteId::new("S1"), HubId::new("H2")));

        assert!(!a.is_structurally_valid());
        let violations = a.violations(1e-6);
        assert_eq!(violations.len(), 3);
        assert!(violations[0].contains("C1 is assigned to 0 satellites"));
        assert!(violations[1].contains("closed hub H2"));
        assert!(violations[2].contains("relative gap"));
    }

    #[test]
    fn test_breakdown_total() {
        let breakdown = CostBreakdown {
            hub_fixed: 50.0,
            satellite_fixed: 54.0,
            client_satellite: 8.8,
            satellite_hub: 5.5,
            hub_hub: 0.0,
        };
        assert!((breakdown.total() - 118.3).abs() < 1e-9);
    }
}
