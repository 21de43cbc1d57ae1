//! Solution report generation
//!
//! [`generate_report`] builds a typed [`DesignReport`] from an instance and a
//! solution; [`DesignReport::render`] formats it as plain text. The JSON form
//! is the serde serialization of the same value.

use super::audit::{audit_solution, CostBreakdown};
use super::builder::DesignModel;
use super::solver::{SolveStatus, Solution};
use hubnet_core::{ClientId, HubId, Instance, SatelliteId};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Knobs for reading a solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    /// A binary column counts as 1 when its value exceeds this
    pub assignment_threshold: f64,
    /// Relative tolerance for the objective recomputation
    pub objective_tolerance: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            assignment_threshold: 0.5,
            objective_tolerance: 1e-6,
        }
    }
}

/// An open hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveHub {
    pub hub: HubId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub fixed_cost: f64,
}

/// A satellite routed through a hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteLink {
    pub satellite: SatelliteId,
    pub hub: HubId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hub_name: Option<String>,
    /// Cost tables are distance-based, so distance and cost coincide
    pub distance: f64,
    pub transport_cost: f64,
}

/// One client delivery on a satellite route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStop {
    pub client: ClientId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub demand: f64,
    pub distance: f64,
    pub delivery_cost: f64,
}

/// Demand above vehicle capacity on a route. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityWarning {
    pub overload: f64,
    /// ceil(demand / capacity)
    pub trips_needed: u32,
}

/// Clients served by one satellite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteRoute {
    pub satellite: SatelliteId,
    /// Hubs the satellite is routed through
    pub hubs: Vec<HubId>,
    pub stops: Vec<RouteStop>,
    pub total_demand: f64,
    pub capacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_warning: Option<CapacityWarning>,
    /// Σ client-satellite cost of the stops
    pub route_cost: f64,
}

impl SatelliteRoute {
    pub fn exceeds_capacity(&self) -> bool {
        self.capacity_warning.is_some()
    }

    pub fn clients(&self) -> impl Iterator<Item = &ClientId> {
        self.stops.iter().map(|stop| &stop.client)
    }
}

/// An active inter-hub link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubLink {
    pub from: HubId,
    pub to: HubId,
    pub distance: f64,
    pub cost: f64,
}

/// Network plan read from an optimal solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    pub backend: String,
    pub active_hubs: Vec<ActiveHub>,
    pub satellite_links: Vec<SatelliteLink>,
    pub routes: Vec<SatelliteRoute>,
    pub hub_links: Vec<HubLink>,
    pub cost_breakdown: CostBreakdown,
    /// Solver objective value
    pub total_cost: f64,
    pub recomputed_cost: f64,
    pub objective_mismatch: bool,
    /// Invariant violations found by the audit; empty for a sound solution
    pub audit_issues: Vec<String>,
}

impl NetworkPlan {
    pub fn active_hub_ids(&self) -> Vec<&HubId> {
        self.active_hubs.iter().map(|h| &h.hub).collect()
    }

    pub fn route(&self, satellite: &SatelliteId) -> Option<&SatelliteRoute> {
        self.routes.iter().find(|r| &r.satellite == satellite)
    }

    pub fn capacity_warnings(&self) -> usize {
        self.routes.iter().filter(|r| r.exceeds_capacity()).count()
    }
}

/// Typed report: a network plan, or the non-optimal status alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DesignReport {
    NoOptimalSolution {
        status: SolveStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Optimal(NetworkPlan),
}

impl DesignReport {
    pub fn is_optimal(&self) -> bool {
        matches!(self, DesignReport::Optimal(_))
    }

    pub fn status(&self) -> SolveStatus {
        match self {
            DesignReport::NoOptimalSolution { status, .. } => *status,
            DesignReport::Optimal(_) => SolveStatus::Optimal,
        }
    }

    pub fn plan(&self) -> Option<&NetworkPlan> {
        match self {
            DesignReport::Optimal(plan) => Some(plan),
            DesignReport::NoOptimalSolution { .. } => None,
        }
    }

    /// Plain-text rendering.
    pub fn render(&self) -> String {
        let plan = match self {
            DesignReport::NoOptimalSolution { status, message } => {
                let mut s = format!("No optimal solution found (status: {})\n", status);
                if let Some(message) = message {
                    s.push_str(&format!("  {}\n", message));
                }
                return s;
            }
            DesignReport::Optimal(plan) => plan,
        };

        let rule = "=".repeat(50);
        let mut s = String::new();
        s.push_str(&format!("{}\nOPTIMAL DISTRIBUTION NETWORK\n{}\n", rule, rule));
        if let Some(name) = &plan.instance {
            s.push_str(&format!("Instance: {}\n", name));
        }
        s.push_str(&format!("Backend: {}\n", plan.backend));

        let hubs: Vec<&str> = plan.active_hubs.iter().map(|h| h.hub.as_str()).collect();
        if hubs.is_empty() {
            s.push_str("\nActive hubs: none\n");
        } else {
            s.push_str(&format!("\nActive hubs: {}\n", hubs.join(", ")));
        }

        for link in &plan.satellite_links {
            match &link.hub_name {
                Some(name) => s.push_str(&format!(
                    "\nSatellite {} -> hub {} ({})\n",
                    link.satellite, link.hub, name
                )),
                None => s.push_str(&format!("\nSatellite {} -> hub {}\n", link.satellite, link.hub)),
            }
            s.push_str(&format!("  Distance: {} km\n", link.distance));
            s.push_str(&format!("  Transport cost: ${:.2}\n", link.transport_cost));
        }

        for route in &plan.routes {
            let via: Vec<&str> = route.hubs.iter().map(|h| h.as_str()).collect();
            s.push_str(&format!(
                "\nRoute for satellite {} (via {}):\n",
                route.satellite,
                if via.is_empty() { "-".to_string() } else { via.join(", ") }
            ));
            let clients: Vec<&str> = route.clients().map(|c| c.as_str()).collect();
            s.push_str(&format!("  Clients: {}\n", clients.join(", ")));
            s.push_str(&format!("  Total demand: {} units\n", route.total_demand));
            s.push_str(&format!("  Vehicle capacity: {} units\n", route.capacity));
            if let Some(warning) = &route.capacity_warning {
                s.push_str(&format!(
                    "  [WARN] demand exceeds vehicle capacity by {} units; split into {} trips or raise capacity\n",
                    warning.overload, warning.trips_needed
                ));
            }
            for stop in &route.stops {
                match &stop.name {
                    Some(name) => s.push_str(&format!("  - {}: {}\n", stop.client, name)),
                    None => s.push_str(&format!("  - {}\n", stop.client)),
                }
                if let Some(address) = &stop.address {
                    s.push_str(&format!("      Address: {}\n", address));
                }
                s.push_str(&format!(
                    "      Demand: {} units, distance: {} km, delivery cost: ${:.2}\n",
                    stop.demand, stop.distance, stop.delivery_cost
                ));
            }
            s.push_str(&format!("  Route cost: ${:.2}\n", route.route_cost));
        }

        if plan.hub_links.is_empty() {
            s.push_str("\nInter-hub links: none\n");
        } else {
            s.push_str("\nInter-hub links:\n");
            for link in &plan.hub_links {
                s.push_str(&format!(
                    "  {} -> {}: {} km (cost ${:.2})\n",
                    link.from, link.to, link.distance, link.cost
                ));
            }
        }

        let b = &plan.cost_breakdown;
        s.push_str("\nCost breakdown:\n");
        s.push_str(&format!("  Hub fixed: ${:.2}\n", b.hub_fixed));
        s.push_str(&format!("  Satellite fixed: ${:.2}\n", b.satellite_fixed));
        s.push_str(&format!("  Client-satellite: ${:.2}\n", b.client_satellite));
        s.push_str(&format!("  Satellite-hub: ${:.2}\n", b.satellite_hub));
        s.push_str(&format!("  Hub-hub: ${:.2}\n", b.hub_hub));
        if plan.objective_mismatch {
            s.push_str(&format!(
                "  [WARN] recomputed cost ${:.2} differs from solver objective\n",
                plan.recomputed_cost
            ));
        }
        for issue in &plan.audit_issues {
            s.push_str(&format!("  [WARN] {}\n", issue));
        }

        s.push_str(&format!("\n{}\nTOTAL COST: ${:.2}\n{}\n", rule, plan.total_cost, rule));
        s
    }
}

impl fmt::Display for DesignReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Build the report for a solved design model.
///
/// Never fails. Capacity overloads, audit violations and objective mismatches
/// are logged and recorded in the report.
pub fn generate_report(
    instance: &Instance,
    design: &DesignModel,
    solution: &Solution,
    options: &ReportOptions,
) -> DesignReport {
    let audit = match audit_solution(instance, design, solution, options.assignment_threshold) {
        Some(audit) if solution.is_optimal() => audit,
        _ => {
            return DesignReport::NoOptimalSolution {
                status: solution.status(),
                message: solution.message.clone(),
            }
        }
    };
    let vars = &design.vars;
    let active = |var| solution.is_active(var, options.assignment_threshold);
    let name_of = |id: &str| instance.location(id).and_then(|loc| loc.name.clone());
    let address_of = |id: &str| instance.location(id).and_then(|loc| loc.address.clone());

    let active_hubs = vars
        .hub_vars()
        .iter()
        .filter(|(_, var)| active(*var))
        .map(|(hub, _)| ActiveHub {
            hub: hub.clone(),
            name: name_of(hub.as_str()),
            address: address_of(hub.as_str()),
            fixed_cost: instance.hub_fixed_cost(hub),
        })
        .collect();

    let sh_costs = instance.satellite_hub_costs();
    let satellite_links: Vec<SatelliteLink> = vars
        .satellite_hub_vars()
        .iter()
        .filter(|p| active(p.var))
        .map(|p| {
            let cost = sh_costs.cost(&p.from, &p.to).unwrap_or_default();
            SatelliteLink {
                satellite: p.from.clone(),
                hub: p.to.clone(),
                hub_name: name_of(p.to.as_str()),
                distance: cost,
                transport_cost: cost,
            }
        })
        .collect();

    let capacity = instance.vehicle_capacity();
    let cs_costs = instance.client_satellite_costs();
    let mut routes = Vec::new();
    for satellite in instance.satellites() {
        let stops: Vec<RouteStop> = vars
            .assignments_to(satellite)
            .filter(|p| active(p.var))
            .map(|p| {
                let cost = cs_costs.cost(&p.from, &p.to).unwrap_or_default();
                RouteStop {
                    client: p.from.clone(),
                    name: name_of(p.from.as_str()),
                    address: address_of(p.from.as_str()),
                    demand: instance.demand(&p.from).unwrap_or_default(),
                    distance: cost,
                    delivery_cost: cost,
                }
            })
            .collect();
        if stops.is_empty() {
            continue;
        }

        let total_demand: f64 = stops.iter().map(|s| s.demand).sum();
        let capacity_warning = (total_demand > capacity).then(|| CapacityWarning {
            overload: total_demand - capacity,
            trips_needed: (total_demand / capacity).ceil() as u32,
        });
        if let Some(warning) = &capacity_warning {
            warn!(
                satellite = %satellite,
                demand = total_demand,
                capacity,
                trips = warning.trips_needed,
                "route demand exceeds vehicle capacity"
            );
        }

        routes.push(SatelliteRoute {
            satellite: satellite.clone(),
            hubs: satellite_links
                .iter()
                .filter(|l| &l.satellite == satellite)
                .map(|l| l.hub.clone())
                .collect(),
            route_cost: stops.iter().map(|s| s.delivery_cost).sum(),
            stops,
            total_demand,
            capacity,
            capacity_warning,
        });
    }

    let hh_costs = instance.hub_hub_costs();
    let hub_links = audit
        .active_hub_links
        .iter()
        .map(|(from, to)| {
            let cost = hh_costs.cost(from, to).unwrap_or_default();
            HubLink {
                from: from.clone(),
                to: to.clone(),
                distance: cost,
                cost,
            }
        })
        .collect();

    let objective_mismatch = !audit.objective_matches(options.objective_tolerance);
    if objective_mismatch {
        warn!(
            solver = audit.reported_objective,
            recomputed = audit.recomputed_objective,
            gap = audit.relative_gap(),
            "objective differs from recomputed cost"
        );
    }
    let audit_issues = audit.structural_violations();
    for issue in &audit_issues {
        warn!(issue = %issue, "solution audit");
    }

    DesignReport::Optimal(NetworkPlan {
        instance: instance.name().map(str::to_string),
        backend: solution.backend.to_string(),
        active_hubs,
        satellite_links,
        routes,
        hub_links,
        cost_breakdown: audit.breakdown,
        total_cost: audit.reported_objective,
        recomputed_cost: audit.recomputed_objective,
        objective_mismatch,
        audit_issues,
    })
}
