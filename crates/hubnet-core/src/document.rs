//! Instance document schema.
//!
//! This is the raw, unvalidated shape of an instance as it appears on disk
//! (JSON or YAML). Identifiers are plain strings here; [`crate::Instance`]
//! turns them into typed ids once every reference has been checked.
//!
//! ```text
//! {
//!   "hubs": ["H1", "H2"],
//!   "satellites": ["S1"],
//!   "clients": ["C1"],
//!   "demand": {"C1": 10},
//!   "vehicle_capacity": 30,
//!   "costs": {
//!     "hub": {"H1": 50, "H2": 60},
//!     "satellite": {"S1": 10},
//!     "client_satellite": [{"pair": ["C1", "S1"], "cost": 1.5}],
//!     "satellite_hub": [{"pair": ["S1", "H1"], "cost": 3.0}],
//!     "hub_hub": [{"pair": ["H1", "H2"], "cost": 5.0}]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level instance document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceDocument {
    /// Optional human-readable label for the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub hubs: Vec<String>,
    #[serde(default)]
    pub satellites: Vec<String>,
    #[serde(default)]
    pub clients: Vec<String>,
    /// Client -> demanded quantity
    #[serde(default)]
    pub demand: BTreeMap<String, f64>,
    pub vehicle_capacity: f64,
    #[serde(default)]
    pub costs: CostsDocument,
    /// Optional descriptive metadata per node id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locations: BTreeMap<String, NodeLocation>,
}

/// The five cost tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostsDocument {
    /// Hub -> fixed opening cost
    #[serde(default)]
    pub hub: BTreeMap<String, f64>,
    /// Satellite -> fixed cost
    #[serde(default)]
    pub satellite: BTreeMap<String, f64>,
    #[serde(default)]
    pub client_satellite: Vec<PairEntry>,
    #[serde(default)]
    pub satellite_hub: Vec<PairEntry>,
    #[serde(default)]
    pub hub_hub: Vec<PairEntry>,
}

/// One allowed pair of a pair table, encoded as a two-element key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairEntry {
    pub pair: [String; 2],
    pub cost: f64,
}

impl PairEntry {
    pub fn new(from: impl Into<String>, to: impl Into<String>, cost: f64) -> Self {
        Self {
            pair: [from.into(), to.into()],
            cost,
        }
    }

    pub fn from(&self) -> &str {
        &self.pair[0]
    }

    pub fn to(&self) -> &str {
        &self.pair[1]
    }

    /// "A->B" label used in diagnostics
    pub fn label(&self) -> String {
        format!("{}->{}", self.pair[0], self.pair[1])
    }
}

/// Descriptive metadata for a node; never read by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// (latitude, longitude)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<[f64; 2]>,
}
