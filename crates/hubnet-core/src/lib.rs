//! # hubnet-core: Two-Echelon Network Instance Model
//!
//! Provides the immutable data model for two-echelon distribution network
//! design: the candidate hubs, the satellites that feed clients, the clients
//! themselves, and the sparse cost tables that say which connections exist.
//!
//! ## Design Philosophy
//!
//! The network is a three-tier hierarchy:
//!
//! ```text
//!   Hub ◄──── Satellite ◄──── Client
//!    ▲ │
//!    └─┘ hub-hub links
//! ```
//!
//! - **Nodes** are identified by opaque string keys, wrapped in one newtype per
//!   tier so a satellite can never be passed where a hub is expected.
//! - **Cost tables** are sparse: a pair that is absent from a table is a
//!   connection the model may not use at all, not an expensive one.
//! - **Instances** are validated once at construction and never mutated.
//!
//! ## Quick Start
//!
//! ```rust
//! use hubnet_core::*;
//!
//! let instance = InstanceBuilder::new(30.0)
//!     .hub("H1", 50.0)
//!     .satellite("S1", 10.0)
//!     .client("C1", 10.0)
//!     .client_satellite("C1", "S1", 1.5)
//!     .satellite_hub("S1", "H1", 3.0)
//!     .build()
//!     .expect("valid instance");
//!
//! assert_eq!(instance.clients().len(), 1);
//! assert!(instance.client_satellite_costs().is_allowed(&ClientId::new("C1"), &SatelliteId::new("S1")));
//! ```
//!
//! ## Modules
//!
//! - [`instance`] - The validated [`Instance`] and its builder
//! - [`costs`] - Sparse pair cost tables
//! - [`document`] - Serde schema of the instance document
//! - [`diagnostics`] - Validation issue collection
//! - [`error`] - Unified error type

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod costs;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod instance;

pub use costs::{FixedCosts, PairCost, PairCosts};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use document::{CostsDocument, InstanceDocument, NodeLocation, PairEntry};
pub use error::{HubnetError, HubnetResult, ValidationError};
pub use instance::{Instance, InstanceBuilder};

// Newtype wrappers for node identifiers, one per tier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HubId(String);
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SatelliteId(String);
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl HubId {
    #[inline]
    pub fn new(value: impl Into<String>) -> Self {
        HubId(value.into())
    }
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SatelliteId {
    #[inline]
    pub fn new(value: impl Into<String>) -> Self {
        SatelliteId(value.into())
    }
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ClientId {
    #[inline]
    pub fn new(value: impl Into<String>) -> Self {
        ClientId(value.into())
    }
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SatelliteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tier a node identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Hub,
    Satellite,
    Client,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Hub => "hub",
            Tier::Satellite => "satellite",
            Tier::Client => "client",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
