// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The reasons why tuning parameters can not be derived.

use thiserror::Error;

/// `inventory.interfaces` section of the introspection document
pub const INVENTORY_INTERFACES: &str = "inventory.interfaces";
/// `numa_topology.nics` section of the introspection document
pub const NUMA_TOPOLOGY_NICS: &str = "numa_topology.nics";
/// `numa_topology.cpus` section of the introspection document
pub const NUMA_TOPOLOGY_CPUS: &str = "numa_topology.cpus";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeriveError {
    /// A required section of the introspection document is absent or empty.
    #[error("Introspection data does not have {0}")]
    MissingData(&'static str),
    #[error("Unable to determine active interfaces (has_carrier)")]
    NoActiveInterfaces,
    #[error("Unable to determine NUMA node for DPDK NIC: {0}")]
    UnresolvedNumaNode(String),
    /// A required parameter is absent or empty.
    #[error("{0} is not available")]
    MissingRequirement(&'static str),
}
