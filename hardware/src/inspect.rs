// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The introspection document.
//!
//! Only the sections needed to derive tuning parameters are modelled.  Every
//! other key of the document is ignored when deserializing.

use crate::nic::Interface;
use crate::numa::{NumaCpu, NumaNic, NumaTopology};

/// The `inventory` section of the introspection document.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Inventory {
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(deserialize_with = "crate::serdefix::null_as_default")
    )]
    pub interfaces: Vec<Interface>,
}

/// Hardware introspection data of one node.
///
/// Both sections are optional: a missing section is reported by the
/// calculators which need it, not when the document is read.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct InspectData {
    pub inventory: Option<Inventory>,
    pub numa_topology: Option<NumaTopology>,
}

impl InspectData {
    #[must_use]
    pub fn new(inventory: Option<Inventory>, numa_topology: Option<NumaTopology>) -> Self {
        Self {
            inventory,
            numa_topology,
        }
    }

    /// `inventory.interfaces`, empty if absent.
    #[must_use]
    pub fn interfaces(&self) -> &[Interface] {
        self.inventory
            .as_ref()
            .map(|inventory| inventory.interfaces.as_slice())
            .unwrap_or_default()
    }

    /// `numa_topology.nics`, empty if absent.
    #[must_use]
    pub fn numa_nics(&self) -> &[NumaNic] {
        self.numa_topology
            .as_ref()
            .map(|topology| topology.nics.as_slice())
            .unwrap_or_default()
    }

    /// `numa_topology.cpus`, empty if absent.
    #[must_use]
    pub fn numa_cpus(&self) -> &[NumaCpu] {
        self.numa_topology
            .as_ref()
            .map(|topology| topology.cpus.as_slice())
            .unwrap_or_default()
    }
}
