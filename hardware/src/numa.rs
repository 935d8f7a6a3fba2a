// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! NUMA placement of CPUs and NICs as reported by introspection.

use std::fmt::{Display, Formatter};

use crate::cpu::CpuId;

#[allow(unused_imports)] // re-export
#[cfg(any(test, feature = "bolero"))]
pub use self::contract::*;

/// The id of a NUMA node.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[repr(transparent)]
pub struct NumaNodeId(u32);

impl NumaNodeId {
    /// Creates a new [`NumaNodeId`].
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for NumaNodeId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<NumaNodeId> for u32 {
    fn from(value: NumaNodeId) -> Self {
        value.0
    }
}

impl Display for NumaNodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One physical CPU core and the NUMA node it belongs to.
///
/// `thread_siblings` lists the logical CPUs (hyperthreads) of the core, in the
/// order reported by introspection.  A core always has at least one thread.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NumaCpu {
    pub numa_node: NumaNodeId,
    pub thread_siblings: Vec<CpuId>,
}

impl NumaCpu {
    /// Creates a new core record.
    #[must_use]
    pub fn new(numa_node: NumaNodeId, thread_siblings: Vec<CpuId>) -> Self {
        Self {
            numa_node,
            thread_siblings,
        }
    }

    /// Returns true if `cpu` is one of the hyperthreads of this core.
    #[must_use]
    pub fn has_thread(&self, cpu: CpuId) -> bool {
        self.thread_siblings.contains(&cpu)
    }
}

/// Association of a physical NIC with a NUMA node.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NumaNic {
    pub name: String,
    pub numa_node: NumaNodeId,
}

impl NumaNic {
    #[must_use]
    pub fn new(name: impl Into<String>, numa_node: NumaNodeId) -> Self {
        Self {
            name: name.into(),
            numa_node,
        }
    }
}

/// The `numa_topology` section of the introspection document.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct NumaTopology {
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(deserialize_with = "crate::serdefix::null_as_default")
    )]
    pub nics: Vec<NumaNic>,
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(deserialize_with = "crate::serdefix::null_as_default")
    )]
    pub cpus: Vec<NumaCpu>,
}

impl NumaTopology {
    /// Returns the NUMA node a physical NIC is attached to, if introspection knows it.
    #[must_use]
    pub fn nic_numa_node(&self, name: &str) -> Option<NumaNodeId> {
        self.nics
            .iter()
            .find(|nic| nic.name == name)
            .map(|nic| nic.numa_node)
    }

    /// Returns the distinct NUMA nodes of the topology.
    ///
    /// Nodes are listed in the order they are first seen among the CPU records,
    /// followed by nodes which only appear among the NIC records.
    #[must_use]
    pub fn numa_nodes(&self) -> Vec<NumaNodeId> {
        let mut nodes: Vec<NumaNodeId> = Vec::new();
        let seen = self
            .cpus
            .iter()
            .map(|cpu| cpu.numa_node)
            .chain(self.nics.iter().map(|nic| nic.numa_node));
        for node in seen {
            if !nodes.contains(&node) {
                nodes.push(node);
            }
        }
        nodes
    }
}

/// Generators of plausible NUMA topologies for property tests.
#[cfg(any(test, feature = "bolero"))]
mod contract {
    use bolero::{Driver, ValueGenerator};

    use crate::cpu::CpuId;
    use crate::numa::{NumaCpu, NumaNodeId};

    /// Generates the CPU records of a machine with hyperthreaded cores spread
    /// over a few NUMA nodes.
    ///
    /// Every thread id is unique across the machine and no core is empty.
    /// Cores of different nodes may be interleaved in the output, the way
    /// introspection lists them on some machines.
    #[derive(Debug, Clone, Copy)]
    pub struct NumaCpusGenerator {
        pub max_nodes: u8,
        pub max_cores_per_node: u8,
        pub max_threads_per_core: u8,
    }

    impl Default for NumaCpusGenerator {
        fn default() -> Self {
            Self {
                max_nodes: 4,
                max_cores_per_node: 12,
                max_threads_per_core: 4,
            }
        }
    }

    impl ValueGenerator for NumaCpusGenerator {
        type Output = Vec<NumaCpu>;

        fn generate<D: Driver>(&self, d: &mut D) -> Option<Self::Output> {
            let nodes = d.produce::<u8>()? % self.max_nodes.max(1) + 1;
            let threads_per_core = d.produce::<u8>()? % self.max_threads_per_core.max(1) + 1;
            let mut cpus = Vec::new();
            let mut next_id: u32 = 0;
            for node in 0..nodes {
                let cores = d.produce::<u8>()? % self.max_cores_per_node.max(1) + 1;
                for _ in 0..cores {
                    let siblings = (0..threads_per_core)
                        .map(|_| {
                            let id = CpuId::new(next_id);
                            next_id += 1;
                            id
                        })
                        .collect();
                    cpus.push(NumaCpu::new(NumaNodeId::new(u32::from(node)), siblings));
                }
            }
            // shuffle the records a little so that node order is not trivially sorted
            let rotation = usize::from(d.produce::<u8>()?) % cpus.len();
            cpus.rotate_left(rotation);
            Some(cpus)
        }
    }
}
