// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! DPDK PMD core list.

use std::fmt::{Display, Formatter};

use hardware::cpu::CpuList;
use hardware::numa::{NumaCpu, NumaNodeId};
use tracing::{debug, warn};

use crate::errors::{DeriveError, NUMA_TOPOLOGY_CPUS};
use crate::topology::NodeThreads;

/// A NUMA node which could not get all the physical cores requested for it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CoreShortfall {
    pub numa_node: NumaNodeId,
    pub requested: usize,
    pub allocated: usize,
}

/// The logical CPUs selected for DPDK PMD threads.
///
/// Allocation is best effort: when a NUMA node has fewer non-host cores than
/// requested, all of them are used and the node is reported in
/// [`DpdkCoreList::shortfalls`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DpdkCoreList {
    cpus: CpuList,
    shortfalls: Vec<CoreShortfall>,
}

impl DpdkCoreList {
    #[must_use]
    pub fn cpus(&self) -> &CpuList {
        &self.cpus
    }

    /// Nodes which got fewer cores than requested.
    #[must_use]
    pub fn shortfalls(&self) -> &[CoreShortfall] {
        &self.shortfalls
    }

    /// True if every node got the number of cores requested for it.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shortfalls.is_empty()
    }

    #[must_use]
    pub fn into_cpus(self) -> CpuList {
        self.cpus
    }
}

impl Display for DpdkCoreList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cpus)
    }
}

/// Selects the logical CPUs to pin DPDK PMD threads on.
///
/// `cores_per_node[i]` is the number of physical cores wanted on NUMA node `i`.
/// For each node, whole cores (all their hyperthreads) are taken in
/// introspection order, skipping the host core: the core holding the smallest
/// logical CPU of the node.
///
/// # Errors
///
/// - [`DeriveError::MissingData`] if `numa_cpus` is empty,
/// - [`DeriveError::MissingRequirement`] if `cores_per_node` is empty.
pub fn dpdk_core_list(
    numa_cpus: &[NumaCpu],
    cores_per_node: &[usize],
) -> Result<DpdkCoreList, DeriveError> {
    if numa_cpus.is_empty() {
        return Err(DeriveError::MissingData(NUMA_TOPOLOGY_CPUS));
    }
    if cores_per_node.is_empty() {
        return Err(DeriveError::MissingRequirement(
            "CPU physical cores count for each NUMA nodes",
        ));
    }

    let threads = NodeThreads::new(numa_cpus);
    let mut list = DpdkCoreList::default();
    for (node, &requested) in (0..).map(NumaNodeId::new).zip(cores_per_node) {
        let mut allocated = 0;
        if let Some(host) = threads.host_thread(node) {
            for core in threads.cores(node) {
                if allocated == requested {
                    break;
                }
                if !core.has_thread(host) {
                    list.cpus.extend(&core.thread_siblings);
                    allocated += 1;
                }
            }
        }
        debug!("numa node {node}: {allocated} of {requested} dpdk cores allocated");
        if allocated < requested {
            warn!(
                "numa node {node}: only {allocated} physical cores for dpdk, {requested} requested"
            );
            list.shortfalls.push(CoreShortfall {
                numa_node: node,
                requested,
                allocated,
            });
        }
    }
    Ok(list)
}

#[cfg(test)]
mod test {
    use super::*;
    use hardware::cpu::CpuId;
    use hardware::numa::NumaCpusGenerator;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn cpu(node: u32, threads: &[u32]) -> NumaCpu {
        NumaCpu::new(
            NumaNodeId::new(node),
            threads.iter().copied().map(CpuId::new).collect(),
        )
    }

    /// Two nodes, two cores of two threads each.
    fn small_machine() -> Vec<NumaCpu> {
        vec![
            cpu(0, &[0, 4]),
            cpu(0, &[2, 6]),
            cpu(1, &[1, 5]),
            cpu(1, &[3, 7]),
        ]
    }

    #[test]
    fn one_core_per_node() {
        let list = dpdk_core_list(&small_machine(), &[1, 1]).unwrap();
        assert_eq!(list.to_string(), "2,6,3,7");
        assert!(list.is_complete());
    }

    #[test]
    fn host_core_is_found_anywhere_in_the_node() {
        let cpus = vec![
            cpu(0, &[2, 22]),
            cpu(0, &[0, 20]),
            cpu(0, &[3, 23]),
            cpu(0, &[4, 24]),
        ];
        let list = dpdk_core_list(&cpus, &[2]).unwrap();
        assert_eq!(list.to_string(), "2,22,3,23");
    }

    #[test]
    fn nodes_are_indexed_by_position() {
        let cpus = vec![
            cpu(1, &[1, 21]),
            cpu(1, &[3, 23]),
            cpu(1, &[5, 25]),
            cpu(0, &[0, 20]),
            cpu(0, &[2, 22]),
            cpu(0, &[4, 24]),
        ];
        let list = dpdk_core_list(&cpus, &[1, 2]).unwrap();
        assert_eq!(list.to_string(), "2,22,3,23,5,25");
    }

    #[test]
    fn zero_cores_requested() {
        let list = dpdk_core_list(&small_machine(), &[0, 1]).unwrap();
        assert_eq!(list.to_string(), "3,7");
        assert!(list.is_complete());
    }

    #[test]
    #[traced_test]
    fn shortfall_is_reported() {
        let list = dpdk_core_list(&small_machine(), &[3, 1, 2]).unwrap();
        assert_eq!(list.to_string(), "2,6,3,7");
        assert_eq!(
            list.shortfalls(),
            &[
                CoreShortfall {
                    numa_node: NumaNodeId::new(0),
                    requested: 3,
                    allocated: 1,
                },
                CoreShortfall {
                    numa_node: NumaNodeId::new(2),
                    requested: 2,
                    allocated: 0,
                },
            ]
        );
        assert!(logs_contain("only 1 physical cores for dpdk, 3 requested"));
    }

    #[test]
    fn missing_inputs() {
        assert_eq!(
            dpdk_core_list(&[], &[1]),
            Err(DeriveError::MissingData(NUMA_TOPOLOGY_CPUS))
        );
        assert!(matches!(
            dpdk_core_list(&small_machine(), &[]),
            Err(DeriveError::MissingRequirement(_))
        ));
    }

    #[test]
    fn host_cores_are_never_selected() {
        bolero::check!()
            .with_generator(NumaCpusGenerator::default())
            .for_each(|cpus: &Vec<NumaCpu>| {
                let threads = NodeThreads::new(cpus);
                let nodes: Vec<_> = threads.nodes().collect();
                let requested = vec![usize::MAX; nodes.len()];
                let list = dpdk_core_list(cpus, &requested).unwrap();
                for node in nodes {
                    let host = threads.host_thread(node).unwrap();
                    assert!(!list.cpus().contains(host));
                }
                // every non-host core is used exactly once
                let non_host_threads: usize = cpus
                    .iter()
                    .filter(|core| {
                        !core.has_thread(threads.host_thread(core.numa_node).unwrap())
                    })
                    .map(|core| core.thread_siblings.len())
                    .sum();
                assert_eq!(list.cpus().len(), non_host_threads);
            });
    }

    #[test]
    fn idempotent() {
        let cpus = small_machine();
        assert_eq!(dpdk_core_list(&cpus, &[1, 1]), dpdk_core_list(&cpus, &[1, 1]));
    }
}
