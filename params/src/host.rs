// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Logical CPUs reserved for host processes.

use hardware::cpu::CpuList;
use hardware::numa::NumaCpu;
use tracing::debug;

use crate::errors::{DeriveError, NUMA_TOPOLOGY_CPUS};
use crate::topology::NodeThreads;

/// Selects the host core of every NUMA node.
///
/// The host core of a node is its first core holding the node's smallest
/// logical CPU; all of its hyperthreads are reserved for host processes.
/// Nodes are listed in the order they first appear in `numa_cpus`.
///
/// # Errors
///
/// [`DeriveError::MissingData`] if `numa_cpus` is empty.
pub fn host_cpus_list(numa_cpus: &[NumaCpu]) -> Result<CpuList, DeriveError> {
    if numa_cpus.is_empty() {
        return Err(DeriveError::MissingData(NUMA_TOPOLOGY_CPUS));
    }
    let threads = NodeThreads::new(numa_cpus);
    let mut list = CpuList::default();
    for node in threads.nodes() {
        let Some(host) = threads.host_thread(node) else {
            continue;
        };
        if let Some(core) = threads.cores(node).find(|core| core.has_thread(host)) {
            debug!("numa node {node}: host core {:?}", core.thread_siblings);
            list.extend(&core.thread_siblings);
        }
    }
    Ok(list)
}
