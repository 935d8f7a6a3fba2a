// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use hardware::cpu::CpuId;
use hardware::numa::{NumaCpu, NumaNodeId};
use ordermap::OrderMap;

/// The logical CPUs of each NUMA node, aggregated from the core records.
///
/// Nodes are kept in the order they are first seen.  The smallest logical CPU
/// of a node designates its host core.
#[derive(Debug)]
pub(crate) struct NodeThreads<'a> {
    cpus: &'a [NumaCpu],
    threads: OrderMap<NumaNodeId, Vec<CpuId>>,
}

impl<'a> NodeThreads<'a> {
    pub(crate) fn new(cpus: &'a [NumaCpu]) -> Self {
        let mut threads: OrderMap<NumaNodeId, Vec<CpuId>> = OrderMap::new();
        for cpu in cpus {
            threads
                .entry(cpu.numa_node)
                .or_default()
                .extend(&cpu.thread_siblings);
        }
        Self { cpus, threads }
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = NumaNodeId> + '_ {
        self.threads.keys().copied()
    }

    /// The smallest logical CPU of `node`, `None` if the node has no CPU.
    pub(crate) fn host_thread(&self, node: NumaNodeId) -> Option<CpuId> {
        self.threads.get(&node)?.iter().min().copied()
    }

    /// The cores of `node`, in introspection order.
    pub(crate) fn cores(&self, node: NumaNodeId) -> impl Iterator<Item = &'a NumaCpu> + use<'a> {
        self.cpus.iter().filter(move |cpu| cpu.numa_node == node)
    }
}
