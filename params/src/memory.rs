// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! DPDK socket memory.
//!
//! A NUMA node with DPDK NICs needs enough hugepage memory for the packet
//! buffers of each distinct MTU in use on the node, plus a fixed margin.  A
//! node without DPDK NIC still gets a minimum amount.  Amounts are expressed
//! in MB and rounded up to a whole number of GB.

use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use hardware::numa::NumaNodeId;
use netcfg::Mtu;
use tracing::debug;

use crate::nics::DpdkNicNumaInfo;

const MB: f64 = 1024.0 * 1024.0;
const GB_IN_MB: f64 = 1024.0;
/// Memory added on top of the packet buffers of a DPDK node, in MB.
const SOCKET_MEMORY_MARGIN_MB: f64 = 500.0;

/// Inputs of the socket memory calculation.
///
/// ```
/// # use nfv_tuning_params::SocketMemoryParamsBuilder;
/// let params = SocketMemoryParamsBuilder::default()
///     .overhead(800)
///     .packet_size_in_buffer(4096 * 64)
///     .build()
///     .unwrap();
/// assert_eq!(params.minimum_socket_memory, 1024);
/// ```
#[derive(Builder, Clone, Copy, Debug, Eq, PartialEq)]
pub struct SocketMemoryParams {
    /// Bytes of overhead added to the MTU of each packet buffer.
    pub overhead: u32,
    /// Packet buffer factor applied to each distinct MTU (typically `4096 * 64`).
    pub packet_size_in_buffer: u32,
    /// Memory given to a node without DPDK NIC, in MB.
    #[builder(default = SocketMemoryParams::MINIMUM_SOCKET_MEMORY)]
    pub minimum_socket_memory: u32,
}

impl SocketMemoryParams {
    pub const MINIMUM_SOCKET_MEMORY: u32 = 1024;

    #[must_use]
    pub fn new(overhead: u32, packet_size_in_buffer: u32) -> Self {
        Self {
            overhead,
            packet_size_in_buffer,
            minimum_socket_memory: Self::MINIMUM_SOCKET_MEMORY,
        }
    }
}

/// Socket memory of each requested NUMA node, in MB.
///
/// Its textual form is the comma separated list of amounts (`"1024,2048"`).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SocketMemoryList(Vec<u64>);

impl SocketMemoryList {
    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

impl Display for SocketMemoryList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, mb) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{mb}")?;
        }
        Ok(())
    }
}

/// Rounds an amount of MB up to a whole number of GB, expressed in MB.
fn round_up_to_gb(memory: f64) -> u64 {
    let mut gb = (memory / GB_IN_MB).floor();
    if memory % GB_IN_MB > 0.0 {
        gb += 1.0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // memory is never negative
    {
        (gb * GB_IN_MB) as u64
    }
}

/// Computes the socket memory of one NUMA node, in MB.
fn node_socket_memory(
    node: NumaNodeId,
    nics: &[DpdkNicNumaInfo],
    params: &SocketMemoryParams,
) -> u64 {
    let mut mtus: Vec<Mtu> = Vec::new();
    let mut memory = 0.0;
    for nic in nics.iter().filter(|nic| nic.numa_node == node) {
        if mtus.contains(&nic.mtu) {
            continue;
        }
        mtus.push(nic.mtu);
        memory += (f64::from(nic.mtu.to_u32()) + f64::from(params.overhead))
            * f64::from(params.packet_size_in_buffer)
            / MB;
    }
    let memory = if memory > 0.0 {
        memory + SOCKET_MEMORY_MARGIN_MB
    } else {
        f64::from(params.minimum_socket_memory)
    };
    let rounded = round_up_to_gb(memory);
    debug!("numa node {node}: mtus {mtus:?}, socket memory {memory} MB, rounded to {rounded} MB");
    rounded
}

/// Computes the DPDK socket memory of each node of `numa_nodes`, in order.
///
/// Each distinct MTU among the DPDK NICs of a node contributes
/// `(mtu + overhead) * packet_size_in_buffer` bytes; a 500 MB margin is added
/// to nodes with DPDK NICs, while nodes without get `minimum_socket_memory`.
/// Every amount is rounded up to a whole GB.
#[must_use]
pub fn dpdk_socket_memory(
    nic_numa_info: &[DpdkNicNumaInfo],
    numa_nodes: &[NumaNodeId],
    params: &SocketMemoryParams,
) -> SocketMemoryList {
    SocketMemoryList(
        numa_nodes
            .iter()
            .map(|&node| node_socket_memory(node, nic_numa_info, params))
            .collect(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const PACKET_SIZE_IN_BUFFER: u32 = 4096 * 64;

    fn nodes(ids: &[u32]) -> Vec<NumaNodeId> {
        ids.iter().copied().map(NumaNodeId::new).collect()
    }

    fn nic(name: &str, node: u32, mtu: u32) -> DpdkNicNumaInfo {
        DpdkNicNumaInfo::new(name, NumaNodeId::new(node), Mtu::new(mtu))
    }

    #[test]
    fn node_without_dpdk_nic_gets_the_minimum() {
        let params = SocketMemoryParams::new(0, PACKET_SIZE_IN_BUFFER);
        let nics = vec![nic("p1p1", 1, 1500)];
        let memory = dpdk_socket_memory(&nics, &nodes(&[0, 1]), &params);
        // node 1: 1500 * 4096 * 64 / 1MB = 375MB, + 500MB = 875MB -> 1GB
        assert_eq!(memory.as_slice(), &[1024, 1024]);
        assert_eq!(memory.to_string(), "1024,1024");
    }

    #[test]
    fn distinct_mtus_add_up() {
        let params = SocketMemoryParamsBuilder::default()
            .overhead(800)
            .packet_size_in_buffer(PACKET_SIZE_IN_BUFFER)
            .build()
            .unwrap();
        let nics = vec![
            nic("p1p1", 0, 9000),
            nic("p1p2", 0, 9000),
            nic("p2p1", 0, 1500),
            nic("p3p1", 1, 9000),
        ];
        let memory = dpdk_socket_memory(&nics, &nodes(&[0, 1]), &params);
        // node 0: (9800 + 2300) * 256KB = 3025MB, + 500MB -> 4GB
        // node 1: 9800 * 256KB = 2450MB, + 500MB -> 3GB
        assert_eq!(memory.to_string(), "4096,3072");
    }

    #[test]
    fn node_order_is_preserved() {
        let params = SocketMemoryParams::new(800, PACKET_SIZE_IN_BUFFER);
        let nics = vec![nic("p3p1", 1, 9000)];
        let memory = dpdk_socket_memory(&nics, &nodes(&[1, 0, 1]), &params);
        assert_eq!(memory.to_string(), "3072,1024,3072");
        assert!(dpdk_socket_memory(&nics, &[], &params).as_slice().is_empty());
    }

    #[test]
    fn rounding_to_gb() {
        assert_eq!(round_up_to_gb(0.5), 1024);
        assert_eq!(round_up_to_gb(1024.0), 1024);
        assert_eq!(round_up_to_gb(1025.0), 2048);
        assert_eq!(round_up_to_gb(2048.0), 2048);
        assert_eq!(round_up_to_gb(3024.4), 3072);
    }

    #[test]
    fn minimum_is_rounded_too() {
        let params = SocketMemoryParamsBuilder::default()
            .overhead(0)
            .packet_size_in_buffer(PACKET_SIZE_IN_BUFFER)
            .minimum_socket_memory(1025)
            .build()
            .unwrap();
        assert_eq!(dpdk_socket_memory(&[], &nodes(&[0]), &params).to_string(), "2048");
    }

    #[test]
    fn builder_requires_the_buffer_sizing() {
        assert!(SocketMemoryParamsBuilder::default().overhead(800).build().is_err());
    }

    #[test]
    fn idempotent() {
        let params = SocketMemoryParams::new(800, PACKET_SIZE_IN_BUFFER);
        let nics = vec![nic("p1p1", 0, 9000), nic("p2p1", 1, 1500)];
        let node_list = nodes(&[0, 1]);
        assert_eq!(
            dpdk_socket_memory(&nics, &node_list, &params),
            dpdk_socket_memory(&nics, &node_list, &params)
        );
    }
}
