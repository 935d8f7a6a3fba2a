// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Derivation of deployment-time tuning parameters of NFV compute nodes.
//!
//! Four independent calculators work over the introspection document of a
//! node and its network configuration:
//!
//! - [`dpdk_nics_numa_info`]: which physical NICs are bound to DPDK, their NUMA
//!   node and MTU,
//! - [`dpdk_core_list`]: the logical CPUs to pin DPDK PMD threads on,
//! - [`host_cpus_list`]: the logical CPUs reserved for host processes,
//! - [`dpdk_socket_memory`]: the DPDK socket memory of each NUMA node.
//!
//! All of them are pure functions of their inputs.  Failures are returned as
//! [`DeriveError`] values, never raised.

#![deny(clippy::pedantic, clippy::unwrap_used)]

pub mod cores;
pub mod errors;
pub mod host;
pub mod memory;
pub mod nics;
mod topology;

pub use cores::{CoreShortfall, DpdkCoreList, dpdk_core_list};
pub use errors::DeriveError;
pub use host::host_cpus_list;
pub use memory::{
    SocketMemoryList, SocketMemoryParams, SocketMemoryParamsBuilder, dpdk_socket_memory,
};
pub use nics::{DpdkNicNumaInfo, dpdk_nics_numa_info};
