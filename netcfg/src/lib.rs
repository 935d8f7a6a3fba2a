// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Declarative network configuration (os-net-config layout) as far as DPDK
//! tuning is concerned.
//!
//! Only OVS user bridges, DPDK ports and DPDK bonds carry meaning here; every
//! other object of the configuration is kept as an opaque node so that the
//! MTU bookkeeping of bridge members stays faithful to the document.

#![deny(clippy::pedantic, clippy::unwrap_used)]

pub mod dpdk;
pub mod mtu;
pub mod node;

pub use dpdk::{DpdkMembers, dpdk_bridges};
pub use mtu::Mtu;
pub use node::{InterfaceRef, NetworkConfig, NetworkConfigNode, NodeKind, NodeType};
