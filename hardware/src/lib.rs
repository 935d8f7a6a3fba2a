// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Model of the hardware introspection document of a compute node.
//!
//! The introspection document is produced elsewhere (by the node inspector) and
//! describes the network interfaces of the node and the NUMA placement of its
//! CPUs and NICs.  This crate only models that document and the few orderings
//! derived directly from it; it never scans the running machine.

#![deny(clippy::pedantic, clippy::unwrap_used)]

pub mod cpu;
pub mod inspect;
pub mod nic;
pub mod numa;
#[cfg(any(test, feature = "serde"))]
mod serdefix;

pub use inspect::InspectData;
