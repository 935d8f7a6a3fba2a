// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Discovery of the interfaces bound to DPDK in a network configuration.

use tracing::debug;

use crate::mtu::Mtu;
use crate::node::{InterfaceRef, NetworkConfigNode, NodeKind};

/// The DPDK interfaces of one OVS user bridge and the MTU they run with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DpdkMembers<'a> {
    pub bridge: Option<&'a str>,
    pub interfaces: Vec<&'a InterfaceRef>,
    pub mtu: Mtu,
}

/// The MTU in effect while walking the members of a bridge.
///
/// Every direct member of the bridge sets it: to its own `mtu`, or back to the
/// default when it has none.  The value left after the last member applies to
/// all DPDK interfaces of the bridge.
#[derive(Debug)]
struct MtuAccumulator {
    default: Mtu,
    current: Mtu,
}

impl MtuAccumulator {
    fn new(default: Mtu) -> Self {
        Self {
            default,
            current: default,
        }
    }

    fn observe(&mut self, mtu: Option<Mtu>) {
        self.current = mtu.unwrap_or(self.default);
    }

    fn current(&self) -> Mtu {
        self.current
    }
}

impl NetworkConfigNode {
    /// Collects the DPDK interfaces of an `ovs_user_bridge`.
    ///
    /// Returns `None` if the node is not an OVS user bridge.  Interfaces are
    /// listed in document order: members of DPDK ports, and members of the
    /// DPDK ports of (possibly nested) DPDK bonds.
    #[must_use]
    pub fn dpdk_members(&self, mtu_default: Mtu) -> Option<DpdkMembers<'_>> {
        let NodeKind::OvsUserBridge(members) = &self.kind else {
            return None;
        };
        let mut mtu = MtuAccumulator::new(mtu_default);
        let mut interfaces = Vec::new();
        for member in members {
            mtu.observe(member.mtu);
            member.collect_dpdk_interfaces(&mut interfaces);
        }
        let members = DpdkMembers {
            bridge: self.name.as_deref(),
            interfaces,
            mtu: mtu.current(),
        };
        debug!(
            "bridge {}: dpdk interfaces {:?}, mtu {}",
            members.bridge.unwrap_or("<unnamed>"),
            members
                .interfaces
                .iter()
                .map(|iface| iface.name.as_str())
                .collect::<Vec<_>>(),
            members.mtu
        );
        Some(members)
    }

    fn collect_dpdk_interfaces<'a>(&'a self, out: &mut Vec<&'a InterfaceRef>) {
        match &self.kind {
            NodeKind::OvsDpdkPort(interfaces) => out.extend(interfaces),
            NodeKind::OvsDpdkBond(members) => {
                for member in members {
                    member.collect_dpdk_interfaces(out);
                }
            }
            NodeKind::OvsUserBridge(_) | NodeKind::Other(_) => {}
        }
    }
}

/// Collects the DPDK interfaces of every OVS user bridge of a configuration.
pub fn dpdk_bridges(
    nodes: &[NetworkConfigNode],
    mtu_default: Mtu,
) -> impl Iterator<Item = DpdkMembers<'_>> {
    nodes
        .iter()
        .filter_map(move |node| node.dpdk_members(mtu_default))
}
