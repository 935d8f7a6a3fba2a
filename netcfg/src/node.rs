// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Network configuration objects.

use std::str::FromStr;

use serde::Deserialize;

use crate::mtu::Mtu;

/// A reference to an interface: either a physical name or a logical `nic<N>`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct InterfaceRef {
    pub name: String,
}

impl InterfaceRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The object types DPDK tuning cares about.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, strum::EnumString, strum::IntoStaticStr, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum NodeType {
    OvsUserBridge,
    OvsDpdkPort,
    OvsDpdkBond,
}

/// The type specific part of a [`NetworkConfigNode`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeKind {
    /// `ovs_user_bridge`: an OVS bridge in the DPDK datapath.
    OvsUserBridge(Vec<NetworkConfigNode>),
    /// `ovs_dpdk_port`: a DPDK port and the interfaces bound to it.
    OvsDpdkPort(Vec<InterfaceRef>),
    /// `ovs_dpdk_bond`: a bond of DPDK ports.
    OvsDpdkBond(Vec<NetworkConfigNode>),
    /// Any other object, with its raw type (empty if the object has none).
    Other(String),
}

/// One object of the network configuration.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(from = "RawNode")]
pub struct NetworkConfigNode {
    pub name: Option<String>,
    pub mtu: Option<Mtu>,
    pub kind: NodeKind,
}

impl NetworkConfigNode {
    #[must_use]
    pub fn new(name: Option<String>, mtu: Option<Mtu>, kind: NodeKind) -> Self {
        Self { name, mtu, kind }
    }

    #[must_use]
    pub fn ovs_user_bridge(name: &str, mtu: Option<Mtu>, members: Vec<NetworkConfigNode>) -> Self {
        Self::new(Some(name.to_string()), mtu, NodeKind::OvsUserBridge(members))
    }

    #[must_use]
    pub fn ovs_dpdk_port(name: &str, mtu: Option<Mtu>, interfaces: &[&str]) -> Self {
        let interfaces = interfaces.iter().copied().map(InterfaceRef::new).collect();
        Self::new(Some(name.to_string()), mtu, NodeKind::OvsDpdkPort(interfaces))
    }

    #[must_use]
    pub fn ovs_dpdk_bond(name: &str, mtu: Option<Mtu>, members: Vec<NetworkConfigNode>) -> Self {
        Self::new(Some(name.to_string()), mtu, NodeKind::OvsDpdkBond(members))
    }

    /// Returns the [`NodeType`] of the node, `None` for other objects.
    #[must_use]
    pub fn node_type(&self) -> Option<NodeType> {
        match self.kind {
            NodeKind::OvsUserBridge(_) => Some(NodeType::OvsUserBridge),
            NodeKind::OvsDpdkPort(_) => Some(NodeType::OvsDpdkPort),
            NodeKind::OvsDpdkBond(_) => Some(NodeType::OvsDpdkBond),
            NodeKind::Other(_) => None,
        }
    }
}

/// The untyped shape of a configuration object, before its `type` is looked at.
#[derive(Deserialize)]
struct RawNode {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mtu: Option<Mtu>,
    #[serde(default)]
    members: Vec<RawNode>,
}

impl From<RawNode> for NetworkConfigNode {
    fn from(raw: RawNode) -> Self {
        let kind = raw.kind.unwrap_or_default();
        let kind = match NodeType::from_str(&kind) {
            Ok(NodeType::OvsUserBridge) => {
                NodeKind::OvsUserBridge(raw.members.into_iter().map(Self::from).collect())
            }
            Ok(NodeType::OvsDpdkPort) => NodeKind::OvsDpdkPort(
                raw.members
                    .into_iter()
                    .map(|member| InterfaceRef::new(member.name.unwrap_or_default()))
                    .collect(),
            ),
            Ok(NodeType::OvsDpdkBond) => {
                NodeKind::OvsDpdkBond(raw.members.into_iter().map(Self::from).collect())
            }
            Err(_) => NodeKind::Other(kind),
        };
        Self {
            name: raw.name,
            mtu: raw.mtu,
            kind,
        }
    }
}

/// A network configuration document.
///
/// The document is either the bare list of objects, or a mapping holding the
/// list under `network_config` (the layout of os-net-config files).
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NetworkConfig {
    Nodes(Vec<NetworkConfigNode>),
    Document {
        network_config: Vec<NetworkConfigNode>,
    },
}

impl NetworkConfig {
    #[must_use]
    pub fn nodes(&self) -> &[NetworkConfigNode] {
        match self {
            NetworkConfig::Nodes(nodes) | NetworkConfig::Document { network_config: nodes } => {
                nodes
            }
        }
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<NetworkConfigNode> {
        match self {
            NetworkConfig::Nodes(nodes) | NetworkConfig::Document { network_config: nodes } => {
                nodes
            }
        }
    }
}
