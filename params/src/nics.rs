// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Physical NICs bound to DPDK and their NUMA placement.

use std::fmt::{Display, Formatter};

use hardware::InspectData;
use hardware::nic::{ordered_active_nics, physical_name};
use hardware::numa::NumaNodeId;
use netcfg::{Mtu, NetworkConfigNode, dpdk_bridges};
use tracing::debug;

use crate::errors::{DeriveError, INVENTORY_INTERFACES, NUMA_TOPOLOGY_NICS};

/// A physical NIC used by DPDK.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DpdkNicNumaInfo {
    /// Physical interface name.
    pub name: String,
    pub numa_node: NumaNodeId,
    pub mtu: Mtu,
}

impl DpdkNicNumaInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, numa_node: NumaNodeId, mtu: Mtu) -> Self {
        Self {
            name: name.into(),
            numa_node,
            mtu,
        }
    }
}

/// Formats as `<name> <numa node> <mtu>`.
impl Display for DpdkNicNumaInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.name, self.numa_node, self.mtu)
    }
}

/// Finds the physical NICs of the DPDK datapath, their NUMA node and MTU.
///
/// DPDK interfaces are taken from the OVS user bridges of `network_configs`.
/// Logical `nic<N>` references are translated with the ordering of the active
/// interfaces of `inspect_data`, and the NUMA node of each physical NIC is
/// looked up in its `numa_topology.nics`.  Records are returned in the order
/// the interfaces appear in the configuration.
///
/// # Errors
///
/// - [`DeriveError::MissingData`] if `inventory.interfaces` or
///   `numa_topology.nics` is missing or empty,
/// - [`DeriveError::NoActiveInterfaces`] if no interface has a carrier,
/// - [`DeriveError::UnresolvedNumaNode`] if a DPDK NIC has no known NUMA node.
pub fn dpdk_nics_numa_info(
    network_configs: &[NetworkConfigNode],
    inspect_data: &InspectData,
    mtu_default: Mtu,
) -> Result<Vec<DpdkNicNumaInfo>, DeriveError> {
    let interfaces = inspect_data.interfaces();
    if interfaces.is_empty() {
        return Err(DeriveError::MissingData(INVENTORY_INTERFACES));
    }
    let Some(topology) = inspect_data
        .numa_topology
        .as_ref()
        .filter(|topology| !topology.nics.is_empty())
    else {
        return Err(DeriveError::MissingData(NUMA_TOPOLOGY_NICS));
    };
    let ordering = ordered_active_nics(interfaces);
    if ordering.is_empty() {
        return Err(DeriveError::NoActiveInterfaces);
    }

    let mut nics = Vec::new();
    for bridge in dpdk_bridges(network_configs, mtu_default) {
        for iface in &bridge.interfaces {
            let name = physical_name(&iface.name, &ordering);
            let Some(numa_node) = topology.nic_numa_node(&name) else {
                return Err(DeriveError::UnresolvedNumaNode(name));
            };
            debug!(
                "dpdk nic {} ({name}): numa node {numa_node}, mtu {}",
                iface.name, bridge.mtu
            );
            nics.push(DpdkNicNumaInfo {
                name,
                numa_node,
                mtu: bridge.mtu,
            });
        }
    }
    Ok(nics)
}

#[cfg(test)]
mod test {
    use super::*;
    use hardware::inspect::Inventory;
    use hardware::nic::Interface;
    use hardware::numa::{NumaNic, NumaTopology};
    use netcfg::NetworkConfig;
    use pretty_assertions::assert_eq;

    const INSPECT_DATA: &str = r#"
{
  "inventory": {
    "interfaces": [
      {"name": "ens802f1", "has_carrier": true},
      {"name": "ens802f0", "has_carrier": true},
      {"name": "eno1", "has_carrier": true},
      {"name": "eno2", "has_carrier": false},
      {"name": "ens801f0", "has_carrier": true},
      {"name": "ens801f1", "has_carrier": true}
    ]
  },
  "numa_topology": {
    "nics": [
      {"name": "eno1", "numa_node": 0},
      {"name": "eno2", "numa_node": 0},
      {"name": "ens801f0", "numa_node": 1},
      {"name": "ens801f1", "numa_node": 1},
      {"name": "ens802f0", "numa_node": 1},
      {"name": "ens802f1", "numa_node": 1}
    ]
  }
}
"#;

    const NETWORK_CONFIG: &str = r"
- type: interface
  name: nic1
  use_dhcp: false
- type: ovs_user_bridge
  name: br-link0
  use_dhcp: false
  members:
    - type: ovs_dpdk_bond
      name: dpdkbond0
      mtu: 9000
      members:
        - type: ovs_dpdk_port
          name: dpdk0
          members:
            - type: interface
              name: nic2
        - type: ovs_dpdk_port
          name: dpdk1
          members:
            - type: interface
              name: nic3
- type: ovs_user_bridge
  name: br-link1
  members:
    - type: ovs_dpdk_port
      name: dpdk2
      members:
        - type: interface
          name: ens802f1
";

    fn inspect_data() -> InspectData {
        serde_yaml_ng::from_str(INSPECT_DATA).unwrap()
    }

    fn network_config() -> Vec<NetworkConfigNode> {
        serde_yaml_ng::from_str::<NetworkConfig>(NETWORK_CONFIG)
            .unwrap()
            .into_nodes()
    }

    #[test]
    fn dpdk_nics_are_resolved() {
        let nics = dpdk_nics_numa_info(&network_config(), &inspect_data(), Mtu::DEFAULT).unwrap();
        assert_eq!(
            nics,
            vec![
                DpdkNicNumaInfo::new("ens801f0", NumaNodeId::new(1), Mtu::new(9000)),
                DpdkNicNumaInfo::new("ens801f1", NumaNodeId::new(1), Mtu::new(9000)),
                DpdkNicNumaInfo::new("ens802f1", NumaNodeId::new(1), Mtu::DEFAULT),
            ]
        );
    }

    #[test]
    fn text_form() {
        let nic = DpdkNicNumaInfo::new("ens801f0", NumaNodeId::new(1), Mtu::new(9000));
        assert_eq!(nic.to_string(), "ens801f0 1 9000");
    }

    #[test]
    fn default_mtu_is_configurable() {
        let nics = dpdk_nics_numa_info(&network_config(), &inspect_data(), Mtu::new(1600)).unwrap();
        assert_eq!(nics[2].mtu, Mtu::new(1600));
    }

    #[test]
    fn missing_interfaces() {
        let mut data = inspect_data();
        data.inventory = None;
        assert_eq!(
            dpdk_nics_numa_info(&network_config(), &data, Mtu::DEFAULT),
            Err(DeriveError::MissingData(INVENTORY_INTERFACES))
        );
        data.inventory = Some(Inventory::default());
        assert_eq!(
            dpdk_nics_numa_info(&network_config(), &data, Mtu::DEFAULT),
            Err(DeriveError::MissingData(INVENTORY_INTERFACES))
        );
    }

    #[test]
    fn missing_numa_nics() {
        let mut data = inspect_data();
        data.numa_topology = None;
        assert_eq!(
            dpdk_nics_numa_info(&network_config(), &data, Mtu::DEFAULT),
            Err(DeriveError::MissingData(NUMA_TOPOLOGY_NICS))
        );
        data.numa_topology = Some(NumaTopology::default());
        assert_eq!(
            dpdk_nics_numa_info(&network_config(), &data, Mtu::DEFAULT),
            Err(DeriveError::MissingData(NUMA_TOPOLOGY_NICS))
        );
    }

    #[test]
    fn null_sections_are_missing() {
        let data: InspectData = serde_yaml_ng::from_str(
            r#"
{
  "inventory": {"interfaces": [{"name": "eno1", "has_carrier": true}]},
  "numa_topology": {
    "nics": null,
    "cpus": [
      {"numa_node": 0, "thread_siblings": [0, 2]},
      {"numa_node": 0, "thread_siblings": [1, 3]}
    ]
  }
}
"#,
        )
        .unwrap();
        assert_eq!(
            dpdk_nics_numa_info(&network_config(), &data, Mtu::DEFAULT),
            Err(DeriveError::MissingData(NUMA_TOPOLOGY_NICS))
        );
        assert_eq!(
            crate::host_cpus_list(data.numa_cpus()).map(|list| list.to_string()),
            Ok("0,2".to_string())
        );

        let data: InspectData =
            serde_yaml_ng::from_str(r#"{"inventory": {"interfaces": null}}"#).unwrap();
        assert_eq!(
            dpdk_nics_numa_info(&network_config(), &data, Mtu::DEFAULT),
            Err(DeriveError::MissingData(INVENTORY_INTERFACES))
        );
    }

    #[test]
    fn no_active_interfaces() {
        let mut data = inspect_data();
        data.inventory = Some(Inventory {
            interfaces: vec![Interface::new("eno1", false), Interface::new("eno2", false)],
        });
        assert_eq!(
            dpdk_nics_numa_info(&network_config(), &data, Mtu::DEFAULT),
            Err(DeriveError::NoActiveInterfaces)
        );
    }

    #[test]
    fn unknown_numa_node() {
        let config = vec![NetworkConfigNode::ovs_user_bridge(
            "br-link",
            None,
            vec![NetworkConfigNode::ovs_dpdk_port("dpdk0", None, &["p7p1"])],
        )];
        assert_eq!(
            dpdk_nics_numa_info(&config, &inspect_data(), Mtu::DEFAULT),
            Err(DeriveError::UnresolvedNumaNode("p7p1".to_string()))
        );
    }

    #[test]
    fn numa_node_zero_is_resolved() {
        let data = InspectData::new(
            Some(Inventory {
                interfaces: vec![
                    Interface::new("eth0", true),
                    Interface::new("eth1", true),
                    Interface::new("em1", true),
                ],
            }),
            Some(NumaTopology {
                nics: vec![
                    NumaNic::new("em1", NumaNodeId::new(0)),
                    NumaNic::new("eth0", NumaNodeId::new(0)),
                    NumaNic::new("eth1", NumaNodeId::new(1)),
                ],
                cpus: vec![],
            }),
        );
        let config = vec![NetworkConfigNode::ovs_user_bridge(
            "br-link",
            None,
            vec![NetworkConfigNode::ovs_dpdk_port("dpdk0", None, &["nic1"])],
        )];
        // nic1 is em1: embedded names are ordered naturally, em before eth
        assert_eq!(
            dpdk_nics_numa_info(&config, &data, Mtu::DEFAULT),
            Ok(vec![DpdkNicNumaInfo::new("em1", NumaNodeId::new(0), Mtu::DEFAULT)])
        );
    }

    #[test]
    fn no_bridge_means_no_dpdk_nic() {
        let config = vec![NetworkConfigNode::ovs_dpdk_port("dpdk0", None, &["nic2"])];
        assert_eq!(
            dpdk_nics_numa_info(&config, &inspect_data(), Mtu::DEFAULT),
            Ok(vec![])
        );
    }

    #[test]
    fn idempotent() {
        let (config, data) = (network_config(), inspect_data());
        assert_eq!(
            dpdk_nics_numa_info(&config, &data, Mtu::DEFAULT),
            dpdk_nics_numa_info(&config, &data, Mtu::DEFAULT)
        );
    }
}
