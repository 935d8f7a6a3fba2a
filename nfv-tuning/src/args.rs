// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

pub use clap::Parser;
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Comma separated lists, as consumed by deployment templates
    Text,
    /// YAML documents
    Yaml,
}

/// Documents describing the node.
#[derive(Debug, Clone, Args)]
pub struct NodeDocuments {
    /// Introspection data of the node (JSON or YAML)
    #[arg(long, value_name = "path")]
    pub inspect_data: PathBuf,
    /// Network configuration of the node (JSON or YAML)
    #[arg(long, value_name = "path")]
    pub network_config: PathBuf,
    /// MTU of DPDK NICs without explicit MTU
    #[arg(long, value_name = "bytes", default_value_t = 1500)]
    pub mtu_default: u32,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Physical NICs bound to DPDK, with their NUMA node and MTU
    NicsNumaInfo {
        #[command(flatten)]
        documents: NodeDocuments,
    },
    /// Logical CPUs for DPDK PMD threads
    CoreList {
        /// Introspection data of the node (JSON or YAML)
        #[arg(long, value_name = "path")]
        inspect_data: PathBuf,
        /// Physical cores wanted on each NUMA node, in node order
        #[arg(long, value_name = "count,...", value_delimiter = ',')]
        cores_per_node: Vec<usize>,
    },
    /// Logical CPUs reserved for host processes
    HostCpus {
        /// Introspection data of the node (JSON or YAML)
        #[arg(long, value_name = "path")]
        inspect_data: PathBuf,
    },
    /// DPDK socket memory of each NUMA node, in MB
    SocketMemory {
        #[command(flatten)]
        documents: NodeDocuments,
        /// NUMA nodes to compute memory for (default: every node of the topology)
        #[arg(long, value_name = "node,...", value_delimiter = ',')]
        numa_nodes: Vec<u32>,
        /// Bytes of overhead added to the MTU of each packet buffer
        #[arg(long, value_name = "bytes")]
        overhead: u32,
        /// Packet buffer factor applied to each distinct MTU
        #[arg(long, value_name = "factor")]
        packet_size_in_buffer: u32,
        /// Memory of NUMA nodes without DPDK NIC, in MB
        #[arg(long, value_name = "MB", default_value_t = 1024)]
        minimum_socket_memory: u32,
    },
}

#[derive(Debug, Parser)]
#[command(name = "nfv-tuning")]
#[command(version)]
#[command(
    about = "Derive DPDK and host CPU / memory tuning parameters of an NFV compute node",
    long_about = None
)]
pub struct CmdArgs {
    #[arg(long, global = true, value_name = "level", default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
    #[arg(long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

impl CmdArgs {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
    pub fn output(&self) -> OutputFormat {
        self.output
    }
    pub fn command(&self) -> &Command {
        &self.command
    }
}
