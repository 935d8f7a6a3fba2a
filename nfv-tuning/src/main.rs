// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all, clippy::pedantic)]
#![deny(rustdoc::all)]
#![allow(rustdoc::missing_crate_level_docs)]

mod args;
mod logging;

use std::path::{Path, PathBuf};

use crate::args::{CmdArgs, Command, NodeDocuments, OutputFormat, Parser};
use crate::logging::init_logging;

use hardware::InspectData;
use hardware::numa::NumaNodeId;
use netcfg::{Mtu, NetworkConfig};
use params::{DeriveError, DpdkNicNumaInfo, SocketMemoryParamsBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
    #[error(transparent)]
    Derive(#[from] DeriveError),
    #[error("invalid parameters: {0}")]
    Params(String),
    #[error("failed to render output: {0}")]
    Render(#[source] serde_yaml_ng::Error),
}

/// Reads a JSON or YAML document.
fn load<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    debug!("loading {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml_ng::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn render<T: Serialize + std::fmt::Display>(
    value: &T,
    output: OutputFormat,
) -> Result<String, CliError> {
    match output {
        OutputFormat::Text => Ok(value.to_string()),
        OutputFormat::Yaml => serde_yaml_ng::to_string(value).map_err(CliError::Render),
    }
}

fn nics_numa_info(
    documents: &NodeDocuments,
) -> Result<(InspectData, Vec<DpdkNicNumaInfo>), CliError> {
    let inspect_data: InspectData = load(&documents.inspect_data)?;
    let network_config: NetworkConfig = load(&documents.network_config)?;
    let nics = params::dpdk_nics_numa_info(
        network_config.nodes(),
        &inspect_data,
        Mtu::new(documents.mtu_default),
    )?;
    Ok((inspect_data, nics))
}

fn run(args: &CmdArgs) -> Result<String, CliError> {
    let output = args.output();
    match args.command() {
        Command::NicsNumaInfo { documents } => {
            let (_, nics) = nics_numa_info(documents)?;
            match output {
                OutputFormat::Text => Ok(nics
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")),
                OutputFormat::Yaml => serde_yaml_ng::to_string(&nics).map_err(CliError::Render),
            }
        }
        Command::CoreList {
            inspect_data,
            cores_per_node,
        } => {
            let inspect_data: InspectData = load(inspect_data)?;
            let list = params::dpdk_core_list(inspect_data.numa_cpus(), cores_per_node)?;
            render(list.cpus(), output)
        }
        Command::HostCpus { inspect_data } => {
            let inspect_data: InspectData = load(inspect_data)?;
            let list = params::host_cpus_list(inspect_data.numa_cpus())?;
            render(&list, output)
        }
        Command::SocketMemory {
            documents,
            numa_nodes,
            overhead,
            packet_size_in_buffer,
            minimum_socket_memory,
        } => {
            let (inspect_data, nics) = nics_numa_info(documents)?;
            let numa_nodes: Vec<NumaNodeId> = if numa_nodes.is_empty() {
                inspect_data
                    .numa_topology
                    .as_ref()
                    .map(hardware::numa::NumaTopology::numa_nodes)
                    .unwrap_or_default()
            } else {
                numa_nodes.iter().copied().map(NumaNodeId::new).collect()
            };
            let memory_params = SocketMemoryParamsBuilder::default()
                .overhead(*overhead)
                .packet_size_in_buffer(*packet_size_in_buffer)
                .minimum_socket_memory(*minimum_socket_memory)
                .build()
                .map_err(|e| CliError::Params(e.to_string()))?;
            let memory = params::dpdk_socket_memory(&nics, &numa_nodes, &memory_params);
            render(&memory, output)
        }
    }
}

fn main() {
    let args = CmdArgs::parse();
    init_logging(args.log_level());
    info!("{:?}", args.command());
    match run(&args) {
        Ok(result) => println!("{}", result.trim_end()),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
