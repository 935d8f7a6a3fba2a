// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Installs the global subscriber: events at `level` and above, unless
/// overridden by `RUST_LOG`, are written to stderr.
pub(crate) fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_line_number(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true);

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("Failed to initialize tracing subscriber: {e}");
    }
}
