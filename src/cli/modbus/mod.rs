pub mod handlers;
pub mod slave;

use anyhow::Result;
use clap::ArgMatches;

use super::config::SimulatorFileConfig;
use crate::api::modbus::SimulatorBuilder;

/// Resolve simulator settings: command line flags, then the config file, then defaults.
pub fn builder_from_matches(matches: &ArgMatches) -> Result<SimulatorBuilder> {
    let file_config = match matches.get_one::<String>("config") {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            SimulatorFileConfig::from_file(path)?
        }
        None => SimulatorFileConfig::default(),
    };

    let mut builder = file_config.into_builder();
    if let Some(port) = matches.get_one::<String>("port") {
        builder = builder.with_port(port);
    }
    if let Some(baud_rate) = matches.get_one::<u32>("baud-rate") {
        builder = builder.with_baud_rate(*baud_rate);
    }
    if let Some(timeout_ms) = matches.get_one::<u64>("timeout-ms") {
        builder = builder.with_timeout(*timeout_ms);
    }
    if let Some(interval_ms) = matches.get_one::<u64>("poll-interval-ms") {
        builder = builder.with_poll_interval(*interval_ms);
    }
    if let Some(value) = matches.get_one::<u16>("initial-value") {
        builder = builder.with_initial_value(*value);
    }
    Ok(builder)
}
