use anyhow::{anyhow, Result};
use clap::ArgMatches;
use std::sync::Arc;

use super::{builder_from_matches, handlers::to_json_line};
use crate::api::modbus::{LoggingHook, ModbusSimulator, SimulatorHook};

/// Run the simulator until Ctrl-C or a transport failure
///
/// With `--json` every answered exchange is also written to stdout as JSONL.
pub fn handle_simulate(matches: &ArgMatches) -> Result<()> {
    let want_json = matches.get_flag("json");
    let config = builder_from_matches(matches)?.build()?;

    log::info!(
        "Modbus RTU slave starting on {} @ {} bps (station 1, input register 0x0000)",
        config.port_name,
        config.baud_rate
    );

    let hooks: Vec<Arc<dyn SimulatorHook>> = vec![Arc::new(LoggingHook)];
    let simulator = ModbusSimulator::start(config, hooks)?;

    let control = simulator.control();
    ctrlc::set_handler(move || {
        log::info!("Interrupt received, stopping simulator");
        control.stop();
    })
    .map_err(|err| anyhow!("Failed to install Ctrl-C handler: {err}"))?;

    let mut answered = 0u64;
    for record in simulator.receiver().iter() {
        answered += 1;
        if want_json {
            println!("{}", to_json_line(&record)?);
        }
    }

    let result = simulator.join();
    log::info!("Simulator stopped after answering {answered} requests");
    result
}
