pub mod actions;
pub mod config;
pub mod modbus;

use clap::{Arg, ArgMatches, Command};

/// Build the command line definition.
pub fn build_command() -> Command {
    Command::new("pyrsim")
        .about("Modbus RTU pyranometer slave simulator")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .help("Serial port to answer on (e.g. /dev/ttyUSB0, COM13)")
                .value_name("PORT"),
        )
        .arg(
            Arg::new("baud-rate")
                .long("baud-rate")
                .short('b')
                .help("Serial port baud rate [default: 9600]")
                .value_name("BAUD")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Load settings from a JSON or TOML file; command line flags take precedence")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .help("Bounded read timeout for each poll of the port [default: 100]")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("poll-interval-ms")
                .long("poll-interval-ms")
                .help("Pause between loop iterations [default: 10]")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("initial-value")
                .long("initial-value")
                .help("Irradiance reported before the first tick, 0..=2000 [default: 0]")
                .value_name("VALUE")
                .value_parser(clap::value_parser!(u16).range(0..=2000)),
        )
        .arg(
            Arg::new("list-ports")
                .long("list-ports")
                .short('l')
                .help("List all available serial ports and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .short('j')
                .help("JSON output for --list-ports; JSONL exchange records on stdout while simulating")
                .action(clap::ArgAction::SetTrue),
        )
}

/// Parse command line arguments and return ArgMatches.
pub fn parse_args() -> ArgMatches {
    build_command().get_matches()
}
