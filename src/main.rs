use pyrsim::{boot, cli};

fn main() {
    boot::init_common();
    let matches = cli::parse_args();

    match cli::actions::run_one_shot_actions(&matches) {
        Ok(true) => return,
        Ok(false) => {}
        Err(err) => {
            log::error!("Action failed: {err:#}");
            std::process::exit(1);
        }
    }

    if let Err(err) = cli::modbus::slave::handle_simulate(&matches) {
        log::error!("Simulator terminated: {err:#}");
        std::process::exit(1);
    }
}
