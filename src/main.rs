//! Tank Crates entry point

use std::process::ExitCode;

use tank_crates::{Settings, platform};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tank Crates starting...");

    let settings = Settings::load();
    match platform::run(settings) {
        Ok(()) => {
            log::info!("Bye");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
