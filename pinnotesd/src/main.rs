mod app_constants;
mod app_setup;
mod cli;
mod routes;

use crate::cli::CliConfig;
use app_setup::build_rocket;
use clap::{crate_name, Parser};
use log::info;
use pinnotes::error_exit;
use pinnotes::logging::init_logging;

fn main() {
    init_logging();

    info!("{} starting up", crate_name!());

    let cli_config = CliConfig::parse();
    if !cli_config.config_file.exists() {
        error_exit!(
            "configuration file at {} does not exist",
            cli_config.config_file.display()
        )
    }

    let result = rocket::execute(
        build_rocket(&cli_config.config_file).launch()
    );
    if let Err(e) = result {
        error_exit!("failed to launch rocket: {e}");
    }
}
