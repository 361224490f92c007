//! CLI entry point: parse arguments, dispatch, report failures.

use salatr::args::{CliAction, ParsedArgs};
use salatr::{Salatr, commands, config, log_end, log_error, log_pipe, log_version};

fn main() {
    let parsed = ParsedArgs::parse(std::env::args().skip(1));

    if let Err(e) = dispatch(parsed.action) {
        log_pipe!();
        log_error!("{:#}", e);
        log_end!();
        std::process::exit(1);
    }
}

fn dispatch(action: CliAction) -> anyhow::Result<()> {
    match action {
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            log_version!();
            Salatr::new(debug_enabled).run()
        }
        CliAction::ReloadCommand { config_dir } => {
            config::set_config_dir(config_dir)?;
            commands::reload::handle_reload_command()
        }
        CliAction::StatusCommand { json, config_dir } => {
            config::set_config_dir(config_dir)?;
            commands::status::handle_status_command(json)
        }
        CliAction::SimulateCommand {
            debug_enabled,
            start_time,
            end_time,
            multiplier,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::simulate::handle_simulate_command(
                debug_enabled,
                &start_time,
                &end_time,
                multiplier,
            )
        }
        CliAction::ShowHelp => {
            commands::display_help();
            Ok(())
        }
        CliAction::ShowVersion => {
            commands::display_version();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            commands::display_help();
            std::process::exit(1);
        }
    }
}
