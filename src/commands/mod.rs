//! CLI subcommands.

pub mod reload;
pub mod simulate;
pub mod status;

/// Display help information.
pub fn display_help() {
    log_version!();
    log_block_start!("Usage: salatr [OPTIONS] [COMMAND]");
    log_indented!("(no command)                 Run the kiosk display");
    log_indented!("reload                       Signal the running kiosk to reload");
    log_indented!("status [--json]              Print the resolved display state");
    log_indented!("simulate <start> <end> [x]   Replay a time range (x = speed, 0 = instant)");
    log_indented!("help                         Show this help");
    log_pipe!();
    log_decorated!("Options:");
    log_indented!("-d, --debug                  Verbose logging");
    log_indented!("-c, --config <dir>           Use an alternate config directory");
    log_indented!("-V, --version                Show version");
    log_pipe!();
    log_decorated!("Datetimes use the format \"YYYY-MM-DD HH:MM:SS\".");
    log_end!();
}

/// Display version information.
pub fn display_version() {
    log_version!();
    log_block_start!("Masjid prayer-times kiosk for the terminal");
    log_indented!("https://github.com/salatr/salatr");
    log_end!();
}
