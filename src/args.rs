//! Command-line argument parsing and processing.
//!
//! Hand-rolled parsing into a [`CliAction`]: the binary has a handful of
//! subcommands and flags, and keeping the parser explicit keeps startup
//! instant and the help text honest.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the kiosk with these settings
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Signal the running kiosk to reload its configuration
    ReloadCommand { config_dir: Option<String> },
    /// Print the currently resolved display state
    StatusCommand {
        json: bool,
        config_dir: Option<String>,
    },
    /// Replay a time range under the simulated clock
    SimulateCommand {
        debug_enabled: bool,
        start_time: String,
        end_time: String,
        multiplier: f64,
        config_dir: Option<String>,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit with an error
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments (without the program name) into a
    /// structured action.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        let mut debug_enabled = false;
        let mut json = false;
        let mut config_dir: Option<String> = None;
        let mut subcommand: Option<String> = None;
        let mut positionals: Vec<String> = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--debug" | "-d" => debug_enabled = true,
                "--json" => json = true,
                "--config" | "-c" => match iter.next() {
                    Some(dir) => config_dir = Some(dir.clone()),
                    None => {
                        log_warning!("--config requires a directory argument");
                        return ParsedArgs {
                            action: CliAction::ShowHelpDueToError,
                        };
                    }
                },
                "--help" | "-h" | "help" => {
                    return ParsedArgs {
                        action: CliAction::ShowHelp,
                    };
                }
                "--version" | "-V" => {
                    return ParsedArgs {
                        action: CliAction::ShowVersion,
                    };
                }
                other if other.starts_with('-') => {
                    log_warning!("Unknown option '{}'", other);
                    return ParsedArgs {
                        action: CliAction::ShowHelpDueToError,
                    };
                }
                other => {
                    if subcommand.is_none() {
                        subcommand = Some(other.to_string());
                    } else {
                        positionals.push(other.to_string());
                    }
                }
            }
        }

        let action = match subcommand.as_deref() {
            None => CliAction::Run {
                debug_enabled,
                config_dir,
            },
            Some("reload") => CliAction::ReloadCommand { config_dir },
            Some("status") => CliAction::StatusCommand { json, config_dir },
            Some("simulate") => {
                if positionals.len() < 2 {
                    log_warning!("simulate requires <start> and <end> datetimes");
                    return ParsedArgs {
                        action: CliAction::ShowHelpDueToError,
                    };
                }
                let multiplier = match positionals.get(2) {
                    Some(raw) => match raw.parse::<f64>() {
                        Ok(m) => m,
                        Err(_) => {
                            log_warning!("Invalid multiplier '{}'", raw);
                            return ParsedArgs {
                                action: CliAction::ShowHelpDueToError,
                            };
                        }
                    },
                    // Fast-forward by default: replay the range instantly.
                    None => 0.0,
                };
                CliAction::SimulateCommand {
                    debug_enabled,
                    start_time: positionals[0].clone(),
                    end_time: positionals[1].clone(),
                    multiplier,
                    config_dir,
                }
            }
            Some(unknown) => {
                log_warning!("Unknown command '{}'", unknown);
                CliAction::ShowHelpDueToError
            }
        };

        ParsedArgs { action }
    }
}
