//! # Riverboat CLI Library
//!
//! Command-line driver for the riverboat rules engine. The entry point is
//! [`run`], which parses arguments, dispatches to a subcommand and returns the
//! process exit code.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["riverboat", "sim", "--hands", "100", "--seed", "7"];
//! let code = riverboat_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `eval`: Evaluate 5 to 7 cards
//! - `deal`: Deal one hand and check it down
//! - `sim`: Simulate hands with a random policy, optionally writing JSONL records
//! - `cfg`: Display resolved settings and their sources

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
mod config;
mod error;
pub mod formatters;
pub mod ui;

use cli::{Commands, RiverboatCli};
use commands::{handle_cfg_command, handle_deal_command, handle_eval_command, handle_sim_command};

pub use config::{
    BIG_BLIND_ENV, CONFIG_ENV, SEED_ENV, SMALL_BLIND_ENV, TURN_TIMEOUT_ENV, ValueSource,
};
pub use error::CliError;

const COMMANDS: &[&str] = &["eval", "deal", "sim", "cfg"];

/// Main entry point for the CLI application.
///
/// Returns `0` on success and `2` on any error. Help and version output go to
/// `out` and count as success.
///
/// ```
/// use std::io;
/// let args = vec!["riverboat", "eval", "As", "Ks", "Qs", "Js", "Ts"];
/// let mut out = Vec::new();
/// let code = riverboat_cli::run(args, &mut out, &mut io::stderr());
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().contains("Straight Flush"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match RiverboatCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Eval { cards } => handle_eval_command(&cards, out, err),
        Commands::Deal { seed, seats } => handle_deal_command(seed, usize::from(seats), out),
        Commands::Sim {
            hands,
            seats,
            seed,
            output,
        } => handle_sim_command(hands, usize::from(seats), seed, output, out, err),
        Commands::Cfg => handle_cfg_command(out),
    };

    match result {
        Ok(()) => 0,
        // handlers that detect bad input report it themselves
        Err(CliError::InvalidInput(_) | CliError::Conservation { .. }) => 2,
        Err(e) => {
            if writeln!(err, "Error: {}", e).is_err() {
                return 2;
            }
            2
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(out, "{}", e).is_err() {
                return 2;
            }
            0
        }
        _ => {
            if writeln!(err, "{}", e).is_err()
                || writeln!(err, "Usage: riverboat <command> [options]\n").is_err()
                || writeln!(err, "Commands:").is_err()
            {
                return 2;
            }
            for c in COMMANDS {
                if writeln!(err, "  {}", c).is_err() {
                    return 2;
                }
            }
            2
        }
    }
}
