//! Command handler modules for the riverboat CLI.
//!
//! Each subcommand lives in its own module with one public handler,
//! `handle_COMMAND_command(...) -> Result<(), CliError>`, that writes to the
//! output streams it is given.

pub mod cfg;
pub mod deal;
pub mod eval;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use sim::handle_sim_command;
