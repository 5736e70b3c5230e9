//! Configuration command handler.
//!
//! Prints every table setting with the layer it came from:
//!
//! ```json
//! {
//!   "big_blind": {
//!     "value": 20,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()?;

    let config::ConfigResolved { settings, sources } = resolved;
    let display = serde_json::json!({
        "small_blind": { "value": settings.small_blind, "source": sources.small_blind },
        "big_blind": { "value": settings.big_blind, "source": sources.big_blind },
        "turn_timeout_secs": {
            "value": settings.turn_timeout_secs,
            "source": sources.turn_timeout_secs,
        },
        "countdown_interval_secs": {
            "value": settings.countdown_interval_secs,
            "source": sources.countdown_interval_secs,
        },
        "runout_delay_ms": {
            "value": settings.runout_delay_ms,
            "source": sources.runout_delay_ms,
        },
        "min_seats": { "value": settings.min_seats, "source": sources.min_seats },
        "max_seats": { "value": settings.max_seats, "source": sources.max_seats },
        "max_consecutive_timeouts": {
            "value": settings.max_consecutive_timeouts,
            "source": sources.max_consecutive_timeouts,
        },
        "starting_stack": {
            "value": settings.starting_stack,
            "source": sources.starting_stack,
        },
        "seed": { "value": settings.seed, "source": sources.seed },
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn writes_pretty_json_with_sources() {
        let mut out = Vec::new();

        handle_cfg_command(&mut out).expect("cfg succeeds");

        let output = String::from_utf8(out).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
        for key in ["small_blind", "big_blind", "turn_timeout_secs", "seed"] {
            assert!(json[key].get("value").is_some(), "{} has a value", key);
            assert!(json[key]["source"].is_string(), "{} has a source", key);
        }
        assert!(output.contains("\n  "), "output should be indented");
    }
}
