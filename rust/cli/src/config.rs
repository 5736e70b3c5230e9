//! Settings resolution: defaults, then the TOML file named by
//! `RIVERBOAT_CONFIG`, then environment overrides. Command-line flags are
//! applied on top by the individual commands.

use riverboat_table::TableSettings;
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_ENV: &str = "RIVERBOAT_CONFIG";
pub const SEED_ENV: &str = "RIVERBOAT_SEED";
pub const SMALL_BLIND_ENV: &str = "RIVERBOAT_SMALL_BLIND";
pub const BIG_BLIND_ENV: &str = "RIVERBOAT_BIG_BLIND";
pub const TURN_TIMEOUT_ENV: &str = "RIVERBOAT_TURN_TIMEOUT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub turn_timeout_secs: ValueSource,
    pub countdown_interval_secs: ValueSource,
    pub runout_delay_ms: ValueSource,
    pub min_seats: ValueSource,
    pub max_seats: ValueSource,
    pub max_consecutive_timeouts: ValueSource,
    pub starting_stack: ValueSource,
    pub seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            turn_timeout_secs: ValueSource::Default,
            countdown_interval_secs: ValueSource::Default,
            runout_delay_ms: ValueSource::Default,
            min_seats: ValueSource::Default,
            max_seats: ValueSource::Default,
            max_consecutive_timeouts: ValueSource::Default,
            starting_stack: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub settings: TableSettings,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<TableSettings, ConfigError> {
    load_with_sources().map(|resolved| resolved.settings)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = TableSettings::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        apply_file(&mut cfg, &mut sources, f);
    }

    if let Some(seed) = env_value::<u64>(SEED_ENV, "seed")? {
        cfg.seed = Some(seed);
        sources.seed = ValueSource::Env;
    }
    if let Some(sb) = env_value::<u32>(SMALL_BLIND_ENV, "small blind")? {
        cfg.small_blind = sb;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(bb) = env_value::<u32>(BIG_BLIND_ENV, "big blind")? {
        cfg.big_blind = bb;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(secs) = env_value::<u64>(TURN_TIMEOUT_ENV, "turn timeout")? {
        cfg.turn_timeout_secs = secs;
        sources.turn_timeout_secs = ValueSource::Env;
    }

    cfg.validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    Ok(ConfigResolved {
        settings: cfg,
        sources,
    })
}

/// `None` when the variable is unset or empty.
fn env_value<T: std::str::FromStr>(key: &str, what: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", what, v))),
        _ => Ok(None),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    turn_timeout_secs: Option<u64>,
    #[serde(default)]
    countdown_interval_secs: Option<u64>,
    #[serde(default)]
    runout_delay_ms: Option<u64>,
    #[serde(default)]
    min_seats: Option<usize>,
    #[serde(default)]
    max_seats: Option<usize>,
    #[serde(default)]
    max_consecutive_timeouts: Option<u32>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
}

fn apply_file(cfg: &mut TableSettings, sources: &mut ConfigSources, f: FileConfig) {
    macro_rules! take {
        ($field:ident) => {
            if let Some(v) = f.$field {
                cfg.$field = v;
                sources.$field = ValueSource::File;
            }
        };
    }
    take!(small_blind);
    take!(big_blind);
    take!(turn_timeout_secs);
    take!(countdown_interval_secs);
    take!(runout_delay_ms);
    take!(min_seats);
    take!(max_seats);
    take!(max_consecutive_timeouts);
    take!(starting_stack);
    if let Some(v) = f.seed {
        cfg.seed = Some(v);
        sources.seed = ValueSource::File;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_are_marked_as_file() {
        let mut cfg = TableSettings::default();
        let mut sources = ConfigSources::default();
        let f: FileConfig = toml::from_str("big_blind = 50\nseed = 9\n").unwrap();
        apply_file(&mut cfg, &mut sources, f);

        assert_eq!(cfg.big_blind, 50);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(sources.big_blind, ValueSource::File);
        assert_eq!(sources.seed, ValueSource::File);
        assert_eq!(sources.small_blind, ValueSource::Default);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("level = 3\n").is_err());
    }

    #[test]
    fn value_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ValueSource::Env).unwrap(),
            serde_json::json!("env")
        );
    }
}
