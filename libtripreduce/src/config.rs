use std::env;

use errors::*;
use reducer::OrderCheck;

pub const STRICT_ORDER_VAR: &str = "TRIPREDUCE_STRICT_ORDER";
pub const REDUCE_PARTITIONS_VAR: &str = "TRIPREDUCE_REDUCE_PARTITIONS";

const DEFAULT_REDUCE_PARTITIONS: u64 = 1;

/// Upper bound on key partitions. Each partition is reduced on its own thread.
pub const MAX_REDUCE_PARTITIONS: u64 = 1024;

/// `Config` holds the few knobs of a payload binary. Commands take no flags, so everything here
/// comes from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub order_check: OrderCheck,
    pub reduce_partitions: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            order_check: OrderCheck::Trust,
            reduce_partitions: DEFAULT_REDUCE_PARTITIONS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup(STRICT_ORDER_VAR) {
            if parse_flag(&value).chain_err(|| format!("Invalid value for {}.", STRICT_ORDER_VAR))? {
                config.order_check = OrderCheck::Ascending;
            }
        }

        if let Some(value) = lookup(REDUCE_PARTITIONS_VAR) {
            let partitions: u64 = value.trim().parse().chain_err(|| {
                format!("Invalid value for {}: {}", REDUCE_PARTITIONS_VAR, value)
            })?;
            if partitions == 0 || partitions > MAX_REDUCE_PARTITIONS {
                bail!(
                    "{} must be between 1 and {}, got {}",
                    REDUCE_PARTITIONS_VAR,
                    MAX_REDUCE_PARTITIONS,
                    partitions
                );
            }
            config.reduce_partitions = partitions;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(format!("expected a boolean, got {}", other).into()),
    }
}
