use env_logger::{Builder, Target};
use error_chain::ChainedError;
use errors::*;
use std::env;

// Payload binaries share stdout with the data stream, so logs go to stderr and
// stay quiet unless something is wrong. Per-record skips only show up at trace.
const DEFAULT_LOG_CONFIG: &str = "warn";

fn log_config(from_env: Option<String>) -> String {
    match from_env {
        Some(ref config) if !config.trim().is_empty() => config.to_owned(),
        _ => DEFAULT_LOG_CONFIG.to_owned(),
    }
}

pub fn init_logger() -> Result<()> {
    let config = log_config(env::var("RUST_LOG").ok());

    Builder::new()
        .parse_filters(&config)
        .target(Target::Stderr)
        .try_init()
        .chain_err(|| "Failed to build env_logger")?;
    Ok(())
}

pub fn output_error<E: ChainedError>(err: &E) {
    error!("{}", err);

    for e in err.iter().skip(1) {
        error!("caused by: {}", e);
    }

    if let Some(backtrace) = err.backtrace() {
        error!("backtrace: {:?}", backtrace);
    }
}
