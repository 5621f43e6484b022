use std::collections::BTreeMap;

use serde_json;

use errors::*;
use record::ParseError;

/// `RunStats` counts what happened to the lines of one map or reduce run.
///
/// It is only ever logged; skipped lines never change the exit status of a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub lines_read: u64,
    pub accepted: u64,
    pub skipped: BTreeMap<&'static str, u64>,
    pub emitted: u64,
}

impl RunStats {
    pub fn record_skip(&mut self, err: ParseError) {
        *self.skipped.entry(err.reason()).or_insert(0) += 1;
    }

    pub fn skipped_total(&self) -> u64 {
        self.skipped.values().sum()
    }

    /// Adds the counters of another run, e.g. one map shard, into this one.
    pub fn merge(&mut self, other: &RunStats) {
        self.lines_read += other.lines_read;
        self.accepted += other.accepted;
        self.emitted += other.emitted;
        for (reason, count) in &other.skipped {
            *self.skipped.entry(*reason).or_insert(0) += *count;
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self).chain_err(|| "Error serialising run stats.")?;
        Ok(json)
    }
}

/// Logs the summary of a finished phase.
pub fn log_summary(phase: &str, stats: &RunStats) {
    match stats.to_json() {
        Ok(json) => info!("{} finished: {}", phase, json),
        Err(err) => warn!("{} finished, stats unavailable: {}", phase, err),
    }
}
