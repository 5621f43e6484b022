use std::io::BufRead;

use emitter::EmitIntermediate;
use errors::*;
use io::LineReader;
use record::{ParseResult, Record, RecordParser};
use stats::RunStats;
use wire::{self, WireValue};

/// The `Map` trait defines how one accepted record becomes a key-value pair.
///
/// # Arguments
///
/// * `record` - The fields of one input line, as split by the `RecordParser`.
///
/// # Outputs
///
/// The grouping key and the partial value of the record, or the `ParseError` that rejects it.
/// A mapper holds no state across records.
pub trait Map {
    type Value: WireValue;
    fn map(&self, record: &Record) -> ParseResult<(String, Self::Value)>;
}

/// Parses and maps a single raw line.
///
/// A pair whose key would not survive as a single wire column is rejected here, so every pair
/// that leaves the map phase can be read back by the reducer.
pub fn map_line<M: Map>(mapper: &M, parser: &RecordParser, line: &str) -> ParseResult<(String, M::Value)> {
    let record = parser.parse(line)?;
    let (key, value) = mapper.map(&record)?;
    wire::check_key(&key)?;
    Ok((key, value))
}

/// `run_map` maps every line of `source`, sending accepted pairs to `emitter`.
///
/// Rejected lines emit nothing and never stop the run.
pub fn run_map<M, R, E>(mapper: &M, parser: &RecordParser, source: R, mut emitter: E) -> Result<RunStats>
where
    M: Map,
    R: BufRead,
    E: EmitIntermediate<M::Value>,
{
    let mut reader = LineReader::new(source);
    let mut stats = RunStats::default();

    while let Some(line) = reader.next_line()? {
        stats.lines_read += 1;
        match line.and_then(|line| map_line(mapper, parser, line)) {
            Ok((key, value)) => {
                stats.accepted += 1;
                emitter
                    .emit(key, value)
                    .chain_err(|| "Error emitting map key-value pair.")?;
                stats.emitted += 1;
            }
            Err(err) => {
                trace!("skipping map input line {}: {}", stats.lines_read, err);
                stats.record_skip(err);
            }
        }
    }
    emitter.flush()?;

    Ok(stats)
}
