//! The streaming reducer.
//!
//! A `Reducer` consumes `(key, value)` pairs that arrive grouped by key and folds each group into
//! one aggregate as soon as the key changes. Only the accumulator of the active key is held in
//! memory, so input length is unbounded.
//!
//! Grouping relies on the input being sorted: all pairs for one key must be contiguous. The
//! reducer only compares each key with the active one. When a key reappears after another key,
//! it is aggregated again from zero and emitted a second time with a partial total. That is a
//! broken caller contract and is not corrected here; `OrderCheck::Ascending` turns it into an
//! error for inputs sorted in byte order.

use std::io::BufRead;
use std::mem;

use emitter::EmitFinal;
use errors::*;
use io::LineReader;
use policy::Policy;
use stats::RunStats;
use wire::{self, WireValue};

/// How much the reducer trusts the ordering of its input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderCheck {
    /// Assume contiguous keys; never check.
    Trust,
    /// Fail with `ErrorKind::OrderingViolation` when a key sorts before the active key.
    Ascending,
}

impl Default for OrderCheck {
    fn default() -> Self {
        OrderCheck::Trust
    }
}

/// `Aggregate` is the finished result for one key.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate<A> {
    pub key: String,
    pub aggregate: A,
}

impl<A> Aggregate<A> {
    pub fn new(key: String, aggregate: A) -> Self {
        Aggregate { key, aggregate }
    }
}

enum State<A> {
    Idle,
    Accumulating { key: String, accumulator: A },
}

/// `Reducer` is the group-boundary state machine. It exclusively owns the accumulator of the
/// active key.
pub struct Reducer<'a, P: Policy + 'a> {
    policy: &'a P,
    order: OrderCheck,
    state: State<P::Accumulator>,
}

impl<'a, P: Policy> Reducer<'a, P> {
    pub fn new(policy: &'a P) -> Self {
        Reducer::with_order_check(policy, OrderCheck::Trust)
    }

    pub fn with_order_check(policy: &'a P, order: OrderCheck) -> Self {
        Reducer {
            policy,
            order,
            state: State::Idle,
        }
    }

    /// The key currently being accumulated, if any.
    pub fn active_key(&self) -> Option<&str> {
        match self.state {
            State::Idle => None,
            State::Accumulating { ref key, .. } => Some(key),
        }
    }

    /// Feeds one pair into the reducer.
    ///
    /// Returns the finished aggregate of the previous key when `key` starts a new group.
    pub fn push(&mut self, key: &str, value: P::Value) -> Result<Option<Aggregate<P::Accumulator>>> {
        match mem::replace(&mut self.state, State::Idle) {
            State::Idle => {
                self.state = self.start(key, value);
                Ok(None)
            }
            State::Accumulating {
                key: active,
                accumulator,
            } => {
                if active == key {
                    self.state = State::Accumulating {
                        key: active,
                        accumulator: self.policy.fold(accumulator, value),
                    };
                    return Ok(None);
                }

                if self.order == OrderCheck::Ascending && key < active.as_str() {
                    return Err(ErrorKind::OrderingViolation(active, key.to_owned()).into());
                }

                self.state = self.start(key, value);
                Ok(Some(Aggregate::new(active, accumulator)))
            }
        }
    }

    /// Ends the stream, returning the aggregate of the active key if any pair was seen.
    pub fn finish(&mut self) -> Option<Aggregate<P::Accumulator>> {
        match mem::replace(&mut self.state, State::Idle) {
            State::Idle => None,
            State::Accumulating { key, accumulator } => Some(Aggregate::new(key, accumulator)),
        }
    }

    fn start(&self, key: &str, value: P::Value) -> State<P::Accumulator> {
        State::Accumulating {
            key: key.to_owned(),
            accumulator: self.policy.fold(self.policy.zero(), value),
        }
    }
}

/// `run_reduce` reduces a stream of `<key>\t<value>` lines.
///
/// Lines that do not split into a key and a value the policy can decode are skipped and counted.
/// Only I/O failures and, when enabled, ordering violations abort the run.
pub fn run_reduce<P, R, E>(policy: &P, order: OrderCheck, source: R, mut emitter: E) -> Result<RunStats>
where
    P: Policy,
    R: BufRead,
    E: EmitFinal<P::Accumulator>,
{
    let mut reader = LineReader::new(source);
    let mut reducer = Reducer::with_order_check(policy, order);
    let mut stats = RunStats::default();

    while let Some(line) = reader.next_line()? {
        stats.lines_read += 1;
        let pair = line.and_then(|line| {
            let (key, value) = wire::split_pair(line)?;
            Ok((key, P::Value::decode(value)?))
        });

        match pair {
            Ok((key, value)) => {
                stats.accepted += 1;
                if let Some(aggregate) = reducer.push(key, value)? {
                    emitter.emit(aggregate)?;
                    stats.emitted += 1;
                }
            }
            Err(err) => {
                trace!("skipping reduce input line {}: {}", stats.lines_read, err);
                stats.record_skip(err);
            }
        }
    }

    if let Some(aggregate) = reducer.finish() {
        emitter.emit(aggregate)?;
        stats.emitted += 1;
    }
    emitter.flush()?;

    Ok(stats)
}

/// `reduce_pairs` reduces already-decoded pairs, as produced by an in-process shuffle.
pub fn reduce_pairs<P, I, E>(policy: &P, order: OrderCheck, pairs: I, mut emitter: E) -> Result<RunStats>
where
    P: Policy,
    I: IntoIterator<Item = (String, P::Value)>,
    E: EmitFinal<P::Accumulator>,
{
    let mut reducer = Reducer::with_order_check(policy, order);
    let mut stats = RunStats::default();

    for (key, value) in pairs {
        stats.lines_read += 1;
        stats.accepted += 1;
        if let Some(aggregate) = reducer.push(&key, value)? {
            emitter.emit(aggregate)?;
            stats.emitted += 1;
        }
    }

    if let Some(aggregate) = reducer.finish() {
        emitter.emit(aggregate)?;
        stats.emitted += 1;
    }
    emitter.flush()?;

    Ok(stats)
}
