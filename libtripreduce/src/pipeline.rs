//! Local map, shuffle and reduce in one process.
//!
//! Input shards are mapped on worker threads with no shared state, at most one thread per
//! available core at a time. The map outputs go through a `SortShuffle`, and every non-empty key
//! partition is reduced by its own `Reducer`, again in bounded batches. Aggregates are written
//! partition by partition, each partition in key order.

use std::io::BufRead;
use std::thread;

use serde_json;

use config::MAX_REDUCE_PARTITIONS;
use emitter::{EmitFinal, FinalVecEmitter, IntermediateVecEmitter};
use errors::*;
use job::Job;
use mapper::{run_map, Map};
use partition::HashPartitioner;
use policy::Policy;
use reducer::{reduce_pairs, Aggregate, OrderCheck};
use shuffle::{Shuffle, SortShuffle};
use stats::RunStats;

/// Counters of both phases of a pipeline run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    pub shards: usize,
    pub partitions: u64,
    pub map: RunStats,
    pub reduce: RunStats,
}

impl PipelineStats {
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self).chain_err(|| "Error serialising pipeline stats.")?;
        Ok(json)
    }
}

type MapOutput<V> = (Vec<(String, V)>, RunStats);
type ReduceOutput<A> = (Vec<Aggregate<A>>, RunStats);

/// Number of worker threads used by each phase.
pub fn worker_count() -> usize {
    thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1)
}

/// Runs `task` over every indexed item, `workers` scoped threads at a time. Results keep the
/// order of `items`.
fn run_batched<T, R, F>(items: Vec<(usize, T)>, workers: usize, phase: &str, task: F) -> Result<Vec<R>>
where
    T: Send,
    R: Send,
    F: Fn(usize, T) -> Result<R> + Sync,
{
    let task = &task;
    let mut results = Vec::with_capacity(items.len());
    let mut items = items.into_iter().peekable();

    while items.peek().is_some() {
        let batch: Vec<(usize, T)> = items.by_ref().take(workers.max(1)).collect();
        let batch_results: Vec<Result<R>> = thread::scope(|scope| {
            let handles: Vec<_> = batch
                .into_iter()
                .map(|(index, item)| scope.spawn(move || task(index, item)))
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(format!("{} thread panicked.", phase).into()))
                })
                .collect()
        });

        for result in batch_results {
            results.push(result?);
        }
    }

    Ok(results)
}

fn map_shards<M, P, S>(job: &Job<M, P>, shards: Vec<S>, workers: usize) -> Result<Vec<MapOutput<M::Value>>>
where
    M: Map + Sync,
    P: Policy<Value = M::Value> + Sync,
    M::Value: Send,
    S: BufRead + Send,
{
    let shards: Vec<(usize, S)> = shards.into_iter().enumerate().collect();

    run_batched(shards, workers, "Map", |index, shard| {
        let mut pairs = Vec::new();
        let stats = run_map(
            job.mapper,
            &job.parser,
            shard,
            IntermediateVecEmitter::new(&mut pairs),
        ).chain_err(|| format!("Error mapping shard {}.", index))?;
        Ok((pairs, stats))
    })
}

fn reduce_partitions<P>(
    policy: &P,
    order: OrderCheck,
    partitions: Vec<Vec<(String, P::Value)>>,
    workers: usize,
) -> Result<Vec<ReduceOutput<P::Accumulator>>>
where
    P: Policy + Sync,
    P::Value: Send,
    P::Accumulator: Send,
{
    // Empty partitions produce nothing, so they get no thread.
    let partitions: Vec<(usize, Vec<(String, P::Value)>)> = partitions
        .into_iter()
        .enumerate()
        .filter(|&(_, ref partition)| !partition.is_empty())
        .collect();

    run_batched(partitions, workers, "Reduce", |index, partition| {
        let mut aggregates = Vec::new();
        let stats = reduce_pairs(
            policy,
            order,
            partition,
            FinalVecEmitter::new(&mut aggregates),
        ).chain_err(|| format!("Error reducing partition {}.", index))?;
        Ok((aggregates, stats))
    })
}

/// `run_pipeline` maps all shards, shuffles their output into `partition_count` key partitions
/// and reduces them, sending every aggregate to `emitter`.
///
/// `partition_count` must be between 1 and `MAX_REDUCE_PARTITIONS`.
pub fn run_pipeline<M, P, S, E>(
    job: &Job<M, P>,
    shards: Vec<S>,
    partition_count: u64,
    order: OrderCheck,
    mut emitter: E,
) -> Result<PipelineStats>
where
    M: Map + Sync,
    P: Policy<Value = M::Value> + Sync,
    M::Value: Send,
    P::Value: Send,
    P::Accumulator: Send,
    S: BufRead + Send,
    E: EmitFinal<P::Accumulator>,
{
    if partition_count == 0 || partition_count > MAX_REDUCE_PARTITIONS {
        bail!(
            "partition count must be between 1 and {}, got {}",
            MAX_REDUCE_PARTITIONS,
            partition_count
        );
    }

    let workers = worker_count();
    let mut stats = PipelineStats {
        shards: shards.len(),
        ..Default::default()
    };

    let mut streams = Vec::with_capacity(shards.len());
    for (pairs, shard_stats) in map_shards(job, shards, workers)? {
        stats.map.merge(&shard_stats);
        streams.push(pairs);
    }
    debug!("mapped {} shards into {} pairs", stats.shards, stats.map.emitted);

    let shuffle = SortShuffle::new(HashPartitioner::new(partition_count));
    let partitions = shuffle.shuffle(streams);
    stats.partitions = partitions.len() as u64;

    for (aggregates, partition_stats) in reduce_partitions(job.policy, order, partitions, workers)? {
        stats.reduce.merge(&partition_stats);
        for aggregate in aggregates {
            emitter.emit(aggregate)?;
        }
    }
    emitter.flush()?;

    Ok(stats)
}
