//! The shuffle boundary between map and reduce.
//!
//! The engine itself only relies on the contract: many unordered `(key, value)` streams go in,
//! key-sorted streams over disjoint key sets come out. `SortShuffle` is the in-memory reference
//! implementation used by the local pipeline; an external sort (e.g. `LC_ALL=C sort`) or a
//! distributed shuffle satisfies the same contract for the `reduce` command.

use partition::Partition;

/// The `Shuffle` trait groups map outputs by key.
pub trait Shuffle<V> {
    /// Returns one key-sorted stream per reduce partition, in partition order.
    fn shuffle(&self, streams: Vec<Vec<(String, V)>>) -> Vec<Vec<(String, V)>>;
}

/// `SortShuffle` sorts all pairs by key bytes and splits them into partitions.
///
/// The sort is stable, so for a fixed shard order the output is identical on every run.
pub struct SortShuffle<P: Partition> {
    partitioner: P,
}

impl<P: Partition> SortShuffle<P> {
    pub fn new(partitioner: P) -> Self {
        SortShuffle { partitioner }
    }
}

impl<P: Partition, V> Shuffle<V> for SortShuffle<P> {
    fn shuffle(&self, streams: Vec<Vec<(String, V)>>) -> Vec<Vec<(String, V)>> {
        let mut pairs: Vec<(String, V)> = streams.into_iter().flat_map(|s| s.into_iter()).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let count = self.partitioner.partition_count();
        let mut partitions: Vec<Vec<(String, V)>> = (0..count).map(|_| Vec::new()).collect();
        for (key, value) in pairs {
            let partition = self.partitioner.partition(&key) as usize;
            partitions[partition].push((key, value));
        }
        partitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partition::HashPartitioner;

    fn pairs(keys: &[&str]) -> Vec<(String, u64)> {
        keys.iter().map(|key| (key.to_string(), 1)).collect()
    }

    #[test]
    fn single_partition_is_sorted() {
        let shuffle = SortShuffle::new(HashPartitioner::new(1));

        let output = shuffle.shuffle(vec![pairs(&["b", "a"]), pairs(&["c", "a", "b"])]);

        assert_eq!(1, output.len());
        let keys: Vec<&str> = output[0].iter().map(|pair| pair.0.as_str()).collect();
        assert_eq!(vec!["a", "a", "b", "b", "c"], keys);
    }

    #[test]
    fn sort_is_stable_within_a_key() {
        let shuffle = SortShuffle::new(HashPartitioner::new(1));
        let first = vec![("k".to_owned(), 1.0), ("j".to_owned(), 9.0)];
        let second = vec![("k".to_owned(), 2.0)];

        let output = shuffle.shuffle(vec![first, second]);

        let values: Vec<f64> = output[0].iter().map(|pair| pair.1).collect();
        assert_eq!(vec![9.0, 1.0, 2.0], values);
    }

    #[test]
    fn partitions_hold_disjoint_sorted_keys() {
        let partitioner = HashPartitioner::new(3);
        let shuffle = SortShuffle::new(partitioner.clone());

        let output = shuffle.shuffle(vec![
            pairs(&["2024-01-03", "2024-01-01", "2024-01-02"]),
            pairs(&["2024-01-02", "2024-01-04", "2024-01-01"]),
        ]);

        assert_eq!(3, output.len());
        let total: usize = output.iter().map(|partition| partition.len()).sum();
        assert_eq!(6, total);
        for (index, partition) in output.iter().enumerate() {
            for window in partition.windows(2) {
                assert!(window[0].0 <= window[1].0);
            }
            for pair in partition {
                assert_eq!(index as u64, partitioner.partition(&pair.0));
            }
        }
    }

    #[test]
    fn empty_input_gives_empty_partitions() {
        let shuffle = SortShuffle::new(HashPartitioner::new(2));

        let output: Vec<Vec<(String, u64)>> = shuffle.shuffle(Vec::new());

        assert_eq!(vec![Vec::<(String, u64)>::new(), Vec::new()], output);
    }
}
