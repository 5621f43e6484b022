use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// The `Partition` trait assigns each key to one of a fixed number of reduce partitions.
///
/// Every pair with a given key must land in the same partition, so that partitions hold disjoint
/// key sets and can be reduced independently.
pub trait Partition {
    fn partition_count(&self) -> u64;
    fn partition(&self, key: &str) -> u64;
}

/// `HashPartitioner` implements `Partition` by hashing the key.
///
/// `DefaultHasher::new()` uses fixed keys, so the assignment is the same on every run.
#[derive(Clone, Debug)]
pub struct HashPartitioner {
    partition_count: u64,
}

impl HashPartitioner {
    /// A partition count of zero is treated as one.
    pub fn new(partition_count: u64) -> Self {
        HashPartitioner {
            partition_count: partition_count.max(1),
        }
    }

    fn calculate_hash<T: Hash + ?Sized>(&self, t: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        t.hash(&mut hasher);
        hasher.finish()
    }
}

impl Partition for HashPartitioner {
    fn partition_count(&self) -> u64 {
        self.partition_count
    }

    fn partition(&self, key: &str) -> u64 {
        self.calculate_hash(key) % self.partition_count
    }
}
