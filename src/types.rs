//! Core types used throughout the partition ring.

use std::hash::Hasher as _;
use twox_hash::XxHash64;

/// Partition identifier, always in `[0, partition_count)`.
pub type PartitionId = usize;

/// Produces an unsigned 64 bit hash of a byte slice.
///
/// Implementations must be deterministic for identical input and should
/// spread their output uniformly; collisions hurt distribution. The hasher is
/// called for every key lookup and for every partition and member during a
/// distribution pass, so fast functions are preferable.
pub trait Hasher {
    /// Hash `data` to a position on the 64 bit ring.
    fn sum64(&self, data: &[u8]) -> u64;
}

impl<F> Hasher for F
where
    F: Fn(&[u8]) -> u64,
{
    fn sum64(&self, data: &[u8]) -> u64 {
        self(data)
    }
}

/// xxHash64 with seed 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct XxHasher;

impl Hasher for XxHasher {
    fn sum64(&self, data: &[u8]) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(data);
        hasher.finish()
    }
}

/// Something that can own partitions.
///
/// Two members with the same name are the same member. The ring hands out
/// clones, never references into its own state.
pub trait Member: Clone {
    /// Stable name identifying this member.
    fn name(&self) -> &str;
}

impl Member for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
