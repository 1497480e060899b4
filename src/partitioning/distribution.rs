//! Bounded-load partition distribution.
//!
//! Every partition hashes to a position on the ring. The member owning the
//! nearest point at or after that position is the natural owner; if it is
//! already at the load cap, the walk moves on to the next point, and so on
//! around the ring. See "Consistent Hashing with Bounded Loads"
//! (Mirrokni, Thorup, Zadimoghaddam).

use crate::error::{Error, Result};
use crate::partitioning::hashring::HashRing;
use crate::types::{Hasher, Member, PartitionId};
use std::collections::HashMap;

/// Per-member partition counts for one distribution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadTracker {
    loads: HashMap<String, u64>,
}

impl LoadTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current load of a member, 0 if it holds nothing.
    pub fn load(&self, name: &str) -> u64 {
        self.loads.get(name).copied().unwrap_or(0)
    }

    /// Record one more partition for a member.
    pub fn increment(&mut self, name: &str) {
        *self.loads.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Sum of all loads.
    pub fn total(&self) -> u64 {
        self.loads.values().sum()
    }

    /// Loads by member name.
    pub fn as_map(&self) -> &HashMap<String, u64> {
        &self.loads
    }
}

/// Owner of every partition, plus the loads that produced it.
///
/// Either empty (no members) or total over `[0, partition_count)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionTable {
    owners: Vec<String>,
    loads: LoadTracker,
}

impl PartitionTable {
    /// Number of partitions with an owner.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no partition has an owner.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Name of the member owning a partition.
    pub fn owner(&self, partition: PartitionId) -> Option<&str> {
        self.owners.get(partition).map(String::as_str)
    }

    /// Owner names indexed by partition.
    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    /// Partitions owned by a member, ascending.
    pub fn partitions_of(&self, name: &str) -> Vec<PartitionId> {
        self.owners
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.as_str() == name)
            .map(|(partition, _)| partition)
            .collect()
    }

    /// Per-member loads.
    pub fn loads(&self) -> &LoadTracker {
        &self.loads
    }

    /// Partitions owned in both tables whose owner differs in `next`.
    pub fn moved_partitions(&self, next: &PartitionTable) -> usize {
        self.owners
            .iter()
            .zip(&next.owners)
            .filter(|(before, after)| before != after)
            .count()
    }
}

/// Maximum partitions per member: `ceil((P / members) * load_factor)`.
///
/// `P / members` is integer division, so the even share rounds down before
/// the load factor is applied. Zero when there are no members.
pub fn average_load_cap(partition_count: usize, member_count: usize, load_factor: f64) -> f64 {
    if member_count == 0 {
        return 0.0;
    }
    ((partition_count / member_count) as f64 * load_factor).ceil()
}

/// Ring position of a partition: the hash of its little-endian index.
pub fn partition_key<H: Hasher>(hasher: &H, partition: PartitionId) -> u64 {
    hasher.sum64(&(partition as u64).to_le_bytes())
}

/// Build a complete partition table for the ring.
///
/// Nothing is shared with any previously installed table; on error the
/// partially built table is dropped.
pub fn distribute<M, H>(
    ring: &HashRing<M>,
    hasher: &H,
    partition_count: usize,
    load_factor: f64,
) -> Result<PartitionTable>
where
    M: Member,
    H: Hasher,
{
    if ring.is_empty() {
        return Ok(PartitionTable::default());
    }

    let average_load = average_load_cap(partition_count, ring.member_count(), load_factor);
    let mut owners = Vec::with_capacity(partition_count);
    let mut loads = LoadTracker::new();

    for partition in 0..partition_count {
        let key = partition_key(hasher, partition);
        let start = ring.nearest_index(key).unwrap_or(0);

        let owner = match find_under_cap(ring, start, average_load, &loads) {
            Some(owner) => owner,
            None => {
                tracing::error!(
                    partition,
                    average_load,
                    members = ring.member_count(),
                    ring_points = ring.len(),
                    "Not enough room to distribute partitions"
                );
                return Err(Error::CapacityExhausted {
                    partition,
                    average_load,
                    members: ring.member_count(),
                    ring_points: ring.len(),
                });
            }
        };

        loads.increment(owner);
        owners.push(owner.to_string());
    }

    tracing::debug!(
        partitions = partition_count,
        members = ring.member_count(),
        ring_points = ring.len(),
        average_load,
        "Distributed partitions"
    );

    Ok(PartitionTable { owners, loads })
}

/// Walk the ring once from `start`, returning the first member below the cap.
fn find_under_cap<'a, M: Member>(
    ring: &'a HashRing<M>,
    start: usize,
    average_load: f64,
    loads: &LoadTracker,
) -> Option<&'a str> {
    let len = ring.len();
    (0..len)
        .map(|step| (start + step) % len)
        .filter_map(|idx| ring.owner_at(idx))
        .find(|name| (loads.load(name) as f64) < average_load)
}
