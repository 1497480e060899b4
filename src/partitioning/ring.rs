//! Thread-safe partition ring.
//!
//! [`PartitionRing`] owns the hash ring and the partition table behind a
//! single reader/writer lock. Mutations build a candidate ring and table off
//! to the side and swap both in together, so readers always see the result of
//! a completed mutation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::metrics::RingMetrics;
use crate::partitioning::backups::resolve_backups;
use crate::partitioning::distribution::{average_load_cap, distribute, PartitionTable};
use crate::partitioning::hashring::HashRing;
use crate::partitioning::snapshot::PartitionSnapshot;
use crate::types::{Hasher, Member, PartitionId};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::collections::HashMap;

/// Ring and table, always replaced as a unit.
#[derive(Debug)]
struct RingState<M> {
    ring: HashRing<M>,
    table: PartitionTable,
}

/// Assigns a fixed number of partitions to a dynamic set of members with
/// consistent hashing and bounded loads.
#[derive(Debug)]
pub struct PartitionRing<M, H> {
    hasher: H,

    /// Fixed for the lifetime of the ring.
    partition_count: usize,

    load_factor: f64,

    state: RwLock<RingState<M>>,

    metrics: RingMetrics,
}

impl<M: Member, H: Hasher> PartitionRing<M, H> {
    /// Create a ring seeded with `members` and distribute the partitions.
    ///
    /// Fails if the configuration is invalid or the members cannot hold all
    /// partitions under the load cap.
    pub fn new(members: impl IntoIterator<Item = M>, config: Config<H>) -> Result<Self> {
        config.validate()?;
        let Config {
            hasher,
            partition_count,
            replication_factor,
            load_factor,
        } = config;

        let mut ring = HashRing::new(replication_factor);
        for member in members {
            ring.add(member, &hasher);
        }

        let partition_ring = Self {
            hasher,
            partition_count,
            load_factor,
            state: RwLock::new(RingState {
                ring: HashRing::new(replication_factor),
                table: PartitionTable::default(),
            }),
            metrics: RingMetrics::new(),
        };

        let table = if ring.member_count() == 0 {
            PartitionTable::default()
        } else {
            partition_ring.redistribute(&ring)?
        };
        partition_ring.metrics.members_added.inc_by(ring.member_count() as u64);
        partition_ring.install(&mut partition_ring.state.write(), ring, table);

        tracing::info!(
            members = partition_ring.member_count(),
            partition_count,
            replication_factor,
            load_factor,
            "Created partition ring"
        );

        Ok(partition_ring)
    }

    /// Add a member and redistribute all partitions.
    ///
    /// Adding a name that is already present is a no-op. On error the ring
    /// and table are left exactly as they were.
    pub fn add(&self, member: M) -> Result<()> {
        let state = self.state.upgradable_read();
        let name = member.name().to_string();

        if state.ring.contains(&name) {
            tracing::debug!(member = %name, "Member already in ring");
            return Ok(());
        }

        let mut ring = state.ring.clone();
        ring.add(member, &self.hasher);
        let table = self.redistribute(&ring)?;

        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        let moved = self.install(&mut state, ring, table);
        self.metrics.members_added.inc();

        tracing::info!(
            member = %name,
            members = state.ring.member_count(),
            moved,
            "Added member to ring"
        );
        Ok(())
    }

    /// Remove a member and redistribute all partitions.
    ///
    /// Returns the removed member, or `None` if no member has that name.
    /// Removing the last member leaves every partition without an owner.
    pub fn remove(&self, name: &str) -> Result<Option<M>> {
        let state = self.state.upgradable_read();

        if !state.ring.contains(name) {
            tracing::debug!(member = %name, "Member not in ring, nothing to remove");
            return Ok(None);
        }

        let mut ring = state.ring.clone();
        let removed = ring.remove(name, &self.hasher);
        let table = if ring.member_count() == 0 {
            PartitionTable::default()
        } else {
            self.redistribute(&ring)?
        };

        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        let moved = self.install(&mut state, ring, table);
        self.metrics.members_removed.inc();

        tracing::info!(
            member = %name,
            members = state.ring.member_count(),
            moved,
            "Removed member from ring"
        );
        Ok(removed)
    }

    /// Partition a key belongs to. Depends only on the key and the
    /// partition count, never on membership.
    pub fn find_partition_id(&self, key: &[u8]) -> PartitionId {
        (self.hasher.sum64(key) % self.partition_count as u64) as PartitionId
    }

    /// Member owning the partition of `key`, `None` if the ring is empty.
    pub fn locate_key(&self, key: &[u8]) -> Option<M> {
        self.get_partition_owner(self.find_partition_id(key))
    }

    /// Member owning a partition.
    ///
    /// `None` if the ring is empty or the partition id is out of range.
    pub fn get_partition_owner(&self, partition: PartitionId) -> Option<M> {
        let state = self.state.read();
        let owner = state.table.owner(partition)?;
        state.ring.member(owner).cloned()
    }

    /// `count` distinct members, other than the owner, to hold copies of a
    /// partition.
    ///
    /// The order is stable for a given membership.
    pub fn get_partition_backups(&self, partition: PartitionId, count: usize) -> Result<Vec<M>> {
        if partition >= self.partition_count {
            return Err(Error::PartitionOutOfRange {
                partition,
                partition_count: self.partition_count,
            });
        }

        let state = self.state.read();
        let owner = state.table.owner(partition).ok_or(Error::InsufficientMemberCount {
            requested: count,
            available: 0,
        })?;
        resolve_backups(&state.ring, &self.hasher, owner, count)
    }

    /// Copy of every member, ordered by name.
    pub fn members(&self) -> Vec<M> {
        self.state.read().ring.members().cloned().collect()
    }

    /// Number of members.
    pub fn member_count(&self) -> usize {
        self.state.read().ring.member_count()
    }

    /// Check if a member is in the ring.
    pub fn contains(&self, name: &str) -> bool {
        self.state.read().ring.contains(name)
    }

    /// Partitions currently held by each member.
    pub fn load_distribution(&self) -> HashMap<String, u64> {
        self.state.read().table.loads().as_map().clone()
    }

    /// Current per-member load cap, `ceil((P / members) * load_factor)`.
    ///
    /// `0.0` when the ring is empty.
    pub fn average_load(&self) -> f64 {
        average_load_cap(self.partition_count, self.member_count(), self.load_factor)
    }

    /// Partitions owned by a member, ascending.
    pub fn partitions_of(&self, name: &str) -> Result<Vec<PartitionId>> {
        let state = self.state.read();
        if !state.ring.contains(name) {
            return Err(Error::MemberNotFound(name.to_string()));
        }
        Ok(state.table.partitions_of(name))
    }

    /// Serializable copy of the partition table.
    pub fn snapshot(&self) -> PartitionSnapshot {
        let state = self.state.read();
        PartitionSnapshot {
            owners: state.table.owners().to_vec(),
            loads: state
                .table
                .loads()
                .as_map()
                .iter()
                .map(|(name, load)| (name.clone(), *load))
                .collect(),
        }
    }

    /// Total number of partitions.
    pub fn partition_count(&self) -> usize {
        self.partition_count
    }

    /// Virtual points per member.
    pub fn replication_factor(&self) -> usize {
        self.state.read().ring.replication_factor()
    }

    /// Load factor used for the cap.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Metrics for this ring.
    pub fn metrics(&self) -> &RingMetrics {
        &self.metrics
    }

    /// Run a full distribution pass over a candidate ring.
    fn redistribute(&self, ring: &HashRing<M>) -> Result<PartitionTable> {
        let _timer = self.metrics.redistribution_duration.start_timer();
        match distribute(ring, &self.hasher, self.partition_count, self.load_factor) {
            Ok(table) => {
                self.metrics.redistributions.inc();
                Ok(table)
            }
            Err(e) => {
                self.metrics.capacity_failures.inc();
                Err(e)
            }
        }
    }

    /// Swap in a new ring and table, returning how many partitions moved.
    fn install(&self, state: &mut RingState<M>, ring: HashRing<M>, table: PartitionTable) -> usize {
        let moved = state.table.moved_partitions(&table);
        *state = RingState { ring, table };

        self.metrics.relocated_partitions.inc_by(moved as u64);
        self.metrics.update_ring_stats(
            state.ring.member_count(),
            state.ring.len(),
            average_load_cap(self.partition_count, state.ring.member_count(), self.load_factor),
        );
        moved
    }
}
