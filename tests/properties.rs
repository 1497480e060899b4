// Test code is allowed to panic on failure
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

//! Property-based tests for the partition ring.
//!
//! Uses proptest to generate membership histories and verify invariants.

use proptest::prelude::*;
use std::collections::HashSet;

use bounded_ring::{Config, Error, PartitionRing, XxHasher};

/// A membership change.
#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Remove(String),
}

/// Size of the member name pool.
const POOL: usize = 12;

/// Strategy for member names drawn from a small pool, so removes hit.
fn member_name() -> impl Strategy<Value = String> {
    (0..POOL).prop_map(|i| format!("member-{}", i))
}

/// Strategy for a sequence of adds and removes.
fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => member_name().prop_map(Op::Add),
            1 => member_name().prop_map(Op::Remove),
        ],
        0..30,
    )
}

/// Strategy for partition counts.
fn partition_count() -> impl Strategy<Value = usize> {
    1..300usize
}

/// Strategy for partition counts that every pool size can hold.
///
/// The even share `P / members` rounds down, so fewer partitions than
/// members gives a cap of zero.
fn roomy_partition_count() -> impl Strategy<Value = usize> {
    POOL..300usize
}

fn config(partition_count: usize) -> Config<XxHasher> {
    Config::new(XxHasher)
        .with_partition_count(partition_count)
        .with_replication_factor(10)
        .with_load_factor(1.25)
}

fn apply(ring: &PartitionRing<String, XxHasher>, ops: &[Op]) {
    for op in ops {
        match op {
            Op::Add(name) => ring.add(name.clone()).unwrap(),
            Op::Remove(name) => {
                ring.remove(name).unwrap();
            }
        }
    }
}

proptest! {
    /// Property: every key maps into [0, P).
    #[test]
    fn partition_id_in_range(
        key in prop::collection::vec(any::<u8>(), 0..64),
        partitions in partition_count(),
    ) {
        let ring: PartitionRing<String, _> = PartitionRing::new(Vec::new(), config(partitions)).unwrap();
        prop_assert!(ring.find_partition_id(&key) < partitions);
    }

    /// Property: after any history the table is total, sums to P and
    /// respects the load cap; an empty ring owns nothing.
    #[test]
    fn table_is_complete_and_bounded(ops in ops(), partitions in roomy_partition_count()) {
        let ring: PartitionRing<String, _> = PartitionRing::new(Vec::new(), config(partitions)).unwrap();
        apply(&ring, &ops);

        let members: HashSet<String> = ring.members().into_iter().collect();
        let loads = ring.load_distribution();

        if members.is_empty() {
            prop_assert!(loads.is_empty());
            prop_assert!(ring.snapshot().owners.is_empty());
            prop_assert!(ring.get_partition_owner(0).is_none());
        } else {
            let cap = ring.average_load() as u64;
            prop_assert_eq!(loads.values().sum::<u64>(), partitions as u64);
            prop_assert!(loads.values().all(|&load| load <= cap));

            for partition in 0..partitions {
                let owner = ring.get_partition_owner(partition);
                prop_assert!(owner.map_or(false, |o| members.contains(&o)));
            }
            for (name, load) in &loads {
                prop_assert_eq!(ring.partitions_of(name).unwrap().len() as u64, *load);
            }
        }
    }

    /// Property: backups are distinct, exclude the owner, and fail only when
    /// there are not enough other members.
    #[test]
    fn backups_are_distinct_non_owners(
        members in 1..10usize,
        count in 0..12usize,
        partition in 0..64usize,
    ) {
        let names: Vec<String> = (0..members).map(|i| format!("member-{}", i)).collect();
        let ring = PartitionRing::new(names, config(64)).unwrap();

        match ring.get_partition_backups(partition, count) {
            Ok(backups) => {
                prop_assert!(count < members);
                prop_assert_eq!(backups.len(), count);
                let owner = ring.get_partition_owner(partition).unwrap();
                prop_assert!(!backups.contains(&owner));
                let unique: HashSet<&String> = backups.iter().collect();
                prop_assert_eq!(unique.len(), count);
            }
            Err(e) => {
                prop_assert!(count > members - 1);
                prop_assert_eq!(e, Error::InsufficientMemberCount {
                    requested: count,
                    available: members - 1,
                });
            }
        }
    }

    /// Property: fewer partitions than members cannot be distributed, and
    /// the failure is reported rather than installed.
    #[test]
    fn too_few_partitions_exhaust_capacity(members in 2..POOL, extra in 0..POOL) {
        let partitions = members - 1 - extra % (members - 1);
        let names: Vec<String> = (0..members).map(|i| format!("member-{}", i)).collect();
        let result = PartitionRing::new(names, config(partitions));
        prop_assert!(
            matches!(result, Err(Error::CapacityExhausted { .. })),
            "expected capacity error"
        );
    }

    /// Property: adding an existing member changes nothing.
    #[test]
    fn add_is_idempotent(ops in ops()) {
        let ring: PartitionRing<String, _> = PartitionRing::new(Vec::new(), config(128)).unwrap();
        apply(&ring, &ops);

        for member in ring.members() {
            let before = ring.snapshot();
            ring.add(member).unwrap();
            prop_assert_eq!(ring.snapshot(), before);
        }
    }

    /// Property: identical histories produce identical tables.
    #[test]
    fn distribution_is_deterministic(ops in ops(), partitions in roomy_partition_count()) {
        let a: PartitionRing<String, _> = PartitionRing::new(Vec::new(), config(partitions)).unwrap();
        let b: PartitionRing<String, _> = PartitionRing::new(Vec::new(), config(partitions)).unwrap();
        apply(&a, &ops);
        apply(&b, &ops);

        prop_assert_eq!(a.snapshot(), b.snapshot());
    }

    /// Property: adding one member to n relocates far fewer than all
    /// partitions.
    #[test]
    fn relocation_is_bounded(members in 2..8usize) {
        let names: Vec<String> = (0..members).map(|i| format!("member-{}", i)).collect();
        let ring = PartitionRing::new(names, config(271)).unwrap();
        let before = ring.snapshot();

        ring.add("member-new".to_string()).unwrap();
        let moved = before.diff(&ring.snapshot()).len();

        // An ideal move is 271 / (members + 1); allow deflection slack.
        prop_assert!(moved * (members + 1) <= 271 * 2, "moved {} of 271", moved);
    }
}
