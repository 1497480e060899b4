//! Backup member resolution.
//!
//! Backups come from a second, smaller cycle built from one identity hash
//! per member (the hash of its name), separate from the virtual points.
//! The backups of a partition are the members following its owner on that
//! cycle.

use crate::error::{Error, Result};
use crate::partitioning::hashring::HashRing;
use crate::types::{Hasher, Member};

/// Resolve `count` distinct backups for the partition owned by `owner`.
///
/// Fails with [`Error::InsufficientMemberCount`] if fewer than `count`
/// members other than the owner exist, and with [`Error::MemberNotFound`]
/// if `owner` is not in the ring.
pub fn resolve_backups<M, H>(ring: &HashRing<M>, hasher: &H, owner: &str, count: usize) -> Result<Vec<M>>
where
    M: Member,
    H: Hasher,
{
    let available = ring.member_count().saturating_sub(1);
    if count > available {
        return Err(Error::InsufficientMemberCount {
            requested: count,
            available,
        });
    }

    let cycle = identity_cycle(ring, hasher);
    let owner_pos = cycle
        .iter()
        .position(|(_, name)| *name == owner)
        .ok_or_else(|| Error::MemberNotFound(owner.to_string()))?;

    let backups = (1..=count)
        .map(|step| cycle[(owner_pos + step) % cycle.len()].1)
        .filter_map(|name| ring.member(name).cloned())
        .collect();

    Ok(backups)
}

/// Members ordered by the hash of their name, ties broken by name.
fn identity_cycle<'a, M, H>(ring: &'a HashRing<M>, hasher: &H) -> Vec<(u64, &'a str)>
where
    M: Member,
    H: Hasher,
{
    let mut cycle: Vec<(u64, &str)> = ring
        .members()
        .map(|member| (hasher.sum64(member.name().as_bytes()), member.name()))
        .collect();
    cycle.sort_unstable();
    cycle
}
