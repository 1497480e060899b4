//! Consistent hash ring with virtual points.
//!
//! Each member is represented by `replication_factor` points on a 64 bit
//! ring. The points are kept in an ascending vector for binary search, with a
//! side map from point to owning member name.

use crate::types::{Hasher, Member};
use std::collections::{BTreeMap, HashMap};

/// A consistent hash ring of members.
#[derive(Debug, Clone)]
pub struct HashRing<M> {
    /// Ring point to the name of the member that placed it.
    points: HashMap<u64, String>,

    /// All ring points, ascending. One entry per (member, replica index).
    sorted: Vec<u64>,

    /// Members by name.
    members: BTreeMap<String, M>,

    /// Number of virtual points per member.
    replication_factor: usize,
}

impl<M: Member> HashRing<M> {
    /// Create a new empty ring.
    pub fn new(replication_factor: usize) -> Self {
        Self {
            points: HashMap::new(),
            sorted: Vec::new(),
            members: BTreeMap::new(),
            replication_factor,
        }
    }

    /// Number of virtual points per member.
    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    /// Number of members in the ring.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Number of points on the ring.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Whether the ring has no points.
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Check if a member is in the ring.
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Look up a member by name.
    pub fn member(&self, name: &str) -> Option<&M> {
        self.members.get(name)
    }

    /// Members ordered by name.
    pub fn members(&self) -> impl Iterator<Item = &M> + '_ {
        self.members.values()
    }

    /// Ring points in ascending order.
    pub fn sorted_points(&self) -> &[u64] {
        &self.sorted
    }

    /// Add a member, placing its virtual points.
    ///
    /// Returns `false` without touching the ring if a member with the same
    /// name is already present.
    pub fn add<H: Hasher>(&mut self, member: M, hasher: &H) -> bool {
        let name = member.name().to_string();
        if self.members.contains_key(&name) {
            return false;
        }

        for i in 0..self.replication_factor {
            let point = virtual_point(hasher, &name, i);
            // Last write wins on a collision.
            if let Some(previous) = self.points.insert(point, name.clone()) {
                if previous != name {
                    tracing::warn!(
                        point,
                        previous = %previous,
                        member = %name,
                        "Ring point collision, point reassigned"
                    );
                }
            }
            self.sorted.push(point);
        }
        self.sorted.sort_unstable();

        self.members.insert(name, member);
        true
    }

    /// Remove a member and its virtual points.
    ///
    /// Returns the removed member, or `None` if no member has that name.
    pub fn remove<H: Hasher>(&mut self, name: &str, hasher: &H) -> Option<M> {
        let member = self.members.remove(name)?;

        let mut released = Vec::new();
        for i in 0..self.replication_factor {
            let point = virtual_point(hasher, name, i);
            if self.points.get(&point).map(String::as_str) == Some(name) {
                self.points.remove(&point);
                released.push(point);
            }
            // Vec::remove shifts the tail, keeping the order intact.
            if let Ok(idx) = self.sorted.binary_search(&point) {
                self.sorted.remove(idx);
            }
        }

        // A point this member won on a collision may still be placed by
        // another member; hand it back.
        for point in released {
            if self.sorted.binary_search(&point).is_err() {
                continue;
            }
            if let Some(heir) = self.member_placing(point, hasher) {
                tracing::debug!(point, member = %heir, "Ring point reassigned after removal");
                self.points.insert(point, heir);
            }
        }

        Some(member)
    }

    /// Name of a member with a virtual point at `point`.
    fn member_placing<H: Hasher>(&self, point: u64, hasher: &H) -> Option<String> {
        self.members
            .keys()
            .find(|name| (0..self.replication_factor).any(|i| virtual_point(hasher, name, i) == point))
            .cloned()
    }

    /// Index of the first point `>= hash`, wrapping to 0 past the end.
    ///
    /// Returns `None` if the ring is empty.
    pub fn nearest_index(&self, hash: u64) -> Option<usize> {
        if self.sorted.is_empty() {
            return None;
        }
        let idx = self.sorted.partition_point(|&point| point < hash);
        if idx >= self.sorted.len() {
            Some(0)
        } else {
            Some(idx)
        }
    }

    /// Name of the member owning the point at `idx` in the sorted set.
    pub fn owner_at(&self, idx: usize) -> Option<&str> {
        let point = self.sorted.get(idx)?;
        self.points.get(point).map(String::as_str)
    }
}

/// Hash of the `replica`-th virtual point of member `name`.
pub(crate) fn virtual_point<H: Hasher>(hasher: &H, name: &str, replica: usize) -> u64 {
    let key = format!("{}{}", name, replica);
    hasher.sum64(key.as_bytes())
}
