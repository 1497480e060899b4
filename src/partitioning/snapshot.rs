//! Serializable copies of the partition table.

use crate::types::PartitionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Owner of every partition at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSnapshot {
    /// Owner name indexed by partition id. Empty when the ring had no members.
    pub owners: Vec<String>,

    /// Partitions held per member.
    pub loads: BTreeMap<String, u64>,
}

impl PartitionSnapshot {
    /// Owner of a partition.
    pub fn owner(&self, partition: PartitionId) -> Option<&str> {
        self.owners.get(partition).map(String::as_str)
    }

    /// Partitions whose owner differs between `self` and `after`.
    pub fn diff(&self, after: &PartitionSnapshot) -> Vec<PartitionMove> {
        let len = self.owners.len().max(after.owners.len());
        (0..len)
            .filter_map(|partition| {
                let from = self.owner(partition);
                let to = after.owner(partition);
                (from != to).then(|| PartitionMove {
                    partition,
                    from: from.map(str::to_string),
                    to: to.map(str::to_string),
                })
            })
            .collect()
    }
}

/// A partition changing hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionMove {
    /// Partition that moved.
    pub partition: PartitionId,
    /// Previous owner, `None` if the partition had none.
    pub from: Option<String>,
    /// New owner, `None` if the ring became empty.
    pub to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(owners: &[&str]) -> PartitionSnapshot {
        let mut loads = BTreeMap::new();
        for owner in owners {
            *loads.entry(owner.to_string()).or_insert(0) += 1;
        }
        PartitionSnapshot {
            owners: owners.iter().map(|o| o.to_string()).collect(),
            loads,
        }
    }

    #[test]
    fn test_diff_same() {
        let a = snapshot(&["A", "B", "A"]);
        assert!(a.diff(&a.clone()).is_empty());
    }

    #[test]
    fn test_diff_moves() {
        let before = snapshot(&["A", "B", "A"]);
        let after = snapshot(&["A", "C", "C"]);

        let moves = before.diff(&after);
        assert_eq!(
            moves,
            vec![
                PartitionMove {
                    partition: 1,
                    from: Some("B".into()),
                    to: Some("C".into()),
                },
                PartitionMove {
                    partition: 2,
                    from: Some("A".into()),
                    to: Some("C".into()),
                },
            ]
        );
    }

    #[test]
    fn test_diff_from_empty() {
        let moves = PartitionSnapshot::default().diff(&snapshot(&["A", "A"]));
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| m.from.is_none()));
    }

    #[test]
    fn test_serde() {
        let before = snapshot(&["A", "B"]);
        let json = serde_json::to_string(&before).unwrap();
        let decoded: PartitionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, before);
    }
}
