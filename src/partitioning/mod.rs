//! Partitioning module for assigning partitions to members.
//!
//! Keys hash into a fixed number of partitions; partitions are assigned to
//! members with consistent hashing and a hard per-member load cap:
//! - A key always maps to the same partition
//! - No member holds more than `ceil((P / members) * load_factor)` partitions
//! - Adding or removing a member relocates few partitions
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PartitionRing (RwLock)                    │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │                    HashRing                           │  │
//! │  │  ┌────┐ ┌────┐ ┌────┐ ┌────┐ ┌────┐ ┌────┐          │  │
//! │  │  │ A0 │→│ C1 │→│ B0 │→│ A1 │→│ B1 │→│ C0 │          │  │
//! │  │  └────┘ └────┘ └────┘ └────┘ └────┘ └────┘          │  │
//! │  │       replication_factor points per member            │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │  PartitionTable: partition → owner (rebuilt per mutation)   │
//! │                                                             │
//! │  Key "user:123" → hash % P → partition 42 → owner B         │
//! │                  backups: next members on the name cycle    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use bounded_ring::{Config, PartitionRing, XxHasher};
//!
//! let config = Config::new(XxHasher)
//!     .with_partition_count(271)
//!     .with_replication_factor(20)
//!     .with_load_factor(1.25);
//! let members: Vec<String> = (0..4).map(|i| format!("node{}", i)).collect();
//! let ring = PartitionRing::new(members, config)?;
//!
//! let owner = ring.locate_key(b"user:123").expect("ring has members");
//! let partition = ring.find_partition_id(b"user:123");
//! let backups = ring.get_partition_backups(partition, 2)?;
//! assert!(!backups.contains(&owner));
//! # Ok::<(), bounded_ring::Error>(())
//! ```

mod backups;
mod distribution;
mod hashring;
mod ring;
mod snapshot;

pub use backups::resolve_backups;
pub use distribution::{average_load_cap, distribute, partition_key, LoadTracker, PartitionTable};
pub use hashring::HashRing;
pub use ring::PartitionRing;
pub use snapshot::{PartitionMove, PartitionSnapshot};
