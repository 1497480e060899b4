//! Consistent hashing with bounded loads.
//!
//! This crate assigns a fixed number of partitions to a dynamic set of named
//! members. It is the placement layer of a distributed store: it decides
//! which member owns a key and which members hold its backups, and leaves
//! data movement, transport and membership discovery to the caller.
//!
//! # Features
//!
//! - Stable key → partition mapping, independent of membership
//! - Virtual ring points per member for smooth distribution
//! - Hard per-member load cap, deflecting to the next ring point when full
//! - Full, atomic redistribution on every add/remove
//! - Deterministic backup selection from a separate member cycle
//!
//! # Example
//!
//! ```rust
//! use bounded_ring::{Config, PartitionRing, XxHasher};
//!
//! let config = Config::new(XxHasher).with_partition_count(7).with_replication_factor(3);
//! let ring = PartitionRing::new(vec!["A".to_string(), "B".to_string()], config)?;
//!
//! ring.add("C".to_string())?;
//! assert_eq!(ring.average_load(), 3.0);
//!
//! ring.remove("A")?;
//! assert_eq!(ring.member_count(), 2);
//! # Ok::<(), bounded_ring::Error>(())
//! ```
//!
//! # Consistency Model
//!
//! - **Mutations**: serialized; the new ring and table are installed together
//! - **Reads**: shared; always observe the table of a completed mutation
//! - **Failures**: a mutation that cannot satisfy the load cap changes nothing

pub mod config;
pub mod error;
pub mod metrics;
pub mod partitioning;
pub mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use types::{Hasher, Member, PartitionId, XxHasher};

// Re-export partitioning types
pub use partitioning::{HashRing, PartitionMove, PartitionRing, PartitionSnapshot, PartitionTable};

// Re-export metrics types
pub use metrics::{RingMetrics, RingMetricsSnapshot};
