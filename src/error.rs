//! Error types for the bounded-load partition ring.

use thiserror::Error;

use crate::types::PartitionId;

/// Result type alias for partition ring operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the partition ring.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Not enough members besides the owner to satisfy a backup request.
    #[error("insufficient member count: requested {requested} backups, only {available} available")]
    InsufficientMemberCount { requested: usize, available: usize },

    /// No member with this name is part of the ring.
    #[error("member not found: {0}")]
    MemberNotFound(String),

    /// Partition id outside `[0, partition_count)`.
    #[error("partition {partition} out of range (partition count {partition_count})")]
    PartitionOutOfRange {
        partition: PartitionId,
        partition_count: usize,
    },

    /// A distribution pass walked the whole ring without finding a member
    /// below the load cap.
    ///
    /// Retrying with the same inputs cannot succeed. Increase the partition
    /// count, replication factor, load factor or member count.
    #[error(
        "not enough room to distribute partition {partition}: average load {average_load}, \
         {members} members, {ring_points} ring points"
    )]
    CapacityExhausted {
        partition: PartitionId,
        average_load: f64,
        members: usize,
        ring_points: usize,
    },

    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the caller can recover by changing its request.
    ///
    /// Capacity exhaustion and bad configuration are bugs in how the ring is
    /// sized and never go away on their own.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InsufficientMemberCount { .. }
                | Error::MemberNotFound(_)
                | Error::PartitionOutOfRange { .. }
        )
    }
}
