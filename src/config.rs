//! Configuration types for the partition ring.

use crate::error::{Error, Result};
use crate::types::Hasher;

/// Default number of partitions.
pub const DEFAULT_PARTITION_COUNT: usize = 271;

/// Default number of virtual ring points per member.
pub const DEFAULT_REPLICATION_FACTOR: usize = 20;

/// Default slack over perfectly even load.
pub const DEFAULT_LOAD_FACTOR: f64 = 1.25;

/// Configuration for a [`PartitionRing`](crate::PartitionRing).
///
/// Fixed once the ring is constructed.
#[derive(Debug, Clone)]
pub struct Config<H> {
    /// Hash function for keys, partitions and ring points.
    pub hasher: H,

    /// Total number of partitions.
    pub partition_count: usize,

    /// Number of virtual points each member places on the ring.
    pub replication_factor: usize,

    /// Multiplier over the even share used for the per-member load cap.
    pub load_factor: f64,
}

impl<H: Hasher> Config<H> {
    /// Create a configuration with default sizing around the given hasher.
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            partition_count: DEFAULT_PARTITION_COUNT,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Set the partition count.
    pub fn with_partition_count(mut self, partition_count: usize) -> Self {
        self.partition_count = partition_count;
        self
    }

    /// Set the number of virtual points per member.
    pub fn with_replication_factor(mut self, replication_factor: usize) -> Self {
        self.replication_factor = replication_factor;
        self
    }

    /// Set the load factor.
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Check that the sizing can describe a usable ring.
    pub fn validate(&self) -> Result<()> {
        if self.partition_count == 0 {
            return Err(Error::Config("partition_count must be > 0".to_string()));
        }
        if self.replication_factor == 0 {
            return Err(Error::Config("replication_factor must be > 0".to_string()));
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(Error::Config(format!(
                "load_factor must be a positive finite number, got {}",
                self.load_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::XxHasher;

    #[test]
    fn test_defaults() {
        let config = Config::new(XxHasher);
        assert_eq!(config.partition_count, 271);
        assert_eq!(config.replication_factor, 20);
        assert_eq!(config.load_factor, 1.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = Config::new(XxHasher)
            .with_partition_count(7)
            .with_replication_factor(3)
            .with_load_factor(1.5);

        assert_eq!(config.partition_count, 7);
        assert_eq!(config.replication_factor, 3);
        assert_eq!(config.load_factor, 1.5);
    }

    #[test]
    fn test_validate_rejects_bad_sizing() {
        assert!(matches!(
            Config::new(XxHasher).with_partition_count(0).validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::new(XxHasher).with_replication_factor(0).validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::new(XxHasher).with_load_factor(0.0).validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::new(XxHasher).with_load_factor(f64::NAN).validate(),
            Err(Error::Config(_))
        ));
    }
}
