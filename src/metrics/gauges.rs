//! Gauges for values that go up and down.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// An integer gauge.
#[derive(Debug)]
pub struct Gauge {
    name: &'static str,
    help: &'static str,
    value: AtomicI64,
}

impl Gauge {
    /// Create a new gauge at zero.
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            value: AtomicI64::new(0),
        }
    }

    /// Metric name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Help text.
    pub fn help(&self) -> &'static str {
        self.help
    }

    /// Set the value.
    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }

    /// Current value.
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// A floating-point gauge.
#[derive(Debug)]
pub struct FloatGauge {
    name: &'static str,
    help: &'static str,
    // f64 bits
    value: AtomicU64,
}

impl FloatGauge {
    /// Create a new gauge at 0.0.
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            value: AtomicU64::new(0),
        }
    }

    /// Metric name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Help text.
    pub fn help(&self) -> &'static str {
        self.help
    }

    /// Set the value.
    pub fn set(&self, value: f64) {
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Current value.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge() {
        let gauge = Gauge::new("ring_members", "Members");
        gauge.set(3);
        assert_eq!(gauge.get(), 3);
        gauge.set(1);
        assert_eq!(gauge.get(), 1);
    }

    #[test]
    fn test_float_gauge() {
        let gauge = FloatGauge::new("ring_average_load", "Average load");
        assert_eq!(gauge.get(), 0.0);
        gauge.set(3.0);
        assert_eq!(gauge.get(), 3.0);
    }
}
