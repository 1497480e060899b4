//! Metrics for monitoring a partition ring.
//!
//! Prometheus-style counters, gauges and histograms backed by atomics, so
//! recording never contends with the ring's lock.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      RingMetrics                          │
//! │  ┌──────────────────┐ ┌───────────────┐ ┌──────────────┐ │
//! │  │ Counters         │ │ Gauges        │ │ Histograms   │ │
//! │  │ - members added  │ │ - members     │ │ - redistrib. │ │
//! │  │ - members removed│ │ - ring points │ │   duration   │ │
//! │  │ - redistributions│ │ - avg load    │ │              │ │
//! │  │ - relocations    │ │               │ │              │ │
//! │  └──────────────────┘ └───────────────┘ └──────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod counters;
mod gauges;
mod histograms;

pub use counters::Counter;
pub use gauges::{FloatGauge, Gauge};
pub use histograms::{Histogram, HistogramSnapshot, HistogramTimer, REDISTRIBUTION_BUCKETS};

/// Metrics for one partition ring.
#[derive(Debug)]
pub struct RingMetrics {
    // Membership
    /// Members added.
    pub members_added: Counter,
    /// Members removed.
    pub members_removed: Counter,
    /// Current member count.
    pub members: Gauge,
    /// Current number of ring points.
    pub ring_points: Gauge,

    // Distribution
    /// Completed redistribution passes.
    pub redistributions: Counter,
    /// Mutations aborted because the load cap could not be met.
    pub capacity_failures: Counter,
    /// Partitions whose owner changed across all mutations.
    pub relocated_partitions: Counter,
    /// Current per-member load cap.
    pub average_load: FloatGauge,
    /// Time spent in a redistribution pass.
    pub redistribution_duration: Histogram,
}

impl RingMetrics {
    /// Create a zeroed metrics instance.
    pub fn new() -> Self {
        Self {
            members_added: Counter::new("ring_members_added_total", "Members added"),
            members_removed: Counter::new("ring_members_removed_total", "Members removed"),
            members: Gauge::new("ring_members", "Current member count"),
            ring_points: Gauge::new("ring_points", "Current virtual ring points"),
            redistributions: Counter::new(
                "ring_redistributions_total",
                "Completed redistribution passes",
            ),
            capacity_failures: Counter::new(
                "ring_capacity_failures_total",
                "Mutations aborted for lack of capacity",
            ),
            relocated_partitions: Counter::new(
                "ring_relocated_partitions_total",
                "Partitions that changed owner",
            ),
            average_load: FloatGauge::new("ring_average_load", "Per-member load cap"),
            redistribution_duration: Histogram::with_buckets(
                "ring_redistribution_duration_seconds",
                "Redistribution pass duration",
                REDISTRIBUTION_BUCKETS.to_vec(),
            ),
        }
    }

    /// Record the shape of the ring after a mutation was installed.
    pub fn update_ring_stats(&self, members: usize, ring_points: usize, average_load: f64) {
        self.members.set(members as i64);
        self.ring_points.set(ring_points as i64);
        self.average_load.set(average_load);
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> RingMetricsSnapshot {
        RingMetricsSnapshot {
            members_added: self.members_added.get(),
            members_removed: self.members_removed.get(),
            members: self.members.get(),
            ring_points: self.ring_points.get(),
            redistributions: self.redistributions.get(),
            capacity_failures: self.capacity_failures.get(),
            relocated_partitions: self.relocated_partitions.get(),
            average_load: self.average_load.get(),
            redistribution_duration: self.redistribution_duration.snapshot(),
        }
    }

    /// Format metrics in Prometheus exposition format.
    pub fn to_prometheus(&self) -> String {
        let mut output = String::new();

        macro_rules! add_metric {
            ($kind:literal, $metric:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $metric.name(),
                    $metric.help(),
                    $metric.name(),
                    $kind,
                    $metric.name(),
                    $metric.get()
                ));
            };
        }

        // Counters
        add_metric!("counter", self.members_added);
        add_metric!("counter", self.members_removed);
        add_metric!("counter", self.redistributions);
        add_metric!("counter", self.capacity_failures);
        add_metric!("counter", self.relocated_partitions);

        // Gauges
        add_metric!("gauge", self.members);
        add_metric!("gauge", self.ring_points);
        add_metric!("gauge", self.average_load);

        // Histograms
        let histogram = &self.redistribution_duration;
        let snap = histogram.snapshot();
        let name = histogram.name();
        output.push_str(&format!(
            "# HELP {} {}\n# TYPE {} histogram\n",
            name,
            histogram.help(),
            name
        ));
        for (upper, count) in snap.buckets.iter().zip(&snap.bucket_counts) {
            output.push_str(&format!("{}_bucket{{le=\"{}\"}} {}\n", name, upper, count));
        }
        output.push_str(&format!(
            "{}_bucket{{le=\"+Inf\"}} {}\n{}_sum {}\n{}_count {}\n",
            name, snap.count, name, snap.sum, name, snap.count
        ));

        output
    }
}

impl Default for RingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`RingMetrics`].
#[derive(Debug, Clone)]
pub struct RingMetricsSnapshot {
    pub members_added: u64,
    pub members_removed: u64,
    pub members: i64,
    pub ring_points: i64,
    pub redistributions: u64,
    pub capacity_failures: u64,
    pub relocated_partitions: u64,
    pub average_load: f64,
    pub redistribution_duration: HistogramSnapshot,
}
