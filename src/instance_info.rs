//! Per-instance telemetry snapshot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable per-instance telemetry record pushed in by the instance's own
/// worker process.
///
/// # Invariants
///
/// - `0 <= num_used_gpu_blocks + num_watermark_blocks <= num_total_gpu_blocks`
/// - `num_free_gpu_blocks == num_total_gpu_blocks - num_used_gpu_blocks`
///
/// Both are checked with `debug_assert!` in [`InstanceInfo::new`]: malformed
/// telemetry is a caller bug, not a condition this crate recovers from.
///
/// Block counters are `i64` rather than `u64`. Placement arithmetic over a
/// fleet (slack, overshoot) routinely produces negative intermediate values
/// before being filtered by a policy, and `i64` keeps that arithmetic free of
/// casts at every call site.
///
/// `-inf` is a first-class value for the load metrics: it means "no load at
/// all, treat as an empty instance", and several migration/dispatch rules
/// special-case it explicitly rather than treating it as missing data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstanceInfo {
    pub instance_id: String,

    pub num_total_gpu_blocks: i64,
    pub num_used_gpu_blocks: i64,
    pub num_free_gpu_blocks: i64,
    pub num_watermark_blocks: i64,

    pub num_waiting_requests: i64,
    pub num_running_requests: i64,
    pub num_blocks_all_waiting_requests: i64,

    pub sum_pending: f64,
    pub max_pending: f64,

    pub dispatch_load_metric: f64,
    pub migration_load_metric: f64,
    pub migration_load_metric_after_migrate_out: f64,
    pub migration_load_metric_after_migrate_in: f64,
    pub scaling_load_metric: f64,
}

impl InstanceInfo {
    /// Builds a snapshot, checking the block-accounting invariants in debug
    /// builds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instance_id: impl Into<String>,
        num_total_gpu_blocks: i64,
        num_used_gpu_blocks: i64,
        num_watermark_blocks: i64,
        num_waiting_requests: i64,
        num_running_requests: i64,
        num_blocks_all_waiting_requests: i64,
        sum_pending: f64,
        max_pending: f64,
        dispatch_load_metric: f64,
        migration_load_metric: f64,
        migration_load_metric_after_migrate_out: f64,
        migration_load_metric_after_migrate_in: f64,
        scaling_load_metric: f64,
    ) -> Self {
        let num_free_gpu_blocks = num_total_gpu_blocks - num_used_gpu_blocks;
        debug_assert!(num_used_gpu_blocks + num_watermark_blocks <= num_total_gpu_blocks);
        debug_assert!(num_used_gpu_blocks + num_watermark_blocks >= 0);
        Self {
            instance_id: instance_id.into(),
            num_total_gpu_blocks,
            num_used_gpu_blocks,
            num_free_gpu_blocks,
            num_watermark_blocks,
            num_waiting_requests,
            num_running_requests,
            num_blocks_all_waiting_requests,
            sum_pending,
            max_pending,
            dispatch_load_metric,
            migration_load_metric,
            migration_load_metric_after_migrate_out,
            migration_load_metric_after_migrate_in,
            scaling_load_metric,
        }
    }

    /// All-zero snapshot inserted by `scale_up` so a newly joined instance is
    /// already a valid dispatch target before its first real telemetry push
    /// arrives.
    pub fn placeholder(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            num_total_gpu_blocks: 0,
            num_used_gpu_blocks: 0,
            num_free_gpu_blocks: 0,
            num_watermark_blocks: 0,
            num_waiting_requests: 0,
            num_running_requests: 0,
            num_blocks_all_waiting_requests: 0,
            sum_pending: 0.0,
            max_pending: 0.0,
            dispatch_load_metric: 0.0,
            migration_load_metric: 0.0,
            migration_load_metric_after_migrate_out: 0.0,
            migration_load_metric_after_migrate_in: 0.0,
            scaling_load_metric: 0.0,
        }
    }

    /// Average pending time across waiting requests (`0` denominator guarded
    /// by a small epsilon, matching the reference implementation's
    /// `sum_pending / (num_waiting_requests + eps)`).
    pub fn avg_pending(&self) -> f64 {
        const EPS: f64 = 1e-5;
        self.sum_pending / (self.num_waiting_requests as f64 + EPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_all_zero() {
        let info = InstanceInfo::placeholder("i0");
        assert_eq!(info.instance_id, "i0");
        assert_eq!(info.num_total_gpu_blocks, 0);
        assert_eq!(info.num_free_gpu_blocks, 0);
        assert_eq!(info.dispatch_load_metric, 0.0);
    }

    #[test]
    fn new_derives_free_blocks() {
        let info = InstanceInfo::new(
            "i0", 100, 40, 5, 0, 2, 0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        );
        assert_eq!(info.num_free_gpu_blocks, 60);
    }

    #[test]
    fn neg_infinity_sentinel_is_well_defined() {
        let info = InstanceInfo::new(
            "i0",
            100,
            0,
            5,
            0,
            0,
            0,
            0.0,
            0.0,
            0.0,
            f64::NEG_INFINITY,
            0.0,
            0.0,
            0.0,
        );
        assert_eq!(info.migration_load_metric, f64::NEG_INFINITY);
        assert!(info.migration_load_metric.is_infinite());
    }
}
