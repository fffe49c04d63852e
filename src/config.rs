//! Configuration surface consumed once at `GlobalScheduler::new`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dispatch policy selection. See `policies::dispatch` for the behavior of
/// each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DispatchPolicyKind {
    Flood,
    Balanced,
    Load,
    Queue,
    RoundRobin,
    Loadv2,
}

/// Pair-migration policy selection. See `policies::migration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PairMigrationPolicyKind {
    Balanced,
    Defrag,
    Urgency,
}

/// Scaling policy selection. `Threshold` is the only variant shipped; the
/// registry indirection exists so a second variant is a pure addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalingPolicyKind {
    Threshold,
}

/// Which raw metric fed `InstanceInfo::scaling_load_metric` upstream. The
/// scaling scheduler always reads the precomputed field directly; this tag
/// exists purely to document provenance in logs, not to pick a different
/// field to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalingLoadMetric {
    NumWaitingRequests,
    NumUsedGpuBlocks,
}

/// Which sides of the fleet a `pair_migration` call should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PairMigrationConstraints {
    NoConstraints,
    PrefillRerouting,
    Decode2Decode,
    Prefill2Decode,
}

/// Top-level configuration, consumed once at construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlobalSchedulerConfig {
    pub dispatch_policy: DispatchPolicyKind,
    /// Clamped at runtime to the number of available candidates; applied
    /// only by `Load` and `Queue`.
    pub topk_random_dispatch: usize,

    pub pair_migration_policy: PairMigrationPolicyKind,
    pub migrate_out_load_threshold: f64,
    pub is_group_kind_migration_backend: bool,

    pub scale_up_threshold: f64,
    pub scale_down_threshold: f64,
    pub scaling_policy: ScalingPolicyKind,
    pub scaling_load_metric: ScalingLoadMetric,

    /// When set, `dispatch` reports `expected_steps = 1` instead of `+inf`,
    /// telling the runtime to hand off after a single step.
    pub enable_pd_disagg: bool,
}

impl GlobalSchedulerConfig {
    pub fn new(
        dispatch_policy: DispatchPolicyKind,
        topk_random_dispatch: usize,
        pair_migration_policy: PairMigrationPolicyKind,
        migrate_out_load_threshold: f64,
        is_group_kind_migration_backend: bool,
        scale_up_threshold: f64,
        scale_down_threshold: f64,
        scaling_policy: ScalingPolicyKind,
        scaling_load_metric: ScalingLoadMetric,
        enable_pd_disagg: bool,
    ) -> Self {
        Self {
            dispatch_policy,
            topk_random_dispatch,
            pair_migration_policy,
            migrate_out_load_threshold,
            is_group_kind_migration_backend,
            scale_up_threshold,
            scale_down_threshold,
            scaling_policy,
            scaling_load_metric,
            enable_pd_disagg,
        }
    }
}

impl Default for GlobalSchedulerConfig {
    fn default() -> Self {
        Self {
            dispatch_policy: DispatchPolicyKind::Load,
            topk_random_dispatch: 1,
            pair_migration_policy: PairMigrationPolicyKind::Balanced,
            migrate_out_load_threshold: f64::INFINITY,
            is_group_kind_migration_backend: false,
            scale_up_threshold: f64::INFINITY,
            scale_down_threshold: f64::NEG_INFINITY,
            scaling_policy: ScalingPolicyKind::Threshold,
            scaling_load_metric: ScalingLoadMetric::NumWaitingRequests,
            enable_pd_disagg: false,
        }
    }
}
