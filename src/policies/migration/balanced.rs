//! Balanced pair-migration policy — anti-ping-pong guarded load balancing.

use std::any::Any;

use super::trait_::PairMigrationPolicy;
use crate::instance_info::InstanceInfo;

/// Pairs the most-loaded src instances with the least-loaded dst instances,
/// in lockstep, accepting a pair only if the migration strictly reduces the
/// load imbalance without overloading the receiver (the anti-ping-pong
/// guard), or if the receiver is entirely empty.
#[derive(Debug, Clone, Copy)]
pub struct Balanced {
    pub migrate_out_load_threshold: f64,
}

impl Balanced {
    pub fn new(migrate_out_load_threshold: f64) -> Self {
        Self {
            migrate_out_load_threshold,
        }
    }
}

impl PairMigrationPolicy for Balanced {
    fn pair_migration(
        &self,
        src_instance_infos: &[InstanceInfo],
        dst_instance_infos: &[InstanceInfo],
    ) -> Vec<(String, String)> {
        let mut src: Vec<&InstanceInfo> = src_instance_infos.iter().collect();
        src.sort_by(|a, b| {
            b.migration_load_metric
                .partial_cmp(&a.migration_load_metric)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut dst: Vec<&InstanceInfo> = dst_instance_infos.iter().collect();
        dst.sort_by(|a, b| {
            a.migration_load_metric
                .partial_cmp(&b.migration_load_metric)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut pairs = Vec::new();
        for i in 0..src.len().min(dst.len()) {
            let s = src[i];
            let d = dst[i];
            let diff_before = s.migration_load_metric - d.migration_load_metric;
            let dst_after = d.migration_load_metric_after_migrate_in;
            let src_after = s.migration_load_metric_after_migrate_out;
            let diff_after = src_after - dst_after;

            if dst_after > self.migrate_out_load_threshold {
                log::debug!(
                    "balanced migration: rejecting {} -> {}, receiver would overload ({dst_after} > {})",
                    s.instance_id,
                    d.instance_id,
                    self.migrate_out_load_threshold
                );
                continue;
            }
            let improves = diff_after > 0.0 && diff_after < diff_before;
            let receiver_empty = d.migration_load_metric == f64::NEG_INFINITY;
            if improves || receiver_empty {
                log::debug!("balanced migration: accepting {} -> {}", s.instance_id, d.instance_id);
                pairs.push((s.instance_id.clone(), d.instance_id.clone()));
            } else {
                log::debug!(
                    "balanced migration: rejecting {} -> {}, would not reduce imbalance",
                    s.instance_id,
                    d.instance_id
                );
            }
        }
        pairs
    }

    fn name(&self) -> &str {
        "balanced"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
