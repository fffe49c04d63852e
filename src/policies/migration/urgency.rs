//! Urgency policy — drives redispatch of waiting requests rather than batch pair migration.

use std::any::Any;

use super::trait_::{PairMigrationPolicy, RedispatchPolicy};
use crate::instance_info::InstanceInfo;

const EPS: f64 = 1e-5;

/// `Urgency` does not implement batch pair migration; it drives redispatch
/// of long-waiting requests instead, via [`RedispatchPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Urgency;

impl PairMigrationPolicy for Urgency {
    fn pair_migration(
        &self,
        _src_instance_infos: &[InstanceInfo],
        _dst_instance_infos: &[InstanceInfo],
    ) -> Vec<(String, String)> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "urgency"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RedispatchPolicy for Urgency {
    fn get_src_instances(&self, src_instance_infos: &[InstanceInfo]) -> Vec<String> {
        let mut candidates: Vec<&InstanceInfo> = src_instance_infos
            .iter()
            .filter(|i| i.num_waiting_requests > 0)
            .collect();
        candidates.sort_by(|a, b| b.num_waiting_requests.cmp(&a.num_waiting_requests));
        candidates.into_iter().map(|i| i.instance_id.clone()).collect()
    }

    fn get_dst_instance(
        &self,
        dst_instance_infos: &[InstanceInfo],
        src_id: &str,
        request_n_blocks: i64,
    ) -> Option<String> {
        let mut admissible: Vec<&InstanceInfo> = dst_instance_infos
            .iter()
            .filter(|i| i.num_free_gpu_blocks - i.num_watermark_blocks - request_n_blocks > 0)
            .collect();
        if admissible.is_empty() {
            log::debug!("urgency redispatch: no admissible destination for {request_n_blocks} blocks");
            return None;
        }
        admissible.sort_by(|a, b| {
            let score_a = a.num_free_gpu_blocks as f64 / (a.num_running_requests as f64 + EPS);
            let score_b = b.num_free_gpu_blocks as f64 / (b.num_running_requests as f64 + EPS);
            score_b.partial_cmp(&score_a).unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = admissible[0];
        if best.instance_id == src_id {
            log::debug!("urgency redispatch: best destination is the source itself, skipping");
            return None;
        }
        Some(best.instance_id.clone())
    }
}
