//! Balanced dispatch policy.

use std::collections::HashMap;

use super::trait_::DispatchPolicy;
use crate::error::GlobalSchedulerError;
use crate::instance_info::InstanceInfo;

/// Picks the instance with the **minimum** `instance_num_requests`. Ties are
/// broken deterministically by the map's iteration order.
#[derive(Debug, Default)]
pub struct Balanced;

impl DispatchPolicy for Balanced {
    fn dispatch(
        &mut self,
        instance_num_requests: &HashMap<String, i64>,
        available_instance_infos: &[InstanceInfo],
        _topk_random_dispatch: usize,
        _req_n_blocks: Option<i64>,
    ) -> Result<String, GlobalSchedulerError> {
        if available_instance_infos.is_empty() {
            return Err(GlobalSchedulerError::NoCandidate);
        }
        let instance_id = instance_num_requests
            .iter()
            .min_by_key(|(_, n)| **n)
            .map(|(id, _)| id.clone())
            .ok_or(GlobalSchedulerError::NoCandidate)?;
        log::debug!("balanced dispatch: picked {instance_id}");
        Ok(instance_id)
    }

    fn name(&self) -> &str {
        "balanced"
    }
}
