//! Queue dispatch policy.

use std::collections::HashMap;

use super::support::{random_choice_from_top_k, sorted_by_key};
use super::trait_::DispatchPolicy;
use crate::error::GlobalSchedulerError;
use crate::instance_info::InstanceInfo;

/// Sorts candidates ascending by `num_waiting_requests` and returns a
/// uniformly random pick from the top-k shallowest queues.
#[derive(Debug, Default)]
pub struct Queue;

impl DispatchPolicy for Queue {
    fn dispatch(
        &mut self,
        _instance_num_requests: &HashMap<String, i64>,
        available_instance_infos: &[InstanceInfo],
        topk_random_dispatch: usize,
        _req_n_blocks: Option<i64>,
    ) -> Result<String, GlobalSchedulerError> {
        if available_instance_infos.is_empty() {
            return Err(GlobalSchedulerError::NoCandidate);
        }
        let sorted = sorted_by_key(available_instance_infos, |i| i.num_waiting_requests as f64);
        let chosen = random_choice_from_top_k(&sorted, topk_random_dispatch);
        log::debug!(
            "queue dispatch: picked {}, queue={}",
            chosen.instance_id,
            chosen.num_waiting_requests
        );
        Ok(chosen.instance_id.clone())
    }

    fn name(&self) -> &str {
        "queue"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_from_shallowest_top_k() {
        let mut policy = Queue;
        let infos = vec![
            InstanceInfo {
                num_waiting_requests: 9,
                ..InstanceInfo::placeholder("a")
            },
            InstanceInfo {
                num_waiting_requests: 0,
                ..InstanceInfo::placeholder("b")
            },
        ];
        let id = policy
            .dispatch(&HashMap::new(), &infos, 1, None)
            .unwrap();
        assert_eq!(id, "b");
    }
}
