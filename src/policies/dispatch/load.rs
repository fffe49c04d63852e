//! Load dispatch policy.

use std::collections::HashMap;

use super::support::{random_choice_from_top_k, sorted_by_key};
use super::trait_::DispatchPolicy;
use crate::error::GlobalSchedulerError;
use crate::instance_info::InstanceInfo;

/// Sorts candidates ascending by `dispatch_load_metric` and returns a
/// uniformly random pick from the top-k least loaded.
#[derive(Debug, Default)]
pub struct Load;

impl DispatchPolicy for Load {
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
        let sorted = sorted_by_key(available_instance_infos, |i| i.dispatch_load_metric);
        let chosen = random_choice_from_top_k(&sorted, topk_random_dispatch);
        log::debug!(
            "load dispatch: picked {}, load={}",
            chosen.instance_id,
            chosen.dispatch_load_metric
        );
        Ok(chosen.instance_id.clone())
    }

    fn name(&self) -> &str {
        "load"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_from_least_loaded_top_k() {
        let mut policy = Load;
        let infos = vec![
            InstanceInfo {
                dispatch_load_metric: 5.0,
                ..InstanceInfo::placeholder("a")
            },
            InstanceInfo {
                dispatch_load_metric: 1.0,
                ..InstanceInfo::placeholder("b")
            },
        ];
        let id = policy
            .dispatch(&HashMap::new(), &infos, 1, None)
            .unwrap();
        assert_eq!(id, "b");
    }

    #[test]
    fn empty_candidates_is_no_candidate() {
        let mut policy = Load;
        let id = policy.dispatch(&HashMap::new(), &[], 1, None);
        assert_eq!(id, Err(GlobalSchedulerError::NoCandidate));
    }
}
