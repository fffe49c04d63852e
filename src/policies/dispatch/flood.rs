//! Flood dispatch policy — test-only, intentionally anti-balanced.

use std::collections::HashMap;

use super::trait_::DispatchPolicy;
use crate::error::GlobalSchedulerError;
use crate::instance_info::InstanceInfo;

/// Always picks the instance with the **maximum** `instance_num_requests`.
/// Used only in tests, to deliberately concentrate load on one instance.
#[derive(Debug, Default)]
pub struct Flood;

impl DispatchPolicy for Flood {
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
            .max_by_key(|(_, n)| **n)
            .map(|(id, _)| id.clone())
            .ok_or(GlobalSchedulerError::NoCandidate)?;
        log::debug!("flood dispatch: picked {instance_id}");
        Ok(instance_id)
    }

    fn name(&self) -> &str {
        "flood"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_max() {
        let mut policy = Flood;
        let counts = HashMap::from([
            ("a".to_string(), 3i64),
            ("b".to_string(), 1),
            ("c".to_string(), 5),
        ]);
        let infos = vec![InstanceInfo::placeholder("a")];
        let id = policy.dispatch(&counts, &infos, 1, None).unwrap();
        assert_eq!(id, "c");
    }

    #[test]
    fn empty_candidates_is_no_candidate() {
        let mut policy = Flood;
        let counts = HashMap::new();
        let id = policy.dispatch(&counts, &[], 1, None);
        assert_eq!(id, Err(GlobalSchedulerError::NoCandidate));
    }
}
