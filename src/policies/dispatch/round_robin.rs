//! Round-robin dispatch policy.

use std::collections::HashMap;

use super::trait_::DispatchPolicy;
use crate::error::GlobalSchedulerError;
use crate::instance_info::InstanceInfo;

/// Cycles through known instance ids in lexicographic order.
///
/// The cursor is **not** remapped when membership changes; it simply wraps
/// modulo the current count, so a scale-down or scale-up can shift which
/// concrete id a given cursor value lands on without the policy itself doing
/// anything special.
#[derive(Debug)]
pub struct RoundRobin {
    prev_idx: i64,
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundRobin {
    pub fn new() -> Self {
        Self { prev_idx: -1 }
    }
}

impl DispatchPolicy for RoundRobin {
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
        let mut ids: Vec<&String> = instance_num_requests.keys().collect();
        ids.sort();
        let n = ids.len() as i64;
        let next_idx = (self.prev_idx + 1).rem_euclid(n);
        self.prev_idx = next_idx;
        let instance_id = ids[next_idx as usize].clone();
        log::debug!("round-robin dispatch: picked {instance_id}");
        Ok(instance_id)
    }

    fn name(&self) -> &str {
        "rr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(ids: &[&str]) -> HashMap<String, i64> {
        ids.iter().map(|id| (id.to_string(), 0)).collect()
    }

    #[test]
    fn s4_cycles_in_lexicographic_order() {
        let mut policy = RoundRobin::new();
        let counts = counts(&["x", "y", "z"]);
        let infos = vec![InstanceInfo::placeholder("x")];
        let picks: Vec<String> = (0..4)
            .map(|_| policy.dispatch(&counts, &infos, 1, None).unwrap())
            .collect();
        assert_eq!(picks, vec!["x", "y", "z", "x"]);
    }

    #[test]
    fn invariant_5_fairness_over_k_calls() {
        let mut policy = RoundRobin::new();
        let ids = ["a", "b", "c", "d"];
        let counts = counts(&ids);
        let infos = vec![InstanceInfo::placeholder("a")];
        let k = 22;
        let mut tally: HashMap<String, i64> = HashMap::new();
        for _ in 0..k {
            let id = policy.dispatch(&counts, &infos, 1, None).unwrap();
            *tally.entry(id).or_insert(0) += 1;
        }
        let lo = k / ids.len() as i64;
        let hi = lo + if k % ids.len() as i64 != 0 { 1 } else { 0 };
        for id in ids {
            let count = tally.get(id).copied().unwrap_or(0);
            assert!(count == lo || count == hi, "{id} got {count}, expected {lo} or {hi}");
        }
    }

    #[test]
    fn cursor_survives_membership_change_without_remap() {
        let mut policy = RoundRobin::new();
        let infos = vec![InstanceInfo::placeholder("a")];
        assert_eq!(
            policy.dispatch(&counts(&["a", "b", "c"]), &infos, 1, None).unwrap(),
            "a"
        );
        // "b" scales down; cursor does not reset, it just wraps over the new set.
        assert_eq!(
            policy.dispatch(&counts(&["a", "c"]), &infos, 1, None).unwrap(),
            "c"
        );
    }
}
