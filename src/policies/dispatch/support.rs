//! Shared helpers for the top-k-random-pick dispatch policies ([`Load`](super::load::Load),
//! [`Queue`](super::queue::Queue)).

use rand::Rng;

use crate::instance_info::InstanceInfo;

/// Sorts a copy of `infos` ascending by `key`.
pub fn sorted_by_key<F>(infos: &[InstanceInfo], mut key: F) -> Vec<InstanceInfo>
where
    F: FnMut(&InstanceInfo) -> f64,
{
    let mut sorted: Vec<InstanceInfo> = infos.to_vec();
    sorted.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Picks a uniformly random element from the first `k = min(topk, len)`
/// entries of `sorted`.
pub fn random_choice_from_top_k(sorted: &[InstanceInfo], topk: usize) -> &InstanceInfo {
    let k = topk.min(sorted.len()).max(1);
    let idx = rand::thread_rng().gen_range(0..k);
    &sorted[idx]
}
