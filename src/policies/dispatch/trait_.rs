//! Dispatch policy trait.

use std::collections::HashMap;

use crate::error::GlobalSchedulerError;
use crate::instance_info::InstanceInfo;

/// Chooses one instance to serve a freshly arrived request.
///
/// Inputs are read-only except where a policy carries cross-call state (only
/// [`RoundRobin`](super::round_robin::RoundRobin) does, via its cursor), which
/// is why `dispatch` takes `&mut self`.
pub trait DispatchPolicy: Send + Sync {
    /// Selects an instance id from `available_instance_infos`.
    ///
    /// `instance_num_requests` maps every known instance id to the number of
    /// requests the dispatch scheduler has already routed to it since the
    /// last refresh; `req_n_blocks` is required by [`Loadv2`](super::loadv2::Loadv2)
    /// and ignored by the others.
    ///
    /// # Errors
    ///
    /// Returns [`GlobalSchedulerError::NoCandidate`] if `available_instance_infos`
    /// is empty.
    fn dispatch(
        &mut self,
        instance_num_requests: &HashMap<String, i64>,
        available_instance_infos: &[InstanceInfo],
        topk_random_dispatch: usize,
        req_n_blocks: Option<i64>,
    ) -> Result<String, GlobalSchedulerError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
