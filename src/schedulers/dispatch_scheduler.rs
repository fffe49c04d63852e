//! Thin per-subsystem view used to make dispatch decisions.

use std::collections::HashMap;

use crate::config::DispatchPolicyKind;
use crate::error::GlobalSchedulerError;
use crate::instance_info::InstanceInfo;
use crate::policies::dispatch::{make_dispatch_policy, DispatchPolicy};

/// Caches the latest instance-info view, owns the configured
/// [`DispatchPolicy`] (and any cross-call state it carries, e.g. the
/// round-robin cursor), and tracks how many requests have been routed to
/// each instance since the scheduler last refreshed.
pub struct DispatchScheduler {
    policy: Box<dyn DispatchPolicy>,
    topk_random_dispatch: usize,
    instance_info: HashMap<String, InstanceInfo>,
    instance_num_requests: HashMap<String, i64>,
}

impl DispatchScheduler {
    pub fn new(
        policy_kind: DispatchPolicyKind,
        topk_random_dispatch: usize,
    ) -> Result<Self, GlobalSchedulerError> {
        Ok(Self {
            policy: make_dispatch_policy(policy_kind)?,
            topk_random_dispatch,
            instance_info: HashMap::new(),
            instance_num_requests: HashMap::new(),
        })
    }

    pub fn update_instance_infos(&mut self, instance_info: &HashMap<String, InstanceInfo>) {
        self.instance_info = instance_info.clone();
    }

    pub fn add_instance(&mut self, instance_id: &str) {
        self.instance_num_requests
            .entry(instance_id.to_string())
            .or_insert(0);
    }

    pub fn remove_instance(&mut self, instance_id: &str) {
        self.instance_num_requests.remove(instance_id);
    }

    pub fn dispatch(&mut self, req_n_blocks: Option<i64>) -> Result<String, GlobalSchedulerError> {
        let available: Vec<InstanceInfo> = self.instance_info.values().cloned().collect();
        let topk = self.topk_random_dispatch.min(available.len().max(1));
        let instance_id = self.policy.dispatch(
            &self.instance_num_requests,
            &available,
            topk,
            req_n_blocks,
        )?;
        *self
            .instance_num_requests
            .entry(instance_id.clone())
            .or_insert(0) += 1;
        Ok(instance_id)
    }
}
