//! Thin per-subsystem view used to decide auto-scaling counts.

use std::collections::HashMap;

use crate::config::ScalingPolicyKind;
use crate::error::GlobalSchedulerError;
use crate::instance_info::InstanceInfo;
use crate::policies::scaling::{make_scaling_policy, ScalingPolicy};

/// Caches the latest instance-info view and owns the configured
/// [`ScalingPolicy`].
pub struct ScalingScheduler {
    policy: Box<dyn ScalingPolicy>,
    instance_info: HashMap<String, InstanceInfo>,
}

impl ScalingScheduler {
    pub fn new(
        policy_kind: ScalingPolicyKind,
        scale_up_threshold: f64,
        scale_down_threshold: f64,
    ) -> Result<Self, GlobalSchedulerError> {
        Ok(Self {
            policy: make_scaling_policy(policy_kind, scale_up_threshold, scale_down_threshold)?,
            instance_info: HashMap::new(),
        })
    }

    pub fn update_instance_infos(&mut self, instance_info: &HashMap<String, InstanceInfo>) {
        self.instance_info = instance_info.clone();
    }

    pub fn add_instance(&mut self, _instance_id: &str) {}

    pub fn remove_instance(&mut self, _instance_id: &str) {}

    pub fn check_scale(&self) -> (u32, u32) {
        let infos: Vec<InstanceInfo> = self.instance_info.values().cloned().collect();
        self.policy.check_scale(&infos)
    }
}
