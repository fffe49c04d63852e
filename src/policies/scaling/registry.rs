//! Constructs a [`ScalingPolicy`] from a [`ScalingPolicyKind`].

use super::threshold::Threshold;
use super::trait_::ScalingPolicy;
use crate::config::ScalingPolicyKind;
use crate::error::GlobalSchedulerError;

pub fn make_scaling_policy(
    kind: ScalingPolicyKind,
    scale_up_threshold: f64,
    scale_down_threshold: f64,
) -> Result<Box<dyn ScalingPolicy>, GlobalSchedulerError> {
    let policy: Box<dyn ScalingPolicy> = match kind {
        ScalingPolicyKind::Threshold => {
            Box::new(Threshold::new(scale_up_threshold, scale_down_threshold))
        }
    };
    Ok(policy)
}
