//! Threshold scaling policy.

use super::trait_::ScalingPolicy;
use crate::instance_info::InstanceInfo;

/// Averages `scaling_load_metric` over all known instances (an idle `-inf`
/// instance contributes `0` to the sum without being treated as missing
/// data) and compares it against the two configured thresholds.
///
/// Never recommends scaling down below a single remaining instance.
#[derive(Debug, Clone, Copy)]
pub struct Threshold {
    pub scale_up_threshold: f64,
    pub scale_down_threshold: f64,
}

impl Threshold {
    pub fn new(scale_up_threshold: f64, scale_down_threshold: f64) -> Self {
        Self {
            scale_up_threshold,
            scale_down_threshold,
        }
    }

    fn average_load(instance_infos: &[InstanceInfo]) -> f64 {
        if instance_infos.is_empty() {
            return 0.0;
        }
        let sum: f64 = instance_infos
            .iter()
            .map(|i| {
                if i.scaling_load_metric == f64::NEG_INFINITY {
                    0.0
                } else {
                    i.scaling_load_metric
                }
            })
            .sum();
        sum / instance_infos.len() as f64
    }
}

impl ScalingPolicy for Threshold {
    fn check_scale(&self, instance_infos: &[InstanceInfo]) -> (u32, u32) {
        let avg = Self::average_load(instance_infos);
        let scale_up_n = if avg > self.scale_up_threshold { 1 } else { 0 };
        let scale_down_n = if avg < self.scale_down_threshold && instance_infos.len() > 1 {
            1
        } else {
            0
        };
        log::debug!(
            "threshold scaling: avg_load={avg}, scale_up_n={scale_up_n}, scale_down_n={scale_down_n}"
        );
        (scale_up_n, scale_down_n)
    }

    fn name(&self) -> &str {
        "threshold"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, load: f64) -> InstanceInfo {
        InstanceInfo {
            scaling_load_metric: load,
            ..InstanceInfo::placeholder(id)
        }
    }

    #[test]
    fn scales_up_above_threshold() {
        let policy = Threshold::new(5.0, 1.0);
        let infos = vec![info("a", 10.0), info("b", 8.0)];
        assert_eq!(policy.check_scale(&infos), (1, 0));
    }

    #[test]
    fn scales_down_below_threshold_with_multiple_instances() {
        let policy = Threshold::new(10.0, 2.0);
        let infos = vec![info("a", 0.5), info("b", 0.3)];
        assert_eq!(policy.check_scale(&infos), (0, 1));
    }

    #[test]
    fn never_scales_down_below_one_instance() {
        let policy = Threshold::new(10.0, 2.0);
        let infos = vec![info("a", 0.0)];
        assert_eq!(policy.check_scale(&infos), (0, 0));
    }

    #[test]
    fn idle_instance_contributes_zero_not_missing() {
        let policy = Threshold::new(10.0, -5.0);
        let infos = vec![info("a", f64::NEG_INFINITY), info("b", f64::NEG_INFINITY)];
        // average is 0.0, which is not below -5.0, so no scale down.
        assert_eq!(policy.check_scale(&infos), (0, 0));
    }

    #[test]
    fn steady_state_neither_scales() {
        let policy = Threshold::new(10.0, 1.0);
        let infos = vec![info("a", 5.0), info("b", 5.0)];
        assert_eq!(policy.check_scale(&infos), (0, 0));
    }
}
