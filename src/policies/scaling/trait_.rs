//! Scaling policy trait.

use crate::instance_info::InstanceInfo;

/// Emits scale-up/scale-down counts from the fleet's aggregate load.
///
/// Not named as a family of variants in the distilled spec the way dispatch
/// and pair-migration are; `Threshold` is the one concrete policy shipped,
/// registered through the same kind-to-policy indirection as the other two
/// families so a second variant is a pure addition.
pub trait ScalingPolicy: Send + Sync {
    /// Returns `(scale_up_n, scale_down_n)`.
    fn check_scale(&self, instance_infos: &[InstanceInfo]) -> (u32, u32);

    fn name(&self) -> &str;
}
