//! Pair-migration policy trait.

use std::any::Any;

use crate::instance_info::InstanceInfo;

/// Produces a one-shot batch of `(src_id, dst_id)` migration pairs from two
/// partitions of the fleet.
///
/// `Urgency` does not implement batch pair migration at all — it drives
/// redispatch instead (see [`RedispatchPolicy`]) — and returns an empty
/// vector here. `as_any` lets the migration scheduler discover, via
/// `downcast_ref`, whether a configured policy additionally implements
/// [`RedispatchPolicy`], rather than forcing every `PairMigrationPolicy` to
/// stub out redispatch methods that don't apply to it.
pub trait PairMigrationPolicy: Send + Sync {
    fn pair_migration(
        &self,
        src_instance_infos: &[InstanceInfo],
        dst_instance_infos: &[InstanceInfo],
    ) -> Vec<(String, String)>;

    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// Redispatch-selection behavior. Only [`Urgency`](super::urgency::Urgency)
/// implements this; `Balanced`/`Defrag` do not.
pub trait RedispatchPolicy {
    /// Instances with a waiting request, sorted descending by queue depth.
    /// Empty if none qualify.
    fn get_src_instances(&self, src_instance_infos: &[InstanceInfo]) -> Vec<String>;

    /// The best destination for `request` leaving `src_id`, or `None` if no
    /// admissible candidate exists or the best candidate is `src_id` itself.
    fn get_dst_instance(
        &self,
        dst_instance_infos: &[InstanceInfo],
        src_id: &str,
        request_n_blocks: i64,
    ) -> Option<String>;
}
