//! Constructs a [`DispatchPolicy`] from a [`DispatchPolicyKind`].

use super::balanced::Balanced;
use super::flood::Flood;
use super::load::Load;
use super::loadv2::Loadv2;
use super::queue::Queue;
use super::round_robin::RoundRobin;
use super::trait_::DispatchPolicy;
use crate::config::DispatchPolicyKind;
use crate::error::GlobalSchedulerError;

/// All variants are currently registered (the enum is closed), so this can
/// never actually fail; it stays `Result`-returning so the same construction
/// pattern as [`crate::policies::migration::registry`] and
/// [`crate::policies::scaling::registry`] applies uniformly, and so a future
/// string-keyed configuration layer built on top of this enum has somewhere
/// to surface `UnknownPolicy`.
pub fn make_dispatch_policy(
    kind: DispatchPolicyKind,
) -> Result<Box<dyn DispatchPolicy>, GlobalSchedulerError> {
    let policy: Box<dyn DispatchPolicy> = match kind {
        DispatchPolicyKind::Flood => Box::new(Flood),
        DispatchPolicyKind::Balanced => Box::new(Balanced),
        DispatchPolicyKind::Load => Box::new(Load),
        DispatchPolicyKind::Queue => Box::new(Queue),
        DispatchPolicyKind::RoundRobin => Box::new(RoundRobin::new()),
        DispatchPolicyKind::Loadv2 => Box::new(Loadv2),
    };
    Ok(policy)
}
