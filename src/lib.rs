//! fleetsched - global scheduler for a multi-instance inference serving fleet.
//!
//! Decides where freshly arrived requests are dispatched, which instance
//! pairs should migrate load, which waiting requests should be redispatched
//! under urgency, and when the fleet should scale up or down, all driven off
//! a shared table of per-instance telemetry snapshots.

pub mod config;
pub mod error;
pub mod global_scheduler;
pub mod instance_args;
pub mod instance_info;
pub mod policies;
pub mod request;
pub mod schedulers;

pub use config::{
    DispatchPolicyKind, GlobalSchedulerConfig, PairMigrationConstraints, PairMigrationPolicyKind,
    ScalingLoadMetric, ScalingPolicyKind,
};
pub use error::GlobalSchedulerError;
pub use global_scheduler::GlobalScheduler;
pub use instance_args::{InstanceArgs, InstanceKind};
pub use instance_info::InstanceInfo;
pub use request::Request;
