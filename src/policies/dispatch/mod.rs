//! Dispatch policy family: chooses one instance per incoming request.

pub mod balanced;
pub mod flood;
pub mod load;
pub mod loadv2;
pub mod queue;
pub mod registry;
pub mod round_robin;
mod support;
pub mod trait_;

pub use balanced::Balanced;
pub use flood::Flood;
pub use load::Load;
pub use loadv2::Loadv2;
pub use queue::Queue;
pub use registry::make_dispatch_policy;
pub use round_robin::RoundRobin;
pub use trait_::DispatchPolicy;
