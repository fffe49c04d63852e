use thiserror::Error;

/// Errors raised by the global scheduler and its policy registries.
///
/// Most abnormal conditions in this crate (a stale snapshot, a duplicate
/// scale-up, a planner that cannot place a request) are not errors: they are
/// normal, logged code paths that return an empty or partial result. Only the
/// two conditions below are true failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GlobalSchedulerError {
    #[error("unknown policy: {0}")]
    UnknownPolicy(String),

    #[error("dispatch has no candidate instances")]
    NoCandidate,
}
