//! Request descriptor, opaque to the scheduler except for its id and block demand.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A queued or incoming request. The scheduler never looks inside a request
/// beyond these two fields.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Request {
    pub request_id: String,
    /// KV-cache blocks this request needs to be admitted. Always positive.
    pub n_blocks: i64,
}

impl Request {
    pub fn new(request_id: impl Into<String>, n_blocks: i64) -> Self {
        debug_assert!(n_blocks > 0, "n_blocks must be positive");
        Self {
            request_id: request_id.into(),
            n_blocks,
        }
    }
}
