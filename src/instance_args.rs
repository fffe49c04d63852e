//! Per-instance arguments supplied at `scale_up`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of a prefill/decode-disaggregated deployment an instance
/// belongs to. Only meaningful when `is_group_kind_migration_backend` is set
/// on the migration scheduler; otherwise every instance is treated as
/// eligible on both sides of a migration regardless of kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InstanceKind {
    Prefill,
    Decode,
}

/// Arguments accompanying a `scale_up` call for a single instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstanceArgs {
    pub kind: Option<InstanceKind>,
}

impl InstanceArgs {
    pub fn new(kind: Option<InstanceKind>) -> Self {
        Self { kind }
    }

    pub fn unspecified() -> Self {
        Self { kind: None }
    }
}

impl Default for InstanceArgs {
    fn default() -> Self {
        Self::unspecified()
    }
}
