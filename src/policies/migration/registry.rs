//! Constructs a [`PairMigrationPolicy`] from a [`PairMigrationPolicyKind`].

use super::balanced::Balanced;
use super::defrag::Defrag;
use super::trait_::PairMigrationPolicy;
use super::urgency::Urgency;
use crate::config::PairMigrationPolicyKind;
use crate::error::GlobalSchedulerError;

pub fn make_migration_policy(
    kind: PairMigrationPolicyKind,
    migrate_out_load_threshold: f64,
) -> Result<Box<dyn PairMigrationPolicy>, GlobalSchedulerError> {
    let policy: Box<dyn PairMigrationPolicy> = match kind {
        PairMigrationPolicyKind::Balanced => Box::new(Balanced::new(migrate_out_load_threshold)),
        PairMigrationPolicyKind::Defrag => Box::new(Defrag),
        PairMigrationPolicyKind::Urgency => Box::new(Urgency),
    };
    Ok(policy)
}
