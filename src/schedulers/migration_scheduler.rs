//! Thin per-subsystem view used to make pair-migration and redispatch decisions.

use std::collections::HashMap;

use crate::config::{PairMigrationConstraints, PairMigrationPolicyKind};
use crate::error::GlobalSchedulerError;
use crate::instance_args::{InstanceArgs, InstanceKind};
use crate::instance_info::InstanceInfo;
use crate::policies::migration::{make_migration_policy, PairMigrationPolicy, RedispatchPolicy};

/// Caches the latest instance-info view, owns the configured
/// [`PairMigrationPolicy`], and resolves the src/dst partitioning a
/// migration constraint implies.
pub struct MigrationScheduler {
    policy: Box<dyn PairMigrationPolicy>,
    is_group_kind_migration_backend: bool,
    instance_info: HashMap<String, InstanceInfo>,
    instance_kind: HashMap<String, InstanceKind>,
}

impl MigrationScheduler {
    pub fn new(
        policy_kind: PairMigrationPolicyKind,
        migrate_out_load_threshold: f64,
        is_group_kind_migration_backend: bool,
    ) -> Result<Self, GlobalSchedulerError> {
        Ok(Self {
            policy: make_migration_policy(policy_kind, migrate_out_load_threshold)?,
            is_group_kind_migration_backend,
            instance_info: HashMap::new(),
            instance_kind: HashMap::new(),
        })
    }

    pub fn update_instance_infos(&mut self, instance_info: &HashMap<String, InstanceInfo>) {
        self.instance_info = instance_info.clone();
    }

    pub fn add_instance(&mut self, instance_id: &str, args: &InstanceArgs) {
        if let Some(kind) = args.kind {
            self.instance_kind.insert(instance_id.to_string(), kind);
        }
    }

    pub fn remove_instance(&mut self, instance_id: &str) {
        self.instance_kind.remove(instance_id);
    }

    fn kind_of(&self, instance_id: &str) -> Option<InstanceKind> {
        if !self.is_group_kind_migration_backend {
            return None;
        }
        self.instance_kind.get(instance_id).copied()
    }

    /// Resolves which instances may act as migration sources and
    /// destinations for a given constraint. When
    /// `is_group_kind_migration_backend` is unset, every kind-aware
    /// constraint degrades to [`PairMigrationConstraints::NoConstraints`]
    /// because no kind information was ever collected.
    fn partition(
        &self,
        constraint: PairMigrationConstraints,
    ) -> (Vec<InstanceInfo>, Vec<InstanceInfo>) {
        if !self.is_group_kind_migration_backend
            && constraint != PairMigrationConstraints::NoConstraints
        {
            log::debug!(
                "migration constraint {constraint:?} requested but is_group_kind_migration_backend \
                 is unset; degrading to NoConstraints"
            );
        }
        let effective = if self.is_group_kind_migration_backend {
            constraint
        } else {
            PairMigrationConstraints::NoConstraints
        };

        let all: Vec<InstanceInfo> = self.instance_info.values().cloned().collect();
        match effective {
            PairMigrationConstraints::NoConstraints => (all.clone(), all),
            PairMigrationConstraints::PrefillRerouting => {
                let prefill: Vec<InstanceInfo> = all
                    .into_iter()
                    .filter(|i| self.kind_of(&i.instance_id) == Some(InstanceKind::Prefill))
                    .collect();
                let src = prefill
                    .iter()
                    .filter(|i| i.num_waiting_requests > 0)
                    .cloned()
                    .collect();
                (src, prefill)
            }
            PairMigrationConstraints::Decode2Decode => {
                let decode: Vec<InstanceInfo> = all
                    .into_iter()
                    .filter(|i| self.kind_of(&i.instance_id) == Some(InstanceKind::Decode))
                    .collect();
                (decode.clone(), decode)
            }
            PairMigrationConstraints::Prefill2Decode => {
                let prefill: Vec<InstanceInfo> = all
                    .iter()
                    .filter(|i| self.kind_of(&i.instance_id) == Some(InstanceKind::Prefill))
                    .cloned()
                    .collect();
                let decode: Vec<InstanceInfo> = all
                    .into_iter()
                    .filter(|i| self.kind_of(&i.instance_id) == Some(InstanceKind::Decode))
                    .collect();
                (prefill, decode)
            }
        }
    }

    pub fn pair_migration(&self, constraint: PairMigrationConstraints) -> Vec<(String, String)> {
        let (src, dst) = self.partition(constraint);
        self.policy
            .pair_migration(&src, &dst)
            .into_iter()
            .filter(|(s, d)| s != d)
            .collect()
    }

    pub fn get_redispatch_src_instances(&self) -> Vec<String> {
        let Some(redispatch) = self.policy.as_any().downcast_ref::<crate::policies::migration::Urgency>() else {
            log::warn!(
                "get_redispatch_src_instances called but configured policy ({}) does not support redispatch",
                self.policy.name()
            );
            return Vec::new();
        };
        let src: Vec<InstanceInfo> = self.instance_info.values().cloned().collect();
        redispatch.get_src_instances(&src)
    }

    pub fn get_redispatch_dst_instance(&self, src_id: &str, request_n_blocks: i64) -> Option<String> {
        let redispatch = self
            .policy
            .as_any()
            .downcast_ref::<crate::policies::migration::Urgency>()?;
        let dst: Vec<InstanceInfo> = self.instance_info.values().cloned().collect();
        redispatch.get_dst_instance(&dst, src_id, request_n_blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(infos: Vec<InstanceInfo>) -> HashMap<String, InstanceInfo> {
        infos.into_iter().map(|i| (i.instance_id.clone(), i)).collect()
    }

    #[test]
    fn no_constraints_uses_full_fleet_both_sides() {
        let mut sched =
            MigrationScheduler::new(PairMigrationPolicyKind::Defrag, f64::INFINITY, false).unwrap();
        sched.update_instance_infos(&table(vec![
            InstanceInfo {
                migration_load_metric: 10.0,
                ..InstanceInfo::placeholder("a")
            },
            InstanceInfo {
                migration_load_metric: 1.0,
                ..InstanceInfo::placeholder("b")
            },
        ]));
        let pairs = sched.pair_migration(PairMigrationConstraints::NoConstraints);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn kind_unaware_backend_degrades_to_no_constraints() {
        let mut sched =
            MigrationScheduler::new(PairMigrationPolicyKind::Defrag, f64::INFINITY, false).unwrap();
        sched.update_instance_infos(&table(vec![
            InstanceInfo::placeholder("a"),
            InstanceInfo::placeholder("b"),
        ]));
        // Even though PrefillRerouting is requested, no kind info was ever
        // collected, so it behaves like NoConstraints.
        let pairs = sched.pair_migration(PairMigrationConstraints::PrefillRerouting);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn decode_to_decode_only_pairs_decode_instances() {
        let mut sched =
            MigrationScheduler::new(PairMigrationPolicyKind::Defrag, f64::INFINITY, true).unwrap();
        sched.add_instance("p1", &InstanceArgs::new(Some(InstanceKind::Prefill)));
        sched.add_instance("d1", &InstanceArgs::new(Some(InstanceKind::Decode)));
        sched.add_instance("d2", &InstanceArgs::new(Some(InstanceKind::Decode)));
        sched.update_instance_infos(&table(vec![
            InstanceInfo::placeholder("p1"),
            InstanceInfo::placeholder("d1"),
            InstanceInfo::placeholder("d2"),
        ]));
        let pairs = sched.pair_migration(PairMigrationConstraints::Decode2Decode);
        for (s, d) in &pairs {
            assert!(s.starts_with('d'));
            assert!(d.starts_with('d'));
        }
    }

    #[test]
    fn non_redispatch_policy_returns_empty_src_list() {
        let sched =
            MigrationScheduler::new(PairMigrationPolicyKind::Balanced, f64::INFINITY, false).unwrap();
        assert!(sched.get_redispatch_src_instances().is_empty());
    }

    #[test]
    fn self_pairs_are_filtered_out() {
        let mut sched =
            MigrationScheduler::new(PairMigrationPolicyKind::Defrag, f64::INFINITY, false).unwrap();
        sched.update_instance_infos(&table(vec![InstanceInfo::placeholder("only")]));
        let pairs = sched.pair_migration(PairMigrationConstraints::NoConstraints);
        assert!(pairs.is_empty());
    }
}
