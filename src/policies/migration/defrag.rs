//! Defrag pair-migration policy — unconditional compaction pairing.

use std::any::Any;

use super::trait_::PairMigrationPolicy;
use crate::instance_info::InstanceInfo;

/// Same sort and lockstep walk as [`Balanced`](super::balanced::Balanced),
/// but pairs unconditionally: used when the goal is compaction rather than
/// load reduction, so no anti-ping-pong guard applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct Defrag;

impl PairMigrationPolicy for Defrag {
    fn pair_migration(
        &self,
        src_instance_infos: &[InstanceInfo],
        dst_instance_infos: &[InstanceInfo],
    ) -> Vec<(String, String)> {
        let mut src: Vec<&InstanceInfo> = src_instance_infos.iter().collect();
        src.sort_by(|a, b| {
            b.migration_load_metric
                .partial_cmp(&a.migration_load_metric)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut dst: Vec<&InstanceInfo> = dst_instance_infos.iter().collect();
        dst.sort_by(|a, b| {
            a.migration_load_metric
                .partial_cmp(&b.migration_load_metric)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        (0..src.len().min(dst.len()))
            .map(|i| (src[i].instance_id.clone(), dst[i].instance_id.clone()))
            .collect()
    }

    fn name(&self) -> &str {
        "defrag"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, metric: f64) -> InstanceInfo {
        InstanceInfo {
            migration_load_metric: metric,
            ..InstanceInfo::placeholder(id)
        }
    }

    #[test]
    fn pairs_unconditionally() {
        let policy = Defrag;
        let src = vec![info("s1", 30.0), info("s2", 20.0)];
        let dst = vec![info("d1", 0.0), info("d2", 1.0)];
        let pairs = policy.pair_migration(&src, &dst);
        assert_eq!(
            pairs,
            vec![
                ("s1".to_string(), "d1".to_string()),
                ("s2".to_string(), "d2".to_string()),
            ]
        );
    }
}
