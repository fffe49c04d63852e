//! The top-level orchestrator: membership, snapshot ingestion, and every
//! public decision entry point.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::config::{GlobalSchedulerConfig, PairMigrationConstraints};
use crate::error::GlobalSchedulerError;
use crate::instance_args::InstanceArgs;
use crate::instance_info::InstanceInfo;
use crate::request::Request;
use crate::schedulers::{DispatchScheduler, MigrationScheduler, ScalingScheduler};

/// A sentinel meaning "do not preemptively hand off": the runtime should run
/// the request to completion on the instance it was dispatched to.
pub const EXPECTED_STEPS_NO_HANDOFF: f64 = f64::INFINITY;
/// Hand off after a single step (prefill-decode disaggregation is enabled).
pub const EXPECTED_STEPS_SINGLE_STEP: f64 = 1.0;

struct Inner {
    instance_id_set: HashSet<String>,
    instance_info: HashMap<String, InstanceInfo>,
    dispatch_scheduler: DispatchScheduler,
    migration_scheduler: MigrationScheduler,
    scaling_scheduler: ScalingScheduler,
}

/// Global scheduler of a multi-instance inference serving fleet.
///
/// All decision methods take `&self`: the shared instance table and every
/// sub-scheduler's cross-call state live behind one `Mutex`, matching "a
/// single lock around the table is sufficient and expected" for this single
/// logical decision thread per instance. `GlobalScheduler` is `Send + Sync`
/// and is meant to be shared via `Arc` across however the host process
/// structures its own concurrency.
pub struct GlobalScheduler {
    config: GlobalSchedulerConfig,
    inner: Mutex<Inner>,
}

impl GlobalScheduler {
    pub fn new(config: GlobalSchedulerConfig) -> Result<Self, GlobalSchedulerError> {
        let dispatch_scheduler =
            DispatchScheduler::new(config.dispatch_policy, config.topk_random_dispatch)?;
        let migration_scheduler = MigrationScheduler::new(
            config.pair_migration_policy,
            config.migrate_out_load_threshold,
            config.is_group_kind_migration_backend,
        )?;
        let scaling_scheduler = ScalingScheduler::new(
            config.scaling_policy,
            config.scale_up_threshold,
            config.scale_down_threshold,
        )?;
        Ok(Self {
            config,
            inner: Mutex::new(Inner {
                instance_id_set: HashSet::new(),
                instance_info: HashMap::new(),
                dispatch_scheduler,
                migration_scheduler,
                scaling_scheduler,
            }),
        })
    }

    pub fn num_instances(&self) -> usize {
        self.inner.lock().unwrap().instance_id_set.len()
    }

    pub fn instance_ids(&self) -> HashSet<String> {
        self.inner.lock().unwrap().instance_id_set.clone()
    }

    /// Updates the table with each snapshot whose id is already known.
    /// Snapshots for unknown ids are silently dropped (a late report after a
    /// scale-down), logged at `debug`.
    pub fn update_instance_infos(&self, snapshots: Vec<InstanceInfo>) {
        let mut inner = self.inner.lock().unwrap();
        for snapshot in snapshots {
            if inner.instance_id_set.contains(&snapshot.instance_id) {
                inner.instance_info.insert(snapshot.instance_id.clone(), snapshot);
            } else {
                log::debug!("dropping stale snapshot for unknown instance {}", snapshot.instance_id);
            }
        }
    }

    /// Chooses an instance for a freshly arrived request needing
    /// `req_n_blocks` KV-cache blocks (matching `Request::n_blocks`, always
    /// positive — dispatch policies that don't use it, i.e. everything but
    /// `Loadv2`, simply ignore the value).
    ///
    /// Returns `expected_steps = 1` when prefill-decode disaggregation is
    /// enabled (hand off after one step) or `+inf` otherwise (run to
    /// completion on the chosen instance).
    pub fn dispatch(&self, req_n_blocks: i64) -> Result<(String, f64), GlobalSchedulerError> {
        let mut inner = self.inner.lock().unwrap();
        let table = inner.instance_info.clone();
        inner.dispatch_scheduler.update_instance_infos(&table);
        let instance_id = inner.dispatch_scheduler.dispatch(Some(req_n_blocks))?;
        let expected_steps = if self.config.enable_pd_disagg {
            EXPECTED_STEPS_SINGLE_STEP
        } else {
            EXPECTED_STEPS_NO_HANDOFF
        };
        log::info!("dispatched to {instance_id}, expected_steps={expected_steps}");
        Ok((instance_id, expected_steps))
    }

    /// Batch pair-migration decision for the given constraint.
    pub fn pair_migration(&self, constraint: PairMigrationConstraints) -> Vec<(String, String)> {
        let mut inner = self.inner.lock().unwrap();
        let table = inner.instance_info.clone();
        inner.migration_scheduler.update_instance_infos(&table);
        inner.migration_scheduler.pair_migration(constraint)
    }

    /// Instances eligible to have a waiting request redispatched away,
    /// sorted most-backlogged first. Empty if the configured migration
    /// policy does not support redispatch or no instance qualifies.
    pub fn get_redispatch_src_instances(&self) -> Vec<String> {
        let mut inner = self.inner.lock().unwrap();
        let table = inner.instance_info.clone();
        inner.migration_scheduler.update_instance_infos(&table);
        inner.migration_scheduler.get_redispatch_src_instances()
    }

    /// Best destination for `request` leaving `src_id`, or `None`.
    ///
    /// Instance infos are assumed already refreshed by a preceding call to
    /// [`Self::get_redispatch_src_instances`] within the same redispatch
    /// round.
    pub fn get_redispatch_dst_instance(&self, src_id: &str, request: &Request) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .migration_scheduler
            .get_redispatch_dst_instance(src_id, request.n_blocks)
    }

    /// Snapshot of `[free_after_watermark, used]` per instance for the
    /// offline planner.
    pub fn get_redispatch_dst_infos(&self) -> HashMap<String, [i64; 2]> {
        let inner = self.inner.lock().unwrap();
        inner
            .instance_info
            .values()
            .map(|info| {
                (
                    info.instance_id.clone(),
                    [
                        info.num_free_gpu_blocks - info.num_watermark_blocks,
                        info.num_used_gpu_blocks,
                    ],
                )
            })
            .collect()
    }

    /// Offline planner: for each waiting request in order, place it on the
    /// best-fitting candidate instance, updating the candidate's ledger in
    /// place so later requests see earlier commitments. Stops placing the
    /// remainder of the plan the moment no candidate can admit a request
    /// (does not skip ahead and try later requests).
    pub fn derive_redispatching_plans(
        &self,
        master_instance_id: &str,
        waiting_requests: &[Request],
        candidate_instances: HashMap<String, [i64; 2]>,
    ) -> HashMap<String, HashSet<String>> {
        let mut candidates = candidate_instances;
        let mut plans: HashMap<String, Vec<String>> = HashMap::new();

        for request in waiting_requests {
            let available: Vec<String> = candidates
                .iter()
                .filter(|(_, [free, _])| *free > 0)
                .map(|(id, _)| id.clone())
                .collect();
            if available.is_empty() {
                log::info!("no instance can hold any request, stopping redispatch plan");
                break;
            }

            let max_used = available
                .iter()
                .map(|id| candidates[id][1])
                .max()
                .expect("non-empty");

            let fitting: Vec<&String> = available
                .iter()
                .filter(|id| candidates[*id][0] - request.n_blocks > 0)
                .collect();
            if fitting.is_empty() {
                log::info!(
                    "no instance can hold request {} with {} blocks, stopping redispatch plan",
                    request.request_id,
                    request.n_blocks
                );
                break;
            }

            let tightly_fitting: Vec<&String> = available
                .iter()
                .filter(|id| max_used - candidates[*id][1] - request.n_blocks > 0)
                .collect();

            let chosen = if !tightly_fitting.is_empty() {
                tightly_fitting
                    .into_iter()
                    .min_by_key(|id| max_used - (candidates[*id][1] + request.n_blocks))
                    .unwrap()
                    .clone()
            } else {
                fitting
                    .into_iter()
                    .min_by_key(|id| candidates[*id][1] + request.n_blocks - max_used)
                    .unwrap()
                    .clone()
            };

            if chosen != master_instance_id {
                plans.entry(chosen.clone()).or_default().push(request.request_id.clone());
            }
            let entry = candidates.get_mut(&chosen).expect("chosen came from candidates");
            entry[0] -= request.n_blocks;
            entry[1] += request.n_blocks;
        }

        plans
            .into_iter()
            .map(|(dst, reqs)| (dst, reqs.into_iter().collect()))
            .collect()
    }

    pub fn check_scale(&self) -> (u32, u32) {
        let mut inner = self.inner.lock().unwrap();
        let table = inner.instance_info.clone();
        inner.scaling_scheduler.update_instance_infos(&table);
        inner.scaling_scheduler.check_scale()
    }

    /// Adds each instance not already known: inserts a placeholder snapshot
    /// so it is a valid dispatch target before its first telemetry push, and
    /// registers it with every sub-scheduler. Idempotent: an id already
    /// present is logged and otherwise ignored.
    pub fn scale_up(&self, instance_ids: &[String], instance_args: &[InstanceArgs]) -> usize {
        let mut inner = self.inner.lock().unwrap();
        for (id, args) in instance_ids.iter().zip(instance_args.iter()) {
            if inner.instance_id_set.contains(id) {
                log::info!("duplicate scale up for instance {id}, ignoring");
                continue;
            }
            log::info!("scale up instance {id}");
            inner.instance_id_set.insert(id.clone());
            inner
                .instance_info
                .insert(id.clone(), InstanceInfo::placeholder(id));

            let table = inner.instance_info.clone();
            inner.dispatch_scheduler.update_instance_infos(&table);
            inner.dispatch_scheduler.add_instance(id);
            inner.migration_scheduler.update_instance_infos(&table);
            inner.migration_scheduler.add_instance(id, args);
            inner.scaling_scheduler.update_instance_infos(&table);
            inner.scaling_scheduler.add_instance(id);
        }
        log::info!(
            "num_instances={}, instances={:?}",
            inner.instance_id_set.len(),
            inner.instance_id_set
        );
        inner.instance_id_set.len()
    }

    /// Removes each instance that is known: drops it from the table and
    /// every sub-scheduler. Idempotent: an unknown id is logged and
    /// otherwise ignored.
    pub fn scale_down(&self, instance_ids: &[String]) -> usize {
        let mut inner = self.inner.lock().unwrap();
        for id in instance_ids {
            if !inner.instance_id_set.contains(id) {
                log::info!("unknown scale down for instance {id}, ignoring");
                continue;
            }
            log::info!("scale down instance {id}");
            inner.instance_id_set.remove(id);
            inner.instance_info.remove(id);

            inner.dispatch_scheduler.remove_instance(id);
            inner.migration_scheduler.remove_instance(id);
            inner.scaling_scheduler.remove_instance(id);
        }
        log::info!(
            "num_instances={}, instances={:?}",
            inner.instance_id_set.len(),
            inner.instance_id_set
        );
        inner.instance_id_set.len()
    }
}
