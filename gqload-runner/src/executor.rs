//! Staged virtual-user executor

use crate::error::RunnerResult;
use crate::stages::LoadProfile;
use crate::summary::{DurationStats, OperationStats, RunSummary};
use crate::thresholds::ThresholdSet;
use chrono::Utc;
use gqload_config::LoadConfig;
use gqload_http::{FailureRate, GraphqlClient, RateSnapshot};
use gqload_scenarios::{OperationRegistry, OperationSamples, ParameterPools, Scenario, VirtualUser};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

const DEFAULT_TICK: Duration = Duration::from_millis(100);
const DEFAULT_GRACEFUL_STOP: Duration = Duration::from_secs(30);

/// What one virtual user did before it stopped
#[derive(Debug, Default)]
struct VuReport {
    iterations: u64,
    errored: u64,
    samples: OperationSamples,
}

struct VuSlot {
    stop: Arc<AtomicBool>,
    failure_rate: FailureRate,
    handle: JoinHandle<VuReport>,
}

/// Drives a scenario with a staged number of concurrent virtual users
pub struct LoadExecutor {
    client: Arc<dyn GraphqlClient>,
    registry: Arc<OperationRegistry>,
    pools: Arc<ParameterPools>,
    tick: Duration,
    graceful_stop: Duration,
}

impl LoadExecutor {
    pub fn new(client: Arc<dyn GraphqlClient>, registry: Arc<OperationRegistry>, pools: Arc<ParameterPools>) -> Self {
        Self {
            client,
            registry,
            pools,
            tick: DEFAULT_TICK,
            graceful_stop: DEFAULT_GRACEFUL_STOP,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// How long in-flight iterations may run after the profile ends
    pub fn with_graceful_stop(mut self, graceful_stop: Duration) -> Self {
        self.graceful_stop = graceful_stop;
        self
    }

    pub async fn run(&self, scenario: Arc<dyn Scenario>, config: &LoadConfig) -> RunnerResult<RunSummary> {
        let profile = LoadProfile::from_config(config);
        let thresholds = ThresholdSet::from_config(&config.thresholds)?;
        let abort = Arc::new(AtomicBool::new(false));

        info!(
            scenario = scenario.name(),
            stages = profile.stages().len(),
            duration_secs = profile.total_duration().as_secs_f64(),
            max_vus = profile.max_target(),
            "Starting load run"
        );

        let started_at = Utc::now();
        let started = Instant::now();
        let mut active: Vec<VuSlot> = Vec::new();
        let mut retired: Vec<VuSlot> = Vec::new();
        let mut next_vu_id = 0usize;
        let mut max_vus = 0usize;
        let mut current_stage = None;
        let mut aborted = false;

        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let elapsed = started.elapsed();

            let stage = profile.stage_at(elapsed);
            if stage.is_none() {
                break;
            }
            if stage != current_stage {
                if let Some(index) = stage {
                    let target = profile.stages()[index].target;
                    info!(stage = index + 1, target, "Entering stage");
                }
                current_stage = stage;
            }

            let target = profile.target_at(elapsed) as usize;
            while active.len() < target {
                let vu = VirtualUser::new(
                    next_vu_id,
                    self.client.clone(),
                    self.registry.clone(),
                    self.pools.clone(),
                    config.seed,
                );
                next_vu_id += 1;
                active.push(spawn_vu(vu, scenario.clone(), abort.clone(), config.iterations));
            }
            while active.len() > target {
                if let Some(slot) = active.pop() {
                    slot.stop.store(true, Ordering::Relaxed);
                    retired.push(slot);
                }
            }
            max_vus = max_vus.max(active.len());

            let checks = aggregate(active.iter().chain(retired.iter()));
            if let Some(breach) = thresholds.abort_breach(checks) {
                info!(
                    metric = %breach.metric,
                    threshold = %breach.expression,
                    observed = checks.rate(),
                    "Threshold crossed, aborting run"
                );
                aborted = true;
                abort.store(true, Ordering::Relaxed);
                break;
            }

            let capped_out = config.iterations.is_some()
                && active.len() >= profile.max_target() as usize
                && active.iter().chain(retired.iter()).all(|slot| slot.handle.is_finished());
            if capped_out {
                debug!("Every virtual user reached its iteration cap");
                break;
            }
        }

        let mut slots = active;
        slots.append(&mut retired);
        for slot in &slots {
            slot.stop.store(true, Ordering::Relaxed);
        }

        let failure_rates: Vec<FailureRate> = slots.iter().map(|slot| slot.failure_rate.clone()).collect();
        let mut samples = OperationSamples::default();
        let mut iterations = 0;
        let mut errored_iterations = 0;

        let deadline = tokio::time::Instant::now() + self.graceful_stop;
        for slot in slots {
            let mut handle = slot.handle;
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(report)) => {
                    iterations += report.iterations;
                    errored_iterations += report.errored;
                    samples.merge(report.samples);
                }
                Ok(Err(e)) => {
                    // The interrupted iteration counts as errored; its samples are lost
                    warn!(error = %e, "Virtual user task failed");
                    errored_iterations += 1;
                }
                Err(_) => {
                    warn!("Virtual user did not stop within the graceful stop period");
                    handle.abort();
                }
            }
        }

        // Read after draining so the last iterations are included
        let checks: RateSnapshot = failure_rates.iter().map(FailureRate::snapshot).sum();
        let durations = DurationStats::from_samples(samples.all());
        let outcomes = thresholds.evaluate(checks, &durations);

        let summary = RunSummary {
            scenario: scenario.name().to_string(),
            started_at,
            elapsed_secs: started.elapsed().as_secs_f64(),
            max_vus,
            iterations,
            errored_iterations,
            checks,
            check_failure_rate: checks.rate(),
            operations: OperationStats::collect(&samples),
            thresholds: outcomes,
            aborted,
        };

        info!(
            iterations = summary.iterations,
            checks = summary.checks.total,
            failure_rate = summary.check_failure_rate,
            passed = summary.passed(),
            "Load run finished"
        );
        Ok(summary)
    }
}

fn spawn_vu(
    mut vu: VirtualUser,
    scenario: Arc<dyn Scenario>,
    abort: Arc<AtomicBool>,
    max_iterations: Option<u64>,
) -> VuSlot {
    let stop = Arc::new(AtomicBool::new(false));
    let failure_rate = vu.failure_rate().clone();
    let vu_stop = stop.clone();

    let handle = tokio::spawn(async move {
        let mut report = VuReport::default();
        debug!(vu = vu.id(), "Virtual user started");

        while !vu_stop.load(Ordering::Relaxed)
            && !abort.load(Ordering::Relaxed)
            && max_iterations.map_or(true, |max| report.iterations < max)
        {
            if let Err(e) = scenario.run(&mut vu).await {
                report.errored += 1;
                warn!(vu = vu.id(), error = %e, "Iteration failed");
            }
            report.iterations += 1;
        }

        debug!(vu = vu.id(), iterations = report.iterations, "Virtual user stopped");
        report.samples = vu.take_samples();
        report
    });

    VuSlot {
        stop,
        failure_rate,
        handle,
    }
}

fn aggregate<'a>(slots: impl Iterator<Item = &'a VuSlot>) -> RateSnapshot {
    slots.map(|slot| slot.failure_rate.snapshot()).sum()
}
