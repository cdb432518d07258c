//! Bounded worker pool running reward calculations for many users.
//!
//! Jobs are submitted one user at a time and run on a long-lived
//! [`rayon::ThreadPool`]. [`CalculationScheduler::await_all`] is the barrier:
//! it blocks until every job submitted so far has finished, logging progress
//! while it waits, and then reports the batch. The pool outlives the barrier,
//! so the scheduler can run any number of batches.
//!
//! `submit` and `await_all` share a coarse gate. While a barrier is in
//! progress new submissions block, which keeps the batch the barrier waits on
//! fixed.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use parking_lot::{Condvar, Mutex};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tourguide_core::User;
use uuid::Uuid;

use crate::{RewardAttributor, RewardsError, SchedulerError};

/// Worker count used when none is configured.
pub const DEFAULT_WORKERS: usize = 1_000;

/// Interval between progress reports while waiting on a batch.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for [`CalculationScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Number of worker threads in the pool.
    pub workers: usize,
    /// How often [`CalculationScheduler::await_all`] logs batch progress.
    pub progress_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Summary of a batch that completed without failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Jobs submitted since the previous barrier.
    pub submitted: u64,
    /// Rewards appended by those jobs.
    pub rewards_appended: u64,
}

#[derive(Debug, Default)]
struct BatchState {
    submitted: u64,
    completed: u64,
    rewards_appended: u64,
    first_failure: Option<SchedulerError>,
}

impl BatchState {
    const fn is_idle(&self) -> bool {
        self.completed >= self.submitted
    }

    fn percent_complete(&self) -> u64 {
        self.completed
            .saturating_mul(100)
            .checked_div(self.submitted)
            .unwrap_or(100)
    }
}

/// Counts jobs of the current batch and wakes waiters as they finish.
#[derive(Debug, Default)]
struct BatchTracker {
    state: Mutex<BatchState>,
    progress: Condvar,
}

impl BatchTracker {
    fn record_submit(&self) {
        let mut state = self.state.lock();
        state.submitted = state.submitted.saturating_add(1);
    }

    fn record_outcome(&self, user_id: Uuid, outcome: Option<Result<usize, RewardsError>>) {
        let mut state = self.state.lock();
        state.completed = state.completed.saturating_add(1);
        let failure = match outcome {
            Some(Ok(appended)) => {
                let count = u64::try_from(appended).unwrap_or(u64::MAX);
                state.rewards_appended = state.rewards_appended.saturating_add(count);
                None
            }
            Some(Err(source)) => {
                warn!("reward calculation for user {user_id} failed: {source}");
                Some(SchedulerError::Job { user_id, source })
            }
            None => {
                warn!("reward calculation for user {user_id} panicked");
                Some(SchedulerError::JobPanicked { user_id })
            }
        };
        if state.first_failure.is_none() {
            state.first_failure = failure;
        }
        self.progress.notify_all();
    }

    fn pending(&self) -> u64 {
        let state = self.state.lock();
        state.submitted.saturating_sub(state.completed)
    }

    fn wait_idle(&self) {
        let mut state = self.state.lock();
        while !state.is_idle() {
            self.progress.wait(&mut state);
        }
    }

    /// Log progress every `interval` until the batch is idle. Completions
    /// wake the reporter early but do not move its next deadline. A zero
    /// interval disables reporting.
    fn report_progress(&self, interval: Duration) {
        let mut state = self.state.lock();
        let mut deadline = deadline_after(interval);
        while !state.is_idle() {
            let Some(at) = deadline else {
                self.progress.wait(&mut state);
                continue;
            };
            if self.progress.wait_until(&mut state, at).timed_out() && !state.is_idle() {
                info!(
                    "reward calculation {}% complete ({} of {} users)",
                    state.percent_complete(),
                    state.completed,
                    state.submitted
                );
                deadline = deadline_after(interval);
            }
        }
    }

    /// Reset the counters for the next batch and report the one that ended.
    fn close_batch(&self) -> Result<BatchReport, SchedulerError> {
        let finished = std::mem::take(&mut *self.state.lock());
        match finished.first_failure {
            Some(failure) => Err(failure),
            None => Ok(BatchReport {
                submitted: finished.submitted,
                rewards_appended: finished.rewards_appended,
            }),
        }
    }
}

fn deadline_after(interval: Duration) -> Option<Instant> {
    if interval.is_zero() {
        return None;
    }
    Instant::now().checked_add(interval)
}

/// Records a job's outcome when dropped. A job that unwinds before storing an
/// outcome is recorded as panicked, so the barrier is always released.
struct JobGuard<'a> {
    tracker: &'a BatchTracker,
    user_id: Uuid,
    outcome: Option<Result<usize, RewardsError>>,
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        self.tracker.record_outcome(self.user_id, self.outcome.take());
    }
}

/// Runs [`RewardAttributor::compute_rewards`] for submitted users on a
/// bounded pool.
pub struct CalculationScheduler {
    attributor: Arc<RewardAttributor>,
    pool: ThreadPool,
    tracker: Arc<BatchTracker>,
    gate: Mutex<()>,
    progress_interval: Duration,
}

impl CalculationScheduler {
    /// Build a scheduler and its worker pool.
    ///
    /// # Errors
    /// Returns [`SchedulerError::BuildPool`] when the worker threads cannot
    /// be spawned.
    pub fn new(
        attributor: Arc<RewardAttributor>,
        config: SchedulerConfig,
    ) -> Result<Self, SchedulerError> {
        let workers = config.workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("reward-worker-{index}"))
            .panic_handler(|_| error!("reward worker caught a panicking job"))
            .build()
            .map_err(SchedulerError::BuildPool)?;
        debug!("reward calculation pool started with {workers} workers");
        Ok(Self {
            attributor,
            pool,
            tracker: Arc::new(BatchTracker::default()),
            gate: Mutex::new(()),
            progress_interval: config.progress_interval,
        })
    }

    /// Queue a reward calculation for `user` and return immediately.
    ///
    /// Blocks only while an [`CalculationScheduler::await_all`] is in
    /// progress. Must not be called from inside a reward job.
    pub fn submit(&self, user: Arc<User>) {
        let _gate = self.gate.lock();
        self.tracker.record_submit();
        let tracker = Arc::clone(&self.tracker);
        let attributor = Arc::clone(&self.attributor);
        self.pool.spawn(move || {
            let mut guard = JobGuard {
                tracker: &tracker,
                user_id: user.id(),
                outcome: None,
            };
            guard.outcome = Some(attributor.compute_rewards(&user));
        });
    }

    /// Block until every job submitted so far has finished.
    ///
    /// While waiting, progress of the batch is logged at `info` once per
    /// progress interval. The reporter stops as soon as the batch is done.
    /// The counters then reset, so the next call only covers jobs submitted
    /// after this one returns.
    ///
    /// # Errors
    /// Returns the first failure of the batch: [`SchedulerError::Job`] for a
    /// job that returned an error, [`SchedulerError::JobPanicked`] for one
    /// that panicked. Other jobs of the batch still ran to completion.
    pub fn await_all(&self) -> Result<BatchReport, SchedulerError> {
        let _gate = self.gate.lock();
        let tracker = self.tracker.as_ref();
        let interval = self.progress_interval;
        thread::scope(|scope| {
            scope.spawn(|| tracker.report_progress(interval));
            tracker.wait_idle();
        });
        let report = self.tracker.close_batch();
        if let Ok(summary) = &report {
            info!(
                "reward calculation finished for {} users ({} rewards)",
                summary.submitted, summary.rewards_appended
            );
        }
        report
    }

    /// Jobs submitted but not yet finished.
    #[must_use]
    pub fn pending(&self) -> u64 {
        self.tracker.pending()
    }

    /// Attributor the jobs run.
    #[must_use]
    pub fn attributor(&self) -> &RewardAttributor {
        &self.attributor
    }
}

impl std::fmt::Debug for CalculationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculationScheduler")
            .field("workers", &self.pool.current_num_threads())
            .field("pending", &self.pending())
            .field("progress_interval", &self.progress_interval)
            .finish_non_exhaustive()
    }
}
