//! Lock-striped cache of reward points sitting in front of the oracle.
//!
//! The cache has two levels. An outer map from user id to a per-user entry is
//! guarded by one reader/writer lock that is only written when an entry is
//! created. Each entry guards its own attraction-name to points map with a
//! separate reader/writer lock. Readers of different users therefore never
//! contend, and a preload writing one user's entry only excludes readers of
//! that user.
//!
//! Reads are cache-aside without write-back: a miss goes straight to the
//! oracle and the answer is not stored. Entries are only populated by an
//! explicit [`RewardPointsCache::preload`], so the read path never waits on a
//! write lock. Entries are never evicted; [`RewardPointsCache::clear`] is the
//! only way to drop them.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::RwLock;
use rayon::ThreadPoolBuilder;
use tourguide_core::{Attraction, AttractionCatalog, OracleError, RewardPointsOracle, User};
use uuid::Uuid;

use crate::CacheError;
use crate::sync::{DoneGuard, WaitGroup};

/// Upper bound on the number of preload workers for a single batch.
pub const DEFAULT_PRELOAD_WORKER_CAP: usize = 10_000;

/// Configuration for [`RewardPointsCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Whether lookups consult the cache at all.
    pub enabled: bool,
    /// Upper bound on preload workers; a batch uses one worker per user up to
    /// this cap.
    pub preload_worker_cap: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            preload_worker_cap: DEFAULT_PRELOAD_WORKER_CAP,
        }
    }
}

/// Counters describing how lookups were served while caching was enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a preloaded entry.
    pub hits: u64,
    /// Lookups that fell through to the oracle.
    pub misses: u64,
}

#[derive(Debug, Default)]
struct UserPoints {
    points: RwLock<HashMap<String, i32>>,
}

/// State shared with preload workers.
struct Shared {
    oracle: Arc<dyn RewardPointsOracle>,
    catalog: Arc<dyn AttractionCatalog>,
    users: RwLock<HashMap<Uuid, Arc<UserPoints>>>,
    generation: AtomicU64,
}

impl Shared {
    fn cached_points(&self, attraction: &Attraction, user_id: Uuid) -> Option<i32> {
        let users = self.users.read();
        let entry = users.get(&user_id)?;
        let points = entry.points.read();
        points.get(&attraction.name).copied()
    }

    fn entry(&self, user_id: Uuid) -> Arc<UserPoints> {
        if let Some(entry) = self.users.read().get(&user_id) {
            return Arc::clone(entry);
        }
        let mut users = self.users.write();
        Arc::clone(users.entry(user_id).or_default())
    }

    fn is_cancelled(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn preload_user(&self, user_id: Uuid, attractions: &[Attraction], generation: u64) {
        if self.is_cancelled(generation) {
            debug!("preload for user {user_id} cancelled before it started");
            return;
        }
        let entry = self.entry(user_id);
        for attraction in attractions {
            if self.is_cancelled(generation) {
                debug!("preload for user {user_id} cancelled");
                return;
            }
            match self.oracle.reward_points(attraction.id, user_id) {
                Ok(points) => {
                    entry.points.write().insert(attraction.name.clone(), points);
                }
                Err(err) => {
                    warn!("preload for user {user_id} aborted: {err}");
                    return;
                }
            }
        }
    }
}

/// Completion handle for one [`RewardPointsCache::preload`] batch.
///
/// Dropping the handle does not cancel or detach anything: the batch keeps
/// running in the background either way.
#[derive(Debug)]
pub struct PreloadHandle {
    jobs: Arc<WaitGroup>,
}

impl PreloadHandle {
    fn finished() -> Self {
        Self {
            jobs: Arc::new(WaitGroup::new(0)),
        }
    }

    /// Block until every job of the batch has finished or been cancelled.
    pub fn wait(&self) {
        self.jobs.wait();
    }

    /// Like [`PreloadHandle::wait`] but gives up after `timeout`. Returns
    /// whether the batch finished.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.jobs.wait_timeout(timeout)
    }

    /// Number of user jobs that have not finished yet.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.jobs.outstanding()
    }
}

/// Two-level cache of reward points keyed by user, then attraction name.
///
/// Caching is disabled by default; while disabled every lookup goes to the
/// oracle and [`RewardPointsCache::preload`] does nothing.
pub struct RewardPointsCache {
    shared: Arc<Shared>,
    enabled: AtomicBool,
    preload_worker_cap: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RewardPointsCache {
    /// Build a cache with the default configuration (disabled).
    pub fn new(
        oracle: Arc<dyn RewardPointsOracle>,
        catalog: Arc<dyn AttractionCatalog>,
    ) -> Self {
        Self::with_config(oracle, catalog, CacheConfig::default())
    }

    /// Build a cache with explicit configuration.
    pub fn with_config(
        oracle: Arc<dyn RewardPointsOracle>,
        catalog: Arc<dyn AttractionCatalog>,
        config: CacheConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                oracle,
                catalog,
                users: RwLock::new(HashMap::new()),
                generation: AtomicU64::new(0),
            }),
            enabled: AtomicBool::new(config.enabled),
            preload_worker_cap: config.preload_worker_cap.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Whether lookups consult the cache.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Turn caching on or off. Existing entries are kept either way.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Resolve the points `user` earns at `attraction`.
    ///
    /// When caching is enabled and the pair was preloaded the cached value is
    /// returned. Every other case asks the oracle, and the answer is not
    /// written back.
    ///
    /// # Errors
    /// Propagates [`OracleError`] from the oracle.
    pub fn get_points(&self, attraction: &Attraction, user: &User) -> Result<i32, OracleError> {
        let user_id = user.id();
        if self.is_enabled() {
            if let Some(points) = self.shared.cached_points(attraction, user_id) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(points);
            }
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        self.shared.oracle.reward_points(attraction.id, user_id)
    }

    /// Start warming the cache for `users`.
    ///
    /// Each user gets one job that asks the oracle for every catalog
    /// attraction and stores the answers in that user's entry. Jobs run on a
    /// pool dedicated to this batch, sized to the batch and capped by
    /// [`CacheConfig::preload_worker_cap`]. The call returns without waiting;
    /// use the returned handle to wait. Nothing happens when caching is
    /// disabled or `users` is empty.
    ///
    /// # Errors
    /// Returns [`CacheError::BuildPool`] when the worker pool cannot be
    /// created.
    pub fn preload(&self, users: &[Arc<User>]) -> Result<PreloadHandle, CacheError> {
        if !self.is_enabled() || users.is_empty() {
            return Ok(PreloadHandle::finished());
        }

        let workers = users.len().min(self.preload_worker_cap);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("reward-preload-{index}"))
            .build()
            .map_err(CacheError::BuildPool)?;

        let generation = self.shared.generation.load(Ordering::SeqCst);
        let attractions: Arc<[Attraction]> = self.shared.catalog.attractions().into();
        let jobs = Arc::new(WaitGroup::new(users.len()));
        info!(
            "preloading reward points for {} users over {} attractions with {workers} workers",
            users.len(),
            attractions.len()
        );

        for user in users {
            let shared = Arc::clone(&self.shared);
            let catalog = Arc::clone(&attractions);
            let group = Arc::clone(&jobs);
            let user_id = user.id();
            pool.spawn(move || {
                let _done = DoneGuard(&group);
                shared.preload_user(user_id, &catalog, generation);
            });
        }
        // Dropping the pool lets queued jobs finish before its threads exit.
        drop(pool);

        Ok(PreloadHandle { jobs })
    }

    /// Cancel every preload job that has not finished yet.
    ///
    /// Jobs notice the request before their next oracle lookup and stop
    /// without error. The call does not wait for them, and values already
    /// written stay cached. Later preloads are unaffected.
    pub fn cancel_preloading(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        debug!("preloading cancelled");
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.shared.users.write().clear();
    }

    /// Number of users with a cache entry.
    #[must_use]
    pub fn cached_users(&self) -> usize {
        self.shared.users.read().len()
    }

    /// Hit and miss counters since the cache was built.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for RewardPointsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardPointsCache")
            .field("enabled", &self.is_enabled())
            .field("cached_users", &self.cached_users())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
