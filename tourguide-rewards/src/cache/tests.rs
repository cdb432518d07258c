//! Unit coverage for the reward-points cache.

use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};
use tourguide_core::test_support::{CountingOracle, attraction, user_with_visits};
use tourguide_core::{Attraction, User};

use super::*;

struct Harness {
    oracle: Arc<CountingOracle>,
    catalog: Arc<Vec<Attraction>>,
    cache: RewardPointsCache,
}

fn harness_with(oracle: CountingOracle) -> Harness {
    let oracle = Arc::new(oracle);
    let catalog = Arc::new(vec![
        attraction("Disneyland", 33.817_595, -117.922_008),
        attraction("Jackson Hole", 43.582_767, -110.821_999),
        attraction("Mojave National Preserve", 35.141_689, -115.510_399),
    ]);
    let cache = RewardPointsCache::with_config(
        Arc::clone(&oracle) as Arc<dyn RewardPointsOracle>,
        Arc::clone(&catalog) as Arc<dyn AttractionCatalog>,
        CacheConfig {
            enabled: true,
            ..CacheConfig::default()
        },
    );
    Harness {
        oracle,
        catalog,
        cache,
    }
}

#[fixture]
fn harness() -> Harness {
    harness_with(CountingOracle::new(100))
}

fn users(count: usize) -> Vec<Arc<User>> {
    (0..count)
        .map(|index| Arc::new(user_with_visits(&format!("internalUser{index}"), &[])))
        .collect()
}

#[rstest]
fn disabled_cache_always_asks_the_oracle(harness: Harness) {
    harness.cache.set_enabled(false);
    let user = users(1).remove(0);
    let first = harness.catalog.first().expect("catalog entry");

    let handle = harness.cache.preload(std::slice::from_ref(&user)).expect("preload");
    handle.wait();
    assert_eq!(harness.oracle.calls(), 0, "preload is a no-op while disabled");

    assert_eq!(harness.cache.get_points(first, &user), Ok(100));
    assert_eq!(harness.cache.get_points(first, &user), Ok(100));
    assert_eq!(harness.oracle.calls(), 2);
    assert_eq!(harness.cache.stats(), CacheStats::default());
}

#[rstest]
fn miss_falls_through_without_write_back(harness: Harness) {
    let user = users(1).remove(0);
    let first = harness.catalog.first().expect("catalog entry");

    assert_eq!(harness.cache.get_points(first, &user), Ok(100));
    assert_eq!(harness.cache.get_points(first, &user), Ok(100));

    assert_eq!(harness.oracle.calls(), 2);
    assert_eq!(harness.cache.cached_users(), 0);
    assert_eq!(harness.cache.stats(), CacheStats { hits: 0, misses: 2 });
}

#[rstest]
fn preloaded_points_are_served_without_the_oracle(harness: Harness) {
    let batch = users(4);
    harness.cache.preload(&batch).expect("preload").wait();

    let preload_calls = harness.oracle.calls();
    assert_eq!(preload_calls, batch.len() * harness.catalog.len());
    assert_eq!(harness.cache.cached_users(), batch.len());

    for user in &batch {
        for attraction in harness.catalog.iter() {
            assert_eq!(harness.cache.get_points(attraction, user), Ok(100));
        }
    }
    assert_eq!(harness.oracle.calls(), preload_calls);
    let lookups = u64::try_from(batch.len() * harness.catalog.len()).expect("small count");
    assert_eq!(harness.cache.stats(), CacheStats { hits: lookups, misses: 0 });
}

#[rstest]
fn empty_preload_finishes_immediately(harness: Harness) {
    let handle = harness.cache.preload(&[]).expect("preload");
    assert_eq!(handle.outstanding(), 0);
    handle.wait();
    assert_eq!(harness.oracle.calls(), 0);
}

#[rstest]
fn failing_lookup_aborts_only_that_users_preload() {
    let first = attraction("Museum", 0.0, 0.0);
    let second = attraction("Harbour", 0.0, 0.1);
    let third = attraction("Lighthouse", 0.0, 0.2);
    let oracle = Arc::new(CountingOracle::new(100).failing_for(second.id));
    let catalog = Arc::new(vec![first.clone(), second, third.clone()]);
    let cache = RewardPointsCache::with_config(
        Arc::clone(&oracle) as Arc<dyn RewardPointsOracle>,
        catalog as Arc<dyn AttractionCatalog>,
        CacheConfig {
            enabled: true,
            ..CacheConfig::default()
        },
    );
    let user = users(1).remove(0);
    cache
        .preload(std::slice::from_ref(&user))
        .expect("preload")
        .wait();
    assert_eq!(oracle.calls(), 2);

    assert_eq!(cache.get_points(&first, &user), Ok(100));
    assert_eq!(cache.stats().hits, 1);
    // The job stopped at the failure, so the third attraction was never warmed.
    assert_eq!(cache.get_points(&third, &user), Ok(100));
    assert_eq!(cache.stats().misses, 1);
}

#[rstest]
fn cancelled_preload_leaves_a_readable_partial_cache() {
    let harness = harness_with(CountingOracle::new(100).with_latency(Duration::from_millis(20)));
    let batch = users(8);
    let handle = harness.cache.preload(&batch).expect("preload");

    harness.cache.cancel_preloading();
    handle.wait();

    assert!(harness.oracle.calls() < batch.len() * harness.catalog.len());
    for user in &batch {
        for attraction in harness.catalog.iter() {
            assert_eq!(harness.cache.get_points(attraction, user), Ok(100));
        }
    }
}

#[rstest]
fn cancellation_does_not_affect_later_preloads(harness: Harness) {
    harness.cache.cancel_preloading();
    let batch = users(2);
    harness.cache.preload(&batch).expect("preload").wait();
    assert_eq!(harness.oracle.calls(), batch.len() * harness.catalog.len());
}

#[rstest]
fn clear_drops_every_entry(harness: Harness) {
    let batch = users(3);
    harness.cache.preload(&batch).expect("preload").wait();
    assert_eq!(harness.cache.cached_users(), 3);

    harness.cache.clear();
    assert_eq!(harness.cache.cached_users(), 0);
}

#[rstest]
fn worker_cap_limits_pool_but_not_coverage() {
    let oracle = Arc::new(CountingOracle::new(7));
    let catalog = Arc::new(vec![attraction("Museum", 0.0, 0.0)]);
    let cache = RewardPointsCache::with_config(
        Arc::clone(&oracle) as Arc<dyn RewardPointsOracle>,
        catalog as Arc<dyn AttractionCatalog>,
        CacheConfig {
            enabled: true,
            preload_worker_cap: 2,
        },
    );
    let batch = users(10);
    cache.preload(&batch).expect("preload").wait();
    assert_eq!(oracle.calls(), 10);
    assert_eq!(cache.cached_users(), 10);
}
