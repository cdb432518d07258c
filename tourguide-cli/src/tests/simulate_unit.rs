//! Focused unit tests covering simulate configuration and the pipeline.

use super::helpers::{CatalogFile, write_utf8};
use super::*;
use crate::catalog::load_catalog;
use crate::oracle::{MAX_POINTS, MIN_POINTS, SimulatedOracle};
use crate::population::generate_users;
use crate::simulate::{
    DEFAULT_LOCATIONS_PER_USER, DEFAULT_USERS, SimulateConfig, config_from_layers_for_test,
    simulate,
};
use camino::Utf8PathBuf;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::rstest;
use std::time::Duration;
use tourguide_core::{DEFAULT_REWARD_BUFFER_MILES, RewardPointsOracle};
use tourguide_rewards::scheduler::{DEFAULT_PROGRESS_INTERVAL, DEFAULT_WORKERS};
use uuid::Uuid;

fn config_for(catalog: &CatalogFile) -> SimulateConfig {
    SimulateConfig {
        attractions: catalog.path().to_path_buf(),
        users: 20,
        locations_per_user: 2,
        reward_buffer: DEFAULT_REWARD_BUFFER_MILES,
        workers: 4,
        progress_interval: Duration::from_millis(10),
        preload: false,
        oracle_latency: Duration::ZERO,
        seed: 7,
    }
}

#[rstest]
fn converting_simulate_without_catalog_errors() {
    let err = SimulateConfig::try_from(SimulateArgs::default())
        .expect_err("missing catalog should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_ATTRACTIONS);
            assert_eq!(env, ENV_ATTRACTIONS);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn simulate_config_applies_defaults() {
    let args = SimulateArgs {
        attractions: Some(Utf8PathBuf::from("attractions.json")),
        seed: Some(3),
        ..SimulateArgs::default()
    };

    let config = SimulateConfig::try_from(args).expect("config should build");
    assert_eq!(config.users, DEFAULT_USERS);
    assert_eq!(config.locations_per_user, DEFAULT_LOCATIONS_PER_USER);
    assert_eq!(config.reward_buffer, DEFAULT_REWARD_BUFFER_MILES);
    assert_eq!(config.workers, DEFAULT_WORKERS);
    assert_eq!(config.progress_interval, DEFAULT_PROGRESS_INTERVAL);
    assert!(!config.preload);
    assert_eq!(config.oracle_latency, Duration::ZERO);
    assert_eq!(config.seed, 3);
}

#[rstest]
fn zero_workers_are_rejected() {
    let args = SimulateArgs {
        attractions: Some(Utf8PathBuf::from("attractions.json")),
        workers: Some(0),
        ..SimulateArgs::default()
    };

    match SimulateConfig::try_from(args).expect_err("zero workers should error") {
        CliError::InvalidConfig { field, .. } => assert_eq!(field, ARG_WORKERS),
        other => panic!("expected InvalidConfig, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "users": "many" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "attractions": "from-file.json",
            "users": 10,
            "workers": 8,
        }),
        None,
    );
    composer.push_environment(json!({
        "attractions": "from-env.json",
        "users": 20,
    }));
    composer.push_cli(json!({
        "users": 30,
        "preload": true,
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.attractions, Utf8PathBuf::from("from-env.json"));
    assert_eq!(config.users, 30);
    assert_eq!(config.workers, 8);
    assert!(config.preload);
}

#[rstest]
fn load_catalog_reports_missing_file() {
    let catalog = CatalogFile::new();
    match load_catalog(catalog.path()).expect_err("missing catalog should error") {
        CliError::OpenCatalog { path, .. } => assert_eq!(path, catalog.path().to_path_buf()),
        other => panic!("expected OpenCatalog, found {other:?}"),
    }
}

#[rstest]
fn load_catalog_reports_invalid_json() {
    let catalog = CatalogFile::new();
    write_utf8(catalog.path(), b"{ not valid json");
    match load_catalog(catalog.path()).expect_err("invalid catalog should error") {
        CliError::ParseCatalog { path, .. } => assert_eq!(path, catalog.path().to_path_buf()),
        other => panic!("expected ParseCatalog, found {other:?}"),
    }
}

#[rstest]
fn load_catalog_reads_attractions() {
    let catalog = CatalogFile::with_sample_attractions();
    let attractions = load_catalog(catalog.path()).expect("catalog loads");
    assert_eq!(attractions.len(), 5);
    assert_eq!(
        attractions.first().map(|attraction| attraction.name.as_str()),
        Some("Disneyland")
    );
}

#[rstest]
fn simulated_oracle_is_repeatable_and_bounded() {
    let oracle = SimulatedOracle::default();
    for _ in 0..50 {
        let attraction_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let points = oracle
            .reward_points(attraction_id, user_id)
            .expect("simulated lookups succeed");
        assert!((MIN_POINTS..=MAX_POINTS).contains(&points));
        assert_eq!(oracle.reward_points(attraction_id, user_id), Ok(points));
    }
}

#[rstest]
fn generated_users_follow_the_naming_scheme() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let users = generate_users(&mut rng, 3, 4);

    let names: Vec<_> = users.iter().map(|user| user.user_name().to_owned()).collect();
    assert_eq!(names, ["internalUser0", "internalUser1", "internalUser2"]);
    for user in &users {
        let visits = user.visited_locations();
        assert_eq!(visits.len(), 4);
        for visit in visits {
            assert_eq!(visit.user_id, user.id());
            assert!((-85.0..=85.0).contains(&visit.location.latitude()));
            assert!((-180.0..=180.0).contains(&visit.location.longitude()));
        }
    }
}

#[rstest]
fn same_seed_generates_the_same_population() {
    let first = generate_users(&mut ChaCha8Rng::seed_from_u64(9), 2, 2);
    let second = generate_users(&mut ChaCha8Rng::seed_from_u64(9), 2, 2);
    for (left, right) in first.iter().zip(&second) {
        assert_eq!(left.id(), right.id());
        let left_points: Vec<_> = left.visited_locations().iter().map(|v| v.location).collect();
        let right_points: Vec<_> = right.visited_locations().iter().map(|v| v.location).collect();
        assert_eq!(left_points, right_points);
    }
}

#[rstest]
fn world_sized_buffer_rewards_every_attraction() {
    let catalog = CatalogFile::with_sample_attractions();
    let config = SimulateConfig {
        reward_buffer: 30_000.0,
        ..config_for(&catalog)
    };

    let summary = simulate(&config).expect("simulation runs");
    assert_eq!(summary.users, 20);
    assert_eq!(summary.attractions, 5);
    assert_eq!(summary.rewards, 100);
    assert!(summary.total_points >= 100);
    assert_eq!(summary.first_failure, None);
}

#[rstest]
fn preload_serves_every_lookup_from_the_cache() {
    let catalog = CatalogFile::with_sample_attractions();
    let config = SimulateConfig {
        reward_buffer: 30_000.0,
        preload: true,
        ..config_for(&catalog)
    };

    let summary = simulate(&config).expect("simulation runs");
    assert_eq!(summary.cache_hits, 100);
    assert_eq!(summary.cache_misses, 0);
}

#[rstest]
fn simulation_is_repeatable_for_a_seed() {
    let catalog = CatalogFile::with_sample_attractions();
    let config = SimulateConfig {
        reward_buffer: 2_000.0,
        ..config_for(&catalog)
    };

    let first = simulate(&config).expect("first run");
    let second = simulate(&config).expect("second run");
    assert_eq!(first.rewards, second.rewards);
    assert_eq!(first.total_points, second.total_points);
}

#[rstest]
fn negative_buffer_is_rejected() {
    let catalog = CatalogFile::with_sample_attractions();
    let config = SimulateConfig {
        reward_buffer: -1.0,
        ..config_for(&catalog)
    };

    match simulate(&config).expect_err("negative buffer should error") {
        CliError::Proximity(_) => {}
        other => panic!("expected Proximity, found {other:?}"),
    }
}
