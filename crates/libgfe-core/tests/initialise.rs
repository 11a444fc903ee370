//! Initialisation from raw invocation parameters

use std::path::Path;
use std::time::Duration;

use libgfe_core::params::DEFAULT_SEED;
use libgfe_core::{
    load_parameter_file, Configuration, ConfigurationError, LibraryRegistry, ThreadsType,
};
use proptest::prelude::*;
use tempfile::tempdir;

fn initialise(args: Vec<(String, String)>) -> Result<Configuration, ConfigurationError> {
    let mut config = Configuration::new();
    config.initialise(args, &LibraryRegistry::with_defaults())?;
    Ok(config)
}

fn pairs(args: &[(&str, &str)]) -> Vec<(String, String)> {
    args.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_scenario_threads_and_graph() {
    let config = initialise(pairs(&[
        ("library", "dummy"),
        ("graph", "/tmp/g.edges"),
        ("threads-read", "4"),
        ("threads-write", "2"),
    ]))
    .unwrap();

    assert_eq!(config.num_threads(ThreadsType::Total), 6);
    assert_eq!(config.path_graph(), Path::new("/tmp/g.edges"));
}

#[test]
fn test_scenario_unbounded_timeout() {
    let config = initialise(pairs(&[("library", "dummy"), ("timeout", "0")])).unwrap();
    assert_eq!(config.timeout_per_operation(), 0);
    assert!(config.timeout().is_none());
}

#[test]
fn test_scenario_no_database() {
    let config = initialise(pairs(&[("library", "dummy"), ("database", "")])).unwrap();
    assert!(!config.has_database());
    assert!(matches!(
        config.save_parameters(),
        Err(ConfigurationError::NoDatabase)
    ));
}

#[test]
fn test_scenario_unregistered_library() {
    let mut config = Configuration::new();
    let result = config.initialise(
        pairs(&[("library", "nope"), ("graph", "/tmp/g.edges")]),
        &LibraryRegistry::with_defaults(),
    );

    assert!(matches!(result, Err(ConfigurationError::UnknownLibrary { .. })));
    assert!(!config.is_initialised());
    assert_eq!(config.path_graph(), Path::new(""));
    assert!(config.generate_graph_library().is_err());
}

#[test]
fn test_unsupplied_parameters_keep_defaults() {
    let config = initialise(pairs(&[("library", "dummy")])).unwrap();

    assert_eq!(config.build_frequency(), Duration::from_secs(300));
    assert_eq!(config.coefficient_aging(), 0.0);
    assert_eq!(config.ef_vertices(), 1.0);
    assert_eq!(config.ef_edges(), 1.0);
    assert!(config.is_graph_directed());
    assert_eq!(config.max_weight(), 1.0);
    assert_eq!(config.num_repetitions(), 5);
    assert_eq!(config.seed(), DEFAULT_SEED);
    assert_eq!(config.timeout_per_operation(), 3600);
    assert_eq!(config.update_log(), Path::new(""));
    assert!(!config.validate_output());
    assert!(!config.has_database());
}

#[test]
fn test_parameter_file_feeds_initialise() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("run.toml");
    std::fs::write(
        &file,
        "library = \"dummy\"\npath = \"/data/graph500-22.properties\"\nundirected = true\nbuild_frequency = 1000\n",
    )
    .unwrap();

    let config = initialise(load_parameter_file(&file).unwrap()).unwrap();
    assert_eq!(config.path_graph(), Path::new("/data/graph500-22.properties"));
    assert!(!config.is_graph_directed());
    assert_eq!(config.build_frequency(), Duration::from_millis(1000));
}

#[test]
fn test_later_pairs_override_earlier_ones() {
    let config = initialise(pairs(&[
        ("library", "dummy"),
        ("threads-read", "2"),
        ("threads-read", "16"),
    ]))
    .unwrap();
    assert_eq!(config.num_threads(ThreadsType::Read), 16);
}

#[test]
fn test_zero_max_weight_is_accepted() {
    let config = initialise(pairs(&[("library", "dummy"), ("max-weight", "0")])).unwrap();
    assert_eq!(config.max_weight(), 0.0);

    let err = initialise(pairs(&[("library", "dummy"), ("max-weight", "-0.1")])).unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::InvalidParameter { name: "max-weight", .. }
    ));
}

#[test]
fn test_huge_thread_counts_total_saturates() {
    let config = initialise(pairs(&[
        ("library", "dummy"),
        ("threads-read", &usize::MAX.to_string()),
        ("threads-write", "1"),
    ]))
    .unwrap();
    assert_eq!(config.num_threads(ThreadsType::Total), usize::MAX);
}

#[test]
fn test_empty_boolean_is_rejected() {
    let err = initialise(pairs(&[("library", "dummy"), ("validate", "")])).unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::InvalidParameter { name: "validate", .. }
    ));
}

proptest! {
    #[test]
    fn prop_valid_parameters_read_back(
        threads_read in 1usize..256,
        threads_write in 1usize..256,
        repetitions in 1u64..1000,
        timeout in 0u64..100_000,
        seed in any::<u64>(),
        build_frequency in 0u64..10_000_000,
        aging in 0.0f64..100.0,
        ef_vertices in 1.0f64..16.0,
        ef_edges in 1.0f64..16.0,
        max_weight in 0.0f64..1e6,
        directed in any::<bool>(),
        validate in any::<bool>(),
        graph in "/[a-z]{1,12}/[a-z0-9_]{1,16}\\.el",
    ) {
        let config = initialise(vec![
            ("library".to_string(), "dummy".to_string()),
            ("graph".to_string(), graph.clone()),
            ("directed".to_string(), directed.to_string()),
            ("threads-read".to_string(), threads_read.to_string()),
            ("threads-write".to_string(), threads_write.to_string()),
            ("repetitions".to_string(), repetitions.to_string()),
            ("timeout".to_string(), timeout.to_string()),
            ("seed".to_string(), seed.to_string()),
            ("build-frequency".to_string(), build_frequency.to_string()),
            ("aging-coeff".to_string(), aging.to_string()),
            ("ef-vertices".to_string(), ef_vertices.to_string()),
            ("ef-edges".to_string(), ef_edges.to_string()),
            ("max-weight".to_string(), max_weight.to_string()),
            ("validate".to_string(), validate.to_string()),
        ]).unwrap();

        prop_assert_eq!(config.library_name(), "dummy");
        prop_assert_eq!(config.path_graph(), Path::new(&graph));
        prop_assert_eq!(config.is_graph_directed(), directed);
        prop_assert_eq!(config.num_threads(ThreadsType::Read), threads_read);
        prop_assert_eq!(config.num_threads(ThreadsType::Write), threads_write);
        prop_assert_eq!(config.num_threads(ThreadsType::Total), threads_read + threads_write);
        prop_assert_eq!(config.num_repetitions(), repetitions);
        prop_assert_eq!(config.timeout_per_operation(), timeout);
        prop_assert_eq!(config.seed(), seed);
        prop_assert_eq!(config.build_frequency(), Duration::from_millis(build_frequency));
        prop_assert_eq!(config.coefficient_aging(), aging);
        prop_assert_eq!(config.ef_vertices(), ef_vertices);
        prop_assert_eq!(config.ef_edges(), ef_edges);
        prop_assert_eq!(config.max_weight(), max_weight);
        prop_assert_eq!(config.validate_output(), validate);
    }

    #[test]
    fn prop_counts_below_one_are_rejected(
        name in prop::sample::select(vec!["threads-read", "threads-write", "repetitions"]),
        value in -1000i64..1,
    ) {
        let mut config = Configuration::new();
        let result = config.initialise(
            vec![
                ("library".to_string(), "dummy".to_string()),
                (name.to_string(), value.to_string()),
            ],
            &LibraryRegistry::with_defaults(),
        );

        let is_invalid = matches!(result, Err(ConfigurationError::InvalidParameter { .. }));
        prop_assert!(is_invalid);
        prop_assert!(!config.is_initialised());
        prop_assert_eq!(config.num_threads(ThreadsType::Total), 2);
        prop_assert_eq!(config.num_repetitions(), 5);
    }
}
