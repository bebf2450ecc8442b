//! Focused unit tests covering rank CLI configuration and input loading.

use super::helpers::{SAMPLE_PARCELS, SAMPLE_REQUEST, utf8_workspace, write_utf8};
use super::*;
use crate::rank::{RankConfig, config_from_layers_for_test, execute_rank, load_json};
use rstest::rstest;
use sitescore_core::{AnalysisRequest, Indicator, ParcelFacts};
use sitescore_scorer::{DEFAULT_BASE_SCORE, PrepareError, ScoringOptionsError};

#[derive(Debug, Copy, Clone)]
enum MissingInput {
    Request,
    Parcels,
    Statistics,
}

fn sample_config(root: &camino::Utf8Path) -> RankConfig {
    RankConfig {
        request_path: root.join("request.json"),
        parcels: root.join("parcels.json"),
        statistics: None,
        base_score: DEFAULT_BASE_SCORE,
        limit: None,
    }
}

#[rstest]
#[case::request(ARG_RANK_REQUEST, ENV_RANK_REQUEST, true)]
#[case::parcels(ARG_RANK_PARCELS, ENV_RANK_PARCELS, false)]
fn converting_rank_without_paths_errors(
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
    #[case] omit_request: bool,
) {
    let args = if omit_request {
        RankArgs {
            parcels: Some("parcels.json".into()),
            ..RankArgs::default()
        }
    } else {
        RankArgs {
            request_path: Some("request.json".into()),
            ..RankArgs::default()
        }
    };

    let err = RankConfig::try_from(args).expect_err("missing path should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn rank_config_defaults_base_score() {
    let args = RankArgs {
        request_path: Some("request.json".into()),
        parcels: Some("parcels.json".into()),
        ..RankArgs::default()
    };

    let config = RankConfig::try_from(args).expect("config should build");
    assert_eq!(config.base_score, DEFAULT_BASE_SCORE);
    assert_eq!(config.statistics, None);
    assert_eq!(config.limit, None);
}

#[rstest]
#[case::missing_request(ARG_RANK_REQUEST, MissingInput::Request)]
#[case::missing_parcels(ARG_RANK_PARCELS, MissingInput::Parcels)]
#[case::missing_statistics(ARG_RANK_STATISTICS, MissingInput::Statistics)]
fn validate_sources_reports_missing_inputs(
    #[case] expected_field: &'static str,
    #[case] missing: MissingInput,
) {
    let (_tmp, root) = utf8_workspace();
    let mut config = sample_config(&root);
    let statistics = root.join("statistics.json");
    config.statistics = Some(statistics.clone());

    if !matches!(missing, MissingInput::Request) {
        write_utf8(&config.request_path, b"{}");
    }
    if !matches!(missing, MissingInput::Parcels) {
        write_utf8(&config.parcels, b"[]");
    }
    if !matches!(missing, MissingInput::Statistics) {
        write_utf8(&statistics, b"{}");
    }

    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_not_file() {
    let (_tmp, root) = utf8_workspace();
    let config = sample_config(&root);
    std::fs::create_dir(&config.request_path).expect("request directory");

    let err = config
        .validate_sources()
        .expect_err("expected directory path to fail validation");
    match err {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_RANK_REQUEST);
            assert_eq!(path, config.request_path);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn load_json_decodes_lenient_parcels() {
    let (_tmp, root) = utf8_workspace();
    let path = root.join("parcels.json");
    write_utf8(&path, SAMPLE_PARCELS.as_bytes());

    let parcels: Vec<ParcelFacts> = load_json(&path, ARG_RANK_PARCELS).expect("parcels decode");
    assert_eq!(parcels.len(), 3);
    let east = parcels
        .iter()
        .find(|parcel| parcel.id.as_str() == "east")
        .expect("east parcel present");
    assert_eq!(east.land_area, Some(900.0));
}

#[rstest]
fn load_json_rejects_invalid_json() {
    let (_tmp, root) = utf8_workspace();
    let path = root.join("request.json");
    write_utf8(&path, b"{ not valid json");

    let err = load_json::<AnalysisRequest>(&path, ARG_RANK_REQUEST)
        .expect_err("invalid json should error");
    match err {
        CliError::ParseInput {
            field,
            path: failed,
            ..
        } => {
            assert_eq!(field, ARG_RANK_REQUEST);
            assert_eq!(failed, path);
        }
        other => panic!("expected ParseInput, found {other:?}"),
    }
}

#[rstest]
fn load_json_io_error_returns_open_error() {
    let (_tmp, root) = utf8_workspace();
    let path = root.join("absent.json");

    let err = load_json::<AnalysisRequest>(&path, ARG_RANK_REQUEST)
        .expect_err("missing request should error");
    match err {
        CliError::OpenInput { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("expected OpenInput, found {other:?}"),
    }
}

#[rstest]
fn execute_rank_derives_statistics_from_parcels() {
    let (_tmp, root) = utf8_workspace();
    let config = sample_config(&root);
    write_utf8(
        &config.request_path,
        br#"{"indicators": {"LAND_AREA": {"weight": 100}}}"#,
    );
    write_utf8(&config.parcels, SAMPLE_PARCELS.as_bytes());

    let outcome = execute_rank(&config).expect("ranking succeeds");
    let ids: Vec<&str> = outcome
        .ranked
        .iter()
        .map(|summary| summary.parcel_id().as_str())
        .collect();
    assert_eq!(ids, vec!["east", "south", "north"]);
    let best = outcome.best().expect("best parcel");
    let land = best.result(Indicator::LandArea).expect("land area scored");
    assert_eq!(land.raw_score(), 1.0);
}

#[rstest]
fn execute_rank_honours_limit() {
    let (_tmp, root) = utf8_workspace();
    let mut config = sample_config(&root);
    config.limit = Some(1);
    write_utf8(&config.request_path, SAMPLE_REQUEST.as_bytes());
    write_utf8(&config.parcels, SAMPLE_PARCELS.as_bytes());

    let outcome = execute_rank(&config).expect("ranking succeeds");
    assert_eq!(outcome.ranked.len(), 1);
    assert_eq!(
        outcome.best().map(|summary| summary.parcel_id().as_str()),
        Some("east")
    );
}

#[rstest]
fn execute_rank_rejects_invalid_base_score() {
    let (_tmp, root) = utf8_workspace();
    let mut config = sample_config(&root);
    config.base_score = 1.5;
    write_utf8(&config.request_path, SAMPLE_REQUEST.as_bytes());
    write_utf8(&config.parcels, SAMPLE_PARCELS.as_bytes());

    let err = execute_rank(&config).expect_err("base score outside the unit interval");
    match err {
        CliError::Prepare(PrepareError::Options(ScoringOptionsError::BaseScoreOutOfRange {
            ..
        })) => {}
        other => panic!("expected invalid scoring options, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "limit": "many" }));

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

    let (_tmp, root) = utf8_workspace();
    let env_request = root.join("from-env-request.json");
    let cli_parcels = root.join("from-cli-parcels.json");

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "parcels": root.join("from-file-parcels.json").as_str(),
            "base_score": 0.25,
            "limit": 5,
        }),
        None,
    );
    composer.push_environment(json!({
        "request_path": env_request.as_str(),
        "limit": 10,
    }));
    composer.push_cli(json!({
        "parcels": cli_parcels.as_str(),
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.request_path, env_request);
    assert_eq!(config.parcels, cli_parcels);
    assert_eq!(config.base_score, 0.25);
    assert_eq!(config.limit, Some(10));
}
