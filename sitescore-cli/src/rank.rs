//! Rank command implementation.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sitescore_core::{AnalysisRequest, InMemoryFactsSource, ParcelFacts, StaticRangeStatistics};
use sitescore_scorer::{DEFAULT_BASE_SCORE, Ranker, RankingOutcome, ScoreAggregator, ScoringOptions};

use crate::fs::{file_is_file, open_utf8_file};
use crate::{
    ARG_RANK_BASE_SCORE, ARG_RANK_LIMIT, ARG_RANK_PARCELS, ARG_RANK_REQUEST, ARG_RANK_STATISTICS,
    CliError, ENV_RANK_PARCELS, ENV_RANK_REQUEST,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score every candidate parcel against an analysis request \
                 and print the ranking as JSON. Paths and scoring knobs can \
                 come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Rank parcels against an analysis request"
)]
#[ortho_config(prefix = "SITESCORE")]
pub(crate) struct RankArgs {
    /// Path to a JSON file containing an AnalysisRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to a JSON array of parcel facts.
    #[arg(long = ARG_RANK_PARCELS, value_name = "path")]
    #[serde(default)]
    pub(crate) parcels: Option<Utf8PathBuf>,
    /// Path to JSON range statistics keyed by indicator. Computed from the
    /// parcels when omitted.
    #[arg(long = ARG_RANK_STATISTICS, value_name = "path")]
    #[serde(default)]
    pub(crate) statistics: Option<Utf8PathBuf>,
    /// Score returned for single-value ranges.
    #[arg(long = ARG_RANK_BASE_SCORE, value_name = "score")]
    #[serde(default)]
    pub(crate) base_score: Option<f64>,
    /// Print at most this many parcels.
    #[arg(long = ARG_RANK_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Path to the JSON parcel facts.
    pub(crate) parcels: Utf8PathBuf,
    /// Optional path to precomputed statistics.
    pub(crate) statistics: Option<Utf8PathBuf>,
    /// Base score for degenerate ranges.
    pub(crate) base_score: f64,
    /// Maximum number of ranked parcels to print.
    pub(crate) limit: Option<usize>,
}

impl RankConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.request_path, ARG_RANK_REQUEST)?;
        Self::require_existing(&self.parcels, ARG_RANK_PARCELS)?;
        if let Some(statistics) = &self.statistics {
            Self::require_existing(statistics, ARG_RANK_STATISTICS)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn scoring_options(&self) -> ScoringOptions {
        ScoringOptions::default().with_base_score(self.base_score)
    }
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_RANK_REQUEST,
            env: ENV_RANK_REQUEST,
        })?;
        let parcels = args.parcels.ok_or(CliError::MissingArgument {
            field: ARG_RANK_PARCELS,
            env: ENV_RANK_PARCELS,
        })?;
        Ok(Self {
            request_path,
            parcels,
            statistics: args.statistics,
            base_score: args.base_score.unwrap_or(DEFAULT_BASE_SCORE),
            limit: args.limit,
        })
    }
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &mut stdout)
}

pub(crate) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_rank_config(args)?;
    let outcome = execute_rank(&config)?;
    write_ranking(writer, &outcome)
}

fn resolve_rank_config(args: RankArgs) -> Result<RankConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_rank(config: &RankConfig) -> Result<RankingOutcome, CliError> {
    let request: AnalysisRequest = load_json(&config.request_path, ARG_RANK_REQUEST)?;
    let parcels: Vec<ParcelFacts> = load_json(&config.parcels, ARG_RANK_PARCELS)?;
    info!("loaded {} parcels from {}", parcels.len(), config.parcels);

    let options = config.scoring_options();
    let source = InMemoryFactsSource::with_parcels(parcels);
    let statistics = match &config.statistics {
        Some(path) => load_json(path, ARG_RANK_STATISTICS)?,
        None => {
            debug!("deriving range statistics from the parcel population");
            StaticRangeStatistics::from_facts(source.parcels(), &options.defaults)
        }
    };

    let aggregator = ScoreAggregator::prepare(&request, &statistics, options)?;
    let mut outcome = Ranker::new().rank(&aggregator, &source)?;
    if let Some(limit) = config.limit {
        outcome = outcome.top(limit);
    }
    Ok(outcome)
}

/// Loads a JSON document of type `T` from disk.
pub(crate) fn load_json<T>(path: &Utf8Path, field: &'static str) -> Result<T, CliError>
where
    T: DeserializeOwned,
{
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}

fn write_ranking(writer: &mut dyn Write, outcome: &RankingOutcome) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(outcome).map_err(CliError::SerialiseRanking)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteRankingOutput)?;
    writer
        .write_all(b"\n")
        .map_err(CliError::WriteRankingOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
