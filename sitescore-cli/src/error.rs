//! Error types emitted by the CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` and the workspace denies `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sitescore_scorer::{PrepareError, RankingError};
use thiserror::Error;

/// Errors emitted by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the offending option.
        field: &'static str,
        /// Environment variable that can supply the option.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Name of the offending option.
        field: &'static str,
        /// Path that was referenced.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Name of the offending option.
        field: &'static str,
        /// Path that was referenced.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Name of the offending option.
        field: &'static str,
        /// Path that was referenced.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Opening an input file failed.
    #[error("failed to open {field} at {path:?}: {source}")]
    OpenInput {
        /// Name of the offending option.
        field: &'static str,
        /// Path that was referenced.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// An input file did not contain the expected JSON.
    #[error("failed to parse {field} JSON at {path:?}: {source}")]
    ParseInput {
        /// Name of the offending option.
        field: &'static str,
        /// Path that was referenced.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The analysis request could not be prepared for scoring.
    #[error("failed to prepare the analysis request: {0}")]
    Prepare(#[from] PrepareError),
    /// The ranking could not be computed.
    #[error("ranking failed: {0}")]
    Rank(#[from] RankingError),
    /// Serialising the ranking failed.
    #[error("failed to serialise ranking: {0}")]
    SerialiseRanking(#[source] serde_json::Error),
    /// Writing the ranking output failed.
    #[error("failed to write ranking output: {0}")]
    WriteRankingOutput(#[source] std::io::Error),
}
