//! Command-line interface for ranking parcels by industrial-site suitability.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod rank;

pub use error::CliError;

use rank::{RankArgs, run_rank};

pub(crate) const ARG_RANK_REQUEST: &str = "request";
pub(crate) const ARG_RANK_PARCELS: &str = "parcels";
pub(crate) const ARG_RANK_STATISTICS: &str = "statistics";
pub(crate) const ARG_RANK_BASE_SCORE: &str = "base-score";
pub(crate) const ARG_RANK_LIMIT: &str = "limit";
pub(crate) const ENV_RANK_REQUEST: &str = "SITESCORE_CMDS_RANK_REQUEST_PATH";
pub(crate) const ENV_RANK_PARCELS: &str = "SITESCORE_CMDS_RANK_PARCELS";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid, inputs cannot be read or
/// the ranking fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => run_rank(args)?,
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "sitescore",
    about = "Rank land parcels by weighted industrial-site suitability",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Score and rank parcels against an analysis request.
    Rank(RankArgs),
}

#[cfg(test)]
mod tests;
