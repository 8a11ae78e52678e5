//! Command-line interface for campus search.
//!
//! `campus-search suggest <term>` prints the merged autocomplete list and
//! `campus-search search <term>` resolves one of those suggestions. Both read
//! a JSON catalogue describing the geocoding sources, the filter table and the
//! building and space layers.
#![forbid(unsafe_code)]

use std::{future::Future, io::Write};

use clap::{Parser, Subcommand, error::ErrorKind};
use serde::Serialize;

mod backend;
mod catalogue;
mod error;
mod search;
mod suggest;

pub use backend::{ArcGisBackendBuilder, BackendBuilder, BackendRequest};
pub use catalogue::{BuildingLayer, CatalogueFile, SpaceLayer, load_catalogue};
pub use error::CliError;

use search::{SearchArgs, run_search};
use suggest::{SuggestArgs, run_suggest};

pub(crate) const ARG_TERM: &str = "term";
pub(crate) const ARG_CATALOGUE: &str = "catalogue";
pub(crate) const ARG_LOCATIONS_ONLY: &str = "locations-only";
pub(crate) const ARG_ON_CAMPUS_ONLY: &str = "on-campus-only";
pub(crate) const ARG_HTTP_TIMEOUT: &str = "http-timeout-secs";
pub(crate) const ARG_PICK: &str = "pick";
pub(crate) const ARG_LATITUDE: &str = "latitude";
pub(crate) const ARG_LONGITUDE: &str = "longitude";
pub(crate) const ARG_LOCATION_TIMEOUT: &str = "location-timeout-secs";
pub(crate) const ENV_SUGGEST_TERM: &str = "CAMPUS_SEARCH_CMDS_SUGGEST_TERM";
pub(crate) const ENV_SUGGEST_CATALOGUE: &str = "CAMPUS_SEARCH_CMDS_SUGGEST_CATALOGUE";
pub(crate) const ENV_SEARCH_TERM: &str = "CAMPUS_SEARCH_CMDS_SEARCH_TERM";
pub(crate) const ENV_SEARCH_CATALOGUE: &str = "CAMPUS_SEARCH_CMDS_SEARCH_CATALOGUE";

/// Run the campus search CLI with the current process arguments and
/// environment.
///
/// # Errors
///
/// Returns a [`CliError`] when arguments or configuration are invalid, the
/// catalogue cannot be read, or a backend call fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().or_else(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => Err(CliError::ArgumentParsing(err)),
    })?;
    match cli.command {
        Command::Suggest(args) => run_suggest(args),
        Command::Search(args) => run_search(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "campus-search",
    about = "Autocomplete and resolve campus places, buildings and filters",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the suggestion list for a search term.
    Suggest(SuggestArgs),
    /// Resolve one suggestion for a search term.
    Search(SearchArgs),
}

/// Drive `future` to completion on a single-threaded runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    Ok(runtime.block_on(future))
}

/// Write `value` to `writer` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
