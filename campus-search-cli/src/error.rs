//! Error types emitted by the campus search CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use campus_search_core::{SearchError, SuggestError};
use campus_search_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the campus search CLI.
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
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// Only one of latitude and longitude was supplied.
    #[error("--latitude and --longitude must be given together")]
    IncompletePosition,
    /// Opening the catalogue file failed.
    #[error("failed to open catalogue at {path:?}: {source}")]
    OpenCatalogue {
        /// Catalogue path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The catalogue JSON could not be decoded.
    #[error("failed to parse catalogue JSON at {path:?}: {source}")]
    ParseCatalogue {
        /// Catalogue path.
        path: Utf8PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// Constructing an ArcGIS backend failed.
    #[error("failed to build backend for {url:?}: {source}")]
    BuildBackend {
        /// Service the backend would have called.
        url: String,
        /// Underlying build failure.
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// A suggestion batch failed.
    #[error(transparent)]
    Suggest(#[from] SuggestError),
    /// The search term produced no suggestions to resolve.
    #[error("no suggestions for {term:?}")]
    NoSuggestions {
        /// The search term.
        term: String,
    },
    /// `--pick` is past the end of the suggestion list.
    #[error("cannot pick suggestion {pick}: only {available} available")]
    PickOutOfRange {
        /// Requested position.
        pick: usize,
        /// Length of the suggestion list.
        available: usize,
    },
    /// Resolving the picked suggestion failed.
    #[error("search failed: {}", .0.user_message())]
    Search(#[source] SearchError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
