//! Suggest command implementation for the campus search CLI.

use std::{io::Write, sync::Arc, time::Duration};

use camino::Utf8PathBuf;
use campus_search_core::{
    AggregatorOptions, LocationError, StaticLocation, Suggestion, SuggestionAggregator,
};
use campus_search_data::HttpClientConfig;
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CATALOGUE, ARG_HTTP_TIMEOUT, ARG_LOCATIONS_ONLY, ARG_ON_CAMPUS_ONLY, ARG_TERM,
    ArcGisBackendBuilder, BackendBuilder, BackendRequest, CliError, ENV_SUGGEST_CATALOGUE,
    ENV_SUGGEST_TERM, block_on, load_catalogue, write_json,
};

/// CLI arguments for the `suggest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Ask every configured backend for suggestions matching the \
                 term and print the merged list as JSON. Groups appear in a \
                 fixed order: filters, spaces, on-campus locations, \
                 buildings, off-campus locations, then my location.",
    about = "Print autocomplete suggestions for a term"
)]
#[ortho_config(prefix = "CAMPUS_SEARCH")]
pub(crate) struct SuggestArgs {
    /// Text typed into the search box.
    #[arg(value_name = "term")]
    #[serde(default)]
    pub(crate) term: Option<String>,
    /// Path to the JSON catalogue of backends.
    #[arg(long = ARG_CATALOGUE, value_name = "path")]
    #[serde(default)]
    pub(crate) catalogue: Option<Utf8PathBuf>,
    /// Only suggest locations and buildings.
    #[arg(long = ARG_LOCATIONS_ONLY, num_args = 0..=1, default_missing_value = "true")]
    #[serde(default)]
    pub(crate) locations_only: Option<bool>,
    /// Skip off-campus geocoding sources.
    #[arg(long = ARG_ON_CAMPUS_ONLY, num_args = 0..=1, default_missing_value = "true")]
    #[serde(default)]
    pub(crate) on_campus_only: Option<bool>,
    /// Timeout for each remote request, in seconds.
    #[arg(long = ARG_HTTP_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) http_timeout_secs: Option<u64>,
}

impl SuggestArgs {
    pub(crate) fn into_config(self) -> Result<SuggestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SuggestConfig::try_from(merged)
    }
}

/// Resolved `suggest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SuggestConfig {
    pub(crate) term: String,
    pub(crate) catalogue: Utf8PathBuf,
    pub(crate) options: AggregatorOptions,
    pub(crate) http: HttpClientConfig,
}

impl TryFrom<SuggestArgs> for SuggestConfig {
    type Error = CliError;

    fn try_from(args: SuggestArgs) -> Result<Self, Self::Error> {
        let term = args.term.ok_or(CliError::MissingArgument {
            field: ARG_TERM,
            env: ENV_SUGGEST_TERM,
        })?;
        let catalogue = args.catalogue.ok_or(CliError::MissingArgument {
            field: ARG_CATALOGUE,
            env: ENV_SUGGEST_CATALOGUE,
        })?;
        let options = AggregatorOptions::default()
            .with_locations_only(args.locations_only.unwrap_or(false))
            .with_on_campus_locations_only(args.on_campus_only.unwrap_or(false));
        Ok(Self {
            term,
            catalogue,
            options,
            http: http_config(args.http_timeout_secs),
        })
    }
}

/// HTTP settings with an optional timeout override.
pub(crate) fn http_config(timeout_secs: Option<u64>) -> HttpClientConfig {
    let config = HttpClientConfig::default();
    match timeout_secs {
        Some(secs) => config.with_timeout(Duration::from_secs(secs)),
        None => config,
    }
}

pub(crate) fn run_suggest(args: SuggestArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_suggest_with(args, &ArcGisBackendBuilder, &mut stdout)
}

pub(crate) fn run_suggest_with(
    args: SuggestArgs,
    builder: &dyn BackendBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let suggestions = execute_suggest(&config, builder)?;
    write_json(writer, &suggestions)
}

fn execute_suggest(
    config: &SuggestConfig,
    builder: &dyn BackendBuilder,
) -> Result<Vec<Suggestion>, CliError> {
    let catalogue = load_catalogue(&config.catalogue)?;
    // Suggesting never reads the position; only resolving does.
    let location = Arc::new(StaticLocation::failing(LocationError::Unavailable {
        reason: "no position was given".to_owned(),
    }));
    let backends = builder.build(BackendRequest {
        catalogue: &catalogue,
        http: &config.http,
        location,
    })?;
    let aggregator = SuggestionAggregator::from_backends(&backends, config.options);
    let suggestions = block_on(aggregator.suggest(&config.term))??;
    debug!("{} suggestions for {:?}", suggestions.len(), config.term);
    Ok(suggestions)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SuggestConfig, CliError> {
    let merged = SuggestArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SuggestConfig::try_from(merged)
}
