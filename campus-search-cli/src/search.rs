//! Search command implementation for the campus search CLI.
//!
//! A search suggests for the term, picks one suggestion by position and
//! resolves it, mirroring a user choosing an entry from the dropdown.

use std::{io::Write, sync::Arc, time::Duration};

use camino::Utf8PathBuf;
use campus_search_core::{
    AggregatorOptions, LocationCapability, LocationError, ResolverOptions, SearchResolver,
    SearchResult, StaticLocation, SuggestionAggregator,
};
use campus_search_data::HttpClientConfig;
use clap::Parser;
use geo::Coord;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CATALOGUE, ARG_HTTP_TIMEOUT, ARG_LATITUDE, ARG_LOCATION_TIMEOUT, ARG_LOCATIONS_ONLY,
    ARG_LONGITUDE, ARG_ON_CAMPUS_ONLY, ARG_PICK, ARG_TERM, ArcGisBackendBuilder, BackendBuilder,
    BackendRequest, CliError, ENV_SEARCH_CATALOGUE, ENV_SEARCH_TERM, block_on, load_catalogue,
    suggest::http_config, write_json,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Suggest for the term, pick one suggestion by its position \
                 in the list (0 by default) and print the resolved result as \
                 JSON. Resolving \"Use my location\" needs --latitude and \
                 --longitude.",
    about = "Resolve a suggestion for a term"
)]
#[ortho_config(prefix = "CAMPUS_SEARCH")]
pub(crate) struct SearchArgs {
    /// Text typed into the search box.
    #[arg(value_name = "term")]
    #[serde(default)]
    pub(crate) term: Option<String>,
    /// Path to the JSON catalogue of backends.
    #[arg(long = ARG_CATALOGUE, value_name = "path")]
    #[serde(default)]
    pub(crate) catalogue: Option<Utf8PathBuf>,
    /// Position of the suggestion to resolve.
    #[arg(long = ARG_PICK, value_name = "n")]
    #[serde(default)]
    pub(crate) pick: Option<usize>,
    /// Only suggest locations and buildings.
    #[arg(long = ARG_LOCATIONS_ONLY, num_args = 0..=1, default_missing_value = "true")]
    #[serde(default)]
    pub(crate) locations_only: Option<bool>,
    /// Skip off-campus geocoding sources.
    #[arg(long = ARG_ON_CAMPUS_ONLY, num_args = 0..=1, default_missing_value = "true")]
    #[serde(default)]
    pub(crate) on_campus_only: Option<bool>,
    /// Latitude reported as the device location.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude reported as the device location.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Timeout for each remote request, in seconds.
    #[arg(long = ARG_HTTP_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) http_timeout_secs: Option<u64>,
    /// Upper bound on waiting for the device location, in seconds.
    #[arg(long = ARG_LOCATION_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) location_timeout_secs: Option<u64>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchConfig {
    pub(crate) term: String,
    pub(crate) catalogue: Utf8PathBuf,
    pub(crate) pick: usize,
    pub(crate) options: AggregatorOptions,
    /// WGS84 device position (`x = longitude`).
    pub(crate) position: Option<Coord<f64>>,
    pub(crate) resolver: ResolverOptions,
    pub(crate) http: HttpClientConfig,
}

impl SearchConfig {
    fn location(&self) -> Arc<dyn LocationCapability> {
        match self.position {
            Some(position) => Arc::new(StaticLocation::at(position)),
            None => Arc::new(StaticLocation::failing(LocationError::Unavailable {
                reason: format!("pass --{ARG_LATITUDE} and --{ARG_LONGITUDE}"),
            })),
        }
    }
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let term = args.term.ok_or(CliError::MissingArgument {
            field: ARG_TERM,
            env: ENV_SEARCH_TERM,
        })?;
        let catalogue = args.catalogue.ok_or(CliError::MissingArgument {
            field: ARG_CATALOGUE,
            env: ENV_SEARCH_CATALOGUE,
        })?;
        let position = match (args.latitude, args.longitude) {
            (Some(y), Some(x)) => Some(Coord { x, y }),
            (None, None) => None,
            _ => return Err(CliError::IncompletePosition),
        };
        let resolver = args
            .location_timeout_secs
            .map_or_else(ResolverOptions::default, |secs| {
                ResolverOptions::default().with_location_timeout(Duration::from_secs(secs))
            });
        Ok(Self {
            term,
            catalogue,
            pick: args.pick.unwrap_or(0),
            options: AggregatorOptions::default()
                .with_locations_only(args.locations_only.unwrap_or(false))
                .with_on_campus_locations_only(args.on_campus_only.unwrap_or(false)),
            position,
            resolver,
            http: http_config(args.http_timeout_secs),
        })
    }
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_search_with(args, &ArcGisBackendBuilder, &mut stdout)
}

pub(crate) fn run_search_with(
    args: SearchArgs,
    builder: &dyn BackendBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let result = execute_search(&config, builder)?;
    write_json(writer, &result)
}

fn execute_search(
    config: &SearchConfig,
    builder: &dyn BackendBuilder,
) -> Result<SearchResult, CliError> {
    let catalogue = load_catalogue(&config.catalogue)?;
    let backends = builder.build(BackendRequest {
        catalogue: &catalogue,
        http: &config.http,
        location: config.location(),
    })?;
    let aggregator = SuggestionAggregator::from_backends(&backends, config.options);
    let resolver = SearchResolver::from_backends(&backends, config.resolver);

    block_on(async {
        let suggestions = aggregator.suggest(&config.term).await?;
        if suggestions.is_empty() {
            return Err(CliError::NoSuggestions {
                term: config.term.clone(),
            });
        }
        let available = suggestions.len();
        let picked = suggestions
            .get(config.pick)
            .ok_or(CliError::PickOutOfRange {
                pick: config.pick,
                available,
            })?;
        debug!("resolving {} suggestion {:?}", picked.source_kind(), picked.text());
        resolver.search(picked).await.map_err(CliError::Search)
    })?
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchConfig::try_from(merged)
}
