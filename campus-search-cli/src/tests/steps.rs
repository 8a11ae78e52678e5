//! Behaviour-driven step definitions driving the suggest and search scenarios.

use super::helpers::{CATALOGUE_JSON, CatalogueDir, StubBackendBuilder};
use super::*;
use crate::{search::run_search_with, suggest::run_suggest_with};
use campus_search_core::{
    AddressCandidate, Feature, SearchResult, SuggestError, Suggestion, TransportError,
    test_support::{RecordingFeatureStore, StubGeocoder, named_point},
};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{cell::RefCell, sync::Arc};

struct CommandWorld {
    catalogue: CatalogueDir,
    include_catalogue: RefCell<bool>,
    geocoder: RefCell<StubGeocoder>,
    buildings: RefCell<Vec<Feature>>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CommandWorld {
    fn new() -> Self {
        Self {
            catalogue: CatalogueDir::new(),
            include_catalogue: RefCell::new(true),
            geocoder: RefCell::new(StubGeocoder::new()),
            buildings: RefCell::new(Vec::new()),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn update_geocoder(&self, change: impl FnOnce(StubGeocoder) -> StubGeocoder) {
        let current = self.geocoder.take();
        self.geocoder.replace(change(current));
    }

    fn build_command_line(&self, command: &str, term: &str) -> Vec<String> {
        let mut argv = vec![
            "campus-search".to_owned(),
            command.to_owned(),
            term.to_owned(),
        ];
        if *self.include_catalogue.borrow() {
            argv.extend([
                format!("--{ARG_CATALOGUE}"),
                self.catalogue.path().as_str().to_owned(),
            ]);
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn builder(&self) -> StubBackendBuilder {
        StubBackendBuilder {
            geocoder: Arc::new(self.geocoder.take()),
            buildings: Arc::new(RecordingFeatureStore::with_features(
                self.buildings.borrow().clone(),
            )),
            ..StubBackendBuilder::default()
        }
    }

    fn run(&self, command: &str, term: &str) {
        let invocation = self.build_command_line(command, term);
        let builder = self.builder();
        let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
        let outcome = parsed.and_then(|cli| {
            let mut buffer = self.stdout.borrow_mut();
            match cli.command {
                Command::Suggest(args) => run_suggest_with(args, &builder, &mut *buffer),
                Command::Search(args) => run_search_with(args, &builder, &mut *buffer),
            }
        });
        self.result.replace(Some(outcome));
    }

    fn stdout(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }

    fn with_error(&self, check: impl FnOnce(&CliError)) {
        let borrowed = self.result.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        check(error);
    }
}

#[fixture]
fn world() -> CommandWorld {
    CommandWorld::new()
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

fn items(value: &str) -> Vec<String> {
    unquote(value)
        .split(',')
        .map(|item| item.trim().to_owned())
        .collect()
}

#[given("a catalogue on disk")]
fn catalogue_on_disk(#[from(world)] world: &CommandWorld) {
    world.catalogue.write(CATALOGUE_JSON);
}

#[given("a catalogue containing {contents}")]
fn catalogue_containing(#[from(world)] world: &CommandWorld, contents: String) {
    world.catalogue.write(unquote(&contents));
}

#[given("I omit the catalogue path")]
fn omit_catalogue(#[from(world)] world: &CommandWorld) {
    *world.include_catalogue.borrow_mut() = false;
}

#[given("I pass {flags}")]
fn pass_flags(#[from(world)] world: &CommandWorld, flags: String) {
    world
        .cli_args
        .borrow_mut()
        .extend(unquote(&flags).split_whitespace().map(str::to_owned));
}

#[given("the campus geocoder suggests {text}")]
fn campus_suggests(#[from(world)] world: &CommandWorld, text: String) {
    world.update_geocoder(|geocoder| geocoder.with_suggestions("campus", [unquote(&text)]));
}

#[given("the campus geocoder places {key} at {x}, {y} as {address}")]
fn campus_places(
    #[from(world)] world: &CommandWorld,
    key: String,
    x: f64,
    y: f64,
    address: String,
) {
    let candidate = AddressCandidate {
        address: unquote(&address).to_owned(),
        location: Coord { x, y },
        score: 100.0,
    };
    world.update_geocoder(|geocoder| geocoder.with_candidates(unquote(&key), vec![candidate]));
}

#[given("the campus geocoder is unreachable")]
fn campus_unreachable(#[from(world)] world: &CommandWorld) {
    world.update_geocoder(|geocoder| {
        geocoder.failing_source(
            "campus",
            TransportError::Network {
                url: "https://geo.example.org/Campus/GeocodeServer/suggest".into(),
                message: "connection refused".into(),
            },
        )
    });
}

#[given("the building layer holds {name}")]
fn building_layer_holds(#[from(world)] world: &CommandWorld, name: String) {
    world.buildings.borrow_mut().push(named_point(
        "NAME",
        unquote(&name),
        Coord {
            x: -72.527,
            y: 42.389,
        },
    ));
}

#[when("I run the suggest command for {term}")]
fn run_suggest_command(#[from(world)] world: &CommandWorld, term: String) {
    world.run("suggest", unquote(&term));
}

#[when("I run the search command for {term}")]
fn run_search_command(#[from(world)] world: &CommandWorld, term: String) {
    world.run("search", unquote(&term));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &CommandWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(err) = result {
        panic!("expected success, found {err:?}");
    }
}

#[then("the printed suggestions are {texts}")]
fn printed_suggestions(#[from(world)] world: &CommandWorld, texts: String) {
    let suggestions: Vec<Suggestion> =
        serde_json::from_str(&world.stdout()).expect("output should be a suggestion list");
    let printed: Vec<&str> = suggestions.iter().map(Suggestion::text).collect();
    assert_eq!(printed, items(&texts));
}

#[then("the printed kinds are {kinds}")]
fn printed_kinds(#[from(world)] world: &CommandWorld, kinds: String) {
    let suggestions: Vec<Suggestion> =
        serde_json::from_str(&world.stdout()).expect("output should be a suggestion list");
    let printed: Vec<&str> = suggestions
        .iter()
        .map(|suggestion| suggestion.source_kind().as_str())
        .collect();
    assert_eq!(printed, items(&kinds));
}

#[then("the printed result is {name} located at {x}, {y}")]
fn printed_result(#[from(world)] world: &CommandWorld, name: String, x: f64, y: f64) {
    let result: SearchResult =
        serde_json::from_str(&world.stdout()).expect("output should be a search result");
    assert_eq!(result.name, unquote(&name));
    assert_eq!(result.location, Some(Coord { x, y }));
    assert!(result.filter.is_none());
}

#[then("the command fails because {field} is missing")]
fn fails_missing_argument(#[from(world)] world: &CommandWorld, field: String) {
    world.with_error(|error| match error {
        CliError::MissingArgument { field: missing, .. } => {
            assert_eq!(*missing, unquote(&field));
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    });
}

#[then("the command fails because the catalogue is invalid")]
fn fails_invalid_catalogue(#[from(world)] world: &CommandWorld) {
    world.with_error(|error| match error {
        CliError::ParseCatalogue { path, .. } => assert_eq!(path.as_path(), world.catalogue.path()),
        other => panic!("expected ParseCatalogue, found {other:?}"),
    });
}

#[then("the command fails because {group} suggestions failed")]
fn fails_suggestion_group(#[from(world)] world: &CommandWorld, group: String) {
    world.with_error(|error| match error {
        CliError::Suggest(SuggestError::Source { group: failed, .. }) => {
            assert_eq!(failed.to_string(), unquote(&group));
        }
        other => panic!("expected a suggestion failure, found {other:?}"),
    });
}

#[then("the command fails because only {available} suggestions are available")]
fn fails_pick_out_of_range(#[from(world)] world: &CommandWorld, available: usize) {
    world.with_error(|error| match error {
        CliError::PickOutOfRange {
            available: actual, ..
        } => assert_eq!(*actual, available),
        other => panic!("expected PickOutOfRange, found {other:?}"),
    });
}

#[then("the command fails because nothing was suggested")]
fn fails_nothing_suggested(#[from(world)] world: &CommandWorld) {
    world.with_error(|error| match error {
        CliError::NoSuggestions { term } => assert_eq!(term, "zzz"),
        other => panic!("expected NoSuggestions, found {other:?}"),
    });
}

#[then("the command fails with the message {message}")]
fn fails_with_message(#[from(world)] world: &CommandWorld, message: String) {
    world.with_error(|error| {
        let rendered = error.to_string();
        assert!(
            rendered.contains(unquote(&message)),
            "{rendered:?} should mention {message}"
        );
    });
}

macro_rules! register_suggest_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/suggest_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CommandWorld) {
            let _ = world;
        }
    };
}

macro_rules! register_search_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/search_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CommandWorld) {
            let _ = world;
        }
    };
}

register_suggest_scenario!(suggest_prints_json, "printing suggestions as JSON");
register_suggest_scenario!(suggest_locations_only, "restricting suggestions to locations");
register_suggest_scenario!(suggest_missing_catalogue, "rejecting a missing catalogue path");
register_suggest_scenario!(suggest_invalid_catalogue, "rejecting a catalogue that is not JSON");
register_suggest_scenario!(suggest_failing_backend, "reporting a failing backend");

register_search_scenario!(search_first_suggestion, "resolving the first suggestion");
register_search_scenario!(search_pick_out_of_range, "picking past the end of the list");
register_search_scenario!(search_my_location, "resolving my location from a given position");
register_search_scenario!(search_my_location_unknown, "resolving my location without a position");
register_search_scenario!(search_nothing_suggested, "nothing to resolve");
