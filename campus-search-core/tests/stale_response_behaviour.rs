//! Behavioural tests for [`StaleResponseGuard`].
//!
//! Each request's answer is ready immediately, so awaiting the requests in a
//! chosen order stands in for responses arriving in that order.

mod support;

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use campus_search_core::{Completion, StaleResponseGuard, test_support::ManualClock};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::{block_on, list, unquote};

type Pending = Pin<Box<dyn Future<Output = Completion>>>;

struct SearchBoxWorld {
    clock: ManualClock,
    guard: StaleResponseGuard<ManualClock>,
    requests: RefCell<HashMap<String, Pending>>,
    shown: Rc<RefCell<Vec<String>>>,
    errors: Rc<RefCell<Vec<String>>>,
}

impl SearchBoxWorld {
    fn new() -> Self {
        let clock = ManualClock::default();
        Self {
            guard: StaleResponseGuard::with_clock(clock.clone()),
            clock,
            requests: RefCell::new(HashMap::new()),
            shown: Rc::default(),
            errors: Rc::default(),
        }
    }

    fn issue(&self, name: &str, tick: u64, answer: Result<Vec<String>, String>) {
        self.clock.set(tick);
        let shown = Rc::clone(&self.shown);
        let errors = Rc::clone(&self.errors);
        let pending = self.guard.track(async move { answer }).on_complete(
            move |suggestions| *shown.borrow_mut() = suggestions,
            move |error| errors.borrow_mut().push(error),
        );
        self.requests
            .borrow_mut()
            .insert(unquote(name).to_owned(), Box::pin(pending));
    }
}

#[fixture]
fn search_box_world() -> SearchBoxWorld {
    SearchBoxWorld::new()
}

#[given("a search box guard")]
fn search_box(#[from(search_box_world)] world: &SearchBoxWorld) {
    assert_eq!(world.guard.last_accepted(), 0);
}

#[given("request {name} is issued at tick {tick} answering {text}")]
fn issue_answering(
    #[from(search_box_world)] world: &SearchBoxWorld,
    name: String,
    tick: u64,
    text: String,
) {
    world.issue(&name, tick, Ok(list(&text)));
}

#[given("request {name} is issued at tick {tick} failing with {error}")]
fn issue_failing(
    #[from(search_box_world)] world: &SearchBoxWorld,
    name: String,
    tick: u64,
    error: String,
) {
    world.issue(&name, tick, Err(unquote(&error).to_owned()));
}

#[when("request {name} completes")]
fn complete(#[from(search_box_world)] world: &SearchBoxWorld, name: String) {
    let pending = world
        .requests
        .borrow_mut()
        .remove(unquote(&name))
        .expect("request should have been issued");
    block_on(pending);
}

#[then("the shown suggestions are {texts}")]
fn shown(#[from(search_box_world)] world: &SearchBoxWorld, texts: String) {
    assert_eq!(*world.shown.borrow(), list(&texts));
}

#[then("the last accepted tick is {tick}")]
fn last_accepted(#[from(search_box_world)] world: &SearchBoxWorld, tick: u64) {
    assert_eq!(world.guard.last_accepted(), tick);
}

#[then("the error {error} was reported")]
fn error_reported(#[from(search_box_world)] world: &SearchBoxWorld, error: String) {
    assert_eq!(*world.errors.borrow(), vec![unquote(&error).to_owned()]);
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/stale_response.feature", name = $title)]
        fn $fn_name(#[from(search_box_world)] world: SearchBoxWorld) {
            let _ = world;
        }
    };
}

register_scenario!(
    late_answer_discarded,
    "a late answer to an older request is discarded"
);
register_scenario!(late_failure_reported, "a late failure is still reported");
register_scenario!(
    in_order_answers_shown,
    "answers arriving in issue order are all shown"
);
