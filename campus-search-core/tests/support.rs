//! Helpers shared by the behaviour tests.

use std::future::Future;

/// Drive `future` to completion on a fresh current-thread runtime.
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap_or_else(|err| panic!("failed to build test runtime: {err}"))
        .block_on(future)
}

/// Strip the quotes Gherkin leaves around string arguments.
pub fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

/// Split a quoted, comma-separated step argument into its items.
pub fn list(value: &str) -> Vec<String> {
    unquote(value)
        .split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}
