//! Entry point for the `campus-search` command-line interface.
#![forbid(unsafe_code)]

use eyre::WrapErr;

fn main() -> eyre::Result<()> {
    campus_search_cli::run().wrap_err("campus-search failed")
}
