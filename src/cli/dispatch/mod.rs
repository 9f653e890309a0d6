use crate::cli::actions::Action;
use anyhow::{Context, Result};

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let users_url = matches
        .get_one::<String>("users-url")
        .cloned()
        .context("missing required argument: --users-url")?;

    Ok(Action::Console { users_url })
}
