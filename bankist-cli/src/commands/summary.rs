//! Summary command - log in once and print the account view

use std::path::Path;

use anyhow::{bail, Result};
use bankist_core::adapters::LocaleFormatter;

use super::{get_context, headless, runtime};
use crate::output::print_view;

pub fn run(seed: Option<&Path>, user: &str, pin: &str, sort: bool, json: bool) -> Result<()> {
    let rt = runtime()?;
    let _guard = rt.enter();
    let ctx = get_context(headless(), seed)?;

    if ctx.login(user, pin).is_err() {
        bail!("Login failed");
    }
    if sort {
        ctx.toggle_sort()?;
    }
    let view = ctx.view()?;
    ctx.shutdown();

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view, &LocaleFormatter);
    }
    Ok(())
}
