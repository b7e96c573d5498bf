//! Shell command - interactive banking session
//!
//! Rejected actions print the same neutral line whatever the cause.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use bankist_core::{BankContext, Collaborators, Error};
use colored::Colorize;
use dialoguer::{Input, Password, Select};

use super::{get_context, runtime};
use crate::output::{self, TerminalUi};

const LOGGED_OUT_ACTIONS: &[&str] = &["Log in", "Quit"];
const ACTIONS: &[&str] = &[
    "Transfer money",
    "Request loan",
    "Sort movements",
    "Close account",
    "Log out",
    "Quit",
];

pub fn run(seed: Option<&Path>) -> Result<()> {
    let rt = runtime()?;
    let _guard = rt.enter();
    let ui = Arc::new(TerminalUi::new());
    let ctx = get_context(Collaborators::with_ui(ui.clone()), seed)?;

    println!("{}", "Bankist".bold());
    println!("{}", "Log in to get started".dimmed());

    let result = event_loop(&ctx, &ui);
    ctx.shutdown();
    result
}

fn event_loop(ctx: &BankContext, ui: &TerminalUi) -> Result<()> {
    loop {
        let Some(session) = ctx.session() else {
            match Select::new()
                .with_prompt("Bankist")
                .items(LOGGED_OUT_ACTIONS)
                .default(0)
                .interact()?
            {
                0 => login(ctx)?,
                _ => return Ok(()),
            }
            continue;
        };

        let prompt = format!("{} [{}]", session.username, ui.remaining());
        let choice = Select::new()
            .with_prompt(prompt)
            .items(ACTIONS)
            .default(0)
            .interact()?;

        let outcome = match choice {
            0 => transfer(ctx),
            1 if !ui.loan_enabled() => {
                output::warning("A loan request is still being processed");
                continue;
            }
            1 => request_loan(ctx),
            2 => ctx.toggle_sort().map(|_| ()).map_err(Into::into),
            3 => close_account(ctx),
            4 => ctx.logout().map_err(Into::into),
            _ => return Ok(()),
        };
        report(outcome)?;
    }
}

/// Print a neutral line for rejections, propagate anything else
fn report(outcome: Result<()>) -> Result<()> {
    match outcome {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<Error>() {
            Some(Error::SessionExpired) | Some(Error::NoActiveSession) => {
                output::warning("Log in to get started");
                Ok(())
            }
            Some(core) if core.is_rejection() => {
                println!("{}", "No changes made".dimmed());
                Ok(())
            }
            _ => Err(e),
        },
    }
}

fn login(ctx: &BankContext) -> Result<()> {
    let username: String = Input::new()
        .with_prompt("User")
        .allow_empty(true)
        .interact_text()?;
    let pin = Password::new()
        .with_prompt("PIN")
        .allow_empty_password(true)
        .interact()?;

    if ctx.login(&username, &pin).is_err() {
        println!("{}", "No changes made".dimmed());
    }
    Ok(())
}

fn transfer(ctx: &BankContext) -> Result<()> {
    let to: String = Input::new()
        .with_prompt("Transfer to")
        .allow_empty(true)
        .interact_text()?;
    let amount: String = Input::new()
        .with_prompt("Amount")
        .allow_empty(true)
        .interact_text()?;
    ctx.transfer(&to, &amount)?;
    output::success("Transfer complete");
    Ok(())
}

fn request_loan(ctx: &BankContext) -> Result<()> {
    let amount: String = Input::new()
        .with_prompt("Loan amount")
        .allow_empty(true)
        .interact_text()?;
    let granted = ctx.request_loan(&amount)?;
    output::info(&format!("Loan of {} is being processed", granted));
    Ok(())
}

fn close_account(ctx: &BankContext) -> Result<()> {
    let username: String = Input::new()
        .with_prompt("Confirm user")
        .allow_empty(true)
        .interact_text()?;
    let pin = Password::new()
        .with_prompt("Confirm PIN")
        .allow_empty_password(true)
        .interact()?;
    ctx.close_account(&username, &pin)?;
    Ok(())
}
