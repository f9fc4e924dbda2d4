use agenda_core::Username;
use agenda_core::user::{Auth, UserInfo};
use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use super::AgendaContext;
use crate::render::{Render, pluralize};

pub fn register(
    ctx: &mut AgendaContext,
    name: String,
    password: Option<String>,
    mail: Option<String>,
    phone: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_new_password()?,
    };

    let info = UserInfo::new(
        name,
        mail.unwrap_or_default(),
        phone.unwrap_or_default(),
        Auth::new(password),
    );
    let user = ctx.agenda.register_user(info)?;
    println!("{}", format!("  Registered: {}", user.name()).green());

    ctx.save()
}

fn prompt_new_password() -> Result<String> {
    loop {
        let first = rpassword::prompt_password("  Password: ")?;
        if first.is_empty() {
            eprintln!("  {}", "Password cannot be empty".red());
            continue;
        }
        let second = rpassword::prompt_password("  Repeat password: ")?;
        if first == second {
            return Ok(first);
        }
        eprintln!("  {}", "Passwords do not match".red());
    }
}

pub fn login(ctx: &mut AgendaContext, name: String, password: Option<String>) -> Result<()> {
    let name = Username::new(name);
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("  Password: ")?,
    };

    ctx.agenda.log_in(&name, &password)?;
    ctx.session.log_in(name.clone())?;
    println!("{}", format!("  Logged in as {}", name).green());

    Ok(())
}

pub fn logout(ctx: &mut AgendaContext) -> Result<()> {
    match ctx.session.log_out()? {
        Some(name) => println!("  Logged out {}", name),
        None => println!("{}", "  Not logged in".dimmed()),
    }
    Ok(())
}

pub fn whoami(ctx: &AgendaContext) -> Result<()> {
    let info = ctx.agenda.query_account(ctx.actor().as_ref())?;
    println!("  {}", info.render());
    Ok(())
}

pub fn users(ctx: &AgendaContext, json: bool) -> Result<()> {
    let infos = ctx.agenda.query_account_all(ctx.actor().as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    println!("{}", format!("{} {}", infos.len(), pluralize("user", infos.len())).bold());
    for info in &infos {
        println!("  {}", info.render());
    }
    Ok(())
}

pub fn delete_account(ctx: &mut AgendaContext, yes: bool) -> Result<()> {
    let actor = ctx.actor();

    // Fail on a missing session before prompting.
    ctx.agenda.query_account(actor.as_ref())?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("  Delete your account and cancel every meeting you sponsor?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "  Aborted".dimmed());
            return Ok(());
        }
    }

    let user = ctx.agenda.cancel_account(actor.as_ref())?;
    ctx.session.log_out()?;
    println!("{}", format!("  Deleted account: {}", user.name()).red());

    ctx.save()
}
