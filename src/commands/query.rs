use agenda_core::registry::Persist;
use anyhow::Result;
use owo_colors::OwoColorize;

use super::AgendaContext;
use crate::render::Render;
use crate::time::{parse_interval, parse_range};

pub fn meetings(
    ctx: &AgendaContext,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> Result<()> {
    let range = parse_range(from.as_deref(), to.as_deref())?;
    let actor = ctx.actor();
    let meetings = ctx.agenda.query_meetings_by_interval(actor.as_ref(), &range)?;

    if json {
        let records: Vec<_> = meetings.iter().map(|m| m.record()).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if meetings.is_empty() {
        println!("{}", "No meetings found".dimmed());
        return Ok(());
    }

    for meeting in &meetings {
        println!("  {}", meeting.render());
    }
    Ok(())
}

pub fn free(
    ctx: &AgendaContext,
    start: String,
    end: Option<String>,
    duration: Option<String>,
) -> Result<()> {
    let interval = parse_interval(&start, end.as_deref(), duration.as_deref())?;
    let actor = ctx.actor();

    if ctx.agenda.free_when(actor.as_ref(), &interval) {
        println!("{}", format!("  Free {}", interval.render()).green());
        return Ok(());
    }

    // Busy or not logged in; the query tells the two apart.
    let conflicts = ctx.agenda.query_meetings_by_interval(actor.as_ref(), &interval)?;
    println!("{}", format!("  Busy {}", interval.render()).red());
    for meeting in &conflicts {
        println!("   {}", meeting.render());
    }
    Ok(())
}
