use agenda_core::meeting::MeetingInfo;
use agenda_core::{MeetingTitle, Username};
use anyhow::Result;
use owo_colors::OwoColorize;

use super::AgendaContext;
use crate::render::{Render, pluralize};
use crate::time::parse_interval;

pub fn sponsor(
    ctx: &mut AgendaContext,
    title: String,
    start: String,
    end: Option<String>,
    duration: Option<String>,
    participants: Vec<String>,
) -> Result<()> {
    let interval = parse_interval(&start, end.as_deref(), duration.as_deref())?;
    let info = MeetingInfo {
        title: MeetingTitle::new(title),
        start_time: interval.start(),
        end_time: interval.end(),
        participants: participants.into_iter().map(Username::new).collect(),
    };

    let actor = ctx.actor();
    let meeting = ctx.agenda.sponsor_meeting(actor.as_ref(), info)?;
    println!("{}", "  Created:".green());
    println!("   {}", meeting.render());

    ctx.save()
}

pub fn invite(ctx: &mut AgendaContext, title: String, user: String) -> Result<()> {
    let title = MeetingTitle::new(title);
    let user = Username::new(user);

    let actor = ctx.actor();
    ctx.agenda.add_participator(actor.as_ref(), &title, &user)?;
    println!("{}", format!("  Added {} to {}", user, title).green());

    ctx.save()
}

pub fn dismiss(ctx: &mut AgendaContext, title: String, user: String) -> Result<()> {
    let title = MeetingTitle::new(title);
    let user = Username::new(user);

    let actor = ctx.actor();
    ctx.agenda.remove_participator(actor.as_ref(), &title, &user)?;
    println!("{}", format!("  Removed {} from {}", user, title).yellow());

    ctx.save()
}

pub fn cancel(ctx: &mut AgendaContext, title: String) -> Result<()> {
    let title = MeetingTitle::new(title);

    let actor = ctx.actor();
    let meeting = ctx.agenda.cancel_meeting(actor.as_ref(), &title)?;
    println!("{}", format!("  Canceled: {}", meeting.title()).red());

    ctx.save()
}

pub fn quit(ctx: &mut AgendaContext, title: String) -> Result<()> {
    let title = MeetingTitle::new(title);

    let actor = ctx.actor();
    ctx.agenda.quit_meeting(actor.as_ref(), &title)?;
    println!("{}", format!("  Left: {}", title).yellow());

    ctx.save()
}

pub fn clear(ctx: &mut AgendaContext) -> Result<()> {
    let actor = ctx.actor();
    let canceled = ctx.agenda.cancel_all_meetings(actor.as_ref())?;

    if canceled.is_empty() {
        println!("{}", "  No sponsored meetings".dimmed());
        return Ok(());
    }

    let label = format!(
        "  Canceled {} {}",
        canceled.len(),
        pluralize("meeting", canceled.len())
    );
    println!("{}", label.red());
    for meeting in &canceled {
        println!("   {}", meeting.title());
    }

    ctx.save()
}
