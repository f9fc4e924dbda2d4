//! Terminal rendering for agenda types.
//!
//! Extension traits that add colored output to agenda-core types using
//! owo_colors.

use agenda_core::meeting::Meeting;
use agenda_core::user::UserInfoPublic;
use agenda_core::{Identifier, TimeInterval};
use chrono::Local;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for TimeInterval {
    fn render(&self) -> String {
        let start = self.start().with_timezone(&Local);
        let end = self.end().with_timezone(&Local);

        if start.date_naive() == end.date_naive() {
            format!(
                "{} {}-{}",
                start.format("%a %b %-d"),
                start.format("%H:%M"),
                end.format("%H:%M")
            )
        } else {
            format!(
                "{} - {}",
                start.format("%a %b %-d %H:%M"),
                end.format("%a %b %-d %H:%M")
            )
        }
    }
}

impl Render for Meeting {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {}",
            self.title().as_str().bold(),
            self.interval().render().dimmed(),
            format!("(sponsor: {})", self.sponsor()).cyan()
        );

        if !self.participants().is_empty() {
            let names: Vec<&str> = self.participants().iter().map(|p| p.as_str()).collect();
            line.push_str(&format!("\n     with {}", names.join(", ")));
        }

        line
    }
}

impl Render for UserInfoPublic {
    fn render(&self) -> String {
        let mut line = self.name.as_str().bold().to_string();
        if !self.mail.is_empty() {
            line.push_str(&format!(" <{}>", self.mail));
        }
        if !self.phone.is_empty() {
            line.push_str(&format!(" {}", self.phone.dimmed()));
        }
        line
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
