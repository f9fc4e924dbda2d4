//! Meetings: one sponsor, a set of participants, a time interval.
//!
//! The sponsor is never stored among the participants. A sponsor is still
//! involved in their own meeting, so they can be neither invited to it
//! nor excluded from it.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AgendaError, AgendaResult};
use crate::identifier::{Identifier, MeetingTitle, Username};
use crate::interval::TimeInterval;
use crate::registry::{Entity, Persist, Registry, Restore};
use crate::user::User;

/// What a sponsor supplies to create a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingInfo {
    pub title: MeetingTitle,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub participants: BTreeSet<Username>,
}

/// Persisted form of a [`Meeting`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    #[serde(flatten)]
    pub info: MeetingInfo,
    pub sponsor: Username,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Meeting {
    title: MeetingTitle,
    interval: TimeInterval,
    sponsor: Username,
    participants: BTreeSet<Username>,
}

impl Meeting {
    pub fn new(sponsor: Username, info: MeetingInfo) -> AgendaResult<Meeting> {
        if info.title.is_empty() {
            return Err(AgendaError::EmptyMeetingTitle);
        }
        if !info.title.is_valid() {
            return Err(AgendaError::InvalidMeetingTitle(info.title.to_string()));
        }
        if sponsor.is_empty() {
            return Err(AgendaError::EmptyUsername);
        }

        let interval = TimeInterval::new(info.start_time, info.end_time)?;

        if let Some(bad) = info.participants.iter().find(|p| !p.is_valid()) {
            return Err(AgendaError::InvalidUsername(bad.to_string()));
        }
        if info.participants.contains(&sponsor) {
            return Err(AgendaError::ExistedParticipator {
                user: sponsor,
                meeting: info.title,
            });
        }

        Ok(Meeting {
            title: info.title,
            interval,
            sponsor,
            participants: info.participants,
        })
    }

    pub fn title(&self) -> &MeetingTitle {
        &self.title
    }

    pub fn interval(&self) -> &TimeInterval {
        &self.interval
    }

    pub fn sponsor(&self) -> &Username {
        &self.sponsor
    }

    pub fn participants(&self) -> &BTreeSet<Username> {
        &self.participants
    }

    pub fn sponsored_by(&self, name: &Username) -> bool {
        &self.sponsor == name
    }

    pub fn contains_participator(&self, name: &Username) -> bool {
        self.participants.contains(name)
    }

    /// Sponsor or participant.
    pub fn involves(&self, name: &Username) -> bool {
        self.sponsored_by(name) || self.contains_participator(name)
    }

    pub fn involve(&mut self, user: &User) -> AgendaResult<()> {
        if self.involves(user.name()) {
            return Err(AgendaError::ExistedParticipator {
                user: user.name().clone(),
                meeting: self.title.clone(),
            });
        }
        self.participants.insert(user.name().clone());
        Ok(())
    }

    pub fn exclude(&mut self, user: &User) -> AgendaResult<()> {
        if self.sponsored_by(user.name()) {
            return Err(AgendaError::SponsorResponsibility(self.title.clone()));
        }
        if !self.participants.remove(user.name()) {
            return Err(AgendaError::UserNotFound(user.name().clone()));
        }
        Ok(())
    }

    /// Drop participants that `keep` rejects, returning them.
    pub(crate) fn prune_participants<P>(&mut self, mut keep: P) -> Vec<Username>
    where
        P: FnMut(&Username) -> bool,
    {
        let (kept, dropped): (BTreeSet<Username>, BTreeSet<Username>) =
            std::mem::take(&mut self.participants)
                .into_iter()
                .partition(|p| keep(p));
        self.participants = kept;
        dropped.into_iter().collect()
    }

    pub fn info(&self) -> MeetingInfo {
        MeetingInfo {
            title: self.title.clone(),
            start_time: self.interval.start(),
            end_time: self.interval.end(),
            participants: self.participants.clone(),
        }
    }
}

impl fmt::Display for Meeting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl Entity for Meeting {
    type Key = MeetingTitle;

    fn key(&self) -> &MeetingTitle {
        &self.title
    }

    fn nil_error() -> AgendaError {
        AgendaError::NilMeeting
    }

    fn empty_key_error() -> AgendaError {
        AgendaError::EmptyMeetingTitle
    }

    fn duplicate_error(key: &MeetingTitle) -> AgendaError {
        AgendaError::ExistedMeeting(key.clone())
    }

    fn not_found_error(key: &MeetingTitle) -> AgendaError {
        AgendaError::MeetingNotFound(key.clone())
    }
}

impl Persist for Meeting {
    type Record = MeetingRecord;

    fn record(&self) -> MeetingRecord {
        MeetingRecord {
            info: self.info(),
            sponsor: self.sponsor.clone(),
        }
    }
}

impl Restore for Meeting {
    fn record_key(record: &MeetingRecord) -> &MeetingTitle {
        &record.info.title
    }

    fn restore(record: MeetingRecord) -> Option<Self> {
        let title = record.info.title.clone();
        Meeting::new(record.sponsor, record.info)
            .map_err(|e| warn!(meeting = %title, error = %e, "Dropping malformed meeting record"))
            .ok()
    }
}

pub type MeetingList = Registry<Meeting>;

impl MeetingList {
    /// Meetings `name` sponsors or participates in.
    pub fn involving(&self, name: &Username) -> Registry<&Meeting> {
        self.filter(|m| m.involves(name))
    }

    /// Remove a meeting for good, handing it back to the caller.
    pub fn dissolve(&mut self, title: &MeetingTitle) -> AgendaResult<Meeting> {
        let meeting = self.pick_out(title)?;
        debug!(meeting = %title, sponsor = %meeting.sponsor, "Meeting dissolved");
        Ok(meeting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{Auth, UserInfo};
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, h, 0, 0).unwrap()
    }

    fn user(name: &str) -> User {
        User::new(UserInfo::new(name, "", "", Auth::default())).unwrap()
    }

    fn info(title: &str, participants: &[&str]) -> MeetingInfo {
        MeetingInfo {
            title: MeetingTitle::new(title),
            start_time: at(10),
            end_time: at(11),
            participants: participants.iter().map(|p| Username::new(*p)).collect(),
        }
    }

    fn standup() -> Meeting {
        Meeting::new(Username::new("alice"), info("standup", &["bob"])).unwrap()
    }

    #[test]
    fn new_rejects_reversed_interval() {
        let mut bad = info("standup", &[]);
        bad.end_time = at(9);
        assert!(matches!(
            Meeting::new(Username::new("alice"), bad),
            Err(AgendaError::InvalidTimeInterval { .. })
        ));
    }

    #[test]
    fn new_rejects_empty_title() {
        assert!(matches!(
            Meeting::new(Username::new("alice"), info("", &[])),
            Err(AgendaError::EmptyMeetingTitle)
        ));
    }

    #[test]
    fn sponsor_cannot_be_listed_as_participant() {
        assert!(matches!(
            Meeting::new(Username::new("alice"), info("standup", &["alice"])),
            Err(AgendaError::ExistedParticipator { .. })
        ));
    }

    #[test]
    fn sponsor_is_involved_but_not_a_participant() {
        let meeting = standup();
        let alice = Username::new("alice");

        assert!(meeting.sponsored_by(&alice));
        assert!(!meeting.contains_participator(&alice));
        assert!(meeting.involves(&alice));
        assert!(meeting.involves(&Username::new("bob")));
        assert!(!meeting.involves(&Username::new("carol")));
    }

    #[test]
    fn involve_adds_once() {
        let mut meeting = standup();
        let carol = user("carol");

        meeting.involve(&carol).unwrap();
        assert!(meeting.contains_participator(carol.name()));
        assert!(matches!(
            meeting.involve(&carol),
            Err(AgendaError::ExistedParticipator { .. })
        ));
        assert_eq!(meeting.participants().len(), 2);
    }

    #[test]
    fn involving_the_sponsor_is_rejected() {
        let mut meeting = standup();
        assert!(matches!(
            meeting.involve(&user("alice")),
            Err(AgendaError::ExistedParticipator { .. })
        ));
        assert!(!meeting.contains_participator(&Username::new("alice")));
    }

    #[test]
    fn excluding_the_sponsor_is_rejected() {
        let mut meeting = standup();
        assert!(matches!(
            meeting.exclude(&user("alice")),
            Err(AgendaError::SponsorResponsibility(_))
        ));
        assert!(meeting.sponsored_by(&Username::new("alice")));
    }

    #[test]
    fn exclude_requires_membership() {
        let mut meeting = standup();
        meeting.exclude(&user("bob")).unwrap();
        assert!(meeting.participants().is_empty());
        assert!(matches!(
            meeting.exclude(&user("bob")),
            Err(AgendaError::UserNotFound(_))
        ));
    }

    #[test]
    fn prune_participants_returns_dropped() {
        let mut meeting =
            Meeting::new(Username::new("alice"), info("standup", &["bob", "carol"])).unwrap();
        let dropped = meeting.prune_participants(|p| p.as_str() != "carol");

        assert_eq!(dropped, vec![Username::new("carol")]);
        assert_eq!(meeting.participants().len(), 1);
    }

    #[test]
    fn dissolve_is_terminal() {
        let mut meetings = MeetingList::new();
        meetings.add(standup()).unwrap();
        let title = MeetingTitle::new("standup");

        let dissolved = meetings.dissolve(&title).unwrap();

        assert_eq!(dissolved.title(), &title);
        assert!(!meetings.contains(&title));
        assert!(matches!(
            meetings.dissolve(&title),
            Err(AgendaError::MeetingNotFound(_))
        ));
    }

    #[test]
    fn involving_filters_by_sponsor_or_participant() {
        let mut meetings = MeetingList::new();
        meetings.add(standup()).unwrap();
        meetings
            .add(Meeting::new(Username::new("carol"), info("retro", &["dave"])).unwrap())
            .unwrap();

        assert_eq!(meetings.involving(&Username::new("alice")).len(), 1);
        assert_eq!(meetings.involving(&Username::new("bob")).len(), 1);
        assert_eq!(meetings.involving(&Username::new("dave")).len(), 1);
        assert!(meetings.involving(&Username::new("erin")).is_empty());
        assert_eq!(meetings.len(), 2);
    }

    #[test]
    fn record_round_trip() {
        let meeting = standup();
        let json = serde_json::to_string(&meeting.record()).unwrap();
        let record: MeetingRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(Meeting::restore(record), Some(meeting));
    }

    #[test]
    fn malformed_record_restores_to_none() {
        let mut record = standup().record();
        record.info.end_time = record.info.start_time;
        assert!(Meeting::restore(record).is_none());
    }
}
