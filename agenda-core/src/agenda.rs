//! The agenda: sole owner of all registered users and meetings.
//!
//! Every actor operation takes the acting user's name as `Option<&Username>`.
//! `None`, or a name nobody registered, is an absent actor: the operation
//! fails with [`AgendaError::NilUser`] and touches nothing
//! ([`Agenda::free_when`] answers `false` instead).

use std::iter;

use tracing::{debug, warn};

use crate::codec::{Decoder, Encoder};
use crate::error::{AgendaError, AgendaResult};
use crate::identifier::{Identifier, MeetingTitle, Username};
use crate::interval::TimeInterval;
use crate::meeting::{Meeting, MeetingInfo, MeetingList, MeetingRecord};
use crate::registry::Registry;
use crate::user::{User, UserInfo, UserInfoPublic, UserList};

#[derive(Debug, Default, Clone)]
pub struct Agenda {
    users: UserList,
    meetings: MeetingList,
}

impl Agenda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join separately loaded registries.
    ///
    /// Meetings whose sponsor is not registered are dropped, as are
    /// participants that are not registered.
    pub fn from_parts(users: UserList, mut meetings: MeetingList) -> Self {
        for orphan in meetings.extract_if(|m| !users.contains(m.sponsor())) {
            warn!(
                meeting = %orphan.title(),
                sponsor = %orphan.sponsor(),
                "Dropping meeting whose sponsor is not registered"
            );
        }

        for meeting in meetings.iter_mut() {
            for name in meeting.prune_participants(|p| users.contains(p)) {
                warn!(
                    meeting = %meeting.title(),
                    user = %name,
                    "Dropping participant who is not registered"
                );
            }
        }

        Agenda { users, meetings }
    }

    /// Decode a users snapshot, then a meetings snapshot.
    pub fn load(users: &mut impl Decoder, meetings: &mut impl Decoder) -> AgendaResult<Self> {
        let user_records: Vec<UserInfo> = users.decode()?;
        let meeting_records: Vec<MeetingRecord> = meetings.decode()?;

        Ok(Self::from_parts(
            UserList::deserialize(user_records),
            MeetingList::deserialize(meeting_records),
        ))
    }

    pub fn save(&self, users: &mut impl Encoder, meetings: &mut impl Encoder) -> AgendaResult<()> {
        users.encode(&self.users.serialize())?;
        meetings.encode(&self.meetings.serialize())?;
        Ok(())
    }

    pub fn users(&self) -> &UserList {
        &self.users
    }

    pub fn meetings(&self) -> &MeetingList {
        &self.meetings
    }

    pub fn user(&self, name: &Username) -> Option<&User> {
        self.users.get(name)
    }

    pub fn meeting(&self, title: &MeetingTitle) -> Option<&Meeting> {
        self.meetings.get(title)
    }

    pub fn is_registered(&self, name: &Username) -> bool {
        self.users.contains(name)
    }

    fn resolve<'a>(users: &'a UserList, actor: Option<&Username>) -> AgendaResult<&'a User> {
        actor
            .and_then(|name| users.get(name))
            .ok_or(AgendaError::NilUser)
    }

    // ACCOUNTS:

    pub fn register_user(&mut self, info: UserInfo) -> AgendaResult<&User> {
        let name = info.public.name.clone();
        if !name.is_empty() && !name.is_valid() {
            return Err(AgendaError::InvalidUsername(name.to_string()));
        }

        let user = User::new(info).ok_or(AgendaError::EmptyUsername)?;
        self.users.add(user)?;
        debug!(user = %name, "User registered");

        self.users
            .get(&name)
            .ok_or(AgendaError::UserNotFound(name))
    }

    /// Check credentials. Unknown names and wrong passwords look the same.
    pub fn log_in(&self, name: &Username, password: &str) -> AgendaResult<&User> {
        let user = self
            .users
            .get(name)
            .filter(|u| u.verify(password))
            .ok_or(AgendaError::AuthenticationFailed)?;
        debug!(user = %name, "User logged in");
        Ok(user)
    }

    pub fn query_account(&self, actor: Option<&Username>) -> AgendaResult<UserInfoPublic> {
        let user = Self::resolve(&self.users, actor)?;
        Ok(user.public_info().clone())
    }

    pub fn query_account_all(&self, actor: Option<&Username>) -> AgendaResult<Vec<UserInfoPublic>> {
        let user = Self::resolve(&self.users, actor)?;
        debug!(user = %user.name(), "User queries all accounts");
        Ok(self.users.public_infos())
    }

    /// Deregister the actor. Meetings they sponsor are dissolved and they
    /// leave every meeting they participate in.
    pub fn cancel_account(&mut self, actor: Option<&Username>) -> AgendaResult<User> {
        let name = Self::resolve(&self.users, actor)?.name().clone();

        let dissolved = self.meetings.extract_if(|m| m.sponsored_by(&name));
        for meeting in self.meetings.iter_mut() {
            meeting.prune_participants(|p| p != &name);
        }

        let user = self.users.pick_out(&name)?;
        debug!(
            user = %name,
            dissolved = dissolved.len(),
            "User canceled account"
        );
        Ok(user)
    }

    // SCHEDULING:

    /// Meetings `name` sponsors or participates in.
    pub fn involved_meetings(&self, name: &Username) -> Registry<&Meeting> {
        self.meetings.involving(name)
    }

    fn ensure_free(&self, name: &Username, interval: &TimeInterval) -> AgendaResult<()> {
        self.involved_meetings(name).for_each(|m| {
            if m.interval().overlaps(interval) {
                Err(AgendaError::ConflictedTimeInterval {
                    user: name.clone(),
                    meeting: m.title().clone(),
                })
            } else {
                Ok(())
            }
        })
    }

    /// Whether the actor has no meeting overlapping `interval`.
    /// An absent actor is never free.
    pub fn free_when(&self, actor: Option<&Username>, interval: &TimeInterval) -> bool {
        let Ok(user) = Self::resolve(&self.users, actor) else {
            return false;
        };

        match self.ensure_free(user.name(), interval) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "User is not free");
                false
            }
        }
    }

    /// Create a meeting sponsored by the actor.
    ///
    /// Every listed participant must be registered, and nobody involved may
    /// be double-booked.
    pub fn sponsor_meeting(
        &mut self,
        actor: Option<&Username>,
        info: MeetingInfo,
    ) -> AgendaResult<&Meeting> {
        let sponsor = Self::resolve(&self.users, actor)?.name().clone();
        let meeting = Meeting::new(sponsor.clone(), info)?;
        let title = meeting.title().clone();

        if self.meetings.contains(&title) {
            return Err(AgendaError::ExistedMeeting(title));
        }
        if let Some(missing) = meeting
            .participants()
            .iter()
            .find(|p| !self.users.contains(p))
        {
            return Err(AgendaError::UserNotFound(missing.clone()));
        }
        for name in iter::once(&sponsor).chain(meeting.participants()) {
            self.ensure_free(name, meeting.interval())?;
        }

        debug!(
            user = %sponsor,
            meeting = %title,
            interval = %meeting.interval(),
            "User sponsors meeting"
        );
        self.meetings.add(meeting)?;

        self.meetings
            .get(&title)
            .ok_or(AgendaError::MeetingNotFound(title))
    }

    /// Invite a registered user who is free for the whole meeting.
    pub fn add_participator(
        &mut self,
        actor: Option<&Username>,
        title: &MeetingTitle,
        name: &Username,
    ) -> AgendaResult<()> {
        let actor = Self::resolve(&self.users, actor)?;
        let meeting = self
            .meetings
            .get(title)
            .ok_or_else(|| AgendaError::MeetingNotFound(title.clone()))?;
        let user = self
            .users
            .get(name)
            .ok_or_else(|| AgendaError::UserNotFound(name.clone()))?;

        if meeting.involves(name) {
            return Err(AgendaError::ExistedParticipator {
                user: name.clone(),
                meeting: title.clone(),
            });
        }
        let interval = *meeting.interval();
        self.ensure_free(name, &interval)?;

        let meeting = self
            .meetings
            .get_mut(title)
            .ok_or_else(|| AgendaError::MeetingNotFound(title.clone()))?;
        meeting.involve(user)?;

        debug!(
            user = %actor.name(),
            participant = %name,
            meeting = %title,
            "User adds participator into meeting"
        );
        Ok(())
    }

    pub fn remove_participator(
        &mut self,
        actor: Option<&Username>,
        title: &MeetingTitle,
        name: &Username,
    ) -> AgendaResult<()> {
        let actor = Self::resolve(&self.users, actor)?;
        let user = self
            .users
            .get(name)
            .ok_or_else(|| AgendaError::UserNotFound(name.clone()))?;
        let meeting = self
            .meetings
            .get_mut(title)
            .ok_or_else(|| AgendaError::MeetingNotFound(title.clone()))?;

        meeting.exclude(user)?;

        debug!(
            user = %actor.name(),
            participant = %name,
            meeting = %title,
            "User removes participator from meeting"
        );
        Ok(())
    }

    /// Dissolve a meeting the actor sponsors.
    pub fn cancel_meeting(
        &mut self,
        actor: Option<&Username>,
        title: &MeetingTitle,
    ) -> AgendaResult<Meeting> {
        let actor = Self::resolve(&self.users, actor)?;
        let meeting = self
            .meetings
            .get(title)
            .ok_or_else(|| AgendaError::MeetingNotFound(title.clone()))?;

        if !meeting.sponsored_by(actor.name()) {
            return Err(AgendaError::SponsorAuthority(title.clone()));
        }

        self.meetings.dissolve(title)
    }

    /// Leave a meeting as a participant. Sponsors must cancel instead.
    pub fn quit_meeting(
        &mut self,
        actor: Option<&Username>,
        title: &MeetingTitle,
    ) -> AgendaResult<()> {
        let user = Self::resolve(&self.users, actor)?;
        let meeting = self
            .meetings
            .get_mut(title)
            .ok_or_else(|| AgendaError::MeetingNotFound(title.clone()))?;

        if meeting.sponsored_by(user.name()) {
            return Err(AgendaError::SponsorResponsibility(title.clone()));
        }
        if !meeting.contains_participator(user.name()) {
            return Err(AgendaError::UserNotFound(user.name().clone()));
        }

        meeting.exclude(user)?;
        debug!(user = %user.name(), meeting = %title, "User quits meeting");
        Ok(())
    }

    /// Dissolve every meeting the actor sponsors.
    pub fn cancel_all_meetings(&mut self, actor: Option<&Username>) -> AgendaResult<Vec<Meeting>> {
        let name = Self::resolve(&self.users, actor)?.name().clone();
        let mut dissolved = self.meetings.extract_if(|m| m.sponsored_by(&name));
        dissolved.sort_by(|a, b| a.title().cmp(b.title()));

        debug!(user = %name, count = dissolved.len(), "User clears sponsored meetings");
        Ok(dissolved)
    }

    // QUERIES:

    /// The actor's meetings overlapping `interval`, earliest first.
    pub fn query_meetings_by_interval(
        &self,
        actor: Option<&Username>,
        interval: &TimeInterval,
    ) -> AgendaResult<Vec<&Meeting>> {
        let user = Self::resolve(&self.users, actor)?;
        let mut found: Vec<&Meeting> = self
            .involved_meetings(user.name())
            .iter()
            .filter(|m| m.interval().overlaps(interval))
            .copied()
            .collect();
        sort_by_start(&mut found);

        debug!(user = %user.name(), %interval, "User queries meetings in time interval");
        Ok(found)
    }

    /// Meetings the actor sponsors, earliest first.
    pub fn sponsored_meetings(&self, actor: Option<&Username>) -> AgendaResult<Vec<&Meeting>> {
        let user = Self::resolve(&self.users, actor)?;
        let mut found: Vec<&Meeting> = self
            .meetings
            .iter()
            .filter(|m| m.sponsored_by(user.name()))
            .collect();
        sort_by_start(&mut found);
        Ok(found)
    }
}

fn sort_by_start(meetings: &mut [&Meeting]) {
    meetings.sort_by(|a, b| {
        a.interval()
            .start()
            .cmp(&b.interval().start())
            .then_with(|| a.title().cmp(b.title()))
    });
}
