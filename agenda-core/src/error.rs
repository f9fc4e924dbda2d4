//! Error types for the agenda ecosystem.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::identifier::{MeetingTitle, Username};

/// Errors that can occur in agenda operations.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("No user is acting (log in first)")]
    NilUser,

    #[error("No meeting given")]
    NilMeeting,

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Meeting title cannot be empty")]
    EmptyMeetingTitle,

    #[error("Invalid username: {0:?}")]
    InvalidUsername(String),

    #[error("Invalid meeting title: {0:?}")]
    InvalidMeetingTitle(String),

    #[error("User '{0}' already exists")]
    ExistedUser(Username),

    #[error("Meeting '{0}' already exists")]
    ExistedMeeting(MeetingTitle),

    #[error("User not found: {0}")]
    UserNotFound(Username),

    #[error("Meeting not found: {0}")]
    MeetingNotFound(MeetingTitle),

    #[error("User '{user}' is already involved in meeting '{meeting}'")]
    ExistedParticipator { user: Username, meeting: MeetingTitle },

    #[error("User '{user}' is busy: conflicts with meeting '{meeting}'")]
    ConflictedTimeInterval { user: Username, meeting: MeetingTitle },

    #[error("Invalid time interval: {start} is not before {end}")]
    InvalidTimeInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Only the sponsor of meeting '{0}' may do this")]
    SponsorAuthority(MeetingTitle),

    #[error("The sponsor of meeting '{0}' cannot leave it (cancel it instead)")]
    SponsorResponsibility(MeetingTitle),

    #[error("Wrong username or password")]
    AuthenticationFailed,

    #[error("Not implemented: {0}")]
    NeedImplement(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;
