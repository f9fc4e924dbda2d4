//! Unique identifiers for registered entities.
//!
//! Identifiers compare by exact string match. No case folding or whitespace
//! trimming is applied, so `"Alice"` and `"alice"` are different users.
//!
//! Emptiness and validity are separate checks: deserialization accepts any
//! string so that a bulk load can skip bad records instead of failing as a
//! whole. Use [`Identifier::is_valid`] before trusting a key.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// A string-like key for a registry entry.
pub trait Identifier: Clone + Eq + Ord + Hash + fmt::Display + fmt::Debug {
    fn as_str(&self) -> &str;

    fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Non-empty, no surrounding whitespace, no control characters.
    fn is_valid(&self) -> bool {
        let s = self.as_str();
        !s.is_empty() && s.trim() == s && !s.chars().any(char::is_control)
    }
}

/// Username, the unique identifier of a User.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(name: impl Into<String>) -> Self {
        Username(name.into())
    }
}

impl Identifier for Username {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Username::new(s)
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Username(s)
    }
}

/// Title of a Meeting, unique among all meetings.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingTitle(String);

impl MeetingTitle {
    pub fn new(title: impl Into<String>) -> Self {
        MeetingTitle(title.into())
    }
}

impl Identifier for MeetingTitle {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeetingTitle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MeetingTitle {
    fn from(s: &str) -> Self {
        MeetingTitle::new(s)
    }
}

impl From<String> for MeetingTitle {
    fn from(s: String) -> Self {
        MeetingTitle(s)
    }
}
