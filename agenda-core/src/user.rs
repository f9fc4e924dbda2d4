//! Users: the actors of every agenda operation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AgendaError;
use crate::identifier::{Identifier, Username};
use crate::registry::{Entity, Persist, Registry, Restore};

/// Opaque credential. Never printed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Auth(String);

impl Auth {
    pub fn new(secret: impl Into<String>) -> Self {
        Auth(secret.into())
    }

    pub fn verify(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Auth(***)")
    }
}

/// The part of a user anyone may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfoPublic {
    pub name: Username,
    #[serde(default)]
    pub mail: String,
    #[serde(default)]
    pub phone: String,
}

/// Everything needed to build a [`User`], and its persisted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(flatten)]
    pub public: UserInfoPublic,
    #[serde(default)]
    pub auth: Auth,
}

impl UserInfo {
    pub fn new(
        name: impl Into<Username>,
        mail: impl Into<String>,
        phone: impl Into<String>,
        auth: Auth,
    ) -> Self {
        UserInfo {
            public: UserInfoPublic {
                name: name.into(),
                mail: mail.into(),
                phone: phone.into(),
            },
            auth,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    info: UserInfo,
}

impl User {
    /// `None` when the info carries no name.
    pub fn new(info: UserInfo) -> Option<User> {
        if info.public.name.is_empty() {
            debug!("Refusing to build a user from a nameless UserInfo");
            return None;
        }
        Some(User { info })
    }

    pub fn name(&self) -> &Username {
        &self.info.public.name
    }

    pub fn info(&self) -> &UserInfo {
        &self.info
    }

    pub fn public_info(&self) -> &UserInfoPublic {
        &self.info.public
    }

    pub fn verify(&self, password: &str) -> bool {
        self.info.auth.verify(password)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Entity for User {
    type Key = Username;

    fn key(&self) -> &Username {
        self.name()
    }

    fn nil_error() -> AgendaError {
        AgendaError::NilUser
    }

    fn empty_key_error() -> AgendaError {
        AgendaError::EmptyUsername
    }

    fn duplicate_error(key: &Username) -> AgendaError {
        AgendaError::ExistedUser(key.clone())
    }

    fn not_found_error(key: &Username) -> AgendaError {
        AgendaError::UserNotFound(key.clone())
    }
}

impl Persist for User {
    type Record = UserInfo;

    fn record(&self) -> UserInfo {
        self.info.clone()
    }
}

impl Restore for User {
    fn record_key(record: &UserInfo) -> &Username {
        &record.public.name
    }

    fn restore(record: UserInfo) -> Option<Self> {
        User::new(record)
    }
}

pub type UserList = Registry<User>;

impl UserList {
    /// Public info of every user, ordered by name.
    pub fn public_infos(&self) -> Vec<UserInfoPublic> {
        self.sorted()
            .into_iter()
            .map(|u| u.public_info().clone())
            .collect()
    }
}
