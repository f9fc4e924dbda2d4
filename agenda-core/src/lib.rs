//! Core types for the agenda ecosystem.
//!
//! This crate provides the scheduling model used by agenda-cli:
//! - `registry` - generic keyed registries and their non-owning views
//! - `user` and `meeting` - the two registered entity kinds
//! - `agenda` - actor operations and the double-booking check
//! - `store` and `codec` - snapshot load/save

pub mod agenda;
pub mod agenda_config;
pub mod codec;
pub mod error;
pub mod identifier;
pub mod interval;
pub mod meeting;
pub mod registry;
pub mod store;
pub mod user;

pub use agenda::Agenda;
pub use error::{AgendaError, AgendaResult};
pub use identifier::{Identifier, MeetingTitle, Username};
pub use interval::TimeInterval;
