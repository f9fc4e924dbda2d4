pub mod account;
pub mod meeting;
pub mod query;

use std::path::Path;

use agenda_core::store::AgendaStore;
use agenda_core::{Agenda, Username};
use anyhow::{Context, Result};

use crate::session::Session;

/// Common context for every command, loaded once per invocation and saved
/// back by commands that mutate the agenda.
pub struct AgendaContext {
    pub agenda: Agenda,
    pub session: Session,
    store: AgendaStore,
}

impl AgendaContext {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let store = AgendaStore::open(data_dir);
        let agenda = store
            .load()
            .with_context(|| format!("Could not load agenda from {}", data_dir.display()))?;
        let session = Session::load(data_dir)?;

        Ok(Self {
            agenda,
            session,
            store,
        })
    }

    /// The logged-in user, if any.
    pub fn actor(&self) -> Option<Username> {
        self.session.current().cloned()
    }

    pub fn save(&self) -> Result<()> {
        self.store
            .save(&self.agenda)
            .with_context(|| format!("Could not save agenda to {}", self.store.dir().display()))
    }
}
