//! The logged-in user, remembered between invocations.

use std::path::{Path, PathBuf};

use agenda_core::{Identifier, Username};
use anyhow::{Context, Result};

const SESSION_FILE: &str = "session";

pub struct Session {
    path: PathBuf,
    current: Option<Username>,
}

impl Session {
    /// Read `<data_dir>/session`. A missing or blank file means nobody is logged in.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(SESSION_FILE);

        let current = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Could not read session file {}", path.display()))?;
            Some(Username::new(content.trim())).filter(|name| !name.is_empty())
        } else {
            None
        };

        Ok(Session { path, current })
    }

    pub fn current(&self) -> Option<&Username> {
        self.current.as_ref()
    }

    pub fn log_in(&mut self, name: Username) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, name.as_str())
            .with_context(|| format!("Could not write session file {}", self.path.display()))?;
        self.current = Some(name);
        Ok(())
    }

    /// Forget the current user, returning who it was.
    pub fn log_out(&mut self) -> Result<Option<Username>> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(self.current.take())
    }
}
