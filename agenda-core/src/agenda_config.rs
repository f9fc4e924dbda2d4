//! Where the agenda keeps its data, read from `config.toml` and the environment.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};

const DATA_DIR_FALLBACK: &str = "~/.local/share/agenda";

const TEMPLATE: &str = "\
# Settings for the agenda CLI. Uncomment a line to override it.
# AGENDA_<KEY> environment variables win over this file.

# data_dir = \"~/.local/share/agenda\"
";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AgendaConfig {
    /// Directory holding `users.json`, `meetings.json` and the session. May
    /// start with `~`.
    #[serde(default = "AgendaConfig::fallback_data_dir")]
    #[serde(skip_serializing_if = "AgendaConfig::is_fallback_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            data_dir: Self::fallback_data_dir(),
        }
    }
}

impl AgendaConfig {
    /// `<config dir>/agenda/config.toml`, e.g. `~/.config/agenda/config.toml` on Linux.
    pub fn config_path() -> AgendaResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("agenda").join("config.toml"))
            .ok_or_else(|| AgendaError::Config("no config directory on this platform".into()))
    }

    fn fallback_data_dir() -> PathBuf {
        PathBuf::from(DATA_DIR_FALLBACK)
    }

    fn is_fallback_data_dir(dir: &PathBuf) -> bool {
        dir.as_path() == Path::new(DATA_DIR_FALLBACK)
    }

    /// Read the config at [`AgendaConfig::config_path`], writing the template
    /// there first if the file does not exist yet.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::write_template(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> AgendaResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("AGENDA"))
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))
    }

    /// [`AgendaConfig::data_dir`] with a leading `~` resolved to the home directory.
    pub fn data_path(&self) -> PathBuf {
        let raw = self.data_dir.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }

    pub fn save_to(&self, path: &Path) -> AgendaResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| AgendaError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| AgendaError::Config(format!("{}: {e}", path.display())))
    }

    /// Write the commented-out template to `path`.
    pub fn write_template(path: &Path) -> AgendaResult<()> {
        let config_error =
            |e: std::io::Error| AgendaError::Config(format!("{}: {e}", path.display()));

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(config_error)?;
        }
        std::fs::write(path, TEMPLATE).map_err(config_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda").join("config.toml");

        AgendaConfig::write_template(&path).unwrap();
        let config = AgendaConfig::load_from(&path).unwrap();

        assert_eq!(config.data_dir, AgendaConfig::fallback_data_dir());
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = AgendaConfig {
            data_dir: dir.path().join("data"),
        };

        config.save_to(&path).unwrap();

        assert_eq!(AgendaConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn data_path_keeps_absolute_dirs() {
        let config = AgendaConfig {
            data_dir: PathBuf::from("/var/lib/agenda"),
        };
        assert_eq!(config.data_path(), PathBuf::from("/var/lib/agenda"));
    }

    #[test]
    fn default_data_dir_is_not_written() {
        let content = toml::to_string_pretty(&AgendaConfig::default()).unwrap();
        assert!(!content.contains("data_dir"));
    }
}
