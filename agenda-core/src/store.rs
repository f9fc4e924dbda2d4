//! Snapshot persistence of an [`Agenda`] in a data directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::agenda::Agenda;
use crate::codec::{JsonDecoder, JsonEncoder};
use crate::error::AgendaResult;

const USERS_FILE: &str = "users.json";
const MEETINGS_FILE: &str = "meetings.json";
const EMPTY_SNAPSHOT: &[u8] = b"[]";

/// Reads and writes `users.json` and `meetings.json` under one directory.
#[derive(Debug, Clone)]
pub struct AgendaStore {
    dir: PathBuf,
}

impl AgendaStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        AgendaStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load both registries. Missing files are empty registries. A file that
    /// cannot be decoded, or holds anything after its record list, fails the
    /// whole load.
    pub fn load(&self) -> AgendaResult<Agenda> {
        let user_bytes = self.read_snapshot(USERS_FILE)?;
        let meeting_bytes = self.read_snapshot(MEETINGS_FILE)?;

        let mut users = JsonDecoder::new(user_bytes.as_slice());
        let mut meetings = JsonDecoder::new(meeting_bytes.as_slice());
        let agenda = Agenda::load(&mut users, &mut meetings)?;
        users.finish()?;
        meetings.finish()?;

        debug!(
            dir = %self.dir.display(),
            users = agenda.users().len(),
            meetings = agenda.meetings().len(),
            "Agenda loaded"
        );
        Ok(agenda)
    }

    pub fn save(&self, agenda: &Agenda) -> AgendaResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let mut users = JsonEncoder::new(Vec::new());
        let mut meetings = JsonEncoder::new(Vec::new());
        agenda.save(&mut users, &mut meetings)?;

        self.write_snapshot(USERS_FILE, &users.into_inner())?;
        self.write_snapshot(MEETINGS_FILE, &meetings.into_inner())?;

        debug!(dir = %self.dir.display(), "Agenda saved");
        Ok(())
    }

    fn read_snapshot(&self, file: &str) -> AgendaResult<Vec<u8>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(EMPTY_SNAPSHOT.to_vec());
        }
        Ok(std::fs::read(&path)?)
    }

    fn write_snapshot(&self, file: &str, content: &[u8]) -> AgendaResult<()> {
        let path = self.dir.join(file);
        let temp = self.dir.join(file.to_string() + ".tmp");

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgendaError;
    use crate::identifier::{MeetingTitle, Username};
    use crate::meeting::MeetingInfo;
    use crate::user::{Auth, UserInfo};
    use chrono::{TimeZone, Utc};

    fn populated() -> Agenda {
        let mut agenda = Agenda::new();
        agenda
            .register_user(UserInfo::new("alice", "a@example.com", "1", Auth::new("pw")))
            .unwrap();
        agenda
            .register_user(UserInfo::new("bob", "b@example.com", "2", Auth::new("pw")))
            .unwrap();
        agenda
            .sponsor_meeting(
                Some(&Username::new("alice")),
                MeetingInfo {
                    title: MeetingTitle::new("standup"),
                    start_time: Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap(),
                    end_time: Utc.with_ymd_and_hms(2025, 3, 20, 11, 0, 0).unwrap(),
                    participants: [Username::new("bob")].into_iter().collect(),
                },
            )
            .unwrap();
        agenda
    }

    #[test]
    fn missing_directory_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = AgendaStore::open(dir.path().join("nothing-here"));

        let agenda = store.load().unwrap();

        assert!(agenda.users().is_empty());
        assert!(agenda.meetings().is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = AgendaStore::open(dir.path());
        let agenda = populated();

        store.save(&agenda).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.users().public_infos(), agenda.users().public_infos());
        assert_eq!(loaded.meetings().serialize(), agenda.meetings().serialize());
        assert!(!dir.path().join("users.json.tmp").exists());
    }

    #[test]
    fn corrupt_snapshot_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("users.json"), "{ not json").unwrap();

        let result = AgendaStore::open(dir.path()).load();

        assert!(matches!(result, Err(AgendaError::Codec(_))));
    }

    #[test]
    fn trailing_garbage_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("users.json"), "[] garbage").unwrap();

        let result = AgendaStore::open(dir.path()).load();

        assert!(matches!(result, Err(AgendaError::Codec(_))));
    }

    #[test]
    fn meeting_record_of_wrong_shape_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = AgendaStore::open(dir.path());
        store.save(&populated()).unwrap();
        std::fs::write(
            dir.path().join("meetings.json"),
            r#"[{"title": "standup", "start_time": "2025-03-20T10:00:00Z",
                "end_time": "2025-03-20T11:00:00Z", "participants": []}]"#,
        )
        .unwrap();

        assert!(matches!(store.load(), Err(AgendaError::Codec(_))));
    }

    #[test]
    fn bad_records_are_skipped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("users.json"),
            r#"[
                {"name": "", "mail": "", "phone": "", "auth": ""},
                {"name": "carol", "mail": "c@example.com", "phone": "", "auth": "pw"}
            ]"#,
        )
        .unwrap();

        let agenda = AgendaStore::open(dir.path()).load().unwrap();

        assert_eq!(agenda.users().len(), 1);
        assert!(agenda.is_registered(&Username::new("carol")));
    }
}
