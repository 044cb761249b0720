//! Startup pull and explicit push of the store snapshot.

use crate::mirror::parent_dir;
use crate::{RemoteMirror, SyncError, SyncResult};
use euchre_database::ScoreStore;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a sync attempt did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The local store was replaced with the remote copy.
    Restored { bytes: usize },
    /// The local store was uploaded.
    Pushed { bytes: usize },
    /// The mirror holds nothing yet; the local store was left alone.
    NoRemoteCopy,
    /// The local store has writes the mirror never received; the pull was skipped.
    PendingPush,
    /// The attempt failed; the local store is unchanged.
    Failed { reason: String },
}

impl SyncOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn failed(err: &SyncError) -> Self {
        Self::Failed {
            reason: err.to_string(),
        }
    }
}

/// Marker file whose presence means the last push of `local_path` failed.
pub fn pending_marker_path(local_path: &Path) -> PathBuf {
    sibling_path(local_path, ".unpushed")
}

fn sibling_path(local_path: &Path, suffix: &str) -> PathBuf {
    let mut name = local_path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Replace the local store file with the mirror's copy, if it has one.
///
/// Skipped with [`SyncOutcome::PendingPush`] while the local store holds
/// writes the mirror has not seen (see [`pending_marker_path`]).
///
/// Must run before the local store is opened. Never returns an error: a
/// failure is logged and reported as [`SyncOutcome::Failed`].
pub fn restore_from_remote<M: RemoteMirror + ?Sized>(mirror: &M, local_path: &Path) -> SyncOutcome {
    match try_restore(mirror, local_path) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(mirror = %mirror.describe(), error = %e, "Startup restore failed, keeping local store");
            SyncOutcome::failed(&e)
        }
    }
}

fn try_restore<M: RemoteMirror + ?Sized>(mirror: &M, local_path: &Path) -> SyncResult<SyncOutcome> {
    let marker = pending_marker_path(local_path);
    if marker.exists() {
        if local_path.exists() {
            info!(
                mirror = %mirror.describe(),
                path = %local_path.display(),
                "Local store has unpushed writes, skipping restore"
            );
            return Ok(SyncOutcome::PendingPush);
        }
        // Store file is gone, nothing left to protect.
        std::fs::remove_file(&marker)?;
    }

    let Some(bytes) = mirror.download()? else {
        info!(mirror = %mirror.describe(), "No remote snapshot, using local store");
        return Ok(SyncOutcome::NoRemoteCopy);
    };

    let parent = parent_dir(local_path);
    std::fs::create_dir_all(parent)?;

    // Validate a copy beside the target so the final rename stays on one filesystem.
    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(&bytes)?;
    staged.as_file().sync_all()?;
    validate_snapshot(staged.path())?;

    remove_sidecars(local_path)?;
    staged.persist(local_path).map_err(|e| e.error)?;

    info!(
        mirror = %mirror.describe(),
        path = %local_path.display(),
        bytes = bytes.len(),
        "Local store restored from remote"
    );
    Ok(SyncOutcome::Restored { bytes: bytes.len() })
}

/// Check that `path` is an intact store with the expected tables.
///
/// Opens without `CREATE` so a missing file fails instead of producing an
/// empty store. Read-write so a WAL-mode snapshot can be opened.
pub fn validate_snapshot(path: &Path) -> SyncResult<()> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        .map_err(|e| SyncError::InvalidSnapshot(e.to_string()))?;

    let check: String = conn
        .query_row("PRAGMA quick_check", [], |row| row.get(0))
        .map_err(|e| SyncError::InvalidSnapshot(e.to_string()))?;
    if check != "ok" {
        return Err(SyncError::InvalidSnapshot(format!("quick_check: {}", check)));
    }

    let tables: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('games', 'hands')",
        [],
        |row| row.get(0),
    )?;
    if tables != 2 {
        return Err(SyncError::InvalidSnapshot(
            "missing games or hands table".to_string(),
        ));
    }
    Ok(())
}

/// WAL and shared-memory files left by an earlier connection would be
/// replayed over the restored file.
fn remove_sidecars(local_path: &Path) -> SyncResult<()> {
    for suffix in ["-wal", "-shm"] {
        let sidecar = sibling_path(local_path, suffix);
        match std::fs::remove_file(&sidecar) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Upload the current store contents. Failures are logged and reported,
/// never returned.
pub fn push_snapshot<S, M>(store: &S, mirror: &M) -> SyncOutcome
where
    S: ScoreStore + ?Sized,
    M: RemoteMirror + ?Sized,
{
    let result = store
        .snapshot()
        .map_err(SyncError::from)
        .and_then(|bytes| mirror.upload(&bytes).map(|()| bytes.len()));

    match result {
        Ok(bytes) => {
            info!(mirror = %mirror.describe(), bytes, "Snapshot pushed");
            SyncOutcome::Pushed { bytes }
        }
        Err(e) => {
            warn!(mirror = %mirror.describe(), error = %e, "Snapshot push failed");
            SyncOutcome::failed(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FsMirror;
    use euchre_database::{Database, NewGame};

    fn snapshot_with_game(teams: (&str, &str)) -> Vec<u8> {
        let db = Database::open_in_memory().unwrap();
        db.create_game(&NewGame::new(teams.0, teams.1)).unwrap();
        db.snapshot().unwrap()
    }

    #[test]
    fn restore_replaces_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FsMirror::new(dir.path().join("remote.sqlite"));
        mirror.upload(&snapshot_with_game(("North", "South"))).unwrap();

        let local = dir.path().join("data").join("euchre_stats.sqlite");
        let outcome = restore_from_remote(&mirror, &local);
        assert!(matches!(outcome, SyncOutcome::Restored { bytes } if bytes > 0));

        let db = Database::open(&local).unwrap();
        let games = db.list_games(None).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].team1_name, "North");
    }

    #[test]
    fn restore_without_remote_keeps_local() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FsMirror::new(dir.path().join("remote.sqlite"));
        let local = dir.path().join("local.sqlite");
        std::fs::write(&local, b"untouched").unwrap();

        assert_eq!(restore_from_remote(&mirror, &local), SyncOutcome::NoRemoteCopy);
        assert_eq!(std::fs::read(&local).unwrap(), b"untouched");
    }

    #[test]
    fn corrupt_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FsMirror::new(dir.path().join("remote.sqlite"));
        mirror.upload(b"definitely not sqlite").unwrap();
        let local = dir.path().join("local.sqlite");
        std::fs::write(&local, b"untouched").unwrap();

        let outcome = restore_from_remote(&mirror, &local);
        assert!(outcome.is_failure());
        assert_eq!(std::fs::read(&local).unwrap(), b"untouched");
    }

    #[test]
    fn foreign_database_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let foreign = dir.path().join("foreign.sqlite");
        let conn = Connection::open(&foreign).unwrap();
        conn.execute_batch("CREATE TABLE notes (body TEXT);").unwrap();
        drop(conn);

        let err = validate_snapshot(&foreign).unwrap_err();
        assert!(matches!(err, SyncError::InvalidSnapshot(_)));
    }

    #[test]
    fn stale_sidecars_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FsMirror::new(dir.path().join("remote.sqlite"));
        mirror.upload(&snapshot_with_game(("East", "West"))).unwrap();

        let local = dir.path().join("local.sqlite");
        let wal = dir.path().join("local.sqlite-wal");
        std::fs::write(&wal, b"stale").unwrap();

        assert!(!restore_from_remote(&mirror, &local).is_failure());
        assert!(!wal.exists());
    }

    #[test]
    fn pending_marker_blocks_restore() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FsMirror::new(dir.path().join("remote.sqlite"));
        mirror.upload(&snapshot_with_game(("North", "South"))).unwrap();

        let local = dir.path().join("local.sqlite");
        std::fs::write(&local, b"newer than remote").unwrap();
        let marker = pending_marker_path(&local);
        assert_eq!(marker, dir.path().join("local.sqlite.unpushed"));
        std::fs::write(&marker, b"").unwrap();

        assert_eq!(restore_from_remote(&mirror, &local), SyncOutcome::PendingPush);
        assert_eq!(std::fs::read(&local).unwrap(), b"newer than remote");
        assert!(marker.exists());
    }

    #[test]
    fn marker_without_store_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FsMirror::new(dir.path().join("remote.sqlite"));
        mirror.upload(&snapshot_with_game(("North", "South"))).unwrap();

        let local = dir.path().join("local.sqlite");
        let marker = pending_marker_path(&local);
        std::fs::write(&marker, b"").unwrap();

        assert!(matches!(restore_from_remote(&mirror, &local), SyncOutcome::Restored { .. }));
        assert!(!marker.exists());
    }

    #[test]
    fn push_uploads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FsMirror::new(dir.path().join("remote.sqlite"));
        let db = Database::open_in_memory().unwrap();
        db.create_game(&NewGame::new("A", "B")).unwrap();

        let outcome = push_snapshot(&db, &mirror);
        assert!(matches!(outcome, SyncOutcome::Pushed { .. }));
        validate_snapshot(mirror.path()).unwrap();
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let json = serde_json::to_value(SyncOutcome::Pushed { bytes: 12 }).unwrap();
        assert_eq!(json["outcome"], "pushed");
        assert_eq!(json["bytes"], 12);

        let json = serde_json::to_value(SyncOutcome::PendingPush).unwrap();
        assert_eq!(json["outcome"], "pending_push");
    }
}
