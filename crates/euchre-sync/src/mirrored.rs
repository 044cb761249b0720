//! Store decorator that mirrors every successful write.

use crate::{push_snapshot, RemoteMirror, SyncOutcome};
use euchre_database::{DatabaseResult, Game, Hand, NewGame, NewHand, ScoreStore};
use euchre_scoring::GameStatus;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Wraps a [`ScoreStore`] and pushes a snapshot to `M` after each write.
///
/// A failed push is logged and recorded in [`MirroredStore::last_outcome`];
/// the write's own result is returned unchanged. With a pending marker set,
/// a failed push also creates the marker file and a successful one removes it.
pub struct MirroredStore<S, M> {
    inner: S,
    mirror: M,
    pending_marker: Option<PathBuf>,
    last_outcome: Mutex<Option<SyncOutcome>>,
}

impl<S: ScoreStore, M: RemoteMirror> MirroredStore<S, M> {
    pub fn new(inner: S, mirror: M) -> Self {
        Self {
            inner,
            mirror,
            pending_marker: None,
            last_outcome: Mutex::new(None),
        }
    }

    /// Track failed pushes in `marker`, normally [`crate::pending_marker_path`]
    /// of the store file.
    pub fn with_pending_marker(mut self, marker: impl Into<PathBuf>) -> Self {
        self.pending_marker = Some(marker.into());
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn mirror(&self) -> &M {
        &self.mirror
    }

    /// Result of the most recent push, if any write has happened.
    pub fn last_outcome(&self) -> Option<SyncOutcome> {
        self.last_outcome.lock().clone()
    }

    /// Push the current contents now.
    pub fn push(&self) -> SyncOutcome {
        let outcome = push_snapshot(&self.inner, &self.mirror);
        if let Some(marker) = &self.pending_marker {
            if let Err(e) = update_marker(marker, outcome.is_failure()) {
                warn!(path = %marker.display(), error = %e, "Failed to update pending push marker");
            }
        }
        *self.last_outcome.lock() = Some(outcome.clone());
        outcome
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

fn update_marker(marker: &Path, pending: bool) -> std::io::Result<()> {
    if pending {
        return std::fs::write(marker, b"");
    }
    match std::fs::remove_file(marker) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl<S: ScoreStore, M: RemoteMirror> ScoreStore for MirroredStore<S, M> {
    fn create_game(&self, game: &NewGame) -> DatabaseResult<Game> {
        let created = self.inner.create_game(game)?;
        self.push();
        Ok(created)
    }

    fn append_hand(&self, game_id: &str, hand: &NewHand) -> DatabaseResult<Hand> {
        let appended = self.inner.append_hand(game_id, hand)?;
        self.push();
        Ok(appended)
    }

    fn undo_last_hand(&self, game_id: &str) -> DatabaseResult<Option<Hand>> {
        let removed = self.inner.undo_last_hand(game_id)?;
        if removed.is_some() {
            self.push();
        }
        Ok(removed)
    }

    fn delete_game(&self, game_id: &str) -> DatabaseResult<bool> {
        let deleted = self.inner.delete_game(game_id)?;
        if deleted {
            self.push();
        }
        Ok(deleted)
    }

    fn get_game(&self, game_id: &str) -> DatabaseResult<Option<Game>> {
        self.inner.get_game(game_id)
    }

    fn list_games(&self, status: Option<GameStatus>) -> DatabaseResult<Vec<Game>> {
        self.inner.list_games(status)
    }

    fn list_hands(&self, game_id: &str) -> DatabaseResult<Vec<Hand>> {
        self.inner.list_hands(game_id)
    }

    fn list_all_hands(&self) -> DatabaseResult<Vec<Hand>> {
        self.inner.list_all_hands()
    }

    fn snapshot(&self) -> DatabaseResult<Vec<u8>> {
        self.inner.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FsMirror, SyncError, SyncResult};
    use euchre_database::Database;
    use euchre_scoring::CallValue;
    use std::cell::Cell;

    /// Counts uploads without storing anything.
    #[derive(Default)]
    struct CountingMirror {
        uploads: Cell<usize>,
    }

    impl RemoteMirror for CountingMirror {
        fn download(&self) -> SyncResult<Option<Vec<u8>>> {
            Ok(None)
        }

        fn upload(&self, _snapshot: &[u8]) -> SyncResult<()> {
            self.uploads.set(self.uploads.get() + 1);
            Ok(())
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    struct DownMirror;

    impl RemoteMirror for DownMirror {
        fn download(&self) -> SyncResult<Option<Vec<u8>>> {
            Err(SyncError::Config("offline".to_string()))
        }

        fn upload(&self, _snapshot: &[u8]) -> SyncResult<()> {
            Err(SyncError::Config("offline".to_string()))
        }

        fn describe(&self) -> String {
            "down".to_string()
        }
    }

    fn counting_store() -> MirroredStore<Database, CountingMirror> {
        MirroredStore::new(Database::open_in_memory().unwrap(), CountingMirror::default())
    }

    #[test]
    fn writes_push_reads_do_not() {
        let store = counting_store();
        let game = store.create_game(&NewGame::new("A", "B")).unwrap();
        store
            .append_hand(&game.id, &NewHand::new("A", CallValue::Tricks(3), 3))
            .unwrap();
        assert_eq!(store.mirror().uploads.get(), 2);

        store.get_game(&game.id).unwrap();
        store.list_games(None).unwrap();
        store.list_hands(&game.id).unwrap();
        store.list_all_hands().unwrap();
        assert_eq!(store.mirror().uploads.get(), 2);
    }

    #[test]
    fn no_op_writes_do_not_push() {
        let store = counting_store();
        let game = store.create_game(&NewGame::new("A", "B")).unwrap();
        assert_eq!(store.undo_last_hand(&game.id).unwrap(), None);
        assert!(!store.delete_game("missing").unwrap());
        assert_eq!(store.mirror().uploads.get(), 1);

        assert!(store.delete_game(&game.id).unwrap());
        assert_eq!(store.mirror().uploads.get(), 2);
    }

    #[test]
    fn failed_write_does_not_push() {
        let store = counting_store();
        let err = store.create_game(&NewGame::new("Same", "same")).unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(store.mirror().uploads.get(), 0);
        assert!(store.last_outcome().is_none());
    }

    #[test]
    fn push_failure_is_recorded_not_returned() {
        let store = MirroredStore::new(Database::open_in_memory().unwrap(), DownMirror);
        let game = store.create_game(&NewGame::new("A", "B")).unwrap();
        assert_eq!(game.team1_score, 0);
        assert!(store.last_outcome().unwrap().is_failure());
    }

    #[test]
    fn failed_push_leaves_marker_until_next_success() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("local.sqlite.unpushed");

        let down = MirroredStore::new(Database::open_in_memory().unwrap(), DownMirror)
            .with_pending_marker(&marker);
        down.create_game(&NewGame::new("A", "B")).unwrap();
        assert!(marker.exists());

        let up = MirroredStore::new(down.into_inner(), CountingMirror::default())
            .with_pending_marker(&marker);
        assert!(matches!(up.push(), SyncOutcome::Pushed { .. }));
        assert!(!marker.exists());

        // Clearing an absent marker is fine.
        assert!(!up.push().is_failure());
    }

    #[test]
    fn mirror_receives_latest_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = MirroredStore::new(
            Database::open_in_memory().unwrap(),
            FsMirror::new(dir.path().join("remote.sqlite")),
        );
        let game = store.create_game(&NewGame::new("A", "B")).unwrap();
        store
            .append_hand(&game.id, &NewHand::new("B", CallValue::Alone, 4))
            .unwrap();

        let copy = Database::open(store.mirror().path()).unwrap();
        let mirrored = copy.get_game(&game.id).unwrap().unwrap();
        assert_eq!(mirrored.team2_score, 4);
        assert_eq!(copy.list_hands(&game.id).unwrap().len(), 1);
    }
}
