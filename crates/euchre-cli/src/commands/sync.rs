//! Manual sync commands.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use euchre_database::ScoreStore;
use euchre_sync::{restore_from_remote, MirroredStore, RemoteMirror, SyncOutcome};
use std::path::Path;

fn report(outcome: SyncOutcome, mirror: &dyn RemoteMirror, format: &OutputFormat) -> Result<()> {
    let message = match &outcome {
        SyncOutcome::Restored { bytes } => {
            format!("Restored {} bytes from {}", bytes, mirror.describe())
        }
        SyncOutcome::Pushed { bytes } => format!("Pushed {} bytes to {}", bytes, mirror.describe()),
        SyncOutcome::NoRemoteCopy => format!("Nothing stored at {} yet", mirror.describe()),
        SyncOutcome::PendingPush => anyhow::bail!(
            "Local store has changes not yet pushed to {}; run `euchre sync push` first",
            mirror.describe()
        ),
        SyncOutcome::Failed { reason } => {
            anyhow::bail!("Sync with {} failed: {}", mirror.describe(), reason)
        }
    };
    match format {
        OutputFormat::Text => output::print_success(&message, format),
        OutputFormat::Json => output::print_json(&outcome)?,
    }
    Ok(())
}

/// Replace the local store file with the remote copy.
pub fn sync_pull(mirror: &dyn RemoteMirror, local_path: &Path, format: &OutputFormat) -> Result<()> {
    report(restore_from_remote(mirror, local_path), mirror, format)
}

/// Upload the local store, clearing its pending marker on success.
pub fn sync_push<S: ScoreStore, M: RemoteMirror>(
    store: &MirroredStore<S, M>,
    format: &OutputFormat,
) -> Result<()> {
    report(store.push(), store.mirror(), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use euchre_database::{Database, NewGame};
    use euchre_sync::{pending_marker_path, FsMirror};

    #[test]
    fn push_then_pull() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        db.create_game(&NewGame::new("Hearts", "Spades")).unwrap();
        let store = MirroredStore::new(db, FsMirror::new(dir.path().join("remote.sqlite")));
        sync_push(&store, &OutputFormat::Text).unwrap();

        let local = dir.path().join("local.sqlite");
        sync_pull(store.mirror(), &local, &OutputFormat::Json).unwrap();
        assert_eq!(Database::open(&local).unwrap().list_games(None).unwrap().len(), 1);
    }

    #[test]
    fn pull_refuses_while_push_is_pending() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FsMirror::new(dir.path().join("remote.sqlite"));
        let local = dir.path().join("local.sqlite");
        Database::open(&local)
            .unwrap()
            .create_game(&NewGame::new("Hearts", "Spades"))
            .unwrap();
        std::fs::write(pending_marker_path(&local), b"").unwrap();

        assert!(sync_pull(&mirror, &local, &OutputFormat::Text).is_err());

        let store = MirroredStore::new(Database::open(&local).unwrap(), mirror)
            .with_pending_marker(pending_marker_path(&local));
        sync_push(&store, &OutputFormat::Text).unwrap();
        assert!(!pending_marker_path(&local).exists());
        drop(store);
        sync_pull(&FsMirror::new(dir.path().join("remote.sqlite")), &local, &OutputFormat::Text).unwrap();
    }

    #[test]
    fn failed_pull_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FsMirror::new(dir.path().join("remote.sqlite"));
        mirror.upload(b"garbage").unwrap();
        assert!(sync_pull(&mirror, &dir.path().join("local.sqlite"), &OutputFormat::Text).is_err());
    }

    #[test]
    fn empty_remote_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FsMirror::new(dir.path().join("remote.sqlite"));
        sync_pull(&mirror, &dir.path().join("local.sqlite"), &OutputFormat::Text).unwrap();
    }
}
