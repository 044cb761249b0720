//! End-to-end mirror behaviour against real stores.

use euchre_config_and_utils::SyncConfig;
use euchre_database::{Database, NewGame, NewHand, ScoreStore};
use euchre_scoring::{CallValue, GameStatus, Team};
use euchre_sync::{
    pending_marker_path, restore_from_remote, Credentials, FsMirror, GcsMirror, MirroredStore,
    SyncOutcome,
};

fn unreachable_gcs() -> GcsMirror {
    let mut config = SyncConfig::new("scores");
    config.timeout_secs = 1;
    GcsMirror::new(&config, Credentials::AccessToken("token".to_string()))
        .unwrap()
        .with_endpoint("http://127.0.0.1:1")
}

fn play_game<S: ScoreStore>(store: &S) -> Vec<(i64, i64, GameStatus)> {
    let game = store
        .create_game(&NewGame::new("Hearts", "Spades").with_target_score(10))
        .unwrap();
    let hands = [
        NewHand::new("Hearts", CallValue::Tricks(4), 4),
        NewHand::new("Spades", CallValue::Tricks(3), 3).euchred(2),
        NewHand::new("Spades", CallValue::Alone, 8),
        NewHand::new("Hearts", CallValue::PartnerBest, 2),
    ];
    hands
        .iter()
        .map(|hand| {
            let stored = store.append_hand(&game.id, hand).unwrap();
            let game = store.get_game(&game.id).unwrap().unwrap();
            (stored.team1_cumulative, stored.team2_cumulative, game.status)
        })
        .collect()
}

#[test]
fn unavailable_remote_does_not_change_results() {
    let plain = Database::open_in_memory().unwrap();
    let mirrored = MirroredStore::new(Database::open_in_memory().unwrap(), unreachable_gcs());

    let expected = play_game(&plain);
    let actual = play_game(&mirrored);

    assert_eq!(actual, expected);
    assert_eq!(expected.last(), Some(&(8, 5, GameStatus::Active)));
    assert!(mirrored.last_outcome().unwrap().is_failure());
}

#[test]
fn unavailable_remote_at_startup_keeps_local_store() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("euchre_stats.sqlite");
    {
        let db = Database::open(&local).unwrap();
        db.create_game(&NewGame::new("A", "B")).unwrap();
    }

    let outcome = restore_from_remote(&unreachable_gcs(), &local);
    assert!(outcome.is_failure());

    let db = Database::open(&local).unwrap();
    assert_eq!(db.list_games(None).unwrap().len(), 1);
}

#[test]
fn second_device_sees_first_devices_games() {
    let dir = tempfile::tempdir().unwrap();
    let remote = dir.path().join("share").join("euchre_stats.sqlite");

    let laptop_file = dir.path().join("laptop").join("euchre_stats.sqlite");
    let game_id = {
        let laptop = MirroredStore::new(Database::open(&laptop_file).unwrap(), FsMirror::new(&remote));
        let game = laptop
            .create_game(&NewGame::new("Us", "Them").with_players(&["Ann", "Bob"], &["Cat", "Dan"]))
            .unwrap();
        laptop
            .append_hand(&game.id, &NewHand::new("Us", CallValue::Tricks(5), 5).called_by("Ann"))
            .unwrap();
        assert!(matches!(laptop.last_outcome(), Some(SyncOutcome::Pushed { .. })));
        game.id
    };

    let phone_file = dir.path().join("phone").join("euchre_stats.sqlite");
    let outcome = restore_from_remote(&FsMirror::new(&remote), &phone_file);
    assert!(matches!(outcome, SyncOutcome::Restored { .. }));

    let phone = Database::open(&phone_file).unwrap();
    let game = phone.get_game(&game_id).unwrap().unwrap();
    assert_eq!(game.score(Team::One), 5);
    assert_eq!(game.team1_players, vec!["Ann".to_string(), "Bob".to_string()]);

    let hands = phone.list_hands(&game_id).unwrap();
    assert_eq!(hands.len(), 1);
    assert_eq!(hands[0].caller_name.as_deref(), Some("Ann"));
}

#[test]
fn writes_made_while_offline_survive_next_startup() {
    let dir = tempfile::tempdir().unwrap();
    let remote = dir.path().join("share").join("euchre_stats.sqlite");
    let local = dir.path().join("local").join("euchre_stats.sqlite");
    let marker = pending_marker_path(&local);

    // Online: the game is created and mirrored.
    let game_id = {
        let store = MirroredStore::new(Database::open(&local).unwrap(), FsMirror::new(&remote))
            .with_pending_marker(&marker);
        store.create_game(&NewGame::new("Us", "Them")).unwrap().id
    };
    assert!(!marker.exists());

    // Offline: the hand is saved locally but never reaches the mirror.
    {
        let store = MirroredStore::new(Database::open(&local).unwrap(), unreachable_gcs())
            .with_pending_marker(&marker);
        let hand = store
            .append_hand(&game_id, &NewHand::new("Us", CallValue::Tricks(4), 4))
            .unwrap();
        assert_eq!(hand.team1_cumulative, 4);
        assert!(store.last_outcome().unwrap().is_failure());
    }
    assert!(marker.exists());

    // Next startup with the mirror reachable again: the stale copy is not pulled.
    let outcome = restore_from_remote(&FsMirror::new(&remote), &local);
    assert_eq!(outcome, SyncOutcome::PendingPush);

    let store = MirroredStore::new(Database::open(&local).unwrap(), FsMirror::new(&remote))
        .with_pending_marker(&marker);
    assert_eq!(store.list_hands(&game_id).unwrap().len(), 1);
    assert_eq!(store.get_game(&game_id).unwrap().unwrap().score(Team::One), 4);

    assert!(matches!(store.push(), SyncOutcome::Pushed { .. }));
    assert!(!marker.exists());
    drop(store);

    let phone_file = dir.path().join("phone").join("euchre_stats.sqlite");
    assert!(matches!(
        restore_from_remote(&FsMirror::new(&remote), &phone_file),
        SyncOutcome::Restored { .. }
    ));
    let phone = Database::open(&phone_file).unwrap();
    assert_eq!(phone.list_hands(&game_id).unwrap().len(), 1);
}
