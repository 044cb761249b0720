//! Database model types.

use crate::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use euchre_scoring::{CallValue, GameState, GameStatus, HandInput, Team, DEFAULT_TARGET_SCORE};
use serde::{Deserialize, Serialize};

/// Game record - one match between two teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub team1_name: String,
    pub team2_name: String,
    pub team1_players: Vec<String>,
    pub team2_players: Vec<String>,
    pub team1_score: i64,
    pub team2_score: i64,
    pub target_score: i64,
    pub status: GameStatus,
    /// Set once completed; `None` on a completed game is a tie.
    pub winner: Option<Team>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Scoring-engine view of this game.
    pub fn state(&self) -> GameState {
        GameState {
            team_names: [self.team1_name.clone(), self.team2_name.clone()],
            scores: [self.team1_score, self.team2_score],
            target_score: self.target_score,
            status: self.status,
            winner: self.winner,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    pub fn team_name(&self, team: Team) -> &str {
        match team {
            Team::One => &self.team1_name,
            Team::Two => &self.team2_name,
        }
    }

    pub fn players(&self, team: Team) -> &[String] {
        match team {
            Team::One => &self.team1_players,
            Team::Two => &self.team2_players,
        }
    }

    pub fn score(&self, team: Team) -> i64 {
        match team {
            Team::One => self.team1_score,
            Team::Two => self.team2_score,
        }
    }

    /// Which team a player is on.
    pub fn player_team(&self, player: &str) -> Option<Team> {
        Team::ALL
            .into_iter()
            .find(|team| self.players(*team).iter().any(|p| p == player))
    }

    /// All players, team one first.
    pub fn all_players(&self) -> Vec<String> {
        self.team1_players
            .iter()
            .chain(self.team2_players.iter())
            .cloned()
            .collect()
    }

    /// Score difference from `team`'s point of view.
    pub fn margin(&self, team: Team) -> i64 {
        self.score(team) - self.score(team.other())
    }
}

/// Input for creating a new game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    pub team1_name: String,
    pub team2_name: String,
    #[serde(default)]
    pub team1_players: Vec<String>,
    #[serde(default)]
    pub team2_players: Vec<String>,
    /// Defaults to [`DEFAULT_TARGET_SCORE`].
    #[serde(default)]
    pub target_score: Option<i64>,
}

impl NewGame {
    pub fn new(team1_name: impl Into<String>, team2_name: impl Into<String>) -> Self {
        Self {
            team1_name: team1_name.into(),
            team2_name: team2_name.into(),
            team1_players: Vec::new(),
            team2_players: Vec::new(),
            target_score: None,
        }
    }

    pub fn with_players(mut self, team1: &[&str], team2: &[&str]) -> Self {
        self.team1_players = team1.iter().map(|p| p.to_string()).collect();
        self.team2_players = team2.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_target_score(mut self, target_score: i64) -> Self {
        self.target_score = Some(target_score);
        self
    }

    /// Check the input and return a trimmed copy.
    pub fn validated(&self) -> DatabaseResult<NewGame> {
        let team1_name = self.team1_name.trim().to_string();
        let team2_name = self.team2_name.trim().to_string();

        if team1_name.is_empty() {
            return Err(DatabaseError::validation("team1_name", "must not be empty"));
        }
        if team2_name.is_empty() {
            return Err(DatabaseError::validation("team2_name", "must not be empty"));
        }
        if team1_name.eq_ignore_ascii_case(&team2_name) {
            return Err(DatabaseError::validation(
                "team2_name",
                format!("duplicates team1_name '{}'", team1_name),
            ));
        }

        let team1_players = clean_players("team1_players", &self.team1_players)?;
        let team2_players = clean_players("team2_players", &self.team2_players)?;
        if let Some(player) = team1_players.iter().find(|p| team2_players.contains(p)) {
            return Err(DatabaseError::validation(
                "team2_players",
                format!("'{}' is already on {}", player, team1_name),
            ));
        }

        let target_score = self.target_score.unwrap_or(DEFAULT_TARGET_SCORE);
        if target_score <= 0 {
            return Err(DatabaseError::validation(
                "target_score",
                format!("must be positive, got {}", target_score),
            ));
        }

        Ok(NewGame {
            team1_name,
            team2_name,
            team1_players,
            team2_players,
            target_score: Some(target_score),
        })
    }
}

fn clean_players(field: &str, players: &[String]) -> DatabaseResult<Vec<String>> {
    let mut cleaned: Vec<String> = Vec::with_capacity(players.len());
    for player in players {
        let name = player.trim();
        if name.is_empty() {
            return Err(DatabaseError::validation(field, "player names must not be empty"));
        }
        if cleaned.iter().any(|p| p == name) {
            return Err(DatabaseError::validation(
                field,
                format!("'{}' is listed twice", name),
            ));
        }
        cleaned.push(name.to_string());
    }
    Ok(cleaned)
}

/// Hand record - one scored hand. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub id: String,
    pub game_id: String,
    /// 1-based, contiguous within a game.
    pub hand_number: i64,
    pub caller_name: Option<String>,
    pub caller_team: Team,
    pub call_value: CallValue,
    pub points_scored: i64,
    pub euchred: bool,
    /// Points awarded to the defenders; only set when euchred.
    pub euchre_points: Option<i64>,
    pub team1_delta: i64,
    pub team2_delta: i64,
    pub team1_cumulative: i64,
    pub team2_cumulative: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Hand {
    pub fn cumulative(&self, team: Team) -> i64 {
        match team {
            Team::One => self.team1_cumulative,
            Team::Two => self.team2_cumulative,
        }
    }

    pub fn delta(&self, team: Team) -> i64 {
        match team {
            Team::One => self.team1_delta,
            Team::Two => self.team2_delta,
        }
    }

    /// Net points for the calling team: negative when euchred.
    pub fn caller_net_points(&self) -> i64 {
        if self.euchred {
            -self.points_scored
        } else {
            self.points_scored
        }
    }

    /// The scoring input this hand was recorded from.
    pub fn to_input(&self) -> HandInput {
        HandInput {
            caller_team: self.caller_team.as_str().to_string(),
            call_value: self.call_value.clone(),
            points_scored: self.points_scored,
            euchred: self.euchred,
            euchre_points: self.euchre_points,
        }
    }
}

/// Input for logging a hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHand {
    pub caller_name: Option<String>,
    /// Team name or `team1` / `team2`.
    pub caller_team: String,
    pub call_value: CallValue,
    pub points_scored: i64,
    #[serde(default)]
    pub euchred: bool,
    #[serde(default)]
    pub euchre_points: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewHand {
    pub fn new(caller_team: impl Into<String>, call_value: CallValue, points_scored: i64) -> Self {
        Self {
            caller_name: None,
            caller_team: caller_team.into(),
            call_value,
            points_scored,
            euchred: false,
            euchre_points: None,
            notes: None,
        }
    }

    pub fn euchred(mut self, euchre_points: i64) -> Self {
        self.euchred = true;
        self.euchre_points = Some(euchre_points);
        self
    }

    pub fn called_by(mut self, player: impl Into<String>) -> Self {
        self.caller_name = Some(player.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn input(&self) -> HandInput {
        HandInput {
            caller_team: self.caller_team.clone(),
            call_value: self.call_value.clone(),
            points_scored: self.points_scored,
            euchred: self.euchred,
            euchre_points: self.euchre_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_validation() {
        let ok = NewGame::new(" Hearts ", "Spades")
            .with_players(&["Ann", " Bob"], &["Cat", "Dan"])
            .validated()
            .unwrap();
        assert_eq!(ok.team1_name, "Hearts");
        assert_eq!(ok.team1_players, vec!["Ann", "Bob"]);
        assert_eq!(ok.target_score, Some(32));

        let err = NewGame::new("", "Spades").validated().unwrap_err();
        assert!(matches!(err, DatabaseError::Validation { ref field, .. } if field == "team1_name"));

        let err = NewGame::new("Hearts", "  ").validated().unwrap_err();
        assert!(matches!(err, DatabaseError::Validation { ref field, .. } if field == "team2_name"));

        let err = NewGame::new("Hearts", "hearts").validated().unwrap_err();
        assert!(matches!(err, DatabaseError::Validation { ref field, .. } if field == "team2_name"));

        let err = NewGame::new("Hearts", "Spades")
            .with_target_score(0)
            .validated()
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation { ref field, .. } if field == "target_score"));
    }

    #[test]
    fn new_game_rejects_bad_players() {
        let err = NewGame::new("Hearts", "Spades")
            .with_players(&["Ann", ""], &[])
            .validated()
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation { ref field, .. } if field == "team1_players"));

        let err = NewGame::new("Hearts", "Spades")
            .with_players(&["Ann"], &["Ann"])
            .validated()
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation { ref field, .. } if field == "team2_players"));
    }

    #[test]
    fn game_helpers() {
        let game = Game {
            id: "g".to_string(),
            team1_name: "Hearts".to_string(),
            team2_name: "Spades".to_string(),
            team1_players: vec!["Ann".to_string(), "Bob".to_string()],
            team2_players: vec!["Cat".to_string()],
            team1_score: 33,
            team2_score: 20,
            target_score: 32,
            status: GameStatus::Completed,
            winner: Some(Team::One),
            created_at: Utc::now(),
            finished_at: Some(Utc::now()),
        };
        assert_eq!(game.player_team("Cat"), Some(Team::Two));
        assert_eq!(game.player_team("Zed"), None);
        assert_eq!(game.margin(Team::One), 13);
        assert_eq!(game.margin(Team::Two), -13);
        assert_eq!(game.all_players().len(), 3);
        assert_eq!(game.state().scores, [33, 20]);
    }
}
