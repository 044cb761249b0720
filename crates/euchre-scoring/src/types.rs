//! Core scoring types shared with the persistence layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default target score for a new game.
pub const DEFAULT_TARGET_SCORE: i64 = 32;

/// Stake used for calls that do not name a trick count.
const NAMED_CALL_STAKE: i64 = 2;

/// One of the two teams in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "team1")]
    One,
    #[serde(rename = "team2")]
    Two,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::One, Team::Two];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::One => "team1",
            Self::Two => "team2",
        }
    }

    /// Parse a storage key (`team1` / `team2`).
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "team1" => Some(Self::One),
            "team2" => Some(Self::Two),
            _ => None,
        }
    }

    /// Index into per-team arrays.
    pub fn index(&self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Completed,
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "completed" | "finished" => Self::Completed,
            _ => Self::Active,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a team bid for a hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallValue {
    /// A numeric trick count (3 to 8 under house rules).
    Tricks(u8),
    PartnerBest,
    Alone,
    Custom(String),
}

impl CallValue {
    /// Calls offered for quick selection.
    pub fn common() -> Vec<CallValue> {
        let mut calls: Vec<CallValue> = (3..=8).map(CallValue::Tricks).collect();
        calls.push(CallValue::PartnerBest);
        calls.push(CallValue::Alone);
        calls
    }

    /// Parse a call from its text form. Never fails: unknown text is `Custom`.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u8>() {
            return Self::Tricks(n);
        }
        match trimmed.to_lowercase().replace(['-', '_'], " ").as_str() {
            "partner best" => Self::PartnerBest,
            "alone" => Self::Alone,
            _ => Self::Custom(trimmed.to_string()),
        }
    }

    /// The value this call reads back as once stored in its text form.
    pub fn normalized(&self) -> Self {
        match self {
            Self::Custom(text) => Self::parse(text),
            other => other.clone(),
        }
    }

    /// Points at stake for this call when no explicit value is given.
    pub fn stake(&self) -> i64 {
        match self {
            Self::Tricks(n) => i64::from(*n),
            Self::Custom(s) => s.trim().parse::<i64>().unwrap_or(NAMED_CALL_STAKE),
            Self::PartnerBest | Self::Alone => NAMED_CALL_STAKE,
        }
    }
}

impl fmt::Display for CallValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tricks(n) => write!(f, "{}", n),
            Self::PartnerBest => f.write_str("Partner Best"),
            Self::Alone => f.write_str("Alone"),
            Self::Custom(s) => f.write_str(s),
        }
    }
}

impl From<String> for CallValue {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<CallValue> for String {
    fn from(call: CallValue) -> Self {
        call.to_string()
    }
}

/// Score state of one game, as seen by the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub team_names: [String; 2],
    pub scores: [i64; 2],
    pub target_score: i64,
    pub status: GameStatus,
    /// Winning team once completed; `None` on a completed game is a tie.
    pub winner: Option<Team>,
}

impl GameState {
    /// Fresh state with both scores at zero.
    pub fn new(team1: impl Into<String>, team2: impl Into<String>, target_score: i64) -> Self {
        Self {
            team_names: [team1.into(), team2.into()],
            scores: [0, 0],
            target_score,
            status: GameStatus::Active,
            winner: None,
        }
    }

    /// Resolve a caller reference: either a configured team name or a
    /// storage key. Names win over keys when both could match.
    pub fn resolve_team(&self, reference: &str) -> Option<Team> {
        let needle = reference.trim();
        Team::ALL
            .into_iter()
            .find(|team| self.team_names[team.index()] == needle)
            .or_else(|| {
                Team::ALL
                    .into_iter()
                    .find(|team| self.team_names[team.index()].eq_ignore_ascii_case(needle))
            })
            .or_else(|| Team::from_key(needle))
    }

    pub fn score(&self, team: Team) -> i64 {
        self.scores[team.index()]
    }

    pub fn team_name(&self, team: Team) -> &str {
        &self.team_names[team.index()]
    }

    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_value_parse_named_and_numeric() {
        assert_eq!(CallValue::parse("4"), CallValue::Tricks(4));
        assert_eq!(CallValue::parse(" 8 "), CallValue::Tricks(8));
        assert_eq!(CallValue::parse("Partner Best"), CallValue::PartnerBest);
        assert_eq!(CallValue::parse("partner-best"), CallValue::PartnerBest);
        assert_eq!(CallValue::parse("ALONE"), CallValue::Alone);
        assert_eq!(
            CallValue::parse("Loner w/ kitty"),
            CallValue::Custom("Loner w/ kitty".to_string())
        );
    }

    #[test]
    fn call_value_text_form_is_stable() {
        for call in CallValue::common() {
            assert_eq!(CallValue::parse(&call.to_string()), call);
        }
    }

    #[test]
    fn custom_calls_normalize_to_their_stored_form() {
        let cases = [
            ("10", CallValue::Tricks(10)),
            (" x ", CallValue::Custom("x".to_string())),
            ("alone", CallValue::Alone),
            ("partner_best", CallValue::PartnerBest),
            ("Loner", CallValue::Custom("Loner".to_string())),
            ("300", CallValue::Custom("300".to_string())),
        ];
        for (text, expected) in cases {
            let normalized = CallValue::Custom(text.to_string()).normalized();
            assert_eq!(normalized, expected, "custom call {:?}", text);
            assert_eq!(CallValue::parse(&normalized.to_string()), normalized);
        }
        assert_eq!(CallValue::Tricks(4).normalized(), CallValue::Tricks(4));
    }

    #[test]
    fn call_value_stake() {
        assert_eq!(CallValue::Tricks(5).stake(), 5);
        assert_eq!(CallValue::PartnerBest.stake(), 2);
        assert_eq!(CallValue::Alone.stake(), 2);
        assert_eq!(CallValue::Custom("12".to_string()).stake(), 12);
        assert_eq!(CallValue::Custom("odd".to_string()).stake(), 2);
    }

    #[test]
    fn call_value_string_conversion() {
        assert_eq!(String::from(CallValue::PartnerBest), "Partner Best");
        assert_eq!(CallValue::from("6".to_string()), CallValue::Tricks(6));
    }

    #[test]
    fn team_keys() {
        assert_eq!(Team::from_key("team1"), Some(Team::One));
        assert_eq!(Team::from_key("TEAM2"), Some(Team::Two));
        assert_eq!(Team::from_key("team3"), None);
        assert_eq!(Team::One.other(), Team::Two);
        assert_eq!(Team::Two.index(), 1);
    }

    #[test]
    fn game_status_from_str() {
        assert_eq!(GameStatus::from_str("completed"), GameStatus::Completed);
        assert_eq!(GameStatus::from_str("finished"), GameStatus::Completed);
        assert_eq!(GameStatus::from_str("active"), GameStatus::Active);
        assert_eq!(GameStatus::from_str("garbage"), GameStatus::Active);
    }

    #[test]
    fn resolve_team_by_name_or_key() {
        let state = GameState::new("Hearts", "Spades", 32);
        assert_eq!(state.resolve_team("Hearts"), Some(Team::One));
        assert_eq!(state.resolve_team("spades"), Some(Team::Two));
        assert_eq!(state.resolve_team("team2"), Some(Team::Two));
        assert_eq!(state.resolve_team("Clubs"), None);
    }

    #[test]
    fn resolve_team_prefers_names_over_keys() {
        let state = GameState::new("team2", "Spades", 32);
        assert_eq!(state.resolve_team("team2"), Some(Team::One));
    }
}
