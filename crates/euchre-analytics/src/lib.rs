//! Read-only statistics over stored games and hands.
//!
//! Every function takes plain records and recomputes from scratch; nothing is
//! cached between calls. [`Analytics`] fetches the records from a
//! [`euchre_database::ScoreStore`] and bundles the results into reports.

mod calls;
mod facade;
mod game;
mod league;

pub use calls::{call_breakdown, call_frequency, CallStats};
pub use facade::{Analytics, GameReport, LeagueReport};
pub use game::{euchre_ratio, hand_log, score_progression, HandRow, ScorePoint};
pub use league::{
    caller_stats, most_common_callers, player_records, summary, team_records, CallerStats,
    PlayerRecord, Summary, TeamCaller, TeamRecord,
};

/// `part / whole`, or 0.0 when `whole` is zero.
pub(crate) fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Mean of `total` over `count` items, or 0.0 for none.
pub(crate) fn mean(total: i64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}
