//! Call-value frequency tables.

use crate::{mean, ratio};
use euchre_database::Hand;
use euchre_scoring::CallValue;
use serde::Serialize;

/// How one call value fared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallStats {
    pub call: CallValue,
    pub count: usize,
    /// Points for the calling team; euchred hands count negative.
    pub net_points: i64,
    pub average_points: f64,
    pub euchres: usize,
    /// Fraction of calls that were euchred, 0.0..=1.0.
    pub euchre_rate: f64,
}

/// Per-call statistics for one game's hands, most frequent first.
///
/// Calls with equal counts keep the order in which they first appear.
pub fn call_breakdown(hands: &[Hand]) -> Vec<CallStats> {
    struct Tally {
        call: CallValue,
        count: usize,
        net_points: i64,
        euchres: usize,
    }

    let mut tallies: Vec<Tally> = Vec::new();
    for hand in hands {
        let tally = match tallies.iter().position(|t| t.call == hand.call_value) {
            Some(idx) => &mut tallies[idx],
            None => {
                tallies.push(Tally {
                    call: hand.call_value.clone(),
                    count: 0,
                    net_points: 0,
                    euchres: 0,
                });
                let last = tallies.len() - 1;
                &mut tallies[last]
            }
        };
        tally.count += 1;
        tally.net_points += hand.caller_net_points();
        if hand.euchred {
            tally.euchres += 1;
        }
    }

    let mut stats: Vec<CallStats> = tallies
        .into_iter()
        .map(|t| CallStats {
            average_points: mean(t.net_points, t.count),
            euchre_rate: ratio(t.euchres, t.count),
            call: t.call,
            count: t.count,
            net_points: t.net_points,
            euchres: t.euchres,
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// The same table across every game.
pub fn call_frequency(all_hands: &[Hand]) -> Vec<CallStats> {
    call_breakdown(all_hands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::hand;
    use euchre_scoring::Team;

    #[test]
    fn groups_and_sorts_by_count() {
        let hands = vec![
            hand("g", 1, None, Team::One, CallValue::Tricks(3), 3, None),
            hand("g", 2, None, Team::Two, CallValue::Alone, 4, None),
            hand("g", 3, None, Team::One, CallValue::Alone, 4, Some(4)),
            hand("g", 4, None, Team::Two, CallValue::Alone, 4, None),
        ];
        let stats = call_breakdown(&hands);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].call, CallValue::Alone);
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[0].net_points, 4);
        assert_eq!(stats[0].euchres, 1);
        assert!((stats[0].average_points - 4.0 / 3.0).abs() < 1e-9);
        assert!((stats[0].euchre_rate - 1.0 / 3.0).abs() < 1e-9);

        assert_eq!(stats[1].call, CallValue::Tricks(3));
        assert_eq!(stats[1].euchre_rate, 0.0);
    }

    #[test]
    fn ties_keep_first_appearance() {
        let hands = vec![
            hand("g", 1, None, Team::One, CallValue::Tricks(5), 5, None),
            hand("g", 2, None, Team::One, CallValue::PartnerBest, 2, None),
        ];
        let calls: Vec<CallValue> = call_breakdown(&hands).into_iter().map(|s| s.call).collect();
        assert_eq!(calls, vec![CallValue::Tricks(5), CallValue::PartnerBest]);
    }

    #[test]
    fn custom_calls_are_their_own_bucket() {
        let hands = vec![
            hand("a", 1, None, Team::One, CallValue::parse("Loner Bonus"), 6, None),
            hand("b", 1, None, Team::Two, CallValue::parse("loner bonus"), 6, None),
        ];
        assert_eq!(call_frequency(&hands).len(), 2);
    }

    #[test]
    fn empty_input() {
        assert!(call_breakdown(&[]).is_empty());
    }
}
