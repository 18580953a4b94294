//! Read-only aggregations over the player store and game log
//!
//! Every view here is derived on demand from borrowed state; nothing is
//! cached or stored. Callers get owned snapshots that cannot observe later
//! writes.

use crate::store::{GameLog, PlayerStore};
use crate::types::{GameRecord, Player, PlayerName};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

/// Summary statistics over the whole ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    /// Mean rating across registered players, if any are registered
    pub average_rating: Option<f64>,
    /// Number of games in the log
    pub total_games: usize,
    /// Player with the most games played, first registered wins ties
    pub most_active_player: Option<PlayerName>,
    /// Player with the highest rating, first registered wins ties
    pub highest_rated_player: Option<PlayerName>,
}

/// Players sorted by rating descending, names ascending on equal ratings
pub fn leaderboard(players: &PlayerStore) -> Vec<Player> {
    let mut board: Vec<Player> = players.list().cloned().collect();
    board.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    board
}

/// The latest `limit` games, newest date first
///
/// Games sharing a date order by append position, most recently appended
/// first.
pub fn recent_games(games: &GameLog, limit: usize) -> Vec<GameRecord> {
    let mut indexed: Vec<(usize, &GameRecord)> = games.all().iter().enumerate().collect();
    indexed.sort_by(|(index_a, a), (index_b, b)| {
        b.date.cmp(&a.date).then_with(|| index_b.cmp(index_a))
    });
    indexed
        .into_iter()
        .take(limit)
        .map(|(_, game)| game.clone())
        .collect()
}

/// A player's `(date, rating)` trajectory in chronological order
///
/// Ratings come from the `new_rating` fields stored on each game record at
/// write time; they are never recomputed. Equal dates keep append order.
pub fn rating_trajectory(games: &GameLog, name: &str) -> Vec<(NaiveDate, f64)> {
    let mut points: Vec<(NaiveDate, f64)> = games
        .for_player(name)
        .filter_map(|game| game.new_rating_for(name).map(|rating| (game.date, rating)))
        .collect();
    // Stable sort, so append order survives within a date.
    points.sort_by_key(|(date, _)| *date);
    points
}

/// Aggregate statistics over players and games
pub fn aggregate_stats(players: &PlayerStore, games: &GameLog) -> AggregateStats {
    let average_rating = if players.is_empty() {
        None
    } else {
        Some(players.list().map(|p| p.rating).sum::<f64>() / players.len() as f64)
    };

    let mut most_active: Option<&Player> = None;
    let mut highest_rated: Option<&Player> = None;
    for player in players.list() {
        // Strict comparisons keep the first-registered player on ties.
        if most_active.map_or(true, |m| player.games_played > m.games_played) {
            most_active = Some(player);
        }
        if highest_rated.map_or(true, |h| player.rating > h.rating) {
            highest_rated = Some(player);
        }
    }

    AggregateStats {
        average_rating,
        total_games: games.len(),
        most_active_player: most_active.map(|p| p.name.clone()),
        highest_rated_player: highest_rated.map(|p| p.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameResult, PlayerOutcome};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(player1: &str, player2: &str, day: &str, new1: f64, new2: f64) -> GameRecord {
        GameRecord {
            player1: player1.to_string(),
            player2: player2.to_string(),
            result: GameResult::WinPlayerOne,
            date: date(day),
            player1_old_rating: new1 - 16.0,
            player2_old_rating: new2 + 16.0,
            player1_new_rating: new1,
            player2_new_rating: new2,
            rating_change_1: 16.0,
            rating_change_2: -16.0,
        }
    }

    fn store_with(ratings: &[(&str, f64)]) -> PlayerStore {
        let mut store = PlayerStore::new();
        for (name, rating) in ratings {
            store.register(name, *rating, date("2024-01-01")).unwrap();
        }
        store
    }

    #[test]
    fn test_leaderboard_sorts_by_rating_then_name() {
        let store = store_with(&[("Carol", 1300.0), ("Alice", 1450.0), ("Bob", 1300.0)]);

        let board = leaderboard(&store);
        let names: Vec<&str> = board.iter().map(|p| p.name.as_str()).collect();
        // Bob before Carol: equal ratings fall back to name order.
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_recent_games_orders_by_date_then_recency() {
        let mut log = GameLog::new();
        log.append(record("Alice", "Bob", "2024-03-02", 1216.0, 1184.0));
        log.append(record("Carol", "Dave", "2024-03-05", 1216.0, 1184.0));
        log.append(record("Alice", "Carol", "2024-03-02", 1232.0, 1168.0));

        let recent = recent_games(&log, 10);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].date, date("2024-03-05"));
        // The two games on 03-02: the later-appended one first.
        assert_eq!(recent[1].player2, "Carol");
        assert_eq!(recent[2].player2, "Bob");
    }

    #[test]
    fn test_recent_games_respects_limit() {
        let mut log = GameLog::new();
        for day in ["2024-03-01", "2024-03-02", "2024-03-03"] {
            log.append(record("Alice", "Bob", day, 1216.0, 1184.0));
        }

        let recent = recent_games(&log, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, date("2024-03-03"));
        assert_eq!(recent[1].date, date("2024-03-02"));
    }

    #[test]
    fn test_trajectory_is_chronological_and_uses_stored_ratings() {
        let mut log = GameLog::new();
        // Appended out of date order on purpose.
        log.append(record("Alice", "Bob", "2024-03-10", 1216.0, 1184.0));
        log.append(record("Carol", "Alice", "2024-03-01", 1300.0, 1200.0));
        log.append(record("Bob", "Dave", "2024-03-02", 1250.0, 1150.0));

        let trajectory = rating_trajectory(&log, "Alice");
        assert_eq!(
            trajectory,
            vec![(date("2024-03-01"), 1200.0), (date("2024-03-10"), 1216.0)]
        );

        assert!(rating_trajectory(&log, "Nobody").is_empty());
    }

    #[test]
    fn test_aggregate_stats() {
        let mut store = store_with(&[("Alice", 1400.0), ("Bob", 1200.0)]);
        store.update("Bob", 1216.0, PlayerOutcome::Win).unwrap();

        let mut log = GameLog::new();
        log.append(record("Bob", "Alice", "2024-03-01", 1216.0, 1384.0));

        let stats = aggregate_stats(&store, &log);
        assert_eq!(stats.total_games, 1);
        assert_eq!(stats.average_rating, Some((1400.0 + 1216.0) / 2.0));
        assert_eq!(stats.most_active_player.as_deref(), Some("Bob"));
        assert_eq!(stats.highest_rated_player.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_aggregate_ties_keep_first_registered() {
        let store = store_with(&[("Zoe", 1300.0), ("Amy", 1300.0)]);
        let stats = aggregate_stats(&store, &GameLog::new());

        // Both players tie on rating and games played; Zoe registered first.
        assert_eq!(stats.most_active_player.as_deref(), Some("Zoe"));
        assert_eq!(stats.highest_rated_player.as_deref(), Some("Zoe"));
    }

    #[test]
    fn test_aggregate_stats_on_empty_ledger() {
        let stats = aggregate_stats(&PlayerStore::new(), &GameLog::new());
        assert_eq!(stats.average_rating, None);
        assert_eq!(stats.total_games, 0);
        assert_eq!(stats.most_active_player, None);
        assert_eq!(stats.highest_rated_player, None);
    }
}
