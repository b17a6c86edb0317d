//! Per-player and global statistics

use crate::event_store::EventStore;
use crate::types::{round2, saturate, wide_total, GlobalStats, ScoreEvent, Summary};

/// Fold events (oldest first) into a summary
pub fn summarize_events<'a, I>(player_id: &str, events: I) -> Summary
where
    I: IntoIterator<Item = &'a ScoreEvent>,
{
    let mut summary = Summary::empty(player_id);
    let mut total: i128 = 0;
    let mut best = i64::MIN;
    let mut worst = i64::MAX;

    for event in events {
        if summary.first_game.is_none() {
            summary.first_game = Some(event.clone());
        }
        summary.total_games += 1;
        total += i128::from(event.score);
        best = best.max(event.score);
        worst = worst.min(event.score);
        summary.last_game = Some(event.clone());
    }

    if summary.total_games > 0 {
        summary.total_score = saturate(total);
        summary.best_score = best;
        summary.worst_score = worst;
        summary.average_score = round2(total as f64 / summary.total_games as f64);
        summary.last_played = summary.last_game.as_ref().map(|e| e.timestamp);
    }

    summary
}

/// Statistics over every event in the store
pub fn global_stats(events: &EventStore) -> GlobalStats {
    let total_scores = events.len();
    let total = wide_total(events.iter());

    GlobalStats {
        total_scores,
        total_players: events.player_count(),
        global_best_score: events.iter().map(|e| e.score).max(),
        global_worst_score: events.iter().map(|e| e.score).min(),
        global_average_score: (total_scores > 0).then(|| round2(total as f64 / total_scores as f64)),
        first_score_date: events.iter().map(|e| e.timestamp).min(),
        last_score_date: events.iter().map(|e| e.timestamp).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(scores: &[i64]) -> Vec<ScoreEvent> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| ScoreEvent::new(i as u64 + 1, "alice".to_string(), *s, "slot".to_string()))
            .collect()
    }

    #[test]
    fn test_summarize_mixed_scores() {
        let events = events(&[1500, -200, 900]);
        let summary = summarize_events("alice", &events);

        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.total_score, 2200);
        assert_eq!(summary.best_score, 1500);
        assert_eq!(summary.worst_score, -200);
        assert_eq!(summary.average_score, 733.33);
        assert_eq!(summary.first_game.as_ref().unwrap().sequence, 1);
        assert_eq!(summary.last_game.as_ref().unwrap().sequence, 3);
        assert_eq!(summary.last_played, Some(events[2].timestamp));
    }

    #[test]
    fn test_summarize_extreme_scores_saturates_total() {
        let events = events(&[i64::MAX, i64::MAX, 1]);
        let summary = summarize_events("alice", &events);

        assert_eq!(summary.total_score, i64::MAX);
        assert_eq!(summary.best_score, i64::MAX);
        assert_eq!(summary.worst_score, 1);
        assert!(summary.average_score > 6.0e18);
    }

    #[test]
    fn test_summarize_nothing_is_zeroed() {
        let summary = summarize_events("alice", std::iter::empty());
        assert_eq!(summary, Summary::empty("alice"));
    }

    #[test]
    fn test_global_stats() {
        let mut store = EventStore::new();
        store.append("john", 1500, "slot");
        store.append("alice", 2300, "slot");
        store.append("john", 1900, "plinko");

        let stats = global_stats(&store);

        assert_eq!(stats.total_scores, 3);
        assert_eq!(stats.total_players, 2);
        assert_eq!(stats.global_best_score, Some(2300));
        assert_eq!(stats.global_worst_score, Some(1500));
        assert_eq!(stats.global_average_score, Some(1900.0));
        assert!(stats.first_score_date <= stats.last_score_date);
    }

    #[test]
    fn test_global_average_over_extreme_scores() {
        let mut store = EventStore::new();
        store.append("john", i64::MAX, "slot");
        store.append("alice", i64::MAX, "slot");

        let stats = global_stats(&store);
        assert!(stats.global_average_score.unwrap() > 9.0e18);
    }

    #[test]
    fn test_global_stats_empty() {
        let stats = global_stats(&EventStore::new());
        assert_eq!(stats.total_scores, 0);
        assert!(stats.global_best_score.is_none());
        assert!(stats.global_average_score.is_none());
    }
}
