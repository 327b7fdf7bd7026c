use std::cmp::Ordering;

use serde::Serialize;

use super::domain::Scored;
use super::rates::Rate;

/// Leaderboard size used by the dashboard podium panels.
pub const LEADERBOARD_SIZE: usize = 3;

/// A ranked entry paired with its 1-based standing and the color band of
/// its raw score, ready for direct rendering.
#[derive(Debug, Clone, Serialize)]
pub struct PodiumEntry<T> {
    pub rank: usize,
    pub band: &'static str,
    #[serde(flatten)]
    pub entry: T,
}

/// Top `n` records by raw composite score, descending. The sort is stable,
/// so exact ties keep their original relative order. Fewer than `n`
/// records returns everything available.
pub fn top_n<R: Scored + Clone>(records: &[R], n: usize) -> Vec<R> {
    let mut ranked: Vec<R> = records.to_vec();
    ranked.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

/// Arrange ranked entries for the podium: the winner takes the visually
/// central slot, 2nd place sits to its left, 3rd to its right, so the
/// rendered order is [2nd, 1st, 3rd].
pub fn podium<T: Scored>(ranked: Vec<T>) -> Vec<PodiumEntry<T>> {
    let mut slots: Vec<PodiumEntry<T>> = ranked
        .into_iter()
        .enumerate()
        .map(|(index, entry)| PodiumEntry {
            rank: index + 1,
            band: Rate::from_percent(entry.score()).band().label(),
            entry,
        })
        .collect();

    if slots.len() >= 2 {
        slots.swap(0, 1);
    }
    slots
}

/// Top-3 leaderboard in display order.
pub fn leaderboard<R: Scored + Clone>(records: &[R]) -> Vec<PodiumEntry<R>> {
    podium(top_n(records, LEADERBOARD_SIZE))
}
