//! Player detection by frequency of appearance in `White`/`Black` tags.

use std::collections::HashMap;

use crate::game_data::GameRecord;

/// Unknown-player placeholder used by most PGN exporters.
const PLACEHOLDER: &str = "?";

/// Handle counts in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct HandleCounts {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl HandleCounts {
    pub fn from_games(games: &[GameRecord<'_>]) -> Self {
        let mut counts = Self::default();
        for game in games {
            if let Some(white) = game.white() {
                counts.add(white);
            }
            if let Some(black) = game.black() {
                counts.add(black);
            }
        }
        counts
    }

    fn add(&mut self, handle: &str) {
        let handle = handle.trim();
        if handle.is_empty() || handle == PLACEHOLDER {
            return;
        }
        match self.counts.get_mut(handle) {
            Some(n) => *n += 1,
            None => {
                self.order.push(handle.to_string());
                self.counts.insert(handle.to_string(), 1);
            }
        }
    }

    pub fn count(&self, handle: &str) -> usize {
        self.counts.get(handle).copied().unwrap_or(0)
    }

    /// Handle with the highest count. On a tie the handle seen first wins
    /// (record order, White before Black within a record).
    pub fn most_frequent(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for handle in &self.order {
            let n = self.counts[handle];
            if best.map_or(true, |(_, top)| n > top) {
                best = Some((handle, n));
            }
        }
        best.map(|(handle, _)| handle)
    }
}

/// Most probable owner of a game collection, or `None` if no game names a
/// usable player.
pub fn detect_user(games: &[GameRecord<'_>]) -> Option<String> {
    HandleCounts::from_games(games)
        .most_frequent()
        .map(str::to_string)
}
