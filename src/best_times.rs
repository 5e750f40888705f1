//! Best completion time per level
//!
//! Kept in memory for the lifetime of the process.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Best time (seconds) per 1-based level index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BestTimes {
    entries: BTreeMap<usize, f64>,
}

impl BestTimes {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Best time for a level, if it has been completed
    pub fn get(&self, level: usize) -> Option<f64> {
        self.entries.get(&level).copied()
    }

    /// Whether a time would replace the stored best (strictly lower, or none stored)
    pub fn qualifies(&self, level: usize, time: f64) -> bool {
        self.get(level).is_none_or(|best| time < best)
    }

    /// Record a completion time. Returns true if it became the new best.
    pub fn record(&mut self, level: usize, time: f64) -> bool {
        if !self.qualifies(level, time) {
            return false;
        }
        let previous = self.entries.insert(level, time);
        match previous {
            Some(old) => log::info!("New best on level {level}: {time:.2}s (was {old:.2}s)"),
            None => log::info!("First completion of level {level}: {time:.2}s"),
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (level, seconds) pairs in level order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|(&level, &time)| (level, time))
    }
}

/// Format seconds the way the HUD shows them
pub fn format_time(secs: f64) -> String {
    format!("{secs:.2}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_strictly_lower_times_win() {
        let mut best = BestTimes::new();
        assert!(best.is_empty());

        assert!(best.record(1, 12.40));
        assert!(best.record(1, 10.10));
        assert!(!best.record(1, 15.00));
        assert!(!best.record(1, 10.10));
        assert_eq!(best.get(1), Some(10.10));
    }

    #[test]
    fn test_levels_are_independent() {
        let mut best = BestTimes::new();
        best.record(2, 30.0);
        best.record(1, 8.5);
        assert_eq!(best.get(3), None);
        assert!(best.qualifies(3, 1000.0));
        let all: Vec<_> = best.iter().collect();
        assert_eq!(all, vec![(1, 8.5), (2, 30.0)]);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(10.1), "10.10s");
        assert_eq!(format_time(0.0), "0.00s");
    }
}
