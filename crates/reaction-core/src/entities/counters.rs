//! Denormalized aggregate counters stored on a content item

use serde::{Deserialize, Serialize};

use crate::policy::CounterDelta;

/// Like and dislike counters of one item. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCounters {
    pub likes_count: i64,
    pub dislikes_count: i64,
}

impl ItemCounters {
    /// Create counters, clamping negative inputs to zero
    pub fn new(likes_count: i64, dislikes_count: i64) -> Self {
        Self {
            likes_count: likes_count.max(0),
            dislikes_count: dislikes_count.max(0),
        }
    }

    /// Apply a signed delta. Decrements only apply to a strictly positive value.
    #[must_use]
    pub fn apply(self, delta: CounterDelta) -> Self {
        Self {
            likes_count: step(self.likes_count, delta.likes),
            dislikes_count: step(self.dislikes_count, delta.dislikes),
        }
    }
}

fn step(value: i64, delta: i8) -> i64 {
    match delta {
        0 => value,
        d if d > 0 => value.saturating_add(i64::from(d)),
        d if value > 0 => (value + i64::from(d)).max(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_increment() {
        let counters = ItemCounters::default().apply(CounterDelta::new(1, 0));
        assert_eq!(counters, ItemCounters::new(1, 0));
    }

    #[test]
    fn test_apply_switch() {
        let counters = ItemCounters::new(3, 2).apply(CounterDelta::new(-1, 1));
        assert_eq!(counters, ItemCounters::new(2, 3));
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let counters = ItemCounters::default().apply(CounterDelta::new(-1, -1));
        assert_eq!(counters, ItemCounters::default());
    }

    #[test]
    fn test_new_clamps_negative_values() {
        assert_eq!(ItemCounters::new(-4, -1), ItemCounters::default());
    }

    #[test]
    fn test_increment_saturates() {
        let counters = ItemCounters::new(i64::MAX, 0).apply(CounterDelta::new(1, 0));
        assert_eq!(counters.likes_count, i64::MAX);
    }
}
