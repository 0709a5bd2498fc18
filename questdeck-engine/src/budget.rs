//! Swipe budget: the daily allowance of reject actions.

use crate::constants::MAX_SWIPES;
use serde::{Deserialize, Serialize};

/// Decrementing counter gating swipe-reject across all categories.
///
/// There is no wall-clock rollover; the counter returns to [`MAX_SWIPES`]
/// only through the reset controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeBudget {
    remaining: u8,
}

impl Default for SwipeBudget {
    fn default() -> Self {
        Self {
            remaining: MAX_SWIPES,
        }
    }
}

impl SwipeBudget {
    #[must_use]
    pub fn remaining(self) -> u8 {
        self.remaining
    }

    /// Whether a reject action is currently permitted.
    #[must_use]
    pub fn can_reject(self) -> bool {
        self.remaining > 0
    }

    /// Consume one reject. Returns `false` (and changes nothing) when the
    /// budget is already exhausted; callers surface the limit notice.
    pub fn consume_reject(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.remaining = MAX_SWIPES;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_counts_down_and_stops_at_zero() {
        let mut budget = SwipeBudget::default();
        assert_eq!(budget.remaining(), MAX_SWIPES);

        for left in (0..MAX_SWIPES).rev() {
            assert!(budget.can_reject());
            assert!(budget.consume_reject());
            assert_eq!(budget.remaining(), left);
        }

        assert!(!budget.can_reject());
        assert!(!budget.consume_reject());
        assert_eq!(budget.remaining(), 0);

        budget.reset();
        assert_eq!(budget.remaining(), MAX_SWIPES);
    }
}
