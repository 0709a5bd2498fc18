//! Per-slot completion flags, pending a human-triggered advance.

use crate::rotation::SlotVec;
use serde::{Deserialize, Serialize};

/// Parallel to a category's visible slots: `true` once the slot's quest
/// has been verified complete and is waiting for "next quest".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionFlags {
    flags: SlotVec<bool>,
}

impl CompletionFlags {
    /// Fresh all-pending flags for `count` slots.
    #[must_use]
    pub fn pending(count: usize) -> Self {
        Self {
            flags: (0..count).map(|_| false).collect(),
        }
    }

    #[must_use]
    pub fn is_completed(&self, slot: usize) -> bool {
        self.flags.get(slot).copied().unwrap_or(false)
    }

    /// Mark a slot completed. Returns `false` when the slot was already
    /// completed or out of range, so the caller can skip the reward credit.
    pub fn mark_completed(&mut self, slot: usize) -> bool {
        match self.flags.get_mut(slot) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    /// Return a slot to pending after its quest has been replaced.
    pub fn clear(&mut self, slot: usize) {
        if let Some(flag) = self.flags.get_mut(slot) {
            *flag = false;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_is_single_shot_until_cleared() {
        let mut flags = CompletionFlags::pending(3);
        assert!(!flags.is_completed(1));

        assert!(flags.mark_completed(1));
        assert!(flags.is_completed(1));
        // Second mark on the same occupancy is refused.
        assert!(!flags.mark_completed(1));

        flags.clear(1);
        assert!(!flags.is_completed(1));
        assert!(flags.mark_completed(1));
    }

    #[test]
    fn out_of_range_slots_are_safe() {
        let mut flags = CompletionFlags::pending(2);
        assert!(!flags.mark_completed(5));
        assert!(!flags.is_completed(5));
        flags.clear(5);
        assert_eq!(flags.len(), 2);
    }
}
