//! Daily check-in calendar: 31 reward slots claimed additively.
//!
//! Claiming is not tied to the wall clock; the next claimable slot is
//! simply one past the number of slots already checked, and a transient
//! once-per-session latch mirrors the original client's behavior.

use crate::constants::CHECKIN_REWARDS;
use serde::{Deserialize, Serialize};

/// Outcome of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The next slot was claimed and its reward should be credited.
    Credited { day: u8, reward: u32 },
    /// A slot was already claimed this session.
    AlreadyClaimedToday,
    /// All 31 slots have been claimed.
    CalendarComplete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinCalendar {
    /// Claimed slot numbers (1-based), in claim order.
    checked_days: Vec<u8>,
    /// Session-scoped latch; deliberately not persisted.
    #[serde(skip)]
    claimed_today: bool,
}

impl CheckinCalendar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The next claimable slot, 1-based. `None` once the calendar is full.
    #[must_use]
    pub fn next_slot(&self) -> Option<u8> {
        let next = self.checked_days.len() + 1;
        u8::try_from(next)
            .ok()
            .filter(|&n| usize::from(n) <= CHECKIN_REWARDS.len())
    }

    #[must_use]
    pub fn is_checked(&self, day: u8) -> bool {
        self.checked_days.contains(&day)
    }

    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.checked_days.len()
    }

    #[must_use]
    pub fn reward_for(day: u8) -> Option<u32> {
        CHECKIN_REWARDS.get(usize::from(day).checked_sub(1)?).copied()
    }

    /// Claim the next slot. The reward is credited by the caller.
    pub fn claim(&mut self) -> ClaimOutcome {
        if self.claimed_today {
            return ClaimOutcome::AlreadyClaimedToday;
        }
        let Some(day) = self.next_slot() else {
            return ClaimOutcome::CalendarComplete;
        };
        // next_slot() guarantees the bounds here.
        let reward = Self::reward_for(day).unwrap_or(0);
        self.checked_days.push(day);
        self.claimed_today = true;
        ClaimOutcome::Credited { day, reward }
    }

    pub fn reset(&mut self) {
        self.checked_days.clear();
        self.claimed_today = false;
    }
}
