//! Centralized tuning constants for the Questdeck engine.
//!
//! Keeping these together ensures gameplay can only be adjusted via code
//! changes reviewed in version control, rather than through external assets.

// Slot rotation ------------------------------------------------------------
/// Visible quest cards per category. Pools smaller than this are clamped.
pub const SLOTS_PER_CATEGORY: usize = 3;
/// Resampling attempts before a draw gives up and keeps a colliding index.
pub(crate) const RESAMPLE_ATTEMPTS: u32 = 100;

// Swipe budget -------------------------------------------------------------
/// Daily allowance of reject actions, shared across all categories.
pub const MAX_SWIPES: u8 = 3;

// Daily check-in -----------------------------------------------------------
/// Reward per check-in slot; slot 31 is the monthly jackpot.
pub(crate) const CHECKIN_REWARDS: [u32; 31] = [
    10, 10, 15, 15, 20, 20, 25, 25, 30, 30, 35, 35, 40, 40, 45, 45, 50, 50, 55, 55, 60, 60, 65,
    65, 70, 70, 75, 75, 80, 80, 200,
];

// Storage keys -------------------------------------------------------------
// One key per piece of engine state; every mutation writes through so a
// reload reconstructs the last committed state exactly.
pub(crate) const KEY_SEED: &str = "questdeck.seed";
pub(crate) const KEY_SLOTS: [&str; 3] = [
    "questdeck.slots.weekly",
    "questdeck.slots.one_time",
    "questdeck.slots.in_flight",
];
pub(crate) const KEY_NEXT_SLOTS: [&str; 3] = [
    "questdeck.next.weekly",
    "questdeck.next.one_time",
    "questdeck.next.in_flight",
];
pub(crate) const KEY_COMPLETED: [&str; 3] = [
    "questdeck.completed.weekly",
    "questdeck.completed.one_time",
    "questdeck.completed.in_flight",
];
pub(crate) const KEY_DISMISSED: &str = "questdeck.dismissed";
pub(crate) const KEY_SWIPES: &str = "questdeck.swipes";
pub(crate) const KEY_POINTS: &str = "questdeck.points";
pub(crate) const KEY_VOUCHERS: &str = "questdeck.vouchers";
pub(crate) const KEY_CHECKIN: &str = "questdeck.checkin";

/// All persisted keys, used by the reset controller to clear storage.
pub(crate) const ALL_KEYS: [&str; 15] = [
    KEY_SEED,
    KEY_SLOTS[0],
    KEY_SLOTS[1],
    KEY_SLOTS[2],
    KEY_NEXT_SLOTS[0],
    KEY_NEXT_SLOTS[1],
    KEY_NEXT_SLOTS[2],
    KEY_COMPLETED[0],
    KEY_COMPLETED[1],
    KEY_COMPLETED[2],
    KEY_DISMISSED,
    KEY_SWIPES,
    KEY_POINTS,
    KEY_VOUCHERS,
    KEY_CHECKIN,
];
