//! Questdeck engine: quest slot rotation for a gamified loyalty client.
//!
//! Each quest category exposes a bounded set of visible slots, every slot
//! carries a precomputed replacement shown as a blurred preview, and a
//! daily swipe budget gates how many quests can be rejected. Rejected and
//! completed quests land in a dismissal ledger and are never offered
//! again until a full reset. All state is written through a key-value
//! persistence seam after every mutation, so the engine survives reloads.
//!
//! The crate is platform-agnostic: the browser shell implements
//! [`KeyValueStore`] over `localStorage`, tests and the sim harness use
//! [`MemoryStore`].

pub mod budget;
pub mod catalog;
pub mod checkin;
pub mod completion;
pub mod constants;
pub mod engine;
pub mod kv;
pub mod ledger;
pub mod points;
pub mod rotation;
pub mod shop;

pub use budget::SwipeBudget;
pub use catalog::{Category, QuestCatalog, QuestRecord};
pub use checkin::{CheckinCalendar, ClaimOutcome};
pub use completion::CompletionFlags;
pub use constants::{MAX_SWIPES, SLOTS_PER_CATEGORY};
pub use engine::{
    AdvanceOutcome, CategorySnapshot, CompleteOutcome, QuestEngine, SlotCard, SwipeOutcome,
};
pub use kv::{KeyValueStore, MemoryStore};
pub use ledger::DismissalLedger;
pub use points::PointsLedger;
pub use rotation::{CategoryRotation, Draw};
pub use shop::{ShopCatalog, ShopError, ShopItem, Voucher, VoucherWallet};
