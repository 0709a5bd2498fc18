//! The quest engine: slot rotation, swipe budget, dismissals, completion,
//! points and reset, with write-through persistence after every mutation.

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::budget::SwipeBudget;
use crate::catalog::{Category, QuestCatalog, QuestRecord};
use crate::checkin::{CheckinCalendar, ClaimOutcome};
use crate::completion::CompletionFlags;
use crate::constants::{
    ALL_KEYS, KEY_CHECKIN, KEY_COMPLETED, KEY_DISMISSED, KEY_NEXT_SLOTS, KEY_POINTS, KEY_SEED,
    KEY_SLOTS, KEY_SWIPES, KEY_VOUCHERS, MAX_SWIPES,
};
use crate::kv::KeyValueStore;
use crate::ledger::DismissalLedger;
use crate::points::PointsLedger;
use crate::rotation::CategoryRotation;
use crate::shop::{ShopCatalog, ShopError, Voucher, VoucherWallet};

/// Result of a swipe-reject gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum SwipeOutcome {
    /// The quest was dismissed and the preview promoted into its slot.
    Rejected {
        dismissed_id: String,
        replacement: QuestRecord,
        pool_exhausted: bool,
    },
    /// The swipe budget is spent; nothing changed. The shell shows the
    /// "limit reached" notice.
    LimitReached,
    /// Out-of-range slot or empty category; nothing changed.
    Ignored,
}

/// Result of marking a quest complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompleteOutcome {
    /// First completion of this occupancy; the reward was credited.
    Credited { reward: u32 },
    /// The slot was already completed; no double credit.
    AlreadyCompleted,
    Ignored,
}

/// Result of advancing past a completed quest.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    Advanced {
        replacement: QuestRecord,
        pool_exhausted: bool,
    },
    /// The slot is still pending; advancing is only meaningful after
    /// completion.
    NotCompleted,
    Ignored,
}

/// One visible card with its blurred preview and completion flag.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCard {
    pub quest: QuestRecord,
    /// Replacement shown blurred behind the active card. Never primary.
    pub preview: QuestRecord,
    pub completed: bool,
}

/// Read-only view the UI renders a category from.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySnapshot {
    pub category: Category,
    pub cards: Vec<SlotCard>,
    pub swipes_left: u8,
}

/// Main engine owning all rotation state and the persistence seam.
///
/// All operations are synchronous; every invariant holds once an
/// operation returns, and every mutation is written through to the store
/// so a reload reconstructs the last committed state.
pub struct QuestEngine<S: KeyValueStore> {
    catalog: QuestCatalog,
    shop: ShopCatalog,
    store: S,
    seed: u64,
    rng: ChaCha20Rng,
    rotations: [CategoryRotation; 3],
    completion: [CompletionFlags; 3],
    ledger: DismissalLedger,
    budget: SwipeBudget,
    points: PointsLedger,
    wallet: VoucherWallet,
    checkin: CheckinCalendar,
}

fn restore<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("discarding corrupt persisted state at {key}: {err}");
            None
        }
    }
}

impl<S: KeyValueStore> QuestEngine<S> {
    /// Restore the engine from the store, falling back to a fresh
    /// randomized initialization (seeded with `fallback_seed`) for any
    /// piece of state that is missing or corrupt.
    pub fn new(catalog: QuestCatalog, shop: ShopCatalog, store: S, fallback_seed: u64) -> Self {
        let seed = restore(&store, KEY_SEED).unwrap_or(fallback_seed);
        let rng = ChaCha20Rng::seed_from_u64(seed);

        let ledger: DismissalLedger = restore(&store, KEY_DISMISSED).unwrap_or_default();
        let budget: SwipeBudget = restore(&store, KEY_SWIPES)
            .filter(|b: &SwipeBudget| b.remaining() <= MAX_SWIPES)
            .unwrap_or_default();
        let points: PointsLedger = restore(&store, KEY_POINTS).unwrap_or_default();
        let wallet: VoucherWallet = restore(&store, KEY_VOUCHERS).unwrap_or_default();
        let checkin: CheckinCalendar = restore(&store, KEY_CHECKIN).unwrap_or_default();

        let mut engine = Self {
            catalog,
            shop,
            store,
            seed,
            rng,
            rotations: Default::default(),
            completion: Default::default(),
            ledger,
            budget,
            points,
            wallet,
            checkin,
        };

        for category in Category::ALL {
            engine.restore_category(category);
        }
        engine.persist_all();
        engine
    }

    /// Restore-or-initialize the engine over the catalogs embedded in the
    /// binary.
    pub fn with_builtin(store: S, fallback_seed: u64) -> Self {
        Self::new(
            QuestCatalog::builtin().clone(),
            ShopCatalog::builtin().clone(),
            store,
            fallback_seed,
        )
    }

    fn restore_category(&mut self, category: Category) {
        let idx = category.index();
        let pool_len = self.catalog.pool_len(category);

        let slots: Option<Vec<usize>> = restore(&self.store, KEY_SLOTS[idx]);
        let next_slots: Option<Vec<usize>> = restore(&self.store, KEY_NEXT_SLOTS[idx]);
        let completion: Option<CompletionFlags> = restore(&self.store, KEY_COMPLETED[idx]);

        let rotation = match (slots, next_slots) {
            (Some(s), Some(n)) => Some(CategoryRotation::from_parts(s, n)),
            _ => None,
        };

        // A persisted rotation must be structurally sound and must not
        // re-offer dismissed quests: never in the preview row, and in the
        // visible row only for a completed slot awaiting its advance.
        let rotation = rotation.filter(|r| {
            if !r.is_valid(pool_len) {
                return false;
            }
            let dismissed = |i: usize| {
                self.catalog
                    .quest_id(category, i)
                    .is_none_or(|id| self.ledger.is_dismissed(id))
            };
            if r.next_slots().iter().any(|&i| dismissed(i)) {
                return false;
            }
            r.slots().iter().enumerate().all(|(slot, &i)| {
                !dismissed(i)
                    || completion
                        .as_ref()
                        .is_some_and(|flags| flags.is_completed(slot))
            })
        });

        match rotation {
            Some(rotation) => {
                self.completion[idx] = completion
                    .filter(|flags| flags.len() == rotation.len())
                    .unwrap_or_else(|| CompletionFlags::pending(rotation.len()));
                self.rotations[idx] = rotation;
            }
            None => self.initialize_category(category),
        }
    }

    fn initialize_category(&mut self, category: Category) {
        let idx = category.index();
        let pool_len = self.catalog.pool_len(category);
        let (rotation, exhausted) = {
            let catalog = &self.catalog;
            let ledger = &self.ledger;
            CategoryRotation::initialize(pool_len, &mut self.rng, |i| {
                catalog
                    .quest_id(category, i)
                    .is_none_or(|id| ledger.is_dismissed(id))
            })
        };
        if exhausted {
            warn!("{category:?} pool nearly exhausted during initialization");
        }
        self.completion[idx] = CompletionFlags::pending(rotation.len());
        self.rotations[idx] = rotation;
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.store.set(key, &raw),
            Err(err) => warn!("failed to serialize state for {key}: {err}"),
        }
    }

    fn persist_category(&self, category: Category) {
        let idx = category.index();
        self.persist(KEY_SLOTS[idx], &self.rotations[idx].slots());
        self.persist(KEY_NEXT_SLOTS[idx], &self.rotations[idx].next_slots());
        self.persist(KEY_COMPLETED[idx], &self.completion[idx]);
    }

    fn persist_all(&self) {
        self.persist(KEY_SEED, &self.seed);
        for category in Category::ALL {
            self.persist_category(category);
        }
        self.persist(KEY_DISMISSED, &self.ledger);
        self.persist(KEY_SWIPES, &self.budget);
        self.persist(KEY_POINTS, &self.points);
        self.persist(KEY_VOUCHERS, &self.wallet);
        self.persist(KEY_CHECKIN, &self.checkin);
    }

    /// Swipe-reject the quest in a slot: consumes budget, records the
    /// dismissal, promotes the preview and resamples a fresh one.
    pub fn swipe_left(&mut self, category: Category, slot: usize) -> SwipeOutcome {
        let idx = category.index();
        let Some(pool_index) = self.rotations[idx].slot(slot) else {
            return SwipeOutcome::Ignored;
        };
        let Some(dismissed_id) = self.catalog.quest_id(category, pool_index) else {
            return SwipeOutcome::Ignored;
        };
        if !self.budget.can_reject() {
            debug!("swipe rejected: budget exhausted");
            return SwipeOutcome::LimitReached;
        }
        let dismissed_id = dismissed_id.to_string();

        self.budget.consume_reject();
        self.ledger.record_dismissed(&dismissed_id);

        let draw = {
            let catalog = &self.catalog;
            let ledger = &self.ledger;
            let pool_len = catalog.pool_len(category);
            self.rotations[idx].advance_slot(slot, pool_len, &mut self.rng, |i| {
                catalog
                    .quest_id(category, i)
                    .is_none_or(|id| ledger.is_dismissed(id))
            })
        };
        let Some(draw) = draw else {
            // Unreachable given the slot check above; keep state coherent.
            return SwipeOutcome::Ignored;
        };
        if draw.exhausted {
            warn!("{category:?} pool exhausted while replacing slot {slot}");
        }
        self.completion[idx].clear(slot);

        self.persist_category(category);
        self.persist(KEY_DISMISSED, &self.ledger);
        self.persist(KEY_SWIPES, &self.budget);

        let replacement = self
            .catalog
            .quest(category, draw.pool_index)
            .cloned()
            .unwrap_or_else(|| unreachable_quest(category));
        SwipeOutcome::Rejected {
            dismissed_id,
            replacement,
            pool_exhausted: draw.exhausted,
        }
    }

    /// Mark a slot's quest complete. Credits the quest's reward exactly
    /// once per occupancy and records the quest as dismissed (completion
    /// is terminal for that quest).
    pub fn complete(&mut self, category: Category, slot: usize) -> CompleteOutcome {
        let idx = category.index();
        let Some(pool_index) = self.rotations[idx].slot(slot) else {
            return CompleteOutcome::Ignored;
        };
        let Some(quest) = self.catalog.quest(category, pool_index) else {
            return CompleteOutcome::Ignored;
        };
        let (quest_id, reward) = (quest.id.clone(), quest.reward);

        if !self.completion[idx].mark_completed(slot) {
            return CompleteOutcome::AlreadyCompleted;
        }
        self.points.credit(reward);
        self.ledger.record_dismissed(&quest_id);

        self.persist(KEY_COMPLETED[idx], &self.completion[idx]);
        self.persist(KEY_POINTS, &self.points);
        self.persist(KEY_DISMISSED, &self.ledger);
        debug!("completed {quest_id} for {reward} points");
        CompleteOutcome::Credited { reward }
    }

    /// Advance past a completed quest: the preview takes the slot and the
    /// slot returns to pending. Never touches the swipe budget.
    pub fn advance(&mut self, category: Category, slot: usize) -> AdvanceOutcome {
        let idx = category.index();
        if self.rotations[idx].slot(slot).is_none() {
            return AdvanceOutcome::Ignored;
        }
        if !self.completion[idx].is_completed(slot) {
            return AdvanceOutcome::NotCompleted;
        }

        let draw = {
            let catalog = &self.catalog;
            let ledger = &self.ledger;
            let pool_len = catalog.pool_len(category);
            self.rotations[idx].advance_slot(slot, pool_len, &mut self.rng, |i| {
                catalog
                    .quest_id(category, i)
                    .is_none_or(|id| ledger.is_dismissed(id))
            })
        };
        let Some(draw) = draw else {
            return AdvanceOutcome::Ignored;
        };
        if draw.exhausted {
            warn!("{category:?} pool exhausted while advancing slot {slot}");
        }
        self.completion[idx].clear(slot);
        self.persist_category(category);

        let replacement = self
            .catalog
            .quest(category, draw.pool_index)
            .cloned()
            .unwrap_or_else(|| unreachable_quest(category));
        AdvanceOutcome::Advanced {
            replacement,
            pool_exhausted: draw.exhausted,
        }
    }

    /// Return everything to a freshly randomized configuration and clear
    /// the persisted representation: slots, budget, ledger, completion,
    /// check-in progress, points and vouchers.
    pub fn reset(&mut self) {
        for key in ALL_KEYS {
            self.store.remove(key);
        }
        self.seed = self.rng.r#gen();
        self.rng = ChaCha20Rng::seed_from_u64(self.seed);
        self.ledger.clear();
        self.budget.reset();
        self.points.reset();
        self.wallet.clear();
        self.checkin.reset();
        for category in Category::ALL {
            self.initialize_category(category);
        }
        self.persist_all();
        debug!("engine reset with seed {:#x}", self.seed);
    }

    /// Redeem a shop item for a voucher.
    ///
    /// # Errors
    ///
    /// Fails without side effects when the item is unknown or the points
    /// balance does not cover it.
    pub fn redeem(&mut self, item_id: &str) -> Result<Voucher, ShopError> {
        let item = self
            .shop
            .find_item(item_id)
            .ok_or_else(|| ShopError::UnknownItem(item_id.to_string()))?
            .clone();
        if !self.points.try_debit(item.cost_points) {
            return Err(ShopError::InsufficientPoints {
                have: self.points.balance(),
                need: item.cost_points,
            });
        }
        let voucher = self.wallet.issue(&item);
        self.persist(KEY_POINTS, &self.points);
        self.persist(KEY_VOUCHERS, &self.wallet);
        Ok(voucher)
    }

    /// Use (and remove) an owned voucher.
    pub fn use_voucher(&mut self, voucher_id: &str) -> bool {
        let used = self.wallet.use_voucher(voucher_id);
        if used {
            self.persist(KEY_VOUCHERS, &self.wallet);
        }
        used
    }

    /// Claim the next daily check-in slot, crediting its reward.
    pub fn claim_checkin(&mut self) -> ClaimOutcome {
        let outcome = self.checkin.claim();
        if let ClaimOutcome::Credited { reward, .. } = outcome {
            self.points.credit(reward);
            self.persist(KEY_CHECKIN, &self.checkin);
            self.persist(KEY_POINTS, &self.points);
        }
        outcome
    }

    /// Read-only view of one category for rendering.
    #[must_use]
    pub fn snapshot(&self, category: Category) -> CategorySnapshot {
        let idx = category.index();
        let rotation = &self.rotations[idx];
        let cards = (0..rotation.len())
            .filter_map(|slot| {
                let quest = self
                    .catalog
                    .quest(category, rotation.slot(slot)?)?
                    .clone();
                let preview = self
                    .catalog
                    .quest(category, rotation.next_slot(slot)?)?
                    .clone();
                Some(SlotCard {
                    quest,
                    preview,
                    completed: self.completion[idx].is_completed(slot),
                })
            })
            .collect();
        CategorySnapshot {
            category,
            cards,
            swipes_left: self.budget.remaining(),
        }
    }

    #[must_use]
    pub fn swipes_left(&self) -> u8 {
        self.budget.remaining()
    }

    #[must_use]
    pub fn can_reject(&self) -> bool {
        self.budget.can_reject()
    }

    #[must_use]
    pub fn points_balance(&self) -> u64 {
        self.points.balance()
    }

    #[must_use]
    pub fn vouchers(&self) -> &[Voucher] {
        self.wallet.vouchers()
    }

    #[must_use]
    pub fn checkin(&self) -> &CheckinCalendar {
        &self.checkin
    }

    #[must_use]
    pub fn ledger(&self) -> &DismissalLedger {
        &self.ledger
    }

    #[must_use]
    pub fn rotation(&self, category: Category) -> &CategoryRotation {
        &self.rotations[category.index()]
    }

    #[must_use]
    pub fn catalog(&self) -> &QuestCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn shop(&self) -> &ShopCatalog {
        &self.shop
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

// Placeholder for the structurally impossible case where a drawn pool
// index has no catalog entry; keeps the public API panic-free.
fn unreachable_quest(category: Category) -> QuestRecord {
    QuestRecord {
        id: String::from("unknown"),
        title: String::new(),
        desc: String::new(),
        reward: 0,
        category,
        time_left: String::new(),
        location: None,
        image: String::new(),
    }
}
