//! Slot rotation: which pool entries are visible and which are primed
//! as replacements for the preview-before-replace gesture.

use crate::constants::{RESAMPLE_ATTEMPTS, SLOTS_PER_CATEGORY};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Inline storage sized for the usual slot count.
pub type SlotVec<T> = SmallVec<[T; SLOTS_PER_CATEGORY]>;

/// Result of one candidate draw.
///
/// `exhausted` is set when the draw gave up after [`RESAMPLE_ATTEMPTS`]
/// and kept a possibly-colliding index. Non-fatal: the card list degrades
/// to a repeat instead of hanging when the pool is nearly used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub pool_index: usize,
    pub exhausted: bool,
}

fn draw_candidate<R>(pool_len: usize, rng: &mut R, excluded: impl Fn(usize) -> bool) -> Draw
where
    R: Rng + ?Sized,
{
    let mut candidate = rng.gen_range(0..pool_len);
    let mut attempts = 0;
    while excluded(candidate) && attempts < RESAMPLE_ATTEMPTS {
        candidate = rng.gen_range(0..pool_len);
        attempts += 1;
    }
    Draw {
        pool_index: candidate,
        exhausted: excluded(candidate),
    }
}

/// Per-category slot state: `slots[i]` is the visible quest's pool index,
/// `next_slots[i]` the precomputed replacement shown as a blurred preview.
///
/// Invariants (hold whenever an operation returns):
/// - `slots` holds distinct pool indices.
/// - each `next_slots[i]` avoids every `slots` entry, every other
///   `next_slots` entry, and dismissed quests, except after an exhausted
///   draw where the best available candidate is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRotation {
    slots: SlotVec<usize>,
    next_slots: SlotVec<usize>,
}

impl CategoryRotation {
    /// Draw a fresh randomized rotation over a pool of `pool_len` quests.
    ///
    /// The slot count is `SLOTS_PER_CATEGORY` clamped to the pool size; an
    /// empty pool yields an empty rotation. Returns the rotation and
    /// whether any draw exhausted its attempt budget.
    pub fn initialize<R>(
        pool_len: usize,
        rng: &mut R,
        dismissed: impl Fn(usize) -> bool,
    ) -> (Self, bool)
    where
        R: Rng + ?Sized,
    {
        let count = pool_len.min(SLOTS_PER_CATEGORY);
        let mut slots: SlotVec<usize> = SlotVec::new();
        let mut next_slots: SlotVec<usize> = SlotVec::new();
        let mut exhausted = false;

        for _ in 0..count {
            let draw = draw_candidate(pool_len, rng, |c| slots.contains(&c) || dismissed(c));
            exhausted |= draw.exhausted;
            slots.push(draw.pool_index);
        }
        for _ in 0..count {
            let draw = draw_candidate(pool_len, rng, |c| {
                slots.contains(&c) || next_slots.contains(&c) || dismissed(c)
            });
            exhausted |= draw.exhausted;
            next_slots.push(draw.pool_index);
        }

        (Self { slots, next_slots }, exhausted)
    }

    /// Promote the preview into the visible slot, then resample the
    /// preview under the usual exclusions. Pure slot bookkeeping: budget
    /// and ledger side effects belong to the caller.
    ///
    /// Returns `None` when the slot index is out of range.
    pub fn advance_slot<R>(
        &mut self,
        slot: usize,
        pool_len: usize,
        rng: &mut R,
        dismissed: impl Fn(usize) -> bool,
    ) -> Option<Draw>
    where
        R: Rng + ?Sized,
    {
        if slot >= self.slots.len() || pool_len == 0 {
            return None;
        }

        self.slots[slot] = self.next_slots[slot];
        let draw = {
            let slots = &self.slots;
            let next_slots = &self.next_slots;
            draw_candidate(pool_len, rng, |c| {
                slots.contains(&c)
                    || next_slots
                        .iter()
                        .enumerate()
                        .any(|(i, &v)| i != slot && v == c)
                    || dismissed(c)
            })
        };
        self.next_slots[slot] = draw.pool_index;

        Some(Draw {
            pool_index: self.slots[slot],
            exhausted: draw.exhausted,
        })
    }

    /// Reassemble a rotation from separately persisted slot arrays. The
    /// caller is expected to vet the result with [`Self::is_valid`].
    #[must_use]
    pub fn from_parts(slots: Vec<usize>, next_slots: Vec<usize>) -> Self {
        Self {
            slots: SlotVec::from_vec(slots),
            next_slots: SlotVec::from_vec(next_slots),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<usize> {
        self.slots.get(index).copied()
    }

    #[must_use]
    pub fn next_slot(&self, index: usize) -> Option<usize> {
        self.next_slots.get(index).copied()
    }

    #[must_use]
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    #[must_use]
    pub fn next_slots(&self) -> &[usize] {
        &self.next_slots
    }

    /// Whether a persisted rotation is structurally sound for a pool of
    /// `pool_len` quests: parallel arrays, in-range indices, distinct
    /// visible slots. Used to reject corrupt storage on restore.
    #[must_use]
    pub fn is_valid(&self, pool_len: usize) -> bool {
        if self.slots.len() != self.next_slots.len() {
            return false;
        }
        if self.slots.len() > pool_len.min(SLOTS_PER_CATEGORY) {
            return false;
        }
        if self.slots.iter().chain(&self.next_slots).any(|&i| i >= pool_len) {
            return false;
        }
        self.slots
            .iter()
            .enumerate()
            .all(|(i, a)| self.slots[..i].iter().all(|b| a != b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn assert_invariants(rotation: &CategoryRotation, dismissed: &[usize]) {
        for (i, a) in rotation.slots().iter().enumerate() {
            assert!(
                !rotation.slots()[..i].contains(a),
                "duplicate visible slot {a}"
            );
            assert!(!dismissed.contains(a), "dismissed quest {a} visible");
        }
        for (i, n) in rotation.next_slots().iter().enumerate() {
            assert!(!rotation.slots().contains(n), "preview {n} already visible");
            assert!(!dismissed.contains(n), "dismissed quest {n} previewed");
            assert!(
                !rotation.next_slots()[..i].contains(n),
                "duplicate preview {n}"
            );
        }
    }

    #[test]
    fn initialize_draws_distinct_slots_and_previews() {
        let mut rng = SmallRng::seed_from_u64(42);
        let (rotation, exhausted) = CategoryRotation::initialize(10, &mut rng, |_| false);

        assert_eq!(rotation.len(), SLOTS_PER_CATEGORY);
        assert!(!exhausted);
        assert_invariants(&rotation, &[]);
    }

    #[test]
    fn initialize_clamps_to_small_pools() {
        let mut rng = SmallRng::seed_from_u64(7);
        let (rotation, _) = CategoryRotation::initialize(2, &mut rng, |_| false);
        assert_eq!(rotation.len(), 2);

        let (empty, exhausted) = CategoryRotation::initialize(0, &mut rng, |_| false);
        assert!(empty.is_empty());
        assert!(!exhausted);
    }

    #[test]
    fn initialize_skips_dismissed_entries() {
        let dismissed = vec![0, 1, 2, 3];
        let mut rng = SmallRng::seed_from_u64(11);
        let (rotation, exhausted) =
            CategoryRotation::initialize(10, &mut rng, |c| dismissed.contains(&c));

        assert!(!exhausted);
        assert_invariants(&rotation, &dismissed);
    }

    #[test]
    fn advance_promotes_preview_and_resamples() {
        let mut rng = SmallRng::seed_from_u64(3);
        let (mut rotation, _) = CategoryRotation::initialize(10, &mut rng, |_| false);
        let preview = rotation.next_slot(0).unwrap();

        let draw = rotation.advance_slot(0, 10, &mut rng, |_| false).unwrap();
        assert_eq!(draw.pool_index, preview);
        assert_eq!(rotation.slot(0), Some(preview));
        assert_invariants(&rotation, &[]);
    }

    #[test]
    fn advance_out_of_range_is_none() {
        let mut rng = SmallRng::seed_from_u64(5);
        let (mut rotation, _) = CategoryRotation::initialize(10, &mut rng, |_| false);
        let before = rotation.clone();

        assert!(rotation.advance_slot(9, 10, &mut rng, |_| false).is_none());
        assert_eq!(rotation, before);
    }

    #[test]
    fn exhausted_pool_falls_back_instead_of_hanging() {
        // Pool of 3 with 3 visible slots: every preview draw must collide.
        let mut rng = SmallRng::seed_from_u64(9);
        let (rotation, exhausted) = CategoryRotation::initialize(3, &mut rng, |_| false);

        assert_eq!(rotation.len(), 3);
        assert!(exhausted, "previews cannot be distinct in a full pool");
        // Visible slots are still distinct even under fallback.
        for (i, a) in rotation.slots().iter().enumerate() {
            assert!(!rotation.slots()[..i].contains(a));
        }
    }

    #[test]
    fn validity_check_rejects_corrupt_shapes() {
        let mut rng = SmallRng::seed_from_u64(21);
        let (rotation, _) = CategoryRotation::initialize(10, &mut rng, |_| false);
        assert!(rotation.is_valid(10));
        // Shrinking the pool below a persisted index invalidates it.
        assert!(!rotation.is_valid(1));

        let corrupt: CategoryRotation =
            serde_json::from_str(r#"{"slots":[1,1,2],"next_slots":[3,4,5]}"#).unwrap();
        assert!(!corrupt.is_valid(10));

        let lopsided: CategoryRotation =
            serde_json::from_str(r#"{"slots":[1,2],"next_slots":[3]}"#).unwrap();
        assert!(!lopsided.is_valid(10));
    }
}
