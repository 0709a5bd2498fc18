//! End-to-end session behavior over the persistence seam: reloads, corrupt
//! storage recovery, and the full reset path.

use questdeck_engine::constants::{MAX_SWIPES, SLOTS_PER_CATEGORY};
use questdeck_engine::{
    Category, ClaimOutcome, CompleteOutcome, MemoryStore, QuestEngine, SwipeOutcome,
};

fn boot(store: &MemoryStore) -> QuestEngine<MemoryStore> {
    QuestEngine::with_builtin(store.clone(), 0x51DE)
}

fn visible_ids(engine: &QuestEngine<MemoryStore>, category: Category) -> Vec<String> {
    engine
        .snapshot(category)
        .cards
        .iter()
        .map(|c| c.quest.id.clone())
        .collect()
}

#[test]
fn reload_reconstructs_the_committed_state() {
    let store = MemoryStore::new();
    let mut engine = boot(&store);

    let SwipeOutcome::Rejected { dismissed_id, .. } = engine.swipe_left(Category::Weekly, 1)
    else {
        panic!("fresh engine must allow a swipe");
    };
    let CompleteOutcome::Credited { reward } = engine.complete(Category::InFlight, 0) else {
        panic!("fresh engine must allow a completion");
    };
    assert_eq!(engine.claim_checkin(), ClaimOutcome::Credited { day: 1, reward: 10 });

    let expected: Vec<Vec<String>> = Category::ALL
        .iter()
        .map(|&c| visible_ids(&engine, c))
        .collect();
    let expected_points = engine.points_balance();
    drop(engine);

    // Same store, new session.
    let reloaded = boot(&store);
    for (category, ids) in Category::ALL.iter().zip(&expected) {
        assert_eq!(&visible_ids(&reloaded, *category), ids);
    }
    assert_eq!(reloaded.swipes_left(), MAX_SWIPES - 1);
    assert_eq!(reloaded.points_balance(), expected_points);
    assert_eq!(reloaded.points_balance(), u64::from(reward) + 10);
    assert!(reloaded.ledger().is_dismissed(&dismissed_id));
    assert_eq!(reloaded.checkin().checked_count(), 1);
    // The completed flag survives the reload, still awaiting its advance.
    assert!(reloaded.snapshot(Category::InFlight).cards[0].completed);
}

#[test]
fn reload_preserves_vouchers() {
    let store = MemoryStore::new();
    let mut engine = boot(&store);
    while engine.points_balance() < 300 {
        engine.complete(Category::Weekly, 0);
        engine.advance(Category::Weekly, 0);
    }
    let voucher = engine.redeem("wifi-full").expect("balance covers the pass");
    drop(engine);

    let mut reloaded = boot(&store);
    assert_eq!(reloaded.vouchers().len(), 1);
    assert!(reloaded.use_voucher(&voucher.id));
    assert!(reloaded.vouchers().is_empty());
}

#[test]
fn corrupt_slot_state_falls_back_to_a_fresh_rotation() {
    let store = MemoryStore::new();
    let mut engine = boot(&store);
    engine.claim_checkin();
    let points = {
        engine.complete(Category::OneTime, 0);
        engine.points_balance()
    };
    drop(engine);

    // Garbage where a slot array should be, plus an out-of-range index.
    store.inject("questdeck.slots.weekly", "not json at all");
    store.inject("questdeck.next.in_flight", "[9999,0,1]");

    let reloaded = boot(&store);
    for category in Category::ALL {
        let snapshot = reloaded.snapshot(category);
        assert_eq!(snapshot.cards.len(), SLOTS_PER_CATEGORY);
        for (i, card) in snapshot.cards.iter().enumerate() {
            assert!(
                !snapshot.cards[..i].iter().any(|c| c.quest.id == card.quest.id),
                "duplicate visible quest after recovery"
            );
        }
    }
    // Healthy pieces survive: the corrupt keys are rebuilt in isolation.
    assert_eq!(reloaded.points_balance(), points);
    assert_eq!(reloaded.checkin().checked_count(), 1);
}

#[test]
fn corrupt_budget_resets_without_touching_slots() {
    let store = MemoryStore::new();
    let engine = boot(&store);
    let weekly = visible_ids(&engine, Category::Weekly);
    drop(engine);

    store.inject("questdeck.swipes", r#"{"remaining":250}"#);

    let reloaded = boot(&store);
    assert_eq!(reloaded.swipes_left(), MAX_SWIPES, "inflated budget is discarded");
    assert_eq!(visible_ids(&reloaded, Category::Weekly), weekly);
}

#[test]
fn dismissed_quests_never_reappear_after_reload() {
    let store = MemoryStore::new();
    let mut engine = boot(&store);

    let mut dismissed = Vec::new();
    for slot in 0..MAX_SWIPES as usize {
        if let SwipeOutcome::Rejected { dismissed_id, .. } =
            engine.swipe_left(Category::Weekly, slot)
        {
            dismissed.push(dismissed_id);
        }
    }
    assert_eq!(dismissed.len(), MAX_SWIPES as usize);
    drop(engine);

    let reloaded = boot(&store);
    let snapshot = reloaded.snapshot(Category::Weekly);
    for card in &snapshot.cards {
        assert!(!dismissed.contains(&card.quest.id));
        assert!(!dismissed.contains(&card.preview.id));
    }
}

#[test]
fn reset_clears_the_store_and_redraws() {
    let store = MemoryStore::new();
    let mut engine = boot(&store);
    engine.swipe_left(Category::InFlight, 0);
    engine.complete(Category::Weekly, 2);
    engine.claim_checkin();

    engine.reset();
    drop(engine);

    let reloaded = boot(&store);
    assert_eq!(reloaded.swipes_left(), MAX_SWIPES);
    assert_eq!(reloaded.points_balance(), 0);
    assert!(reloaded.ledger().is_empty());
    assert_eq!(reloaded.checkin().checked_count(), 0);
    for category in Category::ALL {
        assert_eq!(reloaded.snapshot(category).cards.len(), SLOTS_PER_CATEGORY);
    }
}
