//! Dismissal ledger: quest IDs that must never be offered again.

use serde::{Deserialize, Serialize};

/// Session-scoped blacklist of quest IDs, covering both swiped-away and
/// completed quests. Grows monotonically; only the reset controller clears
/// it. Persisted as an ordered sequence, queried as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissalLedger {
    ids: Vec<String>,
}

impl DismissalLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent add; duplicate records are no-ops.
    pub fn record_dismissed(&mut self, quest_id: &str) {
        if !self.is_dismissed(quest_id) {
            self.ids.push(quest_id.to_string());
        }
    }

    #[must_use]
    pub fn is_dismissed(&self, quest_id: &str) -> bool {
        self.ids.iter().any(|id| id == quest_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_idempotent_and_ordered() {
        let mut ledger = DismissalLedger::new();
        ledger.record_dismissed("wk-a");
        ledger.record_dismissed("if-b");
        ledger.record_dismissed("wk-a");

        assert_eq!(ledger.len(), 2);
        assert!(ledger.is_dismissed("wk-a"));
        assert!(ledger.is_dismissed("if-b"));
        assert!(!ledger.is_dismissed("ot-c"));

        let json = serde_json::to_string(&ledger).unwrap();
        let restored: DismissalLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ledger);
    }
}
