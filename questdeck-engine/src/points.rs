//! Points ledger: the loyalty balance credited by quests and check-ins
//! and debited by shop redemptions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsLedger {
    balance: u64,
}

impl PointsLedger {
    #[must_use]
    pub fn with_balance(balance: u64) -> Self {
        Self { balance }
    }

    #[must_use]
    pub fn balance(self) -> u64 {
        self.balance
    }

    pub fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(u64::from(amount));
    }

    /// Debit for a redemption. Returns `false` (and changes nothing) when
    /// the balance is insufficient.
    pub fn try_debit(&mut self, amount: u64) -> bool {
        if self.balance < amount {
            return false;
        }
        self.balance -= amount;
        true
    }

    pub fn reset(&mut self) {
        self.balance = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_and_debit_guard_the_balance() {
        let mut points = PointsLedger::default();
        points.credit(250);
        points.credit(50);
        assert_eq!(points.balance(), 300);

        assert!(points.try_debit(200));
        assert_eq!(points.balance(), 100);

        assert!(!points.try_debit(101));
        assert_eq!(points.balance(), 100, "failed debit must not change balance");
    }
}
