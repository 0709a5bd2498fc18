//! Reward shop and voucher inventory.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_SHOP_DATA: &str = include_str!("../data/shop.json");

/// A single redeemable item available in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub cost_points: u64,
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub availability: String,
}

/// Complete shop data structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopCatalog {
    pub items: Vec<ShopItem>,
}

impl ShopCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load shop data from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid shop data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The shop embedded in the binary.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static SHOP: OnceLock<ShopCatalog> = OnceLock::new();
        SHOP.get_or_init(|| ShopCatalog::from_json(DEFAULT_SHOP_DATA).unwrap_or_default())
    }

    #[must_use]
    pub fn find_item(&self, item_id: &str) -> Option<&ShopItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

/// Errors surfaced by shop redemption.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("unknown shop item: {0}")]
    UnknownItem(String),
    #[error("insufficient points: have {have}, need {need}")]
    InsufficientPoints { have: u64, need: u64 },
}

/// A redeemed shop item owned by the user until it is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    /// Unique per redemption, `{item_id}-{serial}`.
    pub id: String,
    pub item_id: String,
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub availability: String,
}

/// Owned vouchers plus the serial counter that keeps instance IDs unique
/// across redemptions of the same item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherWallet {
    vouchers: Vec<Voucher>,
    #[serde(default)]
    issued: u64,
}

impl VoucherWallet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a voucher for a redeemed item and add it to the wallet.
    pub fn issue(&mut self, item: &ShopItem) -> Voucher {
        self.issued += 1;
        let voucher = Voucher {
            id: format!("{}-{}", item.id, self.issued),
            item_id: item.id.clone(),
            name: item.name.clone(),
            desc: item.desc.clone(),
            icon: item.icon.clone(),
            availability: item.availability.clone(),
        };
        self.vouchers.push(voucher.clone());
        voucher
    }

    /// Remove a voucher from the inventory. Returns `false` when no
    /// voucher with that ID is owned.
    pub fn use_voucher(&mut self, voucher_id: &str) -> bool {
        let before = self.vouchers.len();
        self.vouchers.retain(|v| v.id != voucher_id);
        self.vouchers.len() < before
    }

    #[must_use]
    pub fn vouchers(&self) -> &[Voucher] {
        &self.vouchers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vouchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vouchers.is_empty()
    }

    pub fn clear(&mut self) {
        self.vouchers.clear();
        self.issued = 0;
    }
}
