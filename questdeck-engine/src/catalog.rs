//! Quest catalog: the static, read-only list of quests grouped by category.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const DEFAULT_QUEST_DATA: &str = include_str!("../data/quests.json");

/// Quest grouping shown as tabs in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Weekly,
    OneTime,
    InFlight,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Weekly, Category::OneTime, Category::InFlight];

    /// Stable position of this category in per-category state arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Category::Weekly => 0,
            Category::OneTime => 1,
            Category::InFlight => 2,
        }
    }

    /// Suffix used to build storage keys for this category.
    #[must_use]
    pub const fn key_suffix(self) -> &'static str {
        match self {
            Category::Weekly => "weekly",
            Category::OneTime => "one_time",
            Category::InFlight => "in_flight",
        }
    }
}

/// A single quest as authored in the catalog. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestRecord {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub reward: u32,
    pub category: Category,
    #[serde(default)]
    pub time_left: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image: String,
}

/// Container for all quest data, with per-category pools precomputed.
///
/// A pool is the ordered sequence of catalog positions belonging to one
/// category; re-filtering the same catalog always yields the same pool
/// indices, so persisted slot indices stay valid across reloads.
#[derive(Debug, Clone, Default)]
pub struct QuestCatalog {
    quests: Vec<QuestRecord>,
    pools: [Vec<usize>; 3],
}

impl QuestCatalog {
    /// Create empty quest data (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_records(quests: Vec<QuestRecord>) -> Self {
        let mut pools: [Vec<usize>; 3] = Default::default();
        for (pos, quest) in quests.iter().enumerate() {
            pools[quest.category.index()].push(pos);
        }
        Self { quests, pools }
    }

    /// Load quest data from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid quest data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Ok(Self::from_records(raw.quests))
    }

    /// The catalog embedded in the binary.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static CATALOG: OnceLock<QuestCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            QuestCatalog::from_json(DEFAULT_QUEST_DATA).unwrap_or_default()
        })
    }

    /// Number of quests in one category's pool.
    #[must_use]
    pub fn pool_len(&self, category: Category) -> usize {
        self.pools[category.index()].len()
    }

    /// Quest at a pool index within a category. `None` when out of range.
    #[must_use]
    pub fn quest(&self, category: Category, pool_index: usize) -> Option<&QuestRecord> {
        self.pools[category.index()]
            .get(pool_index)
            .and_then(|&pos| self.quests.get(pos))
    }

    /// Quest ID at a pool index, for dismissal bookkeeping.
    #[must_use]
    pub fn quest_id(&self, category: Category, pool_index: usize) -> Option<&str> {
        self.quest(category, pool_index).map(|q| q.id.as_str())
    }

    #[must_use]
    pub fn find_by_id(&self, quest_id: &str) -> Option<&QuestRecord> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    quests: Vec<QuestRecord>,
}
