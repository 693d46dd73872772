//! Free-standing record stored under a caller-chosen key.

use serde::{Deserialize, Serialize};

use super::{Record, Values};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Caller-chosen cache key
    pub id: String,
    #[serde(rename = "value", default)]
    pub values: Values,
    /// Lifetime in seconds; zero or less means no expiry
    #[serde(default)]
    pub max_age: i64,
    /// Not persisted; recomputed when the item is loaded
    #[serde(skip, default = "fresh")]
    pub is_new: bool,
}

fn fresh() -> bool {
    true
}

impl Item {
    /// Creates an empty item under `id`.
    pub fn new(id: impl Into<String>, max_age: i64) -> Self {
        Self {
            id: id.into(),
            values: Values::new(),
            max_age,
            is_new: true,
        }
    }
}

impl Record for Item {
    fn id(&self) -> &str {
        &self.id
    }

    fn max_age(&self) -> i64 {
        self.max_age
    }

    fn values(&self) -> &Values {
        &self.values
    }

    fn values_mut(&mut self) -> &mut Values {
        &mut self.values
    }

    fn is_new(&self) -> bool {
        self.is_new
    }

    fn mark_existing(&mut self) {
        self.is_new = false;
    }
}
