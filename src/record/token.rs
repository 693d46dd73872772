//! API token record, carried by a request/response header.

use serde::{Deserialize, Serialize};

use super::{Record, Values};
use crate::id::new_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Cache key and header value
    pub id: String,
    /// Header name the token travels under
    pub name: String,
    #[serde(rename = "value", default)]
    pub values: Values,
    pub is_new: bool,
    /// Lifetime in seconds; zero or less means no expiry
    pub max_age: i64,
}

impl Token {
    /// Creates an empty token with a fresh id.
    pub fn new(name: impl Into<String>, max_age: i64) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            values: Values::new(),
            is_new: true,
            max_age,
        }
    }
}

impl Record for Token {
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
