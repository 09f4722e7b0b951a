//! Named results of cart operations.

use serde::Serialize;
use std::fmt;

/// What a cart operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOutcome {
    /// A new product was appended with amount 1.
    Added,
    /// An existing item's amount went up by one.
    Incremented,
    /// An existing item's amount was set.
    Updated,
    /// An item was removed.
    Removed,
    /// The requested amount is above available stock; cart unchanged.
    StockExceeded,
    /// The product is not in the cart; cart unchanged.
    NotFound,
    /// Nothing to do and nothing reported; cart unchanged.
    Ignored,
    /// A lookup failed; cart unchanged.
    Failed,
}

impl CartOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOutcome::Added => "added",
            CartOutcome::Incremented => "incremented",
            CartOutcome::Updated => "updated",
            CartOutcome::Removed => "removed",
            CartOutcome::StockExceeded => "stock_exceeded",
            CartOutcome::NotFound => "not_found",
            CartOutcome::Ignored => "ignored",
            CartOutcome::Failed => "failed",
        }
    }

    /// Check if the cart was replaced (and persisted).
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            CartOutcome::Added
                | CartOutcome::Incremented
                | CartOutcome::Updated
                | CartOutcome::Removed
        )
    }

    /// Check if the outcome was reported to the user as an error.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CartOutcome::StockExceeded | CartOutcome::NotFound | CartOutcome::Failed
        )
    }
}

impl fmt::Display for CartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
