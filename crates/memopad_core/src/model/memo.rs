//! Memo records.
//!
//! # Responsibility
//! - Separate the transient draft (`NewMemo`) from the persisted row (`Memo`).
//!
//! # Invariants
//! - A `Memo` always carries a store-assigned id, so store operations that
//!   need a key cannot be called with a draft.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned row key (`memo.no`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoId(i64);

impl MemoId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for MemoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MemoId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A memo that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMemo {
    pub content: String,
    /// Unix epoch milliseconds, set by the caller.
    pub created_at: i64,
}

impl NewMemo {
    pub fn new(content: impl Into<String>, created_at: i64) -> Self {
        Self {
            content: content.into(),
            created_at,
        }
    }
}

/// A persisted memo row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: MemoId,
    pub content: String,
    /// Unix epoch milliseconds. Immutable after creation.
    pub created_at: i64,
}

impl Memo {
    pub fn new(id: MemoId, content: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            content: content.into(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Memo, MemoId};

    #[test]
    fn new_keeps_given_fields() {
        let memo = Memo::new(MemoId::new(7), "before", 1_000);
        assert_eq!(memo.id, MemoId::new(7));
        assert_eq!(memo.created_at, 1_000);
        assert_eq!(memo.content, "before");
    }

    #[test]
    fn memo_id_displays_raw_value() {
        assert_eq!(MemoId::from(42).to_string(), "42");
    }
}
