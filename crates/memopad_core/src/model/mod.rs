//! Memo domain model.
//!
//! # Responsibility
//! - Define the persisted memo record and its not-yet-persisted draft.
//!
//! # Invariants
//! - Only persisted memos carry a `MemoId`.
//! - `id` and `created_at` never change after persistence.

pub mod memo;
