//! Durable memo storage.
//!
//! # Responsibility
//! - Define the memo store contract used by the view layer.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - No SQLite handle is held between operations.
//! - No transaction spans more than one operation.

pub mod memo_store;
