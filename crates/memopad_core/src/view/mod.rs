//! List view model and recycled display rows.
//!
//! # Responsibility
//! - Mirror the store in memory and keep it in sync after each mutation.
//! - Bind memos into reusable rows and route row actions back to the model.
//!
//! # Invariants
//! - The mirror is rebuilt wholesale; it is never patched after create.
//! - A row action uses the memo from that row's latest binding.

pub mod list_model;
pub mod row;
pub mod viewport;
