//! Core of Memopad, a single-list memo keeper.
//! This crate owns memo persistence and the list view model that mirrors it.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod store;
pub mod view;

pub use clock::{Clock, SystemClock};
pub use db::migrations::{MigrationPlan, SchemaStatus};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::memo::{Memo, MemoId, NewMemo};
pub use store::memo_store::{
    MemoStore, SqliteMemoStore, StoreError, StoreResult, SCHEMA_VERSION,
};
pub use view::list_model::{
    ListDisplay, MemoListModel, SubmitOutcome, TextInput, ViewError, ViewResult,
};
pub use view::row::{format_created_at, format_created_at_in, MemoRow, CREATED_AT_FORMAT};
pub use view::viewport::{InvalidationFlag, Viewport};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
