//! Recyclable row widget state.
//!
//! # Invariants
//! - A row remembers exactly the memo from its latest `bind`.
//! - Rendered text always describes the bound memo.

use crate::model::memo::Memo;
use chrono::{Local, TimeZone, Utc};
use std::fmt::Display;

/// `yyyy/MM/dd hh:mm` with a 12-hour clock.
pub const CREATED_AT_FORMAT: &str = "%Y/%m/%d %I:%M";

/// Formats epoch milliseconds in the local time zone.
pub fn format_created_at(epoch_ms: i64) -> String {
    format_created_at_in(epoch_ms, &Local)
}

/// Formats epoch milliseconds in `tz`.
///
/// Timestamps outside chrono's range fall back to the raw millisecond value.
pub fn format_created_at_in<Tz>(epoch_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match Utc.timestamp_millis_opt(epoch_ms).single() {
        Some(utc) => utc
            .with_timezone(tz)
            .format(CREATED_AT_FORMAT)
            .to_string(),
        None => epoch_ms.to_string(),
    }
}

/// One display row, reused across scroll positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoRow {
    bound: Option<Memo>,
    id_text: String,
    content_text: String,
    datetime_text: String,
}

impl MemoRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `memo` to this row, replacing any previous binding.
    pub fn bind(&mut self, memo: &Memo) {
        self.id_text = memo.id.to_string();
        self.content_text = memo.content.clone();
        self.datetime_text = format_created_at(memo.created_at);
        self.bound = Some(memo.clone());
    }

    /// Clears the row. A cleared row has nothing to delete.
    pub fn unbind(&mut self) {
        *self = Self::default();
    }

    pub fn bound_memo(&self) -> Option<&Memo> {
        self.bound.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn id_text(&self) -> &str {
        &self.id_text
    }

    pub fn content_text(&self) -> &str {
        &self.content_text
    }

    pub fn datetime_text(&self) -> &str {
        &self.datetime_text
    }
}
