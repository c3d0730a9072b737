//! In-memory list mirror of the memo store.
//!
//! # Responsibility
//! - Hold the ordered memo collection backing the display.
//! - Route submit/delete user actions to the store.
//!
//! # Invariants
//! - After create the mirror is cleared and fully re-read, never appended to.
//! - Every successful mutation signals the display that all rows changed.
//! - Empty input never reaches the store.

use crate::clock::{Clock, SystemClock};
use crate::model::memo::{Memo, MemoId, NewMemo};
use crate::store::memo_store::{MemoStore, StoreError};
use crate::view::row::MemoRow;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ViewResult<T> = Result<T, ViewError>;

#[derive(Debug)]
pub enum ViewError {
    Store(StoreError),
    /// Delete was requested on a row with no memo bound.
    UnboundRow,
}

impl Display for ViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::UnboundRow => write!(f, "delete requested on a row with no memo bound"),
        }
    }
}

impl Error for ViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::UnboundRow => None,
        }
    }
}

impl From<StoreError> for ViewError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Receives "data changed, redraw everything" signals.
pub trait ListDisplay {
    fn data_set_changed(&mut self);
}

/// Text entry the model reads on submit and clears after a create.
pub trait TextInput {
    fn text(&self) -> String;
    fn clear(&mut self);
}

impl TextInput for String {
    fn text(&self) -> String {
        self.clone()
    }

    fn clear(&mut self) {
        String::clear(self);
    }
}

/// Result of a submit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty; nothing was stored.
    Ignored,
    /// A memo was stored and the mirror reloaded.
    Created,
}

/// Ordered mirror of the store driving a recycled-row display.
pub struct MemoListModel<S: MemoStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    items: Vec<Memo>,
    displays: Vec<Box<dyn ListDisplay>>,
}

impl<S: MemoStore> MemoListModel<S> {
    /// Builds the model and loads the current store contents.
    pub fn load(store: S) -> ViewResult<Self> {
        Self::load_with_clock(store, SystemClock)
    }
}

impl<S: MemoStore, C: Clock> MemoListModel<S, C> {
    pub fn load_with_clock(store: S, clock: C) -> ViewResult<Self> {
        let items = store.read_all()?;
        info!(
            "event=list_load module=view status=ok count={}",
            items.len()
        );
        Ok(Self {
            store,
            clock,
            items,
            displays: Vec::new(),
        })
    }

    /// Registers a display to receive change signals.
    pub fn attach_display(&mut self, display: Box<dyn ListDisplay>) {
        self.displays.push(display);
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn memo_at(&self, position: usize) -> Option<&Memo> {
        self.items.get(position)
    }

    pub fn items(&self) -> &[Memo] {
        &self.items
    }

    /// Discards the mirror, re-reads the store and signals the display.
    pub fn refresh(&mut self) -> ViewResult<()> {
        self.reload()?;
        self.notify_changed();
        Ok(())
    }

    /// Stores `text` as a new memo stamped with the current time.
    ///
    /// Empty text is ignored without touching the store.
    pub fn submit(&mut self, text: &str) -> ViewResult<SubmitOutcome> {
        if text.is_empty() {
            debug!("event=memo_submit module=view status=ignored reason=empty_input");
            return Ok(SubmitOutcome::Ignored);
        }

        let draft = NewMemo::new(text, self.clock.now_millis());
        self.store.create(&draft)?;
        self.refresh()?;
        info!(
            "event=memo_submit module=view status=ok count={}",
            self.items.len()
        );
        Ok(SubmitOutcome::Created)
    }

    /// Submits the current input text and clears the input on create.
    pub fn submit_from(&mut self, input: &mut dyn TextInput) -> ViewResult<SubmitOutcome> {
        let outcome = self.submit(&input.text())?;
        if outcome == SubmitOutcome::Created {
            input.clear();
        }
        Ok(outcome)
    }

    /// Deletes `memo` from the store, then drops it from the mirror.
    pub fn delete(&mut self, memo: &Memo) -> ViewResult<()> {
        self.store.delete(memo)?;
        if let Some(position) = self.items.iter().position(|item| item == memo) {
            self.items.remove(position);
        }
        info!(
            "event=memo_delete module=view status=ok id={} count={}",
            memo.id,
            self.items.len()
        );
        self.notify_changed();
        Ok(())
    }

    /// Deletes whatever memo `row` is bound to right now.
    pub fn delete_row(&mut self, row: &MemoRow) -> ViewResult<MemoId> {
        let memo = row.bound_memo().cloned().ok_or(ViewError::UnboundRow)?;
        self.delete(&memo)?;
        Ok(memo.id)
    }

    fn reload(&mut self) -> ViewResult<()> {
        let fresh = self.store.read_all()?;
        self.items.clear();
        self.items.extend(fresh);
        Ok(())
    }

    fn notify_changed(&mut self) {
        for display in &mut self.displays {
            display.data_set_changed();
        }
    }
}
