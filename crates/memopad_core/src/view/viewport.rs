//! Fixed pool of recycled rows over a `MemoListModel`.
//!
//! # Invariants
//! - The pool size never changes after construction.
//! - Slot `i` shows model position `first + i`, or is unbound past the end.

use crate::clock::Clock;
use crate::store::memo_store::MemoStore;
use crate::view::list_model::{ListDisplay, MemoListModel};
use crate::view::row::MemoRow;
use std::cell::Cell;
use std::rc::Rc;

/// Shared "needs redraw" flag handed to the model as its display.
#[derive(Debug, Clone, Default)]
pub struct InvalidationFlag(Rc<Cell<bool>>);

impl InvalidationFlag {
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    fn take(&self) -> bool {
        self.0.replace(false)
    }
}

impl ListDisplay for InvalidationFlag {
    fn data_set_changed(&mut self) {
        self.0.set(true);
    }
}

#[derive(Debug)]
pub struct Viewport {
    rows: Vec<MemoRow>,
    first: usize,
    invalidated: InvalidationFlag,
}

impl Viewport {
    /// Creates a viewport with `capacity` recycled rows (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            rows: vec![MemoRow::new(); capacity.max(1)],
            first: 0,
            invalidated: InvalidationFlag::default(),
        }
    }

    /// Returns a display handle to attach to the model.
    pub fn display(&self) -> Box<dyn ListDisplay> {
        Box::new(self.invalidated.clone())
    }

    pub fn needs_redraw(&self) -> bool {
        self.invalidated.is_set()
    }

    pub fn capacity(&self) -> usize {
        self.rows.len()
    }

    pub fn first_position(&self) -> usize {
        self.first
    }

    pub fn rows(&self) -> &[MemoRow] {
        &self.rows
    }

    pub fn row(&self, slot: usize) -> Option<&MemoRow> {
        self.rows.get(slot)
    }

    /// Finds the slot currently showing model `position`.
    pub fn slot_for_position(&self, position: usize) -> Option<usize> {
        let slot = position.checked_sub(self.first)?;
        (slot < self.rows.len() && self.rows[slot].is_bound()).then_some(slot)
    }

    /// Moves the window so it starts at `first` and rebinds every row.
    pub fn scroll_to<S: MemoStore, C: Clock>(
        &mut self,
        model: &MemoListModel<S, C>,
        first: usize,
    ) {
        self.first = first.min(model.item_count().saturating_sub(self.rows.len()));
        self.redraw(model);
    }

    /// Rebinds every row to the current model contents.
    pub fn redraw<S: MemoStore, C: Clock>(&mut self, model: &MemoListModel<S, C>) {
        self.invalidated.take();
        self.first = self
            .first
            .min(model.item_count().saturating_sub(self.rows.len()));
        for (slot, row) in self.rows.iter_mut().enumerate() {
            match model.memo_at(self.first + slot) {
                Some(memo) => row.bind(memo),
                None => row.unbind(),
            }
        }
    }
}
