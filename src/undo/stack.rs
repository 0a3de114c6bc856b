use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{
    foundation::config::CueConfig,
    undo::{element::ComparativeCueUndoElement, locator::ProxyLocator},
};

/// Receives undo elements produced by cue proxies.
pub trait UndoStack {
    /// Offer one element. Returns `false` when the stack does not accept it.
    fn submit(&mut self, element: ComparativeCueUndoElement) -> bool;
    /// Close the currently open set, making it undoable.
    fn commit(&mut self);
}

/// Shared handle type for undo stacks.
pub type SharedUndoStack = Rc<RefCell<dyn UndoStack>>;

#[derive(Clone, Debug, PartialEq)]
/// Elements undone and redone together.
pub struct UndoSet {
    /// Human-readable label, e.g. "Update X Range".
    pub label: String,
    /// Elements in submission order.
    pub elements: Vec<ComparativeCueUndoElement>,
}

#[derive(Debug)]
/// Bounded undo/redo history of [`UndoSet`]s.
pub struct UndoHistory {
    undo: VecDeque<UndoSet>,
    redo: Vec<UndoSet>,
    open: Option<UndoSet>,
    limit: usize,
    ignore_changes: bool,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(&CueConfig::default())
    }
}

impl UndoHistory {
    /// Empty history keeping at most `config.history_limit` sets.
    pub fn new(config: &CueConfig) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            open: None,
            limit: config.history_limit.max(1),
            ignore_changes: false,
        }
    }

    /// Open a set; elements submitted until [`UndoStack::commit`] join it.
    ///
    /// An already open set is committed first.
    pub fn begin_set(&mut self, label: impl Into<String>) {
        self.commit();
        self.open = Some(UndoSet {
            label: label.into(),
            elements: Vec::new(),
        });
    }

    /// Refuse submissions while `ignore` is set.
    pub fn set_ignore_changes(&mut self, ignore: bool) {
        self.ignore_changes = ignore;
    }

    /// Whether submissions are currently refused.
    pub fn ignores_changes(&self) -> bool {
        self.ignore_changes
    }

    /// Whether an undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undoable sets.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable sets.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// The set [`UndoHistory::undo`] would replay.
    pub fn peek_undo(&self) -> Option<&UndoSet> {
        self.undo.back()
    }

    /// Label of the set [`UndoHistory::undo`] would replay.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().map(|s| s.label.as_str())
    }

    /// Label of the set [`UndoHistory::redo`] would replay.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|s| s.label.as_str())
    }

    /// Undo the most recent set. Returns `false` when there is none.
    pub fn undo(&mut self, locator: &mut dyn ProxyLocator) -> bool {
        self.commit();
        let Some(set) = self.undo.pop_back() else {
            return false;
        };
        tracing::debug!(label = %set.label, elements = set.elements.len(), "undo");
        let ignore = std::mem::replace(&mut self.ignore_changes, true);
        for element in set.elements.iter().rev() {
            element.undo(locator);
        }
        self.ignore_changes = ignore;
        self.redo.push(set);
        true
    }

    /// Redo the most recently undone set. Returns `false` when there is none.
    pub fn redo(&mut self, locator: &mut dyn ProxyLocator) -> bool {
        self.commit();
        let Some(set) = self.redo.pop() else {
            return false;
        };
        tracing::debug!(label = %set.label, elements = set.elements.len(), "redo");
        let ignore = std::mem::replace(&mut self.ignore_changes, true);
        for element in &set.elements {
            element.redo(locator);
        }
        self.ignore_changes = ignore;
        self.undo.push_back(set);
        true
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.open = None;
    }

    fn push_set(&mut self, set: UndoSet) {
        if set.elements.is_empty() {
            return;
        }
        self.undo.push_back(set);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        self.redo.clear();
    }
}

impl UndoStack for UndoHistory {
    fn submit(&mut self, element: ComparativeCueUndoElement) -> bool {
        if self.ignore_changes {
            return false;
        }
        if let Some(set) = self.open.as_mut() {
            set.elements.push(element);
        } else {
            self.push_set(UndoSet {
                label: "Comparative Cue Change".to_owned(),
                elements: vec![element],
            });
        }
        true
    }

    fn commit(&mut self) {
        if let Some(set) = self.open.take() {
            self.push_set(set);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/undo/stack.rs"]
mod tests;
