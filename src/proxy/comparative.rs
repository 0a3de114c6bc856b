use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use crate::{
    cue::{
        comparative::{CommandInfo, ComparativeAnimationCue},
        events::{CueEvent, Listeners, StateChange},
    },
    foundation::{config::CueConfig, error::CueResult, xml::XmlElement},
    proxy::ProxyId,
    undo::{element::ComparativeCueUndoElement, stack::SharedUndoStack},
};

#[derive(Debug)]
enum Recorded {
    Changed(StateChange),
    Modified,
}

/// Undoable wrapper around a [`ComparativeAnimationCue`].
///
/// Every state change of the wrapped cue becomes one
/// [`ComparativeCueUndoElement`] carrying the full state before and after the
/// change, submitted to the attached undo stack.
pub struct ComparativeCueProxy {
    id: ProxyId,
    cue: ComparativeAnimationCue,
    pending: Rc<RefCell<VecDeque<Recorded>>>,
    last_known_state: Option<XmlElement>,
    undo_stack: Option<SharedUndoStack>,
}

impl ComparativeCueProxy {
    /// Wrap an empty cue.
    pub fn new(id: ProxyId, config: &CueConfig) -> Self {
        Self::with_cue(id, ComparativeAnimationCue::with_config(config))
    }

    /// Wrap an existing cue; its current queue becomes the first "before" state.
    pub fn with_cue(id: ProxyId, mut cue: ComparativeAnimationCue) -> Self {
        let pending = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&pending);
        cue.add_listener(move |event| match event {
            CueEvent::StateChanged(change) => {
                sink.borrow_mut().push_back(Recorded::Changed(change.clone()));
            }
            CueEvent::Modified => sink.borrow_mut().push_back(Recorded::Modified),
            CueEvent::PropertyChanged => {}
        });
        let last_known_state = Some(cue.state_snapshot());
        Self {
            id,
            cue,
            pending,
            last_known_state,
            undo_stack: None,
        }
    }

    /// Stable identifier used by undo elements.
    pub fn id(&self) -> ProxyId {
        self.id
    }

    /// Attach the undo stack that receives undo elements.
    pub fn set_undo_stack(&mut self, stack: Option<SharedUndoStack>) {
        self.undo_stack = stack;
    }

    /// The wrapped cue (read-only).
    pub fn cue(&self) -> &ComparativeAnimationCue {
        &self.cue
    }

    /// Snapshot used as "before" for the next undo element.
    pub fn last_known_state(&self) -> Option<&XmlElement> {
        self.last_known_state.as_ref()
    }

    /// Run `f` against the cue and record every state change it made.
    ///
    /// If `f` reloads the queue (`load_command_info`), nothing is recorded for
    /// the call and the reloaded queue becomes the next "before" state.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut ComparativeAnimationCue) -> R) -> R {
        let out = f(&mut self.cue);
        self.record_pending();
        out
    }

    /// See [`ComparativeAnimationCue::update_x_range`].
    pub fn update_x_range(&mut self, y: i32, min: f64, max: f64) {
        self.edit(|cue| cue.update_x_range(y, min, max));
    }

    /// See [`ComparativeAnimationCue::update_x_range_values`].
    pub fn update_x_range_values(&mut self, y: i32, min: &[f64], max: &[f64]) {
        self.edit(|cue| cue.update_x_range_values(y, min, max));
    }

    /// See [`ComparativeAnimationCue::update_y_range`].
    pub fn update_y_range(&mut self, x: i32, min: f64, max: f64) {
        self.edit(|cue| cue.update_y_range(x, min, max));
    }

    /// See [`ComparativeAnimationCue::update_y_range_values`].
    pub fn update_y_range_values(&mut self, x: i32, min: &[f64], max: &[f64]) {
        self.edit(|cue| cue.update_y_range_values(x, min, max));
    }

    /// See [`ComparativeAnimationCue::update_whole_range`].
    pub fn update_whole_range(&mut self, min: f64, max: f64) {
        self.edit(|cue| cue.update_whole_range(min, max));
    }

    /// See [`ComparativeAnimationCue::update_whole_range_values`].
    pub fn update_whole_range_values(&mut self, min: &[f64], max: &[f64], vertical_first: bool) {
        self.edit(|cue| cue.update_whole_range_values(min, max, vertical_first));
    }

    /// See [`ComparativeAnimationCue::update_value`].
    pub fn update_value(&mut self, x: i32, y: i32, value: f64) {
        self.edit(|cue| cue.update_value(x, y, value));
    }

    /// See [`ComparativeAnimationCue::update_value_values`].
    pub fn update_value_values(&mut self, x: i32, y: i32, values: &[f64]) {
        self.edit(|cue| cue.update_value_values(x, y, values));
    }

    /// See [`ComparativeAnimationCue::value`].
    pub fn value(&mut self, x: i32, y: i32, dx: i32, dy: i32) -> Option<f64> {
        self.cue.value(x, y, dx, dy)
    }

    /// See [`ComparativeAnimationCue::values`].
    pub fn values(&mut self, x: i32, y: i32, dx: i32, dy: i32) -> &[f64] {
        self.cue.values(x, y, dx, dy)
    }

    /// See [`ComparativeAnimationCue::update_animated_value`].
    pub fn update_animated_value(&mut self, x: i32, y: i32, dx: i32, dy: i32) -> CueResult<()> {
        self.cue.update_animated_value(x, y, dx, dy)
    }

    /// Replace the cue's queue with a full-state snapshot without recording
    /// an undo element. The snapshot becomes the new "before" state.
    pub fn load_state(&mut self, state: &XmlElement) -> CueResult<()> {
        self.cue.load_command_info(CommandInfo::FullState(state))?;
        self.pending.borrow_mut().clear();
        self.last_known_state = Some(state.clone());
        Ok(())
    }

    /// Shared handle to the wrapped cue's listeners; see
    /// [`ComparativeAnimationCue::listeners`].
    pub fn listeners(&self) -> Listeners {
        self.cue.listeners()
    }

    /// Tell listeners of the wrapped cue that its state was reloaded.
    pub fn notify_property_changed(&mut self) {
        self.cue.notify_property_changed();
    }

    fn record_pending(&mut self) {
        let recorded: Vec<Recorded> = self.pending.borrow_mut().drain(..).collect();
        let mut changes = Vec::new();
        let mut untracked = false;
        let mut after_change = false;
        for entry in recorded {
            match entry {
                Recorded::Changed(change) => {
                    changes.push(change);
                    after_change = true;
                }
                // Every Update* emits `Modified` right after its diff; a bare
                // `Modified` means the queue changed without one (a load).
                Recorded::Modified if after_change => after_change = false,
                Recorded::Modified => untracked = true,
            }
        }
        if untracked {
            tracing::debug!(
                proxy = %self.id,
                skipped = changes.len(),
                "cue reloaded outside the undo history; resyncing cached state"
            );
            self.last_known_state = Some(self.cue.state_snapshot());
            return;
        }

        let count = changes.len();
        let mut base = self.last_known_state.clone();
        for (i, change) in changes.iter().enumerate() {
            // Earlier changes of a batch are reconstructed from the diff; the
            // last one is the live queue.
            let after = if i + 1 == count {
                self.cue.state_snapshot()
            } else {
                replay(base.as_ref(), change)
            };
            base = Some(after.clone());
            self.submit(after);
        }
    }

    fn submit(&mut self, after: XmlElement) {
        let Some(stack) = &self.undo_stack else {
            self.last_known_state = Some(after);
            return;
        };
        let before = self.last_known_state.clone();
        let element = ComparativeCueUndoElement::new(self.id, before, Some(after.clone()));
        if stack.borrow_mut().submit(element) {
            self.last_known_state = Some(after);
        } else {
            tracing::debug!(
                proxy = %self.id,
                "undo stack refused element; keeping previous state"
            );
        }
    }
}

fn replay(before: Option<&XmlElement>, change: &StateChange) -> XmlElement {
    let mut scratch = ComparativeAnimationCue::new();
    if let Some(before) = before
        && let Err(e) = scratch.load_command_info(CommandInfo::FullState(before))
    {
        tracing::warn!(error = %e, "cached cue state could not be replayed");
    }
    let diff = change.to_xml();
    if let Err(e) = scratch.load_command_info(CommandInfo::Diff(&diff)) {
        tracing::warn!(error = %e, "state change could not be replayed");
    }
    scratch.state_snapshot()
}

impl fmt::Debug for ComparativeCueProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparativeCueProxy")
            .field("id", &self.id)
            .field("cue", &self.cue)
            .field("has_undo_stack", &self.undo_stack.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/proxy/comparative.rs"]
mod tests;
