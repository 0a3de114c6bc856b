use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    cue::{command::CueCommand, queue::RemovedCommand},
    foundation::xml::XmlElement,
};

/// Tag name of a serialized [`StateChange`].
pub const STATE_CHANGE_TAG: &str = "StateChange";

#[derive(Clone, Debug, PartialEq)]
/// Diff produced by one Update* call: what was evicted and what was appended.
pub struct StateChange {
    /// Commands evicted from the queue, with their prior positions.
    pub removed: Vec<RemovedCommand>,
    /// The command appended by the update.
    pub added: CueCommand,
}

impl StateChange {
    /// Serialize as a `StateChange` diff element.
    ///
    /// Removals come first (flagged `remove="1"`), then the added command, so
    /// replaying children in document order reproduces the mutation.
    pub fn to_xml(&self) -> XmlElement {
        let mut root = XmlElement::new(STATE_CHANGE_TAG);
        for r in &self.removed {
            let mut el = r.command.to_xml();
            el.set_attribute("remove", "1")
                .set_attribute("position", r.position.to_string());
            root.add_child(el);
        }
        root.add_child(self.added.to_xml());
        root
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Notifications emitted by a comparative cue.
pub enum CueEvent {
    /// Generic "something changed" signal, emitted after every mutation.
    Modified,
    /// State was reloaded (undo/redo); dependent UI should refresh.
    PropertyChanged,
    /// The command queue was mutated by an Update* call.
    StateChanged(StateChange),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Handle returned by [`Listeners::add`].
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&CueEvent)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(ListenerId, Callback)>,
    // Ids of callbacks taken out by a running `emit`.
    in_flight: Vec<ListenerId>,
    removed: Vec<ListenerId>,
}

#[derive(Clone, Default)]
/// Synchronous listener registry; callbacks run in registration order.
///
/// Clones share one registry. Callbacks run without the registry borrowed,
/// so a callback may add or remove listeners, or trigger further events,
/// while it is being notified.
pub struct Listeners {
    inner: Rc<RefCell<Registry>>,
}

impl Listeners {
    /// Register a callback.
    pub fn add(&self, callback: impl FnMut(&CueEvent) + 'static) -> ListenerId {
        let mut reg = self.inner.borrow_mut();
        let id = ListenerId(reg.next_id);
        reg.next_id += 1;
        reg.entries.push((id, Box::new(callback)));
        id
    }

    /// Unregister a callback. Returns `false` for unknown ids.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut reg = self.inner.borrow_mut();
        let before = reg.entries.len();
        reg.entries.retain(|(entry, _)| *entry != id);
        if reg.entries.len() != before {
            return true;
        }
        if reg.in_flight.contains(&id) && !reg.removed.contains(&id) {
            reg.removed.push(id);
            return true;
        }
        false
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        let reg = self.inner.borrow();
        reg.entries.len() + reg.in_flight.len() - reg.removed.len()
    }

    /// Whether no callback is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every callback.
    pub fn emit(&self, event: &CueEvent) {
        let (mut taken, mark) = {
            let mut reg = self.inner.borrow_mut();
            let taken = std::mem::take(&mut reg.entries);
            let mark = reg.in_flight.len();
            reg.in_flight.extend(taken.iter().map(|(id, _)| *id));
            (taken, mark)
        };
        for (id, callback) in &mut taken {
            if self.inner.borrow().removed.contains(id) {
                continue;
            }
            callback(event);
        }
        let mut reg = self.inner.borrow_mut();
        reg.in_flight.truncate(mark);
        let Registry {
            entries,
            in_flight,
            removed,
            ..
        } = &mut *reg;
        taken.retain(|(id, _)| !removed.contains(id));
        removed.retain(|id| in_flight.contains(id));
        taken.append(entries);
        *entries = taken;
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cue/events.rs"]
mod tests;
