//! cuegrid resolves comparative animation cues: one animated parameter varied
//! across a `dx`×`dy` grid of visualization frames.
//!
//! # Overview
//!
//! 1. **Edit**: Update* calls append range commands to an ordered queue
//!    ([`ComparativeAnimationCue`]). Each call evicts the commands it
//!    supersedes and emits a [`CueEvent::StateChanged`] diff.
//! 2. **Resolve**: [`ComparativeAnimationCue::values`] walks the queue; the
//!    last command whose scope covers a cell decides its value.
//! 3. **Push**: [`ComparativeAnimationCue::update_animated_value`] applies the
//!    resolved value through an [`AnimatedProxy`] / [`AnimatedProperty`] /
//!    [`PropertyDomain`] triple.
//! 4. **Undo**: [`ComparativeCueProxy`] turns every diff into a
//!    [`ComparativeCueUndoElement`] holding full XML snapshots, submitted to an
//!    [`UndoStack`] such as [`UndoHistory`] and replayed through a
//!    [`ProxyLocator`] such as [`CueRegistry`].
//!
//! Everything is single-threaded and synchronous; shared handles are
//! `Rc<RefCell<_>>`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cue;
mod foundation;
mod property;
mod proxy;
mod undo;

pub use cue::command::{CUE_COMMAND_TAG, CommandKind, CueCommand};
pub use cue::comparative::{CUE_STATE_TAG, CommandInfo, ComparativeAnimationCue};
pub use cue::events::{CueEvent, ListenerId, Listeners, STATE_CHANGE_TAG, StateChange};
pub use cue::queue::{CommandQueue, RemovedCommand};
pub use foundation::config::CueConfig;
pub use foundation::error::{CueError, CueResult};
pub use foundation::xml::{XmlElement, format_f64, format_f64_list, parse_f64_list};
pub use property::memory::{BooleanDomain, PropertyProxy, RangeDomain, VectorProperty};
pub use property::target::{
    AnimatedProperty, AnimatedProxy, AnimatedTarget, PropertyDomain, SharedProxy,
};
pub use proxy::animation::AnimationCue;
pub use proxy::comparative::ComparativeCueProxy;
pub use proxy::{CueProxy, ProxyId};
pub use undo::element::{ComparativeCueUndoElement, UNDO_ELEMENT_TAG};
pub use undo::locator::{CueRegistry, ProxyLocator};
pub use undo::stack::{SharedUndoStack, UndoHistory, UndoSet, UndoStack};
