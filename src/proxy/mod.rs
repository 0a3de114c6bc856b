//! Cue proxies: the objects registered with a [`crate::CueRegistry`] and
//! targeted by undo elements.

use std::{cell::RefCell, fmt, rc::Rc};

/// Time-driven plain animation cue.
pub mod animation;
/// Undoable wrapper around the comparative cue.
pub mod comparative;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
/// Stable identifier of a registered proxy.
pub struct ProxyId(pub u32);

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug)]
/// Closed set of cue proxy kinds.
pub enum CueProxy {
    /// Plain time-driven cue.
    Animation(Rc<RefCell<animation::AnimationCue>>),
    /// Comparative grid cue with undo recording.
    Comparative(Rc<RefCell<comparative::ComparativeCueProxy>>),
}

impl CueProxy {
    /// Identifier of the wrapped proxy.
    pub fn id(&self) -> ProxyId {
        match self {
            Self::Animation(cue) => cue.borrow().id(),
            Self::Comparative(proxy) => proxy.borrow().id(),
        }
    }
}
