use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use crate::{
    foundation::config::CueConfig,
    proxy::{CueProxy, ProxyId, animation::AnimationCue, comparative::ComparativeCueProxy},
    undo::stack::SharedUndoStack,
};

/// Resolves stable proxy ids to live instances during undo/redo.
pub trait ProxyLocator {
    /// The live proxy registered under `id`.
    fn find(&self, id: ProxyId) -> Option<CueProxy>;
    /// Recreate a destroyed comparative proxy under `id`.
    fn recreate(&mut self, id: ProxyId) -> Option<CueProxy>;
}

/// Owns cue proxies by id and hands out shared handles.
pub struct CueRegistry {
    next_id: u32,
    proxies: BTreeMap<ProxyId, CueProxy>,
    undo_stack: Option<SharedUndoStack>,
    config: CueConfig,
}

impl CueRegistry {
    /// Empty registry; new comparative proxies record into `undo_stack`.
    pub fn new(config: CueConfig, undo_stack: Option<SharedUndoStack>) -> Self {
        Self {
            next_id: 1,
            proxies: BTreeMap::new(),
            undo_stack,
            config,
        }
    }

    /// Create and register an empty comparative cue proxy.
    pub fn create_comparative(&mut self) -> Rc<RefCell<ComparativeCueProxy>> {
        let id = self.allocate_id();
        self.insert_comparative(id)
    }

    /// Create and register a plain animation cue.
    pub fn create_animation(&mut self) -> Rc<RefCell<AnimationCue>> {
        let id = self.allocate_id();
        let cue = Rc::new(RefCell::new(AnimationCue::new(id)));
        self.proxies.insert(id, CueProxy::Animation(Rc::clone(&cue)));
        cue
    }

    /// Handle registered under `id`.
    pub fn get(&self, id: ProxyId) -> Option<CueProxy> {
        self.proxies.get(&id).cloned()
    }

    /// Comparative proxy registered under `id`.
    pub fn comparative(&self, id: ProxyId) -> Option<Rc<RefCell<ComparativeCueProxy>>> {
        match self.proxies.get(&id)? {
            CueProxy::Comparative(proxy) => Some(Rc::clone(proxy)),
            CueProxy::Animation(_) => None,
        }
    }

    /// Remove (and, once outside handles drop, destroy) the proxy under `id`.
    pub fn unregister(&mut self, id: ProxyId) -> Option<CueProxy> {
        self.proxies.remove(&id)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ProxyId> + '_ {
        self.proxies.keys().copied()
    }

    /// Number of registered proxies.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Whether no proxy is registered.
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    fn allocate_id(&mut self) -> ProxyId {
        let id = ProxyId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert_comparative(&mut self, id: ProxyId) -> Rc<RefCell<ComparativeCueProxy>> {
        let mut proxy = ComparativeCueProxy::new(id, &self.config);
        proxy.set_undo_stack(self.undo_stack.clone());
        let proxy = Rc::new(RefCell::new(proxy));
        self.proxies
            .insert(id, CueProxy::Comparative(Rc::clone(&proxy)));
        proxy
    }
}

impl ProxyLocator for CueRegistry {
    fn find(&self, id: ProxyId) -> Option<CueProxy> {
        self.get(id)
    }

    fn recreate(&mut self, id: ProxyId) -> Option<CueProxy> {
        if let Some(existing) = self.get(id) {
            return Some(existing);
        }
        tracing::debug!(proxy = %id, "recreating comparative cue proxy");
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        Some(CueProxy::Comparative(self.insert_comparative(id)))
    }
}

impl fmt::Debug for CueRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CueRegistry")
            .field("next_id", &self.next_id)
            .field("proxies", &self.proxies.keys().collect::<Vec<_>>())
            .field("has_undo_stack", &self.undo_stack.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/undo/locator.rs"]
mod tests;
