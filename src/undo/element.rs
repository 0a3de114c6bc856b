use std::{cell::RefCell, rc::Rc};

use crate::{
    cue::events::CueEvent,
    foundation::{
        error::{CueError, CueResult},
        xml::XmlElement,
    },
    proxy::{CueProxy, ProxyId, comparative::ComparativeCueProxy},
    undo::locator::ProxyLocator,
};

/// Tag name of a serialized [`ComparativeCueUndoElement`].
pub const UNDO_ELEMENT_TAG: &str = "ComparativeAnimationCueUndoElement";

#[derive(Clone, Debug, PartialEq)]
/// One recorded mutation of a comparative cue: full state before and after.
pub struct ComparativeCueUndoElement {
    proxy_id: ProxyId,
    before: Option<XmlElement>,
    after: Option<XmlElement>,
}

impl ComparativeCueUndoElement {
    /// Record a transition of proxy `proxy_id` from `before` to `after`.
    pub fn new(proxy_id: ProxyId, before: Option<XmlElement>, after: Option<XmlElement>) -> Self {
        Self {
            proxy_id,
            before,
            after,
        }
    }

    /// Target proxy.
    pub fn proxy_id(&self) -> ProxyId {
        self.proxy_id
    }

    /// State restored by [`ComparativeCueUndoElement::undo`].
    pub fn before(&self) -> Option<&XmlElement> {
        self.before.as_ref()
    }

    /// State restored by [`ComparativeCueUndoElement::redo`].
    pub fn after(&self) -> Option<&XmlElement> {
        self.after.as_ref()
    }

    /// Restore the "before" state on the live proxy.
    ///
    /// Always returns `true`: an unresolvable target is a logged no-op so that
    /// replaying a history never stops halfway.
    pub fn undo(&self, locator: &mut dyn ProxyLocator) -> bool {
        let Some(before) = &self.before else {
            return true;
        };
        match locator.find(self.proxy_id) {
            Some(CueProxy::Comparative(proxy)) => self.restore(&proxy, before, true, "undo"),
            Some(CueProxy::Animation(_)) => {
                tracing::warn!(proxy = %self.proxy_id, "undo target is not a comparative cue");
            }
            None => tracing::warn!(proxy = %self.proxy_id, "undo target no longer exists"),
        }
        true
    }

    /// Re-apply the "after" state, recreating the proxy if it was destroyed.
    ///
    /// Always returns `true`; see [`ComparativeCueUndoElement::undo`].
    pub fn redo(&self, locator: &mut dyn ProxyLocator) -> bool {
        let Some(after) = &self.after else {
            return true;
        };
        let (proxy, recreated) = match locator.find(self.proxy_id) {
            Some(found) => (Some(found), false),
            None => (locator.recreate(self.proxy_id), true),
        };
        match proxy {
            Some(CueProxy::Comparative(proxy)) => self.restore(&proxy, after, !recreated, "redo"),
            Some(CueProxy::Animation(_)) => {
                tracing::warn!(proxy = %self.proxy_id, "redo target is not a comparative cue");
            }
            None => tracing::warn!(proxy = %self.proxy_id, "redo target cannot be recreated"),
        }
        true
    }

    // The proxy borrow ends before listeners run, so they can read the proxy.
    fn restore(
        &self,
        proxy: &Rc<RefCell<ComparativeCueProxy>>,
        state: &XmlElement,
        notify: bool,
        action: &'static str,
    ) {
        let loaded = proxy.borrow_mut().load_state(state);
        match loaded {
            Ok(()) if notify => {
                let listeners = proxy.borrow().listeners();
                listeners.emit(&CueEvent::PropertyChanged);
            }
            Ok(()) => {}
            Err(e) => {
                tracing::warn!(proxy = %self.proxy_id, error = %e, action, "state not restored");
            }
        }
    }

    /// Serialize the element with both snapshots.
    pub fn to_xml(&self) -> XmlElement {
        let mut root = XmlElement::new(UNDO_ELEMENT_TAG);
        root.set_attribute("id", self.proxy_id.0.to_string());
        for (tag, state) in [("Before", &self.before), ("After", &self.after)] {
            if let Some(state) = state {
                root.add_child(XmlElement::new(tag)).add_child(state.clone());
            }
        }
        root
    }

    /// Parse an element produced by [`ComparativeCueUndoElement::to_xml`].
    pub fn from_xml(el: &XmlElement) -> CueResult<Self> {
        if el.name() != UNDO_ELEMENT_TAG {
            return Err(CueError::xml(format!(
                "expected <{UNDO_ELEMENT_TAG}>, found <{}>",
                el.name()
            )));
        }
        let id: u32 = el.required_attribute("id")?;
        let snapshot = |tag: &str| -> CueResult<Option<XmlElement>> {
            let Some(wrapper) = el.child(tag) else {
                return Ok(None);
            };
            match wrapper.children() {
                [state] => Ok(Some(state.clone())),
                other => Err(CueError::xml(format!(
                    "<{tag}> must hold exactly one state element, found {}",
                    other.len()
                ))),
            }
        };
        Ok(Self {
            proxy_id: ProxyId(id),
            before: snapshot("Before")?,
            after: snapshot("After")?,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/undo/element.rs"]
mod tests;
