use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    cue::{comparative::ComparativeAnimationCue, events::CueEvent},
    foundation::config::CueConfig,
    undo::locator::CueRegistry,
};

fn state(build: impl FnOnce(&mut ComparativeAnimationCue)) -> XmlElement {
    let mut cue = ComparativeAnimationCue::new();
    build(&mut cue);
    cue.state_snapshot()
}

#[test]
fn undo_loads_before_state_and_notifies() {
    let mut registry = CueRegistry::new(CueConfig::default(), None);
    let proxy = registry.create_comparative();
    let id = proxy.borrow().id();
    proxy.borrow_mut().update_whole_range(1.0, 9.0);

    let notified = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&notified);
    proxy.borrow_mut().edit(|cue| {
        cue.add_listener(move |e| {
            if matches!(e, CueEvent::PropertyChanged) {
                *sink.borrow_mut() += 1;
            }
        })
    });

    let before = state(|cue| cue.update_value(0, 0, 60.0));
    let element = ComparativeCueUndoElement::new(id, Some(before.clone()), None);
    assert!(element.undo(&mut registry));
    assert_eq!(proxy.borrow_mut().value(0, 0, 3, 3), Some(60.0));
    assert_eq!(proxy.borrow().last_known_state(), Some(&before));
    assert_eq!(*notified.borrow(), 1);
}

#[test]
fn redo_notifies_after_releasing_the_proxy() {
    let mut registry = CueRegistry::new(CueConfig::default(), None);
    let proxy = registry.create_comparative();
    let id = proxy.borrow().id();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let handle = Rc::downgrade(&proxy);
    let sink = Rc::clone(&seen);
    let listeners = proxy.borrow().listeners();
    listeners.add(move |e| {
        if let (CueEvent::PropertyChanged, Some(proxy)) = (e, handle.upgrade()) {
            let readable = proxy.try_borrow().is_ok();
            sink.borrow_mut().push((readable, proxy.borrow_mut().value(2, 2, 3, 3)));
        }
    });

    let after = state(|cue| cue.update_whole_range(1.0, 9.0));
    let element = ComparativeCueUndoElement::new(id, None, Some(after));
    assert!(element.redo(&mut registry));
    assert_eq!(*seen.borrow(), vec![(true, Some(9.0))]);
}

#[test]
fn undo_of_missing_target_is_a_successful_no_op() {
    let mut registry = CueRegistry::new(CueConfig::default(), None);
    let element = ComparativeCueUndoElement::new(
        ProxyId(42),
        Some(state(|cue| cue.update_value(0, 0, 1.0))),
        None,
    );
    assert!(element.undo(&mut registry));
    assert!(registry.is_empty());
}

#[test]
fn undo_against_plain_animation_cue_is_ignored() {
    let mut registry = CueRegistry::new(CueConfig::default(), None);
    let cue = registry.create_animation();
    let id = cue.borrow().id();
    let element = ComparativeCueUndoElement::new(id, Some(state(|_| {})), None);
    assert!(element.undo(&mut registry));
}

#[test]
fn redo_recreates_destroyed_proxy() {
    let mut registry = CueRegistry::new(CueConfig::default(), None);
    let proxy = registry.create_comparative();
    let id = proxy.borrow().id();
    drop(proxy);
    registry.unregister(id);

    let after = state(|cue| cue.update_y_range(2, 13.0, 13.0));
    let element = ComparativeCueUndoElement::new(id, None, Some(after));
    assert!(element.redo(&mut registry));

    let recreated = registry.comparative(id).unwrap();
    assert_eq!(recreated.borrow_mut().value(2, 0, 4, 4), Some(13.0));
}

#[test]
fn missing_snapshots_are_no_ops() {
    let mut registry = CueRegistry::new(CueConfig::default(), None);
    let element = ComparativeCueUndoElement::new(ProxyId(9), None, None);
    assert!(element.undo(&mut registry));
    assert!(element.redo(&mut registry));
    assert!(registry.is_empty());
}

#[test]
fn xml_form_round_trips() {
    let element = ComparativeCueUndoElement::new(
        ProxyId(5),
        Some(state(|cue| cue.update_whole_range(1.0, 9.0))),
        Some(state(|cue| {
            cue.update_whole_range(1.0, 9.0);
            cue.update_value(1, 1, 0.1);
        })),
    );
    let text = element.to_xml().to_xml_string().unwrap();
    let parsed = XmlElement::from_xml_str(&text).unwrap();
    let back = ComparativeCueUndoElement::from_xml(&parsed).unwrap();
    assert_eq!(back, element);

    let only_after = ComparativeCueUndoElement::new(ProxyId(5), None, Some(state(|_| {})));
    assert_eq!(
        ComparativeCueUndoElement::from_xml(&only_after.to_xml()).unwrap(),
        only_after
    );
}

#[test]
fn xml_form_rejects_foreign_elements() {
    assert!(ComparativeCueUndoElement::from_xml(&XmlElement::new("Other")).is_err());
    let mut doubled = XmlElement::new(UNDO_ELEMENT_TAG).with_attribute("id", "1");
    let before = doubled.add_child(XmlElement::new("Before"));
    before.add_child(XmlElement::new("A"));
    before.add_child(XmlElement::new("B"));
    assert!(ComparativeCueUndoElement::from_xml(&doubled).is_err());
}
