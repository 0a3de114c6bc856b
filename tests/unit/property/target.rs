use super::*;
use crate::property::memory::{PropertyProxy, RangeDomain, VectorProperty};

fn wired(
    values: Vec<f64>,
    resizable: bool,
) -> (SharedProxy, Rc<RefCell<PropertyProxy>>, AnimatedTarget) {
    let prop = if resizable {
        VectorProperty::resizable(values)
    } else {
        VectorProperty::fixed(values)
    }
    .with_domain("range", RangeDomain::unbounded());
    let concrete = Rc::new(RefCell::new(
        PropertyProxy::new().with_property("ContourValues", prop),
    ));
    let shared: SharedProxy = concrete.clone();
    let mut target = AnimatedTarget::new();
    target.set_proxy(&shared);
    target.set_property_name("ContourValues");
    target.set_domain_name("range");
    (shared, concrete, target)
}

fn values(proxy: &Rc<RefCell<PropertyProxy>>) -> Vec<f64> {
    proxy
        .borrow()
        .property("ContourValues")
        .unwrap()
        .values()
        .to_vec()
}

#[test]
fn single_element_is_set_and_flushed() {
    let (_shared, concrete, mut target) = wired(vec![0.0, 0.0], false);
    target.set_element(1);
    target.apply(&[4.0]).unwrap();
    assert_eq!(values(&concrete), vec![0.0, 4.0]);
    assert_eq!(concrete.borrow().pipeline_updates(), 1);
}

#[test]
fn whole_vector_resizes_when_allowed() {
    let (_shared, concrete, mut target) = wired(vec![0.0], true);
    target.set_element(-1);
    target.apply(&[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(values(&concrete), vec![1.0, 2.0, 3.0]);
}

#[test]
fn whole_vector_on_fixed_property_sets_available_elements() {
    let (_shared, concrete, mut target) = wired(vec![0.0, 0.0], false);
    target.set_element(-1);
    target.apply(&[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(values(&concrete), vec![1.0, 2.0]);
}

#[test]
fn invalid_wiring_is_rejected_without_mutation() {
    let (_shared, concrete, mut target) = wired(vec![0.0, 0.0], false);
    target.set_element(0);
    assert!(target.apply(&[1.0, 2.0]).is_err());
    assert!(target.apply(&[]).is_err());

    target.set_domain_name("missing");
    assert!(target.apply(&[1.0]).is_err());
    target.set_domain_name("range");
    target.set_property_name("Nope");
    assert!(target.apply(&[1.0]).is_err());

    assert_eq!(values(&concrete), vec![0.0, 0.0]);
    assert_eq!(concrete.borrow().pipeline_updates(), 0);
}

#[test]
fn dropped_proxy_is_not_kept_alive() {
    let (shared, concrete, target) = wired(vec![0.0], false);
    drop(shared);
    drop(concrete);
    assert!(target.proxy().is_none());
    assert!(target.apply(&[1.0]).is_err());
}
