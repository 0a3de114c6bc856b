use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use crate::foundation::error::{CueError, CueResult};

/// Knows how to legally apply an animated value to a property element.
pub trait PropertyDomain {
    /// Apply `value` to element `index` of `property`.
    fn set_animation_value(
        &self,
        property: &mut dyn AnimatedProperty,
        index: usize,
        value: f64,
    ) -> CueResult<()>;
}

/// A (possibly vector-valued) numeric property driven by a cue.
pub trait AnimatedProperty {
    /// Current element count.
    fn number_of_elements(&self) -> usize;
    /// Resize the property. Returns `false` when the element count is fixed.
    fn set_number_of_elements(&mut self, count: usize) -> bool;
    /// Current value of one element.
    fn element(&self, index: usize) -> Option<f64>;
    /// Assign one element without domain checks.
    fn set_element(&mut self, index: usize, value: f64) -> CueResult<()>;
    /// Look up a domain by name.
    fn domain(&self, name: &str) -> Option<Rc<dyn PropertyDomain>>;
}

/// The object whose properties a cue drives.
pub trait AnimatedProxy {
    /// Look up a property by name.
    fn property_mut(&mut self, name: &str) -> Option<&mut dyn AnimatedProperty>;
    /// Flush pending property changes into the pipeline.
    fn update_pipeline(&mut self);
}

/// Shared handle type for animated proxies.
pub type SharedProxy = Rc<RefCell<dyn AnimatedProxy>>;

#[derive(Clone, Default)]
/// Where a cue pushes its values: a proxy (held weakly), a property name, a
/// domain name and an element index (`-1` = the whole vector).
pub struct AnimatedTarget {
    proxy: Option<Weak<RefCell<dyn AnimatedProxy>>>,
    property_name: String,
    domain_name: String,
    element: i32,
}

impl AnimatedTarget {
    /// Unwired target driving element 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point at `proxy` without taking ownership.
    pub fn set_proxy(&mut self, proxy: &SharedProxy) {
        self.proxy = Some(Rc::downgrade(proxy));
    }

    /// Forget the proxy.
    pub fn clear_proxy(&mut self) {
        self.proxy = None;
    }

    /// The proxy, if set and still alive.
    pub fn proxy(&self) -> Option<SharedProxy> {
        self.proxy.as_ref().and_then(Weak::upgrade)
    }

    /// Name of the driven property.
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Set the driven property name.
    pub fn set_property_name(&mut self, name: impl Into<String>) {
        self.property_name = name.into();
    }

    /// Name of the domain used to apply values.
    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    /// Set the domain name.
    pub fn set_domain_name(&mut self, name: impl Into<String>) {
        self.domain_name = name.into();
    }

    /// Driven element index, `-1` for the whole vector.
    pub fn element(&self) -> i32 {
        self.element
    }

    /// Set the driven element index (`-1` for the whole vector).
    pub fn set_element(&mut self, element: i32) {
        self.element = element;
    }

    /// Push `values` into the target property, then flush the proxy.
    ///
    /// One value with `element >= 0` sets that element. With `element == -1`
    /// the property is resized to `values.len()` when it allows it and every
    /// element is set. Any other combination is rejected without mutation.
    pub fn apply(&self, values: &[f64]) -> CueResult<()> {
        let proxy = self
            .proxy()
            .ok_or_else(|| CueError::property("no animated proxy is set"))?;
        let mut proxy = proxy.borrow_mut();
        let property = proxy.property_mut(&self.property_name).ok_or_else(|| {
            CueError::property(format!("no property named '{}'", self.property_name))
        })?;
        let domain = property.domain(&self.domain_name).ok_or_else(|| {
            CueError::property(format!(
                "property '{}' has no domain named '{}'",
                self.property_name, self.domain_name
            ))
        })?;

        match (values.len(), self.element) {
            (0, _) => return Err(CueError::property("no value to apply")),
            (1, element) if element >= 0 => {
                domain.set_animation_value(&mut *property, element as usize, values[0])?;
            }
            (n, -1) => {
                let count = if property.set_number_of_elements(n) {
                    n
                } else {
                    let fixed = property.number_of_elements().min(n);
                    tracing::debug!(
                        property = %self.property_name,
                        requested = n,
                        applied = fixed,
                        "property is not resizable"
                    );
                    fixed
                };
                for (i, value) in values.iter().take(count).enumerate() {
                    domain.set_animation_value(&mut *property, i, *value)?;
                }
            }
            (n, element) => {
                return Err(CueError::property(format!(
                    "cannot apply {n} values to element {element} of '{}'",
                    self.property_name
                )));
            }
        }

        proxy.update_pipeline();
        Ok(())
    }
}

impl fmt::Debug for AnimatedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedTarget")
            .field("proxy_alive", &self.proxy().is_some())
            .field("property_name", &self.property_name)
            .field("domain_name", &self.domain_name)
            .field("element", &self.element)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/property/target.rs"]
mod tests;
