use std::{collections::BTreeMap, fmt, rc::Rc};

use crate::{
    foundation::error::{CueError, CueResult},
    property::target::{AnimatedProperty, AnimatedProxy, PropertyDomain},
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// Accepts any value, optionally clamped to `[min, max]`.
pub struct RangeDomain {
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Inclusive upper bound.
    pub max: Option<f64>,
}

impl RangeDomain {
    /// Domain without bounds.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Domain clamping to `[min, max]`.
    pub fn bounded(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

impl PropertyDomain for RangeDomain {
    fn set_animation_value(
        &self,
        property: &mut dyn AnimatedProperty,
        index: usize,
        value: f64,
    ) -> CueResult<()> {
        let mut v = value;
        if let Some(min) = self.min {
            v = v.max(min);
        }
        if let Some(max) = self.max {
            v = v.min(max);
        }
        property.set_element(index, v)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Maps animated values onto `0`/`1`, switching at `0.5`.
pub struct BooleanDomain;

impl PropertyDomain for BooleanDomain {
    fn set_animation_value(
        &self,
        property: &mut dyn AnimatedProperty,
        index: usize,
        value: f64,
    ) -> CueResult<()> {
        property.set_element(index, if value > 0.5 { 1.0 } else { 0.0 })
    }
}

#[derive(Clone, Default)]
/// In-memory double vector property.
pub struct VectorProperty {
    values: Vec<f64>,
    resizable: bool,
    domains: BTreeMap<String, Rc<dyn PropertyDomain>>,
}

impl VectorProperty {
    /// Resizable property with initial `values`.
    pub fn resizable(values: Vec<f64>) -> Self {
        Self {
            values,
            resizable: true,
            domains: BTreeMap::new(),
        }
    }

    /// Property whose element count never changes.
    pub fn fixed(values: Vec<f64>) -> Self {
        Self {
            values,
            resizable: false,
            domains: BTreeMap::new(),
        }
    }

    /// Attach a named domain.
    pub fn with_domain(
        mut self,
        name: impl Into<String>,
        domain: impl PropertyDomain + 'static,
    ) -> Self {
        self.domains.insert(name.into(), Rc::new(domain));
        self
    }

    /// Current values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl AnimatedProperty for VectorProperty {
    fn number_of_elements(&self) -> usize {
        self.values.len()
    }

    fn set_number_of_elements(&mut self, count: usize) -> bool {
        if !self.resizable {
            return count == self.values.len();
        }
        self.values.resize(count, 0.0);
        true
    }

    fn element(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    fn set_element(&mut self, index: usize, value: f64) -> CueResult<()> {
        let len = self.values.len();
        let slot = self.values.get_mut(index).ok_or_else(|| {
            CueError::property(format!("element {index} is out of range (len {len})"))
        })?;
        *slot = value;
        Ok(())
    }

    fn domain(&self, name: &str) -> Option<Rc<dyn PropertyDomain>> {
        self.domains.get(name).cloned()
    }
}

impl fmt::Debug for VectorProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorProperty")
            .field("values", &self.values)
            .field("resizable", &self.resizable)
            .field("domains", &self.domains.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
/// In-memory proxy holding named vector properties.
///
/// Counts how many times pending changes were flushed, which is what
/// pipeline-facing callers observe.
pub struct PropertyProxy {
    properties: BTreeMap<String, VectorProperty>,
    pipeline_updates: usize,
}

impl PropertyProxy {
    /// Proxy without properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a named property.
    pub fn with_property(mut self, name: impl Into<String>, property: VectorProperty) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// Read a property.
    pub fn property(&self, name: &str) -> Option<&VectorProperty> {
        self.properties.get(name)
    }

    /// Number of [`AnimatedProxy::update_pipeline`] calls so far.
    pub fn pipeline_updates(&self) -> usize {
        self.pipeline_updates
    }
}

impl AnimatedProxy for PropertyProxy {
    fn property_mut(&mut self, name: &str) -> Option<&mut dyn AnimatedProperty> {
        self.properties
            .get_mut(name)
            .map(|p| p as &mut dyn AnimatedProperty)
    }

    fn update_pipeline(&mut self) {
        self.pipeline_updates += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/property/memory.rs"]
mod tests;
