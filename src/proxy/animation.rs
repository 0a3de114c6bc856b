use crate::{
    foundation::error::CueResult,
    property::target::{AnimatedTarget, SharedProxy},
    proxy::ProxyId,
};

#[derive(Debug)]
/// Time-driven cue: ramps a property from `start_value` to `end_value` as
/// normalized time goes from 0 to 1.
pub struct AnimationCue {
    id: ProxyId,
    target: AnimatedTarget,
    start_value: f64,
    end_value: f64,
    enabled: bool,
}

impl AnimationCue {
    /// Enabled cue ramping 0 to 1.
    pub fn new(id: ProxyId) -> Self {
        Self {
            id,
            target: AnimatedTarget::new(),
            start_value: 0.0,
            end_value: 1.0,
            enabled: true,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> ProxyId {
        self.id
    }

    /// Set the ramp endpoints.
    pub fn set_range(&mut self, start: f64, end: f64) {
        self.start_value = start;
        self.end_value = end;
    }

    /// Enable or disable value pushes.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Where values are pushed.
    pub fn target_mut(&mut self) -> &mut AnimatedTarget {
        &mut self.target
    }

    /// Point the cue at `proxy` (held weakly).
    pub fn set_animated_proxy(&mut self, proxy: &SharedProxy) {
        self.target.set_proxy(proxy);
    }

    /// Value at normalized time `t` (clamped to `[0, 1]`).
    pub fn value_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        self.start_value + (self.end_value - self.start_value) * t
    }

    /// Push the value at `t` into the animated property.
    pub fn update_at(&mut self, t: f64) -> CueResult<()> {
        if !self.enabled {
            return Ok(());
        }
        let value = self.value_at(t);
        self.target.apply(&[value]).inspect_err(|e| {
            tracing::warn!(proxy = %self.id, error = %e, "animated value not applied");
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/proxy/animation.rs"]
mod tests;
