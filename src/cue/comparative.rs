use crate::{
    cue::{
        command::{CUE_COMMAND_TAG, CueCommand},
        events::{CueEvent, ListenerId, Listeners, StateChange},
        queue::CommandQueue,
    },
    foundation::{
        config::CueConfig,
        error::{CueError, CueResult},
        xml::XmlElement,
    },
    property::target::{AnimatedTarget, SharedProxy},
};

/// Tag name of the element produced by [`ComparativeAnimationCue::state_snapshot`].
pub const CUE_STATE_TAG: &str = "ComparativeAnimationCueState";

#[derive(Clone, Copy, Debug)]
/// Command-info payload handed to [`ComparativeAnimationCue::load_command_info`].
pub enum CommandInfo<'a> {
    /// Complete queue; replaces whatever the cue holds.
    FullState(&'a XmlElement),
    /// Incremental `StateChange` diff applied on top of the current queue.
    Diff(&'a XmlElement),
}

#[derive(Debug)]
/// Governs how one animated parameter varies across a comparative grid.
///
/// Update calls append commands to an ordered queue; value lookups resolve a
/// cell of a `dx`×`dy` grid by the last command whose scope covers it.
pub struct ComparativeAnimationCue {
    queue: CommandQueue,
    values: Vec<f64>,
    target: AnimatedTarget,
    enabled: bool,
    removal_tolerance: f64,
    listeners: Listeners,
}

impl Default for ComparativeAnimationCue {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparativeAnimationCue {
    /// Empty, enabled cue.
    pub fn new() -> Self {
        Self::with_config(&CueConfig::default())
    }

    /// Empty cue configured from `config`.
    pub fn with_config(config: &CueConfig) -> Self {
        Self {
            queue: CommandQueue::new(),
            values: Vec::new(),
            target: AnimatedTarget::new(),
            enabled: config.default_enabled,
            removal_tolerance: config.removal_tolerance,
            listeners: Listeners::default(),
        }
    }

    /// The command queue.
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Whether [`ComparativeAnimationCue::update_animated_value`] pushes values.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable value pushes.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Where resolved values are pushed.
    pub fn target(&self) -> &AnimatedTarget {
        &self.target
    }

    /// Mutable access to the push target.
    pub fn target_mut(&mut self) -> &mut AnimatedTarget {
        &mut self.target
    }

    /// Point the cue at `proxy` (held weakly).
    pub fn set_animated_proxy(&mut self, proxy: &SharedProxy) {
        self.target.set_proxy(proxy);
    }

    /// Set the driven property name.
    pub fn set_animated_property_name(&mut self, name: impl Into<String>) {
        self.target.set_property_name(name);
    }

    /// Set the domain used to apply values.
    pub fn set_animated_domain_name(&mut self, name: impl Into<String>) {
        self.target.set_domain_name(name);
    }

    /// Set the driven element (`-1` for the whole vector).
    pub fn set_animated_element(&mut self, element: i32) {
        self.target.set_element(element);
    }

    /// Register an event listener.
    pub fn add_listener(&mut self, callback: impl FnMut(&CueEvent) + 'static) -> ListenerId {
        self.listeners.add(callback)
    }

    /// Unregister an event listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Shared handle to this cue's listener registry.
    ///
    /// Emitting through the handle does not borrow the cue, so listeners can
    /// read the cue through whatever shared handle owns it.
    pub fn listeners(&self) -> Listeners {
        self.listeners.clone()
    }

    /// Emit [`CueEvent::PropertyChanged`] so dependents refresh.
    pub fn notify_property_changed(&mut self) {
        self.listeners.emit(&CueEvent::PropertyChanged);
    }

    /// Interpolate `min..max` along row `y` (`-1` for every row).
    pub fn update_x_range(&mut self, y: i32, min: f64, max: f64) {
        self.update_x_range_values(y, &[min], &[max]);
    }

    /// Vector form of [`ComparativeAnimationCue::update_x_range`].
    pub fn update_x_range_values(&mut self, y: i32, min: &[f64], max: &[f64]) {
        self.apply(CueCommand::x_range(y, min, max));
    }

    /// Interpolate `min..max` along column `x` (`-1` for every column).
    pub fn update_y_range(&mut self, x: i32, min: f64, max: f64) {
        self.update_y_range_values(x, &[min], &[max]);
    }

    /// Vector form of [`ComparativeAnimationCue::update_y_range`].
    pub fn update_y_range_values(&mut self, x: i32, min: &[f64], max: &[f64]) {
        self.apply(CueCommand::y_range(x, min, max));
    }

    /// Clear the queue and interpolate `min..max` over the grid, row-major.
    pub fn update_whole_range(&mut self, min: f64, max: f64) {
        self.update_whole_range_values(&[min], &[max], false);
    }

    /// Vector form of [`ComparativeAnimationCue::update_whole_range`];
    /// `vertical_first` flattens the grid column by column.
    pub fn update_whole_range_values(&mut self, min: &[f64], max: &[f64], vertical_first: bool) {
        self.apply(CueCommand::whole_range(min, max, vertical_first));
    }

    /// Pin cell `(x, y)` to `value`.
    pub fn update_value(&mut self, x: i32, y: i32, value: f64) {
        self.update_value_values(x, y, &[value]);
    }

    /// Vector form of [`ComparativeAnimationCue::update_value`].
    pub fn update_value_values(&mut self, x: i32, y: i32, values: &[f64]) {
        self.apply(CueCommand::single(x, y, values));
    }

    fn apply(&mut self, command: CueCommand) {
        let removed = self.queue.push(command.clone());
        tracing::debug!(
            kind = ?command.kind(),
            anchor_x = command.anchor_x(),
            anchor_y = command.anchor_y(),
            evicted = removed.len(),
            queued = self.queue.len(),
            "cue command applied"
        );
        self.listeners.emit(&CueEvent::StateChanged(StateChange {
            removed,
            added: command,
        }));
        self.listeners.emit(&CueEvent::Modified);
    }

    /// Values shown at `(x, y)` of a `dx`×`dy` grid.
    ///
    /// The returned slice borrows the cue's scratch buffer and stays valid
    /// until the next call on the cue. Empty means "no value".
    pub fn values(&mut self, x: i32, y: i32, dx: i32, dy: i32) -> &[f64] {
        self.queue.resolve(x, y, dx, dy, &mut self.values);
        &self.values
    }

    /// First component of [`ComparativeAnimationCue::values`].
    pub fn value(&mut self, x: i32, y: i32, dx: i32, dy: i32) -> Option<f64> {
        self.values(x, y, dx, dy).first().copied()
    }

    /// Resolve `(x, y)` and push the result into the animated property.
    ///
    /// A disabled cue pushes nothing and logs a warning. Missing wiring or an
    /// unusable value count is logged and returned as an error; the property
    /// is left untouched.
    #[tracing::instrument(skip(self))]
    pub fn update_animated_value(&mut self, x: i32, y: i32, dx: i32, dy: i32) -> CueResult<()> {
        if !self.enabled {
            tracing::warn!("cue disabled; animated value not applied");
            return Ok(());
        }
        self.queue.resolve(x, y, dx, dy, &mut self.values);
        self.target.apply(&self.values).inspect_err(|e| {
            tracing::warn!(
                error = %e,
                property = %self.target.property_name(),
                "animated value not applied"
            );
        })
    }

    /// Append one `CueCommand` child per queued command to `parent`.
    pub fn append_command_info<'a>(&self, parent: &'a mut XmlElement) -> &'a mut XmlElement {
        for command in self.queue.commands() {
            parent.add_child(command.to_xml());
        }
        parent
    }

    /// Full-state element holding the current queue.
    pub fn state_snapshot(&self) -> XmlElement {
        let mut root = XmlElement::new(CUE_STATE_TAG);
        self.append_command_info(&mut root);
        root
    }

    /// Load command info in full-state or diff mode.
    ///
    /// Every child is parsed before anything is applied, so a parse failure
    /// leaves the queue unchanged.
    #[tracing::instrument(skip(self, info))]
    pub fn load_command_info(&mut self, info: CommandInfo<'_>) -> CueResult<()> {
        let result = match info {
            CommandInfo::FullState(el) => self.load_full_state(el),
            CommandInfo::Diff(el) => self.load_diff(el),
        };
        match &result {
            Ok(()) => {
                tracing::debug!(queued = self.queue.len(), "command info loaded");
                self.listeners.emit(&CueEvent::Modified);
            }
            Err(e) => tracing::warn!(error = %e, "command info rejected"),
        }
        result
    }

    fn load_full_state(&mut self, el: &XmlElement) -> CueResult<()> {
        let commands = el
            .children_named(CUE_COMMAND_TAG)
            .map(CueCommand::from_xml)
            .collect::<CueResult<Vec<_>>>()?;
        self.queue.replace_all(commands);
        Ok(())
    }

    fn load_diff(&mut self, el: &XmlElement) -> CueResult<()> {
        let ops = el
            .children()
            .iter()
            .map(|child| Ok((is_removal(child)?, CueCommand::from_xml(child)?)))
            .collect::<CueResult<Vec<_>>>()?;
        for (remove, command) in ops {
            if !remove {
                self.queue.append(command);
            } else if self
                .queue
                .remove_first(&command, self.removal_tolerance)
                .is_none()
            {
                tracing::warn!(
                    kind = ?command.kind(),
                    anchor_x = command.anchor_x(),
                    anchor_y = command.anchor_y(),
                    "diff removes a command that is not queued"
                );
            }
        }
        Ok(())
    }
}

fn is_removal(el: &XmlElement) -> CueResult<bool> {
    match el.attribute("remove").map(str::trim) {
        None | Some("0") | Some("false") => Ok(false),
        Some("1") | Some("true") => Ok(true),
        Some(other) => Err(CueError::xml(format!(
            "attribute 'remove' must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cue/comparative.rs"]
mod tests;
