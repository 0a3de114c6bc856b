use crate::cue::command::{CommandKind, CueCommand};

#[derive(Clone, Debug, PartialEq)]
/// A command evicted from the queue, with its index before the eviction.
pub struct RemovedCommand {
    /// Queue position the command held before it was removed.
    pub position: usize,
    /// The removed command.
    pub command: CueCommand,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Ordered list of cue commands; later commands win where scopes overlap.
pub struct CommandQueue {
    commands: Vec<CueCommand>,
}

impl CommandQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the queue has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands in insertion order.
    pub fn commands(&self) -> &[CueCommand] {
        &self.commands
    }

    /// Evict every command `command` supersedes, then append it.
    ///
    /// Whole-range commands clear the queue. Range commands evict singles and
    /// ranges of the same kind pinned to the same anchor. Singles evict the
    /// single at the same cell.
    pub fn push(&mut self, command: CueCommand) -> Vec<RemovedCommand> {
        let (x, y) = (command.anchor_x(), command.anchor_y());
        let removed = match command.kind() {
            CommandKind::Single => self.evict(|c| {
                c.kind() == CommandKind::Single && c.anchor_x() == x && c.anchor_y() == y
            }),
            CommandKind::XRange => self.evict(|c| {
                matches!(c.kind(), CommandKind::Single | CommandKind::XRange) && c.anchor_y() == y
            }),
            CommandKind::YRange => self.evict(|c| {
                matches!(c.kind(), CommandKind::Single | CommandKind::YRange) && c.anchor_x() == x
            }),
            CommandKind::WholeRangeRowMajor | CommandKind::WholeRangeColumnMajor => self.clear(),
        };
        self.commands.push(command);
        removed
    }

    /// Append without evicting anything (used when replaying diffs).
    pub fn append(&mut self, command: CueCommand) {
        self.commands.push(command);
    }

    /// Remove every command.
    pub fn clear(&mut self) -> Vec<RemovedCommand> {
        self.commands
            .drain(..)
            .enumerate()
            .map(|(position, command)| RemovedCommand { position, command })
            .collect()
    }

    /// Replace the whole queue.
    pub fn replace_all(&mut self, commands: Vec<CueCommand>) {
        self.commands = commands;
    }

    /// Erase the first command structurally equal to `command`.
    pub fn remove_first(&mut self, command: &CueCommand, tolerance: f64) -> Option<usize> {
        let idx = self
            .commands
            .iter()
            .position(|c| c.same_as(command, tolerance))?;
        self.commands.remove(idx);
        Some(idx)
    }

    /// Resolve the values shown at `(x, y)` of a `dx`×`dy` grid into `out`.
    ///
    /// The last matching command decides. `out` is left empty when nothing
    /// matches.
    pub fn resolve(&self, x: i32, y: i32, dx: i32, dy: i32, out: &mut Vec<f64>) {
        match self.commands.iter().rev().find(|c| c.matches(x, y)) {
            Some(cmd) => cmd.write_values(x, y, dx, dy, out),
            None => out.clear(),
        }
    }

    fn evict(&mut self, mut doomed: impl FnMut(&CueCommand) -> bool) -> Vec<RemovedCommand> {
        let mut removed = Vec::new();
        let mut position = 0;
        self.commands.retain(|cmd| {
            let drop = doomed(cmd);
            if drop {
                removed.push(RemovedCommand {
                    position,
                    command: cmd.clone(),
                });
            }
            position += 1;
            !drop
        });
        removed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cue/queue.rs"]
mod tests;
