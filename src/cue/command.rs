use crate::foundation::{
    error::{CueError, CueResult},
    xml::{XmlElement, format_f64_list, parse_f64_list},
};

/// Tag name of a serialized [`CueCommand`].
pub const CUE_COMMAND_TAG: &str = "CueCommand";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Scope of a range-assignment command over the comparative grid.
pub enum CommandKind {
    /// One cell at `(anchor_x, anchor_y)`.
    Single,
    /// One row (`anchor_y`, or every row for `-1`), interpolated along x.
    XRange,
    /// One column (`anchor_x`, or every column for `-1`), interpolated along y.
    YRange,
    /// Every cell, interpolated over the grid flattened row by row.
    WholeRangeRowMajor,
    /// Every cell, interpolated over the grid flattened column by column.
    WholeRangeColumnMajor,
}

impl CommandKind {
    /// Stable ordinal written to the `type` attribute.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Single => 0,
            Self::XRange => 1,
            Self::YRange => 2,
            Self::WholeRangeRowMajor => 3,
            Self::WholeRangeColumnMajor => 4,
        }
    }

    /// Inverse of [`CommandKind::ordinal`].
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Single),
            1 => Some(Self::XRange),
            2 => Some(Self::YRange),
            3 => Some(Self::WholeRangeRowMajor),
            4 => Some(Self::WholeRangeColumnMajor),
            _ => None,
        }
    }

    /// Whether this kind covers the entire grid.
    pub fn is_whole_range(self) -> bool {
        matches!(self, Self::WholeRangeRowMajor | Self::WholeRangeColumnMajor)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One range-assignment operation over the comparative grid.
///
/// `min_values` and `max_values` always have the same length; that length is
/// the number of scalar components assigned to each matching cell.
pub struct CueCommand {
    kind: CommandKind,
    anchor_x: i32,
    anchor_y: i32,
    min_values: Vec<f64>,
    max_values: Vec<f64>,
}

impl CueCommand {
    fn new(kind: CommandKind, anchor_x: i32, anchor_y: i32, min: &[f64], max: &[f64]) -> Self {
        let n = min.len().min(max.len());
        if min.len() != max.len() {
            tracing::debug!(
                ?kind,
                min_len = min.len(),
                max_len = max.len(),
                "min/max value lists differ in length; using the shorter one"
            );
        }
        Self {
            kind,
            anchor_x,
            anchor_y,
            min_values: min[..n].to_vec(),
            max_values: max[..n].to_vec(),
        }
    }

    /// Assign `values` to the single cell `(x, y)`.
    pub fn single(x: i32, y: i32, values: &[f64]) -> Self {
        Self::new(CommandKind::Single, x, y, values, values)
    }

    /// Interpolate `min..max` along row `y` (`-1` for every row).
    pub fn x_range(y: i32, min: &[f64], max: &[f64]) -> Self {
        Self::new(CommandKind::XRange, -1, y, min, max)
    }

    /// Interpolate `min..max` along column `x` (`-1` for every column).
    pub fn y_range(x: i32, min: &[f64], max: &[f64]) -> Self {
        Self::new(CommandKind::YRange, x, -1, min, max)
    }

    /// Interpolate `min..max` over the whole grid.
    pub fn whole_range(min: &[f64], max: &[f64], vertical_first: bool) -> Self {
        let kind = if vertical_first {
            CommandKind::WholeRangeColumnMajor
        } else {
            CommandKind::WholeRangeRowMajor
        };
        Self::new(kind, -1, -1, min, max)
    }

    /// Command scope.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Column anchor (`-1` = every column).
    pub fn anchor_x(&self) -> i32 {
        self.anchor_x
    }

    /// Row anchor (`-1` = every row).
    pub fn anchor_y(&self) -> i32 {
        self.anchor_y
    }

    /// Scalar components per cell.
    pub fn number_of_values(&self) -> usize {
        self.min_values.len()
    }

    /// Lower interpolation endpoints.
    pub fn min_values(&self) -> &[f64] {
        &self.min_values
    }

    /// Upper interpolation endpoints.
    pub fn max_values(&self) -> &[f64] {
        &self.max_values
    }

    /// Whether this command contributes a value to cell `(x, y)`.
    pub fn matches(&self, x: i32, y: i32) -> bool {
        match self.kind {
            CommandKind::Single => x == self.anchor_x && y == self.anchor_y,
            CommandKind::XRange => y == self.anchor_y || self.anchor_y == -1,
            CommandKind::YRange => x == self.anchor_x || self.anchor_x == -1,
            CommandKind::WholeRangeRowMajor | CommandKind::WholeRangeColumnMajor => true,
        }
    }

    /// Write the values this command assigns to `(x, y)` of a `dx`×`dy` grid.
    ///
    /// `out` is cleared first. Callers check [`CueCommand::matches`] before.
    pub fn write_values(&self, x: i32, y: i32, dx: i32, dy: i32, out: &mut Vec<f64>) {
        let (x, y, dx, dy) = (i64::from(x), i64::from(y), i64::from(dx), i64::from(dy));
        let (pos, count) = match self.kind {
            CommandKind::Single => (0, 1),
            CommandKind::XRange => (x, dx),
            CommandKind::YRange => (y, dy),
            CommandKind::WholeRangeRowMajor => (y * dx + x, dx * dy),
            CommandKind::WholeRangeColumnMajor => (x * dy + y, dx * dy),
        };
        out.clear();
        out.extend(
            self.min_values
                .iter()
                .zip(&self.max_values)
                .map(|(&min, &max)| interpolate(min, max, pos, count)),
        );
    }

    /// Structural equality used when a diff removes a command.
    ///
    /// Values compare bit-for-bit, or within `tolerance` when it is positive.
    pub fn same_as(&self, other: &Self, tolerance: f64) -> bool {
        let eq = |a: &f64, b: &f64| a.to_bits() == b.to_bits() || (a - b).abs() <= tolerance;
        self.kind == other.kind
            && self.anchor_x == other.anchor_x
            && self.anchor_y == other.anchor_y
            && self.min_values.len() == other.min_values.len()
            && self.min_values.iter().zip(&other.min_values).all(|(a, b)| eq(a, b))
            && self.max_values.iter().zip(&other.max_values).all(|(a, b)| eq(a, b))
    }

    /// Serialize as a `CueCommand` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut el = XmlElement::new(CUE_COMMAND_TAG);
        el.set_attribute("type", self.kind.ordinal().to_string())
            .set_attribute("anchorX", self.anchor_x.to_string())
            .set_attribute("anchorY", self.anchor_y.to_string())
            .set_attribute("numberOfValues", self.number_of_values().to_string());
        if !self.min_values.is_empty() {
            el.set_attribute("minValues", format_f64_list(&self.min_values))
                .set_attribute("maxValues", format_f64_list(&self.max_values));
        }
        el
    }

    /// Parse a `CueCommand` element produced by [`CueCommand::to_xml`].
    pub fn from_xml(el: &XmlElement) -> CueResult<Self> {
        let ordinal: u8 = el.required_attribute("type")?;
        let kind = CommandKind::from_ordinal(ordinal)
            .ok_or_else(|| CueError::xml(format!("unknown command type {ordinal}")))?;
        let anchor_x: i32 = el.required_attribute("anchorX")?;
        let anchor_y: i32 = el.required_attribute("anchorY")?;
        let n: usize = el.required_attribute("numberOfValues")?;

        let min_attr = el.attribute("minValues");
        let max_attr = el.attribute("maxValues");
        let (min_values, max_values) = match (min_attr, max_attr) {
            (Some(min), Some(max)) => (parse_f64_list(min)?, parse_f64_list(max)?),
            (None, None) if n == 0 => (Vec::new(), Vec::new()),
            (None, None) => {
                return Err(CueError::xml(format!(
                    "command declares {n} values but carries none"
                )));
            }
            _ => {
                return Err(CueError::xml(
                    "minValues and maxValues must be present together",
                ));
            }
        };
        if min_values.len() != n || max_values.len() != n {
            return Err(CueError::xml(format!(
                "command declares {n} values but carries {} min and {} max",
                min_values.len(),
                max_values.len()
            )));
        }

        Ok(Self {
            kind,
            anchor_x,
            anchor_y,
            min_values,
            max_values,
        })
    }
}

fn interpolate(min: f64, max: f64, pos: i64, count: i64) -> f64 {
    if count > 1 {
        min + (pos as f64) * (max - min) / ((count - 1) as f64)
    } else {
        min
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cue/command.rs"]
mod tests;
