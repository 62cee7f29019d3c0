use std::fmt;

use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

use crate::CommandError;

/// Side length of the grid (3×3).
pub const GRID_SIZE: usize = 3;

/// A validated cell position within the 3×3 grid.
///
/// Positions are row-major: `(0, 0)` is the top-left cell, rows increase
/// downward, columns increase rightward. Construction is the only place
/// range checking happens; a `CellPos` that exists is always in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCellPos")]
pub struct CellPos {
    row: u8,
    col: u8,
}

/// Unvalidated mirror of [`CellPos`] that deserialization goes through.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawCellPos {
    row: u8,
    col: u8,
}

impl TryFrom<RawCellPos> for CellPos {
    type Error = String;

    fn try_from(raw: RawCellPos) -> Result<Self, Self::Error> {
        Self::new(usize::from(raw.row), usize::from(raw.col)).ok_or_else(|| {
            format!(
                "cell position ({}, {}) out of range 0..{GRID_SIZE}",
                raw.row, raw.col
            )
        })
    }
}

impl CellPos {
    /// Creates a position, or `None` if either coordinate is out of range.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[must_use]
    pub fn row(self) -> usize {
        usize::from(self.row)
    }

    #[must_use]
    pub fn col(self) -> usize {
        usize::from(self.col)
    }

    /// Iterates every cell position in row-major order.
    #[expect(clippy::cast_possible_truncation)]
    pub fn all() -> impl Iterator<Item = Self> {
        (0..GRID_SIZE).flat_map(|row| {
            (0..GRID_SIZE).map(move |col| Self {
                row: row as u8,
                col: col as u8,
            })
        })
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A 3×3 grid of single-digit values, the 2-D puzzle configuration.
///
/// Grids are immutable: [`Grid::apply`] returns a new, independent grid and
/// leaves the receiver untouched, so history snapshots never alias.
///
/// # Example
///
/// ```
/// use mnemo_engine::{Grid, GridCommand};
///
/// let grid = Grid::ordered();
/// let rotated = grid.apply(&GridCommand::rotate_cw());
/// assert_eq!(rotated.rows()[0], [7, 4, 1]);
/// // the original is unchanged
/// assert_eq!(grid.rows()[0], [1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: [[u8; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// Creates the ordered grid: 1..=9 filled row-major. Deterministic.
    #[must_use]
    pub const fn ordered() -> Self {
        Self {
            rows: [[1, 2, 3], [4, 5, 6], [7, 8, 9]],
        }
    }

    /// Creates a grid holding a uniform random permutation of 1..=9.
    ///
    /// Uses an unbiased shuffle, so every one of the 9! arrangements is
    /// equally likely and no value is ever duplicated.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut values: [u8; GRID_SIZE * GRID_SIZE] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        values.shuffle(rng);
        let mut rows = [[0; GRID_SIZE]; GRID_SIZE];
        for (i, value) in values.into_iter().enumerate() {
            rows[i / GRID_SIZE][i % GRID_SIZE] = value;
        }
        Self { rows }
    }

    #[must_use]
    pub fn value_at(&self, pos: CellPos) -> u8 {
        self.rows[pos.row()][pos.col()]
    }

    #[must_use]
    pub fn rows(&self) -> &[[u8; GRID_SIZE]; GRID_SIZE] {
        &self.rows
    }

    /// Applies one command, returning the transformed grid.
    ///
    /// Pure: `self` is left unmodified.
    #[must_use]
    pub fn apply(&self, command: &GridCommand) -> Self {
        let mut rows = self.rows;
        match command.kind {
            GridCommandKind::RotateCw => {
                // (r, c) -> (c, N-1-r)
                for (r, row) in self.rows.iter().enumerate() {
                    for (c, &value) in row.iter().enumerate() {
                        rows[c][GRID_SIZE - 1 - r] = value;
                    }
                }
            }
            GridCommandKind::MirrorHorizontal => {
                for row in &mut rows {
                    row.reverse();
                }
            }
            GridCommandKind::Swap { a, b } => {
                let held = rows[a.row()][a.col()];
                rows[a.row()][a.col()] = rows[b.row()][b.col()];
                rows[b.row()][b.col()] = held;
            }
            GridCommandKind::SetRow { row, value } => {
                rows[usize::from(row)] = [value; GRID_SIZE];
            }
        }
        Self { rows }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} {} {}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

/// One transformation of the grid.
///
/// Commands are immutable values built through validating constructors, so
/// every command that exists carries well-formed parameters. The [`Display`]
/// text is derived from the same parameters used for execution and can never
/// contradict the applied effect.
///
/// [`Display`]: fmt::Display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "GridCommandKind", try_from = "GridCommandKind")]
pub struct GridCommand {
    kind: GridCommandKind,
}

/// The discriminated kind of a [`GridCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridCommandKind {
    /// Rotate the whole grid 90° clockwise.
    RotateCw,
    /// Reverse the column order of every row.
    MirrorHorizontal,
    /// Exchange the values of two distinct cells.
    Swap { a: CellPos, b: CellPos },
    /// Overwrite every cell of one row with a constant.
    SetRow { row: u8, value: u8 },
}

impl GridCommand {
    #[must_use]
    pub fn rotate_cw() -> Self {
        Self {
            kind: GridCommandKind::RotateCw,
        }
    }

    #[must_use]
    pub fn mirror_horizontal() -> Self {
        Self {
            kind: GridCommandKind::MirrorHorizontal,
        }
    }

    /// Creates a swap command over two distinct cells.
    pub fn swap(a: CellPos, b: CellPos) -> Result<Self, CommandError> {
        if a == b {
            return Err(CommandError::SwapCellsEqual(a));
        }
        Ok(Self {
            kind: GridCommandKind::Swap { a, b },
        })
    }

    /// Creates a set-row command for an in-range row index.
    #[expect(clippy::cast_possible_truncation)]
    pub fn set_row(row: usize, value: u8) -> Result<Self, CommandError> {
        if row >= GRID_SIZE {
            return Err(CommandError::RowOutOfRange {
                row,
                len: GRID_SIZE,
            });
        }
        Ok(Self {
            kind: GridCommandKind::SetRow {
                row: row as u8,
                value,
            },
        })
    }

    #[must_use]
    pub fn kind(&self) -> GridCommandKind {
        self.kind
    }
}

impl From<GridCommand> for GridCommandKind {
    fn from(command: GridCommand) -> Self {
        command.kind
    }
}

/// Routes deserialized kinds through the validating constructors, so a
/// malformed captured command is rejected the same way a malformed
/// constructor call is.
impl TryFrom<GridCommandKind> for GridCommand {
    type Error = CommandError;

    fn try_from(kind: GridCommandKind) -> Result<Self, Self::Error> {
        match kind {
            GridCommandKind::RotateCw => Ok(Self::rotate_cw()),
            GridCommandKind::MirrorHorizontal => Ok(Self::mirror_horizontal()),
            GridCommandKind::Swap { a, b } => Self::swap(a, b),
            GridCommandKind::SetRow { row, value } => Self::set_row(usize::from(row), value),
        }
    }
}

impl fmt::Display for GridCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            GridCommandKind::RotateCw => write!(f, "Rotate 90° clockwise"),
            GridCommandKind::MirrorHorizontal => write!(f, "Mirror horizontally"),
            GridCommandKind::Swap { a, b } => write!(f, "Swap {a} with {b}"),
            GridCommandKind::SetRow { row, value } => {
                write!(f, "Set row {row} to {value}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn grid(rows: [[u8; 3]; 3]) -> Grid {
        Grid { rows }
    }

    #[test]
    fn test_ordered_layout() {
        assert_eq!(Grid::ordered().rows(), &[[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
    }

    #[test]
    fn test_shuffled_is_permutation() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let grid = Grid::shuffled(&mut rng);
            let mut values: Vec<u8> = grid.rows().iter().flatten().copied().collect();
            values.sort_unstable();
            assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        }
    }

    #[test]
    fn test_shuffled_deterministic_per_seed() {
        let a = Grid::shuffled(&mut Pcg32::seed_from_u64(42));
        let b = Grid::shuffled(&mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let original = Grid::ordered();
        let before = original.clone();
        let _ = original.apply(&GridCommand::rotate_cw());
        let _ = original.apply(&GridCommand::mirror_horizontal());
        assert_eq!(original, before);
    }

    #[test]
    fn test_rotate_cw_once() {
        let rotated = Grid::ordered().apply(&GridCommand::rotate_cw());
        assert_eq!(rotated.rows(), &[[7, 4, 1], [8, 5, 2], [9, 6, 3]]);
    }

    #[test]
    fn test_rotate_cw_four_times_is_identity() {
        let start = grid([[9, 1, 4], [3, 7, 2], [6, 5, 8]]);
        let mut current = start.clone();
        for _ in 0..4 {
            current = current.apply(&GridCommand::rotate_cw());
        }
        assert_eq!(current, start);
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        let start = grid([[2, 8, 5], [1, 9, 4], [7, 3, 6]]);
        let mirrored = start.apply(&GridCommand::mirror_horizontal());
        assert_eq!(mirrored.rows(), &[[5, 8, 2], [4, 9, 1], [6, 3, 7]]);
        assert_eq!(mirrored.apply(&GridCommand::mirror_horizontal()), start);
    }

    #[test]
    fn test_swap_then_rotate() {
        let a = CellPos::new(0, 0).unwrap();
        let b = CellPos::new(1, 1).unwrap();
        let swapped = Grid::ordered().apply(&GridCommand::swap(a, b).unwrap());
        assert_eq!(swapped.rows(), &[[5, 2, 3], [4, 1, 6], [7, 8, 9]]);

        let rotated = swapped.apply(&GridCommand::rotate_cw());
        assert_eq!(rotated.rows(), &[[7, 4, 5], [8, 1, 2], [9, 6, 3]]);
    }

    #[test]
    fn test_set_row_overwrites_row_only() {
        let filled = Grid::ordered().apply(&GridCommand::set_row(1, 7).unwrap());
        assert_eq!(filled.rows(), &[[1, 2, 3], [7, 7, 7], [7, 8, 9]]);
    }

    #[test]
    fn test_swap_rejects_identical_cells() {
        let pos = CellPos::new(2, 1).unwrap();
        assert_eq!(
            GridCommand::swap(pos, pos),
            Err(CommandError::SwapCellsEqual(pos))
        );
    }

    #[test]
    fn test_set_row_rejects_out_of_range() {
        assert_eq!(
            GridCommand::set_row(3, 5),
            Err(CommandError::RowOutOfRange { row: 3, len: 3 })
        );
    }

    #[test]
    fn test_cell_pos_bounds() {
        assert!(CellPos::new(2, 2).is_some());
        assert!(CellPos::new(3, 0).is_none());
        assert!(CellPos::new(0, 3).is_none());
        assert_eq!(CellPos::all().count(), 9);
    }

    #[test]
    fn test_command_json_roundtrip() {
        let a = CellPos::new(1, 2).unwrap();
        let b = CellPos::new(0, 0).unwrap();
        let commands = [
            GridCommand::rotate_cw(),
            GridCommand::mirror_horizontal(),
            GridCommand::swap(a, b).unwrap(),
            GridCommand::set_row(2, 4).unwrap(),
        ];
        for command in commands {
            let json = serde_json::to_string(&command).unwrap();
            let back: GridCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(back, command, "roundtrip of {json}");
        }
        assert_eq!(
            serde_json::to_string(&GridCommand::rotate_cw()).unwrap(),
            "\"rotate-cw\""
        );
    }

    #[test]
    fn test_command_deserialization_rejects_malformed() {
        // identical swap cells
        let json = r#"{"swap":{"a":{"row":0,"col":0},"b":{"row":0,"col":0}}}"#;
        assert!(serde_json::from_str::<GridCommand>(json).is_err());

        // out-of-range cell coordinate
        let json = r#"{"swap":{"a":{"row":7,"col":0},"b":{"row":0,"col":0}}}"#;
        assert!(serde_json::from_str::<GridCommand>(json).is_err());

        // out-of-range row index
        let json = r#"{"set-row":{"row":9,"value":5}}"#;
        assert!(serde_json::from_str::<GridCommand>(json).is_err());
    }

    #[test]
    fn test_descriptions() {
        let a = CellPos::new(1, 2).unwrap();
        let b = CellPos::new(0, 0).unwrap();
        assert_eq!(
            GridCommand::swap(a, b).unwrap().to_string(),
            "Swap (1, 2) with (0, 0)"
        );
        assert_eq!(
            GridCommand::set_row(2, 4).unwrap().to_string(),
            "Set row 2 to 4"
        );
        assert_eq!(GridCommand::rotate_cw().to_string(), "Rotate 90° clockwise");
        assert_eq!(
            GridCommand::mirror_horizontal().to_string(),
            "Mirror horizontally"
        );
    }
}
