use std::{collections::HashMap, fmt, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::{CellPos, Cube, Die, Face, Grid, VoxelPos};

/// Result of grading one answer against the true final configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    correct: usize,
    total: usize,
}

impl Score {
    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.correct == self.total
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}

/// Sparse user-entered strings keyed by cell position.
///
/// Owned by the caller and never consulted by the transformation engine; an
/// unanswered position reads as the empty string.
#[derive(Debug, Clone, Default)]
pub struct AnswerSheet<K> {
    entries: HashMap<K, String>,
}

impl<K: Eq + Hash> AnswerSheet<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: K, entry: impl Into<String>) {
        self.entries.insert(key, entry.into());
    }

    /// The entry for a position, `""` when unanswered.
    #[must_use]
    pub fn entry(&self, key: &K) -> &str {
        self.entries.get(key).map_or("", String::as_str)
    }
}

/// Whether a user entry matches the true value of one position.
///
/// An absent true value (destroyed voxel) matches only an empty entry; a
/// numeric entry for it is always wrong. A present value matches only an
/// entry that parses to exactly that integer - never numeric coercion of
/// the empty string.
fn entry_matches(truth: Option<u8>, entry: &str) -> bool {
    let entry = entry.trim();
    match truth {
        None => entry.is_empty(),
        Some(value) => entry.parse::<u8>() == Ok(value),
    }
}

/// A configuration the user reconstructs (or queries) after the run.
pub trait Scoreable {
    type Answer;

    /// Grades cell-by-cell with no partial credit.
    #[must_use]
    fn score(&self, answer: &Self::Answer) -> Score;
}

impl Scoreable for Grid {
    type Answer = AnswerSheet<CellPos>;

    fn score(&self, answer: &Self::Answer) -> Score {
        let mut correct = 0;
        let mut total = 0;
        for pos in CellPos::all() {
            total += 1;
            if entry_matches(Some(self.value_at(pos)), answer.entry(&pos)) {
                correct += 1;
            }
        }
        Score { correct, total }
    }
}

impl Scoreable for Cube {
    type Answer = AnswerSheet<VoxelPos>;

    fn score(&self, answer: &Self::Answer) -> Score {
        let mut correct = 0;
        let mut total = 0;
        for pos in VoxelPos::all() {
            total += 1;
            let truth = self.voxel_at(pos).map(crate::Voxel::id);
            if entry_matches(truth, answer.entry(&pos)) {
                correct += 1;
            }
        }
        Score { correct, total }
    }
}

/// Single-face query answer for the die domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceAnswer {
    pub face: Face,
    pub entry: String,
}

impl Scoreable for Die {
    type Answer = FaceAnswer;

    fn score(&self, answer: &Self::Answer) -> Score {
        let correct = usize::from(entry_matches(Some(self.face(answer.face)), &answer.entry));
        Score { correct, total: 1 }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Axis, CubeCommand, DieCommand};

    use super::*;

    fn full_grid_answer(grid: &Grid) -> AnswerSheet<CellPos> {
        let mut sheet = AnswerSheet::new();
        for pos in CellPos::all() {
            sheet.set(pos, grid.value_at(pos).to_string());
        }
        sheet
    }

    #[test]
    fn test_grid_identical_answer_scores_full() {
        let grid = Grid::ordered();
        let score = grid.score(&full_grid_answer(&grid));
        assert_eq!(score.correct(), 9);
        assert_eq!(score.total(), 9);
        assert!(score.is_perfect());
        assert_eq!(score.to_string(), "9/9");
    }

    #[test]
    fn test_grid_one_mismatch_scores_eight() {
        let grid = Grid::ordered();
        let mut sheet = full_grid_answer(&grid);
        sheet.set(CellPos::new(1, 1).unwrap(), "2");
        assert_eq!(grid.score(&sheet).correct(), 8);
    }

    #[test]
    fn test_grid_unanswered_cells_score_incorrect() {
        let grid = Grid::ordered();
        let score = grid.score(&AnswerSheet::new());
        assert_eq!(score.correct(), 0);
        assert_eq!(score.total(), 9);
    }

    #[test]
    fn test_entry_whitespace_and_garbage() {
        let grid = Grid::ordered();
        let mut sheet = full_grid_answer(&grid);
        // surrounding whitespace is tolerated, non-numeric text is not
        sheet.set(CellPos::new(0, 0).unwrap(), " 1 ");
        sheet.set(CellPos::new(0, 1).unwrap(), "two");
        assert_eq!(grid.score(&sheet).correct(), 8);
    }

    #[test]
    fn test_destroyed_voxel_requires_empty_entry() {
        let cube = Cube::ordered().apply(&CubeCommand::laser(Axis::Z, 0, 0).unwrap());
        let mut sheet = AnswerSheet::new();
        for pos in VoxelPos::all() {
            match cube.voxel_at(pos) {
                Some(voxel) => sheet.set(pos, voxel.id().to_string()),
                None => sheet.set(pos, ""),
            }
        }
        assert!(cube.score(&sheet).is_perfect());

        // a numeric entry for a destroyed position is always incorrect
        let destroyed = VoxelPos::new(0, 0, 1).unwrap();
        assert!(cube.voxel_at(destroyed).is_none());
        sheet.set(destroyed, "2");
        assert_eq!(cube.score(&sheet).correct(), 26);
        assert_eq!(cube.score(&sheet).total(), 27);
    }

    #[test]
    fn test_cube_unanswered_destroyed_position_counts_correct() {
        let cube = Cube::ordered().apply(&CubeCommand::laser(Axis::Y, 2, 2).unwrap());
        // leave the whole sheet unanswered: only the 3 destroyed positions match
        let score = cube.score(&AnswerSheet::new());
        assert_eq!(score.correct(), 3);
    }

    #[test]
    fn test_die_face_query() {
        let die = Die::canonical().apply(&DieCommand::RollForward);
        let hit = die.score(&FaceAnswer {
            face: Face::Top,
            entry: "5".to_owned(),
        });
        assert!(hit.is_perfect());
        assert_eq!(hit.total(), 1);

        let miss = die.score(&FaceAnswer {
            face: Face::Top,
            entry: "1".to_owned(),
        });
        assert_eq!(miss.correct(), 0);
    }

    #[test]
    fn test_score_json_roundtrip() {
        let grid = Grid::ordered();
        let score = grid.score(&full_grid_answer(&grid));
        let json = serde_json::to_string(&score).unwrap();
        assert_eq!(json, r#"{"correct":9,"total":9}"#);
        let back: Score = serde_json::from_str(&json).unwrap();
        assert_eq!(back, score);
    }

    #[test]
    fn test_empty_entry_never_coerces_to_zero() {
        let grid = Grid::ordered();
        let mut sheet = AnswerSheet::new();
        // empty string must not equal any numeric value
        sheet.set(CellPos::new(0, 0).unwrap(), "");
        assert_eq!(grid.score(&sheet).correct(), 0);
    }
}
