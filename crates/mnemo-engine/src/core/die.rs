use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// One of the six fixed face labels of the die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Top,
    Bottom,
    Front,
    Back,
    Left,
    Right,
}

impl Face {
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
        Self::Left,
        Self::Right,
    ];

    /// The face on the opposite side of the die.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Front => Self::Back,
            Self::Back => Self::Front,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Front => "front",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parses a face label from its lowercase name.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "front" => Some(Self::Front),
            "back" => Some(Self::Back),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A die orientation: the mapping from face labels to pip values.
///
/// Rotations permute which value sits behind which label; they never change
/// the values themselves, so the opposite-faces-sum-to-7 pairing of the
/// canonical pose survives every command.
///
/// # Example
///
/// ```
/// use mnemo_engine::{Die, DieCommand, Face};
///
/// let die = Die::canonical().apply(&DieCommand::RollForward);
/// assert_eq!(die.face(Face::Top), 5);
/// assert_eq!(die.face(Face::Front), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    top: u8,
    bottom: u8,
    front: u8,
    back: u8,
    left: u8,
    right: u8,
}

impl Die {
    /// The canonical starting pose: top 1, bottom 6, front 2, back 5,
    /// left 4, right 3. Every opposite pair sums to 7.
    #[must_use]
    pub const fn canonical() -> Self {
        Self {
            top: 1,
            bottom: 6,
            front: 2,
            back: 5,
            left: 4,
            right: 3,
        }
    }

    /// The pip value currently behind the given face label.
    #[must_use]
    pub const fn face(&self, face: Face) -> u8 {
        match face {
            Face::Top => self.top,
            Face::Bottom => self.bottom,
            Face::Front => self.front,
            Face::Back => self.back,
            Face::Left => self.left,
            Face::Right => self.right,
        }
    }

    /// Applies one rotation, returning the new orientation.
    ///
    /// Pure: `self` is left unmodified. Each rotation is a 4-cycle of face
    /// labels with the two axis faces fixed:
    ///
    /// - roll forward: top→front→bottom→back→top (left/right fixed)
    /// - roll backward: the inverse cycle
    /// - roll left: top→left→bottom→right→top (front/back fixed)
    /// - roll right: the inverse cycle
    /// - spin clockwise (viewed from above): front→right→back→left→front
    ///   (top/bottom fixed)
    /// - spin counterclockwise: the inverse cycle
    #[must_use]
    pub const fn apply(&self, command: &DieCommand) -> Self {
        let Self {
            top,
            bottom,
            front,
            back,
            left,
            right,
        } = *self;
        match command {
            DieCommand::RollForward => Self {
                top: back,
                front: top,
                bottom: front,
                back: bottom,
                left,
                right,
            },
            DieCommand::RollBackward => Self {
                top: front,
                back: top,
                bottom: back,
                front: bottom,
                left,
                right,
            },
            DieCommand::RollLeft => Self {
                top: right,
                left: top,
                bottom: left,
                right: bottom,
                front,
                back,
            },
            DieCommand::RollRight => Self {
                top: left,
                right: top,
                bottom: right,
                left: bottom,
                front,
                back,
            },
            DieCommand::SpinCw => Self {
                front: left,
                right: front,
                back: right,
                left: back,
                top,
                bottom,
            },
            DieCommand::SpinCcw => Self {
                front: right,
                left: front,
                back: left,
                right: back,
                top,
                bottom,
            },
        }
    }
}

impl Default for Die {
    fn default() -> Self {
        Self::canonical()
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top={} bottom={} front={} back={} left={} right={}",
            self.top, self.bottom, self.front, self.back, self.left, self.right
        )
    }
}

/// One 90° rotation of the die. All six kinds are parameterless, so
/// deserialization has nothing to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DieCommand {
    RollForward,
    RollBackward,
    RollLeft,
    RollRight,
    SpinCw,
    SpinCcw,
}

/// Uniform draw over the six rotation kinds.
impl Distribution<DieCommand> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DieCommand {
        match rng.random_range(0..6) {
            0 => DieCommand::RollForward,
            1 => DieCommand::RollBackward,
            2 => DieCommand::RollLeft,
            3 => DieCommand::RollRight,
            4 => DieCommand::SpinCw,
            _ => DieCommand::SpinCcw,
        }
    }
}

impl DieCommand {
    pub const ALL: [Self; 6] = [
        Self::RollForward,
        Self::RollBackward,
        Self::RollLeft,
        Self::RollRight,
        Self::SpinCw,
        Self::SpinCcw,
    ];

    /// The rotation that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::RollForward => Self::RollBackward,
            Self::RollBackward => Self::RollForward,
            Self::RollLeft => Self::RollRight,
            Self::RollRight => Self::RollLeft,
            Self::SpinCw => Self::SpinCcw,
            Self::SpinCcw => Self::SpinCw,
        }
    }
}

impl fmt::Display for DieCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::RollForward => "Roll forward",
            Self::RollBackward => "Roll backward",
            Self::RollLeft => "Roll left",
            Self::RollRight => "Roll right",
            Self::SpinCw => "Spin clockwise",
            Self::SpinCcw => "Spin counterclockwise",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn opposite_pairs_sum_to_7(die: &Die) -> bool {
        Face::ALL
            .iter()
            .all(|&face| die.face(face) + die.face(face.opposite()) == 7)
    }

    #[test]
    fn test_canonical_pose() {
        let die = Die::canonical();
        assert_eq!(die.face(Face::Top), 1);
        assert_eq!(die.face(Face::Bottom), 6);
        assert_eq!(die.face(Face::Front), 2);
        assert_eq!(die.face(Face::Back), 5);
        assert_eq!(die.face(Face::Left), 4);
        assert_eq!(die.face(Face::Right), 3);
        assert!(opposite_pairs_sum_to_7(&die));
    }

    #[test]
    fn test_roll_forward_example() {
        let die = Die::canonical().apply(&DieCommand::RollForward);
        assert_eq!(die.face(Face::Top), 5);
        assert_eq!(die.face(Face::Front), 1);
        assert_eq!(die.face(Face::Bottom), 2);
        assert_eq!(die.face(Face::Back), 6);
        assert_eq!(die.face(Face::Left), 4);
        assert_eq!(die.face(Face::Right), 3);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let die = Die::canonical();
        let before = die;
        for command in DieCommand::ALL {
            let _ = die.apply(&command);
        }
        assert_eq!(die, before);
    }

    #[test]
    fn test_every_command_undone_by_its_inverse() {
        // Start from a non-canonical pose for a stronger check.
        let start = Die::canonical()
            .apply(&DieCommand::RollForward)
            .apply(&DieCommand::SpinCw);
        for command in DieCommand::ALL {
            let back = start.apply(&command).apply(&command.inverse());
            assert_eq!(back, start, "{command} not undone by {}", command.inverse());
        }
    }

    #[test]
    fn test_four_of_a_kind_is_identity() {
        let start = Die::canonical().apply(&DieCommand::RollLeft);
        for command in DieCommand::ALL {
            let mut current = start;
            for _ in 0..4 {
                current = current.apply(&command);
            }
            assert_eq!(current, start, "{command} applied 4 times");
        }
    }

    #[test]
    fn test_opposite_sum_preserved_by_random_walks() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut die = Die::canonical();
        for _ in 0..200 {
            let command: DieCommand = rng.random();
            die = die.apply(&command);
            assert!(opposite_pairs_sum_to_7(&die));
        }
    }

    #[test]
    fn test_spin_keeps_vertical_axis() {
        let die = Die::canonical();
        let spun = die.apply(&DieCommand::SpinCw);
        assert_eq!(spun.face(Face::Top), die.face(Face::Top));
        assert_eq!(spun.face(Face::Bottom), die.face(Face::Bottom));
        assert_eq!(spun.face(Face::Right), die.face(Face::Front));
        assert_eq!(spun.face(Face::Back), die.face(Face::Right));
    }

    #[test]
    fn test_face_parsing() {
        assert_eq!(Face::from_str_opt("top"), Some(Face::Top));
        assert_eq!(Face::from_str_opt("left"), Some(Face::Left));
        assert_eq!(Face::from_str_opt("Top"), None);
        assert_eq!(Face::from_str_opt(""), None);
    }
}
