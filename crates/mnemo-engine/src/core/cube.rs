use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::CommandError;

/// Side length of the voxel cube (3×3×3).
pub const CUBE_SIZE: usize = 3;

/// Number of voxels in the cube.
pub const CUBE_VOXELS: usize = CUBE_SIZE * CUBE_SIZE * CUBE_SIZE;

/// One of the three coordinate axes. `Y` is the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Distribution<Axis> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Axis {
        match rng.random_range(0..3) {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(s)
    }
}

/// A validated voxel coordinate, each component in `{0, 1, 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawVoxelPos")]
pub struct VoxelPos {
    x: u8,
    y: u8,
    z: u8,
}

/// Unvalidated mirror of [`VoxelPos`] that deserialization goes through.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawVoxelPos {
    x: u8,
    y: u8,
    z: u8,
}

impl TryFrom<RawVoxelPos> for VoxelPos {
    type Error = String;

    fn try_from(raw: RawVoxelPos) -> Result<Self, Self::Error> {
        Self::new(usize::from(raw.x), usize::from(raw.y), usize::from(raw.z)).ok_or_else(|| {
            format!(
                "voxel position ({}, {}, {}) out of range 0..{CUBE_SIZE}",
                raw.x, raw.y, raw.z
            )
        })
    }
}

impl VoxelPos {
    /// Creates a position, or `None` if any component is out of range.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn new(x: usize, y: usize, z: usize) -> Option<Self> {
        if x < CUBE_SIZE && y < CUBE_SIZE && z < CUBE_SIZE {
            Some(Self {
                x: x as u8,
                y: y as u8,
                z: z as u8,
            })
        } else {
            None
        }
    }

    #[must_use]
    pub fn x(self) -> usize {
        usize::from(self.x)
    }

    #[must_use]
    pub fn y(self) -> usize {
        usize::from(self.y)
    }

    #[must_use]
    pub fn z(self) -> usize {
        usize::from(self.z)
    }

    /// Iterates every coordinate in creation scan order: x outermost,
    /// then y, then z.
    #[expect(clippy::cast_possible_truncation)]
    pub fn all() -> impl Iterator<Item = Self> {
        (0..CUBE_SIZE).flat_map(|x| {
            (0..CUBE_SIZE).flat_map(move |y| {
                (0..CUBE_SIZE).map(move |z| Self {
                    x: x as u8,
                    y: y as u8,
                    z: z as u8,
                })
            })
        })
    }

    /// The coordinate this position maps to under a 90° clockwise rotation
    /// about the vertical axis: x' = N-1-z, z' = x, y unchanged.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    const fn rotated_cw(self) -> Self {
        Self {
            x: (CUBE_SIZE as u8) - 1 - self.z,
            y: self.y,
            z: self.x,
        }
    }
}

impl fmt::Display for VoxelPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A unit cell of the cube.
///
/// The identity is assigned once at creation and never changes; the
/// coordinate changes under rotation and the `present` flag is cleared by a
/// laser. A destroyed voxel keeps rotating with the cube, it just has no
/// visible effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voxel {
    id: u8,
    pos: VoxelPos,
    present: bool,
}

impl Voxel {
    #[must_use]
    pub fn id(&self) -> u8 {
        self.id
    }

    #[must_use]
    pub fn pos(&self) -> VoxelPos {
        self.pos
    }

    #[must_use]
    pub fn present(&self) -> bool {
        self.present
    }
}

/// The 3×3×3 voxel cube configuration.
///
/// Invariants: voxel identities are fixed for the lifetime of the cube, and
/// no two present voxels ever share a coordinate. Rotation is a bijection on
/// coordinates and a laser only clears presence, so both hold by
/// construction.
///
/// # Example
///
/// ```
/// use mnemo_engine::{Cube, CubeCommand, VoxelPos};
///
/// let pos = VoxelPos::new(0, 0, 0).unwrap();
/// let cube = Cube::ordered();
/// assert_eq!(cube.voxel_at(pos).map(|v| v.id()), Some(1));
///
/// let lasered = cube.apply(&CubeCommand::laser(mnemo_engine::Axis::Z, 0, 0).unwrap());
/// assert!(lasered.voxel_at(pos).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cube {
    voxels: [Voxel; CUBE_VOXELS],
}

impl Cube {
    /// Creates the ordered cube: ids 1..=27 assigned while scanning
    /// x outermost, then y, then z; every voxel present.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn ordered() -> Self {
        let mut voxels = [Voxel {
            id: 0,
            pos: VoxelPos { x: 0, y: 0, z: 0 },
            present: true,
        }; CUBE_VOXELS];
        for (i, pos) in VoxelPos::all().enumerate() {
            voxels[i] = Voxel {
                id: i as u8 + 1,
                pos,
                present: true,
            };
        }
        Self { voxels }
    }

    /// All 27 voxels in creation order, destroyed ones included.
    pub fn voxels(&self) -> impl Iterator<Item = &Voxel> {
        self.voxels.iter()
    }

    /// The present voxel at the given coordinate, if any.
    #[must_use]
    pub fn voxel_at(&self, pos: VoxelPos) -> Option<&Voxel> {
        self.voxels.iter().find(|v| v.present && v.pos == pos)
    }

    /// Number of voxels still present.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.present).count()
    }

    /// Applies one command, returning the transformed cube.
    ///
    /// Pure: `self` is left unmodified. Rotation moves every voxel whether
    /// present or not; a laser clears the `present` flag of every voxel on
    /// its line, regardless of how deep it sits.
    #[must_use]
    pub fn apply(&self, command: &CubeCommand) -> Self {
        let mut voxels = self.voxels;
        match command.kind {
            CubeCommandKind::RotateCw => {
                for voxel in &mut voxels {
                    voxel.pos = voxel.pos.rotated_cw();
                }
            }
            CubeCommandKind::Laser { axis, a, b } => {
                for voxel in &mut voxels {
                    let hit = match axis {
                        Axis::X => (voxel.pos.y, voxel.pos.z) == (a, b),
                        Axis::Y => (voxel.pos.x, voxel.pos.z) == (a, b),
                        Axis::Z => (voxel.pos.x, voxel.pos.y) == (a, b),
                    };
                    if hit {
                        voxel.present = false;
                    }
                }
            }
        }
        Self { voxels }
    }
}

impl fmt::Display for Cube {
    /// Renders the cube layer by layer from the top (`y = 2`) down.
    ///
    /// Within a layer, rows are `z = 0..3` and columns `x = 0..3`; a
    /// destroyed position prints as `..`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, y) in (0..CUBE_SIZE).rev().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "layer y={y}")?;
            for z in 0..CUBE_SIZE {
                for x in 0..CUBE_SIZE {
                    if x > 0 {
                        write!(f, " ")?;
                    }
                    let pos = VoxelPos::new(x, y, z).expect("loop bounds match CUBE_SIZE");
                    match self.voxel_at(pos) {
                        Some(voxel) => write!(f, "{:>2}", voxel.id())?,
                        None => write!(f, "..")?,
                    }
                }
                if z + 1 < CUBE_SIZE {
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}

/// One transformation of the cube.
///
/// Built through validating constructors; the [`Display`] text is derived
/// from the executed parameters.
///
/// [`Display`]: fmt::Display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CubeCommandKind", try_from = "CubeCommandKind")]
pub struct CubeCommand {
    kind: CubeCommandKind,
}

/// The discriminated kind of a [`CubeCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CubeCommandKind {
    /// Rotate the whole cube 90° clockwise about the vertical axis.
    RotateCw,
    /// Destroy every voxel on one axis-aligned line.
    ///
    /// `(a, b)` are the two free coordinates naming the line, in fixed
    /// order: `(y, z)` for a laser along `x`, `(x, z)` along `y`,
    /// `(x, y)` along `z`.
    Laser { axis: Axis, a: u8, b: u8 },
}

impl CubeCommand {
    #[must_use]
    pub fn rotate_cw() -> Self {
        Self {
            kind: CubeCommandKind::RotateCw,
        }
    }

    /// Creates a laser command for in-range line coordinates.
    #[expect(clippy::cast_possible_truncation)]
    pub fn laser(axis: Axis, a: usize, b: usize) -> Result<Self, CommandError> {
        if a >= CUBE_SIZE || b >= CUBE_SIZE {
            return Err(CommandError::LaserOutOfRange {
                a,
                b,
                len: CUBE_SIZE,
            });
        }
        Ok(Self {
            kind: CubeCommandKind::Laser {
                axis,
                a: a as u8,
                b: b as u8,
            },
        })
    }

    #[must_use]
    pub fn kind(&self) -> CubeCommandKind {
        self.kind
    }
}

impl From<CubeCommand> for CubeCommandKind {
    fn from(command: CubeCommand) -> Self {
        command.kind
    }
}

/// Routes deserialized kinds through the validating constructors, so a
/// malformed captured command is rejected the same way a malformed
/// constructor call is.
impl TryFrom<CubeCommandKind> for CubeCommand {
    type Error = CommandError;

    fn try_from(kind: CubeCommandKind) -> Result<Self, Self::Error> {
        match kind {
            CubeCommandKind::RotateCw => Ok(Self::rotate_cw()),
            CubeCommandKind::Laser { axis, a, b } => {
                Self::laser(axis, usize::from(a), usize::from(b))
            }
        }
    }
}

impl fmt::Display for CubeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CubeCommandKind::RotateCw => {
                write!(f, "Rotate 90° clockwise about the vertical axis")
            }
            CubeCommandKind::Laser { axis, a, b } => {
                let (first, second) = match axis {
                    Axis::X => ("y", "z"),
                    Axis::Y => ("x", "z"),
                    Axis::Z => ("x", "y"),
                };
                write!(f, "Fire laser along {axis} at ({first}={a}, {second}={b})")
            }
        }
    }
}
