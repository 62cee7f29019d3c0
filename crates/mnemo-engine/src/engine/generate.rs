use std::{fmt::Write as _, str::FromStr};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Axis, CUBE_SIZE, CellPos, CubeCommand, DieCommand, GRID_SIZE, GridCommand};

/// Seed for a reproducible session.
///
/// A 128-bit seed that initializes the session's random number generator.
/// The same seed produces the same initial configuration and the same
/// command sequence, enabling deterministic tests and shareable puzzles.
/// Serialized (and parsed) as a 32-character hex string.
///
/// # Example
///
/// ```
/// use mnemo_engine::SessionSeed;
/// use rand::Rng as _;
///
/// let seed: SessionSeed = rand::rng().random();
/// let same: SessionSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, same);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSeed([u8; 16]);

impl SessionSeed {
    #[must_use]
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a seed from the OS random source.
    #[must_use]
    pub fn random() -> Self {
        rand::rng().random()
    }

    /// The generator every session-level draw goes through.
    ///
    /// Each call returns a fresh stream positioned at the start, so two
    /// sessions built from the same seed never correlate by sharing
    /// generator state.
    #[must_use]
    pub fn rng(&self) -> Pcg32 {
        use rand::SeedableRng as _;
        Pcg32::from_seed(self.0)
    }
}

impl std::fmt::Display for SessionSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

impl FromStr for SessionSeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(format!(
                "invalid seed: expected 32 hex characters, got {}",
                s.len()
            ));
        }
        // `from_str_radix` also accepts a sign prefix, which is not valid here.
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("invalid seed: non-hex character in {s:?}"));
        }
        let num =
            u128::from_str_radix(s, 16).map_err(|e| format!("invalid seed: {s} ({e})"))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for SessionSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for SessionSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `SessionSeed` values with `rng.random()`.
impl Distribution<SessionSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SessionSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SessionSeed(seed)
    }
}

/// Relative draw weights for the grid command kinds.
///
/// The distribution is a domain parameter, not a law; the default is
/// 35/30/20/15 rotate/swap/mirror/set-row. A zero weight removes that kind
/// from the draw entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWeights {
    pub rotate: u32,
    pub swap: u32,
    pub mirror: u32,
    pub set_row: u32,
}

impl Default for GridWeights {
    fn default() -> Self {
        Self {
            rotate: 35,
            swap: 30,
            mirror: 20,
            set_row: 15,
        }
    }
}

impl GridWeights {
    // Summed in u64 so maximal user-supplied weights cannot overflow.
    fn total(self) -> u64 {
        u64::from(self.rotate) + u64::from(self.swap) + u64::from(self.mirror)
            + u64::from(self.set_row)
    }
}

/// Relative draw weights for the cube command kinds.
///
/// Default 40/60 rotate/laser; the laser share is split uniformly across
/// the three axes, so a rotation stays more likely than any single laser
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeWeights {
    pub rotate: u32,
    pub laser: u32,
}

impl Default for CubeWeights {
    fn default() -> Self {
        Self {
            rotate: 40,
            laser: 60,
        }
    }
}

impl CubeWeights {
    // Summed in u64 so maximal user-supplied weights cannot overflow.
    fn total(self) -> u64 {
        u64::from(self.rotate) + u64::from(self.laser)
    }
}

fn random_cell<R: Rng + ?Sized>(rng: &mut R) -> CellPos {
    CellPos::new(
        rng.random_range(0..GRID_SIZE),
        rng.random_range(0..GRID_SIZE),
    )
    .expect("random_range keeps cell coordinates in bounds")
}

/// Generates `n` independent weighted-random grid commands.
///
/// Swap resamples until its two cells are distinct; set-row picks a uniform
/// row and a uniform fill value in 1..=9.
///
/// # Panics
///
/// Panics if every weight is zero.
pub fn grid_commands<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    weights: &GridWeights,
) -> Vec<GridCommand> {
    let total = weights.total();
    assert!(total > 0, "grid command weights must not all be zero");
    (0..n)
        .map(|_| {
            let mut pick = rng.random_range(0..total);
            if pick < u64::from(weights.rotate) {
                return GridCommand::rotate_cw();
            }
            pick -= u64::from(weights.rotate);
            if pick < u64::from(weights.swap) {
                let a = random_cell(rng);
                let b = loop {
                    let candidate = random_cell(rng);
                    if candidate != a {
                        break candidate;
                    }
                };
                return GridCommand::swap(a, b).expect("resampled swap cells are distinct");
            }
            pick -= u64::from(weights.swap);
            if pick < u64::from(weights.mirror) {
                return GridCommand::mirror_horizontal();
            }
            let row = rng.random_range(0..GRID_SIZE);
            let value = rng.random_range(1..=9);
            GridCommand::set_row(row, value).expect("random_range keeps the row in bounds")
        })
        .collect()
}

/// Generates `n` die rotations, uniformly over the six kinds.
pub fn die_commands<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<DieCommand> {
    (0..n).map(|_| rng.random()).collect()
}

/// Generates `n` independent weighted-random cube commands.
///
/// A laser picks its axis and both free line coordinates uniformly.
///
/// # Panics
///
/// Panics if every weight is zero.
pub fn cube_commands<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    weights: &CubeWeights,
) -> Vec<CubeCommand> {
    let total = weights.total();
    assert!(total > 0, "cube command weights must not all be zero");
    (0..n)
        .map(|_| {
            if rng.random_range(0..total) < u64::from(weights.rotate) {
                CubeCommand::rotate_cw()
            } else {
                let axis: Axis = rng.random();
                let a = rng.random_range(0..CUBE_SIZE);
                let b = rng.random_range(0..CUBE_SIZE);
                CubeCommand::laser(axis, a, b)
                    .expect("random_range keeps laser coordinates in bounds")
            }
        })
        .collect()
}
