use crate::{
    AlreadySubmittedError, Cube, CubeWeights, Die, Grid, GridWeights, Replay, Score, Scoreable,
    SessionSeed, Transformable, cube_commands, die_commands, grid_commands,
};

/// One full puzzle run: configuration generation through scoring.
///
/// A session owns its seed, command list, and replay; nothing is shared with
/// other sessions, so concurrent instances can never correlate their draws.
/// Everything is computed in one synchronous pass at construction; `submit`
/// grades exactly once.
///
/// # Example
///
/// ```
/// use mnemo_engine::{Face, FaceAnswer, Session, SessionSeed};
///
/// let mut session = Session::die(SessionSeed::random(), 4);
/// assert_eq!(session.commands().len(), 4);
/// assert_eq!(session.replay().len(), 5);
///
/// let value = session.final_state().face(Face::Top).to_string();
/// let score = session
///     .submit(&FaceAnswer { face: Face::Top, entry: value })
///     .unwrap();
/// assert!(score.is_perfect());
///
/// // a second submission is rejected
/// assert!(session.submit(&FaceAnswer { face: Face::Top, entry: "1".into() }).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Session<S: Transformable> {
    seed: SessionSeed,
    commands: Vec<S::Command>,
    replay: Replay<S>,
    submitted: bool,
}

impl Session<Grid> {
    /// Grid session starting from the ordered 1..=9 grid.
    #[must_use]
    pub fn ordered_grid(seed: SessionSeed, steps: usize, weights: &GridWeights) -> Self {
        let mut rng = seed.rng();
        let commands = grid_commands(&mut rng, steps, weights);
        Self::from_parts(seed, Grid::ordered(), commands)
    }

    /// Grid session starting from a seeded random permutation.
    #[must_use]
    pub fn shuffled_grid(seed: SessionSeed, steps: usize, weights: &GridWeights) -> Self {
        let mut rng = seed.rng();
        let initial = Grid::shuffled(&mut rng);
        let commands = grid_commands(&mut rng, steps, weights);
        Self::from_parts(seed, initial, commands)
    }
}

impl Session<Die> {
    #[must_use]
    pub fn die(seed: SessionSeed, steps: usize) -> Self {
        let mut rng = seed.rng();
        let commands = die_commands(&mut rng, steps);
        Self::from_parts(seed, Die::canonical(), commands)
    }
}

impl Session<Cube> {
    #[must_use]
    pub fn cube(seed: SessionSeed, steps: usize, weights: &CubeWeights) -> Self {
        let mut rng = seed.rng();
        let commands = cube_commands(&mut rng, steps, weights);
        Self::from_parts(seed, Cube::ordered(), commands)
    }
}

impl<S: Transformable> Session<S> {
    fn from_parts(seed: SessionSeed, initial: S, commands: Vec<S::Command>) -> Self {
        let replay = Replay::run(initial, &commands);
        Self {
            seed,
            commands,
            replay,
            submitted: false,
        }
    }

    #[must_use]
    pub fn seed(&self) -> SessionSeed {
        self.seed
    }

    #[must_use]
    pub fn commands(&self) -> &[S::Command] {
        &self.commands
    }

    #[must_use]
    pub fn replay(&self) -> &Replay<S> {
        &self.replay
    }

    #[must_use]
    pub fn initial(&self) -> &S {
        self.replay.initial()
    }

    #[must_use]
    pub fn final_state(&self) -> &S {
        self.replay.final_state()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }
}

impl<S: Transformable + Scoreable> Session<S> {
    /// Grades the answer against the final configuration.
    ///
    /// Succeeds exactly once; any later call reports
    /// [`AlreadySubmittedError`] so a shell cannot double-score a session.
    pub fn submit(&mut self, answer: &S::Answer) -> Result<Score, AlreadySubmittedError> {
        if self.submitted {
            return Err(AlreadySubmittedError);
        }
        self.submitted = true;
        Ok(self.final_state().score(answer))
    }
}

/// Monotone generation counter for session-scoped callbacks.
///
/// The engine has no timers, but the presentation layer schedules reveal
/// delays keyed to the session that created them. Starting a new session
/// bumps the counter, so a callback holding a stale [`SessionToken`] sees
/// `is_current == false` and becomes a no-op instead of mutating a
/// superseded session.
#[derive(Debug, Clone, Default)]
pub struct SessionCounter {
    current: u64,
}

/// Token tying a scheduled callback to the session generation that made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(u64);

impl SessionCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, invalidating every previously issued token.
    pub fn begin(&mut self) -> SessionToken {
        self.current += 1;
        SessionToken(self.current)
    }

    #[must_use]
    pub fn is_current(&self, token: SessionToken) -> bool {
        token.0 == self.current
    }
}

#[cfg(test)]
mod tests {
    use crate::{AnswerSheet, CellPos};

    use super::*;

    fn seed(n: u64) -> SessionSeed {
        let mut bytes = [0; 16];
        bytes[..8].copy_from_slice(&n.to_be_bytes());
        SessionSeed::new(bytes)
    }

    #[test]
    fn test_same_seed_reproduces_the_whole_session() {
        let a = Session::shuffled_grid(seed(21), 10, &GridWeights::default());
        let b = Session::shuffled_grid(seed(21), 10, &GridWeights::default());
        assert_eq!(a.commands(), b.commands());
        assert_eq!(a.replay(), b.replay());
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = Session::cube(seed(1), 10, &CubeWeights::default());
        let b = Session::cube(seed(2), 10, &CubeWeights::default());
        // Not a hard guarantee, but with 10 draws a collision would point
        // at a seeding bug.
        assert_ne!(a.commands(), b.commands());
    }

    #[test]
    fn test_session_shape() {
        let session = Session::ordered_grid(seed(3), 7, &GridWeights::default());
        assert_eq!(session.commands().len(), 7);
        assert_eq!(session.replay().len(), 8);
        assert_eq!(session.initial(), &Grid::ordered());
        assert!(!session.is_submitted());
    }

    #[test]
    fn test_submit_scores_once() {
        let mut session = Session::ordered_grid(seed(4), 3, &GridWeights::default());
        let mut sheet = AnswerSheet::new();
        for pos in CellPos::all() {
            sheet.set(pos, session.final_state().value_at(pos).to_string());
        }
        let score = session.submit(&sheet).unwrap();
        assert!(score.is_perfect());
        assert!(session.is_submitted());
        assert_eq!(session.submit(&sheet), Err(AlreadySubmittedError));
    }

    #[test]
    fn test_session_counter_invalidates_stale_tokens() {
        let mut counter = SessionCounter::new();
        let first = counter.begin();
        assert!(counter.is_current(first));

        let second = counter.begin();
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
    }
}
