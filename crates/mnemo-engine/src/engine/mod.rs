//! Session orchestration on top of the pure core domains.
//!
//! This module ties the configuration types together into playable puzzle
//! sessions:
//!
//! - [`Transformable`] / [`Replay`] - fold a command sequence over a
//!   configuration and record every intermediate snapshot
//! - [`SessionSeed`] and the command generators - reproducible random
//!   command sequences per domain
//! - [`AnswerSheet`] / [`Score`] / [`Scoreable`] - grade a reconstruction
//!   against the true final configuration
//! - [`Session`] - one generate → replay → submit-once run
//! - [`SessionCounter`] - generation tokens that let a presentation layer
//!   discard callbacks belonging to a superseded session
//!
//! # Example
//!
//! ```
//! use mnemo_engine::{Grid, GridWeights, Session, SessionSeed};
//!
//! let seed: SessionSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let session = Session::ordered_grid(seed, 5, &GridWeights::default());
//!
//! // history records the start plus one snapshot per command
//! assert_eq!(session.replay().len(), 6);
//! assert_eq!(session.initial(), &Grid::ordered());
//! ```

pub use self::{generate::*, replay::*, score::*, session::*};

mod generate;
mod replay;
mod score;
mod session;
