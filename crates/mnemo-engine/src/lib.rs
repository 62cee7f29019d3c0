pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Rejected command parameters.
///
/// Raised by the validating command constructors, never at apply time:
/// a command that exists is always well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CommandError {
    #[display("swap cells must be distinct, both are {_0}")]
    SwapCellsEqual(#[error(not(source))] CellPos),
    #[display("row index {row} out of range 0..{len}")]
    RowOutOfRange { row: usize, len: usize },
    #[display("laser coordinates ({a}, {b}) out of range 0..{len}")]
    LaserOutOfRange { a: usize, b: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("session answer already submitted")]
pub struct AlreadySubmittedError;
