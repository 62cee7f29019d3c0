pub use self::{cube::*, die::*, grid::*};

pub mod cube;
pub mod die;
pub mod grid;
