//! Board grid: generation, capital placement and the dead-cell ritual.

pub mod grid;

pub use grid::*;
