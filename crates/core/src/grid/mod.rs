//! Flat grids that terrain is displaced from

pub mod plane;

pub use plane::{validate_grid, PlaneGrid};
