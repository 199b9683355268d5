//! **tilenav-core** — storage and geometry types for tile-based navigation.
//!
//! This crate provides the pieces the path search is built on: cardinal
//! [`Direction`]s, integer [`GridCoord`]s, and the bit-packed [`Grid`] whose
//! 2-bit cell tags are interpreted through a caller-supplied [`GridLayer`].

pub mod geom;
pub mod grid;

pub use geom::{Direction, GridCoord, Vec2};
pub use grid::{CELL_SIZE, FREE_TAG, Grid, GridLayer, MARKED_TAG};
