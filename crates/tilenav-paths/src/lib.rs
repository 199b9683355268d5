//! Allocation-free path search for tile-based games.
//!
//! The engine answers many short queries per simulation tick against one
//! shared [`Grid`](tilenav_core::Grid):
//!
//! - **Greedy best-first search** ([`GreedyBfs::build_path`]) returning a
//!   compact [`GridPath`] of at most [`GridPath::MAX_STEPS`] steps
//! - **Visited map** ([`CoordMap`]) with O(1) reset
//! - **Min-heap** ([`PriorityQueue`]) with insertion-order-only tie breaking
//!
//! A [`GreedyBfs`] owns and reuses its scratch structures, so keep one per
//! concurrent search slot and repeated queries incur no allocations. Results
//! depend only on the grid contents and the query, never on prior calls.

mod coord_map;
mod greedy_bfs;
mod grid_path;
mod priority_queue;

pub use coord_map::CoordMap;
pub use greedy_bfs::{BuildPathResult, GreedyBfs};
pub use grid_path::{GridPath, Steps};
pub use priority_queue::PriorityQueue;
