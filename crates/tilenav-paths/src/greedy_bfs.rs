//! Greedy best-first path search.
//!
//! Moves that bring a node strictly closer to the goal (Manhattan distance)
//! go on a LIFO "hot" list and are followed immediately. Every other move is
//! deferred to a min-heap keyed by distance to the goal, which is what lets
//! the search back out of dead ends and walk around obstacles. Paths are
//! not guaranteed to be shortest.

use tilenav_core::{Direction, Grid, GridCoord, GridLayer};

use crate::coord_map::CoordMap;
use crate::grid_path::GridPath;
use crate::priority_queue::PriorityQueue;

/// The outcome of [`GreedyBfs::build_path`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildPathResult {
    /// Steps from the start towards `finish`, in travel order.
    pub steps: GridPath,
    /// Where following `steps` ends up.
    pub finish: GridCoord,
    /// Set when `finish` is not the requested destination.
    pub partial: bool,
}

#[derive(Copy, Clone, Debug)]
struct WeightedCoord {
    coord: GridCoord,
    weight: i32,
}

/// A reusable search slot sized for one grid's dimensions.
///
/// All scratch state is allocated up front and reset at the start of each
/// [`build_path`](Self::build_path) call, so steady-state queries do not
/// allocate.
pub struct GreedyBfs {
    num_cols: i32,
    num_rows: i32,
    visited: CoordMap,
    heap: PriorityQueue<WeightedCoord>,
    hot: Vec<WeightedCoord>,
}

impl GreedyBfs {
    /// Create a search slot for a `num_cols` x `num_rows` grid.
    pub fn new(num_cols: i32, num_rows: i32) -> Self {
        Self {
            num_cols,
            num_rows,
            visited: CoordMap::new(num_cols, num_rows),
            heap: PriorityQueue::with_capacity(64),
            hot: Vec::with_capacity(32),
        }
    }

    #[inline]
    pub fn num_cols(&self) -> i32 {
        self.num_cols
    }

    #[inline]
    pub fn num_rows(&self) -> i32 {
        self.num_rows
    }

    /// Find a path from `from` to `to` through cells that are passable
    /// under `layer`.
    ///
    /// If `to` cannot be reached, or reaching it would take more than
    /// [`GridPath::MAX_STEPS`] steps, the result is partial: it leads to the
    /// cell closest to `to` (or to where the step cap was hit).
    pub fn build_path(
        &mut self,
        grid: &Grid,
        from: GridCoord,
        to: GridCoord,
        layer: GridLayer,
    ) -> BuildPathResult {
        if from == to {
            return BuildPathResult::default();
        }

        if grid.num_cols() > self.num_cols || grid.num_rows() > self.num_rows {
            log::debug!(
                "search slot is {}x{} but grid is {}x{}, cells outside the slot are skipped",
                self.num_cols,
                self.num_rows,
                grid.num_cols(),
                grid.num_rows()
            );
        }

        self.visited.reset();
        self.heap.reset();
        self.hot.clear();
        self.hot.push(WeightedCoord {
            coord: from,
            weight: 0,
        });

        let max_weight = GridPath::MAX_STEPS as i32;
        let mut shortest_dist = i32::MAX;
        let mut fallback = from;

        loop {
            let Some(current) = self.hot.pop().or_else(|| self.heap.pop()) else {
                break;
            };

            if current.coord == to {
                return BuildPathResult {
                    steps: self.construct_path(from, to),
                    finish: to,
                    partial: false,
                };
            }

            if current.weight >= max_weight {
                log::trace!(
                    "path {from} -> {to} capped at {} steps, stopping at {}",
                    max_weight,
                    current.coord
                );
                return BuildPathResult {
                    steps: self.construct_path(from, current.coord),
                    finish: current.coord,
                    partial: true,
                };
            }

            let dist = current.coord.dist(to);
            if dist < shortest_dist {
                shortest_dist = dist;
                fallback = current.coord;
            }

            for dir in Direction::ALL {
                let next = current.coord.moved(dir);
                if grid.get_cell_value(next, layer) == 0 {
                    continue;
                }
                let Some(key) = self.visited.pack_coord(next) else {
                    continue;
                };
                if self.visited.contains(key) {
                    continue;
                }
                self.visited.set(key, dir);

                let item = WeightedCoord {
                    coord: next,
                    weight: current.weight + 1,
                };
                let next_dist = next.dist(to);
                if next_dist < dist {
                    self.hot.push(item);
                } else {
                    self.heap.push(next_dist, item);
                }
            }
        }

        log::trace!("path {from} -> {to} unreachable, closest cell is {fallback}");
        BuildPathResult {
            steps: self.construct_path(from, fallback),
            finish: fallback,
            partial: true,
        }
    }

    /// Walk the recorded directions back from `to` to `from`.
    fn construct_path(&self, from: GridCoord, to: GridCoord) -> GridPath {
        let mut path = GridPath::default();
        let mut pos = to;
        while pos != from {
            let Some(dir) = self
                .visited
                .pack_coord(pos)
                .and_then(|key| self.visited.get(key))
            else {
                break;
            };
            if !path.push(dir) {
                break;
            }
            pos = pos.reversed_move(dir);
        }
        path.rewind();
        path
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for GreedyBfs {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&(self.num_cols, self.num_rows), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GreedyBfs {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (num_cols, num_rows) = <(i32, i32) as serde::Deserialize>::deserialize(deserializer)?;
        Ok(GreedyBfs::new(num_cols, num_rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};
    use std::collections::{HashSet, VecDeque};
    use tilenav_core::CELL_SIZE;

    const GROUND: GridLayer = GridLayer::new(1, 0, 0, 1);
    const FLYING: GridLayer = GridLayer::new(1, 0, 1, 1);

    fn new_grid(cols: i32, rows: i32) -> Grid {
        Grid::new(f64::from(cols * CELL_SIZE), f64::from(rows * CELL_SIZE), 0)
    }

    /// Build a grid from rows of text: `.` free, `x` tag 1, `w` tag 2,
    /// `A` start, `B` destination.
    fn parse_grid(rows: &[&str]) -> (Grid, GridCoord, GridCoord) {
        let mut g = new_grid(rows[0].len() as i32, rows.len() as i32);
        let (mut from, mut to) = (GridCoord::ZERO, GridCoord::ZERO);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let c = GridCoord::new(x as i32, y as i32);
                match ch {
                    'x' => g.set_cell_tag(c, 1),
                    'w' => g.set_cell_tag(c, 2),
                    'A' => from = c,
                    'B' => to = c,
                    _ => {}
                }
            }
        }
        (g, from, to)
    }

    /// Follow `path` from `from`, checking every cell is passable and
    /// visited once. Returns the end cell.
    fn walk(grid: &Grid, layer: GridLayer, from: GridCoord, path: &GridPath) -> GridCoord {
        let mut seen = HashSet::from([from]);
        let mut pos = from;
        for d in path.iter() {
            pos = pos.moved(d);
            assert_ne!(grid.get_cell_value(pos, layer), 0, "stepped onto blocked {pos}");
            assert!(seen.insert(pos), "revisited {pos}");
        }
        pos
    }

    /// Shortest path length in steps, if `to` is reachable.
    fn bfs_dist(grid: &Grid, layer: GridLayer, from: GridCoord, to: GridCoord) -> Option<i32> {
        let mut dist = std::collections::HashMap::from([(from, 0)]);
        let mut queue = VecDeque::from([from]);
        while let Some(c) = queue.pop_front() {
            if c == to {
                return dist.get(&c).copied();
            }
            let d = dist[&c];
            for dir in Direction::ALL {
                let n = c.moved(dir);
                if grid.get_cell_value(n, layer) != 0 && !dist.contains_key(&n) {
                    dist.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        None
    }

    #[test]
    fn same_cell_is_empty_and_complete() {
        let g = new_grid(4, 4);
        let mut bfs = GreedyBfs::new(4, 4);
        let c = GridCoord::new(2, 2);
        let res = bfs.build_path(&g, c, c, GROUND);
        assert_eq!(res, BuildPathResult::default());
        assert!(!res.partial);
        assert!(res.steps.is_empty());
    }

    #[test]
    fn open_grid_3x3() {
        let g = new_grid(3, 3);
        let mut bfs = GreedyBfs::new(3, 3);
        let from = GridCoord::new(0, 0);
        let to = GridCoord::new(2, 2);
        let res = bfs.build_path(&g, from, to, GROUND);
        assert!(!res.partial);
        assert_eq!(res.finish, to);
        assert_eq!(res.steps.len(), 4);
        assert_eq!(res.steps.to_string(), "{Down,Down,Right,Right}");
        assert!(
            res.steps
                .iter()
                .all(|d| d == Direction::Right || d == Direction::Down)
        );
        assert_eq!(walk(&g, GROUND, from, &res.steps), to);
    }

    #[test]
    fn playback_with_next_step() {
        let g = new_grid(5, 1);
        let mut bfs = GreedyBfs::new(5, 1);
        let mut res = bfs.build_path(&g, GridCoord::new(4, 0), GridCoord::new(1, 0), GROUND);
        let mut n = 0;
        while res.steps.has_next() {
            assert_eq!(res.steps.next_step(), Some(Direction::Left));
            n += 1;
        }
        assert_eq!(n, 3);
    }

    #[test]
    fn detours_around_wall() {
        let (g, from, to) = parse_grid(&[
            ".......",
            "..x....",
            "A.x..B.",
            "..x....",
            ".......",
        ]);
        let mut bfs = GreedyBfs::new(g.num_cols(), g.num_rows());
        let res = bfs.build_path(&g, from, to, GROUND);
        assert!(!res.partial);
        assert_eq!(walk(&g, GROUND, from, &res.steps), to);
        assert!(res.steps.len() >= 7);
    }

    #[test]
    fn escapes_dead_end_pocket() {
        let (g, from, to) = parse_grid(&[
            "........",
            ".xxxxx..",
            ".A...x.B",
            ".xxxxx..",
            "........",
        ]);
        let mut bfs = GreedyBfs::new(g.num_cols(), g.num_rows());
        let res = bfs.build_path(&g, from, to, GROUND);
        assert!(!res.partial);
        assert_eq!(walk(&g, GROUND, from, &res.steps), to);
    }

    #[test]
    fn sealed_destination_gives_closest_cell() {
        let (g, from, to) = parse_grid(&[
            "A......",
            ".......",
            "....x..",
            "...xBx.",
            "....x..",
        ]);
        let mut bfs = GreedyBfs::new(g.num_cols(), g.num_rows());
        let res = bfs.build_path(&g, from, to, GROUND);
        assert!(res.partial);
        assert_eq!(res.finish.dist(to), 2);
        assert_eq!(walk(&g, GROUND, from, &res.steps), res.finish);

        // Every reachable cell is at least as far from the goal.
        for y in 0..g.num_rows() {
            for x in 0..g.num_cols() {
                let c = GridCoord::new(x, y);
                if bfs_dist(&g, GROUND, from, c).is_some() {
                    assert!(c.dist(to) >= res.finish.dist(to));
                }
            }
        }
    }

    #[test]
    fn blocked_start_neighbors_stay_put() {
        let (g, from, to) = parse_grid(&[
            ".x...",
            "xA..B",
            ".x...",
        ]);
        let mut g = g;
        g.mark_cell(GridCoord::new(2, 1));
        let mut bfs = GreedyBfs::new(g.num_cols(), g.num_rows());
        let res = bfs.build_path(&g, from, to, GROUND);
        assert!(res.partial);
        assert_eq!(res.finish, from);
        assert!(res.steps.is_empty());
    }

    #[test]
    fn out_of_grid_destination_is_partial() {
        let g = new_grid(4, 4);
        let mut bfs = GreedyBfs::new(4, 4);
        let from = GridCoord::new(0, 0);
        let res = bfs.build_path(&g, from, GridCoord::new(10, 1), GROUND);
        assert!(res.partial);
        assert_eq!(res.finish, GridCoord::new(3, 1));
        assert_eq!(walk(&g, GROUND, from, &res.steps), res.finish);
    }

    #[test]
    fn layers_share_one_grid() {
        let (g, from, to) = parse_grid(&[
            ".wwwwwww.",
            ".w.....w.",
            "Aw.....wB",
            ".w.....w.",
            ".wwwwwww.",
        ]);
        let mut bfs = GreedyBfs::new(g.num_cols(), g.num_rows());

        let flying = bfs.build_path(&g, from, to, FLYING);
        assert!(!flying.partial);
        assert_eq!(flying.steps.len(), 8);
        assert_eq!(walk(&g, FLYING, from, &flying.steps), to);

        let ground = bfs.build_path(&g, from, to, GROUND);
        assert_eq!(walk(&g, GROUND, from, &ground.steps), ground.finish);
        assert_ne!(ground, flying);
        assert!(ground.partial || ground.steps.len() > flying.steps.len());
    }

    #[test]
    fn long_path_hits_step_cap() {
        let g = new_grid(80, 1);
        let mut bfs = GreedyBfs::new(80, 1);
        let from = GridCoord::new(0, 0);
        let res = bfs.build_path(&g, from, GridCoord::new(79, 0), GROUND);
        assert!(res.partial);
        assert_eq!(res.steps.len(), GridPath::MAX_STEPS);
        assert_eq!(res.finish, GridCoord::new(GridPath::MAX_STEPS as i32, 0));
        assert_eq!(walk(&g, GROUND, from, &res.steps), res.finish);
    }

    #[test]
    fn exactly_max_steps_is_complete() {
        let g = new_grid(80, 1);
        let mut bfs = GreedyBfs::new(80, 1);
        let to = GridCoord::new(GridPath::MAX_STEPS as i32, 0);
        let res = bfs.build_path(&g, GridCoord::ZERO, to, GROUND);
        assert!(!res.partial);
        assert_eq!(res.steps.len(), GridPath::MAX_STEPS);
    }

    #[test]
    fn slot_smaller_than_grid_still_terminates() {
        let g = new_grid(10, 10);
        let mut bfs = GreedyBfs::new(5, 5);
        let from = GridCoord::new(1, 1);
        let res = bfs.build_path(&g, from, GridCoord::new(8, 8), GROUND);
        assert!(res.partial);
        assert_eq!(res.finish, GridCoord::new(4, 4));
        assert_eq!(walk(&g, GROUND, from, &res.steps), res.finish);
    }

    #[test]
    fn slot_reuse_matches_fresh_slot() {
        let (g, from, to) = parse_grid(&[
            "........",
            ".xxxxx..",
            ".A...x.B",
            ".xxxxx..",
            "........",
        ]);
        let mut reused = GreedyBfs::new(g.num_cols(), g.num_rows());
        reused.build_path(&g, to, from, GROUND);
        reused.build_path(&g, GridCoord::new(0, 0), GridCoord::new(7, 4), FLYING);
        let a = reused.build_path(&g, from, to, GROUND);
        let b = GreedyBfs::new(g.num_cols(), g.num_rows()).build_path(&g, from, to, GROUND);
        assert_eq!(a, b);
    }

    #[test]
    fn random_grids_hold_path_properties() {
        let mut rng = StdRng::seed_from_u64(0x7113);
        let (cols, rows) = (16, 12);
        let mut bfs = GreedyBfs::new(cols, rows);
        for round in 0..300 {
            let mut g = new_grid(cols, rows);
            for y in 0..rows {
                for x in 0..cols {
                    if rng.random_range(0..100) < 25 {
                        g.set_cell_tag(GridCoord::new(x, y), rng.random_range(1..4));
                    }
                }
            }
            let layer = if round % 2 == 0 { GROUND } else { FLYING };
            let from = GridCoord::new(rng.random_range(0..cols), rng.random_range(0..rows));
            let to = GridCoord::new(rng.random_range(0..cols), rng.random_range(0..rows));
            g.set_cell_tag(from, 0);

            let res = bfs.build_path(&g, from, to, layer);
            assert!(res.steps.len() <= GridPath::MAX_STEPS);
            let end = walk(&g, layer, from, &res.steps);
            if from == to {
                assert!(res.steps.is_empty());
                continue;
            }
            assert_eq!(end, res.finish, "round {round}");

            match bfs_dist(&g, layer, from, to) {
                None => assert!(res.partial, "round {round}: unreachable but complete"),
                // A reachable goal can only be missed by running into the step cap.
                Some(_) if res.partial => {
                    assert_eq!(res.steps.len(), GridPath::MAX_STEPS, "round {round}")
                }
                Some(d) => {
                    assert_eq!(end, to, "round {round}");
                    assert!(res.steps.len() as i32 >= d);
                }
            }

            // Identical inputs give identical results.
            assert_eq!(bfs.build_path(&g, from, to, layer), res);
        }
    }
}
