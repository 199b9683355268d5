//! The [`Grid`] obstacle map and the [`GridLayer`] passability policy.
//!
//! Every cell stores a 2-bit class tag (four cells per byte). A tag carries
//! no meaning by itself: a [`GridLayer`] maps each of the four tags to a
//! passability byte, so one grid can answer "can a ground unit stand here?"
//! and "can a flyer stand here?" from the same storage.

use crate::geom::{GridCoord, Vec2};

/// Side length of one grid cell, in world units.
pub const CELL_SIZE: i32 = 32;

const CELL_SIZE_F: f64 = CELL_SIZE as f64;

/// Tag written by [`Grid::mark_cell`].
pub const MARKED_TAG: u8 = 1;

/// Tag considered free by [`Grid::cell_is_free`].
pub const FREE_TAG: u8 = 0;

// ---------------------------------------------------------------------------
// GridLayer
// ---------------------------------------------------------------------------

/// Four 8-bit passability entries packed by tag index.
///
/// An entry of 0 means cells with that tag are impassable under this layer;
/// anything else is passable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayer(u32);

impl GridLayer {
    /// Pack the values for tags 0, 1, 2 and 3.
    #[inline]
    pub const fn new(v0: u8, v1: u8, v2: u8, v3: u8) -> Self {
        Self(v0 as u32 | (v1 as u32) << 8 | (v2 as u32) << 16 | (v3 as u32) << 24)
    }

    /// The entry for `tag`. Only the low two bits of `tag` are used.
    #[inline]
    pub const fn get(self, tag: u8) -> u8 {
        ((self.0 >> ((tag & 0b11) as u32 * 8)) & 0xFF) as u8
    }

    /// The packed representation.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for GridLayer {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A bit-packed map of cell class tags over a continuous world.
///
/// The world is cut into `CELL_SIZE`-sized square cells; partial cells at
/// the right and bottom edges are dropped. Anything outside
/// `[0, num_cols) x [0, num_rows)` is always blocked.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    world_width: f64,
    world_height: f64,
    num_cols: i32,
    num_rows: i32,
    bytes: Vec<u8>,
}

impl Grid {
    /// Create a grid covering a `world_width` x `world_height` world with
    /// every cell set to `default_tag` (0..=3).
    pub fn new(world_width: f64, world_height: f64, default_tag: u8) -> Self {
        let num_cols = (world_width / CELL_SIZE_F).floor().max(0.0) as i32;
        let num_rows = (world_height / CELL_SIZE_F).floor().max(0.0) as i32;
        let num_cells = num_cols as usize * num_rows as usize;
        let mut g = Self {
            world_width,
            world_height,
            num_cols,
            num_rows,
            bytes: vec![0; num_cells.div_ceil(4)],
        };
        if default_tag != 0 {
            g.fill(default_tag);
        }
        g
    }

    /// Number of columns.
    #[inline]
    pub fn num_cols(&self) -> i32 {
        self.num_cols
    }

    /// Number of rows.
    #[inline]
    pub fn num_rows(&self) -> i32 {
        self.num_rows
    }

    /// World width this grid was built for.
    #[inline]
    pub fn world_width(&self) -> f64 {
        self.world_width
    }

    /// World height this grid was built for.
    #[inline]
    pub fn world_height(&self) -> f64 {
        self.world_height
    }

    /// Whether `c` is inside the grid.
    #[inline]
    pub fn contains(&self, c: GridCoord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.num_cols && c.y < self.num_rows
    }

    #[inline]
    fn cell_index(&self, c: GridCoord) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        Some(c.y as usize * self.num_cols as usize + c.x as usize)
    }

    /// Set every cell to `tag`.
    pub fn fill(&mut self, tag: u8) {
        let t = tag & 0b11;
        let pattern = t | t << 2 | t << 4 | t << 6;
        self.bytes.fill(pattern);
    }

    /// Overwrite the tag of cell `c`. No-op outside the grid.
    pub fn set_cell_tag(&mut self, c: GridCoord, tag: u8) {
        let Some(i) = self.cell_index(c) else {
            return;
        };
        let shift = (i % 4) * 2;
        let b = &mut self.bytes[i / 4];
        *b = (*b & !(0b11 << shift)) | ((tag & 0b11) << shift);
    }

    /// The tag of cell `c`, or `None` outside the grid.
    #[inline]
    pub fn get_cell_tag(&self, c: GridCoord) -> Option<u8> {
        let i = self.cell_index(c)?;
        Some((self.bytes[i / 4] >> ((i % 4) * 2)) & 0b11)
    }

    /// The passability value of cell `c` under `layer`. 0 means blocked;
    /// cells outside the grid are always 0.
    #[inline]
    pub fn get_cell_value(&self, c: GridCoord, layer: GridLayer) -> u8 {
        match self.get_cell_tag(c) {
            Some(tag) => layer.get(tag),
            None => 0,
        }
    }

    /// Tag cell `c` with [`MARKED_TAG`].
    pub fn mark_cell(&mut self, c: GridCoord) {
        self.set_cell_tag(c, MARKED_TAG);
    }

    /// Whether cell `c` is inside the grid and tagged [`FREE_TAG`].
    pub fn cell_is_free(&self, c: GridCoord) -> bool {
        self.get_cell_tag(c) == Some(FREE_TAG)
    }

    // -----------------------------------------------------------------------
    // World <-> grid conversions
    // -----------------------------------------------------------------------

    /// The cell containing world position `pos`.
    #[inline]
    pub fn pos_to_coord(&self, pos: Vec2) -> GridCoord {
        GridCoord::new(
            (pos.x / CELL_SIZE_F).floor() as i32,
            (pos.y / CELL_SIZE_F).floor() as i32,
        )
    }

    /// The world position of the center of cell `c`.
    #[inline]
    pub fn coord_to_pos(&self, c: GridCoord) -> Vec2 {
        let half = CELL_SIZE_F / 2.0;
        Vec2::new(
            f64::from(c.x) * CELL_SIZE_F + half,
            f64::from(c.y) * CELL_SIZE_F + half,
        )
    }

    /// Snap `pos` to the center of its cell.
    #[inline]
    pub fn align_pos(&self, pos: Vec2) -> Vec2 {
        self.coord_to_pos(self.pos_to_coord(pos))
    }

    /// Snap `pos` to the nearest corner of its cell, which is the center of
    /// a 2x2 block of cells.
    pub fn align_pos_2x2(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            (pos.x / CELL_SIZE_F).round() * CELL_SIZE_F,
            (pos.y / CELL_SIZE_F).round() * CELL_SIZE_F,
        )
    }

    /// Pack `c` into a single index: X in the low 16 bits, Y in the high 16.
    ///
    /// Components are truncated to 16 bits, so only coordinates in
    /// `0..=65535` round-trip through [`index_to_coord`](Self::index_to_coord).
    #[inline]
    pub fn coord_to_index(&self, c: GridCoord) -> u32 {
        (c.x as u16 as u32) | (c.y as u16 as u32) << 16
    }

    /// Inverse of [`coord_to_index`](Self::coord_to_index).
    #[inline]
    pub fn index_to_coord(&self, index: u32) -> GridCoord {
        GridCoord::new((index & 0xFFFF) as i32, (index >> 16) as i32)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_round_trip() {
        let mut g = Grid::new(4.0 * 32.0, 4.0 * 32.0, 0);
        g.set_cell_tag(GridCoord::new(1, 2), 3);
        g.mark_cell(GridCoord::new(0, 0));
        let json = serde_json::to_string(&g).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
        assert_eq!(back.get_cell_tag(GridCoord::new(1, 2)), Some(3));
    }

    #[test]
    fn layer_round_trip() {
        let l = GridLayer::new(1, 0, 2, 0);
        let json = serde_json::to_string(&l).unwrap();
        let back: GridLayer = serde_json::from_str(&json).unwrap();
        assert_eq!(l, back);
    }
}
