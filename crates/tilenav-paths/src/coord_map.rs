//! Sparse/dense visited map keyed by packed cell coordinates.

use tilenav_core::{Direction, GridCoord};

#[derive(Clone, Copy, Debug)]
struct Entry {
    key: u32,
    value: Direction,
}

/// Sparse/dense map from a packed cell coordinate to the direction that
/// reached it.
///
/// `sparse` holds one slot per grid cell pointing into `dense`. A slot is
/// only trusted when the dense entry it points at carries the same key, so
/// [`reset`](Self::reset) just truncates `dense` and leaves `sparse` stale.
#[derive(Clone, Debug)]
pub struct CoordMap {
    num_cols: i32,
    num_rows: i32,
    sparse: Vec<u32>,
    dense: Vec<Entry>,
}

impl CoordMap {
    /// Create a map able to address every cell of a `num_cols` x `num_rows`
    /// grid.
    pub fn new(num_cols: i32, num_rows: i32) -> Self {
        let num_cols = num_cols.max(0);
        let num_rows = num_rows.max(0);
        let size = num_cols as usize * num_rows as usize;
        Self {
            num_cols,
            num_rows,
            sparse: vec![0; size],
            dense: Vec::with_capacity(size / 8),
        }
    }

    /// The key for `c`, or `None` if `c` is outside the map.
    #[inline]
    pub fn pack_coord(&self, c: GridCoord) -> Option<u32> {
        if c.x < 0 || c.y < 0 || c.x >= self.num_cols || c.y >= self.num_rows {
            return None;
        }
        Some((c.y * self.num_cols + c.x) as u32)
    }

    #[inline]
    fn dense_index(&self, key: u32) -> Option<usize> {
        let i = *self.sparse.get(key as usize)? as usize;
        match self.dense.get(i) {
            Some(e) if e.key == key => Some(i),
            _ => None,
        }
    }

    /// The direction stored for `key`, if any.
    #[inline]
    pub fn get(&self, key: u32) -> Option<Direction> {
        self.dense_index(key).map(|i| self.dense[i].value)
    }

    /// Whether `key` has a value.
    #[inline]
    pub fn contains(&self, key: u32) -> bool {
        self.dense_index(key).is_some()
    }

    /// Store `dir` for `key`. Keys outside the map are ignored.
    pub fn set(&mut self, key: u32, dir: Direction) {
        if key as usize >= self.sparse.len() {
            return;
        }
        if let Some(i) = self.dense_index(key) {
            self.dense[i].value = dir;
            return;
        }
        self.sparse[key as usize] = self.dense.len() as u32;
        self.dense.push(Entry { key, value: dir });
    }

    /// Forget every entry without releasing memory.
    #[inline]
    pub fn reset(&mut self) {
        self.dense.clear();
    }

    /// Number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }
}
