//! A fixed-capacity, 2-bit-per-step path.

use std::fmt;

use tilenav_core::Direction;

const PATH_BYTES: usize = 14;

/// A compact path of at most [`MAX_STEPS`](GridPath::MAX_STEPS) steps.
///
/// Steps are pushed goal-first while a search walks back from its target,
/// and iteration runs from the last pushed step to the first, so a path
/// plays back in travel order. Call [`rewind`](Self::rewind) to restart
/// playback.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPath {
    bytes: [u8; PATH_BYTES],
    len: u16,
    pos: u16,
}

impl GridPath {
    /// Size of the step buffer in bytes.
    pub const BYTES: usize = PATH_BYTES;

    /// Longest path that can be stored.
    pub const MAX_STEPS: usize = Self::BYTES * 4;

    /// Build a path that plays back `dirs` in order. Only the first
    /// [`MAX_STEPS`](Self::MAX_STEPS) directions are kept.
    pub fn from_dirs(dirs: &[Direction]) -> Self {
        let mut p = Self::default();
        if dirs.len() > Self::MAX_STEPS {
            log::warn!(
                "route of {} steps truncated to {}",
                dirs.len(),
                Self::MAX_STEPS
            );
        }
        for &d in dirs[..dirs.len().min(Self::MAX_STEPS)].iter().rev() {
            p.push(d);
        }
        p.rewind();
        p
    }

    /// Append a step. Returns `false` and leaves the path untouched when it
    /// is already full.
    pub fn push(&mut self, dir: Direction) -> bool {
        let i = self.len as usize;
        if i >= Self::MAX_STEPS {
            log::warn!("grid path is full ({} steps), dropping {dir}", Self::MAX_STEPS);
            return false;
        }
        let shift = (i % 4) * 2;
        let b = &mut self.bytes[i / 4];
        *b = (*b & !(0b11 << shift)) | (dir.bits() << shift);
        self.len += 1;
        self.pos += 1;
        true
    }

    /// The step at push index `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<Direction> {
        if i >= self.len as usize {
            return None;
        }
        Some(Direction::from_bits(self.bytes[i / 4] >> ((i % 4) * 2)))
    }

    /// Number of steps stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Restart playback from the first travel step.
    #[inline]
    pub fn rewind(&mut self) {
        self.pos = self.len;
    }

    /// Whether playback has steps left.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.pos != 0
    }

    /// The next travel step, advancing playback.
    #[inline]
    pub fn next_step(&mut self) -> Option<Direction> {
        let d = self.current()?;
        self.pos -= 1;
        Some(d)
    }

    /// The next travel step without advancing.
    #[inline]
    pub fn current(&self) -> Option<Direction> {
        self.get((self.pos as usize).checked_sub(1)?)
    }

    /// The next two travel steps without advancing.
    pub fn peek2(&self) -> (Option<Direction>, Option<Direction>) {
        let pos = self.pos as usize;
        let at = |back: usize| pos.checked_sub(back).and_then(|i| self.get(i));
        (at(1), at(2))
    }

    /// Advance playback by up to `n` steps.
    #[inline]
    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_sub(n.min(u16::MAX as usize) as u16);
    }

    /// Steps remaining from the current playback position, in travel order.
    pub fn iter(&self) -> Steps<'_> {
        Steps {
            path: self,
            pos: self.pos as usize,
        }
    }
}

/// Non-consuming iterator over a [`GridPath`]'s remaining steps.
#[derive(Clone, Debug)]
pub struct Steps<'a> {
    path: &'a GridPath,
    pos: usize,
}

impl Iterator for Steps<'_> {
    type Item = Direction;

    fn next(&mut self) -> Option<Direction> {
        self.pos = self.pos.checked_sub(1)?;
        self.path.get(self.pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.pos, Some(self.pos))
    }
}

impl ExactSizeIterator for Steps<'_> {}

impl<'a> IntoIterator for &'a GridPath {
    type Item = Direction;
    type IntoIter = Steps<'a>;

    fn into_iter(self) -> Steps<'a> {
        self.iter()
    }
}

impl fmt::Display for GridPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, d) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{d}")?;
        }
        f.write_str("}")
    }
}
