use crate::rule::{birth_tag, next_state};
use anyhow::{anyhow, Context, Result};
use rand::{Rng, SeedableRng};
use std::fmt;

/// State of a single cell; any non-zero value is alive.
pub type CellState = u8;

/// State of a dead cell.
pub const DEAD: CellState = 0;

/// Colour tags of the two-colour variant. The single-population variant
/// only ever uses [`Player::One`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl TryFrom<CellState> for Player {
    type Error = anyhow::Error;

    fn try_from(value: CellState) -> Result<Self> {
        match value {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            _ => Err(anyhow!("{} is not a player tag", value)),
        }
    }
}

const NEIGHBOUR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A fixed-size rectangle of cells with zero-padded borders.
///
/// # Overview
///
/// Cells are stored densely in row-major order, cell `(i, j)` at index
/// `j * width + i`. Everything outside `[0, width) x [0, height)` reads as
/// dead, which is the only boundary policy: the field is neither a torus
/// nor growable.
///
/// Every transformation ([`tick`](Grid::tick), [`copy_from`](Grid::copy_from),
/// [`rotate90`](Grid::rotate90), [`change_player`](Grid::change_player))
/// returns a new grid and leaves the receiver untouched. Once a grid is handed
/// out (typically as an `Arc<Grid>`) it is never written again, so a consumer
/// may keep reading one generation while the next one is being computed.
///
/// # Variants
///
/// In the single-population variant every live cell holds
/// [`Player::One`]. In the two-colour variant live cells hold the tag of
/// their owner; the tag never affects the rule, only the colour chosen for
/// newborn cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid with all cells dead.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or the cells cannot be
    /// allocated.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(anyhow!("Grid must not be empty: {}x{}", width, height));
        }
        let len = width
            .checked_mul(height)
            .ok_or_else(|| anyhow!("Grid {}x{} is too large", width, height))?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .with_context(|| format!("Failed to allocate a {}x{} grid", width, height))?;
        cells.resize(len, DEAD);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Dimensions must already be validated.
    pub(crate) fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![DEAD; width * height],
        }
    }

    /// Creates a grid where every cell is alive with probability `density`.
    ///
    /// # Arguments
    ///
    /// * `seed` - Optional seed for the random number generator.
    ///   If None, seeds from the OS.
    ///
    /// # Errors
    ///
    /// Returns an error for empty dimensions or a density outside `[0, 1]`.
    pub fn random(width: usize, height: usize, density: f64, seed: Option<u64>) -> Result<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(anyhow!("Density {} is outside [0, 1]", density));
        }
        let mut grid = Self::new(width, height)?;
        let mut rng = if let Some(x) = seed {
            rand_chacha::ChaCha8Rng::seed_from_u64(x)
        } else {
            rand_chacha::ChaCha8Rng::from_os_rng()
        };
        for cell in grid.cells.iter_mut() {
            if rng.random_bool(density) {
                *cell = Player::One as CellState;
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw cells in row-major order.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Returns the state of an in-bounds cell.
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` is out of bounds; use [`get_safe`](Grid::get_safe)
    /// for neighbourhood reads.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> CellState {
        debug_assert!(i < self.width && j < self.height);
        self.cells[j * self.width + i]
    }

    /// Returns the state at `(i, j)`, or [`DEAD`] anywhere outside the grid.
    #[inline]
    pub fn get_safe(&self, i: i64, j: i64) -> CellState {
        if i < 0 || j < 0 || i as u64 >= self.width as u64 || j as u64 >= self.height as u64 {
            return DEAD;
        }
        self.cells[j as usize * self.width + i as usize]
    }

    /// Writes an in-bounds cell. Only used on a grid that has not been
    /// published yet.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: CellState) {
        debug_assert!(i < self.width && j < self.height);
        self.cells[j * self.width + i] = value;
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&x| x != DEAD).count()
    }

    /// Returns the live neighbour count of `(i, j)` and the sum of their tags.
    #[inline]
    pub(crate) fn neighbourhood(&self, i: usize, j: usize) -> (u32, u32) {
        let (i, j) = (i as i64, j as i64);
        NEIGHBOUR_OFFSETS
            .iter()
            .map(|&(di, dj)| self.get_safe(i + di, j + dj))
            .fold((0, 0), |(count, sum), x| {
                (count + (x != DEAD) as u32, sum + x as u32)
            })
    }

    /// Computes the next generation by counting the neighbours of every cell.
    ///
    /// Survivors keep their tag, newborn cells get the tag picked from the
    /// tags of their three parents.
    pub fn tick(&self) -> Self {
        let mut next = Self::blank(self.width, self.height);
        for j in 0..self.height {
            for i in 0..self.width {
                let state = self.get(i, j);
                let alive = state != DEAD;
                let (count, tag_sum) = self.neighbourhood(i, j);
                if next_state(alive, count) {
                    next.set(i, j, if alive { state } else { birth_tag(tag_sum) });
                }
            }
        }
        next
    }

    /// Returns a copy with `pattern` stamped at `(offset_x, offset_y)`.
    ///
    /// Every cell of the pattern, dead ones included, overwrites the target
    /// cell. Cells that would land outside the grid are dropped.
    pub fn copy_from(&self, pattern: &Grid, offset_x: i64, offset_y: i64) -> Self {
        let mut result = self.clone();
        for j in 0..pattern.height {
            let y = offset_y + j as i64;
            if y < 0 {
                continue;
            }
            if y as u64 >= self.height as u64 {
                break;
            }
            for i in 0..pattern.width {
                let x = offset_x + i as i64;
                if x < 0 {
                    continue;
                }
                if x as u64 >= self.width as u64 {
                    break;
                }
                result.set(x as usize, y as usize, pattern.get(i, j));
            }
        }
        result
    }

    /// Rotates a quarter turn clockwise: `(i, j)` moves to `(height - 1 - j, i)`.
    pub fn rotate90(&self) -> Self {
        let mut result = Self::blank(self.height, self.width);
        for j in 0..self.height {
            for i in 0..self.width {
                result.set(self.height - 1 - j, i, self.get(i, j));
            }
        }
        result
    }

    /// Returns a copy where every live cell belongs to `player`.
    pub fn change_player(&self, player: Player) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: self
                .cells
                .iter()
                .map(|&x| if x == DEAD { DEAD } else { player as CellState })
                .collect(),
        }
    }
}

impl fmt::Display for Grid {
    /// One text row per grid row: `-` dead, `o` player one, `x` player two.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            for &x in row {
                let c = match x {
                    DEAD => '-',
                    1 => 'o',
                    _ => 'x',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
