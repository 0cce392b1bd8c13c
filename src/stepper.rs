use crate::{rule::birth_tag, CellState, Grid, Player, TransitionTable, DEAD};
use anyhow::{anyhow, Result};
use std::sync::Arc;

/// Strategy advancing a [`Grid`] by one generation.
pub trait Stepper {
    /// Computes the next generation of `grid`.
    ///
    /// Implementations must return a new grid and leave `grid` untouched, and
    /// all of them must agree cell for cell with [`Grid::tick`].
    fn step(&self, grid: &Grid) -> Grid;

    /// Short human-readable name used in reports.
    fn name(&self) -> &'static str;
}

/// Steps by counting the neighbours of every cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectStepper;

impl Stepper for DirectStepper {
    fn step(&self, grid: &Grid) -> Grid {
        grid.tick()
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Steps by looking up whole windows in a [`TransitionTable`].
///
/// # Overview
///
/// The grid is covered by `size x size` windows whose top-left corners start
/// at `(-1, -1)` and advance by `size - 2` on both axes, so neighbouring
/// windows overlap by the two border columns (rows) and their interiors tile
/// the grid exactly. Cells outside the grid read as dead. Each window is
/// packed into a table index and the interior bits of the entry are written
/// to the output; interior cells falling outside the grid are dropped.
///
/// Live cells of the output keep their previous tag and newborn cells get
/// the tag [`Grid::tick`] would give them, so both steppers agree in the
/// two-colour variant as well. Newborn neighbourhoods are only inspected when
/// the grid holds a tag other than [`Player::One`]; otherwise every newborn
/// is [`Player::One`].
///
/// # Example
///
/// ```rust
/// use gol_lookup::{AcceleratedStepper, Grid, Stepper, TransitionTable};
/// use std::sync::Arc;
///
/// let table = Arc::new(TransitionTable::build(3).unwrap());
/// let stepper = AcceleratedStepper::new(table);
///
/// let grid = Grid::random(64, 48, 0.3, Some(1)).unwrap();
/// assert_eq!(stepper.step(&grid), grid.tick());
/// ```
#[derive(Clone, Debug)]
pub struct AcceleratedStepper {
    table: Arc<TransitionTable>,
}

impl AcceleratedStepper {
    pub fn new(table: Arc<TransitionTable>) -> Self {
        Self { table }
    }

    /// Creates a stepper from a table that may not have been loaded yet.
    ///
    /// # Errors
    ///
    /// Returns an error if `table` is `None`.
    pub fn with_table(table: Option<Arc<TransitionTable>>) -> Result<Self> {
        table
            .map(Self::new)
            .ok_or_else(|| anyhow!("Transition table is not loaded"))
    }

    pub fn table(&self) -> &Arc<TransitionTable> {
        &self.table
    }
}

impl Stepper for AcceleratedStepper {
    fn step(&self, grid: &Grid) -> Grid {
        let window = self.table.window();
        let (size, interior) = (window.size(), window.interior() as i64);
        let (width, height) = (grid.width() as i64, grid.height() as i64);
        let mut next = Grid::blank(grid.width(), grid.height());
        let single_population = grid
            .cells()
            .iter()
            .all(|&state| state == DEAD || state == Player::One as CellState);

        let mut y0 = -1;
        while y0 + 1 < height {
            let mut x0 = -1;
            while x0 + 1 < width {
                let index = window.pack(|row, col| {
                    grid.get_safe(x0 + col as i64, y0 + row as i64) != DEAD
                });
                let y = self.table.get(index);

                for row in 1..size - 1 {
                    let j = y0 + row as i64;
                    if j >= height {
                        break;
                    }
                    for col in 1..size - 1 {
                        let i = x0 + col as i64;
                        if i >= width {
                            break;
                        }
                        if !window.bit(y, row, col) {
                            continue;
                        }
                        let (i, j) = (i as usize, j as usize);
                        let state = grid.get(i, j);
                        let state = if state != DEAD {
                            state
                        } else if single_population {
                            Player::One as CellState
                        } else {
                            birth_tag(grid.neighbourhood(i, j).1)
                        };
                        next.set(i, j, state);
                    }
                }
                x0 += interior;
            }
            y0 += interior;
        }
        next
    }

    fn name(&self) -> &'static str {
        "accelerated"
    }
}
