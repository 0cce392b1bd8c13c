use anyhow::{anyhow, Result};

/// Window side used by the prebuilt table files.
pub const DEFAULT_WINDOW_SIZE: u32 = 5;

/// Bit layout of a square window of cells packed into a `u32`.
///
/// Cell `(row, col)` lives at bit `row * size + col`. The table builder and
/// the accelerated stepper pack and unpack windows only through this type,
/// so a table is valid for a stepper exactly when their layouts are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowLayout {
    size: u32,
}

impl WindowLayout {
    /// Creates a layout for `size x size` windows.
    ///
    /// # Errors
    ///
    /// The size must be odd, at least 3 (so the window has an interior) and
    /// small enough for `size²` bits to fit in a `u32`, which leaves 3 and 5.
    pub fn new(size: u32) -> Result<Self> {
        if !(3..=5).contains(&size) || size % 2 == 0 {
            return Err(anyhow!(
                "Window size {} is not supported, expected an odd size in 3..=5",
                size
            ));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Side of the sub-square whose next state is fully determined.
    pub fn interior(&self) -> u32 {
        self.size - 2
    }

    /// Number of distinct window states, i.e. the table length.
    pub fn states_count(&self) -> usize {
        1 << (self.size * self.size)
    }

    /// Mask of the bits of one packed row.
    pub fn row_mask(&self) -> u32 {
        (1 << self.size) - 1
    }

    #[inline]
    pub fn offset(&self, row: u32, col: u32) -> u32 {
        row * self.size + col
    }

    #[inline]
    pub fn bit(&self, window: u32, row: u32, col: u32) -> bool {
        (window >> self.offset(row, col)) & 1 != 0
    }

    /// Extracts row `row` as `size` low bits.
    #[inline]
    pub fn row(&self, window: u32, row: u32) -> u32 {
        (window >> (row * self.size)) & self.row_mask()
    }

    /// Packs a window by querying `alive(row, col)` for every cell.
    #[inline]
    pub fn pack(&self, mut alive: impl FnMut(u32, u32) -> bool) -> u32 {
        let mut window = 0;
        for row in 0..self.size {
            for col in 0..self.size {
                if alive(row, col) {
                    window |= 1 << self.offset(row, col);
                }
            }
        }
        window
    }

    /// Renders a packed window as rows of `0`/`1`.
    pub fn pretty(&self, window: u32) -> String {
        let mut result = String::new();
        for row in 0..self.size {
            for col in 0..self.size {
                result.push(if self.bit(window, row, col) { '1' } else { '0' });
            }
            result.push('\n');
        }
        result
    }
}

impl Default for WindowLayout {
    fn default() -> Self {
        Self {
            size: DEFAULT_WINDOW_SIZE,
        }
    }
}
