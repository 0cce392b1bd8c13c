use crate::{rule::update_row, WindowLayout, WORKER_THREADS};
use anyhow::{anyhow, Context, Result};
use flate2::{
    read::{GzDecoder, GzEncoder},
    Compression,
};
use std::{io::Read, path::Path, sync::atomic::Ordering};

/// Number of consecutive window states computed by one builder task.
const BUILD_CHUNK_LEN: usize = 1 << 16;

/// Precomputed next states of every possible window.
///
/// # Overview
///
/// Entry `x` is the state one generation after window `x`, where both are
/// packed with [`WindowLayout`] and the window is evolved in isolation: every
/// neighbour outside of it is dead. Only the interior
/// `(size - 2) x (size - 2)` bits of an entry are a valid future of a real
/// grid; the border cells of the window see truncated neighbourhoods.
///
/// The table is a pure function of the window size. It is immutable once
/// built or loaded and can be shared (e.g. as `Arc<TransitionTable>`)
/// between any number of concurrent steppers.
///
/// # File format
///
/// A flat little-endian array of `2^(size²)` `u32` values without any
/// header, 128 MiB for the default window size of 5. The reader must know
/// the window size the file was built for.
#[derive(Clone, PartialEq, Eq)]
pub struct TransitionTable {
    window: WindowLayout,
    entries: Vec<u32>,
}

impl TransitionTable {
    /// Builds the table for `window_size x window_size` windows.
    ///
    /// Window states are split into chunks evaluated on a multi-threaded
    /// runtime with [`WORKER_THREADS`] workers (0 lets the runtime decide).
    /// The result does not depend on the number of workers.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported window size or if the runtime fails.
    pub fn build(window_size: u32) -> Result<Self> {
        let window = WindowLayout::new(window_size)?;
        let states_count = window.states_count();

        let mut builder = tokio::runtime::Builder::new_multi_thread();
        let threads = WORKER_THREADS.load(Ordering::Relaxed);
        if threads > 0 {
            builder.worker_threads(threads as usize);
        }
        let runtime = builder
            .build()
            .context("Failed to start the table builder runtime")?;

        let entries = runtime.block_on(async move {
            let handles = (0..states_count)
                .step_by(BUILD_CHUNK_LEN)
                .map(|start| {
                    let end = (start + BUILD_CHUNK_LEN).min(states_count);
                    tokio::spawn(async move {
                        (start as u32..end as u32)
                            .map(|x| next_window(window, x))
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();

            let mut entries = Vec::with_capacity(states_count);
            for handle in handles {
                entries.extend(handle.await.context("Table builder task failed")?);
            }
            Ok::<_, anyhow::Error>(entries)
        })?;

        Ok(Self { window, entries })
    }

    /// Parses a table from its file representation.
    ///
    /// # Errors
    ///
    /// Fails if the length does not match `window_size` or an entry has bits
    /// outside the window, which means the file was built for another size.
    pub fn from_bytes(window_size: u32, data: &[u8]) -> Result<Self> {
        let window = WindowLayout::new(window_size)?;
        let expected = window.states_count() * size_of::<u32>();
        if data.len() != expected {
            return Err(anyhow!(
                "Transition table has {} bytes, expected {} for window size {}",
                data.len(),
                expected,
                window_size
            ));
        }

        let entries = data
            .chunks_exact(size_of::<u32>())
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect::<Vec<_>>();
        let limit = window.states_count() as u64;
        if let Some(x) = entries.iter().position(|&y| y as u64 >= limit) {
            return Err(anyhow!(
                "Entry {} of the transition table does not fit window size {}",
                x,
                window_size
            ));
        }
        Ok(Self { window, entries })
    }

    /// Serializes the table as a flat little-endian `u32` array.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.entries.iter().flat_map(|y| y.to_le_bytes()).collect()
    }

    /// Loads a table file; files ending in `.gz` are decompressed first.
    pub fn load(path: impl AsRef<Path>, window_size: u32) -> Result<Self> {
        let path = path.as_ref();
        let mut data = std::fs::read(path)
            .with_context(|| format!("Failed to read transition table {}", path.display()))?;
        if is_gzip(path) {
            let mut decompressed_data = Vec::new();
            GzDecoder::new(&data[..])
                .read_to_end(&mut decompressed_data)
                .context("Failed to decompress transition table")?;
            data = decompressed_data;
        }
        Self::from_bytes(window_size, &data)
            .with_context(|| format!("Invalid transition table {}", path.display()))
    }

    /// Saves the table; paths ending in `.gz` are gzip-compressed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut data = self.to_bytes();
        if is_gzip(path) {
            let mut compressed_data = Vec::new();
            GzEncoder::new(&data[..], Compression::default())
                .read_to_end(&mut compressed_data)
                .context("Failed to compress transition table")?;
            data = compressed_data;
        }
        std::fs::write(path, data)
            .with_context(|| format!("Failed to write transition table {}", path.display()))
    }

    /// File name the table is conventionally stored under.
    pub fn default_file_name(window_size: u32) -> String {
        format!("hash{}.buff", window_size)
    }

    pub fn window(&self) -> WindowLayout {
        self.window
    }

    #[inline]
    pub fn get(&self, index: u32) -> u32 {
        self.entries[index as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the heap memory used by the entries in bytes.
    pub fn bytes_total(&self) -> usize {
        self.entries.capacity() * size_of::<u32>()
    }
}

impl std::fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionTable")
            .field("window", &self.window)
            .field("len", &self.entries.len())
            .finish()
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Evolves window `x` by one generation as if it were surrounded by dead cells.
pub fn next_window(window: WindowLayout, x: u32) -> u32 {
    let (size, mask) = (window.size(), window.row_mask());
    let mut y = 0;
    let mut row_prev = 0;
    let mut row_curr = window.row(x, 0);
    for row in 0..size {
        let row_next = if row + 1 < size {
            window.row(x, row + 1)
        } else {
            0
        };
        y |= update_row(row_prev, row_curr, row_next, mask) << (row * size);
        (row_prev, row_curr) = (row_curr, row_next);
    }
    y
}
