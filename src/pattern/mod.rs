mod lexicon;
mod rle;

use crate::Grid;
use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;

pub use lexicon::{decode_lexicon, parse_lexicon, LexiconEntry};
pub use rle::{decode_rle, encode_rle, MAX_PATTERN_CELLS};

/// A decoded stamp; structurally just a small [`Grid`].
pub type Pattern = Grid;

/// Reasons a pattern description could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The `x = <W>, y = <H>` header is missing or unreadable.
    #[error("Invalid RLE header: {0}")]
    MalformedHeader(String),
    /// A symbol outside `[0-9bo$!]` and whitespace.
    #[error("Invalid RLE character: '{0}'")]
    InvalidToken(char),
    /// A run length too large to be meaningful.
    #[error("RLE run length overflows")]
    RunLengthOverflow,
    /// A run length with no tag after it.
    #[error("RLE run length is not followed by a tag")]
    DanglingRunLength,
    /// A token addressed a cell outside the declared dimensions.
    #[error("Pattern data out of bounds: x = {x}, y = {y}")]
    OutOfBounds { x: usize, y: usize },
    /// Pattern rows of different widths.
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// No rows, or rows without cells.
    #[error("Pattern has no cells")]
    EmptyRows,
    /// The lexicon text does not have the expected layout.
    #[error("Invalid lexicon: {0}")]
    MalformedLexicon(String),
}

/// Reads an RLE pattern from a file.
pub fn read_rle_file(path: impl AsRef<Path>) -> Result<Pattern> {
    let path = path.as_ref();
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decode_rle(&data).with_context(|| format!("Failed to decode {}", path.display()))
}

/// Writes a grid to a file in the RLE format.
pub fn write_rle_file(grid: &Grid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, encode_rle(grid))
        .with_context(|| format!("Failed to write {}", path.display()))
}
