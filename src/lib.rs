#![warn(clippy::all)]

mod grid;
mod pattern;
mod rule;
mod simulation;
mod stepper;
mod table;
mod window;

pub use grid::{CellState, Grid, Player, DEAD};
pub use pattern::{
    decode_lexicon, decode_rle, encode_rle, parse_lexicon, read_rle_file, write_rle_file,
    DecodeError, LexiconEntry, Pattern, MAX_PATTERN_CELLS,
};
pub use simulation::Simulation;
pub use stepper::{AcceleratedStepper, DirectStepper, Stepper};
pub use table::{next_window, TransitionTable};
pub use window::{WindowLayout, DEFAULT_WINDOW_SIZE};

pub const VERSION: &str = "0.1.0";

use std::sync::atomic::AtomicU32;
/// Worker threads used by [`TransitionTable::build`]; 0 means one per core.
pub static WORKER_THREADS: AtomicU32 = AtomicU32::new(0);
