use crate::{AcceleratedStepper, DirectStepper, Grid, Stepper, TransitionTable};
use std::sync::Arc;

/// A sequence of published generations of one grid.
///
/// Each step computes a new grid from the current one and publishes it as a
/// fresh `Arc`. Grids returned by [`current`](Simulation::current) or
/// [`step`](Simulation::step) are never modified afterwards, so a reader
/// (e.g. a renderer on another thread) can keep displaying one generation
/// while the next is computed.
///
/// Until a table is attached the simulation counts neighbours directly;
/// afterwards it switches to [`AcceleratedStepper`]. Both produce identical
/// generations.
#[derive(Debug)]
pub struct Simulation {
    current: Arc<Grid>,
    generation: u64,
    accelerator: Option<AcceleratedStepper>,
}

impl Simulation {
    pub fn new(grid: Grid) -> Self {
        Self {
            current: Arc::new(grid),
            generation: 0,
            accelerator: None,
        }
    }

    /// Switches stepping to the lookup table.
    pub fn attach_table(&mut self, table: Arc<TransitionTable>) {
        self.accelerator = Some(AcceleratedStepper::new(table));
    }

    /// Switches back to neighbour counting, returning the table if one was attached.
    pub fn detach_table(&mut self) -> Option<Arc<TransitionTable>> {
        self.accelerator
            .take()
            .map(|stepper| stepper.table().clone())
    }

    pub fn is_accelerated(&self) -> bool {
        self.accelerator.is_some()
    }

    /// The latest published generation.
    pub fn current(&self) -> Arc<Grid> {
        self.current.clone()
    }

    /// Number of generations computed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advances by one generation and publishes the result.
    pub fn step(&mut self) -> Arc<Grid> {
        let next = match &self.accelerator {
            Some(stepper) => stepper.step(&self.current),
            None => DirectStepper.step(&self.current),
        };
        self.current = Arc::new(next);
        self.generation += 1;
        self.current.clone()
    }

    /// Advances by `generations` generations and publishes only the last one.
    pub fn run(&mut self, generations: u64) -> Arc<Grid> {
        if generations == 0 {
            return self.current();
        }
        let stepper: &dyn Stepper = match &self.accelerator {
            Some(stepper) => stepper,
            None => &DirectStepper,
        };
        let mut grid = stepper.step(&self.current);
        for _ in 1..generations {
            grid = stepper.step(&grid);
        }
        self.current = Arc::new(grid);
        self.generation += generations;
        self.current.clone()
    }
}
