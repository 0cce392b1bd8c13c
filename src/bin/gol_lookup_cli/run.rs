use crate::util::{local_time, print_population};
use anyhow::{anyhow, Result};
use clap::Args;
use gol_lookup::{
    read_rle_file, write_rle_file, Grid, Player, Simulation, TransitionTable, DEFAULT_WINDOW_SIZE,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(super) struct RunArgs {
    /// Path to the pattern in the .rle format
    pattern: String,

    /// Width of the grid
    #[arg(long)]
    width: usize,

    /// Height of the grid
    #[arg(long)]
    height: usize,

    /// The number of generations to simulate
    #[arg(short, long)]
    generations: u64,

    /// Column of the pattern's top-left corner
    #[arg(short = 'x', long, default_value_t = 0)]
    offset_x: i64,

    /// Row of the pattern's top-left corner
    #[arg(short = 'y', long, default_value_t = 0)]
    offset_y: i64,

    /// Player tag of the stamped cells (1 or 2)
    #[arg(long, default_value_t = 1)]
    player: u8,

    /// Path to a transition table; neighbours are counted directly without it
    #[arg(short, long)]
    table: Option<String>,

    /// Window size the table was built for
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window_size: u32,

    /// Path to the file where the resulting grid will be saved
    #[arg(short, long)]
    output: Option<String>,

    /// Print the resulting grid
    #[arg(long)]
    show: bool,

    /// Count population of the resulting grid
    #[arg(short, long)]
    population: bool,
}

pub(super) fn run_simulation(args: RunArgs) -> Result<()> {
    let player = Player::try_from(args.player)?;
    let timer = std::time::Instant::now();
    let pattern = read_rle_file(&args.pattern)?.change_player(player);
    if pattern.width() > args.width || pattern.height() > args.height {
        println!(
            "Pattern {}x{} does not fit the grid and will be clipped",
            pattern.width(),
            pattern.height()
        );
    }
    let grid = Grid::new(args.width, args.height)?.copy_from(&pattern, args.offset_x, args.offset_y);
    if grid.population() == 0 && pattern.population() != 0 {
        return Err(anyhow!("Pattern lies entirely outside the grid"));
    }
    let mut simulation = Simulation::new(grid);
    println!(
        "Loaded pattern in {:.1} secs",
        timer.elapsed().as_secs_f64()
    );

    if let Some(path) = &args.table {
        let timer = std::time::Instant::now();
        let table = TransitionTable::load(path, args.window_size)?;
        simulation.attach_table(Arc::new(table));
        println!(
            "Loaded transition table in {:.1} secs",
            timer.elapsed().as_secs_f64()
        );
    }

    println!(
        "[{}] Simulating {} generations ({})",
        local_time(),
        args.generations,
        if simulation.is_accelerated() {
            "lookup table"
        } else {
            "neighbour counting"
        }
    );
    let timer = std::time::Instant::now();
    let result = simulation.run(args.generations);
    let elapsed = timer.elapsed().as_secs_f64();
    println!("Simulated in {:.1} secs", elapsed);
    if args.generations > 0 && elapsed > 0.0 {
        println!("{:.1} generations per sec", args.generations as f64 / elapsed);
    }

    if args.population {
        print_population(&result);
    }
    if args.show {
        print!("{}", result);
    }
    if let Some(output) = &args.output {
        write_rle_file(&result, output)?;
    }
    Ok(())
}
