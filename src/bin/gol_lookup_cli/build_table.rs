use crate::util::{format_number, local_time};
use anyhow::Result;
use clap::Args;
use gol_lookup::{TransitionTable, DEFAULT_WINDOW_SIZE, WORKER_THREADS};

#[derive(Args, Debug)]
pub(super) struct BuildTableArgs {
    /// Side of the square window; 3 and 5 are supported
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window_size: u32,

    /// Path to the output file, `hash<N>.buff` by default; a `.gz` suffix enables compression
    #[arg(short, long)]
    output: Option<String>,

    /// The number of worker threads, all cores by default
    #[arg(long, default_value_t = 0)]
    workers: u32,
}

pub(super) fn run_build_table(args: BuildTableArgs) -> Result<()> {
    WORKER_THREADS.store(args.workers, std::sync::atomic::Ordering::Relaxed);
    let output = args
        .output
        .unwrap_or_else(|| TransitionTable::default_file_name(args.window_size));
    println!(
        "[{}] Building table for {}x{} windows",
        local_time(),
        args.window_size,
        args.window_size
    );

    let timer = std::time::Instant::now();
    let table = TransitionTable::build(args.window_size)?;
    println!(
        "Built {} entries in {:.1} secs",
        format_number(table.len()),
        timer.elapsed().as_secs_f64()
    );

    let timer = std::time::Instant::now();
    table.save(&output)?;
    println!(
        "Saved {} bytes to {} in {:.1} secs",
        format_number(table.bytes_total()),
        output,
        timer.elapsed().as_secs_f64()
    );
    Ok(())
}
