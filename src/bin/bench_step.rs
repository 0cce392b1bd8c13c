use gol_lookup::*;
use std::sync::Arc;

fn main() {
    // usage: bench_step [table file] [window size]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let window_size = args
        .get(1)
        .map(|x| x.parse().unwrap())
        .unwrap_or(DEFAULT_WINDOW_SIZE);
    let table = match args.first() {
        Some(path) => TransitionTable::load(path, window_size).unwrap(),
        None => {
            let timer = std::time::Instant::now();
            let table = TransitionTable::build(window_size).unwrap();
            println!("built table in {:.3} secs", timer.elapsed().as_secs_f64());
            table
        }
    };
    let steppers: [Box<dyn Stepper>; 2] = [
        Box::new(DirectStepper),
        Box::new(AcceleratedStepper::new(Arc::new(table))),
    ];

    for size in [256, 512, 1024] {
        let grid = Grid::random(size, size, 0.3, Some(42)).unwrap();
        let mut results = vec![];
        for stepper in steppers.iter() {
            let timer = std::time::Instant::now();
            let mut current = grid.clone();
            for _ in 0..16 {
                current = stepper.step(&current);
            }
            let elapsed = timer.elapsed().as_secs_f64();
            println!("size={size}\t{}\ttime={:.3}", stepper.name(), elapsed);
            results.push(current);
        }
        assert_eq!(results[0], results[1]);
    }
}
