use chrono::Local;
use gol_lookup::Grid;
use num_format::{CustomFormat, Grouping, ToFormattedString};

pub(super) fn format_number(x: usize) -> String {
    let fmt = CustomFormat::builder()
        .grouping(Grouping::Standard)
        .separator("_")
        .build()
        .unwrap();
    x.to_formatted_string(&fmt)
}

pub(super) fn print_population(grid: &Grid) {
    println!("Population: {}", format_number(grid.population()));
}

pub(super) fn local_time() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}
