mod build_table;
mod lexicon;
mod run;
mod util;

use anyhow::Result;
use build_table::{run_build_table, BuildTableArgs};
use clap::{Parser, Subcommand};
use lexicon::{run_lexicon, LexiconArgs};
use run::{run_simulation, RunArgs};

#[derive(Parser, Debug)]
#[command(version, about)]
struct CLIParser {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Build the transition table of every window state and save it to a file
    BuildTable(BuildTableArgs),
    /// Stamp a pattern into a blank grid and simulate it
    Run(RunArgs),
    /// List the entries of a Life lexicon or print one of them as RLE
    Lexicon(LexiconArgs),
}

fn main() -> Result<()> {
    let args = CLIParser::parse();

    match args.action {
        Action::BuildTable(args) => run_build_table(args),
        Action::Run(args) => run_simulation(args),
        Action::Lexicon(args) => run_lexicon(args),
    }
}
