use anyhow::{anyhow, Context, Result};
use clap::Args;
use gol_lookup::{encode_rle, parse_lexicon, Player};

#[derive(Args, Debug)]
pub(super) struct LexiconArgs {
    /// Path to the lexicon text
    lexicon: String,

    /// Name of the entry to print as RLE; all entries are listed without it
    #[arg(short, long)]
    name: Option<String>,
}

pub(super) fn run_lexicon(args: LexiconArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.lexicon)
        .with_context(|| format!("Failed to read {}", args.lexicon))?;
    let entries = parse_lexicon(&text)?;

    match args.name {
        None => {
            for entry in entries.iter() {
                match entry.rows.first() {
                    Some(row) => println!("{}\t{}x{}", entry.name, row.len(), entry.rows.len()),
                    None => println!("{}", entry.name),
                }
            }
            println!("{} entries", entries.len());
        }
        Some(name) => {
            let entry = entries
                .iter()
                .find(|entry| entry.name == name)
                .ok_or_else(|| anyhow!("No entry named {:?}", name))?;
            let pattern = entry
                .to_pattern(Player::One)
                .with_context(|| format!("Entry {:?} has no valid diagram", name))?;
            for line in entry.description.lines() {
                println!("#C {}", line);
            }
            print!("{}", encode_rle(&pattern));
        }
    }
    Ok(())
}
