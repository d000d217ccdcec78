use clap::{Parser, Subcommand};

use self::{recluster::ReclusterArg, score_table::ScoreTableArg};

mod recluster;
mod score_table;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Recluster a level range from a metrics file
    Recluster(#[clap(flatten)] ReclusterArg),
    /// Print the score multiplier table
    ScoreTable(#[clap(flatten)] ScoreTableArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Recluster(arg) => recluster::run(&arg)?,
        Mode::ScoreTable(arg) => score_table::run(&arg)?,
    }
    Ok(())
}
