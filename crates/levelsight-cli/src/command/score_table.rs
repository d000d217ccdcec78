use std::path::PathBuf;

use levelsight_analysis::score::ClusterMultiplierTable;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ScoreTableArg {
    /// Output file path for the table as JSON (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the table as JSON instead of a text table
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(arg: &ScoreTableArg) -> anyhow::Result<()> {
    let table = ClusterMultiplierTable::default();

    if arg.json || arg.output.is_some() {
        Output::save_json(&table, arg.output.clone())?;
        return Ok(());
    }

    println!("{:>8} {:>13} {:>11} {:>13}", "rank", "monetization", "engagement", "satisfaction");
    for (rank, weights) in table.iter() {
        println!(
            "{:>8} {:>13.2} {:>11.2} {:>13.2}",
            rank, weights.monetization, weights.engagement, weights.satisfaction
        );
    }
    let default = table.default_weights();
    println!(
        "{:>8} {:>13.2} {:>11.2} {:>13.2}",
        "default", default.monetization, default.engagement, default.satisfaction
    );

    Ok(())
}
