use std::path::PathBuf;

use levelsight_analysis::{
    feature::MetricWeights,
    kmeans::KMeansConfig,
    run::{ClusteringRun, RunReport},
    score::ClusterMultiplierTable,
};
use levelsight_engine::range::LevelRange;

use crate::util::{Output, read_records_file};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReclusterArg {
    /// Path to the level metrics JSON file
    #[arg(long)]
    records: PathBuf,
    /// First level to recluster (inclusive)
    #[arg(long, default_value_t = 1)]
    min: u32,
    /// Last level to recluster (inclusive)
    #[arg(long)]
    max: u32,
    /// Random seed for cluster initialization
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Weight for the repeat-ratio feature column
    #[arg(long)]
    repeat_weight: Option<f32>,
    /// Output file path for the run report (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ReclusterArg) -> anyhow::Result<()> {
    let records = read_records_file(&arg.records)?;
    eprintln!(
        "Loaded {} level records from {}",
        records.len(),
        arg.records.display()
    );

    let mut weights = MetricWeights::default();
    if let Some(repeat_weight) = arg.repeat_weight {
        weights.repeat_ratio = repeat_weight;
    }

    let clustering = ClusteringRun::new(
        weights,
        ClusterMultiplierTable::default(),
        KMeansConfig::with_seed(arg.seed),
    );
    let report = clustering.execute(&records, LevelRange::new(arg.min, arg.max))?;

    print_summary(&report);
    Output::save_json(&report, arg.output.clone())?;

    Ok(())
}

fn print_summary(report: &RunReport) {
    eprintln!(
        "Assigned {} levels ({} skipped in {} undersized groups)",
        report.assignments.len(),
        report.skipped_levels,
        report.skipped_groups,
    );
    if report.missing_records > 0 {
        eprintln!(
            "{} records had missing metric values defaulted to 0.0",
            report.missing_records
        );
    }

    eprintln!("Rank distribution:");
    print_histogram(
        report
            .rank_summaries
            .iter()
            .map(|summary| (summary.rank.as_str(), summary.count)),
    );
}

fn print_histogram<'a, I>(data: I)
where
    I: Iterator<Item = (&'a str, usize)>,
{
    let data = data.collect::<Vec<_>>();
    let max_count = data.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);
    let max_bar_width = 50;
    for (label, count) in &data {
        let bar_width = (count * max_bar_width) / max_count;
        eprintln!("{:>8} | {:<5} {}", label, count, "#".repeat(bar_width));
    }
}
