use anyhow::Context;
use lecture_planner::search::FilterCriteria;
use lecture_planner::{logging, Planner, PlannerConfig};
use std::path::Path;
use tracing::{info, Level};

/// Loads the catalog and prints the first page of lectures matching a query.
///
/// Usage: `planner-demo [config.json] [query]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(Level::INFO);

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => PlannerConfig::load_from_file(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        None => PlannerConfig::default(),
    };
    let query = args.next().unwrap_or_default();

    let mut planner = Planner::from_config(config)?;
    let total = planner
        .load_catalog()
        .await
        .context("loading lecture catalog")?;

    let search = planner.search();
    search.set_criteria(FilterCriteria::default().with_query(query));
    let matched = search.filtered().len();
    let visible = search.visible();

    info!(total, matched, shown = visible.len(), "Search complete");
    for lecture in visible.iter() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            lecture.id, lecture.title, lecture.major, lecture.credits, lecture.schedule
        );
    }

    Ok(())
}
