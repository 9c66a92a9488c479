// End-to-end batch run: fetch every source, adapt, merge.

use std::time::Duration;

use tracing::{info, warn};

use crate::config::Config;
use crate::ingest::loader::{load_categories, SourceSet};
use crate::ingest::IngestReport;
use crate::merge::{merge_categories, PlayerTable};

/// The merged table plus every non-fatal ingest warning.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: PlayerTable,
    pub report: IngestReport,
}

/// Load all sources concurrently and merge them into one player table.
/// Source failures never abort the run; they show up in the report.
pub async fn run(sources: &SourceSet, timeout: Duration) -> PipelineOutput {
    let loaded = load_categories(sources, timeout).await;
    let table = merge_categories(&loaded.in_merge_order());

    let unavailable = loaded.report.unavailable();
    if !unavailable.is_empty() {
        warn!(
            "merged without {} categor{}",
            unavailable.len(),
            if unavailable.len() == 1 { "y" } else { "ies" }
        );
    }
    info!(
        "pipeline complete: {} player(s), {} warning(s)",
        table.len(),
        loaded.report.warnings.len()
    );

    PipelineOutput {
        table,
        report: loaded.report,
    }
}

/// Run against the CSV sources named in the config.
pub async fn run_from_config(config: &Config) -> PipelineOutput {
    let sources = SourceSet::from_paths(&config.sources.paths, &config.base_dir);
    run(&sources, config.timeout()).await
}
