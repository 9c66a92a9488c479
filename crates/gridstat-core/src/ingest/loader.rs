// Concurrent source loading.
//
// The five sources are independent, so they are fetched concurrently, each
// under its own timeout. A failed or timed-out source leaves its category
// empty and never cancels its siblings. Returning from `load_categories` is
// the barrier the merge waits on.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{info, warn};

use super::adapters::{adapt, CategoryTable};
use super::table::{CsvTableSource, RawTable, SourceError, TableSource};
use super::{Category, IngestReport, IngestWarning};
use crate::config::SourcePaths;

/// The configured source for each category.
#[derive(Default)]
pub struct SourceSet {
    sources: Vec<(Category, Box<dyn TableSource>)>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the source for a category.
    pub fn with(mut self, category: Category, source: impl TableSource + 'static) -> Self {
        self.sources.retain(|(c, _)| *c != category);
        self.sources.push((category, Box::new(source)));
        self
    }

    /// CSV file sources for every category. Relative paths resolve against
    /// `base_dir`.
    pub fn from_paths(paths: &SourcePaths, base_dir: &Path) -> Self {
        Category::ALL.iter().fold(Self::new(), |set, &category| {
            let path = Path::new(paths.get(category));
            let resolved = if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            };
            set.with(category, CsvTableSource::new(resolved))
        })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Every category's adapted table plus the warnings raised on the way.
#[derive(Debug, Clone)]
pub struct LoadedCategories {
    pub tables: BTreeMap<Category, CategoryTable>,
    pub report: IngestReport,
}

impl LoadedCategories {
    /// Tables in merge order. Categories that never loaded are empty.
    pub fn in_merge_order(&self) -> Vec<CategoryTable> {
        Category::ALL
            .iter()
            .map(|c| {
                self.tables
                    .get(c)
                    .cloned()
                    .unwrap_or_else(|| CategoryTable::empty(*c))
            })
            .collect()
    }
}

/// Fetch and adapt all sources concurrently.
pub async fn load_categories(sources: &SourceSet, timeout: Duration) -> LoadedCategories {
    let fetches = sources.sources.iter().map(|(category, source)| async move {
        let outcome = fetch_with_timeout(source.as_ref(), timeout).await;
        (*category, source.describe(), outcome)
    });
    let results = join_all(fetches).await;

    let mut tables = BTreeMap::new();
    let mut report = IngestReport::default();

    for (category, location, outcome) in results {
        match outcome {
            Ok(raw) => {
                info!("{category}: fetched {} row(s) from {location}", raw.cells.len());
                let (table, adapter_report) = adapt(category, &raw);
                report.extend(adapter_report);
                tables.insert(category, table);
            }
            Err(e) => {
                warn!("{category} source unavailable: {e}");
                report.push(IngestWarning::SourceUnavailable {
                    category,
                    reason: e.to_string(),
                });
                tables.insert(category, CategoryTable::empty(category));
            }
        }
    }

    for category in Category::ALL {
        if !tables.contains_key(&category) {
            warn!("{category}: no source configured");
            report.push(IngestWarning::SourceUnavailable {
                category,
                reason: "no source configured".into(),
            });
            tables.insert(category, CategoryTable::empty(category));
        }
    }

    LoadedCategories { tables, report }
}

async fn fetch_with_timeout(
    source: &dyn TableSource,
    timeout: Duration,
) -> Result<RawTable, SourceError> {
    match tokio::time::timeout(timeout, source.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout {
            path: source.describe(),
            secs: timeout.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::table::InMemorySource;
    use async_trait::async_trait;

    struct SlowSource;

    #[async_trait]
    impl TableSource for SlowSource {
        fn describe(&self) -> String {
            "slow".into()
        }

        async fn fetch(&self) -> Result<RawTable, SourceError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(RawTable::default())
        }
    }

    fn fumbles_table() -> RawTable {
        RawTable::from_csv_reader("Rank,Player,Team,Pos,Value\n1,Josh Allen,BUF,QB,5\n".as_bytes())
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_source_does_not_block_siblings() {
        let sources = SourceSet::new()
            .with(Category::Passing, SlowSource)
            .with(Category::Fumbles, InMemorySource::new("fumbles", fumbles_table()));

        let loaded = load_categories(&sources, Duration::from_secs(5)).await;

        assert!(loaded.tables[&Category::Passing].is_empty());
        assert_eq!(loaded.tables[&Category::Fumbles].len(), 1);
        let unavailable = loaded.report.unavailable();
        assert!(unavailable.contains(&Category::Passing));
        assert!(!unavailable.contains(&Category::Fumbles));
        assert_eq!(loaded.tables.len(), 5);
    }

    #[tokio::test]
    async fn unconfigured_categories_are_empty() {
        let sources =
            SourceSet::new().with(Category::Fumbles, InMemorySource::new("fumbles", fumbles_table()));
        let loaded = load_categories(&sources, Duration::from_secs(5)).await;

        let order: Vec<Category> = loaded.in_merge_order().iter().map(|t| t.category).collect();
        assert_eq!(order, Category::ALL.to_vec());
        assert_eq!(loaded.report.unavailable().len(), 4);
    }

    #[tokio::test]
    async fn missing_file_is_source_unavailable() {
        let sources = SourceSet::new().with(
            Category::Receiving,
            CsvTableSource::new("/nonexistent/gridstat/receiving.csv"),
        );
        let loaded = load_categories(&sources, Duration::from_secs(5)).await;
        assert!(loaded.report.warnings.iter().any(|w| matches!(
            w,
            IngestWarning::SourceUnavailable { category: Category::Receiving, reason }
                if reason.contains("receiving.csv")
        )));
    }

    #[test]
    fn with_replaces_existing_source() {
        let sources = SourceSet::new()
            .with(Category::Fumbles, InMemorySource::new("a", RawTable::default()))
            .with(Category::Fumbles, InMemorySource::new("b", RawTable::default()));
        assert_eq!(sources.len(), 1);
    }
}
