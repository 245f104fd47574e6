/// Parallel loading of several datasets
///
/// Loads are independent blocking file reads, so each one runs on tokio's blocking pool.
/// Results match sequential `DataLoader::load` calls exactly.
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

use crate::dataset::Dataset;
use crate::load_error::LoadError;
use crate::loaders::DataLoader;
use crate::table::Table;

#[derive(Debug)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub result: Result<Table, LoadError>,
    pub elapsed: Duration,
}

impl LoadOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Load `datasets` with at most `parallel` loads in flight
///
/// Outcomes come back in the order the datasets were requested.
#[instrument(skip(loader, datasets), fields(count = datasets.len()))]
pub async fn load_all(
    loader: Arc<DataLoader>,
    datasets: &[Dataset],
    parallel: usize,
) -> Vec<LoadOutcome> {
    let mut indexed: Vec<(usize, LoadOutcome)> = stream::iter(datasets.iter().copied().enumerate())
        .map(|(idx, dataset)| {
            let loader = Arc::clone(&loader);
            async move {
                let start = Instant::now();
                let result = tokio::task::spawn_blocking(move || loader.load(dataset))
                    .await
                    .unwrap_or_else(|e| {
                        Err(LoadError::Task {
                            dataset,
                            msg: e.to_string(),
                        })
                    });
                (
                    idx,
                    LoadOutcome {
                        dataset,
                        result,
                        elapsed: start.elapsed(),
                    },
                )
            }
        })
        .buffer_unordered(parallel.max(1))
        .collect()
        .await;

    indexed.sort_by_key(|(idx, _)| *idx);
    let outcomes: Vec<LoadOutcome> = indexed.into_iter().map(|(_, o)| o).collect();

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        warn!(failed, total = outcomes.len(), "Some datasets failed to load");
    } else {
        info!(total = outcomes.len(), "All datasets loaded");
    }
    outcomes
}
