//! Parallel analysis of image collections.

use rayon::prelude::*;
use topo_core::{BinaryImage, Result};
use tracing::debug;

use crate::invariants::InvariantRecord;
use crate::{analyze_with_config, AnalyzeConfig};

/// Analyze every image on the rayon pool. Results keep the input order.
pub fn analyze_batch(
    images: &[BinaryImage],
    config: &AnalyzeConfig,
) -> Vec<Result<InvariantRecord>> {
    let results: Vec<_> = images
        .par_iter()
        .map(|image| analyze_with_config(image, config))
        .collect();

    let summary = BatchSummary::from_results(&results);
    debug!(
        analyzed = summary.analyzed,
        failed = summary.failed,
        inconsistent = summary.inconsistent,
        "batch complete"
    );

    results
}

/// Tally of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Images that produced a record.
    pub analyzed: usize,
    /// Images whose analysis returned an error.
    pub failed: usize,
    /// Records in which at least one pair of derivations disagrees.
    pub inconsistent: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[Result<InvariantRecord>]) -> Self {
        results.iter().fold(Self::default(), |mut acc, result| {
            match result {
                Ok(record) => {
                    acc.analyzed += 1;
                    if !record.is_consistent() {
                        acc.inconsistent += 1;
                    }
                }
                Err(_) => acc.failed += 1,
            }
            acc
        })
    }
}
