use anyhow::Result;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

use crate::core::{ResourceFetcher, ResourceType, TypeClassifier};
use crate::rdf::list_contained_resources;
use crate::report::{read_completed_uris, ReportWriter, ResourceRecord};

/// Progress notifications emitted while a report is being built.
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// Input and existing report have been read; `pending` URIs remain.
    Started { pending: usize },
    Classified(&'a ResourceRecord),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct `ldp:contains` URIs in the input
    pub discovered: usize,
    /// Distinct URIs already present in the report before this run
    pub previously_completed: usize,
    /// Types assigned during this run
    pub classified: BTreeMap<ResourceType, usize>,
}

impl RunSummary {
    pub fn classified_total(&self) -> usize {
        self.classified.values().sum()
    }
}

/// Classify every contained resource listed in `input` that is not yet in
/// the report at `output`, appending one row per resource.
pub async fn run<F>(input: &Path, output: &Path, fetcher: &F) -> Result<RunSummary>
where
    F: ResourceFetcher + ?Sized,
{
    run_with_events(input, output, fetcher, |_| {}).await
}

pub async fn run_with_events<F, E>(
    input: &Path,
    output: &Path,
    fetcher: &F,
    mut on_event: E,
) -> Result<RunSummary>
where
    F: ResourceFetcher + ?Sized,
    E: FnMut(RunEvent<'_>),
{
    let listed = list_contained_resources(input)?;
    let listed_count = listed.len();
    let all_uris: HashSet<String> = listed.into_iter().collect();
    if all_uris.len() < listed_count {
        warn!("{} duplicate ldp:contains entries ignored", listed_count - all_uris.len());
    }

    // The full exclusion set is computed before any request is made.
    let completed = read_completed_uris(output)?;
    let to_check: Vec<String> = all_uris.difference(&completed).cloned().collect();

    let mut summary = RunSummary {
        discovered: all_uris.len(),
        previously_completed: completed.len(),
        classified: BTreeMap::new(),
    };
    info!("{} of {} resources left to check", to_check.len(), all_uris.len());
    on_event(RunEvent::Started { pending: to_check.len() });

    let classifier = TypeClassifier::new(fetcher);
    let mut writer = ReportWriter::open_append(output)?;
    let mut sequence = completed.len() as u64 + 1;

    for uri in to_check {
        let resource_type = classifier.classify(&uri).await?;
        info!("Checking {} => {}", uri, resource_type);

        let record = ResourceRecord::new(sequence, uri, resource_type);
        writer.append(&record)?;
        *summary.classified.entry(resource_type).or_insert(0) += 1;
        on_event(RunEvent::Classified(&record));
        sequence += 1;
    }

    Ok(summary)
}
