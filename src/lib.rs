pub mod config;
pub mod core;
pub mod pipeline;
pub mod rdf;
pub mod report;

pub use config::Configuration;
pub use core::{HttpFetcher, ResourceFetcher, ResourceType, TypeClassifier};
pub use pipeline::{run, run_with_events, RunEvent, RunSummary};
pub use report::{ReportWriter, ResourceRecord};
