pub mod classifier;
pub mod fetcher;
pub mod link_header;

pub use classifier::{ResourceType, TypeClassifier, TYPE_PRIORITY};
pub use fetcher::{FetchedResource, HttpFetcher, ProbeResponse, ResourceFetcher};
pub use link_header::{parse_link_header, LinkValue, DESCRIBED_BY};
