use anyhow::{Result, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::core::fetcher::ResourceFetcher;
use crate::core::link_header::DESCRIBED_BY;
use crate::rdf::{objects_of, vocab};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    File,
    Article,
    Issue,
    Proxy,
    Page,
    Metadata,
    Unknown,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Article => "article",
            Self::Issue => "issue",
            Self::Proxy => "proxy",
            Self::Page => "page",
            Self::Metadata => "metadata",
            Self::Unknown => "unknown",
        }
    }

    /// Pick the label for a set of `rdf:type` values. The first entry of
    /// [`TYPE_PRIORITY`] present in `types` wins.
    pub fn from_rdf_types(types: &HashSet<String>) -> Self {
        TYPE_PRIORITY
            .iter()
            .find(|(iri, _)| types.contains(*iri))
            .map(|(_, label)| *label)
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known RDF classes in match order.
pub const TYPE_PRIORITY: [(&str, ResourceType); 5] = [
    (vocab::BIBO_ARTICLE, ResourceType::Article),
    (vocab::BIBO_ISSUE, ResourceType::Issue),
    (vocab::ORE_PROXY, ResourceType::Proxy),
    (vocab::NDNP_PAGE, ResourceType::Page),
    (vocab::FABIO_METADATA, ResourceType::Metadata),
];

pub struct TypeClassifier<'a, F: ResourceFetcher + ?Sized> {
    fetcher: &'a F,
}

impl<'a, F: ResourceFetcher + ?Sized> TypeClassifier<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Determine the repository type of `uri`.
    ///
    /// A resource advertising a `describedby` link is a binary and is not
    /// fetched. Anything else is retrieved and matched on its `rdf:type`s.
    pub async fn classify(&self, uri: &str) -> Result<ResourceType> {
        let probe = self.fetcher.probe(uri).await?;
        if probe.has_relation(DESCRIBED_BY) {
            debug!("{} advertises a describedby link", uri);
            return Ok(ResourceType::File);
        }

        let resource = self.fetcher.fetch(uri).await?;
        let types: HashSet<String> = objects_of(resource.body.as_bytes(), Some(&resource.uri), vocab::RDF_TYPE)
            .with_context(|| format!("Failed to parse turtle response from {}", uri))?
            .into_iter()
            .collect();
        debug!("{} declares {} rdf:type values", uri, types.len());

        Ok(ResourceType::from_rdf_types(&types))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(iris: &[&str]) -> HashSet<String> {
        iris.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_priority_order_first_match_wins() {
        assert_eq!(
            ResourceType::from_rdf_types(&types(&[vocab::BIBO_ISSUE, vocab::BIBO_ARTICLE])),
            ResourceType::Article
        );
        assert_eq!(
            ResourceType::from_rdf_types(&types(&[vocab::FABIO_METADATA, vocab::NDNP_PAGE, vocab::ORE_PROXY])),
            ResourceType::Proxy
        );
        assert_eq!(
            ResourceType::from_rdf_types(&types(&[vocab::FABIO_METADATA, vocab::NDNP_PAGE])),
            ResourceType::Page
        );
    }

    #[test]
    fn test_unrecognized_types_are_unknown() {
        assert_eq!(ResourceType::from_rdf_types(&HashSet::new()), ResourceType::Unknown);
        assert_eq!(
            ResourceType::from_rdf_types(&types(&["http://www.w3.org/ns/ldp#Container"])),
            ResourceType::Unknown
        );
    }

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = TYPE_PRIORITY.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(labels, vec!["article", "issue", "proxy", "page", "metadata"]);
        assert_eq!(ResourceType::File.to_string(), "file");
        assert_eq!(ResourceType::Unknown.to_string(), "unknown");
    }
}
