use anyhow::{Result, Context};
use oxiri::Iri;
use rio_api::model::{Literal, Term};
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleError, TurtleParser};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

pub mod vocab {
    pub const LDP_CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    pub const BIBO_ARTICLE: &str = "http://purl.org/ontology/bibo/Article";
    pub const BIBO_ISSUE: &str = "http://purl.org/ontology/bibo/Issue";
    pub const ORE_PROXY: &str = "http://www.openarchives.org/ore/terms/Proxy";
    pub const NDNP_PAGE: &str = "http://chroniclingamerica.loc.gov/terms/Page";
    pub const FABIO_METADATA: &str = "http://purl.org/spar/fabio/Metadata";
}

/// Parse a turtle document and collect the value of every object whose
/// triple uses `predicate`, in document order.
///
/// IRIs yield the IRI string and literals their lexical form. Blank nodes
/// and quoted triples carry no usable value and are skipped. Relative IRIs
/// resolve against `base` when one is given.
pub fn objects_of<R: BufRead>(reader: R, base: Option<&str>, predicate: &str) -> Result<Vec<String>> {
    let base_iri = match base {
        Some(base) => Some(
            Iri::parse(base.to_string())
                .map_err(|e| anyhow::anyhow!("Invalid base IRI {}: {}", base, e))?,
        ),
        None => None,
    };

    let mut objects = Vec::new();
    let mut parser = TurtleParser::new(reader, base_iri);
    parser.parse_all(&mut |triple| -> Result<(), TurtleError> {
        if triple.predicate.iri == predicate {
            if let Some(value) = term_value(&triple.object) {
                objects.push(value);
            }
        }
        Ok(())
    })?;

    Ok(objects)
}

fn term_value(term: &Term<'_>) -> Option<String> {
    match term {
        Term::NamedNode(node) => Some(node.iri.to_string()),
        Term::Literal(Literal::Simple { value })
        | Term::Literal(Literal::LanguageTaggedString { value, .. })
        | Term::Literal(Literal::Typed { value, .. }) => Some(value.to_string()),
        _ => None,
    }
}

/// Read a turtle container listing and return every `ldp:contains` object.
///
/// Duplicates are kept; callers deduplicate.
pub fn list_contained_resources<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    info!("Parsing input from {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let base = file_base_iri(path);
    debug!("Resolving relative IRIs in {} against {:?}", path.display(), base);

    let uris = objects_of(BufReader::new(file), base.as_deref(), vocab::LDP_CONTAINS)
        .with_context(|| format!("Failed to parse turtle input: {}", path.display()))?;

    info!("{} uris found", uris.len());
    Ok(uris)
}

fn file_base_iri(path: &Path) -> Option<String> {
    let absolute = fs::canonicalize(path).ok()?;
    url::Url::from_file_path(absolute).ok().map(|url| url.to_string())
}
