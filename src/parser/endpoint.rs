//! Bulk loading from a SPARQL endpoint
//!
//! Every bulk query of [`crate::sparql::templates`] is translated back into the
//! triples it matched, so the endpoint and the RDF files end up in the same
//! [`RawGraph`].
use tracing::{debug, info};

use crate::parser::{
    RawGraph, RdfObject, OBO_CONSIDER, OWL_CLASS, OWL_DEPRECATED, OWL_VERSION_IRI, RDFS_LABEL,
    RDFS_SUBCLASS_OF, RDF_TYPE,
};
use crate::sparql::{templates, ResultSet, Select};
use crate::{AnnotationKind, EdamResult};

const SOFTWARE_APPLICATION: &str = "http://schema.org/SoftwareApplication";
const SCHEMA_NAME: &str = "http://schema.org/name";

fn query<S: Select + ?Sized>(service: &S, name: &str, query: &str) -> EdamResult<ResultSet> {
    let results = service.select(query)?;
    debug!("Query {} returned {} rows", name, results.len());
    Ok(results)
}

fn iri(value: &str) -> RdfObject {
    RdfObject::Iri(value.to_string())
}

fn literal(value: &str) -> RdfObject {
    RdfObject::Literal(value.to_string())
}

/// Runs all bulk queries and adds the results to `raw`
///
/// # Errors
///
/// [`crate::EdamError::Endpoint`] if a query fails or a row misses a
/// required variable. The loading stops at the first failing query.
pub fn load<S: Select + ?Sized>(service: &S, raw: &mut RawGraph) -> EdamResult<()> {
    for row in &query(service, "edam_version", &templates::edam_version())? {
        let version = row.require("versionIRI")?;
        raw.push_triple("http://edamontology.org", OWL_VERSION_IRI, iri(version));
    }

    for row in &query(service, "concepts", &templates::concepts())? {
        let concept = row.require("concept")?;
        raw.push_triple(concept, RDF_TYPE, iri(OWL_CLASS));
        if let Some(label) = row.get("conceptLabel") {
            raw.push_triple(concept, RDFS_LABEL, literal(label));
        }
    }

    for row in &query(service, "subclass_relations", &templates::subclass_relations())? {
        raw.push_triple(
            row.require("subConcept")?,
            RDFS_SUBCLASS_OF,
            iri(row.require("superConcept")?),
        );
    }

    for row in &query(service, "deprecated_concepts", &templates::deprecated_concepts())? {
        raw.push_triple(row.require("concept")?, OWL_DEPRECATED, literal("true"));
    }

    for row in &query(service, "alternatives", &templates::alternatives())? {
        raw.push_triple(
            row.require("concept")?,
            OBO_CONSIDER,
            iri(row.require("conceptAlternative")?),
        );
    }

    for row in &query(service, "tools", &templates::tools())? {
        let tool = row.require("tool")?;
        raw.push_triple(tool, RDF_TYPE, iri(SOFTWARE_APPLICATION));
        if let Some(label) = row.get("toolLabel").filter(|label| !label.is_empty()) {
            raw.push_triple(tool, SCHEMA_NAME, literal(label));
        }
    }

    for kind in AnnotationKind::ALL {
        let predicate = format!("http://schema.org/{}", kind.predicate());
        for row in &query(service, kind.column(), &templates::annotations(kind))? {
            raw.push_triple(row.require("tool")?, &predicate, iri(row.require("concept")?));
        }
    }
    info!("Loaded {} statements from the endpoint", raw.len());
    Ok(())
}
