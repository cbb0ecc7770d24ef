use core::fmt::Debug;
use std::collections::hash_map::Values;
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::concept::internal::ConceptInternal;
use crate::parser::{self, RawGraph};
use crate::sparql::SparqlEndpoint;
use crate::{ConceptId, EdamConcept, EdamResult, Tool, ToolId};

pub mod builder;
mod conceptarena;
mod extract;

use conceptarena::Arena;
pub use extract::Ancestry;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Ontology` is the main interface of the `edamannot` crate and contains all data
///
/// The [`Ontology`] holds the EDAM hierarchy of concepts ([`EdamConcept`]) and all
/// bio.tools [`Tool`]s with their asserted annotations.
///
/// It is created from local RDF dumps ([`Ontology::from_files`]), from a SPARQL
/// endpoint ([`Ontology::from_endpoint`]) or step by step with the
/// [`crate::builder::Builder`].
///
/// # Relations
///
/// ```mermaid
/// erDiagram
///     ONTOLOGY ||--|{ CONCEPT : contains
///     ONTOLOGY ||--|{ TOOL : contains
///     CONCEPT ||--o{ CONCEPT : is_a
///     CONCEPT ||--o{ CONCEPT : superseded_by
///     TOOL }|--o{ CONCEPT : annotated_with
///     CONCEPT {
///         ConceptId id
///         str label
///         bool deprecated
///     }
///     TOOL {
///         ToolId id
///         str label
///     }
/// ```
///
/// # Examples
///
/// ```no_run
/// use edamannot::{AnnotationKind, Closure, Ontology, ToolId};
///
/// let ontology = Ontology::from_files("data/bioschemas.ttl", "data/EDAM.owl").unwrap();
///
/// let star = ToolId::from_name("star");
/// for topic in ontology.annotations(&star, AnnotationKind::Topic, Closure::Transitive) {
///     println!("{}\t{}", topic.id(), topic.label());
/// }
/// ```
#[derive(Default)]
pub struct Ontology {
    concepts: Arena,
    tools: HashMap<ToolId, Tool>,
    edam_version: Option<String>,
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ontology with {} concepts and {} tools",
            self.concepts.len(),
            self.tools.len()
        )
    }
}

impl Ontology {
    /// Builds the [`Ontology`] from a bio.tools dump and the EDAM ontology
    ///
    /// `bioschemas` must be a Turtle or N-Triples file of the bio.tools
    /// Bioschemas export. `edam` can be RDF/XML (`.owl`, `.rdf`, `.xml`)
    /// or Turtle.
    ///
    /// # Errors
    ///
    /// - A file is not present or not readable: [`crate::EdamError::CannotOpenFile`]
    /// - A file is not valid RDF: [`crate::EdamError::InvalidInput`]
    /// - The hierarchy is cyclic: [`crate::EdamError::CyclicHierarchy`]
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(bioschemas: P, edam: Q) -> EdamResult<Self> {
        let mut raw = RawGraph::default();
        parser::rdf::load(edam.as_ref(), &mut raw)?;
        parser::rdf::load(bioschemas.as_ref(), &mut raw)?;
        let ontology = raw.into_ontology()?;
        info!("Loaded {:?}", ontology);
        Ok(ontology)
    }

    /// Builds the [`Ontology`] from a SPARQL endpoint that holds bio.tools and EDAM
    ///
    /// # Errors
    ///
    /// - The endpoint is not reachable or returns malformed data: [`crate::EdamError::Endpoint`]
    /// - The hierarchy is cyclic: [`crate::EdamError::CyclicHierarchy`]
    pub fn from_endpoint(endpoint: &SparqlEndpoint) -> EdamResult<Self> {
        let mut raw = RawGraph::default();
        parser::endpoint::load(endpoint, &mut raw)?;
        let ontology = raw.into_ontology()?;
        info!("Loaded {:?} from {}", ontology, endpoint.url());
        Ok(ontology)
    }

    /// Returns the number of concepts in the `Ontology`
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Returns `true` if the `Ontology` does not contain any concepts
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Returns the [`EdamConcept`] of the provided [`ConceptId`]
    ///
    /// If no such concept is present in the Ontology, `None` is returned
    pub fn concept(&self, id: &ConceptId) -> Option<EdamConcept> {
        self.get(id).map(|concept| EdamConcept::new(self, concept))
    }

    /// Returns an iterator of all [`EdamConcept`]s of the `Ontology`, in arbitrary order
    pub fn concepts(&self) -> OntologyIterator {
        OntologyIterator {
            inner: self.concepts.values(),
            ontology: self,
        }
    }

    /// Returns the [`Tool`] of the provided [`ToolId`]
    pub fn tool(&self, id: &ToolId) -> Option<&Tool> {
        self.tools.get(id)
    }

    /// Returns all tools, sorted by [`ToolId`]
    pub fn tools(&self) -> Vec<&Tool> {
        let mut tools: Vec<&Tool> = self.tools.values().collect();
        tools.sort_by(|a, b| a.id().cmp(b.id()));
        tools
    }

    /// Returns the number of tools
    pub fn n_tools(&self) -> usize {
        self.tools.len()
    }

    /// Returns the [`Tool`] with the given `sc:name`
    ///
    /// If several tools share the label, the one with the smallest [`ToolId`] is returned
    pub fn tool_by_label(&self, label: &str) -> Option<&Tool> {
        self.tools
            .values()
            .filter(|tool| tool.label() == label)
            .min_by(|a, b| a.id().cmp(b.id()))
    }

    /// Returns the label of the tool, `None` if the tool does not exist
    pub fn tool_label(&self, id: &ToolId) -> Option<&str> {
        self.tool(id).map(Tool::label)
    }

    /// Returns the EDAM release, if known
    pub fn edam_version(&self) -> Option<&str> {
        self.edam_version.as_deref()
    }

    /// Returns the code to create a `Mermaid` flow diagram of the hierarchy
    ///
    /// This is meant to be used with small ontologies only
    pub fn as_mermaid(&self) -> String {
        let mut code = String::new();
        code.push_str("graph TD\n");
        for id in self.concepts.keys() {
            let concept = self.concepts.get_unchecked(&id);
            code.push_str(&format!(
                "{}[\"{}\n{}\"]\n",
                id.short(),
                id.short(),
                concept.label().replace('"', "'")
            ));
            for child in concept.children() {
                code.push_str(&format!("{} --> {}\n", id.short(), child.short()));
            }
        }
        debug!("Created mermaid diagram of {} concepts", self.len());
        code
    }

    pub(crate) fn get(&self, id: &ConceptId) -> Option<&ConceptInternal> {
        self.concepts.get(id)
    }
}

/// An iterator of [`EdamConcept`]s
pub struct OntologyIterator<'a> {
    inner: Values<'a, ConceptId, ConceptInternal>,
    ontology: &'a Ontology,
}

impl<'a> std::iter::Iterator for OntologyIterator<'a> {
    type Item = EdamConcept<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|concept| EdamConcept::new(self.ontology, concept))
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = EdamConcept<'a>;
    type IntoIter = OntologyIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.concepts()
    }
}
