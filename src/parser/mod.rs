//! Loading of bio.tools and EDAM data
//!
//! All sources are reduced to RDF triples that are collected in a [`RawGraph`].
//! The graph only keeps the statements that are relevant for annotations:
//!
//! | statement | meaning |
//! |-----------|---------|
//! | `?c rdf:type owl:Class` | `?c` is a concept |
//! | `?c rdfs:label ?l` | label of a concept |
//! | `?c rdfs:subClassOf ?p` | `?p` is a parent of `?c` |
//! | `?c rdfs:subClassOf owl:DeprecatedClass` | `?c` is deprecated |
//! | `?c owl:deprecated true` | `?c` is deprecated |
//! | `?c oboInOwl:consider ?a`, `?c oboInOwl:replacedBy ?a` | `?a` is an alternative of `?c` |
//! | `?t rdf:type sc:SoftwareApplication` | `?t` is a tool |
//! | `?t sc:name ?l` | label of a tool |
//! | `?t sc:applicationSubCategory ?c` | topic annotation |
//! | `?t sc:featureList ?c` | operation annotation |
//! | `?o owl:versionIRI ?v` | EDAM release |
//!
//! schema.org terms are accepted with `http` and `https` namespaces.
//! Once all sources are loaded, [`RawGraph::into_ontology`] builds the
//! [`Ontology`](crate::Ontology).
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{debug, warn};

use crate::builder::Builder;
use crate::{AnnotationKind, ConceptId, EdamError, EdamResult, Ontology, ToolId, EDAM_URI};

pub mod endpoint;
pub mod rdf;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
const OWL_DEPRECATED_CLASS: &str = "http://www.w3.org/2002/07/owl#DeprecatedClass";
const OWL_DEPRECATED: &str = "http://www.w3.org/2002/07/owl#deprecated";
const OWL_VERSION_IRI: &str = "http://www.w3.org/2002/07/owl#versionIRI";
const OBO_CONSIDER: &str = "http://www.geneontology.org/formats/oboInOwl#consider";
const OBO_REPLACED_BY: &str = "http://www.geneontology.org/formats/oboInOwl#replacedBy";
const SCHEMA_HTTP: &str = "http://schema.org/";
const SCHEMA_HTTPS: &str = "https://schema.org/";

/// The object of a triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RdfObject {
    /// A named resource
    Iri(String),
    /// The lexical form of a literal
    Literal(String),
    /// A blank node, e.g. an OWL restriction
    Blank,
}

impl RdfObject {
    fn iri(&self) -> Option<&str> {
        match self {
            RdfObject::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    fn literal(&self) -> Option<&str> {
        match self {
            RdfObject::Literal(value) => Some(value),
            _ => None,
        }
    }
}

fn schema_term(iri: &str) -> Option<&str> {
    iri.strip_prefix(SCHEMA_HTTP)
        .or_else(|| iri.strip_prefix(SCHEMA_HTTPS))
}

/// Collects the relevant statements of all sources
///
/// # Examples
///
/// ```
/// use edamannot::parser::{RawGraph, RdfObject};
///
/// let mut raw = RawGraph::default();
/// let class = RdfObject::Iri("http://www.w3.org/2002/07/owl#Class".to_string());
/// raw.push_triple(
///     "http://edamontology.org/topic_0003",
///     "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
///     class,
/// );
/// raw.push_triple(
///     "http://edamontology.org/topic_0003",
///     "http://www.w3.org/2000/01/rdf-schema#label",
///     RdfObject::Literal("Topic".to_string()),
/// );
///
/// let ontology = raw.into_ontology().unwrap();
/// assert_eq!(ontology.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RawGraph {
    classes: BTreeSet<ConceptId>,
    labels: HashMap<String, String>,
    parents: BTreeSet<(ConceptId, ConceptId)>,
    deprecated: HashSet<ConceptId>,
    alternatives: BTreeSet<(ConceptId, ConceptId)>,
    tools: BTreeSet<ToolId>,
    annotations: BTreeMap<ToolId, Vec<(AnnotationKind, ConceptId)>>,
    edam_version: Option<String>,
    triples: usize,
}

impl RawGraph {
    /// Records a triple, statements that are not relevant are ignored
    pub fn push_triple(&mut self, subject: &str, predicate: &str, object: RdfObject) {
        self.triples += 1;
        match predicate {
            RDF_TYPE => match object.iri() {
                Some(OWL_CLASS) => {
                    self.classes.insert(ConceptId::from(subject));
                }
                Some(OWL_DEPRECATED_CLASS) => {
                    self.deprecated.insert(ConceptId::from(subject));
                }
                Some(class) if schema_term(class) == Some("SoftwareApplication") => {
                    self.tools.insert(ToolId::from_name(subject));
                }
                _ => {}
            },
            RDFS_LABEL => {
                if let Some(label) = object.literal() {
                    self.labels
                        .entry(subject.to_string())
                        .or_insert_with(|| label.to_string());
                }
            }
            RDFS_SUBCLASS_OF => match object.iri() {
                Some(OWL_DEPRECATED_CLASS) => {
                    self.deprecated.insert(ConceptId::from(subject));
                }
                Some(parent) => {
                    self.parents
                        .insert((ConceptId::from(subject), ConceptId::from(parent)));
                }
                None => {}
            },
            OWL_DEPRECATED => {
                if matches!(object.literal(), Some("true" | "True" | "1")) {
                    self.deprecated.insert(ConceptId::from(subject));
                }
            }
            OBO_CONSIDER | OBO_REPLACED_BY => {
                let alternative = match &object {
                    RdfObject::Iri(iri) => Some(iri.as_str()),
                    RdfObject::Literal(value) if value.starts_with(EDAM_URI) => Some(value.as_str()),
                    _ => None,
                };
                if let Some(alternative) = alternative {
                    self.alternatives
                        .insert((ConceptId::from(subject), ConceptId::from(alternative)));
                }
            }
            OWL_VERSION_IRI => {
                if let Some(iri) = object.iri() {
                    let version = iri.strip_prefix(EDAM_URI).unwrap_or(iri);
                    self.edam_version = Some(version.trim_end_matches('/').to_string());
                }
            }
            _ => self.push_schema_triple(subject, predicate, object),
        }
    }

    fn push_schema_triple(&mut self, subject: &str, predicate: &str, object: RdfObject) {
        let Some(term) = schema_term(predicate) else {
            return;
        };
        let kind = match term {
            "name" => {
                if let Some(label) = object.literal() {
                    self.labels
                        .entry(ToolId::from_name(subject).as_str().to_string())
                        .or_insert_with(|| label.to_string());
                }
                return;
            }
            "applicationSubCategory" => AnnotationKind::Topic,
            "featureList" => AnnotationKind::Operation,
            _ => return,
        };
        if let Some(concept) = object.iri() {
            self.annotations
                .entry(ToolId::from_name(subject))
                .or_default()
                .push((kind, ConceptId::from(concept)));
        }
    }

    /// Number of triples that were pushed
    pub fn len(&self) -> usize {
        self.triples
    }

    /// Returns `true` if no triple was pushed
    pub fn is_empty(&self) -> bool {
        self.triples == 0
    }

    fn label(&self, iri: &str) -> &str {
        self.labels.get(iri).map_or("", String::as_str)
    }

    /// Builds the [`Ontology`] from all collected statements
    ///
    /// Only declared classes become concepts. Relations to undeclared classes
    /// are skipped. Annotations are kept as asserted.
    ///
    /// # Errors
    ///
    /// [`EdamError::CyclicHierarchy`] if the `is-a` hierarchy contains a cycle
    pub fn into_ontology(self) -> EdamResult<Ontology> {
        let mut builder = Builder::new();
        if let Some(version) = &self.edam_version {
            builder.set_edam_version(version);
        }
        for id in &self.classes {
            builder.add_concept(id.clone(), self.label(id.as_str()));
        }

        let mut builder = builder.concepts_complete();
        let mut skipped = 0usize;
        for (child, parent) in &self.parents {
            match builder.add_parent(parent, child) {
                Ok(()) => {}
                Err(EdamError::DoesNotExist(_)) => skipped += 1,
                Err(err) => return Err(err),
            }
        }
        if skipped > 0 {
            debug!("Skipped {} subclass relations of undeclared classes", skipped);
        }
        for id in &self.deprecated {
            if builder.set_deprecated(id).is_err() {
                debug!("Deprecated concept {} is not declared", id);
            }
        }
        for (id, alternative) in &self.alternatives {
            if builder.add_alternative(id, alternative).is_err() {
                warn!("Ignoring alternative {} of {}", alternative, id);
            }
        }

        let mut builder = builder.connect_all_concepts()?;
        for tool in &self.tools {
            builder.add_tool(tool.clone(), self.label(tool.as_str()));
        }
        let mut orphans = 0usize;
        for (tool, annotations) in self.annotations {
            if !self.tools.contains(&tool) {
                orphans += annotations.len();
                continue;
            }
            for (kind, concept) in annotations {
                builder.annotate(&tool, kind, concept)?;
            }
        }
        if orphans > 0 {
            warn!("Ignoring {} annotations of undeclared tools", orphans);
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Closure;

    fn iri(s: &str) -> RdfObject {
        RdfObject::Iri(s.to_string())
    }

    fn literal(s: &str) -> RdfObject {
        RdfObject::Literal(s.to_string())
    }

    fn edam(s: &str) -> String {
        format!("{EDAM_URI}{s}")
    }

    fn class(raw: &mut RawGraph, id: &str, label: &str) {
        raw.push_triple(&edam(id), RDF_TYPE, iri(OWL_CLASS));
        raw.push_triple(&edam(id), RDFS_LABEL, literal(label));
    }

    fn raw_graph() -> RawGraph {
        let mut raw = RawGraph::default();
        raw.push_triple(
            "http://edamontology.org",
            OWL_VERSION_IRI,
            iri("http://edamontology.org/1.25"),
        );
        class(&mut raw, "topic_0003", "Topic");
        class(&mut raw, "topic_0080", "Sequence analysis");
        class(&mut raw, "topic_0156", "Sequence editing");
        raw.push_triple(&edam("topic_0080"), RDFS_SUBCLASS_OF, iri(&edam("topic_0003")));
        raw.push_triple(&edam("topic_0080"), RDFS_SUBCLASS_OF, RdfObject::Blank);
        raw.push_triple(&edam("topic_0080"), RDFS_SUBCLASS_OF, iri(&edam("data_0006")));
        raw.push_triple(&edam("topic_0156"), OWL_DEPRECATED, literal("true"));
        raw.push_triple(&edam("topic_0156"), OBO_REPLACED_BY, iri(&edam("topic_0080")));

        let star = "https://bio.tools/star";
        raw.push_triple(star, RDF_TYPE, iri("http://schema.org/SoftwareApplication"));
        raw.push_triple(star, "http://schema.org/name", literal("STAR"));
        raw.push_triple(star, "https://schema.org/applicationSubCategory", iri(&edam("topic_0080")));
        raw.push_triple(star, "http://schema.org/applicationSubCategory", iri(&edam("topic_0156")));
        raw.push_triple(star, "http://schema.org/featureList", iri(&edam("operation_0292")));
        raw.push_triple(
            "https://bio.tools/ghost",
            "http://schema.org/featureList",
            iri(&edam("operation_0292")),
        );
        raw
    }

    #[test]
    fn concepts_and_hierarchy() {
        let raw = raw_graph();
        assert!(!raw.is_empty());
        let ont = raw.into_ontology().unwrap();
        assert_eq!(ont.len(), 3);
        assert_eq!(ont.edam_version(), Some("1.25"));
        let analysis = ont.concept(&ConceptId::from("topic_0080")).unwrap();
        assert_eq!(analysis.label(), "Sequence analysis");
        assert_eq!(analysis.parent_ids().len(), 1);

        let editing = ont.concept(&ConceptId::from("topic_0156")).unwrap();
        assert!(editing.is_deprecated());
        assert!(editing.alternative_ids().contains(&ConceptId::from("topic_0080")));
    }

    #[test]
    fn tools_and_annotations() {
        let ont = raw_graph().into_ontology().unwrap();
        assert_eq!(ont.n_tools(), 1);
        let star = ToolId::from_name("star");
        assert_eq!(ont.tool_label(&star), Some("STAR"));
        let topics = ont.annotation_ids(&star, AnnotationKind::Topic, Closure::Transitive);
        assert_eq!(topics.len(), 2);
        assert_eq!(ont.deprecated_annotations(&star, AnnotationKind::Topic).len(), 1);
        assert_eq!(
            ont.undeclared_annotations(&star, AnnotationKind::Operation),
            vec![ConceptId::from("operation_0292")]
        );
        assert!(ont.tool(&ToolId::from_name("ghost")).is_none());
    }

    #[test]
    fn deprecated_class_as_parent() {
        let mut raw = RawGraph::default();
        class(&mut raw, "operation_0226", "Annotation");
        raw.push_triple(&edam("operation_0226"), RDFS_SUBCLASS_OF, iri(OWL_DEPRECATED_CLASS));
        let ont = raw.into_ontology().unwrap();
        let concept = ont.concept(&ConceptId::from("operation_0226")).unwrap();
        assert!(concept.is_deprecated());
        assert!(concept.parent_ids().is_empty());
    }

    #[test]
    fn cyclic_hierarchy() {
        let mut raw = RawGraph::default();
        class(&mut raw, "topic_0001", "A");
        class(&mut raw, "topic_0002", "B");
        raw.push_triple(&edam("topic_0001"), RDFS_SUBCLASS_OF, iri(&edam("topic_0002")));
        raw.push_triple(&edam("topic_0002"), RDFS_SUBCLASS_OF, iri(&edam("topic_0001")));
        let err = raw.into_ontology().unwrap_err();
        assert!(matches!(err, EdamError::CyclicHierarchy(_, _)));
    }
}
