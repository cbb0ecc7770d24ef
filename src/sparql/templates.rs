//! SPARQL queries against a store that holds bio.tools and EDAM
//!
//! The bulk queries load everything needed to build an [`crate::Ontology`].
//! The per-tool queries answer the same questions as the in-memory
//! extractor and are printed by `edamannot describe --format sparql`.
use crate::{AnnotationKind, Closure, ConceptId, ToolId};

/// Prefixes that all queries rely on
pub const PREFIXES: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
PREFIX oboInOwl: <http://www.geneontology.org/formats/oboInOwl#>
PREFIX bt: <https://bio.tools/>
PREFIX edam: <http://edamontology.org/>
PREFIX sc: <http://schema.org/>
";

const NOT_DEPRECATED: &str = "FILTER NOT EXISTS { ?concept rdfs:subClassOf? owl:DeprecatedClass }";

fn with_prefixes(body: &str) -> String {
    format!("{PREFIXES}\n{}", body.trim_start())
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// The release of EDAM, from `owl:versionIRI`
pub fn edam_version() -> String {
    with_prefixes(
        "
SELECT ?versionIRI
WHERE {
  ?ontology rdf:type owl:Ontology .
  ?ontology owl:versionIRI ?versionIRI .
}",
    )
}

/// Number of tools
pub fn tool_count() -> String {
    with_prefixes(
        "
SELECT (COUNT(DISTINCT ?tool) AS ?nbTools)
WHERE {
  ?tool rdf:type sc:SoftwareApplication .
}",
    )
}

/// All tools with their `sc:name`, or an empty label
pub fn tools() -> String {
    with_prefixes(
        r#"
SELECT DISTINCT ?tool ?toolLabel
WHERE {
  ?tool rdf:type sc:SoftwareApplication .
  OPTIONAL { ?tool sc:name ?tLabel }
  BIND(COALESCE(?tLabel, "") AS ?toolLabel)
}"#,
    )
}

/// All declared classes with their label
pub fn concepts() -> String {
    with_prefixes(
        "
SELECT DISTINCT ?concept ?conceptLabel
WHERE {
  ?concept rdf:type owl:Class .
  OPTIONAL { ?concept rdfs:label ?conceptLabel }
}",
    )
}

/// All `rdfs:subClassOf` relations between named classes
pub fn subclass_relations() -> String {
    with_prefixes(
        "
SELECT DISTINCT ?subConcept ?superConcept
WHERE {
  ?subConcept rdfs:subClassOf ?superConcept .
  FILTER(isIRI(?subConcept) && isIRI(?superConcept))
}",
    )
}

/// All concepts flagged with `owl:deprecated`
pub fn deprecated_concepts() -> String {
    with_prefixes(
        r#"
SELECT DISTINCT ?concept
WHERE {
  ?concept owl:deprecated ?flag .
  FILTER(STR(?flag) IN ("true", "True"))
}"#,
    )
}

/// Suggested replacements of deprecated concepts
pub fn alternatives() -> String {
    with_prefixes(
        "
SELECT DISTINCT ?concept ?conceptAlternative
WHERE {
  ?concept oboInOwl:consider|oboInOwl:replacedBy ?conceptAlternative .
}",
    )
}

/// All asserted annotations of the kind, including undeclared concepts
pub fn annotations(kind: AnnotationKind) -> String {
    with_prefixes(&format!(
        "
SELECT DISTINCT ?tool ?concept
WHERE {{
  ?tool rdf:type sc:SoftwareApplication .
  ?tool sc:{} ?concept .
}}",
        kind.predicate()
    ))
}

/// The label of one tool
pub fn tool_label(tool: &ToolId) -> String {
    with_prefixes(&format!(
        r#"
SELECT DISTINCT ?tool ?toolLabel
WHERE {{
  VALUES ?tool {{ <{}> }}
  ?tool rdf:type sc:SoftwareApplication .
  OPTIONAL {{ ?tool sc:name ?tLabel }}
  BIND(COALESCE(?tLabel, "") AS ?toolLabel)
}}"#,
        tool.as_str()
    ))
}

/// The tools with the given `sc:name`
pub fn tool_by_label(label: &str) -> String {
    with_prefixes(&format!(
        r#"
SELECT DISTINCT ?tool ?toolLabel
WHERE {{
  VALUES ?toolLabel {{ "{}" }}
  ?tool rdf:type sc:SoftwareApplication .
  ?tool sc:name ?toolLabel .
}}"#,
        escape_literal(label)
    ))
}

/// The active annotations of one tool, optionally with all ancestors
pub fn tool_annotations(tool: &ToolId, kind: AnnotationKind, closure: Closure) -> String {
    let path = match closure {
        Closure::Direct => "",
        Closure::Transitive => "/(rdfs:subClassOf*)",
    };
    with_prefixes(&format!(
        r#"
SELECT DISTINCT ?tool ?concept ?conceptLabel
WHERE {{
  VALUES ?tool {{ <{}> }}
  ?tool sc:{}{} ?concept .
  ?concept rdf:type owl:Class .
  {NOT_DEPRECATED}
  OPTIONAL {{ ?concept rdfs:label ?cLabel }}
  BIND(COALESCE(?cLabel, "") AS ?conceptLabel)
}}"#,
        tool.as_str(),
        kind.predicate(),
        path
    ))
}

/// The deprecated annotations of one tool and their alternatives
pub fn tool_deprecated_annotations(tool: &ToolId, kind: AnnotationKind) -> String {
    with_prefixes(&format!(
        r#"
SELECT DISTINCT ?concept ?conceptLabel ?conceptAlternative ?conceptAlternativeLabel
WHERE {{
  VALUES ?tool {{ <{}> }}
  ?tool sc:{} ?concept .
  {{ ?concept rdfs:subClassOf? owl:DeprecatedClass }}
  UNION
  {{ ?concept owl:deprecated ?flag FILTER(STR(?flag) IN ("true", "True")) }}
  OPTIONAL {{ ?concept rdfs:label ?cLabel }}
  BIND(COALESCE(?cLabel, "") AS ?conceptLabel)
  OPTIONAL {{
    ?concept oboInOwl:consider|oboInOwl:replacedBy ?conceptAlternative .
    OPTIONAL {{ ?conceptAlternative rdfs:label ?caLabel }}
    BIND(COALESCE(?caLabel, "") AS ?conceptAlternativeLabel)
  }}
}}"#,
        tool.as_str(),
        kind.predicate()
    ))
}

/// All `is-a` edges between a concept and the root of its branch
pub fn concept_hierarchy(concept: &ConceptId) -> String {
    with_prefixes(&format!(
        r#"
SELECT DISTINCT ?subConcept ?subConceptLabel ?superConcept ?superConceptLabel
WHERE {{
  VALUES ?concept {{ <{}> }}
  ?concept rdfs:subClassOf* ?subConcept .
  ?subConcept rdfs:subClassOf ?superConcept .
  ?superConcept rdf:type owl:Class .
  FILTER NOT EXISTS {{ ?subConcept rdfs:subClassOf? owl:DeprecatedClass }}
  FILTER NOT EXISTS {{ ?superConcept rdfs:subClassOf? owl:DeprecatedClass }}
  OPTIONAL {{ ?subConcept rdfs:label ?subLabel }}
  OPTIONAL {{ ?superConcept rdfs:label ?supLabel }}
  BIND(COALESCE(?subLabel, "") AS ?subConceptLabel)
  BIND(COALESCE(?supLabel, "") AS ?superConceptLabel)
}}"#,
        concept.as_str()
    ))
}

/// Tools with a topic that is not a declared class
pub fn undeclared_topics() -> String {
    with_prefixes(
        "
SELECT DISTINCT ?tool ?topic
WHERE {
  ?tool rdf:type sc:SoftwareApplication .
  ?tool sc:applicationSubCategory/(rdfs:subClassOf*) ?topic .
  FILTER NOT EXISTS { ?topic rdf:type owl:Class . }
}",
    )
}

/// Tools with an operation outside of the operation branch
pub fn obsolete_operations() -> String {
    with_prefixes(
        "
SELECT DISTINCT ?tool
WHERE {
  ?tool rdf:type sc:SoftwareApplication .
  ?tool sc:featureList ?operation .
  FILTER NOT EXISTS { ?operation rdfs:subClassOf* edam:operation_0004 . }
}",
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prefixed() {
        for query in [tools(), concepts(), annotations(AnnotationKind::Topic), tool_count()] {
            assert!(query.starts_with("PREFIX rdf:"));
            assert!(query.contains("\nSELECT"));
        }
    }

    #[test]
    fn annotation_predicates() {
        assert!(annotations(AnnotationKind::Operation).contains("?tool sc:featureList ?concept ."));
        let star = ToolId::from_name("star");
        let direct = tool_annotations(&star, AnnotationKind::Topic, Closure::Direct);
        assert!(direct.contains("VALUES ?tool { <https://bio.tools/star> }"));
        assert!(direct.contains("?tool sc:applicationSubCategory ?concept ."));
        let transitive = tool_annotations(&star, AnnotationKind::Topic, Closure::Transitive);
        assert!(transitive.contains("sc:applicationSubCategory/(rdfs:subClassOf*) ?concept"));
        assert!(transitive.contains(NOT_DEPRECATED));
    }

    #[test]
    fn label_is_escaped() {
        let query = tool_by_label("say \"hi\"");
        assert!(query.contains(r#"VALUES ?toolLabel { "say \"hi\"" }"#));
    }
}
