//! RDF dumps of bio.tools and EDAM
//!
//! The serialization is derived from the file extension:
//!
//! - Turtle: `.ttl`, `.turtle`
//! - N-Triples: `.nt`
//! - RDF/XML: `.owl`, `.rdf`, `.xml`
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use sophia_api::parser::TripleParser;
use sophia_api::source::TripleSource;
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple;
use sophia_xml::parser::RdfXmlParser;
use tracing::debug;

use crate::parser::{RawGraph, RdfObject};
use crate::{EdamError, EdamResult};

/// Supported RDF serializations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle
    Turtle,
    /// N-Triples
    NTriples,
    /// RDF/XML, used by the EDAM OWL release
    RdfXml,
}

impl RdfFormat {
    /// Returns the format of the file, based on its extension
    ///
    /// # Errors
    ///
    /// [`EdamError::InvalidInput`] if the extension is unknown
    pub fn from_path(path: &Path) -> EdamResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "ttl" | "turtle" => Ok(RdfFormat::Turtle),
            "nt" => Ok(RdfFormat::NTriples),
            "owl" | "rdf" | "xml" => Ok(RdfFormat::RdfXml),
            _ => Err(EdamError::InvalidInput(format!(
                "unknown RDF format of {}",
                path.display()
            ))),
        }
    }
}

fn object<T: Term>(term: T) -> RdfObject {
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map_or(RdfObject::Blank, |iri| RdfObject::Iri(iri.as_str().to_string())),
        TermKind::Literal => RdfObject::Literal(
            term.lexical_form()
                .map(|value| value.to_string())
                .unwrap_or_default(),
        ),
        _ => RdfObject::Blank,
    }
}

fn read<S: TripleSource>(mut source: S, raw: &mut RawGraph, path: &Path) -> EdamResult<()> {
    source
        .for_each_triple(|triple| {
            let (s, p) = (triple.s(), triple.p());
            let (Some(subject), Some(predicate)) = (s.iri(), p.iri()) else {
                return;
            };
            raw.push_triple(subject.as_str(), predicate.as_str(), object(triple.o()));
        })
        .map_err(|err| EdamError::InvalidInput(format!("{}: {err}", path.display())))
}

/// Parses the file and adds all triples to `raw`
///
/// # Errors
///
/// - The file can't be opened: [`EdamError::CannotOpenFile`]
/// - The file is not valid RDF or has an unknown extension: [`EdamError::InvalidInput`]
pub fn load(path: &Path, raw: &mut RawGraph) -> EdamResult<()> {
    let format = RdfFormat::from_path(path)?;
    let file =
        File::open(path).map_err(|_| EdamError::CannotOpenFile(path.display().to_string()))?;
    let reader = BufReader::new(file);
    let before = raw.len();
    match format {
        RdfFormat::Turtle => read(sophia_turtle::parser::turtle::parse_bufread(reader), raw, path)?,
        RdfFormat::NTriples => read(sophia_turtle::parser::nt::parse_bufread(reader), raw, path)?,
        RdfFormat::RdfXml => read(RdfXmlParser::default().parse(reader), raw, path)?,
    }
    debug!(
        "Read {} triples from {}",
        raw.len() - before,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;
    use crate::{AnnotationKind, Closure, ConceptId, ToolId};

    const EDAM: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix edam: <http://edamontology.org/> .
@prefix oboInOwl: <http://www.geneontology.org/formats/oboInOwl#> .

<http://edamontology.org> a owl:Ontology ;
    owl:versionIRI <http://edamontology.org/1.25> .

edam:topic_0003 a owl:Class ; rdfs:label "Topic" .
edam:topic_0080 a owl:Class ;
    rdfs:label "Sequence analysis" ;
    rdfs:subClassOf edam:topic_0003 , [ a owl:Restriction ] .
edam:topic_0156 a owl:Class ;
    rdfs:label "Sequence editing" ;
    owl:deprecated true ;
    oboInOwl:consider edam:topic_0080 .
"#;

    const TOOLS: &str = r#"
<https://bio.tools/blast> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/SoftwareApplication> .
<https://bio.tools/blast> <http://schema.org/name> "BLAST" .
<https://bio.tools/blast> <http://schema.org/applicationSubCategory> <http://edamontology.org/topic_0080> .
<https://bio.tools/blast> <http://schema.org/applicationSubCategory> <http://edamontology.org/topic_0156> .
"#;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn formats() {
        assert_eq!(RdfFormat::from_path(Path::new("EDAM.owl")).unwrap(), RdfFormat::RdfXml);
        assert_eq!(RdfFormat::from_path(Path::new("dump.TTL")).unwrap(), RdfFormat::Turtle);
        assert_eq!(RdfFormat::from_path(Path::new("dump.nt")).unwrap(), RdfFormat::NTriples);
        assert!(RdfFormat::from_path(Path::new("dump.json")).is_err());
        assert!(RdfFormat::from_path(Path::new("dump")).is_err());
    }

    #[test]
    fn turtle_and_ntriples() {
        let dir = tempfile::tempdir().unwrap();
        let edam = write(dir.path(), "edam.ttl", EDAM);
        let tools = write(dir.path(), "tools.nt", TOOLS);

        let mut raw = RawGraph::default();
        load(&edam, &mut raw).unwrap();
        load(&tools, &mut raw).unwrap();
        let ont = raw.into_ontology().unwrap();

        assert_eq!(ont.len(), 3);
        assert_eq!(ont.edam_version(), Some("1.25"));
        let blast = ToolId::from_name("blast");
        assert_eq!(ont.tool_label(&blast), Some("BLAST"));
        let topics = ont.annotation_ids(&blast, AnnotationKind::Topic, Closure::Transitive);
        assert_eq!(topics.len(), 2);
        let deprecated = ont.deprecated_annotations(&blast, AnnotationKind::Topic);
        assert_eq!(deprecated.len(), 1);
        assert!(deprecated[0]
            .alternative_ids()
            .contains(&ConceptId::from("topic_0080")));
    }

    #[test]
    fn blank_node_subjects_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "{EDAM}\n[] a owl:Class ; rdfs:label \"Anonymous\" ; rdfs:subClassOf edam:topic_0003 .\n"
        );
        let edam = write(dir.path(), "edam.ttl", &content);

        let mut raw = RawGraph::default();
        load(&edam, &mut raw).unwrap();
        let ont = raw.into_ontology().unwrap();
        assert_eq!(ont.len(), 3);
        assert!(ont.concept(&ConceptId::from("topic_0080")).is_some());
    }

    #[test]
    fn missing_file() {
        let mut raw = RawGraph::default();
        let err = load(Path::new("/does/not/exist.ttl"), &mut raw).unwrap_err();
        assert!(matches!(err, EdamError::CannotOpenFile(_)));
    }

    #[test]
    fn invalid_turtle() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "broken.ttl", "<a> <b> ");
        let mut raw = RawGraph::default();
        let err = load(&path, &mut raw).unwrap_err();
        assert!(matches!(err, EdamError::InvalidInput(_)));
    }
}
