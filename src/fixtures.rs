//! A small ontology that is shared by the unit tests
//!
//! ```text
//! topic_0003 Topic                    operation_0004 Operation
//! ├── topic_0080 Sequence analysis    ├── operation_2403 Sequence analysis
//! │   └── topic_3168 Sequencing       │   ├── operation_0292 Sequence alignment
//! └── topic_0622 Genomics             │   └── operation_3198 Read mapping
//!                                     ├── operation_2945 Analysis
//! topic_0156 (deprecated)             │   └── operation_3198 Read mapping
//!     -> topic_0080                   └── operation_0335 Formatting
//!
//!                                     operation_0226 (deprecated)
//!                                         -> operation_2403
//! ```
//!
//! | tool   | topics                     | operations     |
//! |--------|----------------------------|----------------|
//! | star   | 3168, 0080                 | 0292, 3198     |
//! | bowtie | 3168                       | 3198           |
//! | blast  | 0156 (deprecated), 0080    | 2403           |
//! | lonely |                            |                |
//! | weird  | 9999 (undeclared)          | 0226 (deprecated) |
use crate::builder::Builder;
use crate::{AnnotationKind, ConceptId, Ontology, ToolId};

const CONCEPTS: [(&str, &str); 12] = [
    ("topic_0003", "Topic"),
    ("topic_0080", "Sequence analysis"),
    ("topic_3168", "Sequencing"),
    ("topic_0622", "Genomics"),
    ("topic_0156", "Sequence editing"),
    ("operation_0004", "Operation"),
    ("operation_2403", "Sequence analysis"),
    ("operation_0292", "Sequence alignment"),
    ("operation_3198", "Read mapping"),
    ("operation_2945", "Analysis"),
    ("operation_0335", "Formatting"),
    ("operation_0226", "Annotation"),
];

// (parent, child)
const IS_A: [(&str, &str); 9] = [
    ("topic_0003", "topic_0080"),
    ("topic_0080", "topic_3168"),
    ("topic_0003", "topic_0622"),
    ("operation_0004", "operation_2403"),
    ("operation_2403", "operation_0292"),
    ("operation_2403", "operation_3198"),
    ("operation_0004", "operation_2945"),
    ("operation_2945", "operation_3198"),
    ("operation_0004", "operation_0335"),
];

const TOOLS: [(&str, &str, &[&str], &[&str]); 5] = [
    ("star", "STAR", &["topic_3168", "topic_0080"], &["operation_0292", "operation_3198"]),
    ("bowtie", "Bowtie", &["topic_3168"], &["operation_3198"]),
    ("blast", "BLAST", &["topic_0156", "topic_0080"], &["operation_2403"]),
    ("lonely", "Lonely", &[], &[]),
    ("weird", "Weird", &["topic_9999"], &["operation_0226"]),
];

pub(crate) fn ontology() -> Ontology {
    let mut builder = Builder::new();
    builder.set_edam_version("1.25");
    for (id, label) in CONCEPTS {
        builder.add_concept(ConceptId::from(id), label);
    }

    let mut builder = builder.concepts_complete();
    for (parent, child) in IS_A {
        builder
            .add_parent(&ConceptId::from(parent), &ConceptId::from(child))
            .unwrap();
    }
    for (old, alternative) in [("topic_0156", "topic_0080"), ("operation_0226", "operation_2403")] {
        let old = ConceptId::from(old);
        builder.set_deprecated(&old).unwrap();
        builder
            .add_alternative(&old, &ConceptId::from(alternative))
            .unwrap();
    }

    let mut builder = builder.connect_all_concepts().unwrap();
    for (name, label, topics, operations) in TOOLS {
        let tool = ToolId::from_name(name);
        builder.add_tool(tool.clone(), label);
        for topic in topics {
            builder
                .annotate(&tool, AnnotationKind::Topic, ConceptId::from(*topic))
                .unwrap();
        }
        for operation in operations {
            builder
                .annotate(&tool, AnnotationKind::Operation, ConceptId::from(*operation))
                .unwrap();
        }
    }
    builder.build()
}
