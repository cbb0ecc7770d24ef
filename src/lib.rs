//! Annotation metrics for bioinformatics software registered in [bio.tools](https://bio.tools)
//!
//! Every tool in bio.tools is annotated with concepts of the
//! [EDAM ontology](https://edamontology.org): *Topics* describe the scientific
//! domain of the tool, *Operations* describe what the tool does.
//! This crate loads the tools and the EDAM hierarchy into an in-memory [`Ontology`]
//! and derives:
//!
//! - direct and transitive annotation tables ([`Ontology::annotation_table`])
//! - the direct annotations that are redundant, because a more specific
//!   annotation exists for the same tool ([`redundancy`])
//! - frequency, information content and entropy of every concept and
//!   aggregated scores per tool ([`metrics`])
//! - annotation graphs of one or many tools, rendered through Graphviz ([`graph`])
//!
//! All tables can be materialized into a cache directory ([`table::TableStore`]).
//!
//! # Examples
//!
//! ```
//! use edamannot::builder::Builder;
//! use edamannot::{AnnotationKind, Closure, ConceptId, ToolId};
//!
//! let mut builder = Builder::new();
//! builder.add_concept(ConceptId::from("topic_0003"), "Topic");
//! builder.add_concept(ConceptId::from("topic_0080"), "Sequence analysis");
//! let mut builder = builder.concepts_complete();
//! builder
//!     .add_parent(&ConceptId::from("topic_0003"), &ConceptId::from("topic_0080"))
//!     .unwrap();
//! let mut builder = builder.connect_all_concepts().unwrap();
//!
//! let star = ToolId::from_name("star");
//! builder.add_tool(star.clone(), "STAR");
//! builder
//!     .annotate(&star, AnnotationKind::Topic, ConceptId::from("topic_0080"))
//!     .unwrap();
//! let ontology = builder.build();
//!
//! let topics = ontology.annotation_ids(&star, AnnotationKind::Topic, Closure::Transitive);
//! assert_eq!(topics.len(), 2);
//! ```

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

pub mod concept;
pub mod config;
pub mod graph;
pub mod metrics;
mod ontology;
pub mod parser;
pub mod redundancy;
pub mod sparql;
pub mod table;
pub mod tool;
pub mod utils;

#[cfg(test)]
mod fixtures;

pub use concept::{AnnotationKind, Closure, ConceptGroup, ConceptId, EdamConcept};
pub use ontology::builder;
pub use ontology::{Ancestry, Ontology};
pub use tool::{Tool, ToolId};

/// Namespace of all EDAM concepts
pub const EDAM_URI: &str = "http://edamontology.org/";

/// Namespace of all bio.tools entries
pub const BIOTOOLS_URI: &str = "https://bio.tools/";

/// Root of the EDAM operation branch. Operations outside of it are obsolete
pub const OPERATION_ROOT: &str = "operation_0004";

/// Root of the EDAM topic branch
pub const TOPIC_ROOT: &str = "topic_0003";

const DEFAULT_NUM_PARENTS: usize = 4;
const DEFAULT_NUM_ALL_PARENTS: usize = 16;

/// Main Error type for this crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EdamError {
    /// A concept or tool is required but not present
    #[error("entity does not exist: {0}")]
    DoesNotExist(String),
    /// A parameter or a line of input data is malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The SPARQL endpoint is unreachable or returned malformed results
    #[error("query endpoint failed: {0}")]
    Endpoint(String),
    /// A metric can't be calculated, e.g. because no tool has an annotation
    #[error("metric is undefined: {0}")]
    UndefinedMetric(String),
    /// Two concepts are ancestors of each other
    #[error("cyclic hierarchy between {0} and {1}")]
    CyclicHierarchy(String, String),
    /// Failed to open or write a file
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// A cached table could not be parsed
    #[error("unable to parse table: {0}")]
    ParseTableError(String),
    /// The graph layout program failed
    #[error("unable to render graph: {0}")]
    Renderer(String),
}

impl From<ParseIntError> for EdamError {
    fn from(err: ParseIntError) -> Self {
        EdamError::ParseTableError(err.to_string())
    }
}

impl From<ParseFloatError> for EdamError {
    fn from(err: ParseFloatError) -> Self {
        EdamError::ParseTableError(err.to_string())
    }
}

impl From<reqwest::Error> for EdamError {
    fn from(err: reqwest::Error) -> Self {
        EdamError::Endpoint(err.to_string())
    }
}

/// Shortcut for `Result<T, EdamError>`
pub type EdamResult<T> = Result<T, EdamError>;
