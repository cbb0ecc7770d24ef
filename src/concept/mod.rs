//! EDAM concepts and the relationship between concepts
//!
//! [`ConceptId`] identifies a concept, [`EdamConcept`] is the main struct to work
//! with a concept of the [`crate::Ontology`], [`ConceptGroup`] is a set of [`ConceptId`]s.
use core::fmt::Debug;
use std::fmt::Display;
use std::str::FromStr;

use crate::EdamError;

mod conceptid;
mod edamconcept;
mod group;
pub(crate) mod internal;

pub use conceptid::ConceptId;
pub use edamconcept::EdamConcept;
pub use group::{ConceptGroup, ConceptIds, Concepts};

/// The two EDAM branches that bio.tools uses to annotate tools
///
/// # Examples
///
/// ```
/// use edamannot::AnnotationKind;
///
/// let kind: AnnotationKind = "op".parse().unwrap();
/// assert_eq!(kind, AnnotationKind::Operation);
/// assert_eq!(kind.column(), "operation");
///
/// assert!("data".parse::<AnnotationKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnnotationKind {
    /// The scientific domain of a tool (`sc:applicationSubCategory`)
    Topic,
    /// The function of a tool (`sc:featureList`)
    Operation,
}

impl AnnotationKind {
    /// Both kinds, topics first
    pub const ALL: [AnnotationKind; 2] = [AnnotationKind::Topic, AnnotationKind::Operation];

    /// The schema.org property linking a tool to a concept of this kind
    pub fn predicate(&self) -> &'static str {
        match self {
            AnnotationKind::Topic => "applicationSubCategory",
            AnnotationKind::Operation => "featureList",
        }
    }

    /// Column name of the concept in tabular output
    pub fn column(&self) -> &'static str {
        match self {
            AnnotationKind::Topic => "topic",
            AnnotationKind::Operation => "operation",
        }
    }

    /// Column name of the concept label in tabular output
    pub fn label_column(&self) -> &'static str {
        match self {
            AnnotationKind::Topic => "topicLabel",
            AnnotationKind::Operation => "operationLabel",
        }
    }

    /// Column name of the redundant concept in redundancy tables
    pub fn redundant_column(&self) -> &'static str {
        match self {
            AnnotationKind::Topic => "redundantTopic",
            AnnotationKind::Operation => "redundantOperation",
        }
    }

    /// Column name of the redundant concept label in redundancy tables
    pub fn redundant_label_column(&self) -> &'static str {
        match self {
            AnnotationKind::Topic => "redundantTopicLabel",
            AnnotationKind::Operation => "redundantOperationLabel",
        }
    }

    /// Prefix of the local name of all concepts of this kind, e.g. `topic_`
    pub fn prefix(&self) -> &'static str {
        match self {
            AnnotationKind::Topic => "topic_",
            AnnotationKind::Operation => "operation_",
        }
    }

    /// Returns the kind for a column name, the inverse of [`AnnotationKind::column`]
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.column() == column)
    }
}

impl Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotationKind::Topic => write!(f, "Topic"),
            AnnotationKind::Operation => write!(f, "Operation"),
        }
    }
}

impl FromStr for AnnotationKind {
    type Err = EdamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "t" | "topic" | "topics" => Ok(AnnotationKind::Topic),
            "o" | "op" | "operation" | "operations" => Ok(AnnotationKind::Operation),
            _ => Err(EdamError::InvalidInput(format!(
                "unknown annotation type `{s}`, expected `topic` or `operation`"
            ))),
        }
    }
}

/// Direct annotations only, or direct annotations and all their ancestors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Closure {
    /// Only the concepts asserted for a tool
    #[default]
    Direct,
    /// The asserted concepts and all of their (non-deprecated) ancestors
    Transitive,
}

impl Closure {
    /// `Transitive` if `transitive` is true, `Direct` otherwise
    pub fn from_flag(transitive: bool) -> Self {
        if transitive {
            Closure::Transitive
        } else {
            Closure::Direct
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_kind() {
        assert_eq!("t".parse::<AnnotationKind>().unwrap(), AnnotationKind::Topic);
        assert_eq!("Topics".parse::<AnnotationKind>().unwrap(), AnnotationKind::Topic);
        assert_eq!("O".parse::<AnnotationKind>().unwrap(), AnnotationKind::Operation);
        assert_eq!(
            "operations".parse::<AnnotationKind>().unwrap(),
            AnnotationKind::Operation
        );
    }

    #[test]
    fn parse_invalid_kind() {
        let err = "format".parse::<AnnotationKind>().unwrap_err();
        assert!(matches!(err, EdamError::InvalidInput(_)));
        assert!("".parse::<AnnotationKind>().is_err());
    }

    #[test]
    fn column_roundtrip() {
        for kind in AnnotationKind::ALL {
            assert_eq!(AnnotationKind::from_column(kind.column()), Some(kind));
        }
        assert_eq!(AnnotationKind::from_column("tool"), None);
    }

    #[test]
    fn closure_flag() {
        assert_eq!(Closure::from_flag(true), Closure::Transitive);
        assert_eq!(Closure::from_flag(false), Closure::Direct);
    }
}
