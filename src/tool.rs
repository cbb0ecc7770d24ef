//! Software tools registered in bio.tools
use core::fmt::Debug;
use std::fmt::Display;

use crate::{AnnotationKind, ConceptGroup, ConceptId, BIOTOOLS_URI};

/// The identifier of a tool, stored as full URI
///
/// # Examples
///
/// ```
/// use edamannot::ToolId;
///
/// let star = ToolId::from_name("star");
/// assert_eq!(star.as_str(), "https://bio.tools/star");
/// assert_eq!(star.short(), "star");
///
/// let same = ToolId::from_name("https://bio.tools/star");
/// assert_eq!(star, same);
/// ```
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ToolId {
    inner: String,
}

impl ToolId {
    /// Creates the id from a bio.tools name or a full URI
    pub fn from_name(name: &str) -> ToolId {
        let name = name.trim().trim_start_matches('<').trim_end_matches('>');
        if name.starts_with("http") {
            ToolId {
                inner: name.to_string(),
            }
        } else {
            ToolId {
                inner: format!("{BIOTOOLS_URI}{name}"),
            }
        }
    }

    /// The full URI
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// The URI without the bio.tools namespace, e.g. `star`
    pub fn short(&self) -> &str {
        self.inner.strip_prefix(BIOTOOLS_URI).unwrap_or(&self.inner)
    }
}

impl From<&str> for ToolId {
    fn from(s: &str) -> Self {
        ToolId::from_name(s)
    }
}

impl From<String> for ToolId {
    fn from(s: String) -> Self {
        ToolId::from_name(&s)
    }
}

impl Debug for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ToolId({})", self.short())
    }
}

impl Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// A tool with its label and its asserted annotations
///
/// The annotations are stored exactly as asserted in bio.tools and can contain
/// deprecated concepts or concepts that are not part of EDAM at all.
/// Use [`crate::Ontology::annotations`] to get the cleaned up annotations.
#[derive(Debug, Clone)]
pub struct Tool {
    id: ToolId,
    label: String,
    topics: ConceptGroup,
    operations: ConceptGroup,
}

impl Tool {
    pub(crate) fn new(id: ToolId, label: &str) -> Tool {
        Tool {
            id,
            label: label.to_string(),
            topics: ConceptGroup::default(),
            operations: ConceptGroup::default(),
        }
    }

    /// The id of the tool
    pub fn id(&self) -> &ToolId {
        &self.id
    }

    /// The `sc:name` of the tool, or an empty string
    pub fn label(&self) -> &str {
        &self.label
    }

    /// All asserted concepts of the given kind
    pub fn asserted(&self, kind: AnnotationKind) -> &ConceptGroup {
        match kind {
            AnnotationKind::Topic => &self.topics,
            AnnotationKind::Operation => &self.operations,
        }
    }

    pub(crate) fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    /// Adds the concept to the asserted annotations
    ///
    /// Returns `false` if the annotation was already present
    pub(crate) fn add_annotation(&mut self, kind: AnnotationKind, concept: ConceptId) -> bool {
        match kind {
            AnnotationKind::Topic => self.topics.insert(concept),
            AnnotationKind::Operation => self.operations.insert(concept),
        }
    }
}

impl PartialEq for Tool {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tool {}
