use core::fmt::Debug;
use std::fmt::Display;

use crate::{AnnotationKind, EDAM_URI};

/// The identifier of a concept, stored as full URI
///
/// Local EDAM names like `topic_0080` are expanded to
/// `http://edamontology.org/topic_0080`.
///
/// # Examples
///
/// ```
/// use edamannot::{AnnotationKind, ConceptId};
///
/// let id = ConceptId::from("topic_0080");
/// assert_eq!(id.as_str(), "http://edamontology.org/topic_0080");
/// assert_eq!(id.short(), "topic_0080");
/// assert_eq!(id.kind(), Some(AnnotationKind::Topic));
///
/// assert_eq!(id, ConceptId::from("http://edamontology.org/topic_0080"));
/// ```
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ConceptId {
    inner: String,
}

impl ConceptId {
    fn new(s: &str) -> ConceptId {
        let s = s.trim().trim_start_matches('<').trim_end_matches('>');
        if s.starts_with("http://") || s.starts_with("https://") {
            ConceptId {
                inner: s.to_string(),
            }
        } else {
            ConceptId {
                inner: format!("{EDAM_URI}{s}"),
            }
        }
    }

    /// The full URI
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// The URI without the EDAM namespace, e.g. `operation_0292`
    ///
    /// URIs outside of the EDAM namespace are returned unchanged
    pub fn short(&self) -> &str {
        self.inner.strip_prefix(EDAM_URI).unwrap_or(&self.inner)
    }

    /// The EDAM branch, if the concept is a topic or an operation
    pub fn kind(&self) -> Option<AnnotationKind> {
        let short = self.short();
        AnnotationKind::ALL
            .into_iter()
            .find(|kind| short.starts_with(kind.prefix()))
    }
}

impl From<&str> for ConceptId {
    fn from(s: &str) -> Self {
        ConceptId::new(s)
    }
}

impl From<String> for ConceptId {
    fn from(s: String) -> Self {
        ConceptId::new(&s)
    }
}

impl From<&ConceptId> for ConceptId {
    fn from(id: &ConceptId) -> Self {
        id.clone()
    }
}

impl Debug for ConceptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConceptId({})", self.short())
    }
}

impl Display for ConceptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short())
    }
}

impl PartialEq<str> for ConceptId {
    fn eq(&self, other: &str) -> bool {
        self == &ConceptId::new(other)
    }
}

impl AsRef<str> for ConceptId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn expands_local_names() {
        let id = ConceptId::from("operation_0292");
        assert_eq!(id.as_str(), "http://edamontology.org/operation_0292");
        assert_eq!(id.to_string(), "operation_0292");
        assert_eq!(id.kind(), Some(AnnotationKind::Operation));
    }

    #[test]
    fn keeps_foreign_uris() {
        let id = ConceptId::from("<http://example.org/foo>");
        assert_eq!(id.as_str(), "http://example.org/foo");
        assert_eq!(id.short(), "http://example.org/foo");
        assert_eq!(id.kind(), None);
    }

    #[test]
    fn data_is_no_annotation_kind() {
        assert_eq!(ConceptId::from("data_0006").kind(), None);
    }

    #[test]
    fn compare_with_str() {
        let id = ConceptId::from("topic_0003");
        assert!(id == *"http://edamontology.org/topic_0003");
        assert!(id == *"topic_0003");
    }
}
