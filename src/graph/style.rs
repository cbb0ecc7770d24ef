use std::fmt::Display;

use crate::AnnotationKind;

/// The category of a node in an [`crate::graph::AnnotationGraph`]
///
/// The category defines the shape and style of the node and is recorded as
/// `nodeType` attribute. Only [`NodeCategory::Topic`] and
/// [`NodeCategory::Operation`] nodes are colored by scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// A bio.tools entry
    Tool,
    /// An active topic
    Topic,
    /// An active operation
    Operation,
    /// A deprecated topic that is still used as annotation
    TopicDeprecated,
    /// A deprecated operation that is still used as annotation
    OperationDeprecated,
    /// A topic suggested to replace a deprecated topic
    TopicAlternative,
    /// An operation suggested to replace a deprecated operation
    OperationAlternative,
}

impl NodeCategory {
    /// Category of active concepts of `kind`
    pub fn active(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::Topic => NodeCategory::Topic,
            AnnotationKind::Operation => NodeCategory::Operation,
        }
    }

    /// Category of deprecated concepts of `kind`
    pub fn deprecated(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::Topic => NodeCategory::TopicDeprecated,
            AnnotationKind::Operation => NodeCategory::OperationDeprecated,
        }
    }

    /// Category of the alternatives of deprecated concepts of `kind`
    pub fn alternative(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::Topic => NodeCategory::TopicAlternative,
            AnnotationKind::Operation => NodeCategory::OperationAlternative,
        }
    }

    /// The annotation kind, `None` for tools
    pub fn kind(&self) -> Option<AnnotationKind> {
        match self {
            NodeCategory::Tool => None,
            NodeCategory::Topic | NodeCategory::TopicDeprecated | NodeCategory::TopicAlternative => {
                Some(AnnotationKind::Topic)
            }
            NodeCategory::Operation
            | NodeCategory::OperationDeprecated
            | NodeCategory::OperationAlternative => Some(AnnotationKind::Operation),
        }
    }

    /// The `nodeType` attribute
    pub fn name(&self) -> &'static str {
        match self {
            NodeCategory::Tool => "Tool",
            NodeCategory::Topic => "Topic",
            NodeCategory::Operation => "Operation",
            NodeCategory::TopicDeprecated => "TopicDeprecated",
            NodeCategory::OperationDeprecated => "OperationDeprecated",
            NodeCategory::TopicAlternative => "TopicAlternative",
            NodeCategory::OperationAlternative => "OperationAlternative",
        }
    }

    /// Graphviz shape
    pub fn shape(&self) -> &'static str {
        match self {
            NodeCategory::Tool => "ellipse",
            _ => "box",
        }
    }

    /// Graphviz style
    pub fn style(&self) -> &'static str {
        match self {
            NodeCategory::Tool | NodeCategory::Topic => "filled",
            NodeCategory::Operation => "rounded,filled",
            NodeCategory::TopicDeprecated => "filled,dashed",
            NodeCategory::OperationDeprecated => "rounded,filled,dashed",
            NodeCategory::TopicAlternative => "filled,dotted",
            NodeCategory::OperationAlternative => "rounded,filled,dotted",
        }
    }

    /// Returns `true` for active topics and operations
    pub fn is_colorable(&self) -> bool {
        matches!(self, NodeCategory::Topic | NodeCategory::Operation)
    }
}

impl Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The category of an edge in an [`crate::graph::AnnotationGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeCategory {
    /// tool -> direct annotation
    HasAnnotation,
    /// tool -> deprecated annotation
    DeprecatedAnnotation,
    /// concept -> parent concept
    IsA,
    /// concept -> parent concept, within the hierarchy of an alternative
    AlternativeIsA,
    /// deprecated concept -> alternative
    SupersededBy,
}

impl EdgeCategory {
    /// Graphviz attributes of the edge
    pub fn attributes(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            EdgeCategory::HasAnnotation => &[
                ("arrowhead", "vee"),
                ("color", "blue"),
                ("fontcolor", "blue"),
                ("style", "dashed"),
            ],
            EdgeCategory::DeprecatedAnnotation => &[
                ("arrowhead", "vee"),
                ("color", "grey"),
                ("fontcolor", "grey"),
                ("style", "dashed"),
            ],
            EdgeCategory::IsA => &[("arrowhead", "onormal")],
            EdgeCategory::AlternativeIsA => &[
                ("arrowhead", "onormal"),
                ("color", "grey"),
                ("style", "dotted"),
            ],
            EdgeCategory::SupersededBy => &[
                ("arrowhead", "vee"),
                ("color", "grey"),
                ("fontcolor", "grey"),
                ("style", "dotted"),
            ],
        }
    }

    /// Returns `true` if the edge is drawn dotted
    pub fn is_dotted(&self) -> bool {
        matches!(self, EdgeCategory::AlternativeIsA | EdgeCategory::SupersededBy)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn styles() {
        assert_eq!(NodeCategory::Tool.shape(), "ellipse");
        assert_eq!(NodeCategory::Operation.shape(), "box");
        assert!(NodeCategory::OperationDeprecated.style().ends_with(",dashed"));
        assert!(NodeCategory::TopicAlternative.style().ends_with(",dotted"));
        assert_eq!(
            NodeCategory::deprecated(AnnotationKind::Operation).kind(),
            Some(AnnotationKind::Operation)
        );
        assert!(NodeCategory::Topic.is_colorable());
        assert!(!NodeCategory::TopicAlternative.is_colorable());
        assert!(!NodeCategory::Tool.is_colorable());
    }

    #[test]
    fn edges() {
        assert_eq!(EdgeCategory::IsA.attributes(), &[("arrowhead", "onormal")]);
        assert!(EdgeCategory::SupersededBy.is_dotted());
        assert!(!EdgeCategory::HasAnnotation.is_dotted());
    }
}
