//! Annotation graphs of one or many tools
//!
//! An [`AnnotationGraph`] contains the tools, their annotations and the
//! `is-a` hierarchy of every annotation up to the root of its EDAM branch.
//! Graphs are assembled with the [`GraphBuilder`] and rendered with [`render`]
//! (Graphviz DOT, SVG, PNG, PDF, Mermaid or a CSV node summary).
//!
//! # Examples
//!
//! ```no_run
//! use edamannot::graph::{render, GraphBuilder, GraphOptions, OutputFormat};
//! use edamannot::{Ontology, ToolId};
//!
//! let ontology = Ontology::from_files("data/bioschemas.ttl", "data/EDAM.owl").unwrap();
//! let options = GraphOptions {
//!     deprecated: true,
//!     ..Default::default()
//! };
//! let mut builder = GraphBuilder::new(&ontology, options);
//! builder.add_tool(&ToolId::from_name("star"));
//! let graph = builder.build();
//!
//! let dot = render(&graph, OutputFormat::Dot).unwrap();
//! println!("{}", String::from_utf8_lossy(&dot));
//! ```
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;

use tracing::debug;

use crate::{ConceptId, EdamConcept, Tool};

mod builder;
mod color;
mod render;
mod style;

pub use builder::{GraphBuilder, GraphOptions};
pub use color::{score_color, Palette, WHITE};
pub use render::{render, save, to_csv, to_dot, to_mermaid, OutputFormat};
pub use style::{EdgeCategory, NodeCategory};

/// A node of an [`AnnotationGraph`], either a tool or a concept
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    key: String,
    uri: String,
    concept: Option<ConceptId>,
    label: String,
    category: NodeCategory,
    color: &'static str,
    fillcolor: String,
    style: &'static str,
    penwidth: Option<u32>,
    highlighted: bool,
}

impl Node {
    /// Node of a tool, labeled with its `sc:name`
    pub fn tool(tool: &Tool) -> Self {
        Self {
            key: tool.id().short().to_string(),
            uri: tool.id().as_str().to_string(),
            concept: None,
            label: tool.label().to_string(),
            category: NodeCategory::Tool,
            color: "blue",
            fillcolor: WHITE.to_string(),
            style: NodeCategory::Tool.style(),
            penwidth: None,
            highlighted: false,
        }
    }

    /// Node of a concept that is directly asserted for a tool
    ///
    /// The short id is shown in brackets. Active concepts get a red border if
    /// `highlight` is set.
    pub fn annotation(concept: &EdamConcept, category: NodeCategory, highlight: bool) -> Self {
        let color = match category {
            NodeCategory::Topic | NodeCategory::Operation if highlight => "red",
            NodeCategory::Topic | NodeCategory::Operation => "black",
            _ => "grey",
        };
        Self::concept_node(
            concept,
            category,
            format!("{}\n({})", concept.label(), concept.id().short()),
            color,
        )
    }

    /// Node of an ancestor of an annotation
    pub fn ancestor(concept: &EdamConcept, category: NodeCategory) -> Self {
        let color = if category.is_colorable() {
            "black"
        } else {
            "grey"
        };
        Self::concept_node(
            concept,
            category,
            format!("{}\n{}", concept.label(), concept.id().short()),
            color,
        )
    }

    fn concept_node(
        concept: &EdamConcept,
        category: NodeCategory,
        label: String,
        color: &'static str,
    ) -> Self {
        Self {
            key: concept.id().short().to_string(),
            uri: concept.id().as_str().to_string(),
            concept: Some(concept.id().clone()),
            label,
            category,
            color,
            fillcolor: WHITE.to_string(),
            style: category.style(),
            penwidth: None,
            highlighted: false,
        }
    }

    /// The node identifier in the graph, the short id of the tool or concept
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The full URI of the tool or concept
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The concept of the node, `None` for tools
    pub fn concept(&self) -> Option<&ConceptId> {
        self.concept.as_ref()
    }

    /// The displayed label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The category of the node
    pub fn category(&self) -> NodeCategory {
        self.category
    }

    /// Border color
    pub fn color(&self) -> &str {
        self.color
    }

    /// Fill color as hex code
    pub fn fillcolor(&self) -> &str {
        &self.fillcolor
    }

    /// Graphviz style
    pub fn style(&self) -> &str {
        self.style
    }

    /// Border width, `None` for the Graphviz default
    pub fn penwidth(&self) -> Option<u32> {
        self.penwidth
    }

    /// Returns `true` if the node is part of the highlighted intersection
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    fn highlight(&mut self) {
        self.color = "red";
        self.fillcolor = "red".to_string();
        self.style = "filled,bold";
        self.penwidth = Some(3);
        self.highlighted = true;
    }
}

/// A directed edge of an [`AnnotationGraph`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Key of the source node
    pub from: String,
    /// Key of the target node
    pub to: String,
    /// The category of the edge
    pub category: EdgeCategory,
}

/// Tools, concepts and their relations
///
/// Nodes are unique by key and edges are unique by `(from, to)`. Adding a
/// node or edge twice keeps the first one.
#[derive(Debug, Clone, Default)]
pub struct AnnotationGraph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashSet<(String, String)>,
}

impl AnnotationGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the node, returns `false` if a node with the same key exists already
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.index.contains_key(node.key()) {
            return false;
        }
        self.index.insert(node.key.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Adds the edge, returns `false` if the nodes are connected already
    pub fn add_edge(&mut self, from: &str, to: &str, category: EdgeCategory) -> bool {
        if !self.edge_index.insert((from.to_string(), to.to_string())) {
            return false;
        }
        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            category,
        });
        true
    }

    /// Returns the node with the given key
    pub fn node(&self, key: &str) -> Option<&Node> {
        self.index.get(key).map(|idx| &self.nodes[*idx])
    }

    pub(crate) fn node_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.index.get(key).map(|idx| &mut self.nodes[*idx])
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns `true` if the graph contains a node with the key
    pub fn has_node(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns `true` if the graph contains an edge between both nodes
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edge_index
            .contains(&(from.to_string(), to.to_string()))
    }

    /// Iterates all highlighted nodes
    pub fn highlighted(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.highlighted)
    }

    /// Highlights the node with bold red borders and a red fill
    ///
    /// Returns `false` if the node does not exist
    pub fn highlight(&mut self, key: &str) -> bool {
        match self.node_mut(key) {
            Some(node) => {
                node.highlight();
                true
            }
            None => false,
        }
    }

    /// Fills active topic and operation nodes with a color gradient
    ///
    /// The fill color goes from white (score 0) to `color` (the highest score
    /// of the mapping). Topics and operations are scaled independently. Nodes
    /// without a score and highlighted nodes keep their fill color.
    ///
    /// See [`score_color`] for the valid colors.
    pub fn color_by_scores<S: BuildHasher>(
        &mut self,
        topic_scores: &HashMap<ConceptId, f64, S>,
        operation_scores: &HashMap<ConceptId, f64, S>,
        color: &str,
    ) {
        let max = |scores: &HashMap<ConceptId, f64, S>| {
            scores.values().copied().fold(0.0f64, f64::max)
        };
        let topic_max = max(topic_scores);
        let operation_max = max(operation_scores);

        let mut colored = 0usize;
        for node in &mut self.nodes {
            if !node.category.is_colorable() || node.highlighted {
                continue;
            }
            let (scores, max) = match node.category {
                NodeCategory::Topic => (topic_scores, topic_max),
                _ => (operation_scores, operation_max),
            };
            let Some(score) = node.concept.as_ref().and_then(|id| scores.get(id)) else {
                continue;
            };
            node.fillcolor = score_color(*score, max, color);
            colored += 1;
        }
        debug!("Colored {} nodes in {}", colored, color);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::ontology;
    use crate::ToolId;

    #[test]
    fn idempotent_insertion() {
        let ont = ontology();
        let concept = ont.concept(&ConceptId::from("topic_0080")).unwrap();
        let mut graph = AnnotationGraph::new();
        assert!(graph.add_node(Node::annotation(&concept, NodeCategory::Topic, false)));
        assert!(!graph.add_node(Node::ancestor(&concept, NodeCategory::Topic)));
        assert_eq!(graph.nodes().len(), 1);
        assert_eq!(graph.node("topic_0080").unwrap().label(), "Sequence analysis\n(topic_0080)");
        assert_eq!(
            graph.node("topic_0080").unwrap().concept(),
            Some(&ConceptId::from("topic_0080"))
        );

        assert!(graph.add_edge("star", "topic_0080", EdgeCategory::HasAnnotation));
        assert!(!graph.add_edge("star", "topic_0080", EdgeCategory::IsA));
        assert_eq!(graph.edges().len(), 1);
        assert!(graph.has_edge("star", "topic_0080"));
        assert!(!graph.has_edge("topic_0080", "star"));
    }

    #[test]
    fn tool_node() {
        let ont = ontology();
        let node = Node::tool(ont.tool(&ToolId::from_name("star")).unwrap());
        assert_eq!(node.key(), "star");
        assert_eq!(node.uri(), "https://bio.tools/star");
        assert_eq!(node.category(), NodeCategory::Tool);
        assert_eq!(node.color(), "blue");
        assert!(node.concept().is_none());
    }

    #[test]
    fn highlight() {
        let ont = ontology();
        let concept = ont.concept(&ConceptId::from("topic_0003")).unwrap();
        let mut graph = AnnotationGraph::new();
        graph.add_node(Node::ancestor(&concept, NodeCategory::Topic));
        assert!(graph.highlight("topic_0003"));
        assert!(!graph.highlight("topic_0080"));
        let node = graph.node("topic_0003").unwrap();
        assert_eq!(node.penwidth(), Some(3));
        assert_eq!(node.style(), "filled,bold");
        assert_eq!(graph.highlighted().count(), 1);
    }

    #[test]
    fn equal_counts_get_full_color() {
        let ont = ontology();
        let mut graph = AnnotationGraph::new();
        let mut topic_scores = HashMap::new();
        for id in ["topic_0003", "topic_0080"] {
            let concept = ont.concept(&ConceptId::from(id)).unwrap();
            graph.add_node(Node::ancestor(&concept, NodeCategory::Topic));
            topic_scores.insert(concept.id().clone(), 3.0);
        }
        let deprecated = ont.concept(&ConceptId::from("topic_0156")).unwrap();
        graph.add_node(Node::annotation(&deprecated, NodeCategory::TopicDeprecated, false));
        topic_scores.insert(deprecated.id().clone(), 3.0);

        graph.color_by_scores(&topic_scores, &HashMap::new(), "green");
        assert_eq!(graph.node("topic_0003").unwrap().fillcolor(), "#00ff00");
        assert_eq!(graph.node("topic_0080").unwrap().fillcolor(), "#00ff00");
        assert_eq!(graph.node("topic_0156").unwrap().fillcolor(), WHITE);
    }

    #[test]
    fn scores_are_scaled_by_category() {
        let ont = ontology();
        let mut graph = AnnotationGraph::new();
        let topic = ont.concept(&ConceptId::from("topic_0080")).unwrap();
        let operation = ont.concept(&ConceptId::from("operation_2403")).unwrap();
        let unscored = ont.concept(&ConceptId::from("operation_0004")).unwrap();
        graph.add_node(Node::ancestor(&topic, NodeCategory::Topic));
        graph.add_node(Node::ancestor(&operation, NodeCategory::Operation));
        graph.add_node(Node::ancestor(&unscored, NodeCategory::Operation));

        let topics = HashMap::from([(topic.id().clone(), 1.0)]);
        let operations = HashMap::from([
            (operation.id().clone(), 5.0),
            (ConceptId::from("operation_3198"), 10.0),
        ]);
        graph.color_by_scores(&topics, &operations, "red");
        assert_eq!(graph.node("topic_0080").unwrap().fillcolor(), "#ff0000");
        assert_eq!(graph.node("operation_2403").unwrap().fillcolor(), "#ff7f7f");
        assert_eq!(graph.node("operation_0004").unwrap().fillcolor(), WHITE);
    }
}
