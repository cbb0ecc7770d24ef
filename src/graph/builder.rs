use std::collections::HashMap;
use std::hash::BuildHasher;

use tracing::{debug, warn};

use crate::graph::{AnnotationGraph, EdgeCategory, Node, NodeCategory};
use crate::metrics::MetricKind;
use crate::table::Tables;
use crate::{AnnotationKind, Closure, ConceptGroup, ConceptId, EdamConcept, Ontology, ToolId};

/// Controls which parts of the annotations are added to a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// Add topics and their ancestors
    pub topics: bool,
    /// Add operations and their ancestors
    pub operations: bool,
    /// Add deprecated annotations and their alternatives
    pub deprecated: bool,
    /// Draw the border of direct annotations in red
    pub highlight_direct: bool,
    /// Highlight the concepts that all tools have in common
    pub highlight_intersection: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            topics: true,
            operations: true,
            deprecated: false,
            highlight_direct: false,
            highlight_intersection: false,
        }
    }
}

impl GraphOptions {
    fn kinds(&self) -> impl Iterator<Item = AnnotationKind> + '_ {
        AnnotationKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                AnnotationKind::Topic => self.topics,
                AnnotationKind::Operation => self.operations,
            })
    }
}

/// Assembles an [`AnnotationGraph`] from the tools of an [`Ontology`]
///
/// # Examples
///
/// ```
/// use edamannot::builder::Builder;
/// use edamannot::graph::{GraphBuilder, GraphOptions, NodeCategory};
/// use edamannot::{AnnotationKind, ConceptId, ToolId};
///
/// let mut builder = Builder::new();
/// builder.add_concept(ConceptId::from("topic_0003"), "Topic");
/// builder.add_concept(ConceptId::from("topic_0080"), "Sequence analysis");
/// let mut builder = builder.concepts_complete();
/// builder
///     .add_parent(&ConceptId::from("topic_0003"), &ConceptId::from("topic_0080"))
///     .unwrap();
/// let mut builder = builder.connect_all_concepts().unwrap();
/// let blast = ToolId::from_name("blast");
/// builder.add_tool(blast.clone(), "BLAST");
/// builder
///     .annotate(&blast, AnnotationKind::Topic, ConceptId::from("topic_0080"))
///     .unwrap();
/// let ontology = builder.build();
///
/// let mut graph = GraphBuilder::new(&ontology, GraphOptions::default());
/// assert!(graph.add_tool(&blast));
/// assert!(!graph.add_tool(&ToolId::from_name("unknown")));
/// let graph = graph.build();
///
/// assert_eq!(graph.nodes().len(), 3);
/// assert_eq!(graph.node("blast").unwrap().category(), NodeCategory::Tool);
/// assert!(graph.has_edge("blast", "topic_0080"));
/// assert!(graph.has_edge("topic_0080", "topic_0003"));
/// ```
pub struct GraphBuilder<'a> {
    ontology: &'a Ontology,
    options: GraphOptions,
    graph: AnnotationGraph,
}

impl<'a> GraphBuilder<'a> {
    /// Creates a builder with an empty graph
    pub fn new(ontology: &'a Ontology, options: GraphOptions) -> Self {
        Self {
            ontology,
            options,
            graph: AnnotationGraph::new(),
        }
    }

    /// Adds the tool with its annotations and their ancestors
    ///
    /// Returns `false` if the tool is unknown.
    pub fn add_tool(&mut self, id: &ToolId) -> bool {
        let Some(tool) = self.ontology.tool(id) else {
            warn!("Tool {} does not exist", id);
            return false;
        };
        self.graph.add_node(Node::tool(tool));

        let kinds: Vec<AnnotationKind> = self.options.kinds().collect();
        for kind in kinds {
            for concept in self.ontology.annotations(id, kind, Closure::Direct) {
                let node = Node::annotation(
                    &concept,
                    NodeCategory::active(kind),
                    self.options.highlight_direct,
                );
                self.graph.add_node(node);
                self.graph
                    .add_edge(id.short(), concept.id().short(), EdgeCategory::HasAnnotation);
                self.add_ancestors(&concept, NodeCategory::active(kind), EdgeCategory::IsA);
            }
            if self.options.deprecated {
                self.add_deprecated(id, kind);
            }
        }
        debug!(
            "Added {} to graph, now {} nodes",
            id,
            self.graph.nodes().len()
        );
        true
    }

    /// Adds all tools to a shared graph
    ///
    /// With `highlight_intersection`, the concepts that are transitive
    /// annotations of every tool are highlighted. Returns the number of tools
    /// that were added.
    pub fn add_tools(&mut self, ids: &[ToolId]) -> usize {
        let added = ids.iter().filter(|id| self.add_tool(id)).count();
        if self.options.highlight_intersection && ids.len() > 1 {
            let common = self.intersection(ids);
            for id in &common {
                self.graph.highlight(id.short());
            }
            debug!("Highlighted {} common concepts", common.len());
        }
        added
    }

    /// Adds a concept and all its ancestors
    ///
    /// Returns `false` if the concept is unknown.
    pub fn add_concept_hierarchy(&mut self, id: &ConceptId, highlight: bool) -> bool {
        let Some(concept) = self.ontology.concept(id) else {
            warn!("Concept {} does not exist", id);
            return false;
        };
        let Some(kind) = concept.kind() else {
            warn!("Concept {} is neither a topic nor an operation", id);
            return false;
        };
        let category = if concept.is_deprecated() {
            NodeCategory::deprecated(kind)
        } else {
            NodeCategory::active(kind)
        };
        self.graph
            .add_node(Node::annotation(&concept, category, highlight));
        self.add_ancestors(&concept, category, EdgeCategory::IsA);
        true
    }

    /// Fills the concept nodes by score, see [`AnnotationGraph::color_by_scores`]
    pub fn color_by_scores<S: BuildHasher>(
        &mut self,
        topic_scores: &HashMap<ConceptId, f64, S>,
        operation_scores: &HashMap<ConceptId, f64, S>,
        color: &str,
    ) {
        self.graph
            .color_by_scores(topic_scores, operation_scores, color);
    }

    /// Fills the concept nodes by a metric of the direct or transitive annotations
    ///
    /// Direct metrics are calculated from the annotations without redundancy.
    pub fn color_by_metric(&mut self, tables: &Tables, metric: MetricKind, closure: Closure, color: &str) {
        let scores = |kind| tables.concept_metrics(kind, closure).scores(metric);
        self.color_by_scores(
            &scores(AnnotationKind::Topic),
            &scores(AnnotationKind::Operation),
            color,
        );
    }

    /// Returns the assembled graph
    pub fn build(self) -> AnnotationGraph {
        self.graph
    }

    fn intersection(&self, ids: &[ToolId]) -> ConceptGroup {
        let mut common = ConceptGroup::new();
        for kind in self.options.kinds() {
            for id in &self
                .ontology
                .common_annotation_ids(ids, kind, Closure::Transitive)
            {
                common.insert(id.clone());
            }
        }
        common
    }

    fn add_ancestors(&mut self, concept: &EdamConcept, category: NodeCategory, edge: EdgeCategory) {
        for (sub, sup) in concept.hierarchy_edges() {
            self.graph.add_node(Node::ancestor(&sup, category));
            self.graph.add_edge(sub.id().short(), sup.id().short(), edge);
        }
    }

    fn add_deprecated(&mut self, id: &ToolId, kind: AnnotationKind) {
        for concept in self.ontology.deprecated_annotations(id, kind) {
            self.graph.add_node(Node::annotation(
                &concept,
                NodeCategory::deprecated(kind),
                false,
            ));
            self.graph.add_edge(
                id.short(),
                concept.id().short(),
                EdgeCategory::DeprecatedAnnotation,
            );
            for alternative in concept.alternatives() {
                let category = NodeCategory::alternative(kind);
                if self
                    .graph
                    .add_node(Node::annotation(&alternative, category, false))
                {
                    self.add_ancestors(&alternative, category, EdgeCategory::AlternativeIsA);
                }
                self.graph.add_edge(
                    concept.id().short(),
                    alternative.id().short(),
                    EdgeCategory::SupersededBy,
                );
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::ontology;
    use crate::graph::WHITE;

    #[test]
    fn single_tool() {
        let ont = ontology();
        let mut builder = GraphBuilder::new(&ont, GraphOptions::default());
        assert!(builder.add_tool(&ToolId::from_name("star")));
        let graph = builder.build();

        // tool, 3 topics, 5 operations
        assert_eq!(graph.nodes().len(), 9);
        assert!(graph.has_edge("star", "topic_3168"));
        assert!(graph.has_edge("star", "topic_0080"));
        assert!(graph.has_edge("topic_3168", "topic_0080"));
        assert!(graph.has_edge("operation_3198", "operation_2945"));
        assert!(graph.has_edge("operation_2945", "operation_0004"));
        assert_eq!(
            graph.node("topic_3168").unwrap().label(),
            "Sequencing\n(topic_3168)"
        );
        assert_eq!(graph.node("topic_0003").unwrap().label(), "Topic\ntopic_0003");
        assert_eq!(graph.highlighted().count(), 0);
    }

    #[test]
    fn topics_only() {
        let ont = ontology();
        let options = GraphOptions {
            operations: false,
            highlight_direct: true,
            ..Default::default()
        };
        let mut builder = GraphBuilder::new(&ont, options);
        builder.add_tool(&ToolId::from_name("bowtie"));
        let graph = builder.build();
        assert_eq!(graph.nodes().len(), 4);
        assert!(graph
            .nodes()
            .iter()
            .all(|node| node.category() != NodeCategory::Operation));
        assert_eq!(graph.node("topic_3168").unwrap().color(), "red");
        assert_eq!(graph.node("topic_0080").unwrap().color(), "black");
    }

    #[test]
    fn deprecated_with_alternatives() {
        let ont = ontology();
        let options = GraphOptions {
            deprecated: true,
            ..Default::default()
        };
        let mut builder = GraphBuilder::new(&ont, options);
        builder.add_tool(&ToolId::from_name("weird"));
        let graph = builder.build();

        let deprecated = graph.node("operation_0226").unwrap();
        assert_eq!(deprecated.category(), NodeCategory::OperationDeprecated);
        assert_eq!(deprecated.color(), "grey");
        let alternative = graph.node("operation_2403").unwrap();
        assert_eq!(alternative.category(), NodeCategory::OperationAlternative);
        assert_eq!(
            graph.node("operation_0004").unwrap().category(),
            NodeCategory::OperationAlternative
        );
        assert!(graph.has_edge("weird", "operation_0226"));
        assert!(graph.has_edge("operation_0226", "operation_2403"));
        assert!(graph.has_edge("operation_2403", "operation_0004"));
        // the undeclared topic is not part of the graph
        assert!(!graph.has_node("topic_9999"));
    }

    #[test]
    fn known_alternative_keeps_its_category() {
        let ont = ontology();
        let options = GraphOptions {
            deprecated: true,
            ..Default::default()
        };
        let mut builder = GraphBuilder::new(&ont, options);
        builder.add_tool(&ToolId::from_name("blast"));
        let graph = builder.build();
        assert_eq!(
            graph.node("topic_0080").unwrap().category(),
            NodeCategory::Topic
        );
        assert!(graph.has_edge("topic_0156", "topic_0080"));
        assert_eq!(
            graph.node("topic_0156").unwrap().category(),
            NodeCategory::TopicDeprecated
        );
    }

    #[test]
    fn deprecated_is_optional() {
        let ont = ontology();
        let mut builder = GraphBuilder::new(&ont, GraphOptions::default());
        builder.add_tool(&ToolId::from_name("weird"));
        let graph = builder.build();
        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn shared_concepts_are_highlighted() {
        let ont = ontology();
        let options = GraphOptions {
            highlight_intersection: true,
            ..Default::default()
        };
        let mut builder = GraphBuilder::new(&ont, options);
        let tools = [ToolId::from_name("star"), ToolId::from_name("bowtie")];
        assert_eq!(builder.add_tools(&tools), 2);
        let graph = builder.build();

        assert!(graph.has_node("bowtie"));
        assert_eq!(graph.nodes().iter().filter(|n| n.key() == "topic_3168").count(), 1);
        let mut highlighted: Vec<&str> = graph.highlighted().map(|n| n.key()).collect();
        highlighted.sort_unstable();
        assert_eq!(
            highlighted,
            vec![
                "operation_0004",
                "operation_2403",
                "operation_2945",
                "operation_3198",
                "topic_0003",
                "topic_0080",
                "topic_3168"
            ]
        );
    }

    #[test]
    fn disjoint_tools_have_no_intersection() {
        let ont = ontology();
        let options = GraphOptions {
            highlight_intersection: true,
            ..Default::default()
        };
        let mut builder = GraphBuilder::new(&ont, options);
        builder.add_tools(&[ToolId::from_name("star"), ToolId::from_name("lonely")]);
        let graph = builder.build();
        assert!(graph.has_node("lonely"));
        assert_eq!(graph.highlighted().count(), 0);
    }

    #[test]
    fn concept_hierarchy() {
        let ont = ontology();
        let mut builder = GraphBuilder::new(&ont, GraphOptions::default());
        assert!(builder.add_concept_hierarchy(&ConceptId::from("operation_3198"), true));
        assert!(!builder.add_concept_hierarchy(&ConceptId::from("operation_9999"), true));
        let graph = builder.build();
        assert_eq!(graph.nodes().len(), 4);
        assert_eq!(graph.edges().len(), 4);
        assert_eq!(graph.node("operation_3198").unwrap().color(), "red");
    }

    #[test]
    fn count_coloring() {
        let ont = ontology();
        let mut builder = GraphBuilder::new(&ont, GraphOptions::default());
        builder.add_tool(&ToolId::from_name("bowtie"));
        let topics = ont.annotation_table(AnnotationKind::Topic, Closure::Transitive);
        let operations = ont.annotation_table(AnnotationKind::Operation, Closure::Transitive);
        let topic_scores = crate::metrics::ConceptMetrics::calculate(&topics)
            .unwrap()
            .scores(crate::metrics::MetricKind::Count);
        let operation_scores = crate::metrics::ConceptMetrics::calculate(&operations)
            .unwrap()
            .scores(crate::metrics::MetricKind::Count);
        builder.color_by_scores(&topic_scores, &operation_scores, "red");
        let graph = builder.build();
        // the roots are used by every tool
        assert_eq!(graph.node("topic_0003").unwrap().fillcolor(), "#ff0000");
        assert_eq!(graph.node("operation_0004").unwrap().fillcolor(), "#ff0000");
        assert_eq!(graph.node("bowtie").unwrap().fillcolor(), "#ffffff");
    }

    #[test]
    fn color_by_direct_or_transitive_metric() {
        let ont = ontology();
        let tables = Tables::compute(&ont).unwrap();
        let bowtie = [ToolId::from_name("bowtie")];

        let mut builder = GraphBuilder::new(&ont, GraphOptions::default());
        builder.add_tools(&bowtie);
        builder.color_by_metric(&tables, MetricKind::Count, Closure::Transitive, "green");
        let graph = builder.build();
        // star, bowtie and blast, all via inheritance
        assert_eq!(graph.node("topic_0080").unwrap().fillcolor(), "#00ff00");
        assert_eq!(graph.node("topic_0003").unwrap().fillcolor(), "#00ff00");

        let mut builder = GraphBuilder::new(&ont, GraphOptions::default());
        builder.add_tools(&bowtie);
        builder.color_by_metric(&tables, MetricKind::Count, Closure::Direct, "green");
        let graph = builder.build();
        // only blast, star's topic_0080 is redundant
        assert_eq!(graph.node("topic_0080").unwrap().fillcolor(), "#7fff7f");
        assert_eq!(graph.node("topic_3168").unwrap().fillcolor(), "#00ff00");
        assert_eq!(graph.node("topic_0003").unwrap().fillcolor(), WHITE);
    }
}
