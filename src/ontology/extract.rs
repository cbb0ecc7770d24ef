//! Extraction of tool annotations from the [`Ontology`]
use tracing::debug;

use crate::table::{AnnotationTable, ToolList, ToolTable, UndeclaredTable};
use crate::{
    AnnotationKind, Closure, ConceptGroup, ConceptId, EdamConcept, Ontology, ToolId,
    OPERATION_ROOT,
};

/// Answers whether one concept is a strict ancestor of another
///
/// The [`crate::redundancy`] reducer only depends on this trait, so it can
/// work with any hierarchy, not only a full [`Ontology`].
pub trait Ancestry {
    /// Returns `true` if `ancestor` is reachable from `descendant` via
    /// one or more `is-a` edges
    fn is_strict_ancestor(&self, ancestor: &ConceptId, descendant: &ConceptId) -> bool;
}

impl Ancestry for Ontology {
    fn is_strict_ancestor(&self, ancestor: &ConceptId, descendant: &ConceptId) -> bool {
        self.get(descendant)
            .map_or(false, |concept| concept.all_parents().contains(ancestor))
    }
}

impl Ontology {
    /// Returns the ids of all concepts of `kind` that annotate the tool
    ///
    /// With [`Closure::Direct`] these are the asserted concepts that are part of
    /// EDAM and not deprecated. [`Closure::Transitive`] adds all their
    /// non-deprecated ancestors.
    ///
    /// An unknown tool has no annotations.
    ///
    /// # Examples
    ///
    /// ```
    /// use edamannot::builder::Builder;
    /// use edamannot::{AnnotationKind, Closure, ConceptId, ToolId};
    ///
    /// let mut builder = Builder::new();
    /// builder.add_concept(ConceptId::from("operation_0004"), "Operation");
    /// builder.add_concept(ConceptId::from("operation_2403"), "Sequence analysis");
    /// let mut builder = builder.concepts_complete();
    /// builder
    ///     .add_parent(&ConceptId::from("operation_0004"), &ConceptId::from("operation_2403"))
    ///     .unwrap();
    /// let mut builder = builder.connect_all_concepts().unwrap();
    /// let blast = ToolId::from_name("blast");
    /// builder.add_tool(blast.clone(), "BLAST");
    /// builder
    ///     .annotate(&blast, AnnotationKind::Operation, ConceptId::from("operation_2403"))
    ///     .unwrap();
    /// let ontology = builder.build();
    ///
    /// let direct = ontology.annotation_ids(&blast, AnnotationKind::Operation, Closure::Direct);
    /// assert_eq!(direct.len(), 1);
    /// let transitive = ontology.annotation_ids(&blast, AnnotationKind::Operation, Closure::Transitive);
    /// assert!(transitive.contains(&ConceptId::from("operation_0004")));
    ///
    /// let unknown = ToolId::from_name("unknown");
    /// assert!(ontology.annotation_ids(&unknown, AnnotationKind::Operation, Closure::Transitive).is_empty());
    /// ```
    pub fn annotation_ids(&self, tool: &ToolId, kind: AnnotationKind, closure: Closure) -> ConceptGroup {
        let mut group = ConceptGroup::new();
        let Some(tool) = self.tool(tool) else {
            return group;
        };
        for id in tool.asserted(kind) {
            let Some(concept) = self.get(id) else {
                continue;
            };
            if concept.deprecated() {
                continue;
            }
            group.insert(id.clone());
            if closure == Closure::Transitive {
                for parent in concept.all_parents() {
                    group.insert(parent.clone());
                }
            }
        }
        group
    }

    /// Returns the [`EdamConcept`]s that annotate the tool, sorted by id
    ///
    /// See [`Ontology::annotation_ids`]
    pub fn annotations(&self, tool: &ToolId, kind: AnnotationKind, closure: Closure) -> Vec<EdamConcept> {
        self.annotation_ids(tool, kind, closure)
            .iter()
            .filter_map(|id| self.concept(id))
            .collect()
    }

    /// Returns the deprecated concepts that are asserted for the tool
    pub fn deprecated_annotations(&self, tool: &ToolId, kind: AnnotationKind) -> Vec<EdamConcept> {
        let Some(tool) = self.tool(tool) else {
            return Vec::new();
        };
        tool.asserted(kind)
            .iter()
            .filter_map(|id| self.concept(id))
            .filter(EdamConcept::is_deprecated)
            .collect()
    }

    /// Returns the asserted concepts that are not declared in EDAM
    pub fn undeclared_annotations(&self, tool: &ToolId, kind: AnnotationKind) -> Vec<ConceptId> {
        let Some(tool) = self.tool(tool) else {
            return Vec::new();
        };
        tool.asserted(kind)
            .iter()
            .filter(|id| self.get(id).is_none())
            .cloned()
            .collect()
    }

    /// Returns the ids of the concepts that annotate every one of `tools`
    ///
    /// An empty list of tools has no common annotations.
    pub fn common_annotation_ids(
        &self,
        tools: &[ToolId],
        kind: AnnotationKind,
        closure: Closure,
    ) -> ConceptGroup {
        let Some((first, others)) = tools.split_first() else {
            return ConceptGroup::new();
        };
        others.iter().fold(
            self.annotation_ids(first, kind, closure),
            |common, tool| &common & &self.annotation_ids(tool, kind, closure),
        )
    }

    /// Returns the [`EdamConcept`]s that annotate every one of `tools`
    pub fn common_annotations(
        &self,
        tools: &[ToolId],
        kind: AnnotationKind,
        closure: Closure,
    ) -> Vec<EdamConcept> {
        self.common_annotation_ids(tools, kind, closure)
            .iter()
            .filter_map(|id| self.concept(id))
            .collect()
    }

    /// All tools with their labels (`dfTool`)
    pub fn tool_table(&self) -> ToolTable {
        let mut table = ToolTable::default();
        for tool in self.tools() {
            table.push(tool.id().clone(), tool.label());
        }
        table
    }

    /// Annotations of all tools, sorted by tool and concept
    ///
    /// Tools without annotations don't have a row.
    pub fn annotation_table(&self, kind: AnnotationKind, closure: Closure) -> AnnotationTable {
        let mut table = AnnotationTable::new(kind);
        for tool in self.tools() {
            for concept in self.annotations(tool.id(), kind, closure) {
                table.push(tool.id().clone(), concept.id().clone(), concept.label());
            }
        }
        debug!("Extracted {} {kind} annotations ({closure:?})", table.len());
        table
    }

    /// Asserted annotations with concepts that are not declared in EDAM
    pub fn undeclared_table(&self, kind: AnnotationKind) -> UndeclaredTable {
        let mut table = UndeclaredTable::new(kind);
        for tool in self.tools() {
            for concept in self.undeclared_annotations(tool.id(), kind) {
                table.insert(tool.id().clone(), concept);
            }
        }
        table
    }

    /// Tools with at least one asserted operation outside of the operation
    /// branch rooted at `operation_0004`
    ///
    /// Deprecated and undeclared operations are always outside of the branch.
    pub fn obsolete_operation_tools(&self) -> ToolList {
        let root = ConceptId::from(OPERATION_ROOT);
        let mut list = ToolList::default();
        for tool in self.tools() {
            let obsolete = tool
                .asserted(AnnotationKind::Operation)
                .iter()
                .any(|id| match self.get(id) {
                    None => true,
                    Some(concept) => *id != root && !concept.all_parents().contains(&root),
                });
            if obsolete {
                list.insert(tool.id().clone());
            }
        }
        list
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::ontology;

    fn ids(group: &ConceptGroup) -> Vec<&str> {
        group.iter().map(ConceptId::short).collect()
    }

    #[test]
    fn direct_topics() {
        let ont = ontology();
        let star = ToolId::from_name("star");
        let topics = ont.annotation_ids(&star, AnnotationKind::Topic, Closure::Direct);
        assert_eq!(ids(&topics), vec!["topic_0080", "topic_3168"]);
    }

    #[test]
    fn transitive_topics() {
        let ont = ontology();
        let star = ToolId::from_name("star");
        let topics = ont.annotation_ids(&star, AnnotationKind::Topic, Closure::Transitive);
        assert_eq!(ids(&topics), vec!["topic_0003", "topic_0080", "topic_3168"]);
    }

    #[test]
    fn transitive_is_superset_of_direct() {
        let ont = ontology();
        for tool in ont.tools() {
            for kind in AnnotationKind::ALL {
                let direct = ont.annotation_ids(tool.id(), kind, Closure::Direct);
                let transitive = ont.annotation_ids(tool.id(), kind, Closure::Transitive);
                assert!(direct.iter().all(|id| transitive.contains(id)));
            }
        }
    }

    #[test]
    fn deprecated_are_excluded() {
        let ont = ontology();
        let blast = ToolId::from_name("blast");
        let topics = ont.annotation_ids(&blast, AnnotationKind::Topic, Closure::Transitive);
        assert!(!topics.contains(&ConceptId::from("topic_0156")));
        assert_eq!(ids(&topics), vec!["topic_0003", "topic_0080"]);

        let deprecated = ont.deprecated_annotations(&blast, AnnotationKind::Topic);
        assert_eq!(deprecated.len(), 1);
        assert_eq!(deprecated[0].id().short(), "topic_0156");
    }

    #[test]
    fn undeclared() {
        let ont = ontology();
        let weird = ToolId::from_name("weird");
        assert!(ont
            .annotation_ids(&weird, AnnotationKind::Topic, Closure::Transitive)
            .is_empty());
        assert_eq!(
            ont.undeclared_annotations(&weird, AnnotationKind::Topic),
            vec![ConceptId::from("topic_9999")]
        );
        let table = ont.undeclared_table(AnnotationKind::Topic);
        assert_eq!(table.len(), 1);
        assert!(ont.undeclared_table(AnnotationKind::Operation).is_empty());
    }

    #[test]
    fn unknown_tool() {
        let ont = ontology();
        let unknown = ToolId::from_name("unknown");
        assert!(ont.annotations(&unknown, AnnotationKind::Topic, Closure::Direct).is_empty());
        assert!(ont.deprecated_annotations(&unknown, AnnotationKind::Topic).is_empty());
        assert!(ont.undeclared_annotations(&unknown, AnnotationKind::Topic).is_empty());
    }

    #[test]
    fn common() {
        let ont = ontology();
        let tools = [ToolId::from_name("star"), ToolId::from_name("bowtie")];
        let direct = ont.common_annotation_ids(&tools, AnnotationKind::Operation, Closure::Direct);
        assert_eq!(ids(&direct), vec!["operation_3198"]);

        let tools = [ToolId::from_name("star"), ToolId::from_name("blast")];
        let direct = ont.common_annotation_ids(&tools, AnnotationKind::Operation, Closure::Direct);
        assert!(direct.is_empty());
        let transitive = ont.common_annotation_ids(&tools, AnnotationKind::Operation, Closure::Transitive);
        assert_eq!(ids(&transitive), vec!["operation_0004", "operation_2403"]);

        assert!(ont
            .common_annotation_ids(&[], AnnotationKind::Topic, Closure::Transitive)
            .is_empty());
    }

    #[test]
    fn tables() {
        let ont = ontology();
        assert_eq!(ont.tool_table().len(), 5);

        let direct = ont.annotation_table(AnnotationKind::Topic, Closure::Direct);
        // blast: 0080, bowtie: 3168, star: 0080 + 3168
        assert_eq!(direct.len(), 4);
        assert_eq!(direct.n_tools(), 3);

        let transitive = ont.annotation_table(AnnotationKind::Topic, Closure::Transitive);
        assert_eq!(transitive.len(), 2 + 3 + 3);
    }

    #[test]
    fn obsolete_operations() {
        let ont = ontology();
        let list = ont.obsolete_operation_tools();
        assert_eq!(list.len(), 1);
        assert!(list.contains(&ToolId::from_name("weird")));
    }

    #[test]
    fn ancestry() {
        let ont = ontology();
        let sequencing = ConceptId::from("topic_3168");
        let analysis = ConceptId::from("topic_0080");
        assert!(ont.is_strict_ancestor(&analysis, &sequencing));
        assert!(!ont.is_strict_ancestor(&sequencing, &analysis));
        assert!(!ont.is_strict_ancestor(&analysis, &analysis));
    }
}
