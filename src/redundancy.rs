//! Removal of redundant direct annotations
//!
//! A direct annotation of a tool is redundant if the same tool is also annotated
//! with a more specific concept, i.e. a descendant of it. bio.tools curators often
//! add both, e.g. *Sequencing* and its parent *Sequence analysis*.
//!
//! The reducer keeps only the most specific annotations. Since every removed
//! concept is an ancestor of a kept one, the transitive closure of the
//! annotations does not change.
//!
//! # Examples
//!
//! ```
//! use edamannot::builder::Builder;
//! use edamannot::redundancy;
//! use edamannot::table::AnnotationTable;
//! use edamannot::{AnnotationKind, ConceptId, ToolId};
//!
//! let mut builder = Builder::new();
//! builder.add_concept(ConceptId::from("topic_0080"), "Sequence analysis");
//! builder.add_concept(ConceptId::from("topic_3168"), "Sequencing");
//! let mut builder = builder.concepts_complete();
//! builder
//!     .add_parent(&ConceptId::from("topic_0080"), &ConceptId::from("topic_3168"))
//!     .unwrap();
//! let ontology = builder.connect_all_concepts().unwrap().build();
//!
//! let star = ToolId::from_name("star");
//! let mut direct = AnnotationTable::new(AnnotationKind::Topic);
//! direct.push(star.clone(), ConceptId::from("topic_3168"), "Sequencing");
//! direct.push(star.clone(), ConceptId::from("topic_0080"), "Sequence analysis");
//!
//! let reduced = redundancy::reduce(&ontology, &direct).unwrap();
//! assert_eq!(reduced.len(), 1);
//! assert_eq!(reduced.rows()[0].concept, ConceptId::from("topic_3168"));
//! ```
use tracing::debug;

use crate::table::{AnnotationTable, RedundancyTable, RedundantAnnotation};
use crate::{Ancestry, EdamError, EdamResult};

/// Finds all direct annotations that are an ancestor of another direct
/// annotation of the same tool
///
/// # Errors
///
/// [`EdamError::CyclicHierarchy`] if two annotations of a tool are ancestors
/// of each other
pub fn find_redundant<A: Ancestry + ?Sized>(
    hierarchy: &A,
    direct: &AnnotationTable,
) -> EdamResult<RedundancyTable> {
    let mut redundant = RedundancyTable::new(direct.kind());
    for (tool, rows) in direct.by_tool() {
        for ancestor in &rows {
            for descendant in &rows {
                if ancestor.concept == descendant.concept {
                    continue;
                }
                if !hierarchy.is_strict_ancestor(&ancestor.concept, &descendant.concept) {
                    continue;
                }
                if hierarchy.is_strict_ancestor(&descendant.concept, &ancestor.concept) {
                    return Err(EdamError::CyclicHierarchy(
                        ancestor.concept.to_string(),
                        descendant.concept.to_string(),
                    ));
                }
                redundant.push(RedundantAnnotation {
                    tool: tool.clone(),
                    direct: descendant.concept.clone(),
                    direct_label: descendant.label.clone(),
                    redundant: ancestor.concept.clone(),
                    redundant_label: ancestor.label.clone(),
                });
            }
        }
    }
    redundant.sort();
    debug!(
        "Found {} redundant {} annotations",
        redundant.redundant_pairs().len(),
        direct.kind()
    );
    Ok(redundant)
}

/// Returns the direct annotations without the redundant ones
///
/// # Errors
///
/// [`EdamError::InvalidInput`] if the tables contain different kinds of concepts
pub fn remove_redundant(
    direct: &AnnotationTable,
    redundant: &RedundancyTable,
) -> EdamResult<AnnotationTable> {
    if direct.kind() != redundant.kind() {
        return Err(EdamError::InvalidInput(format!(
            "cannot remove redundant {} annotations from {} annotations",
            redundant.kind(),
            direct.kind()
        )));
    }
    let pairs = redundant.redundant_pairs();
    let mut reduced = direct.clone();
    reduced.retain(|row| !pairs.contains(&(&row.tool, &row.concept)));
    Ok(reduced)
}

/// Finds and removes all redundant annotations
///
/// # Errors
///
/// See [`find_redundant`]
pub fn reduce<A: Ancestry + ?Sized>(
    hierarchy: &A,
    direct: &AnnotationTable,
) -> EdamResult<AnnotationTable> {
    let redundant = find_redundant(hierarchy, direct)?;
    remove_redundant(direct, &redundant)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::ontology;
    use crate::{AnnotationKind, Closure, ConceptId, ToolId};

    #[test]
    fn most_specific_topic_remains() {
        let ont = ontology();
        let direct = ont.annotation_table(AnnotationKind::Topic, Closure::Direct);
        let redundant = find_redundant(&ont, &direct).unwrap();
        assert_eq!(redundant.len(), 1);
        let row = &redundant.rows()[0];
        assert_eq!(row.tool, ToolId::from_name("star"));
        assert_eq!(row.direct, ConceptId::from("topic_3168"));
        assert_eq!(row.redundant, ConceptId::from("topic_0080"));
        assert_eq!(row.redundant_label, "Sequence analysis");

        let reduced = remove_redundant(&direct, &redundant).unwrap();
        let star = ToolId::from_name("star");
        let topics: Vec<&ConceptId> = reduced.concepts_of(&star).collect();
        assert_eq!(topics, vec![&ConceptId::from("topic_3168")]);
        assert_eq!(reduced.len(), direct.len() - 1);
    }

    #[test]
    fn unrelated_operations_are_kept() {
        let ont = ontology();
        let direct = ont.annotation_table(AnnotationKind::Operation, Closure::Direct);
        let reduced = reduce(&ont, &direct).unwrap();
        assert_eq!(reduced, direct);
    }

    #[test]
    fn kinds_must_match() {
        let ont = ontology();
        let direct = ont.annotation_table(AnnotationKind::Topic, Closure::Direct);
        let redundant = RedundancyTable::new(AnnotationKind::Operation);
        assert!(remove_redundant(&direct, &redundant).is_err());
    }

    struct Everything;

    impl Ancestry for Everything {
        fn is_strict_ancestor(&self, _: &ConceptId, _: &ConceptId) -> bool {
            true
        }
    }

    #[test]
    fn mutual_ancestors_are_invalid() {
        let mut direct = AnnotationTable::new(AnnotationKind::Topic);
        let tool = ToolId::from_name("star");
        direct.push(tool.clone(), ConceptId::from("topic_1"), "");
        direct.push(tool, ConceptId::from("topic_2"), "");
        let err = find_redundant(&Everything, &direct).unwrap_err();
        assert!(matches!(err, EdamError::CyclicHierarchy(_, _)));
    }
}
