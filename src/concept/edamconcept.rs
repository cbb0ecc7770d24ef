use crate::concept::internal::ConceptInternal;
use crate::concept::{ConceptGroup, Concepts};
use crate::{AnnotationKind, ConceptId, EdamError, EdamResult, Ontology};

/// A single concept of the EDAM ontology
///
/// The concept holds all hierarchy information and provides
/// path traversals towards its ancestors.
///
/// Only non-deprecated concepts take part in the hierarchy:
/// [`EdamConcept::all_parent_ids`] never contains a deprecated concept and
/// the ancestors of a deprecated concept are not followed.
#[derive(Debug, Clone, Copy)]
pub struct EdamConcept<'a> {
    id: &'a ConceptId,
    label: &'a str,
    parents: &'a ConceptGroup,
    all_parents: &'a ConceptGroup,
    children: &'a ConceptGroup,
    alternatives: &'a ConceptGroup,
    deprecated: bool,
    ontology: &'a Ontology,
}

impl<'a> EdamConcept<'a> {
    /// Constructs a new [`EdamConcept`]
    ///
    /// # Errors
    ///
    /// If the given [`ConceptId`] does not match an existing concept
    /// it returns an Error
    pub fn try_new(ontology: &'a Ontology, id: &ConceptId) -> EdamResult<EdamConcept<'a>> {
        let concept = ontology
            .get(id)
            .ok_or_else(|| EdamError::DoesNotExist(id.to_string()))?;
        Ok(EdamConcept::new(ontology, concept))
    }

    pub(crate) fn new(ontology: &'a Ontology, concept: &'a ConceptInternal) -> EdamConcept<'a> {
        EdamConcept {
            id: concept.id(),
            label: concept.label(),
            parents: concept.parents(),
            all_parents: concept.all_parents(),
            children: concept.children(),
            alternatives: concept.alternatives(),
            deprecated: concept.deprecated(),
            ontology,
        }
    }

    /// Returns the [`ConceptId`] of the concept
    pub fn id(&self) -> &'a ConceptId {
        self.id
    }

    /// Returns the `rdfs:label` of the concept, or an empty string
    ///
    /// e.g.: `Sequence analysis`
    pub fn label(&self) -> &'a str {
        self.label
    }

    /// Returns the EDAM branch of the concept
    pub fn kind(&self) -> Option<AnnotationKind> {
        self.id.kind()
    }

    /// Returns `true` if the concept is marked as deprecated
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Returns an iterator of the direct parents of the concept
    ///
    /// Deprecated parents are included, use [`EdamConcept::all_parents`]
    /// for the hierarchy without deprecated concepts.
    pub fn parents(&self) -> Concepts<'a> {
        Concepts::new(self.parents, self.ontology)
    }

    /// Returns the [`ConceptId`]s of the direct parents
    pub fn parent_ids(&self) -> &'a ConceptGroup {
        self.parents
    }

    /// Returns an iterator of the direct children of the concept
    pub fn children(&self) -> Concepts<'a> {
        Concepts::new(self.children, self.ontology)
    }

    /// Returns the [`ConceptId`]s of all non-deprecated direct and indirect parents
    pub fn all_parent_ids(&self) -> &'a ConceptGroup {
        self.all_parents
    }

    /// Returns an iterator of all non-deprecated direct and indirect parents
    pub fn all_parents(&self) -> Concepts<'a> {
        Concepts::new(self.all_parents, self.ontology)
    }

    /// Returns the concepts suggested as replacement for a deprecated concept
    pub fn alternatives(&self) -> Concepts<'a> {
        Concepts::new(self.alternatives, self.ontology)
    }

    /// Returns the [`ConceptId`]s of the replacement concepts
    pub fn alternative_ids(&self) -> &'a ConceptGroup {
        self.alternatives
    }

    /// Returns the [`ConceptId`]s that are ancestors of both `self` **and** `other`
    ///
    /// `self` and `other` are part of the result if one is the ancestor of the other.
    pub fn common_ancestor_ids(&self, other: &EdamConcept) -> ConceptGroup {
        let mut res = self.all_parent_ids() & other.all_parent_ids();

        if other.all_parent_ids().contains(self.id()) {
            res.insert(self.id().clone());
        }

        if self.all_parent_ids().contains(other.id()) {
            res.insert(other.id().clone());
        }

        res
    }

    /// Returns `true` if `self` is a child (direct or indirect) of `other`
    pub fn child_of(&self, other: &EdamConcept) -> bool {
        self.all_parent_ids().contains(other.id())
    }

    /// Returns `true` if `self` is a parent (direct or indirect) of `other`
    pub fn parent_of(&self, other: &EdamConcept) -> bool {
        other.child_of(self)
    }

    /// Returns the distance (steps) from `self` to `other`, if `other` is an ancestor of `self`
    pub fn distance_to_ancestor(&self, other: &EdamConcept) -> Option<usize> {
        if self.id() == other.id() {
            return Some(0);
        }
        if !self.all_parent_ids().contains(other.id()) {
            return None;
        }
        self.active_parents()
            .filter_map(|p| p.distance_to_ancestor(other))
            .min()
            .map(|c| c + 1)
    }

    /// Returns the shortest path to traverse from `self` to `other`, if `other` is an ancestor of `self`
    ///
    /// The path does not contain `self`, but ends with `other`.
    pub fn path_to_ancestor(&self, other: &EdamConcept) -> Option<Vec<ConceptId>> {
        if self.id() == other.id() {
            return Some(vec![]);
        }
        if !self.all_parent_ids().contains(other.id()) {
            return None;
        }
        self.active_parents()
            .filter_map(|p| {
                let mut path = p.path_to_ancestor(other)?;
                path.insert(0, p.id().clone());
                Some(path)
            })
            .min_by_key(Vec::len)
    }

    /// Returns all `is-a` edges between `self` and the root, as `(sub, super)` pairs
    ///
    /// Edges from or to deprecated concepts are skipped. A deprecated concept
    /// has no hierarchy edges at all.
    pub fn hierarchy_edges(&self) -> Vec<(EdamConcept<'a>, EdamConcept<'a>)> {
        let mut edges = Vec::new();
        if self.is_deprecated() {
            return edges;
        }
        for sub in std::iter::once(*self).chain(self.all_parents()) {
            for sup in sub.active_parents() {
                edges.push((sub, sup));
            }
        }
        edges
    }

    fn active_parents(&self) -> impl Iterator<Item = EdamConcept<'a>> {
        self.parents().filter(|p| !p.is_deprecated())
    }
}

impl PartialEq for EdamConcept<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EdamConcept<'_> {}
