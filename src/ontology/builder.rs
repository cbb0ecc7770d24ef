//! Step-wise construction of an [`Ontology`]
//!
//! The builder moves through a fixed sequence of states. Each state only
//! offers the methods that are valid at that point:
//!
//! ```text
//! Builder<LooseCollection>
//! |
//! concepts_complete()
//! |
//! V
//! Builder<AllConcepts>    add_parent(), set_deprecated(), add_alternative()
//! |
//! connect_all_concepts()
//! |
//! V
//! Builder<ConnectedConcepts>
//! |
//! build()
//! |
//! V
//! Ontology
//! ```
//!
//! Tools and their asserted annotations can be added in every state.
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use tracing::debug;

use crate::concept::internal::ConceptInternal;
use crate::ontology::conceptarena::Arena;
use crate::{AnnotationKind, ConceptGroup, ConceptId, EdamError, EdamResult, Ontology};
use crate::{Tool, ToolId};

/// All concepts can be added, but they are not linked yet
pub struct LooseCollection;
/// All concepts are present and can be linked to their parents
pub struct AllConcepts;
/// The hierarchy is complete and all ancestors are cached
pub struct ConnectedConcepts;

/// Marker for builder states that accept tools
pub trait AddTools {}
impl AddTools for LooseCollection {}
impl AddTools for AllConcepts {}
impl AddTools for ConnectedConcepts {}

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        concepts: builder.concepts,
        tools: builder.tools,
        edam_version: builder.edam_version,
        state: PhantomData,
    }
}

/// Builds an [`Ontology`] from concepts, their hierarchy and annotated tools
pub struct Builder<T> {
    concepts: Arena,
    tools: HashMap<ToolId, Tool>,
    edam_version: Option<String>,
    state: PhantomData<T>,
}

impl<T: AddTools> Builder<T> {
    /// Adds a tool
    ///
    /// If the tool already exists, only the label is updated, if the
    /// existing label is empty.
    pub fn add_tool(&mut self, id: ToolId, label: &str) {
        match self.tools.entry(id) {
            Entry::Occupied(mut entry) => {
                if entry.get().label().is_empty() {
                    entry.get_mut().set_label(label);
                }
            }
            Entry::Vacant(entry) => {
                let tool = Tool::new(entry.key().clone(), label);
                entry.insert(tool);
            }
        }
    }

    /// Records the asserted annotation of a tool with a concept
    ///
    /// The concept does not have to be part of the ontology. Annotations
    /// with unknown or deprecated concepts are kept as asserted and are
    /// filtered when the annotations are extracted.
    ///
    /// # Errors
    ///
    /// If the tool is not present, an [`EdamError::DoesNotExist`] is returned
    pub fn annotate(
        &mut self,
        tool: &ToolId,
        kind: AnnotationKind,
        concept: ConceptId,
    ) -> EdamResult<()> {
        let tool = self
            .tools
            .get_mut(tool)
            .ok_or_else(|| EdamError::DoesNotExist(tool.to_string()))?;
        tool.add_annotation(kind, concept);
        Ok(())
    }
}

impl Builder<LooseCollection> {
    /// Constructs a new, empty builder
    pub fn new() -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            concepts: Arena::default(),
            tools: HashMap::default(),
            edam_version: None,
            state: PhantomData,
        }
    }

    /// Adds a concept to the ontology
    ///
    /// Adding a concept twice keeps the first one.
    /// This method does not link the concept to its parents.
    pub fn add_concept(&mut self, id: ConceptId, label: &str) -> bool {
        self.concepts.insert(ConceptInternal::new(id, label))
    }

    /// Finishes adding concepts
    #[must_use]
    pub fn concepts_complete(self) -> Builder<AllConcepts> {
        transition_state(self)
    }
}

impl Default for Builder<LooseCollection> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<AllConcepts> {
    /// Add a connection from a concept to its parent
    ///
    /// # Errors
    ///
    /// If `parent_id` or `child_id` is not present, an [`EdamError::DoesNotExist`]
    /// is returned
    pub fn add_parent(&mut self, parent_id: &ConceptId, child_id: &ConceptId) -> EdamResult<()> {
        if !self.concepts.contains(child_id) {
            return Err(EdamError::DoesNotExist(child_id.to_string()));
        }
        let parent = self
            .concepts
            .get_mut(parent_id)
            .ok_or_else(|| EdamError::DoesNotExist(parent_id.to_string()))?;
        parent.add_child(child_id.clone());

        let child = self.concepts.get_unchecked_mut(child_id);
        child.add_parent(parent_id.clone());
        Ok(())
    }

    /// Marks a concept as deprecated
    ///
    /// Deprecated concepts are excluded from all hierarchy traversals.
    ///
    /// # Errors
    ///
    /// If the concept is not present, an [`EdamError::DoesNotExist`] is returned
    pub fn set_deprecated(&mut self, id: &ConceptId) -> EdamResult<()> {
        let concept = self
            .concepts
            .get_mut(id)
            .ok_or_else(|| EdamError::DoesNotExist(id.to_string()))?;
        *concept.deprecated_mut() = true;
        Ok(())
    }

    /// Records `alternative` as replacement of the deprecated concept `id`
    ///
    /// # Errors
    ///
    /// If one of the concepts is not present, an [`EdamError::DoesNotExist`] is returned
    pub fn add_alternative(&mut self, id: &ConceptId, alternative: &ConceptId) -> EdamResult<()> {
        if !self.concepts.contains(alternative) {
            return Err(EdamError::DoesNotExist(alternative.to_string()));
        }
        let concept = self
            .concepts
            .get_mut(id)
            .ok_or_else(|| EdamError::DoesNotExist(id.to_string()))?;
        concept.add_alternative(alternative.clone());
        Ok(())
    }

    /// Creates and caches the `all_parents` values for every concept
    ///
    /// Deprecated concepts are not part of any `all_parents` cache
    /// and don't have any ancestors themselves.
    ///
    /// # Errors
    ///
    /// If the hierarchy contains a cycle, an [`EdamError::CyclicHierarchy`]
    /// is returned
    pub fn connect_all_concepts(mut self) -> EdamResult<Builder<ConnectedConcepts>> {
        let mut visiting = HashSet::new();
        for id in self.concepts.keys() {
            self.create_cache_of_ancestors(&id, &mut visiting)?;
        }
        debug!("Cached ancestors of {} concepts", self.concepts.len());
        Ok(transition_state(self))
    }

    /// This method is part of the cache creation to link all concepts to their
    /// direct and indirect parents
    ///
    /// The recursion bubbles up to the top of the hierarchy and caches the
    /// ancestors of every concept on the way back down. It stops at concepts
    /// that are already cached. `visiting` holds the concepts of the current
    /// recursion path, reaching one of them again means the hierarchy is cyclic.
    fn create_cache_of_ancestors(
        &mut self,
        id: &ConceptId,
        visiting: &mut HashSet<ConceptId>,
    ) -> EdamResult<()> {
        if self.concepts.get_unchecked(id).parents_cached() {
            return Ok(());
        }
        if self.concepts.get_unchecked(id).deprecated() {
            self.concepts
                .get_unchecked_mut(id)
                .set_all_parents(ConceptGroup::default());
            return Ok(());
        }
        visiting.insert(id.clone());

        let parents = self.concepts.get_unchecked(id).parents().clone();
        let mut res = ConceptGroup::default();
        for parent in &parents {
            if self.concepts.get_unchecked(parent).deprecated() {
                continue;
            }
            if visiting.contains(parent) {
                return Err(EdamError::CyclicHierarchy(
                    id.to_string(),
                    parent.to_string(),
                ));
            }
            self.create_cache_of_ancestors(parent, visiting)?;
            res.insert(parent.clone());
            res.extend(self.concepts.get_unchecked(parent).all_parents().iter().cloned());
        }

        visiting.remove(id);
        self.concepts.get_unchecked_mut(id).set_all_parents(res);
        Ok(())
    }
}

impl Builder<ConnectedConcepts> {
    /// Returns the finished [`Ontology`]
    pub fn build(self) -> Ontology {
        Ontology {
            concepts: self.concepts,
            tools: self.tools,
            edam_version: self.edam_version,
        }
    }
}

impl<T> Builder<T> {
    /// Sets the EDAM release, e.g. `1.25`
    pub fn set_edam_version(&mut self, version: &str) {
        self.edam_version = Some(version.to_string());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(s: &str) -> ConceptId {
        ConceptId::from(s)
    }

    fn loose(ids: &[&str]) -> Builder<AllConcepts> {
        let mut builder = Builder::new();
        for s in ids {
            builder.add_concept(id(s), s);
        }
        builder.concepts_complete()
    }

    #[test]
    fn add_concept_twice() {
        let mut builder = Builder::new();
        assert!(builder.add_concept(id("topic_0003"), "Topic"));
        assert!(!builder.add_concept(id("topic_0003"), "Other"));
        let ont = builder.concepts_complete().connect_all_concepts().unwrap().build();
        assert_eq!(ont.len(), 1);
        assert_eq!(ont.concept(&id("topic_0003")).unwrap().label(), "Topic");
    }

    #[test]
    fn missing_parent() {
        let mut builder = loose(&["topic_1"]);
        let err = builder.add_parent(&id("topic_0"), &id("topic_1")).unwrap_err();
        assert!(matches!(err, EdamError::DoesNotExist(_)));
        assert!(builder.add_parent(&id("topic_1"), &id("topic_2")).is_err());
    }

    #[test]
    fn cache_ancestors() {
        let mut builder = loose(&["topic_1", "topic_2", "topic_3", "topic_4"]);
        builder.add_parent(&id("topic_1"), &id("topic_2")).unwrap();
        builder.add_parent(&id("topic_2"), &id("topic_3")).unwrap();
        builder.add_parent(&id("topic_1"), &id("topic_4")).unwrap();
        builder.add_parent(&id("topic_4"), &id("topic_3")).unwrap();
        let ont = builder.connect_all_concepts().unwrap().build();

        let leaf = ont.concept(&id("topic_3")).unwrap();
        assert_eq!(leaf.parent_ids().len(), 2);
        assert_eq!(leaf.all_parent_ids().len(), 3);
        assert!(ont.concept(&id("topic_1")).unwrap().all_parent_ids().is_empty());
    }

    #[test]
    fn deprecated_parents_are_not_followed() {
        let mut builder = loose(&["topic_1", "topic_2", "topic_3"]);
        builder.add_parent(&id("topic_1"), &id("topic_2")).unwrap();
        builder.add_parent(&id("topic_2"), &id("topic_3")).unwrap();
        builder.set_deprecated(&id("topic_2")).unwrap();
        let ont = builder.connect_all_concepts().unwrap().build();

        assert!(ont.concept(&id("topic_3")).unwrap().all_parent_ids().is_empty());
        assert!(ont.concept(&id("topic_2")).unwrap().all_parent_ids().is_empty());
        assert_eq!(ont.concept(&id("topic_2")).unwrap().parent_ids().len(), 1);
    }

    #[test]
    fn cycles_are_flagged() {
        let mut builder = loose(&["topic_1", "topic_2", "topic_3"]);
        builder.add_parent(&id("topic_1"), &id("topic_2")).unwrap();
        builder.add_parent(&id("topic_2"), &id("topic_3")).unwrap();
        builder.add_parent(&id("topic_3"), &id("topic_1")).unwrap();
        let err = builder.connect_all_concepts().err().unwrap();
        assert!(matches!(err, EdamError::CyclicHierarchy(_, _)));
    }

    #[test]
    fn alternatives() {
        let mut builder = loose(&["topic_1", "topic_2"]);
        builder.set_deprecated(&id("topic_1")).unwrap();
        builder.add_alternative(&id("topic_1"), &id("topic_2")).unwrap();
        assert!(builder.add_alternative(&id("topic_1"), &id("topic_9")).is_err());
        let ont = builder.connect_all_concepts().unwrap().build();
        let old = ont.concept(&id("topic_1")).unwrap();
        assert!(old.alternative_ids().contains(&id("topic_2")));
    }

    #[test]
    fn tools() {
        let mut builder = Builder::new();
        let star = ToolId::from_name("star");
        builder.add_tool(star.clone(), "");
        builder.add_tool(star.clone(), "STAR");
        builder.add_tool(star.clone(), "Other");
        builder
            .annotate(&star, AnnotationKind::Topic, id("topic_9999"))
            .unwrap();
        assert!(builder
            .annotate(&ToolId::from_name("foo"), AnnotationKind::Topic, id("topic_1"))
            .is_err());
        let ont = builder.concepts_complete().connect_all_concepts().unwrap().build();
        assert_eq!(ont.tool(&star).unwrap().label(), "STAR");
        assert_eq!(ont.tool(&star).unwrap().asserted(AnnotationKind::Topic).len(), 1);
    }
}
