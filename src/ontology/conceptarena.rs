use std::collections::hash_map::Values;
use std::collections::HashMap;

use crate::concept::internal::ConceptInternal;
use crate::ConceptId;

#[derive(Default)]
pub(crate) struct Arena {
    concepts: HashMap<ConceptId, ConceptInternal>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Inserts the concept, keeping an existing concept with the same id
    ///
    /// Returns `false` if the concept was already present
    pub fn insert(&mut self, concept: ConceptInternal) -> bool {
        let id = concept.id().clone();
        if self.concepts.contains_key(&id) {
            return false;
        }
        self.concepts.insert(id, concept);
        true
    }

    pub fn get(&self, id: &ConceptId) -> Option<&ConceptInternal> {
        self.concepts.get(id)
    }

    pub fn contains(&self, id: &ConceptId) -> bool {
        self.concepts.contains_key(id)
    }

    /// # Panics
    ///
    /// Panics if the concept is not present
    pub fn get_unchecked(&self, id: &ConceptId) -> &ConceptInternal {
        self.concepts
            .get(id)
            .expect("concept ids are validated before they are linked")
    }

    pub fn get_mut(&mut self, id: &ConceptId) -> Option<&mut ConceptInternal> {
        self.concepts.get_mut(id)
    }

    /// # Panics
    ///
    /// Panics if the concept is not present
    pub fn get_unchecked_mut(&mut self, id: &ConceptId) -> &mut ConceptInternal {
        self.concepts
            .get_mut(id)
            .expect("concept ids are validated before they are linked")
    }

    pub fn values(&self) -> Values<'_, ConceptId, ConceptInternal> {
        self.concepts.values()
    }

    /// All concept ids, sorted
    pub fn keys(&self) -> Vec<ConceptId> {
        let mut keys: Vec<ConceptId> = self.concepts.keys().cloned().collect();
        keys.sort();
        keys
    }
}
