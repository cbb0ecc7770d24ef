use crate::concept::ConceptGroup;
use crate::ConceptId;
use crate::{DEFAULT_NUM_ALL_PARENTS, DEFAULT_NUM_PARENTS};

#[derive(Debug)]
pub(crate) struct ConceptInternal {
    id: ConceptId,
    label: String,
    parents: ConceptGroup,
    all_parents: ConceptGroup,
    children: ConceptGroup,
    alternatives: ConceptGroup,
    deprecated: bool,
    cached: bool,
}

impl ConceptInternal {
    pub fn new(id: ConceptId, label: &str) -> ConceptInternal {
        ConceptInternal {
            id,
            label: label.to_string(),
            parents: ConceptGroup::with_capacity(DEFAULT_NUM_PARENTS),
            all_parents: ConceptGroup::with_capacity(DEFAULT_NUM_ALL_PARENTS),
            children: ConceptGroup::with_capacity(DEFAULT_NUM_PARENTS),
            alternatives: ConceptGroup::new(),
            deprecated: false,
            cached: false,
        }
    }

    pub fn id(&self) -> &ConceptId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parents(&self) -> &ConceptGroup {
        &self.parents
    }

    pub fn children(&self) -> &ConceptGroup {
        &self.children
    }

    pub fn all_parents(&self) -> &ConceptGroup {
        &self.all_parents
    }

    pub fn alternatives(&self) -> &ConceptGroup {
        &self.alternatives
    }

    /// Replaces the cached ancestors and marks them as cached
    pub fn set_all_parents(&mut self, all_parents: ConceptGroup) {
        self.all_parents = all_parents;
        self.cached = true;
    }

    /// `all_parents` can't be used to check the cache state, because
    /// the cached ancestors of a concept with only deprecated parents are empty
    pub fn parents_cached(&self) -> bool {
        self.cached
    }

    pub fn add_parent(&mut self, parent_id: ConceptId) -> bool {
        self.parents.insert(parent_id)
    }

    pub fn add_child(&mut self, child_id: ConceptId) -> bool {
        self.children.insert(child_id)
    }

    pub fn add_alternative(&mut self, alternative: ConceptId) -> bool {
        self.alternatives.insert(alternative)
    }

    pub fn deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn deprecated_mut(&mut self) -> &mut bool {
        &mut self.deprecated
    }
}

impl PartialEq for ConceptInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConceptInternal {}
