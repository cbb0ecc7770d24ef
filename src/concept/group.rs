use std::collections::HashSet;
use std::ops::{BitAnd, BitOr};

use smallvec::SmallVec;

use crate::{ConceptId, EdamConcept, Ontology};

/// A set of [`ConceptId`]s representing a group of EDAM concepts
///
/// Each concept can occur only once in the group and the group
/// is always sorted by [`ConceptId`].
///
/// This group is used e.g. for the parents or children of a concept
/// or the annotations of a tool.
///
/// # Examples
///
/// ```
/// use edamannot::{ConceptGroup, ConceptId};
///
/// let mut group = ConceptGroup::new();
/// assert!(group.insert(ConceptId::from("topic_0080")));
/// assert!(group.insert(ConceptId::from("topic_0003")));
/// assert!(!group.insert(ConceptId::from("topic_0080")));
///
/// assert_eq!(group.len(), 2);
/// assert!(group.contains(&ConceptId::from("topic_0003")));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConceptGroup {
    ids: SmallVec<[ConceptId; 8]>,
}

impl ConceptGroup {
    /// Constructs a new, empty [`ConceptGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`ConceptGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: SmallVec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`ConceptId`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`ConceptId`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`ConceptId`] to the group
    ///
    /// Returns whether the `ConceptId` was newly inserted. That is:
    ///
    /// - If the group did not previously contain this `ConceptId`, true is returned.
    /// - If the group already contained this `ConceptId`, false is returned.
    pub fn insert(&mut self, id: ConceptId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Removes the [`ConceptId`] from the group
    ///
    /// Returns whether the `ConceptId` was present.
    pub fn remove(&mut self, id: &ConceptId) -> bool {
        match self.ids.binary_search(id) {
            Ok(idx) => {
                self.ids.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns `true` if the group contains the [`ConceptId`]
    pub fn contains(&self, id: &ConceptId) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns an Iterator of the [`ConceptId`]s inside the group
    pub fn iter(&self) -> ConceptIds<'_> {
        ConceptIds::new(self.ids.iter())
    }

    /// Returns the [`ConceptId`]s as slice
    pub fn as_slice(&self) -> &[ConceptId] {
        &self.ids
    }
}

impl From<HashSet<ConceptId>> for ConceptGroup {
    fn from(s: HashSet<ConceptId>) -> Self {
        s.into_iter().collect()
    }
}

impl FromIterator<ConceptId> for ConceptGroup {
    fn from_iter<T: IntoIterator<Item = ConceptId>>(iter: T) -> Self {
        let mut group = ConceptGroup::new();
        for id in iter {
            group.insert(id);
        }
        group
    }
}

impl Extend<ConceptId> for ConceptGroup {
    fn extend<T: IntoIterator<Item = ConceptId>>(&mut self, iter: T) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl<'a> IntoIterator for &'a ConceptGroup {
    type Item = &'a ConceptId;
    type IntoIter = ConceptIds<'a>;

    fn into_iter(self) -> ConceptIds<'a> {
        ConceptIds::new(self.ids.iter())
    }
}

/// An iterator over [`ConceptId`]s
pub struct ConceptIds<'a> {
    inner: std::slice::Iter<'a, ConceptId>,
}

impl<'a> ConceptIds<'a> {
    fn new(inner: std::slice::Iter<'a, ConceptId>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for ConceptIds<'a> {
    type Item = &'a ConceptId;
    fn next(&mut self) -> Option<&'a ConceptId> {
        self.inner.next()
    }
}

/// Iterates the [`EdamConcept`]s of a [`ConceptGroup`]
///
/// Ids that are not present in the ontology are skipped.
pub struct Concepts<'a> {
    ids: ConceptIds<'a>,
    ontology: &'a Ontology,
}

impl<'a> Concepts<'a> {
    pub(crate) fn new(group: &'a ConceptGroup, ontology: &'a Ontology) -> Self {
        Self {
            ids: group.iter(),
            ontology,
        }
    }
}

impl<'a> Iterator for Concepts<'a> {
    type Item = EdamConcept<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        for id in self.ids.by_ref() {
            if let Some(concept) = self.ontology.concept(id) {
                return Some(concept);
            }
        }
        None
    }
}

impl BitOr for &ConceptGroup {
    type Output = ConceptGroup;

    fn bitor(self, rhs: &ConceptGroup) -> ConceptGroup {
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut group = large.clone();
        for id in small {
            group.insert(id.clone());
        }
        group
    }
}

impl BitAnd for &ConceptGroup {
    type Output = ConceptGroup;

    fn bitand(self, rhs: &ConceptGroup) -> ConceptGroup {
        let mut group = ConceptGroup::with_capacity(self.len().min(rhs.len()));
        for id in self {
            if rhs.contains(id) {
                group.ids.push(id.clone());
            }
        }
        group
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn group(ids: &[&str]) -> ConceptGroup {
        ids.iter().map(|id| ConceptId::from(*id)).collect()
    }

    #[test]
    fn sorted_and_unique() {
        let g = group(&["topic_3", "topic_1", "topic_2", "topic_1"]);
        let ids: Vec<&str> = g.iter().map(ConceptId::short).collect();
        assert_eq!(ids, vec!["topic_1", "topic_2", "topic_3"]);
    }

    #[test]
    fn remove() {
        let mut g = group(&["topic_1", "topic_2"]);
        assert!(g.remove(&ConceptId::from("topic_1")));
        assert!(!g.remove(&ConceptId::from("topic_1")));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn and() {
        let a = group(&["topic_1", "topic_2", "topic_3"]);
        let b = group(&["topic_2", "topic_3", "topic_4"]);
        assert_eq!(&a & &b, group(&["topic_2", "topic_3"]));
        assert!((&a & &ConceptGroup::new()).is_empty());
    }

    #[test]
    fn or() {
        let a = group(&["topic_1", "topic_2"]);
        let b = group(&["topic_2", "topic_5", "topic_0"]);
        assert_eq!(
            &a | &b,
            group(&["topic_0", "topic_1", "topic_2", "topic_5"])
        );
    }
}
