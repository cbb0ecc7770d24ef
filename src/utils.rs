//! Utility structs and methods

/// Iterator of all unordered pairs of a slice
///
/// Every element is paired once with every element that follows it. Used to
/// compare every tool of a list with every other tool exactly once.
///
/// # Examples
/// ```
/// use edamannot::utils::Combinations;
///
/// let tools = ["star", "bowtie", "blast"];
/// let mut c = Combinations::new(&tools);
///
/// assert_eq!(c.next(), Some((&"star", &"bowtie")));
/// assert_eq!(c.next(), Some((&"star", &"blast")));
/// assert_eq!(c.next(), Some((&"bowtie", &"blast")));
/// assert!(c.next().is_none());
/// ```
pub struct Combinations<'a, T> {
    items: &'a [T],
    first: usize,
    second: usize,
}

impl<'a, T> Combinations<'a, T> {
    /// Creates a new Combinations iterator
    pub fn new(items: &'a [T]) -> Self {
        Self {
            items,
            first: 0,
            second: 1,
        }
    }

    fn remaining(&self) -> usize {
        let n = self.items.len();
        if self.first >= n {
            return 0;
        }
        // rest of the current row plus all following rows
        let current = n.saturating_sub(self.second);
        let following = n - self.first - 1;
        current + following * following.saturating_sub(1) / 2
    }
}

impl<'a, T> Iterator for Combinations<'a, T> {
    type Item = (&'a T, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while self.first < self.items.len() {
            if let Some(second) = self.items.get(self.second) {
                self.second += 1;
                return Some((&self.items[self.first], second));
            }
            self.first += 1;
            self.second = self.first + 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Combinations<'_, T> {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn all_pairs() {
        let tools = ["star", "bowtie", "blast", "lonely"];
        let pairs: Vec<(&&str, &&str)> = Combinations::new(&tools).collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], (&"star", &"bowtie"));
        assert_eq!(pairs[3], (&"bowtie", &"blast"));
        assert_eq!(pairs[5], (&"blast", &"lonely"));
    }

    #[test]
    fn too_short() {
        let empty: [u8; 0] = [];
        assert_eq!(Combinations::new(&empty).next(), None);
        assert_eq!(Combinations::new(&[1]).next(), None);
        assert_eq!(Combinations::new(&[1, 2]).count(), 1);
    }

    #[test]
    fn exact_size() {
        let items: Vec<usize> = (0..7).collect();
        let mut c = Combinations::new(&items);
        assert_eq!(c.len(), 21);
        c.next();
        c.nth(5);
        assert_eq!(c.len(), 14);
        assert_eq!(c.count(), 14);
    }
}
