use crate::{ChangesetModel, IndexPath, ListModel};

/// Items that can be the same record (`PartialEq`, identity) while carrying
/// different content (`content_matches`).
///
/// Both relations must be equivalence relations. A product with a new price
/// is identity-equal to its old self but does not match its content.
pub trait ContentComparable: PartialEq {
    fn content_matches(&self, other: &Self) -> bool;
}

/// Edits that turn `old_items` into `new_items`.
///
/// Positions in each list follow the order of the sequence they index into.
/// Deletions, modifications and unchanged identity matches partition
/// `old_items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changeset<T> {
    /// Positions in `old_items` with no identity match in `new_items`.
    pub deletions: Vec<usize>,
    /// Positions in `old_items` whose identity match in `new_items` has
    /// different content.
    pub modifications: Vec<usize>,
    /// Positions in `new_items` with no identity match in `old_items`.
    pub insertions: Vec<usize>,
    pub old_items: Vec<T>,
    pub new_items: Vec<T>,
}

impl<T: ContentComparable> Changeset<T> {
    pub fn new(old_items: Vec<T>, new_items: Vec<T>) -> Self {
        let mut deletions = Vec::new();
        let mut modifications = Vec::new();

        for (position, item) in old_items.iter().enumerate() {
            // First identity match wins when `new_items` holds duplicates.
            match new_items.iter().find(|candidate| *candidate == item) {
                None => deletions.push(position),
                Some(counterpart) if !item.content_matches(counterpart) => {
                    modifications.push(position)
                }
                Some(_) => {}
            }
        }

        let insertions = new_items
            .iter()
            .enumerate()
            .filter(|(_, item)| !old_items.contains(*item))
            .map(|(position, _)| position)
            .collect();

        Self {
            deletions,
            modifications,
            insertions,
            old_items,
            new_items,
        }
    }

    /// Changeset between the current items of two list snapshots.
    pub fn between<M>(previous: &M, next: &M) -> Self
    where
        M: ChangesetModel<Item = T> + ?Sized,
        T: Clone,
    {
        Self::new(
            previous.current_items().to_vec(),
            next.current_items().to_vec(),
        )
    }
}

impl<T> Changeset<T> {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.modifications.is_empty() && self.insertions.is_empty()
    }

    pub fn deletion_paths(&self) -> Vec<IndexPath> {
        index_paths(&self.deletions)
    }

    pub fn modification_paths(&self) -> Vec<IndexPath> {
        index_paths(&self.modifications)
    }

    pub fn insertion_paths(&self) -> Vec<IndexPath> {
        index_paths(&self.insertions)
    }
}

fn index_paths(positions: &[usize]) -> Vec<IndexPath> {
    positions.iter().copied().map(IndexPath::item).collect()
}

// The list shown after the change is `new_items`.
impl<T> ListModel for Changeset<T> {
    type Item = T;

    fn total_count(&self) -> usize {
        self.new_items.total_count()
    }

    fn section_count(&self) -> usize {
        self.new_items.section_count()
    }

    fn count_in_section(&self, section: usize) -> usize {
        self.new_items.count_in_section(section)
    }

    fn item_at(&self, path: IndexPath) -> Option<&T> {
        self.new_items.item_at(path)
    }
}

impl<T> ChangesetModel for Changeset<T> {
    fn current_items(&self) -> &[T] {
        &self.new_items
    }
}
