/// Position of an item in a sectioned list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// Path of `item` in the first (and usually only) section.
    pub fn item(item: usize) -> Self {
        Self::new(0, item)
    }
}

/// Read-only view of a list of items, possibly split into sections.
pub trait ListModel {
    type Item;

    /// Number of items across all sections.
    fn total_count(&self) -> usize;

    fn section_count(&self) -> usize;

    fn count_in_section(&self, section: usize) -> usize;

    /// Item at `path`, or `None` for out-of-range paths and synthetic slots.
    fn item_at(&self, path: IndexPath) -> Option<&Self::Item>;
}

/// A [`ListModel`] that can hand out the flat sequence a
/// [`Changeset`](crate::Changeset) is computed from.
pub trait ChangesetModel: ListModel {
    fn current_items(&self) -> &[Self::Item];
}

/// Empty check for list-shaped loader outputs.
pub fn list_is_empty<L: ListModel>(list: &L) -> bool {
    list.total_count() == 0
}

// A plain sequence is a single section holding every element.
impl<T> ListModel for [T] {
    type Item = T;

    fn total_count(&self) -> usize {
        self.len()
    }

    fn section_count(&self) -> usize {
        1
    }

    fn count_in_section(&self, section: usize) -> usize {
        if section == 0 {
            self.len()
        } else {
            0
        }
    }

    fn item_at(&self, path: IndexPath) -> Option<&T> {
        if path.section == 0 {
            self.get(path.item)
        } else {
            None
        }
    }
}

impl<T> ChangesetModel for [T] {
    fn current_items(&self) -> &[T] {
        self
    }
}

impl<T> ListModel for Vec<T> {
    type Item = T;

    fn total_count(&self) -> usize {
        self.as_slice().total_count()
    }

    fn section_count(&self) -> usize {
        self.as_slice().section_count()
    }

    fn count_in_section(&self, section: usize) -> usize {
        self.as_slice().count_in_section(section)
    }

    fn item_at(&self, path: IndexPath) -> Option<&T> {
        self.as_slice().item_at(path)
    }
}

impl<T> ChangesetModel for Vec<T> {
    fn current_items(&self) -> &[T] {
        self
    }
}

/// Content that may not have loaded yet reads as an empty list with no
/// sections.
impl<L: ListModel> ListModel for Option<L> {
    type Item = L::Item;

    fn total_count(&self) -> usize {
        self.as_ref().map_or(0, ListModel::total_count)
    }

    fn section_count(&self) -> usize {
        self.as_ref().map_or(0, ListModel::section_count)
    }

    fn count_in_section(&self, section: usize) -> usize {
        self.as_ref()
            .map_or(0, |list| list.count_in_section(section))
    }

    fn item_at(&self, path: IndexPath) -> Option<&L::Item> {
        self.as_ref().and_then(|list| list.item_at(path))
    }
}

impl<L: ChangesetModel> ChangesetModel for Option<L> {
    fn current_items(&self) -> &[L::Item] {
        match self {
            Some(list) => list.current_items(),
            None => &[],
        }
    }
}
