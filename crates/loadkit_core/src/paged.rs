use std::num::NonZeroUsize;

use crate::{ChangesetModel, ConfigError, IndexPath, ListModel};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Content aggregated over the pages loaded so far.
///
/// Never mutated: each page fetch produces a new value holding the previous
/// content with the new page appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedOutput<T> {
    pub current_content: Vec<T>,
    pub more_available: bool,
}

impl<T> PagedOutput<T> {
    pub fn new(current_content: Vec<T>, more_available: bool) -> Self {
        Self {
            current_content,
            more_available,
        }
    }

    /// Start of a paging session: nothing loaded, more to come.
    pub fn fresh() -> Self {
        Self::new(Vec::new(), true)
    }

    pub fn len(&self) -> usize {
        self.current_content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_content.is_empty()
    }
}

impl<T> Default for PagedOutput<T> {
    fn default() -> Self {
        Self::fresh()
    }
}

/// One section; while more pages remain a trailing slot with no item is
/// counted so a list can show a "loading more" row.
impl<T> ListModel for PagedOutput<T> {
    type Item = T;

    fn total_count(&self) -> usize {
        self.count_in_section(0)
    }

    fn section_count(&self) -> usize {
        1
    }

    fn count_in_section(&self, section: usize) -> usize {
        if section == 0 {
            self.current_content.len() + usize::from(self.more_available)
        } else {
            0
        }
    }

    fn item_at(&self, path: IndexPath) -> Option<&T> {
        if path.section == 0 {
            self.current_content.get(path.item)
        } else {
            None
        }
    }
}

impl<T> ChangesetModel for PagedOutput<T> {
    fn current_items(&self) -> &[T] {
        &self.current_content
    }
}

/// Number of items requested per page. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(size)
            .map(Self)
            .ok_or(ConfigError::ZeroPageSize)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        match NonZeroUsize::new(DEFAULT_PAGE_SIZE) {
            Some(size) => Self(size),
            None => Self(NonZeroUsize::MIN),
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = ConfigError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

/// Which page to fetch for a paging request, and what to append it to.
///
/// Loaded content is always a prefix of the source. When its length is not
/// a multiple of the page size (a short last page, or pages loaded with a
/// different size) the page holding the next item is fetched and the items
/// already loaded are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan<T> {
    page: usize,
    page_size: PageSize,
    overlap: usize,
    base: PagedOutput<T>,
}

impl<T> PagePlan<T> {
    /// `next_page == Some(true)` continues from `loaded`; anything else
    /// restarts from page 0 with no content.
    pub fn new(next_page: Option<bool>, loaded: Option<PagedOutput<T>>, page_size: PageSize) -> Self {
        let base = match (next_page, loaded) {
            (Some(true), Some(loaded)) => loaded,
            _ => PagedOutput::fresh(),
        };
        let page = base.len() / page_size.get();
        let overlap = base.len() - page * page_size.get();
        Self {
            page,
            page_size,
            overlap,
            base,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Leading items of the fetched page that are already loaded.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Appends a fetched page. A page shorter than the page size marks the
    /// end of the data.
    pub fn apply(self, page_items: Vec<T>) -> PagedOutput<T> {
        let more_available = page_items.len() == self.page_size.get();
        let mut current_content = self.base.current_content;
        current_content.extend(page_items.into_iter().skip(self.overlap));
        PagedOutput::new(current_content, more_available)
    }
}
