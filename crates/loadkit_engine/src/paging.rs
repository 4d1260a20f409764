use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use loadkit_core::{
    LoadError, LoaderOptions, LoaderState, LoadingState, PagePlan, PageSize, PagedOutput,
    ViewLifetime,
};
use loadkit_logging::{loadkit_debug, loadkit_info};

use crate::loader::{LoadRequest, Loader, PageSource};
use crate::observable::Subscription;
use crate::{ContentLoader, EngineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PagingSettings {
    pub page_size: PageSize,
    pub options: LoaderOptions,
}

struct PageAccumulator<S> {
    source: S,
    page_size: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl<T, S> Loader<PageRequest, PagedOutput<T>> for PageAccumulator<S>
where
    T: Send + 'static,
    S: PageSource<T>,
{
    async fn load(
        &self,
        request: LoadRequest<PageRequest, PagedOutput<T>>,
    ) -> Result<PagedOutput<T>, LoadError> {
        // Lifecycle refreshes carry no input and start over at the current
        // size.
        let (next_page, page_size) = match request.input {
            Some((next_page, page_size)) => (next_page, page_size),
            None => (
                false,
                PageSize::new(self.page_size.load(Ordering::Acquire))
                    .map_err(LoadError::failure)?,
            ),
        };
        let plan = PagePlan::new(Some(next_page), request.loaded, page_size);
        loadkit_debug!(
            "generation {} fetching page {} (page size {})",
            request.generation,
            plan.page(),
            page_size.get()
        );
        let items = self.source.load_page(plan.page(), page_size).await?;
        Ok(plan.apply(items))
    }
}

/// Input of the underlying loader: whether to continue from the loaded
/// pages, and the page size in effect when the request was made.
pub type PageRequest = (bool, PageSize);

/// Loads content page by page, appending each page to what is already
/// loaded.
///
/// A `true` request fetches the next page, `false` starts over from page 0.
/// The automatic lifecycle refresh starts over as well.
pub struct PagingLoader<T> {
    loader: ContentLoader<PageRequest, PagedOutput<T>>,
    page_size: Arc<AtomicUsize>,
}

impl<T> PagingLoader<T>
where
    T: Clone + Send + 'static,
{
    /// Spawns the driver on the current Tokio runtime.
    pub fn new<S>(source: S, settings: PagingSettings) -> Self
    where
        S: PageSource<T> + 'static,
    {
        let page_size = Arc::new(AtomicUsize::new(settings.page_size.get()));
        let accumulator = PageAccumulator {
            source,
            page_size: Arc::clone(&page_size),
        };
        let loader = ContentLoader::spawn(LoaderState::for_list(settings.options), accumulator);
        Self { loader, page_size }
    }
}

impl<T: Clone> PagingLoader<T> {
    pub fn next_page(&self) -> Result<(), EngineError> {
        self.loader.refresh(Some((true, self.page_size())))
    }

    /// Drops the loaded pages and fetches page 0 again.
    pub fn restart(&self) -> Result<(), EngineError> {
        self.loader.refresh(Some((false, self.page_size())))
    }

    pub fn page_size(&self) -> PageSize {
        PageSize::new(self.page_size.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Changes the page size. The loaded pages no longer line up with the
    /// new size, so a different size restarts loading. Returns whether it
    /// did.
    pub fn set_page_size(&self, page_size: PageSize) -> Result<bool, EngineError> {
        let previous = self.page_size.swap(page_size.get(), Ordering::AcqRel);
        if previous == page_size.get() {
            return Ok(false);
        }
        loadkit_info!(
            "page size changed from {} to {}, restarting",
            previous,
            page_size.get()
        );
        self.restart()?;
        Ok(true)
    }

    /// [`PagingLoader::set_page_size`] for an unchecked size; zero is
    /// rejected.
    pub fn resize(&self, page_size: usize) -> Result<bool, EngineError> {
        self.set_page_size(PageSize::new(page_size)?)
    }

    /// The flat list of items loaded so far.
    pub fn current_items(&self) -> Vec<T> {
        self.loader
            .loaded()
            .map(|output| output.current_content)
            .unwrap_or_default()
    }

    /// `true` until a short page has been loaded.
    pub fn more_available(&self) -> bool {
        self.loader
            .loaded()
            .is_none_or(|output| output.more_available)
    }

    pub fn state(&self) -> LoadingState<PagedOutput<T>> {
        self.loader.state()
    }

    pub fn subscribe(&self) -> Subscription<LoadingState<PagedOutput<T>>> {
        self.loader.subscribe()
    }

    pub fn lifetime(&self, event: ViewLifetime) -> Result<(), EngineError> {
        self.loader.lifetime(event)
    }

    /// The underlying loader, for loading flags, errors and requesters.
    pub fn loader(&self) -> &ContentLoader<PageRequest, PagedOutput<T>> {
        &self.loader
    }
}
