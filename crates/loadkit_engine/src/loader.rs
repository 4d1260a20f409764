use std::future::Future;

use loadkit_core::{Generation, LoadError, PageSize};

/// Everything a loader gets for one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest<I, O> {
    pub generation: Generation,
    pub input: Option<I>,
    /// Output of the last successful load, if any.
    pub loaded: Option<O>,
}

/// Asynchronous source of a loader's output.
///
/// Timeouts and retries are the implementation's business; whatever error it
/// returns becomes an `Error` state.
#[async_trait::async_trait]
pub trait Loader<I, O>: Send + Sync
where
    I: Send + 'static,
    O: Send + 'static,
{
    async fn load(&self, request: LoadRequest<I, O>) -> Result<O, LoadError>;
}

/// [`Loader`] backed by a closure over the request input.
#[derive(Debug, Clone, Copy)]
pub struct LoaderFn<F>(F);

pub fn loader_fn<F>(f: F) -> LoaderFn<F> {
    LoaderFn(f)
}

#[async_trait::async_trait]
impl<I, O, F, Fut> Loader<I, O> for LoaderFn<F>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(Option<I>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, LoadError>> + Send + 'static,
{
    async fn load(&self, request: LoadRequest<I, O>) -> Result<O, LoadError> {
        (self.0)(request.input).await
    }
}

/// Fetches one page of items.
#[async_trait::async_trait]
pub trait PageSource<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Items of page `page`, at most `page_size` of them. A shorter page
    /// means there is nothing after it.
    async fn load_page(&self, page: usize, page_size: PageSize) -> Result<Vec<T>, LoadError>;
}

/// [`PageSource`] backed by a closure.
#[derive(Debug, Clone, Copy)]
pub struct PageFn<F>(F);

pub fn page_fn<F>(f: F) -> PageFn<F> {
    PageFn(f)
}

#[async_trait::async_trait]
impl<T, F, Fut> PageSource<T> for PageFn<F>
where
    T: Send + 'static,
    F: Fn(usize, PageSize) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, LoadError>> + Send + 'static,
{
    async fn load_page(&self, page: usize, page_size: PageSize) -> Result<Vec<T>, LoadError> {
        (self.0)(page, page_size).await
    }
}
