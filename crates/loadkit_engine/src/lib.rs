//! Loadkit engine: asynchronous loaders driving the core state machine.
mod engine;
mod lifecycle;
mod loader;
mod observable;
mod paging;
mod types;

pub use engine::{ContentLoader, Requester};
pub use lifecycle::ViewLifecycle;
pub use loader::{loader_fn, page_fn, LoadRequest, Loader, LoaderFn, PageFn, PageSource};
pub use observable::{Observable, Signal, Subscription};
pub use paging::{PageRequest, PagingLoader, PagingSettings};
pub use types::EngineError;
