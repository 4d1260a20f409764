//! Loadkit core: pure loading state machine, list models and changesets.
mod changeset;
mod effect;
mod error;
mod lifetime;
mod list_model;
mod loading_state;
mod msg;
mod paged;
pub mod services;
mod state;
mod update;

pub use changeset::{Changeset, ContentComparable};
pub use effect::Effect;
pub use error::{ConfigError, LoadCause, LoadError};
pub use lifetime::ViewLifetime;
pub use list_model::{list_is_empty, ChangesetModel, IndexPath, ListModel};
pub use loading_state::LoadingState;
pub use msg::Msg;
pub use paged::{PagePlan, PageSize, PagedOutput, DEFAULT_PAGE_SIZE};
pub use state::{EmptyCheck, FlattenStrategy, Generation, LoaderOptions, LoaderState};
pub use update::update;
