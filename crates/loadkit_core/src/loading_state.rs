use crate::LoadError;

/// Lifecycle phase of one fetch.
///
/// Equality is structural: `Success` and `Error` also compare their payloads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadingState<T> {
    /// No fetch has been requested yet.
    #[default]
    Unloaded,
    /// The fetch succeeded but found nothing (no favourites, empty basket).
    Empty,
    /// A fetch is in progress.
    Loading,
    /// The fetch succeeded with content.
    Success(T),
    /// The fetch failed.
    Error(LoadError),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// `true` for the states that end a fetch: `Success`, `Empty` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Empty | Self::Error(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadingState<U> {
        match self {
            Self::Unloaded => LoadingState::Unloaded,
            Self::Empty => LoadingState::Empty,
            Self::Loading => LoadingState::Loading,
            Self::Success(value) => LoadingState::Success(f(value)),
            Self::Error(err) => LoadingState::Error(err),
        }
    }
}
