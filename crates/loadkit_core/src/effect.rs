use crate::{Generation, LoadingState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<I, O> {
    /// Run the loader. `loaded` is the last successfully loaded content.
    StartLoad {
        generation: Generation,
        input: Option<I>,
        loaded: Option<O>,
    },
    /// A newer request superseded this load; its result will be discarded.
    CancelLoad { generation: Generation },
    /// Publish a new state to observers.
    StateChanged(LoadingState<O>),
    /// Publish a new value of the derived "is loading" flag.
    LoadingChanged(bool),
    /// A load succeeded with this output (emitted for empty content too).
    ContentLoaded(O),
    /// A completion arrived for a load that no longer wins.
    Discarded { generation: Generation },
}
