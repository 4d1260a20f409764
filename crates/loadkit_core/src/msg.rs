use crate::{Generation, LoadError, ViewLifetime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<I, O> {
    /// Caller asked for a refresh, optionally with an input for the loader.
    Refresh(Option<I>),
    /// The observed view went through a lifecycle event.
    Lifetime(ViewLifetime),
    /// A loader finished the load started for `generation`.
    LoadFinished {
        generation: Generation,
        result: Result<O, LoadError>,
    },
}
