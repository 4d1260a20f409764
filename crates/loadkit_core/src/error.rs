use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Shared, cloneable cause carried by [`LoadError::LoadFailure`].
pub type LoadCause = Arc<dyn StdError + Send + Sync + 'static>;

/// The single error kind surfaced by a load.
///
/// The cause is whatever the injected loader failed with; it is not
/// interpreted or classified here.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("load failed: {0}")]
    LoadFailure(#[source] LoadCause),
}

impl LoadError {
    pub fn failure<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::LoadFailure(Arc::new(cause))
    }

    /// Failure with a plain message as its cause.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::failure(MessageCause(message.into()))
    }

    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match self {
            Self::LoadFailure(cause) => &**cause,
        }
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let cause: &(dyn StdError + 'static) = self.cause();
        cause.downcast_ref::<E>()
    }
}

// Causes are opaque, so two failures are equal when they share the cause or
// render identically.
impl PartialEq for LoadError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::LoadFailure(a), Self::LoadFailure(b)) => {
                Arc::ptr_eq(a, b) || a.to_string() == b.to_string()
            }
        }
    }
}

impl Eq for LoadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MessageCause(String);

impl fmt::Display for MessageCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for MessageCause {}

/// Invalid configuration; raised when the configuration is applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
