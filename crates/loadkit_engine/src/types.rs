use loadkit_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("content loader has shut down")]
    LoaderClosed,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
