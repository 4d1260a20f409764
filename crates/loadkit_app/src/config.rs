//! Demo configuration, read from a RON file.
//!
//! Every field has a default, so a partial file (or none at all) is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use loadkit_core::{ConfigError, FlattenStrategy, LoaderOptions, PageSize, ViewLifetime};
use loadkit_engine::PagingSettings;
use loadkit_logging::LogDestination;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "loadkit.ron";

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Lifecycle event that starts loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    DidLoad,
    WillAppear,
    DidAppear,
    WillDisappear,
    DidDisappear,
}

impl From<Trigger> for ViewLifetime {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::DidLoad => ViewLifetime::DidLoad,
            Trigger::WillAppear => ViewLifetime::WillAppear,
            Trigger::DidAppear => ViewLifetime::DidAppear,
            Trigger::WillDisappear => ViewLifetime::WillDisappear,
            Trigger::DidDisappear => ViewLifetime::DidDisappear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Latest,
    Concat,
}

impl From<Strategy> for FlattenStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Latest => FlattenStrategy::Latest,
            Strategy::Concat => FlattenStrategy::Concat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    Terminal,
    File(PathBuf),
    Both(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub page_size: usize,
    /// `None` loads on start instead of waiting for a lifecycle event.
    pub trigger: Option<Trigger>,
    pub strategy: Strategy,
    /// Number of articles in the simulated catalogue.
    pub catalogue_size: usize,
    /// Simulated latency of each page fetch.
    pub latency_ms: u64,
    pub log: LogTarget,
    pub verbose: bool,
    pub send_analytics: bool,
    pub send_crash_reports: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            page_size: loadkit_core::DEFAULT_PAGE_SIZE,
            trigger: Some(Trigger::WillAppear),
            strategy: Strategy::Latest,
            catalogue_size: 60,
            latency_ms: 150,
            log: LogTarget::Terminal,
            verbose: false,
            send_analytics: true,
            send_crash_reports: true,
        }
    }
}

impl DemoConfig {
    pub fn paging_settings(&self) -> Result<PagingSettings, ConfigError> {
        Ok(PagingSettings {
            page_size: PageSize::new(self.page_size)?,
            options: LoaderOptions::default()
                .with_trigger(self.trigger.map(ViewLifetime::from))
                .with_strategy(self.strategy.into()),
        })
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File(path) => LogDestination::File(path.clone()),
            LogTarget::Both(path) => LogDestination::Both(path.clone()),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

/// Reads the configuration at `path`. A missing file yields the defaults;
/// an unreadable, malformed or invalid one is an error.
pub fn load(path: &Path) -> Result<DemoConfig, ConfigFileError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(DemoConfig::default()),
        Err(source) => {
            return Err(ConfigFileError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: DemoConfig = ron::from_str(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.paging_settings()?;
    Ok(config)
}
