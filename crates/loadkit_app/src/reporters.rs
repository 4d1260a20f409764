//! Collaborators backed by the log, wired into the dependency context.

use std::error::Error as StdError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use loadkit_core::services::{
    AnalyticEvent, AnalyticSession, AnalyticsReporter, AppDependencies, CrashReporter,
    PreferencesInteractor,
};
use loadkit_logging::{loadkit_debug, loadkit_error, loadkit_info, loadkit_warn};

use crate::config::DemoConfig;

/// Writes analytics events to the log while enabled.
#[derive(Debug)]
pub struct LogAnalytics {
    enabled: AtomicBool,
}

impl LogAnalytics {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }
}

impl Default for LogAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsReporter for LogAnalytics {
    fn setup(&self) {
        loadkit_debug!("analytics ready");
    }

    fn enable(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn record(&self, event: AnalyticEvent, new_session: Option<&AnalyticSession>) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }
        if let Some(session) = new_session {
            loadkit_info!("analytics session on {}", session.device_name);
        }
        loadkit_info!("analytics: {} {:?}", event, event.user_info());
    }
}

#[derive(Debug, Default)]
pub struct LogCrashReporter;

impl CrashReporter for LogCrashReporter {
    fn setup(&self) {
        loadkit_debug!("crash reporting ready");
    }

    fn log_message(&self, message: &str) {
        loadkit_warn!("crash log: {}", message);
    }

    fn log_error(&self, error: &(dyn StdError + 'static)) {
        loadkit_error!("crash report: {}", error);
        let mut source = error.source();
        while let Some(cause) = source {
            loadkit_error!("  caused by: {}", cause);
            source = cause.source();
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConfiguredPreferences {
    analytics: bool,
    crash_reports: bool,
}

impl PreferencesInteractor for ConfiguredPreferences {
    fn can_send_analytics(&self) -> bool {
        self.analytics
    }

    fn can_send_crash_reports(&self) -> bool {
        self.crash_reports
    }
}

pub fn dependencies(config: &DemoConfig) -> AppDependencies {
    AppDependencies::new()
        .with_preferences(Arc::new(ConfiguredPreferences {
            analytics: config.send_analytics,
            crash_reports: config.send_crash_reports,
        }))
        .with_analytics(Arc::new(LogAnalytics::new()))
        .with_crash_reporter(Arc::new(LogCrashReporter))
}
