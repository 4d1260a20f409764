//! Collaborator interfaces for analytics, crash reporting and user
//! preferences, plus the context object that carries them.
//!
//! Implementations live with the application; the recording variants here
//! back tests and demos.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A single analytics event. Equality ignores `user_info`.
#[derive(Debug, Clone)]
pub struct AnalyticEvent {
    pub category: String,
    pub action: String,
    pub label: Option<String>,
    user_info: BTreeMap<String, String>,
}

impl AnalyticEvent {
    pub fn new(
        category: impl Into<String>,
        action: impl Into<String>,
        label: Option<String>,
    ) -> Self {
        Self {
            category: category.into(),
            action: action.into(),
            label,
            user_info: BTreeMap::new(),
        }
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_info(key, value);
        self
    }

    pub fn add_info(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.user_info.insert(key.into(), value.into());
    }

    pub fn set_user_info(&mut self, info: BTreeMap<String, String>) {
        self.user_info = info;
    }

    pub fn user_info(&self) -> &BTreeMap<String, String> {
        &self.user_info
    }
}

impl PartialEq for AnalyticEvent {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.action == other.action && self.label == other.label
    }
}

impl Eq for AnalyticEvent {}

impl fmt::Display for AnalyticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Analytic: {} - {} - {:?}, UserInfo: {:?}>",
            self.category, self.action, self.label, self.user_info
        )
    }
}

/// Configuration that applies to every event in an analytics session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalyticSession {
    pub device_name: String,
    pub custom_dimensions: BTreeMap<u32, String>,
}

pub trait AnalyticsReporter: Send + Sync {
    /// Called once when the reporter is installed.
    fn setup(&self);

    fn enable(&self, enabled: bool);

    /// Records `event`. A `Some` session closes any open session and starts
    /// a new one with that configuration.
    fn record(&self, event: AnalyticEvent, new_session: Option<&AnalyticSession>);
}

pub trait CrashReporter: Send + Sync {
    /// Called once when the reporter is installed.
    fn setup(&self);

    /// Appends a breadcrumb to any upcoming crash report.
    fn log_message(&self, message: &str);

    /// Reports a non-fatal error.
    fn log_error(&self, error: &(dyn StdError + 'static));
}

pub trait PreferencesInteractor: Send + Sync {
    fn can_send_analytics(&self) -> bool;

    fn can_send_crash_reports(&self) -> bool;
}

/// Explicitly constructed service context, passed to whoever needs it.
#[derive(Clone, Default)]
pub struct AppDependencies {
    analytics: Option<Arc<dyn AnalyticsReporter>>,
    crash_reporter: Option<Arc<dyn CrashReporter>>,
    preferences: Option<Arc<dyn PreferencesInteractor>>,
}

impl AppDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the reporter and runs its `setup`.
    pub fn with_analytics(mut self, reporter: Arc<dyn AnalyticsReporter>) -> Self {
        reporter.setup();
        self.analytics = Some(reporter);
        self
    }

    /// Installs the reporter and runs its `setup`.
    pub fn with_crash_reporter(mut self, reporter: Arc<dyn CrashReporter>) -> Self {
        reporter.setup();
        self.crash_reporter = Some(reporter);
        self
    }

    pub fn with_preferences(mut self, preferences: Arc<dyn PreferencesInteractor>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn analytics(&self) -> Option<&Arc<dyn AnalyticsReporter>> {
        self.analytics.as_ref()
    }

    pub fn crash_reporter(&self) -> Option<&Arc<dyn CrashReporter>> {
        self.crash_reporter.as_ref()
    }

    pub fn preferences(&self) -> Option<&Arc<dyn PreferencesInteractor>> {
        self.preferences.as_ref()
    }

    /// Records `event` when a reporter is installed and preferences allow it.
    /// Without preferences, sending is allowed.
    pub fn record(&self, event: AnalyticEvent) -> bool {
        let allowed = self
            .preferences
            .as_ref()
            .is_none_or(|prefs| prefs.can_send_analytics());
        match &self.analytics {
            Some(reporter) if allowed => {
                reporter.record(event, None);
                true
            }
            _ => false,
        }
    }

    /// Reports `error` when a crash reporter is installed and preferences
    /// allow it.
    pub fn report_error(&self, error: &(dyn StdError + 'static)) -> bool {
        let allowed = self
            .preferences
            .as_ref()
            .is_none_or(|prefs| prefs.can_send_crash_reports());
        match &self.crash_reporter {
            Some(reporter) if allowed => {
                reporter.log_error(error);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for AppDependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppDependencies")
            .field("analytics", &self.analytics.is_some())
            .field("crash_reporter", &self.crash_reporter.is_some())
            .field("preferences", &self.preferences.is_some())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps every recorded event in memory.
#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticEvent>>,
    enabled: Mutex<bool>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticEvent> {
        lock(&self.events).clone()
    }

    pub fn is_enabled(&self) -> bool {
        *lock(&self.enabled)
    }
}

impl AnalyticsReporter for RecordingAnalytics {
    fn setup(&self) {
        lock(&self.events).clear();
        *lock(&self.enabled) = true;
    }

    fn enable(&self, enabled: bool) {
        *lock(&self.enabled) = enabled;
    }

    fn record(&self, mut event: AnalyticEvent, new_session: Option<&AnalyticSession>) {
        let mut events = lock(&self.events);
        if let Some(session) = new_session {
            events.clear();
            event.add_info("session", session.device_name.clone());
        }
        events.push(event);
    }
}

/// Keeps breadcrumbs and non-fatal errors in memory.
#[derive(Debug, Default)]
pub struct RecordingCrashReporter {
    messages: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingCrashReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    /// Rendered messages of the reported errors.
    pub fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }
}

impl CrashReporter for RecordingCrashReporter {
    fn setup(&self) {
        lock(&self.messages).clear();
    }

    fn log_message(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }

    fn log_error(&self, error: &(dyn StdError + 'static)) {
        lock(&self.errors).push(error.to_string());
    }
}

/// Fixed answers for both permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticPreferences {
    pub analytics: bool,
    pub crash_reports: bool,
}

impl Default for StaticPreferences {
    fn default() -> Self {
        Self {
            analytics: true,
            crash_reports: true,
        }
    }
}

impl PreferencesInteractor for StaticPreferences {
    fn can_send_analytics(&self) -> bool {
        self.analytics
    }

    fn can_send_crash_reports(&self) -> bool {
        self.crash_reports
    }
}
