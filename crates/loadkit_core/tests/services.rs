use std::fmt;
use std::sync::Arc;

use loadkit_core::services::{
    AnalyticEvent, AnalyticSession, AnalyticsReporter, AppDependencies, CrashReporter,
    RecordingAnalytics, RecordingCrashReporter, StaticPreferences,
};

#[derive(Debug)]
struct Broken;

impl fmt::Display for Broken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("broken pipe")
    }
}

impl std::error::Error for Broken {}

#[test]
fn event_equality_ignores_user_info() {
    let plain = AnalyticEvent::new("catalog", "load", Some("page".to_string()));
    let detailed = plain.clone().with_info("page", "3");

    assert_eq!(plain, detailed);
    assert_eq!(detailed.user_info().get("page").map(String::as_str), Some("3"));
    assert_ne!(plain, AnalyticEvent::new("catalog", "load", None));
}

#[test]
fn new_session_clears_earlier_events() {
    let analytics = RecordingAnalytics::new();
    analytics.setup();
    analytics.record(AnalyticEvent::new("a", "one", None), None);
    analytics.record(AnalyticEvent::new("a", "two", None), None);

    let session = AnalyticSession {
        device_name: "test-device".to_string(),
        ..AnalyticSession::default()
    };
    analytics.record(AnalyticEvent::new("a", "three", None), Some(&session));

    let events = analytics.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, "three");
    assert_eq!(
        events[0].user_info().get("session").map(String::as_str),
        Some("test-device")
    );
}

#[test]
fn installing_reporters_runs_setup() {
    let analytics = Arc::new(RecordingAnalytics::new());
    analytics.enable(false);
    let crash = Arc::new(RecordingCrashReporter::new());
    crash.log_message("before setup");

    let _deps = AppDependencies::new()
        .with_analytics(analytics.clone())
        .with_crash_reporter(crash.clone());

    assert!(analytics.is_enabled());
    assert!(crash.messages().is_empty());
}

#[test]
fn preferences_gate_reporting() {
    let analytics = Arc::new(RecordingAnalytics::new());
    let crash = Arc::new(RecordingCrashReporter::new());
    let deps = AppDependencies::new()
        .with_analytics(analytics.clone())
        .with_crash_reporter(crash.clone())
        .with_preferences(Arc::new(StaticPreferences {
            analytics: false,
            crash_reports: true,
        }));

    assert!(!deps.record(AnalyticEvent::new("a", "b", None)));
    assert!(analytics.events().is_empty());

    assert!(deps.report_error(&Broken));
    assert_eq!(crash.errors(), vec!["broken pipe".to_string()]);
}

#[test]
fn missing_collaborators_are_skipped() {
    let deps = AppDependencies::new();
    assert!(!deps.record(AnalyticEvent::new("a", "b", None)));
    assert!(!deps.report_error(&Broken));
    assert!(deps.analytics().is_none());
}
