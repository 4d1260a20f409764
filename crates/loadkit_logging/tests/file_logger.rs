use std::fs;

use loadkit_logging::{initialize, loadkit_info, loadkit_trace, LogDestination};
use log::LevelFilter;
use tempfile::TempDir;

#[test]
fn file_destination_receives_messages_at_or_above_level() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("loadkit.log");

    assert!(initialize(LogDestination::File(path.clone()), LevelFilter::Info));
    loadkit_info!("refresh generation={}", 7);
    loadkit_trace!("below the configured level");
    log::logger().flush();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("refresh generation=7"));
    assert!(!content.contains("below the configured level"));

    // A second logger cannot be installed in the same process.
    assert!(!initialize(LogDestination::Terminal, LevelFilter::Info));
}

#[test]
fn missing_directory_fails_without_panicking() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("loadkit.log");

    assert!(!initialize(LogDestination::File(path), LevelFilter::Info));
}
