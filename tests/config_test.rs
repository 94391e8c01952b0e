//! Configuration loading tests
//!
//! Tests that configuration is created with defaults on first load and that
//! edited values survive a save/load cycle

use cuebind::state::config::{Config, BINDING_NAMES};
use cuebind::state::State;
use tempfile::tempdir;

#[test]
fn test_config_created_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cuebind.cfg");
    assert!(!path.exists());

    let config = Config::load_from(&path).expect("Failed to load config");
    assert!(path.exists());
    assert_eq!(config.path(), &path);

    for name in BINDING_NAMES {
        assert!(config.binding_enabled(name));
    }
    assert_eq!(config.offset_step_ms(), 100);
    assert!(!config.capture());
}

#[test]
fn test_config_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cuebind.cfg");

    let mut config = Config::load_from(&path).unwrap();
    config.set("bindings", "play", "false");
    config.set("bindings", "capture", "true");
    config.set("timeline", "offset_step_ms", "250");
    config.save().unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(!config.binding_enabled("play"));
    assert!(config.binding_enabled("copy"));
    assert!(config.capture());
    assert_eq!(config.offset_step_ms(), 250);
}

#[test]
fn test_config_reads_hand_written_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cuebind.cfg");
    std::fs::write(&path, "[timeline]\nseek_step_ms = 5000\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.seek_step_ms(), 5000);
    // Missing sections fall back to defaults
    assert!(config.binding_enabled("toggle_subtitles"));
    assert_eq!(config.offset_step_ms(), 100);
}

#[test]
fn test_offset_step_reaches_bindings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cuebind.cfg");
    std::fs::write(&path, "[timeline]\noffset_step_ms = 40\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    let state = State::new(config, vec![cuebind::timeline::Cue::new("a", 0, 100, 0)]).unwrap();
    state.dispatch(&cuebind::input::KeyEvent::down("ArrowRight").with_ctrl().with_shift());
    assert_eq!(state.player().offset(), -40);
}
