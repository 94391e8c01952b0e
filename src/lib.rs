//! cuebind - keyboard gestures for synchronized-subtitle players
//!
//! Recognizes single-key shortcuts and "hold one key, tap another" chords
//! and drives subtitle timeline navigation (adjacent-cue seeking, timing
//! offsets, track toggles) from them.

pub mod clipboard;
pub mod error;
pub mod input;
pub mod script;
pub mod state;
pub mod timeline;

pub use error::{CuebindError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "cuebind";
