//! Single-key intents
//!
//! Stateless predicates over a key-down event. Several intents share a base
//! key (left/right arrow), so lower-precedence predicates explicitly check
//! that the higher-precedence ones did not match:
//! offset step (Ctrl+Shift) > offset to adjacent cue (Ctrl or Shift) > seek.

use super::event::{codes, KeyEvent};

/// Semantic action derived from a single key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyIntent {
    // Cue actions
    Copy,
    Export,

    // Fine-grained offset
    IncreaseOffset,
    DecreaseOffset,

    // Offset that lines the adjacent cue up with the current time
    IncreaseOffsetToPreviousCue,
    DecreaseOffsetToNextCue,

    // Seeking
    SeekToPreviousCue,
    SeekToNextCue,
    SeekToCurrentCue,
    SeekBackward,
    SeekForward,

    // Playback
    Play,
}

impl KeyIntent {
    /// Every intent, in classification order
    pub const ALL: [KeyIntent; 12] = [
        KeyIntent::Copy,
        KeyIntent::Export,
        KeyIntent::IncreaseOffset,
        KeyIntent::DecreaseOffset,
        KeyIntent::IncreaseOffsetToPreviousCue,
        KeyIntent::DecreaseOffsetToNextCue,
        KeyIntent::SeekToPreviousCue,
        KeyIntent::SeekToNextCue,
        KeyIntent::SeekToCurrentCue,
        KeyIntent::SeekBackward,
        KeyIntent::SeekForward,
        KeyIntent::Play,
    ];

    /// Whether `event` represents this intent
    pub fn matches(self, event: &KeyEvent) -> bool {
        match self {
            KeyIntent::Copy => detect_copy(event),
            KeyIntent::Export => detect_export(event),
            KeyIntent::IncreaseOffset => detect_increase_offset(event),
            KeyIntent::DecreaseOffset => detect_decrease_offset(event),
            KeyIntent::IncreaseOffsetToPreviousCue => detect_increase_offset_to_previous_cue(event),
            KeyIntent::DecreaseOffsetToNextCue => detect_decrease_offset_to_next_cue(event),
            KeyIntent::SeekToPreviousCue => detect_previous_cue(event),
            KeyIntent::SeekToNextCue => detect_next_cue(event),
            KeyIntent::SeekToCurrentCue => detect_current_cue(event),
            KeyIntent::SeekBackward => detect_seek_backward(event),
            KeyIntent::SeekForward => detect_seek_forward(event),
            KeyIntent::Play => detect_play(event),
        }
    }
}

/// Classify a key-down event (key-up events never carry an intent)
pub fn classify(event: &KeyEvent) -> Option<KeyIntent> {
    if !event.is_down() {
        return None;
    }

    KeyIntent::ALL.into_iter().find(|intent| intent.matches(event))
}

fn ctrl_shift(event: &KeyEvent) -> bool {
    event.modifiers.ctrl && event.modifiers.shift
}

fn ctrl_or_shift(event: &KeyEvent) -> bool {
    event.modifiers.ctrl || event.modifiers.shift
}

/// Ctrl+Shift+A
pub fn detect_copy(event: &KeyEvent) -> bool {
    ctrl_shift(event) && event.key_code == codes::A
}

/// Ctrl+Shift+Q
pub fn detect_export(event: &KeyEvent) -> bool {
    ctrl_shift(event) && event.key_code == codes::Q
}

/// Ctrl+Shift+Left
pub fn detect_increase_offset(event: &KeyEvent) -> bool {
    ctrl_shift(event) && event.key_code == codes::ARROW_LEFT
}

/// Ctrl+Shift+Right
pub fn detect_decrease_offset(event: &KeyEvent) -> bool {
    ctrl_shift(event) && event.key_code == codes::ARROW_RIGHT
}

/// Ctrl+Left or Shift+Left
pub fn detect_increase_offset_to_previous_cue(event: &KeyEvent) -> bool {
    !detect_increase_offset(event) && ctrl_or_shift(event) && event.key_code == codes::ARROW_LEFT
}

/// Ctrl+Right or Shift+Right
pub fn detect_decrease_offset_to_next_cue(event: &KeyEvent) -> bool {
    !detect_decrease_offset(event) && ctrl_or_shift(event) && event.key_code == codes::ARROW_RIGHT
}

/// Left
pub fn detect_previous_cue(event: &KeyEvent) -> bool {
    !detect_increase_offset(event)
        && !detect_increase_offset_to_previous_cue(event)
        && event.key_code == codes::ARROW_LEFT
}

/// Right
pub fn detect_next_cue(event: &KeyEvent) -> bool {
    !detect_decrease_offset(event)
        && !detect_decrease_offset_to_next_cue(event)
        && event.key_code == codes::ARROW_RIGHT
}

/// Down
pub fn detect_current_cue(event: &KeyEvent) -> bool {
    event.key_code == codes::ARROW_DOWN
}

/// A
pub fn detect_seek_backward(event: &KeyEvent) -> bool {
    !detect_copy(event) && event.modifiers.none() && event.key_code == codes::A
}

/// D
pub fn detect_seek_forward(event: &KeyEvent) -> bool {
    event.modifiers.none() && event.key_code == codes::D
}

/// Space
pub fn detect_play(event: &KeyEvent) -> bool {
    event.key_code == codes::SPACE
}
