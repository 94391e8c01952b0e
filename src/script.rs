//! Replay scripts
//!
//! A script is a JSON document holding a cue list and a sequence of steps
//! (key events described with DOM field names, clock moves, and
//! enable/disable toggles) that can be replayed against a [`State`].
//!
//! ```json
//! {
//!   "cues": [{"text": "Hi", "start": 0, "end": 900, "originalStart": 0, "originalEnd": 900}],
//!   "steps": [
//!     {"type": "seek", "time": 1500},
//!     {"type": "keydown", "key": "ArrowLeft", "ctrlKey": true},
//!     {"type": "keyup", "key": "ArrowLeft"}
//!   ]
//! }
//! ```

use crate::input::{key_code_for, KeyEvent, KeyEventKind, Modifiers};
use crate::state::{HostAction, State};
use crate::timeline::{Cue, Timestamp};
use crate::{CuebindError, Result};
use log::{debug, trace};
use serde::Deserialize;
use std::path::Path;

/// Key fields as a page would report them
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInit {
    pub key: String,
    /// Inferred from `key` when omitted
    #[serde(default)]
    pub key_code: Option<u32>,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub shift_key: bool,
    #[serde(default)]
    pub alt_key: bool,
    #[serde(default)]
    pub meta_key: bool,
}

impl KeyInit {
    /// Build the event this description stands for
    pub fn to_event(&self, kind: KeyEventKind) -> KeyEvent {
        let key_code = self.key_code.unwrap_or_else(|| key_code_for(&self.key));
        KeyEvent::new(kind, self.key.clone())
            .with_key_code(key_code)
            .with_modifiers(Modifiers {
                ctrl: self.ctrl_key,
                shift: self.shift_key,
                alt: self.alt_key,
                meta: self.meta_key,
            })
    }
}

/// One scripted step
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    Keydown(KeyInit),
    Keyup(KeyInit),
    Seek { time: Timestamp },
    Disable,
    Enable,
}

/// Cue list plus the steps to replay over it
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub cues: Vec<Cue>,
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a script from JSON text
    pub fn parse(text: &str) -> Result<Self> {
        let script: Script = serde_json::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    /// Read and parse a script file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading script from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    fn validate(&self) -> Result<()> {
        for (i, step) in self.steps.iter().enumerate() {
            if let Step::Keydown(init) | Step::Keyup(init) = step {
                if init.key.is_empty() {
                    return Err(CuebindError::Script(format!("step {}: empty key", i)));
                }
            }
        }

        let shared = self.cues.first().map(Cue::offset);
        for (i, cue) in self.cues.iter().enumerate() {
            if cue.end < cue.start {
                return Err(CuebindError::Script(format!(
                    "cue {}: ends at {} before it starts at {}",
                    i, cue.end, cue.start
                )));
            }

            let end_offset = cue.end.saturating_sub(cue.original_end);
            if cue.offset() != end_offset {
                return Err(CuebindError::Script(format!(
                    "cue {}: start is shifted by {}ms but end by {}ms",
                    i,
                    cue.offset(),
                    end_offset
                )));
            }

            // The whole list carries a single offset
            if Some(cue.offset()) != shared {
                return Err(CuebindError::Script(format!(
                    "cue {}: offset {}ms differs from the list offset {}ms",
                    i,
                    cue.offset(),
                    shared.unwrap_or(0)
                )));
            }
        }

        Ok(())
    }

    /// Run every step against `state`, returning the actions each one caused
    pub fn replay(&self, state: &State) -> Vec<(usize, HostAction)> {
        let mut actions = Vec::new();

        for (i, step) in self.steps.iter().enumerate() {
            trace!("Step {}: {:?}", i, step);
            match step {
                Step::Keydown(init) => {
                    state.dispatch(&init.to_event(KeyEventKind::Down));
                }
                Step::Keyup(init) => {
                    state.dispatch(&init.to_event(KeyEventKind::Up));
                }
                Step::Seek { time } => state.seek(*time),
                Step::Disable => state.set_disabled(true),
                Step::Enable => state.set_disabled(false),
            }

            actions.extend(state.take_actions().into_iter().map(|action| (i, action)));
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let script = Script::parse(
            r#"{
                "cues": [{"text": "a", "start": 0, "end": 10, "originalStart": 0, "originalEnd": 10}],
                "steps": [
                    {"type": "keydown", "key": "ArrowLeft", "ctrlKey": true},
                    {"type": "keyup", "key": "x", "keyCode": 88},
                    {"type": "seek", "time": 5},
                    {"type": "disable"},
                    {"type": "enable"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.cues.len(), 1);
        assert_eq!(script.cues[0].track, 0);
        assert_eq!(script.steps.len(), 5);

        match &script.steps[0] {
            Step::Keydown(init) => {
                let event = init.to_event(KeyEventKind::Down);
                assert_eq!(event.key_code, 37);
                assert!(event.modifiers.ctrl);
                assert!(!event.modifiers.shift);
            }
            other => panic!("unexpected step {:?}", other),
        }
        assert!(matches!(script.steps[2], Step::Seek { time: 5 }));
    }

    #[test]
    fn test_rejects_backwards_cue() {
        let result = Script::parse(
            r#"{"cues": [{"text": "a", "start": 10, "end": 0, "originalStart": 10, "originalEnd": 0}], "steps": []}"#,
        );
        assert!(matches!(result, Err(CuebindError::Script(_))));
    }

    #[test]
    fn test_rejects_mixed_offsets() {
        let result = Script::parse(
            r#"{"cues": [
                {"text": "a", "start": 100, "end": 200, "originalStart": 0, "originalEnd": 100},
                {"text": "b", "start": 300, "end": 400, "originalStart": 300, "originalEnd": 400}
            ], "steps": []}"#,
        );
        assert!(matches!(result, Err(CuebindError::Script(_))));
    }

    #[test]
    fn test_rejects_uneven_cue_shift() {
        let result = Script::parse(
            r#"{"cues": [{"text": "a", "start": 100, "end": 250, "originalStart": 0, "originalEnd": 100}], "steps": []}"#,
        );
        assert!(matches!(result, Err(CuebindError::Script(_))));
    }

    #[test]
    fn test_accepts_shared_offset() {
        let script = Script::parse(
            r#"{"cues": [
                {"text": "a", "start": 100, "end": 200, "originalStart": 0, "originalEnd": 100},
                {"text": "b", "start": 400, "end": 500, "originalStart": 300, "originalEnd": 400}
            ], "steps": []}"#,
        )
        .unwrap();
        assert_eq!(crate::timeline::current_offset(&script.cues), 100);
    }

    #[test]
    fn test_replay_extreme_seek() {
        let script = Script::parse(
            r#"{
                "cues": [{"text": "a", "start": 1, "end": 2, "originalStart": 1, "originalEnd": 2}],
                "steps": [
                    {"type": "seek", "time": -9223372036854775808},
                    {"type": "keydown", "key": "ArrowRight"},
                    {"type": "keydown", "key": "ArrowRight", "shiftKey": true},
                    {"type": "keydown", "key": "a"}
                ]
            }"#,
        )
        .unwrap();
        let state = State::new(crate::state::config::Config::in_memory(), script.cues.clone()).unwrap();

        let actions = script.replay(&state);
        assert!(actions.contains(&(1, HostAction::Seeked { time: 1 })));
        assert!(actions.contains(&(3, HostAction::Seeked { time: 0 })));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(Script::parse("{"), Err(CuebindError::Json(_))));
    }
}
