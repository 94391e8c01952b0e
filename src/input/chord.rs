//! Multi-key chords ("hold X, tap Y")
//!
//! A [`ChordMatcher`] consumes key-down/key-up events for one bound gesture
//! and reports how the gesture progressed. Chord definitions are fixed when
//! the matcher is built.

use super::event::{KeyEvent, KeyEventKind};
use crate::timeline::TrackIndex;
use crate::{CuebindError, Result};
use log::trace;
use std::collections::HashSet;
use std::fmt;

/// Modifier key labels, lower case
pub const MODIFIER_KEYS: [&str; 4] = ["control", "shift", "alt", "meta"];

/// Digit keys that select a track
pub const DIGIT_KEYS: [&str; 9] = ["1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Result of feeding one event to a chord matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<P> {
    /// Event did not move the gesture
    Rejected,
    /// Gesture aborted; it will not complete until re-armed
    Cancelled,
    /// Gesture progressed (hold key pressed, or terminal key pressed while armed)
    Advanced,
    /// Terminal key released with every hold key down
    Complete(P),
}

/// Immutable chord definition
///
/// Hold keys must be down for the chord to be armed, releasing a terminal key
/// completes it and pressing a cancel key aborts it. All labels are stored
/// lower case.
pub struct GestureSpec<P> {
    hold_keys: HashSet<String>,
    terminal_keys: HashSet<String>,
    cancel_keys: HashSet<String>,
    extract: fn(&KeyEvent) -> P,
}

fn key_set<I, S>(keys: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter().map(|k| k.as_ref().to_lowercase()).collect()
}

impl<P> GestureSpec<P> {
    /// Build a chord definition
    ///
    /// Fails when a key is both a hold key and a terminal key.
    pub fn new<H, T, C, S>(hold: H, terminal: T, cancel: C, extract: fn(&KeyEvent) -> P) -> Result<Self>
    where
        H: IntoIterator<Item = S>,
        T: IntoIterator<Item = S>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hold_keys = key_set(hold);
        let terminal_keys = key_set(terminal);

        let mut overlap: Vec<&String> = hold_keys.intersection(&terminal_keys).collect();
        if !overlap.is_empty() {
            overlap.sort();
            return Err(CuebindError::Gesture(format!(
                "keys {:?} are both hold and terminal keys",
                overlap
            )));
        }

        if terminal_keys.is_empty() {
            return Err(CuebindError::Gesture("no terminal key".to_string()));
        }

        Ok(Self {
            hold_keys,
            terminal_keys,
            cancel_keys: key_set(cancel),
            extract,
        })
    }

    pub fn hold_keys(&self) -> &HashSet<String> {
        &self.hold_keys
    }

    pub fn terminal_keys(&self) -> &HashSet<String> {
        &self.terminal_keys
    }

    pub fn cancel_keys(&self) -> &HashSet<String> {
        &self.cancel_keys
    }
}

impl GestureSpec<()> {
    /// Press and release `terminal` with no cancel key pressed in between
    pub fn tap_only(terminal: &str, cancel: &[&str]) -> Result<Self> {
        Self::new(Vec::<&str>::new(), vec![terminal], cancel.iter().copied(), |_| ())
    }
}

impl GestureSpec<TrackIndex> {
    /// Hold `hold` and tap a digit 1-9; completes with the zero-based digit
    pub fn hold_then_tap_digit(hold: &str, cancel: &[&str]) -> Result<Self> {
        Self::new(vec![hold], DIGIT_KEYS, cancel.iter().copied(), digit_index)
    }
}

fn digit_index(event: &KeyEvent) -> TrackIndex {
    event
        .key
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|d| (d as TrackIndex).saturating_sub(1))
        .unwrap_or(0)
}

impl<P> fmt::Debug for GestureSpec<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureSpec")
            .field("hold_keys", &self.hold_keys)
            .field("terminal_keys", &self.terminal_keys)
            .field("cancel_keys", &self.cancel_keys)
            .finish()
    }
}

/// Tap S to show or hide subtitles
pub fn toggle_subtitles() -> Result<GestureSpec<()>> {
    GestureSpec::tap_only("s", &MODIFIER_KEYS)
}

/// Hold W and tap 1-9 to toggle a subtitle track in the video overlay
pub fn toggle_track_in_video() -> Result<GestureSpec<TrackIndex>> {
    GestureSpec::hold_then_tap_digit("w", &MODIFIER_KEYS)
}

/// Hold E and tap 1-9 to toggle a subtitle track in the cue list
pub fn toggle_track_in_list() -> Result<GestureSpec<TrackIndex>> {
    GestureSpec::hold_then_tap_digit("e", &MODIFIER_KEYS)
}

/// Per-binding chord state machine
#[derive(Debug)]
pub struct ChordMatcher<P> {
    spec: GestureSpec<P>,
    /// Every key currently down, not only this chord's keys
    currently_held: HashSet<String>,
    cancelled: bool,
}

impl<P> ChordMatcher<P> {
    pub fn new(spec: GestureSpec<P>) -> Self {
        Self {
            spec,
            currently_held: HashSet::new(),
            cancelled: false,
        }
    }

    pub fn spec(&self) -> &GestureSpec<P> {
        &self.spec
    }

    /// Forget held keys and any cancellation
    pub fn reset(&mut self) {
        self.currently_held.clear();
        self.cancelled = false;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn held_keys(&self) -> &HashSet<String> {
        &self.currently_held
    }

    /// Feed one event and report the transition
    pub fn accept(&mut self, event: &KeyEvent) -> Transition<P> {
        let key = event.normalized_key();
        let transition = match event.kind {
            KeyEventKind::Down => self.key_down(key),
            KeyEventKind::Up => self.key_up(key, event),
        };
        trace!("Chord {:?} {:?}: {}", event.kind, event.key, transition_name(&transition));
        transition
    }

    fn key_down(&mut self, key: String) -> Transition<P> {
        self.currently_held.insert(key.clone());

        let mut result = Transition::Rejected;
        let is_terminal = self.spec.terminal_keys.contains(&key);

        if self.spec.hold_keys.contains(&key) {
            self.cancelled = false;
            result = Transition::Advanced;
        } else if !is_terminal {
            // Unrelated keystrokes abort the chord
            self.cancelled = true;
            result = Transition::Cancelled;
        }

        if self.spec.cancel_keys.contains(&key) {
            self.cancelled = true;
            result = Transition::Cancelled;
        }

        if is_terminal && self.holding_all() && !self.holding_cancel_key() {
            self.cancelled = false;
            result = Transition::Advanced;
        }

        result
    }

    fn key_up(&mut self, key: String, event: &KeyEvent) -> Transition<P> {
        self.currently_held.remove(&key);

        if self.spec.terminal_keys.contains(&key) && self.holding_all() && !self.cancelled {
            return Transition::Complete((self.spec.extract)(event));
        }

        Transition::Rejected
    }

    fn holding_all(&self) -> bool {
        self.spec
            .hold_keys
            .iter()
            .all(|k| self.currently_held.contains(k))
    }

    /// Compares held keys against cancel keys by value
    fn holding_cancel_key(&self) -> bool {
        self.currently_held
            .iter()
            .any(|k| self.spec.cancel_keys.contains(k))
    }
}

fn transition_name<P>(transition: &Transition<P>) -> &'static str {
    match transition {
        Transition::Rejected => "rejected",
        Transition::Cancelled => "cancelled",
        Transition::Advanced => "advanced",
        Transition::Complete(_) => "complete",
    }
}
