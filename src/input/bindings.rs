//! Gesture bindings
//!
//! Each `bind_*` call installs listeners on a [`Document`] that turn key
//! events into application callbacks. Every binding takes a `disabled`
//! predicate that is checked on every event, getters for whatever host
//! state it needs at decision time, and a capture flag. The returned
//! [`Subscription`] removes exactly the listeners the binding added.

use super::chord::{self, ChordMatcher, GestureSpec, Transition};
use super::event::{KeyEvent, KeyEventKind};
use super::intent::{self, KeyIntent};
use super::listener::{Document, Subscription};
use crate::timeline::{self, Cue, Timestamp, TrackIndex, OFFSET_STEP_MS};
use crate::Result;
use log::{debug, trace};
use std::cell::RefCell;
use std::rc::Rc;

/// Installs gesture bindings on a document
pub struct KeyBinder {
    document: Document,
    offset_step: Timestamp,
}

impl KeyBinder {
    /// Create a binder for `document` with the default offset step
    pub fn new(document: Document) -> Self {
        Self {
            document,
            offset_step: OFFSET_STEP_MS,
        }
    }

    /// Use a different step for fine-grained offset changes
    pub fn with_offset_step(mut self, offset_step: Timestamp) -> Self {
        self.offset_step = offset_step;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn offset_step(&self) -> Timestamp {
        self.offset_step
    }

    /// Copy the current cue (Ctrl+Shift+A)
    ///
    /// Does nothing when `cue` yields no cue.
    pub fn bind_copy<F, D, G>(&self, mut on_copy: F, disabled: D, cue: G, capture: bool) -> Subscription
    where
        F: FnMut(&KeyEvent, &Cue) + 'static,
        D: Fn() -> bool + 'static,
        G: Fn() -> Option<Cue> + 'static,
    {
        self.bind_down(
            move |event| {
                if disabled() || !intent::detect_copy(event) {
                    return;
                }

                if let Some(cue) = cue() {
                    debug!("Copy cue at {}", cue.start);
                    on_copy(event, &cue);
                }
            },
            capture,
        )
    }

    /// Export the current cue to the user's collection (Ctrl+Shift+Q)
    pub fn bind_export<F, D>(&self, on_export: F, disabled: D, capture: bool) -> Subscription
    where
        F: FnMut(&KeyEvent) + 'static,
        D: Fn() -> bool + 'static,
    {
        self.bind_intent(KeyIntent::Export, on_export, disabled, capture)
    }

    /// Seek to the previous (Left) or next (Right) cue
    ///
    /// Fires only when an adjacent cue exists and sits on the playable part
    /// of the clock.
    pub fn bind_seek_to_cue<F, D, T, C>(
        &self,
        mut on_seek: F,
        disabled: D,
        time: T,
        cues: C,
        capture: bool,
    ) -> Subscription
    where
        F: FnMut(&KeyEvent, &Cue) + 'static,
        D: Fn() -> bool + 'static,
        T: Fn() -> Timestamp + 'static,
        C: Fn() -> Vec<Cue> + 'static,
    {
        self.bind_down(
            move |event| {
                if disabled() {
                    return;
                }

                let cues = cues();
                if cues.is_empty() {
                    return;
                }

                let forward = if intent::detect_previous_cue(event) {
                    false
                } else if intent::detect_next_cue(event) {
                    true
                } else {
                    return;
                };

                let now = time();
                match timeline::find_adjacent_cue(&cues, now, forward) {
                    Some(cue) if cue.is_seekable() => {
                        debug!("Seek {} from {} to cue at {}", direction(forward), now, cue.start);
                        on_seek(event, cue);
                    }
                    _ => trace!("No {} cue from {}", direction(forward), now),
                }
            },
            capture,
        )
    }

    /// Seek to the start of the cue being played (Down)
    pub fn bind_seek_to_current_cue<F, D, T, C>(
        &self,
        mut on_seek: F,
        disabled: D,
        time: T,
        cues: C,
        capture: bool,
    ) -> Subscription
    where
        F: FnMut(&KeyEvent, &Cue) + 'static,
        D: Fn() -> bool + 'static,
        T: Fn() -> Timestamp + 'static,
        C: Fn() -> Vec<Cue> + 'static,
    {
        self.bind_down(
            move |event| {
                if disabled() || !intent::detect_current_cue(event) {
                    return;
                }

                let cues = cues();
                if let Some(cue) = timeline::current_cue(&cues, time()) {
                    debug!("Seek to start of current cue at {}", cue.start);
                    on_seek(event, cue);
                }
            },
            capture,
        )
    }

    /// Fixed-step seek backward (A) or forward (D)
    pub fn bind_seek_backward_or_forward<F, D>(&self, mut on_seek: F, disabled: D, capture: bool) -> Subscription
    where
        F: FnMut(&KeyEvent, bool) + 'static,
        D: Fn() -> bool + 'static,
    {
        self.bind_down(
            move |event| {
                if disabled() {
                    return;
                }

                let forward = if intent::detect_seek_backward(event) {
                    false
                } else if intent::detect_seek_forward(event) {
                    true
                } else {
                    return;
                };

                debug!("Seek {}", direction(forward));
                on_seek(event, forward);
            },
            capture,
        )
    }

    /// Shift the offset so the previous (Ctrl/Shift+Left) or next
    /// (Ctrl/Shift+Right) cue starts now
    ///
    /// The callback receives the new offset; applying it is up to the host.
    pub fn bind_offset_to_cue<F, D, T, C>(
        &self,
        mut on_offset: F,
        disabled: D,
        time: T,
        cues: C,
        capture: bool,
    ) -> Subscription
    where
        F: FnMut(&KeyEvent, Timestamp) + 'static,
        D: Fn() -> bool + 'static,
        T: Fn() -> Timestamp + 'static,
        C: Fn() -> Vec<Cue> + 'static,
    {
        self.bind_down(
            move |event| {
                if disabled() {
                    return;
                }

                let cues = cues();
                if cues.is_empty() {
                    return;
                }

                let forward = if intent::detect_increase_offset_to_previous_cue(event) {
                    false
                } else if intent::detect_decrease_offset_to_next_cue(event) {
                    true
                } else {
                    return;
                };

                if let Some(offset) = timeline::offset_to_adjacent_cue(&cues, time(), forward) {
                    debug!("Offset to {} cue: {}ms", direction(forward), offset);
                    on_offset(event, offset);
                }
            },
            capture,
        )
    }

    /// Step the offset up (Ctrl+Shift+Left) or down (Ctrl+Shift+Right)
    pub fn bind_adjust_offset<F, D, C>(&self, mut on_offset: F, disabled: D, cues: C, capture: bool) -> Subscription
    where
        F: FnMut(&KeyEvent, Timestamp) + 'static,
        D: Fn() -> bool + 'static,
        C: Fn() -> Vec<Cue> + 'static,
    {
        let step = self.offset_step;
        self.bind_down(
            move |event| {
                if disabled() {
                    return;
                }

                let cues = cues();
                if cues.is_empty() {
                    return;
                }

                let increase = if intent::detect_decrease_offset(event) {
                    false
                } else if intent::detect_increase_offset(event) {
                    true
                } else {
                    return;
                };

                let current = timeline::current_offset(&cues);
                let offset = if increase {
                    current.saturating_add(step)
                } else {
                    current.saturating_sub(step)
                };
                debug!("Adjust offset {} -> {}ms", current, offset);
                on_offset(event, offset);
            },
            capture,
        )
    }

    /// Show or hide subtitles (tap S)
    pub fn bind_toggle_subtitles<F, A, D>(
        &self,
        mut on_toggle: F,
        on_advanced: A,
        disabled: D,
        capture: bool,
    ) -> Result<Subscription>
    where
        F: FnMut(&KeyEvent) + 'static,
        A: FnMut(&KeyEvent) + 'static,
        D: Fn() -> bool + 'static,
    {
        let spec = chord::toggle_subtitles()?;
        Ok(self.bind_chord(spec, move |event, _| on_toggle(event), on_advanced, disabled, capture))
    }

    /// Toggle a subtitle track in the video overlay (hold W, tap 1-9)
    pub fn bind_toggle_track_in_video<F, A, D>(
        &self,
        on_toggle: F,
        on_advanced: A,
        disabled: D,
        capture: bool,
    ) -> Result<Subscription>
    where
        F: FnMut(&KeyEvent, TrackIndex) + 'static,
        A: FnMut(&KeyEvent) + 'static,
        D: Fn() -> bool + 'static,
    {
        let spec = chord::toggle_track_in_video()?;
        Ok(self.bind_chord(spec, on_toggle, on_advanced, disabled, capture))
    }

    /// Toggle a subtitle track in the cue list (hold E, tap 1-9)
    pub fn bind_toggle_track_in_list<F, A, D>(
        &self,
        on_toggle: F,
        on_advanced: A,
        disabled: D,
        capture: bool,
    ) -> Result<Subscription>
    where
        F: FnMut(&KeyEvent, TrackIndex) + 'static,
        A: FnMut(&KeyEvent) + 'static,
        D: Fn() -> bool + 'static,
    {
        let spec = chord::toggle_track_in_list()?;
        Ok(self.bind_chord(spec, on_toggle, on_advanced, disabled, capture))
    }

    /// Toggle play/pause (Space)
    pub fn bind_play<F, D>(&self, on_play: F, disabled: D, capture: bool) -> Subscription
    where
        F: FnMut(&KeyEvent) + 'static,
        D: Fn() -> bool + 'static,
    {
        self.bind_intent(KeyIntent::Play, on_play, disabled, capture)
    }

    /// Bind a chord, feeding both key-down and key-up events to one matcher
    ///
    /// The matcher is reset on every event seen while disabled, so a chord
    /// started before a dialog opened can't complete after it closes.
    pub fn bind_chord<P, F, A, D>(
        &self,
        spec: GestureSpec<P>,
        mut on_complete: F,
        mut on_advanced: A,
        disabled: D,
        capture: bool,
    ) -> Subscription
    where
        P: 'static,
        F: FnMut(&KeyEvent, P) + 'static,
        A: FnMut(&KeyEvent) + 'static,
        D: Fn() -> bool + 'static,
    {
        let mut matcher = ChordMatcher::new(spec);
        let handler = Rc::new(RefCell::new(move |event: &KeyEvent| {
            if disabled() {
                matcher.reset();
                return;
            }

            match matcher.accept(event) {
                Transition::Advanced => on_advanced(event),
                Transition::Complete(payload) => {
                    debug!("Chord completed on {:?}", event.key);
                    on_complete(event, payload);
                }
                Transition::Cancelled | Transition::Rejected => {}
            }
        }));

        let down = handler.clone();
        let down_id = self
            .document
            .add_listener(KeyEventKind::Down, capture, move |event| (*down.borrow_mut())(event));
        let up_id = self
            .document
            .add_listener(KeyEventKind::Up, capture, move |event| (*handler.borrow_mut())(event));

        self.document.subscription(vec![down_id, up_id])
    }

    /// Bind a single-key intent
    pub fn bind_intent<F, D>(&self, intent: KeyIntent, mut on_match: F, disabled: D, capture: bool) -> Subscription
    where
        F: FnMut(&KeyEvent) + 'static,
        D: Fn() -> bool + 'static,
    {
        self.bind_down(
            move |event| {
                if disabled() || !intent.matches(event) {
                    return;
                }

                debug!("Intent {:?}", intent);
                on_match(event);
            },
            capture,
        )
    }

    fn bind_down<F>(&self, handler: F, capture: bool) -> Subscription
    where
        F: FnMut(&KeyEvent) + 'static,
    {
        let id = self.document.add_listener(KeyEventKind::Down, capture, handler);
        self.document.subscription(vec![id])
    }
}

fn direction(forward: bool) -> &'static str {
    if forward {
        "forward"
    } else {
        "backward"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_offset_step_configurable() {
        let binder = KeyBinder::new(Document::new()).with_offset_step(250);
        let seen = Rc::new(Cell::new(None));
        let s = seen.clone();
        let _subscription = binder.bind_adjust_offset(
            move |_, offset| s.set(Some(offset)),
            || false,
            || vec![Cue::new("a", 0, 1000, 0)],
            false,
        );

        binder
            .document()
            .dispatch(&KeyEvent::down("ArrowLeft").with_ctrl().with_shift());
        assert_eq!(seen.get(), Some(250));
    }

    #[test]
    fn test_chord_reset_while_disabled() {
        let binder = KeyBinder::new(Document::new());
        let disabled = Rc::new(Cell::new(false));
        let toggles = Rc::new(Cell::new(0));

        let d = disabled.clone();
        let t = toggles.clone();
        let _subscription = binder
            .bind_toggle_track_in_video(move |_, _| t.set(t.get() + 1), |_| {}, move || d.get(), false)
            .unwrap();

        let document = binder.document();
        document.dispatch(&KeyEvent::down("w"));
        document.dispatch(&KeyEvent::down("1"));
        disabled.set(true);
        document.dispatch(&KeyEvent::up("1"));
        disabled.set(false);
        // Matcher forgot "w" was held, so the release can't complete
        document.dispatch(&KeyEvent::down("1"));
        document.dispatch(&KeyEvent::up("1"));
        assert_eq!(toggles.get(), 0);
    }
}
