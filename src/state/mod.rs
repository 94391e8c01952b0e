//! Player state driven by key bindings
//!
//! `State` is a minimal host for the gesture engine: it owns the cue list
//! and playback clock, installs every binding enabled in the config and
//! applies what the bindings report (seeks, offsets, track toggles...).
//! Everything it does is recorded as a [`HostAction`] so callers can see
//! what a key sequence triggered.

pub mod config;

use crate::input::{Document, KeyBinder, KeyEvent, Subscription};
use crate::timeline::{self, Cue, Timestamp, TrackIndex};
use crate::Result;
use config::Config;
use log::{debug, info, warn};
use std::cell::{Ref, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Something the host did in response to a gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    Copied { text: String },
    Exported { cue: Option<Cue> },
    Seeked { time: Timestamp },
    OffsetChanged { offset: Timestamp },
    SubtitlesToggled { visible: bool },
    VideoTrackToggled { track: TrackIndex, visible: bool },
    ListTrackToggled { track: TrackIndex, visible: bool },
    PlayToggled { paused: bool },
    ChordAdvanced { key: String },
}

impl fmt::Display for HostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostAction::Copied { text } => write!(f, "copy {:?}", text),
            HostAction::Exported { cue: Some(cue) } => write!(f, "export {:?}", cue.text),
            HostAction::Exported { cue: None } => write!(f, "export (no cue)"),
            HostAction::Seeked { time } => write!(f, "seek {}ms", time),
            HostAction::OffsetChanged { offset } => write!(f, "offset {}ms", offset),
            HostAction::SubtitlesToggled { visible } => write!(f, "subtitles {}", on_off(*visible)),
            HostAction::VideoTrackToggled { track, visible } => {
                write!(f, "video track {} {}", track + 1, on_off(*visible))
            }
            HostAction::ListTrackToggled { track, visible } => {
                write!(f, "list track {} {}", track + 1, on_off(*visible))
            }
            HostAction::PlayToggled { paused } => {
                write!(f, "{}", if *paused { "pause" } else { "play" })
            }
            HostAction::ChordAdvanced { key } => write!(f, "chord advanced on {:?}", key),
        }
    }
}

fn on_off(visible: bool) -> &'static str {
    if visible {
        "on"
    } else {
        "off"
    }
}

/// Media and timeline state owned by the host
#[derive(Debug, Clone)]
pub struct Player {
    /// Cue list with the current offset applied
    pub cues: Vec<Cue>,

    /// Playback position
    pub time: Timestamp,

    pub paused: bool,

    pub subtitles_visible: bool,

    /// Tracks hidden in the video overlay
    pub hidden_video_tracks: BTreeSet<TrackIndex>,

    /// Tracks hidden in the cue list
    pub hidden_list_tracks: BTreeSet<TrackIndex>,

    /// Set while something modal (e.g. a dialog) owns the keyboard
    pub disabled: bool,

    /// Actions performed since the last `take_actions`
    pub actions: Vec<HostAction>,
}

impl Player {
    fn new(cues: Vec<Cue>) -> Self {
        Self {
            cues,
            time: 0,
            paused: true,
            subtitles_visible: true,
            hidden_video_tracks: BTreeSet::new(),
            hidden_list_tracks: BTreeSet::new(),
            disabled: false,
            actions: Vec::new(),
        }
    }

    /// Offset currently applied to the cue list
    pub fn offset(&self) -> Timestamp {
        timeline::current_offset(&self.cues)
    }

    fn record(&mut self, action: HostAction) {
        debug!("Host action: {}", action);
        self.actions.push(action);
    }
}

/// Toggle `track` in a hidden-set, returning whether it is now visible
fn toggle_track(hidden: &mut BTreeSet<TrackIndex>, track: TrackIndex) -> bool {
    if hidden.remove(&track) {
        true
    } else {
        hidden.insert(track);
        false
    }
}

/// Host state plus the bindings that drive it
pub struct State {
    /// Configuration the bindings were installed from
    pub config: Config,

    player: Rc<RefCell<Player>>,

    document: Document,

    subscriptions: Vec<Subscription>,
}

impl State {
    /// Create the state and install every binding enabled in `config`
    pub fn new(config: Config, cues: Vec<Cue>) -> Result<Self> {
        info!("Initializing state with {} cues", cues.len());

        let mut state = Self {
            config,
            player: Rc::new(RefCell::new(Player::new(cues))),
            document: Document::new(),
            subscriptions: Vec::new(),
        };
        state.bind()?;

        Ok(state)
    }

    /// Deliver a key event to every binding; returns whether it was handled
    pub fn dispatch(&self, event: &KeyEvent) -> bool {
        self.document.dispatch(event)
    }

    /// Move the playback clock (e.g. normal playback or a scrub)
    pub fn seek(&self, time: Timestamp) {
        self.player.borrow_mut().time = time;
    }

    /// Simulate a modal dialog taking or releasing the keyboard
    pub fn set_disabled(&self, disabled: bool) {
        debug!("Bindings {}", if disabled { "disabled" } else { "enabled" });
        self.player.borrow_mut().disabled = disabled;
    }

    /// Replace the cue list (e.g. a new subtitle file was loaded)
    pub fn set_cues(&self, cues: Vec<Cue>) {
        self.player.borrow_mut().cues = cues;
    }

    pub fn player(&self) -> Ref<'_, Player> {
        self.player.borrow()
    }

    /// Drain the recorded host actions
    pub fn take_actions(&self) -> Vec<HostAction> {
        std::mem::take(&mut self.player.borrow_mut().actions)
    }

    /// Number of listeners installed on the document
    pub fn listener_count(&self) -> usize {
        self.document.listener_count()
    }

    /// Remove every binding
    pub fn unbind(&mut self) {
        for subscription in &mut self.subscriptions {
            subscription.unbind();
        }
        self.subscriptions.clear();
    }

    /// Tear every binding down and install them again
    pub fn rebind(&mut self) -> Result<()> {
        self.unbind();
        self.bind()
    }

    fn bind(&mut self) -> Result<()> {
        let capture = self.config.capture();
        let binder = KeyBinder::new(self.document.clone()).with_offset_step(self.config.offset_step_ms());
        let enabled = |name: &str| self.config.binding_enabled(name);
        let mut subscriptions = Vec::new();

        // Chords first so their matchers see every key before single-key handlers run
        if enabled("toggle_subtitles") {
            let player = self.player.clone();
            subscriptions.push(binder.bind_toggle_subtitles(
                move |event| {
                    event.prevent_default();
                    let mut player = player.borrow_mut();
                    player.subtitles_visible = !player.subtitles_visible;
                    let visible = player.subtitles_visible;
                    player.record(HostAction::SubtitlesToggled { visible });
                },
                self.advanced_recorder(),
                self.disabled_getter(),
                capture,
            )?);
        }

        if enabled("toggle_track_in_video") {
            let player = self.player.clone();
            subscriptions.push(binder.bind_toggle_track_in_video(
                move |event, track| {
                    event.prevent_default();
                    let mut player = player.borrow_mut();
                    let visible = toggle_track(&mut player.hidden_video_tracks, track);
                    player.record(HostAction::VideoTrackToggled { track, visible });
                },
                self.advanced_recorder(),
                self.disabled_getter(),
                capture,
            )?);
        }

        if enabled("toggle_track_in_list") {
            let player = self.player.clone();
            subscriptions.push(binder.bind_toggle_track_in_list(
                move |event, track| {
                    event.prevent_default();
                    let mut player = player.borrow_mut();
                    let visible = toggle_track(&mut player.hidden_list_tracks, track);
                    player.record(HostAction::ListTrackToggled { track, visible });
                },
                self.advanced_recorder(),
                self.disabled_getter(),
                capture,
            )?);
        }

        if enabled("copy") {
            let player = self.player.clone();
            let to_clipboard = self.config.clipboard_enabled();
            subscriptions.push(binder.bind_copy(
                move |event, cue| {
                    event.prevent_default();
                    if to_clipboard {
                        if let Err(e) = crate::clipboard::copy_cue(cue) {
                            warn!("Failed to copy cue: {}", e);
                        }
                    }
                    player.borrow_mut().record(HostAction::Copied {
                        text: cue.text.clone(),
                    });
                },
                self.disabled_getter(),
                self.current_cue_getter(),
                capture,
            ));
        }

        if enabled("export") {
            let player = self.player.clone();
            let current = self.current_cue_getter();
            subscriptions.push(binder.bind_export(
                move |event| {
                    event.prevent_default();
                    let cue = current();
                    player.borrow_mut().record(HostAction::Exported { cue });
                },
                self.disabled_getter(),
                capture,
            ));
        }

        if enabled("seek_to_cue") {
            subscriptions.push(binder.bind_seek_to_cue(
                self.seek_to_cue_handler(),
                self.disabled_getter(),
                self.time_getter(),
                self.cues_getter(),
                capture,
            ));
        }

        if enabled("seek_to_current_cue") {
            subscriptions.push(binder.bind_seek_to_current_cue(
                self.seek_to_cue_handler(),
                self.disabled_getter(),
                self.time_getter(),
                self.cues_getter(),
                capture,
            ));
        }

        if enabled("seek_backward_or_forward") {
            let player = self.player.clone();
            let step = self.config.seek_step_ms();
            subscriptions.push(binder.bind_seek_backward_or_forward(
                move |event, forward| {
                    event.prevent_default();
                    let mut player = player.borrow_mut();
                    let time = if forward {
                        player.time.saturating_add(step)
                    } else {
                        player.time.saturating_sub(step).max(0)
                    };
                    player.time = time;
                    player.record(HostAction::Seeked { time });
                },
                self.disabled_getter(),
                capture,
            ));
        }

        if enabled("offset_to_cue") {
            subscriptions.push(binder.bind_offset_to_cue(
                self.offset_handler(),
                self.disabled_getter(),
                self.time_getter(),
                self.cues_getter(),
                capture,
            ));
        }

        if enabled("adjust_offset") {
            subscriptions.push(binder.bind_adjust_offset(
                self.offset_handler(),
                self.disabled_getter(),
                self.cues_getter(),
                capture,
            ));
        }

        if enabled("play") {
            let player = self.player.clone();
            subscriptions.push(binder.bind_play(
                move |event| {
                    event.prevent_default();
                    let mut player = player.borrow_mut();
                    player.paused = !player.paused;
                    let paused = player.paused;
                    player.record(HostAction::PlayToggled { paused });
                },
                self.disabled_getter(),
                capture,
            ));
        }

        info!(
            "Installed {} bindings ({} listeners, capture: {})",
            subscriptions.len(),
            self.document.listener_count(),
            capture
        );
        self.subscriptions = subscriptions;

        Ok(())
    }

    fn disabled_getter(&self) -> impl Fn() -> bool + 'static {
        let player = self.player.clone();
        move || player.borrow().disabled
    }

    fn time_getter(&self) -> impl Fn() -> Timestamp + 'static {
        let player = self.player.clone();
        move || player.borrow().time
    }

    fn cues_getter(&self) -> impl Fn() -> Vec<Cue> + 'static {
        let player = self.player.clone();
        move || player.borrow().cues.clone()
    }

    fn current_cue_getter(&self) -> impl Fn() -> Option<Cue> + 'static {
        let player = self.player.clone();
        move || {
            let player = player.borrow();
            timeline::current_cue(&player.cues, player.time).cloned()
        }
    }

    fn advanced_recorder(&self) -> impl FnMut(&KeyEvent) + 'static {
        let player = self.player.clone();
        move |event| {
            player.borrow_mut().record(HostAction::ChordAdvanced {
                key: event.normalized_key(),
            })
        }
    }

    fn seek_to_cue_handler(&self) -> impl FnMut(&KeyEvent, &Cue) + 'static {
        let player = self.player.clone();
        move |event, cue| {
            event.prevent_default();
            let mut player = player.borrow_mut();
            player.time = cue.start;
            player.record(HostAction::Seeked { time: cue.start });
        }
    }

    fn offset_handler(&self) -> impl FnMut(&KeyEvent, Timestamp) + 'static {
        let player = self.player.clone();
        move |event, offset| {
            event.prevent_default();
            let mut player = player.borrow_mut();
            player.cues = timeline::apply_offset(&player.cues, offset);
            player.record(HostAction::OffsetChanged { offset });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        let cues = vec![
            Cue::new("one", 0, 1000, 0),
            Cue::new("two", 1000, 2000, 0),
            Cue::new("three", 2000, 3000, 0),
        ];
        State::new(Config::in_memory(), cues).unwrap()
    }

    #[test]
    fn test_toggle_track() {
        let mut hidden = BTreeSet::new();
        assert!(!toggle_track(&mut hidden, 1));
        assert!(toggle_track(&mut hidden, 1));
        assert!(hidden.is_empty());
    }

    #[test]
    fn test_rebind_does_not_leak_listeners() {
        let mut state = state();
        let installed = state.listener_count();
        assert!(installed > 0);

        state.rebind().unwrap();
        state.rebind().unwrap();
        assert_eq!(state.listener_count(), installed);

        state.unbind();
        assert_eq!(state.listener_count(), 0);
    }

    #[test]
    fn test_disabled_bindings_not_installed() {
        let mut config = Config::in_memory();
        for name in config::BINDING_NAMES {
            config.set("bindings", name, "false");
        }
        config.set("bindings", "play", "true");

        let state = State::new(config, Vec::new()).unwrap();
        assert_eq!(state.listener_count(), 1);
    }
}
