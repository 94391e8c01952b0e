//! Keyboard input: events, intents, chords and bindings
//!
//! Single-key shortcuts are classified by [`intent`]; multi-key chords run
//! through a per-binding [`chord::ChordMatcher`]. [`bindings::KeyBinder`]
//! wires both to application callbacks through listeners on a
//! [`listener::Document`].

pub mod bindings;
pub mod chord;
pub mod event;
pub mod intent;
pub mod listener;

pub use bindings::KeyBinder;
pub use chord::{ChordMatcher, GestureSpec, Transition};
pub use event::{key_code_for, KeyEvent, KeyEventKind, Modifiers};
pub use intent::{classify, KeyIntent};
pub use listener::{Document, ListenerId, Subscription};
