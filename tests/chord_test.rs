//! Chord matcher tests
//!
//! Tests the tap-only and hold-then-tap-digit chords against key sequences

use cuebind::input::chord::{self, MODIFIER_KEYS};
use cuebind::input::{ChordMatcher, GestureSpec, KeyEvent, Transition};

fn feed<P>(matcher: &mut ChordMatcher<P>, events: &[KeyEvent]) -> Vec<Transition<P>> {
    events.iter().map(|e| matcher.accept(e)).collect()
}

#[test]
fn test_hold_then_tap_digit_completes() {
    let mut matcher = ChordMatcher::new(chord::toggle_track_in_video().unwrap());

    assert_eq!(matcher.accept(&KeyEvent::down("w")), Transition::Advanced);
    assert_eq!(matcher.accept(&KeyEvent::down("2")), Transition::Advanced);
    assert_eq!(matcher.accept(&KeyEvent::up("2")), Transition::Complete(1));

    // Still holding W: another digit completes again
    assert_eq!(matcher.accept(&KeyEvent::down("9")), Transition::Advanced);
    assert_eq!(matcher.accept(&KeyEvent::up("9")), Transition::Complete(8));
}

#[test]
fn test_hold_key_label_case_ignored() {
    let mut matcher = ChordMatcher::new(chord::toggle_track_in_video().unwrap());

    let transitions = feed(
        &mut matcher,
        &[KeyEvent::down("W"), KeyEvent::down("1"), KeyEvent::up("1")],
    );
    assert_eq!(
        transitions,
        vec![Transition::Advanced, Transition::Advanced, Transition::Complete(0)]
    );
}

#[test]
fn test_releasing_hold_key_first_never_completes() {
    let mut matcher = ChordMatcher::new(chord::toggle_track_in_video().unwrap());

    let transitions = feed(
        &mut matcher,
        &[
            KeyEvent::down("w"),
            KeyEvent::down("3"),
            KeyEvent::up("w"),
            KeyEvent::up("3"),
        ],
    );
    assert!(!transitions.iter().any(|t| matches!(t, Transition::Complete(_))));

    // Digit alone, with the hold key already released
    let transitions = feed(&mut matcher, &[KeyEvent::down("3"), KeyEvent::up("3")]);
    assert_eq!(transitions, vec![Transition::Rejected, Transition::Rejected]);
}

#[test]
fn test_tap_only_completes_once() {
    let mut matcher = ChordMatcher::new(chord::toggle_subtitles().unwrap());

    let transitions = feed(&mut matcher, &[KeyEvent::down("s"), KeyEvent::up("s")]);
    assert_eq!(transitions, vec![Transition::Advanced, Transition::Complete(())]);
}

#[test]
fn test_tap_only_cancel_key_in_between() {
    let mut matcher = ChordMatcher::new(chord::toggle_subtitles().unwrap());

    let transitions = feed(
        &mut matcher,
        &[
            KeyEvent::down("s"),
            KeyEvent::down("Control"),
            KeyEvent::up("s"),
            KeyEvent::up("Control"),
        ],
    );
    assert_eq!(
        transitions,
        vec![
            Transition::Advanced,
            Transition::Cancelled,
            Transition::Rejected,
            Transition::Rejected
        ]
    );
    assert!(matcher.is_cancelled());
}

#[test]
fn test_terminal_press_while_holding_cancel_key_stays_cancelled() {
    let mut matcher = ChordMatcher::new(chord::toggle_subtitles().unwrap());

    let transitions = feed(
        &mut matcher,
        &[
            KeyEvent::down("Shift"),
            KeyEvent::down("S"),
            KeyEvent::up("S"),
        ],
    );
    assert_eq!(
        transitions,
        vec![Transition::Cancelled, Transition::Rejected, Transition::Rejected]
    );
}

#[test]
fn test_cancel_before_release_blocks_complete_until_reset() {
    // A cancel key pressed before any terminal release must keep every
    // release of the terminal key from completing while it stays held
    let mut matcher = ChordMatcher::new(chord::toggle_subtitles().unwrap());
    matcher.reset();

    let mut transitions = feed(&mut matcher, &[KeyEvent::down("alt")]);
    for _ in 0..3 {
        transitions.extend(feed(&mut matcher, &[KeyEvent::down("s"), KeyEvent::up("s")]));
    }
    assert!(!transitions.iter().any(|t| matches!(t, Transition::Complete(_))));

    matcher.reset();
    let transitions = feed(&mut matcher, &[KeyEvent::down("s"), KeyEvent::up("s")]);
    assert_eq!(transitions.last(), Some(&Transition::Complete(())));
}

#[test]
fn test_unrelated_key_cancels() {
    let mut matcher = ChordMatcher::new(chord::toggle_track_in_list().unwrap());

    assert_eq!(matcher.accept(&KeyEvent::down("e")), Transition::Advanced);
    assert_eq!(matcher.accept(&KeyEvent::down("x")), Transition::Cancelled);
    assert!(matcher.is_cancelled());

    // "x" is still down but is not a cancel key, so the digit re-arms the chord
    assert_eq!(matcher.accept(&KeyEvent::down("1")), Transition::Advanced);
    assert_eq!(matcher.accept(&KeyEvent::up("1")), Transition::Complete(0));
}

#[test]
fn test_pressing_hold_key_again_rearms() {
    let mut matcher = ChordMatcher::new(chord::toggle_track_in_video().unwrap());

    feed(&mut matcher, &[KeyEvent::down("w"), KeyEvent::down("x")]);
    assert!(matcher.is_cancelled());

    // Auto-repeat of the hold key clears the cancellation
    assert_eq!(matcher.accept(&KeyEvent::down("w")), Transition::Advanced);
    assert!(!matcher.is_cancelled());
}

#[test]
fn test_reset_idempotent() {
    let mut matcher = ChordMatcher::new(chord::toggle_track_in_video().unwrap());
    feed(&mut matcher, &[KeyEvent::down("w"), KeyEvent::down("control")]);

    matcher.reset();
    let held_once = matcher.held_keys().clone();
    let cancelled_once = matcher.is_cancelled();
    matcher.reset();

    assert_eq!(matcher.held_keys(), &held_once);
    assert_eq!(matcher.is_cancelled(), cancelled_once);
    assert!(held_once.is_empty());
    assert!(!cancelled_once);
}

#[test]
fn test_cancel_keys_compared_by_value() {
    // Cancel keys are checked by label, not by position in the key set, so a
    // held "control" blocks the terminal press from re-arming the chord
    let spec = GestureSpec::new(vec!["w"], vec!["1"], MODIFIER_KEYS, |_| ()).unwrap();
    let mut matcher = ChordMatcher::new(spec);

    let transitions = feed(
        &mut matcher,
        &[
            KeyEvent::down("control"),
            KeyEvent::down("w"),
            KeyEvent::down("1"),
        ],
    );
    assert_eq!(
        transitions,
        vec![Transition::Cancelled, Transition::Advanced, Transition::Rejected]
    );
}

#[test]
fn test_custom_payload() {
    let spec = GestureSpec::new(vec!["alt"], vec!["c"], Vec::<&str>::new(), |e| e.key.clone()).unwrap();
    let mut matcher = ChordMatcher::new(spec);

    matcher.accept(&KeyEvent::down("Alt"));
    matcher.accept(&KeyEvent::down("C"));
    assert_eq!(matcher.accept(&KeyEvent::up("C")), Transition::Complete("C".to_string()));
}
