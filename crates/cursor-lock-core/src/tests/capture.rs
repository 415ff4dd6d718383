use crate::{
    CaptureOutcome, HotkeyCapture, KeyEvent, KeyHandler, StartOutcome,
    tests::fakes::FakeKeyboard,
};

use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Capture wired to a fake keyboard whose handler feeds events straight back in.
struct Harness {
    keyboard: Arc<FakeKeyboard>,
    capture: Arc<HotkeyCapture>,
    outcomes: Arc<Mutex<Vec<CaptureOutcome>>>,
}

impl Harness {
    fn new() -> Self {
        let keyboard = Arc::new(FakeKeyboard::default());
        Self {
            capture: Arc::new(HotkeyCapture::new(keyboard.clone())),
            keyboard,
            outcomes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn start(&self) -> StartOutcome {
        let capture = Arc::downgrade(&self.capture);
        let outcomes = Arc::clone(&self.outcomes);
        self.capture
            .start_recording(move |session_id| -> KeyHandler {
                Arc::new(move |event| {
                    if let Some(capture) = capture.upgrade() {
                        if let Some(outcome) = capture.handle_key_event(session_id, event) {
                            outcomes.lock().unwrap_or_else(|e| e.into_inner()).push(outcome);
                        }
                    }
                })
            })
            .unwrap_or(StartOutcome::AlreadyRecording)
    }

    fn outcomes(&self) -> Vec<CaptureOutcome> {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// WHAT: ctrl, alt, l held then l released records alt+ctrl+l
/// WHY: Release-to-commit with sorted canonical join
#[test]
fn given_three_keys_down_when_first_released_then_sorted_binding_recorded() {
    // Given: A running recording
    let harness = Harness::new();
    assert!(matches!(harness.start(), StartOutcome::Started { .. }));

    // When: Pressing ctrl, alt, l and releasing l
    harness.keyboard.down("ctrl");
    harness.keyboard.down("alt");
    harness.keyboard.down("l");
    harness.keyboard.up("l");

    // Then: The binding is the sorted join and the hook is gone
    let outcomes = harness.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(&outcomes[0], CaptureOutcome::Recorded(b) if b.as_str() == "alt+ctrl+l"));
    assert!(!harness.capture.is_recording());
    assert_eq!(harness.keyboard.installed(), 0);
    assert_eq!(harness.keyboard.uninstalls(), 1);
}

/// WHAT: The first release ends recording even with other keys still held
/// WHY: Release-to-commit must be reproduced exactly
#[test]
fn given_keys_held_when_modifier_released_first_then_recording_finishes() {
    // Given: ctrl and k held
    let harness = Harness::new();
    harness.start();
    harness.keyboard.down("left ctrl");
    harness.keyboard.down("k");

    // When: Releasing ctrl (k still held) and then k
    harness.keyboard.up("left ctrl");
    harness.keyboard.up("k");

    // Then: Exactly one outcome, from the first release
    let outcomes = harness.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(&outcomes[0], CaptureOutcome::Recorded(b) if b.as_str() == "ctrl+k"));
}

/// WHAT: A key-up with no prior key-down reports no keys recorded
/// WHY: Releasing faster than any down event yields an empty binding
#[test]
fn given_no_key_down_when_key_released_then_no_keys_recorded() {
    // Given: A running recording
    let harness = Harness::new();
    harness.start();

    // When: A release arrives first
    harness.keyboard.up("enter");

    // Then: Empty outcome, session closed, hook removed once
    assert_eq!(harness.outcomes(), vec![CaptureOutcome::NoKeysRecorded]);
    assert!(!harness.capture.is_recording());
    assert_eq!(harness.keyboard.uninstalls(), 1);
}

/// WHAT: Starting while already recording changes nothing
/// WHY: Re-entrancy guard; only one observer may be installed
#[test]
fn given_recording_when_starting_again_then_no_second_observer() {
    // Given: A running recording with one key seen
    let harness = Harness::new();
    harness.start();
    harness.keyboard.down("shift");

    // When: Starting again
    let outcome = harness.start();

    // Then: No-op
    assert_eq!(outcome, StartOutcome::AlreadyRecording);
    assert_eq!(harness.keyboard.installs(), 1);
    assert!(harness.capture.is_recording());

    // And: The first session's keys survived
    harness.keyboard.down("f9");
    harness.keyboard.up("f9");
    assert!(matches!(&harness.outcomes()[0], CaptureOutcome::Recorded(b) if b.as_str() == "f9+shift"));
}

/// WHAT: Repeated key-downs are idempotent
/// WHY: Auto-repeat delivers many downs for one held key
#[test]
fn given_auto_repeat_when_recording_then_key_recorded_once() {
    // Given: A running recording
    let harness = Harness::new();
    harness.start();

    // When: The same key repeats
    for _ in 0..5 {
        harness.keyboard.down("a");
    }
    harness.keyboard.up("a");

    // Then: Single key binding
    assert!(matches!(&harness.outcomes()[0], CaptureOutcome::Recorded(b) if b.as_str() == "a"));
}

/// WHAT: Events for an old session id are ignored
/// WHY: Late events from a previous observer must not leak into a new session
#[test]
fn given_stale_session_id_when_event_arrives_then_ignored() {
    // Given: A running recording
    let harness = Harness::new();
    harness.start();

    // When: An event carries an unknown session id
    let outcome = harness
        .capture
        .handle_key_event(Uuid::new_v4(), KeyEvent::Up("x".to_string()));

    // Then: Ignored, still recording
    assert_eq!(outcome, None);
    assert!(harness.capture.is_recording());
}

/// WHAT: Abandoning uninstalls the observer exactly once
/// WHY: Shutdown may happen mid-recording; double uninstall must be guarded
#[test]
fn given_recording_when_abandoned_twice_then_uninstalled_once() {
    // Given: A running recording
    let harness = Harness::new();
    harness.start();

    // When: Abandoning twice
    let first = harness.capture.abandon();
    let second = harness.capture.abandon();

    // Then: Only the first did anything
    assert!(first);
    assert!(!second);
    assert_eq!(harness.keyboard.uninstalls(), 1);
    assert!(harness.outcomes().is_empty());
}

/// WHAT: A failing hook install leaves the subsystem idle
/// WHY: Install failure must not strand a half-started session
#[test]
fn given_hook_install_fails_when_starting_then_error_and_idle() {
    // Given: A keyboard that refuses hooks
    let harness = Harness::new();
    harness.keyboard.state.lock().unwrap_or_else(|e| e.into_inner()).fail_install = true;

    // When: Starting
    let result = harness.capture.start_recording(|_| -> KeyHandler { Arc::new(|_: KeyEvent| {}) });

    // Then: Error, not recording
    assert!(result.is_err());
    assert!(!harness.capture.is_recording());
}
