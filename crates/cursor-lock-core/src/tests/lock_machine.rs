use crate::{
    LockMachine, LockPhase, LockTiming, Rect, ToggleOutcome,
    tests::fakes::{
        Fakes, FakeWindows, MAIN_RECT, MAIN_WINDOW, OTHER_WINDOW, fast_timing, wait_until,
    },
};

use std::time::Duration;

fn machine(fakes: &Fakes, timing: LockTiming) -> LockMachine {
    LockMachine::new(
        fakes.windows.clone(),
        fakes.clamp.clone(),
        fakes.notifier.clone(),
        timing,
    )
}

/// WHAT: Toggling with no foreground window leaves the state untouched
/// WHY: Precondition failures must not start a clamp loop
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_foreground_window_when_toggling_then_state_unchanged() {
    // Given: A desktop with no foreground window
    let fakes = Fakes::with_windows(FakeWindows::default());
    let machine = machine(&fakes, fast_timing());
    let before = machine.snapshot();

    // When: Toggling
    let outcome = machine.toggle().unwrap();

    // Then: Nothing changed and nothing was clamped
    assert_eq!(outcome, ToggleOutcome::NoActiveWindow);
    assert_eq!(machine.snapshot(), before);
    assert_eq!(before.phase, LockPhase::Unlocked);
    assert_eq!(fakes.clamp.confine_calls(), 0);
}

/// WHAT: A minimized-size foreground window is not locked
/// WHY: Degenerate rectangles are a precondition failure
#[test]
#[allow(clippy::unwrap_used)]
fn given_degenerate_window_when_toggling_then_nothing_started() {
    // Given: A 5x5 foreground window
    let fakes = Fakes::with_windows(FakeWindows::with_foreground(
        MAIN_WINDOW,
        Rect::new(0, 0, 5, 5),
    ));
    let machine = machine(&fakes, fast_timing());

    // When: Toggling
    let outcome = machine.toggle().unwrap();

    // Then: Rejected, still unlocked
    assert_eq!(
        outcome,
        ToggleOutcome::DegenerateWindow {
            width: 5,
            height: 5
        }
    );
    assert!(!machine.snapshot().is_locked);
    assert!(!machine.snapshot().loop_active);
}

/// WHAT: Toggling from Unlocked locks the foreground window and clamps to it
/// WHY: Core behaviour of the lock
#[test]
#[allow(clippy::unwrap_used)]
fn given_unlocked_when_toggling_then_locked_and_cursor_clamped() {
    // Given: An unlocked machine with a usable foreground window
    let fakes = Fakes::new();
    let machine = machine(&fakes, fast_timing());

    // When: Toggling
    let outcome = machine.toggle().unwrap();

    // Then: Locked to that window and the clamp is applied
    assert!(matches!(outcome, ToggleOutcome::Locked { window, .. } if window == MAIN_WINDOW));
    let snapshot = machine.snapshot();
    assert!(snapshot.is_locked);
    assert_eq!(snapshot.locked_window, Some(MAIN_WINDOW));
    assert_eq!(snapshot.phase, LockPhase::Locked);
    assert!(wait_until(|| fakes.clamp.current() == Some(MAIN_RECT)));

    machine.force_unlock();
}

/// WHAT: Pairs of toggles always return to Unlocked
/// WHY: Even numbers of toggles must restore the initial state
#[test]
#[allow(clippy::unwrap_used)]
fn given_repeated_toggle_pairs_when_each_loop_exits_then_unlocked_every_time() {
    // Given: An unlocked machine
    let fakes = Fakes::new();
    let machine = machine(&fakes, fast_timing());

    for _ in 0..3 {
        // When: Toggling on and then off
        assert!(matches!(machine.toggle().unwrap(), ToggleOutcome::Locked { .. }));
        assert_eq!(machine.toggle().unwrap(), ToggleOutcome::UnlockRequested);

        // Then: The loop tears down into Unlocked with the clamp cleared
        assert!(wait_until(|| !machine.snapshot().loop_active));
        let snapshot = machine.snapshot();
        assert!(!snapshot.is_locked);
        assert_eq!(snapshot.locked_window, None);
        assert!(!snapshot.force_unlock_requested);
        assert_eq!(fakes.clamp.current(), None);
    }
}

/// WHAT: Toggling off only signals the loop
/// WHY: Teardown belongs to the loop's exit path, toggle must not block
#[test]
#[allow(clippy::unwrap_used)]
fn given_locked_when_toggling_then_unlock_requested_and_still_locked_until_loop_exits() {
    // Given: A locked machine whose loop sleeps long between ticks
    let fakes = Fakes::new();
    let machine = machine(
        &fakes,
        LockTiming {
            tick: Duration::from_millis(300),
            unlock_wait: Duration::from_millis(500),
        },
    );
    machine.toggle().unwrap();
    assert!(wait_until(|| fakes.clamp.confine_calls() >= 1));

    // When: Toggling off
    let outcome = machine.toggle().unwrap();

    // Then: The request is recorded and the machine is stopping
    assert_eq!(outcome, ToggleOutcome::UnlockRequested);
    let snapshot = machine.snapshot();
    assert!(snapshot.force_unlock_requested);
    assert_eq!(snapshot.phase, LockPhase::ForceStopping);

    // And: Toggling again only reports the pending request
    assert_eq!(machine.toggle().unwrap(), ToggleOutcome::UnlockPending);
    assert!(machine.snapshot().force_unlock_requested);
    assert!(wait_until(|| machine.snapshot().phase == LockPhase::Unlocked));
}

/// WHAT: A second clamp loop cannot start while the first is still exiting
/// WHY: At most one clamp loop may run at any time
#[test]
#[allow(clippy::unwrap_used)]
fn given_loop_still_exiting_when_toggling_then_stopping_and_no_second_loop() {
    // Given: A lock whose loop is asleep, force-unlocked with a tiny wait
    let fakes = Fakes::new();
    let machine = machine(
        &fakes,
        LockTiming {
            tick: Duration::from_millis(300),
            unlock_wait: Duration::from_millis(1),
        },
    );
    machine.toggle().unwrap();
    assert!(wait_until(|| fakes.clamp.confine_calls() >= 1));
    let snapshot = machine.force_unlock();
    assert!(!snapshot.is_locked);
    assert!(snapshot.loop_active);

    // When: Toggling on before the loop has exited
    let outcome = machine.toggle().unwrap();

    // Then: Refused; a new loop starts only once the first has exited
    assert_eq!(outcome, ToggleOutcome::Stopping);
    assert!(!machine.snapshot().is_locked);
    assert!(wait_until(|| !machine.snapshot().loop_active));
    assert!(matches!(machine.toggle().unwrap(), ToggleOutcome::Locked { .. }));
    assert!(wait_until(|| {
        fakes.clamp.state.lock().unwrap().confining_threads.len() == 2
    }));
    machine.force_unlock();
    assert!(wait_until(|| !machine.snapshot().loop_active));
}

/// WHAT: force_unlock from Unlocked clears the clamp and is idempotent
/// WHY: Force unlock is callable from any state, any number of times
#[test]
#[allow(clippy::unwrap_used)]
fn given_unlocked_when_force_unlocking_twice_then_same_end_state() {
    // Given: An unlocked machine
    let fakes = Fakes::new();
    let machine = machine(&fakes, fast_timing());

    // When: Force unlocking twice
    let first = machine.force_unlock();
    let second = machine.force_unlock();

    // Then: Same unlocked state, clamp released each time without error
    assert_eq!(first, second);
    assert_eq!(first.phase, LockPhase::Unlocked);
    assert_eq!(fakes.clamp.state.lock().unwrap().release_calls, 2);
}

/// WHAT: force_unlock while locked resets everything within the bounded wait
/// WHY: The escape hatch must always leave the cursor free
#[test]
#[allow(clippy::unwrap_used)]
fn given_locked_when_force_unlocking_then_unlocked_and_clamp_cleared() {
    // Given: A running lock
    let fakes = Fakes::new();
    let machine = machine(&fakes, fast_timing());
    machine.toggle().unwrap();
    assert!(wait_until(|| fakes.clamp.current().is_some()));

    // When: Force unlocking
    let snapshot = machine.force_unlock();

    // Then: Unlocked, clamp cleared, loop gone within the wait
    assert!(!snapshot.is_locked);
    assert_eq!(snapshot.locked_window, None);
    assert!(!snapshot.force_unlock_requested);
    assert!(!snapshot.loop_active);
    assert_eq!(fakes.clamp.current(), None);

    // And: Calling again yields the same state
    assert_eq!(machine.force_unlock(), snapshot);
}

/// WHAT: A window destroyed before the first tick unlocks without clamping
/// WHY: Window-gone is recoverable and surfaced to the user
#[test]
#[allow(clippy::unwrap_used)]
fn given_window_destroyed_before_first_tick_when_loop_starts_then_unlocked_with_notice() {
    // Given: The window answers the toggle-time query, then disappears
    let fakes = Fakes::new();
    fakes.windows.state.lock().unwrap().remaining_info_queries = Some(1);
    let machine = machine(&fakes, fast_timing());

    // When: Locking
    assert!(matches!(machine.toggle().unwrap(), ToggleOutcome::Locked { .. }));

    // Then: The loop tears down before any clamp
    assert!(wait_until(|| !machine.snapshot().loop_active));
    assert!(!machine.snapshot().is_locked);
    assert_eq!(fakes.clamp.confine_calls(), 0);
    assert!(fakes.notifier.titles().contains(&"Lock Error".to_string()));
}

/// WHAT: Closing the locked window ends the lock
/// WHY: A permanently invalid window must not leave the cursor clamped
#[test]
#[allow(clippy::unwrap_used)]
fn given_locked_window_closed_when_loop_ticks_then_unlocked() {
    // Given: A running lock
    let fakes = Fakes::new();
    let machine = machine(&fakes, fast_timing());
    machine.toggle().unwrap();
    assert!(wait_until(|| fakes.clamp.confine_calls() >= 1));

    // When: The window is destroyed
    fakes.windows.close(MAIN_WINDOW);

    // Then: The loop exits into Unlocked with the clamp cleared
    assert!(wait_until(|| !machine.snapshot().loop_active));
    assert!(!machine.snapshot().is_locked);
    assert_eq!(fakes.clamp.current(), None);
    assert!(fakes.notifier.titles().contains(&"Lock Error".to_string()));
}

/// WHAT: Switching away from the locked window is undone
/// WHY: The clamp loop keeps the locked window focused
#[test]
#[allow(clippy::unwrap_used)]
fn given_other_window_focused_when_loop_ticks_then_locked_window_refocused() {
    // Given: A running lock and a second window
    let fakes = Fakes::new();
    fakes.windows.open(OTHER_WINDOW, Rect::new(0, 0, 400, 400));
    let machine = machine(&fakes, fast_timing());
    machine.toggle().unwrap();

    // When: The other window takes the foreground
    fakes.windows.set_foreground(Some(OTHER_WINDOW));

    // Then: The loop pulls the locked window back
    assert!(wait_until(|| fakes.windows.focus_requests() >= 1));
    assert!(wait_until(|| fakes.windows.foreground() == Some(MAIN_WINDOW)));

    machine.force_unlock();
}

/// WHAT: A denied focus request does not end the lock
/// WHY: Refocus is best effort and retried next tick
#[test]
#[allow(clippy::unwrap_used)]
fn given_focus_denied_when_loop_ticks_then_lock_survives_and_retries() {
    // Given: A running lock, another window in front, focus always denied
    let fakes = Fakes::new();
    fakes.windows.open(OTHER_WINDOW, Rect::new(0, 0, 400, 400));
    fakes.windows.state.lock().unwrap().deny_focus = true;
    let machine = machine(&fakes, fast_timing());
    machine.toggle().unwrap();
    fakes.windows.set_foreground(Some(OTHER_WINDOW));

    // When: Several ticks pass
    assert!(wait_until(|| fakes.windows.focus_requests() >= 3));

    // Then: Still locked
    assert!(machine.snapshot().is_locked);
    assert!(machine.snapshot().loop_active);

    machine.force_unlock();
}

/// WHAT: The clamp box stays where the window was at lock time
/// WHY: The rectangle is captured once, not re-queried every tick
#[test]
#[allow(clippy::unwrap_used)]
fn given_locked_window_moved_when_loop_ticks_then_original_rect_still_clamped() {
    // Given: A running lock
    let fakes = Fakes::new();
    let machine = machine(&fakes, fast_timing());
    machine.toggle().unwrap();
    assert!(wait_until(|| fakes.clamp.confine_calls() >= 1));

    // When: The window moves
    fakes.windows.open(MAIN_WINDOW, Rect::new(1000, 0, 1800, 600));
    let calls = fakes.clamp.confine_calls();
    assert!(wait_until(|| fakes.clamp.confine_calls() > calls + 2));

    // Then: Still clamped to the original box
    assert_eq!(fakes.clamp.current(), Some(MAIN_RECT));

    machine.force_unlock();
}
