use crate::notifier::spacing_delay;

use std::time::{Duration, Instant};

const SPACING: Duration = Duration::from_millis(500);

/// WHAT: The first notice is shown immediately
/// WHY: Nothing has been shown yet, so there is nothing to space from
#[test]
fn given_no_previous_notice_when_delayed_then_zero() {
    assert_eq!(spacing_delay(None, Instant::now(), SPACING), Duration::ZERO);
}

/// WHAT: A notice right after another waits for the remaining gap
/// WHY: Back-to-back toasts would replace each other before being read
#[test]
fn given_recent_notice_when_delayed_then_remaining_gap() {
    // Given: A notice shown 200ms ago
    let last = Instant::now();
    let now = last + Duration::from_millis(200);

    // When: Computing the delay
    let delay = spacing_delay(Some(last), now, SPACING);

    // Then: Only the rest of the gap is waited
    assert_eq!(delay, Duration::from_millis(300));
}

/// WHAT: An old notice imposes no delay
/// WHY: Spacing only applies to notices close together
#[test]
fn given_old_notice_when_delayed_then_zero() {
    // Given: A notice shown two seconds ago
    let last = Instant::now();
    let now = last + Duration::from_secs(2);

    // When: Computing the delay
    let delay = spacing_delay(Some(last), now, SPACING);

    // Then: No wait
    assert_eq!(delay, Duration::ZERO);
}
