use crate::{MIN_DIM, Rect, WindowInfo};

/// WHAT: A 5x5 rectangle is rejected for clamping
/// WHY: Minimized and hidden windows report tiny rectangles
#[test]
fn given_five_by_five_rect_when_checking_clampable_then_rejected() {
    // Given: A 5x5 rectangle
    let rect = Rect::new(0, 0, 5, 5);

    // When/Then: It is not eligible
    assert!(!rect.is_clampable());
}

/// WHAT: A 100x100 rectangle is accepted for clamping
/// WHY: Ordinary windows must be lockable
#[test]
fn given_hundred_by_hundred_rect_when_checking_clampable_then_accepted() {
    // Given: A 100x100 rectangle
    let rect = Rect::new(0, 0, 100, 100);

    // When/Then: It is eligible
    assert!(rect.is_clampable());
}

/// WHAT: The size threshold is strict on both axes
/// WHY: Exactly MIN_DIM is still degenerate; one axis too small is enough to reject
#[test]
fn given_rects_around_threshold_when_checking_clampable_then_strictly_greater_required() {
    // Given/When/Then: Boundary cases
    assert!(!Rect::new(0, 0, MIN_DIM, MIN_DIM).is_clampable());
    assert!(Rect::new(0, 0, MIN_DIM + 1, MIN_DIM + 1).is_clampable());
    assert!(!Rect::new(0, 0, 500, MIN_DIM).is_clampable());
    assert!(!Rect::default().is_clampable());
}

/// WHAT: Inverted rectangles are rejected
/// WHY: Negative extents must never reach the OS clamp call
#[test]
fn given_inverted_rect_when_checking_clampable_then_rejected() {
    // Given: Right edge left of left edge
    let rect = Rect::new(300, 300, 100, 100);

    // When/Then: Negative width, rejected
    assert_eq!(rect.width(), -200);
    assert!(!rect.is_clampable());
}

/// WHAT: Long window titles are truncated for display
/// WHY: Titles appear in logs and must stay short
#[test]
fn given_long_title_when_displaying_then_truncated_with_ellipsis() {
    // Given: An 80 character title and an empty title
    let long = WindowInfo::new(Rect::new(0, 0, 100, 100), "x".repeat(80));
    let empty = WindowInfo::new(Rect::new(0, 0, 100, 100), "");

    // When/Then: First 60 characters plus ellipsis, placeholder for empty
    assert_eq!(long.display_title(), format!("{}...", "x".repeat(60)));
    assert_eq!(empty.display_title(), "Untitled Window");
}
