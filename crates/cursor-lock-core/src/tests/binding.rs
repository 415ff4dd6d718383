use crate::{HotkeyBinding, LockError, canonical_key_name, is_modifier};

/// WHAT: Key order does not affect the canonical binding
/// WHY: ctrl+alt+l and alt+ctrl+l must register as the same hotkey
#[test]
#[allow(clippy::unwrap_used)]
fn given_same_keys_in_different_order_when_parsing_then_identical_binding() {
    // Given/When: Two spellings of the same combination
    let a = HotkeyBinding::parse("ctrl+alt+l").unwrap();
    let b = HotkeyBinding::parse("alt+ctrl+l").unwrap();

    // Then: Both canonicalize to the sorted join
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "alt+ctrl+l");
}

/// WHAT: Parsing is case and whitespace insensitive and folds sides
/// WHY: Config files and platform key names vary in spelling
#[test]
#[allow(clippy::unwrap_used)]
fn given_mixed_spelling_when_parsing_then_canonical_names() {
    // Given: Upper case, spaces, and side-specific modifier names
    let binding = HotkeyBinding::parse(" Right Ctrl + SHIFT + Left Windows + F5 ").unwrap();

    // Then: Lowercase, side-free, sorted
    assert_eq!(binding.as_str(), "ctrl+f5+shift+windows");
    assert_eq!(
        binding.modifiers().collect::<Vec<_>>(),
        vec!["ctrl", "shift", "windows"]
    );
    assert_eq!(binding.main_keys().collect::<Vec<_>>(), vec!["f5"]);
}

/// WHAT: Duplicate keys collapse into one
/// WHY: A binding is a set of keys
#[test]
#[allow(clippy::unwrap_used)]
fn given_duplicate_keys_when_building_then_deduplicated() {
    // Given/When: Left and right ctrl plus ctrl
    let binding = HotkeyBinding::from_keys(["left ctrl", "right ctrl", "ctrl", "k"]).unwrap();

    // Then: A single ctrl remains
    assert_eq!(binding.as_str(), "ctrl+k");
}

/// WHAT: Empty input is rejected
/// WHY: An empty binding cannot be registered
#[test]
fn given_empty_input_when_parsing_then_invalid_binding() {
    // Given/When: Empty and blank-segment strings
    let empty = HotkeyBinding::parse("");
    let gap = HotkeyBinding::parse("ctrl++l");

    // Then: Both are InvalidBinding errors
    assert!(matches!(empty, Err(LockError::InvalidBinding { .. })));
    assert!(matches!(gap, Err(LockError::InvalidBinding { .. })));
    assert!(HotkeyBinding::from_keys(Vec::<String>::new()).is_none());
}

/// WHAT: Modifier aliases fold onto four canonical names
/// WHY: The recorder must not distinguish left from right modifiers
#[test]
fn given_modifier_aliases_when_canonicalizing_then_folded() {
    // Given/When/Then
    assert_eq!(canonical_key_name("Left Shift"), "shift");
    assert_eq!(canonical_key_name("right alt"), "alt");
    assert_eq!(canonical_key_name("Control"), "ctrl");
    assert_eq!(canonical_key_name("super"), "windows");
    assert_eq!(canonical_key_name("Page Up"), "page up");
    assert!(is_modifier("ctrl"));
    assert!(!is_modifier("l"));
}

/// WHAT: Key names containing the separator are refused
/// WHY: Such a binding could be stored but never parsed back
#[test]
fn given_key_name_with_separator_when_building_then_none() {
    // Given/When: A recorded key whose name contains '+'
    let binding = HotkeyBinding::from_keys(["ctrl", "num +"]);

    // Then: No binding is produced
    assert_eq!(binding, None);
}

/// WHAT: A recorded binding reads back unchanged from its stored form
/// WHY: Settings persist the canonical string and parse it on next start
#[test]
#[allow(clippy::unwrap_used)]
fn given_recorded_binding_when_reparsed_then_identical() {
    // Given: A binding built from sided modifiers and a spaced key name
    let recorded = HotkeyBinding::from_keys(["right ctrl", "left shift", "num add"]).unwrap();

    // When: Parsing the stored string
    let reloaded = HotkeyBinding::parse(recorded.as_str()).unwrap();

    // Then: Same binding
    assert_eq!(recorded.as_str(), "ctrl+num add+shift");
    assert_eq!(reloaded, recorded);
}
