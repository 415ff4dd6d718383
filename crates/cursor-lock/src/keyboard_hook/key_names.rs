//! Virtual-key code names.
//!
//! Names follow the spelling `canonical_key_name` understands, so left and
//! right modifier variants collapse onto `ctrl`, `alt`, `shift` and
//! `windows` when a binding is built.

/// Name of a Windows virtual-key code.
///
/// Unknown codes come back as `vk<hex>` so they still show up in a recorded
/// binding.
pub fn key_name(vk_code: u32) -> String {
    let fixed = match vk_code {
        0x08 => "backspace",
        0x09 => "tab",
        0x0D => "enter",
        0x10 => "shift",
        0x11 => "ctrl",
        0x12 => "alt",
        0x13 => "pause",
        0x14 => "caps lock",
        0x1B => "esc",
        0x20 => "space",
        0x21 => "page up",
        0x22 => "page down",
        0x23 => "end",
        0x24 => "home",
        0x25 => "left",
        0x26 => "up",
        0x27 => "right",
        0x28 => "down",
        0x2C => "print screen",
        0x2D => "insert",
        0x2E => "delete",
        0x5B => "left windows",
        0x5C => "right windows",
        0x6A => "num *",
        0x6B => "num add",
        0x6D => "num -",
        0x6E => "num .",
        0x6F => "num /",
        0x90 => "num lock",
        0x91 => "scroll lock",
        0xA0 => "left shift",
        0xA1 => "right shift",
        0xA2 => "left ctrl",
        0xA3 => "right ctrl",
        0xA4 => "left alt",
        0xA5 => "right alt",
        0xBA => ";",
        0xBB => "=",
        0xBC => ",",
        0xBD => "-",
        0xBE => ".",
        0xBF => "/",
        0xC0 => "`",
        0xDB => "[",
        0xDC => "\\",
        0xDD => "]",
        0xDE => "'",
        _ => "",
    };

    if !fixed.is_empty() {
        return fixed.to_string();
    }

    match vk_code {
        // 0-9 and A-Z share their ASCII codes.
        0x30..=0x39 | 0x41..=0x5A => char::from_u32(vk_code)
            .map(|c| c.to_ascii_lowercase().to_string())
            .unwrap_or_else(|| format!("vk{:02x}", vk_code)),
        0x60..=0x69 => format!("num {}", vk_code - 0x60),
        0x70..=0x87 => format!("f{}", vk_code - 0x6F),
        _ => format!("vk{:02x}", vk_code),
    }
}
