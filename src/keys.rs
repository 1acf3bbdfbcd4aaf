//! Static mapping between symbolic key/button names and Windows virtual key
//! codes.
//!
//! The table is built once and never mutated. Multiple names may alias the
//! same code (e.g. `period` and `.`); shifted punctuation aliases carry a
//! shift-required flag so that typing them holds Shift around the keystroke.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::error::InputError;

// Virtual key codes, from:
// https://github.com/retep998/winapi-rs/blob/0.3/src/um/winuser.rs
pub const VK_LBUTTON: u16 = 0x01;
pub const VK_RBUTTON: u16 = 0x02;
pub const VK_MBUTTON: u16 = 0x04;
pub const VK_XBUTTON1: u16 = 0x05;
pub const VK_XBUTTON2: u16 = 0x06;
pub const VK_BACK: u16 = 0x08;
pub const VK_TAB: u16 = 0x09;
pub const VK_RETURN: u16 = 0x0D;
pub const VK_SHIFT: u16 = 0x10;
pub const VK_CONTROL: u16 = 0x11;
pub const VK_MENU: u16 = 0x12;
pub const VK_CAPITAL: u16 = 0x14;
pub const VK_ESCAPE: u16 = 0x1B;
pub const VK_SPACE: u16 = 0x20;
pub const VK_PRIOR: u16 = 0x21;
pub const VK_NEXT: u16 = 0x22;
pub const VK_END: u16 = 0x23;
pub const VK_HOME: u16 = 0x24;
pub const VK_LEFT: u16 = 0x25;
pub const VK_UP: u16 = 0x26;
pub const VK_RIGHT: u16 = 0x27;
pub const VK_DOWN: u16 = 0x28;
pub const VK_SELECT: u16 = 0x29;
pub const VK_SNAPSHOT: u16 = 0x2C;
pub const VK_INSERT: u16 = 0x2D;
pub const VK_DELETE: u16 = 0x2E;
pub const VK_LWIN: u16 = 0x5B;
pub const VK_RWIN: u16 = 0x5C;
pub const VK_APPS: u16 = 0x5D;
pub const VK_SLEEP: u16 = 0x5F;
pub const VK_NUMPAD0: u16 = 0x60;
pub const VK_NUMPAD1: u16 = 0x61;
pub const VK_NUMPAD2: u16 = 0x62;
pub const VK_NUMPAD3: u16 = 0x63;
pub const VK_NUMPAD4: u16 = 0x64;
pub const VK_NUMPAD5: u16 = 0x65;
pub const VK_NUMPAD6: u16 = 0x66;
pub const VK_NUMPAD7: u16 = 0x67;
pub const VK_NUMPAD8: u16 = 0x68;
pub const VK_NUMPAD9: u16 = 0x69;
pub const VK_MULTIPLY: u16 = 0x6A;
pub const VK_ADD: u16 = 0x6B;
pub const VK_SEPARATOR: u16 = 0x6C;
pub const VK_SUBTRACT: u16 = 0x6D;
pub const VK_DECIMAL: u16 = 0x6E;
pub const VK_DIVIDE: u16 = 0x6F;
pub const VK_F1: u16 = 0x70;
pub const VK_F2: u16 = 0x71;
pub const VK_F3: u16 = 0x72;
pub const VK_F4: u16 = 0x73;
pub const VK_F5: u16 = 0x74;
pub const VK_F6: u16 = 0x75;
pub const VK_F7: u16 = 0x76;
pub const VK_F8: u16 = 0x77;
pub const VK_F9: u16 = 0x78;
pub const VK_F10: u16 = 0x79;
pub const VK_F11: u16 = 0x7A;
pub const VK_F12: u16 = 0x7B;
pub const VK_F13: u16 = 0x7C;
pub const VK_F14: u16 = 0x7D;
pub const VK_F15: u16 = 0x7E;
pub const VK_F16: u16 = 0x7F;
pub const VK_F17: u16 = 0x80;
pub const VK_F18: u16 = 0x81;
pub const VK_F19: u16 = 0x82;
pub const VK_F20: u16 = 0x83;
pub const VK_F21: u16 = 0x84;
pub const VK_F22: u16 = 0x85;
pub const VK_F23: u16 = 0x86;
pub const VK_F24: u16 = 0x87;
pub const VK_NUMLOCK: u16 = 0x90;
pub const VK_SCROLL: u16 = 0x91;
pub const VK_RCONTROL: u16 = 0xA3;
pub const VK_RMENU: u16 = 0xA5;
pub const VK_VOLUME_MUTE: u16 = 0xAD;
pub const VK_VOLUME_DOWN: u16 = 0xAE;
pub const VK_VOLUME_UP: u16 = 0xAF;
pub const VK_MEDIA_NEXT_TRACK: u16 = 0xB0;
pub const VK_MEDIA_PREV_TRACK: u16 = 0xB1;
pub const VK_MEDIA_STOP: u16 = 0xB2;
pub const VK_MEDIA_PLAY_PAUSE: u16 = 0xB3;
pub const VK_OEM_1: u16 = 0xBA;
pub const VK_OEM_PLUS: u16 = 0xBB;
pub const VK_OEM_COMMA: u16 = 0xBC;
pub const VK_OEM_MINUS: u16 = 0xBD;
pub const VK_OEM_PERIOD: u16 = 0xBE;
pub const VK_OEM_2: u16 = 0xBF;
pub const VK_OEM_3: u16 = 0xC0;
pub const VK_OEM_4: u16 = 0xDB;
pub const VK_OEM_5: u16 = 0xDC;
pub const VK_OEM_6: u16 = 0xDD;
pub const VK_OEM_7: u16 = 0xDE;
pub const VK_ZOOM: u16 = 0xFB;

/// One resolved key table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEntry {
    pub vk: u16,
    /// Typing this symbol requires Shift to be held.
    pub shift: bool,
}

/// A key given either by symbolic name or by raw virtual key code.
#[derive(Debug, Clone, Copy)]
pub enum KeyRef<'a> {
    Name(&'a str),
    Code(u16),
}

impl<'a> From<&'a str> for KeyRef<'a> {
    fn from(s: &'a str) -> Self {
        KeyRef::Name(s)
    }
}

impl From<u16> for KeyRef<'_> {
    fn from(c: u16) -> Self {
        KeyRef::Code(c)
    }
}

/// Characters that are typed as Shift + an unshifted base key.
pub const SHIFT_ALTERNATES: &str = "|~?:{}\"!@#$%^&*()_+<>";

// Symbolic names come first so that reverse lookup reports them as the
// canonical spelling for a code.
#[rustfmt::skip]
static NAMED_KEYS: &[(&str, u16, bool)] = &[
    // mouse buttons
    ("left_mouse", VK_LBUTTON, false),
    ("right_mouse", VK_RBUTTON, false),
    ("middle_mouse", VK_MBUTTON, false),
    ("mouse_button1", VK_XBUTTON1, false),
    ("mouse_button2", VK_XBUTTON2, false),
    // control keys
    ("win", VK_LWIN, false),
    ("select", VK_SELECT, false),
    ("pg_up", VK_PRIOR, false),
    ("pg_down", VK_NEXT, false),
    ("end", VK_END, false),
    ("home", VK_HOME, false),
    ("insert", VK_INSERT, false),
    ("delete", VK_DELETE, false),
    ("back", VK_BACK, false),
    ("enter", VK_RETURN, false),
    ("shift", VK_SHIFT, false),
    ("ctrl", VK_CONTROL, false),
    ("alt", VK_MENU, false),
    ("caps", VK_CAPITAL, false),
    ("escape", VK_ESCAPE, false),
    ("space", VK_SPACE, false),
    ("tab", VK_TAB, false),
    ("sleep", VK_SLEEP, false),
    ("zoom", VK_ZOOM, false),
    ("num_lock", VK_NUMLOCK, false),
    ("scroll_lock", VK_SCROLL, false),
    // OEM punctuation
    ("plus", VK_OEM_PLUS, false),
    ("comma", VK_OEM_COMMA, false),
    ("minus", VK_OEM_MINUS, false),
    ("period", VK_OEM_PERIOD, false),
    // media keys
    ("vol_mute", VK_VOLUME_MUTE, false),
    ("vol_down", VK_VOLUME_DOWN, false),
    ("vol_up", VK_VOLUME_UP, false),
    ("next", VK_MEDIA_NEXT_TRACK, false),
    ("prev", VK_MEDIA_PREV_TRACK, false),
    ("stop", VK_MEDIA_STOP, false),
    ("pause_play", VK_MEDIA_PLAY_PAUSE, false),
    // arrows
    ("left", VK_LEFT, false),
    ("up", VK_UP, false),
    ("right", VK_RIGHT, false),
    ("down", VK_DOWN, false),
    // function keys
    ("f1", VK_F1, false),
    ("f2", VK_F2, false),
    ("f3", VK_F3, false),
    ("f4", VK_F4, false),
    ("f5", VK_F5, false),
    ("f6", VK_F6, false),
    ("f7", VK_F7, false),
    ("f8", VK_F8, false),
    ("f9", VK_F9, false),
    ("f10", VK_F10, false),
    ("f11", VK_F11, false),
    ("f12", VK_F12, false),
    ("f13", VK_F13, false),
    ("f14", VK_F14, false),
    ("f15", VK_F15, false),
    ("f16", VK_F16, false),
    ("f17", VK_F17, false),
    ("f18", VK_F18, false),
    ("f19", VK_F19, false),
    ("f20", VK_F20, false),
    ("f21", VK_F21, false),
    ("f22", VK_F22, false),
    ("f23", VK_F23, false),
    ("f24", VK_F24, false),
    // numpad
    ("pad_0", VK_NUMPAD0, false),
    ("pad_1", VK_NUMPAD1, false),
    ("pad_2", VK_NUMPAD2, false),
    ("pad_3", VK_NUMPAD3, false),
    ("pad_4", VK_NUMPAD4, false),
    ("pad_5", VK_NUMPAD5, false),
    ("pad_6", VK_NUMPAD6, false),
    ("pad_7", VK_NUMPAD7, false),
    ("pad_8", VK_NUMPAD8, false),
    ("pad_9", VK_NUMPAD9, false),
    ("multiply", VK_MULTIPLY, false),
    ("add", VK_ADD, false),
    ("separator", VK_SEPARATOR, false),
    ("subtract", VK_SUBTRACT, false),
    ("decimal", VK_DECIMAL, false),
    ("divide", VK_DIVIDE, false),
    // digits and letters (VK codes match ASCII uppercase)
    ("0", 0x30, false),
    ("1", 0x31, false),
    ("2", 0x32, false),
    ("3", 0x33, false),
    ("4", 0x34, false),
    ("5", 0x35, false),
    ("6", 0x36, false),
    ("7", 0x37, false),
    ("8", 0x38, false),
    ("9", 0x39, false),
    ("a", 0x41, false),
    ("b", 0x42, false),
    ("c", 0x43, false),
    ("d", 0x44, false),
    ("e", 0x45, false),
    ("f", 0x46, false),
    ("g", 0x47, false),
    ("h", 0x48, false),
    ("i", 0x49, false),
    ("j", 0x4A, false),
    ("k", 0x4B, false),
    ("l", 0x4C, false),
    ("m", 0x4D, false),
    ("n", 0x4E, false),
    ("o", 0x4F, false),
    ("p", 0x50, false),
    ("q", 0x51, false),
    ("r", 0x52, false),
    ("s", 0x53, false),
    ("t", 0x54, false),
    ("u", 0x55, false),
    ("v", 0x56, false),
    ("w", 0x57, false),
    ("x", 0x58, false),
    ("y", 0x59, false),
    ("z", 0x5A, false),
    // punctuation aliases
    ("=", VK_ADD, false),
    (" ", VK_SPACE, false),
    (".", VK_OEM_PERIOD, false),
    (",", VK_OEM_COMMA, false),
    ("-", VK_SUBTRACT, false),
    ("`", VK_OEM_3, false),
    ("/", VK_OEM_2, false),
    (";", VK_OEM_1, false),
    ("[", VK_OEM_4, false),
    ("]", VK_OEM_6, false),
    ("'", VK_OEM_7, false),
    ("\\", VK_OEM_5, false),
    ("\n", VK_RETURN, false),
    // shifted variants of the above
    ("_", VK_SUBTRACT, true),
    ("|", VK_OEM_5, true),
    ("~", VK_OEM_3, true),
    ("?", VK_OEM_2, true),
    (":", VK_OEM_1, true),
    ("<", VK_OEM_COMMA, true),
    (">", VK_OEM_PERIOD, true),
    ("{", VK_OEM_4, true),
    ("}", VK_OEM_6, true),
    ("!", 0x31, true),
    ("@", 0x32, true),
    ("#", 0x33, true),
    ("$", 0x34, true),
    ("%", 0x35, true),
    ("^", 0x36, true),
    ("&", 0x37, true),
    ("*", 0x38, true),
    ("(", 0x39, true),
    (")", 0x30, true),
    ("+", VK_ADD, true),
    ("\"", VK_OEM_7, true),
];

static NAME_TO_KEY: Lazy<FxHashMap<&'static str, KeyEntry>> = Lazy::new(|| {
    let mut m = FxHashMap::default();
    for &(name, vk, shift) in NAMED_KEYS {
        let prev = m.insert(name, KeyEntry { vk, shift });
        debug_assert!(prev.is_none(), "duplicate key table entry: {name}");
    }
    m
});

static VK_TO_NAME: Lazy<FxHashMap<u16, &'static str>> = Lazy::new(|| {
    let mut m = FxHashMap::default();
    for &(name, vk, shift) in NAMED_KEYS {
        if !shift {
            m.entry(vk).or_insert(name);
        }
    }
    m
});

/// Virtual key codes live in a single byte; 0 is reserved and never a key.
pub const fn is_valid_vk(vk: u16) -> bool {
    vk >= 1 && vk <= 255
}

/// Resolve a symbolic name (case-insensitive) or raw code to a table entry.
///
/// Raw codes are passed through unchanged after range validation, never
/// clamped.
pub fn resolve<'a>(key: impl Into<KeyRef<'a>>) -> Result<KeyEntry, InputError> {
    match key.into() {
        KeyRef::Name(name) => {
            if let Some(entry) = NAME_TO_KEY.get(name) {
                return Ok(*entry);
            }
            let folded = name.to_ascii_lowercase();
            NAME_TO_KEY
                .get(folded.as_str())
                .copied()
                .ok_or_else(|| InputError::lookup(name))
        }
        KeyRef::Code(code) => {
            if is_valid_vk(code) {
                Ok(KeyEntry {
                    vk: code,
                    shift: false,
                })
            } else {
                Err(InputError::validation(format!(
                    "virtual key code {code} is out of range 1-255"
                )))
            }
        }
    }
}

/// Resolve a single character the way string typing does: uppercase ASCII
/// letters fold to their base key with the shift flag set.
pub fn resolve_char(c: char) -> Result<KeyEntry, InputError> {
    let lower = if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else {
        c
    };
    let mut buf = [0u8; 4];
    let s: &str = lower.encode_utf8(&mut buf);
    let entry = NAME_TO_KEY
        .get(s)
        .copied()
        .ok_or_else(|| InputError::lookup(format!("character {c:?}")))?;
    Ok(KeyEntry {
        vk: entry.vk,
        shift: entry.shift || c.is_ascii_uppercase(),
    })
}

/// Canonical (unshifted) name for a code, if the table names it.
pub fn name_of_vk(vk: u16) -> Option<&'static str> {
    VK_TO_NAME.get(&vk).copied()
}

/// Whether typing this symbol must hold Shift.
pub fn shift_required(name: &str) -> bool {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_uppercase() || SHIFT_ALTERNATES.contains(c) {
            return true;
        }
    }
    NAME_TO_KEY.get(name).map(|e| e.shift).unwrap_or(false)
}

/// Keys that set the extended-key flag in synthetic keyboard events.
pub const fn is_extended_vk(vk: u16) -> bool {
    matches!(
        vk,
        VK_PRIOR
            | VK_NEXT
            | VK_END
            | VK_HOME
            | VK_LEFT
            | VK_UP
            | VK_RIGHT
            | VK_DOWN
            | VK_INSERT
            | VK_DELETE
            | VK_SNAPSHOT
            | VK_LWIN
            | VK_RWIN
            | VK_APPS
            | VK_NUMLOCK
            | VK_DIVIDE
            | VK_RCONTROL
            | VK_RMENU
            | VK_VOLUME_MUTE
            | VK_VOLUME_DOWN
            | VK_VOLUME_UP
            | VK_MEDIA_NEXT_TRACK
            | VK_MEDIA_PREV_TRACK
            | VK_MEDIA_STOP
            | VK_MEDIA_PLAY_PAUSE
            | VK_SLEEP
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_alphanumerics_and_symbolics() {
        assert_eq!(resolve("a").unwrap().vk, 0x41);
        assert_eq!(resolve("z").unwrap().vk, 0x5A);
        assert_eq!(resolve("0").unwrap().vk, 0x30);
        assert_eq!(resolve("f15").unwrap().vk, VK_F15);
        assert_eq!(resolve("enter").unwrap().vk, VK_RETURN);
        assert_eq!(resolve("left_mouse").unwrap().vk, VK_LBUTTON);
        assert_eq!(resolve("\n").unwrap().vk, VK_RETURN);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(resolve("F15").unwrap(), resolve("f15").unwrap());
        assert_eq!(resolve("Enter").unwrap(), resolve("enter").unwrap());
        assert_eq!(resolve("A").unwrap().vk, 0x41);
    }

    #[test]
    fn aliases_share_codes() {
        assert_eq!(resolve(".").unwrap().vk, resolve("period").unwrap().vk);
        assert_eq!(resolve(",").unwrap().vk, resolve("comma").unwrap().vk);
        assert_eq!(resolve("-").unwrap().vk, resolve("subtract").unwrap().vk);
    }

    #[test]
    fn shifted_variants_set_flag_on_same_code() {
        let dot = resolve(".").unwrap();
        let gt = resolve(">").unwrap();
        assert_eq!(dot.vk, gt.vk);
        assert!(!dot.shift);
        assert!(gt.shift);
    }

    #[test]
    fn raw_codes_pass_through_after_range_check() {
        assert_eq!(resolve(0x7Eu16).unwrap().vk, 0x7E);
        assert_eq!(resolve(255u16).unwrap().vk, 255);
        assert!(matches!(
            resolve(0u16),
            Err(InputError::Validation(_))
        ));
        assert!(matches!(
            resolve(256u16),
            Err(InputError::Validation(_))
        ));
    }

    #[test]
    fn unknown_name_is_lookup_error() {
        assert!(matches!(
            resolve("no_such_key"),
            Err(InputError::Lookup(_))
        ));
    }

    #[test]
    fn reverse_lookup_roundtrips() {
        for &(_, vk, _) in NAMED_KEYS {
            let name = name_of_vk(vk).expect("every code has a canonical name");
            assert_eq!(resolve(name).unwrap().vk, vk);
        }
    }

    #[test]
    fn canonical_names_are_unshifted() {
        // The shifted alias must never win reverse lookup over the base key.
        assert_eq!(name_of_vk(VK_OEM_PERIOD), Some("period"));
        assert_eq!(name_of_vk(0x31), Some("1"));
    }

    #[test]
    fn shift_required_for_uppercase_and_alternates() {
        assert!(shift_required("A"));
        assert!(shift_required("?"));
        assert!(shift_required("{"));
        assert!(shift_required("\""));
        assert!(!shift_required("a"));
        assert!(!shift_required("f15"));
        assert!(!shift_required("."));
    }

    #[test]
    fn resolve_char_folds_uppercase() {
        let upper = resolve_char('H').unwrap();
        let lower = resolve_char('h').unwrap();
        assert_eq!(upper.vk, lower.vk);
        assert!(upper.shift);
        assert!(!lower.shift);
    }

    #[test]
    fn resolve_char_unknown_aborts() {
        assert!(matches!(resolve_char('é'), Err(InputError::Lookup(_))));
    }

    #[test]
    fn extended_keys_marked() {
        assert!(is_extended_vk(VK_LEFT));
        assert!(is_extended_vk(VK_DELETE));
        assert!(is_extended_vk(VK_DIVIDE));
        assert!(!is_extended_vk(0x41));
        assert!(!is_extended_vk(VK_SHIFT));
    }
}
