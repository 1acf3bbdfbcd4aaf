//! Synthetic input records and the OS backends that submit them.
//!
//! A record is built per injected action and consumed immediately by the
//! backend; nothing is retained. On Windows the backend wraps `SendInput`,
//! everywhere else (and in tests) a recording backend stands in so the
//! sequencing logic stays observable.

use crate::error::InputError;
use crate::keys;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub use windows::*;

mod simulated;
pub use simulated::*;

/// Key transition direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyValue {
    Press,
    Release,
}

/// The five mouse buttons the key table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Btn {
    Left,
    Right,
    Mid,
    Backward,
    Forward,
}

impl Btn {
    /// Mouse buttons occupy the low end of the virtual key space.
    pub fn from_vk(vk: u16) -> Option<Btn> {
        match vk {
            keys::VK_LBUTTON => Some(Btn::Left),
            keys::VK_RBUTTON => Some(Btn::Right),
            keys::VK_MBUTTON => Some(Btn::Mid),
            keys::VK_XBUTTON1 => Some(Btn::Backward),
            keys::VK_XBUTTON2 => Some(Btn::Forward),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelAxis {
    Vertical,
    Horizontal,
}

/// One atomic synthetic input event, matching what the OS call consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRecord {
    KeyDown { vk: u16, scan: u16, extended: bool },
    KeyUp { vk: u16, scan: u16, extended: bool },
    MouseDown { button: Btn },
    MouseUp { button: Btn },
    /// Signed wheel delta; sign selects the scroll direction on the axis.
    /// The coordinates ride along in the record but pure wheel events do not
    /// move the cursor.
    Wheel { axis: WheelAxis, delta: i32, x: i32, y: i32 },
}

impl InputRecord {
    /// Build a keyboard record. The scan code is derived from the virtual key
    /// on every call; some input back-ends reject a key-up whose scan code
    /// does not match the preceding key-down.
    pub fn key(vk: u16, value: KeyValue) -> Result<InputRecord, InputError> {
        if !keys::is_valid_vk(vk) {
            return Err(InputError::validation(format!(
                "virtual key code {vk} is out of range 1-255"
            )));
        }
        let scan = vk_to_scan(vk);
        let extended = keys::is_extended_vk(vk);
        Ok(match value {
            KeyValue::Press => InputRecord::KeyDown { vk, scan, extended },
            KeyValue::Release => InputRecord::KeyUp { vk, scan, extended },
        })
    }

    pub fn button(button: Btn, value: KeyValue) -> InputRecord {
        match value {
            KeyValue::Press => InputRecord::MouseDown { button },
            KeyValue::Release => InputRecord::MouseUp { button },
        }
    }

    pub fn wheel(axis: WheelAxis, delta: i32, x: i32, y: i32) -> InputRecord {
        InputRecord::Wheel { axis, delta, x, y }
    }
}

/// Submits input records to the OS and answers cursor/key-state queries.
///
/// Every method surfaces OS failure as [`InputError::Injection`] with the
/// last OS error code; nothing is retried.
pub trait InputBackend {
    /// Queue the records with the OS in order. A short count from the OS is
    /// a failure.
    fn submit(&mut self, records: &[InputRecord]) -> Result<(), InputError>;

    /// Raw key state integer from the OS; the caller interprets the
    /// pressed/released sentinels.
    fn key_state(&mut self, vk: u16) -> Result<i32, InputError>;

    /// Fresh cursor position; never cached.
    fn cursor_position(&mut self) -> Result<(i32, i32), InputError>;

    fn set_cursor_position(&mut self, x: i32, y: i32) -> Result<(), InputError>;

    /// Unicode codepoint injection (down or up edge), bypassing the key
    /// table.
    fn send_unicode(&mut self, c: char, up: bool) -> Result<(), InputError>;
}

/// Translate a virtual key to its scan code.
#[cfg(target_os = "windows")]
pub fn vk_to_scan(vk: u16) -> u16 {
    use winapi::um::winuser::{MapVirtualKeyW, MAPVK_VK_TO_VSC};
    unsafe { MapVirtualKeyW(vk as u32, MAPVK_VK_TO_VSC) as u16 }
}

/// Translate a virtual key to its scan code. Without an OS layout to consult
/// the mapping is the identity, which keeps down/up pairs consistent.
#[cfg(not(target_os = "windows"))]
pub fn vk_to_scan(vk: u16) -> u16 {
    vk
}
