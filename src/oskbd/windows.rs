//! Real input submission through `SendInput` and the user32 query calls.

use std::mem;

use encode_unicode::CharExt;
use winapi::ctypes::c_int;
use winapi::shared::windef::POINT;
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::winuser::*;

use crate::error::InputError;
use crate::oskbd::{Btn, InputBackend, InputRecord, WheelAxis};

/// Handle for writing input to the OS.
pub struct WinInput {}

impl WinInput {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for WinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBackend for WinInput {
    fn submit(&mut self, records: &[InputRecord]) -> Result<(), InputError> {
        for record in records {
            log::debug!("sending: {record:?}");
            send_one(record)?;
        }
        Ok(())
    }

    fn key_state(&mut self, vk: u16) -> Result<i32, InputError> {
        Ok(unsafe { GetKeyState(vk as c_int) } as i32)
    }

    fn cursor_position(&mut self) -> Result<(i32, i32), InputError> {
        let mut point = POINT { x: 0, y: 0 };
        let ret = unsafe { GetCursorPos(&mut point) };
        if ret == 0 {
            return Err(InputError::Injection {
                code: unsafe { GetLastError() },
            });
        }
        Ok((point.x, point.y))
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) -> Result<(), InputError> {
        let ret = unsafe { SetCursorPos(x, y) };
        if ret == 0 {
            return Err(InputError::Injection {
                code: unsafe { GetLastError() },
            });
        }
        Ok(())
    }

    /// Send using the unicode scan path (VK_PACKET semantics).
    fn send_unicode(&mut self, c: char, up: bool) -> Result<(), InputError> {
        let mut inputs: [INPUT; 2] = unsafe { mem::zeroed() };

        let n_inputs = inputs
            .iter_mut()
            .zip(c.to_utf16())
            .map(|(input, unit)| {
                let mut kb_input: KEYBDINPUT = unsafe { mem::zeroed() };
                kb_input.wScan = unit;
                kb_input.dwFlags |= KEYEVENTF_UNICODE;
                if up {
                    kb_input.dwFlags |= KEYEVENTF_KEYUP;
                }
                input.type_ = INPUT_KEYBOARD;
                unsafe { *input.u.ki_mut() = kb_input };
            })
            .count();

        let sent = unsafe {
            SendInput(
                n_inputs as _,
                inputs.as_mut_ptr(),
                mem::size_of::<INPUT>() as _,
            )
        };
        check_sent(sent, n_inputs as u32)
    }
}

fn send_one(record: &InputRecord) -> Result<(), InputError> {
    let mut input: INPUT = unsafe { mem::zeroed() };
    match *record {
        InputRecord::KeyDown { vk, scan, extended }
        | InputRecord::KeyUp { vk, scan, extended } => {
            let mut kb_input: KEYBDINPUT = unsafe { mem::zeroed() };
            kb_input.wVk = vk;
            kb_input.wScan = scan;
            if extended {
                kb_input.dwFlags |= KEYEVENTF_EXTENDEDKEY;
            }
            if matches!(record, InputRecord::KeyUp { .. }) {
                kb_input.dwFlags |= KEYEVENTF_KEYUP;
            }
            input.type_ = INPUT_KEYBOARD;
            unsafe { *input.u.ki_mut() = kb_input };
        }
        InputRecord::MouseDown { button } | InputRecord::MouseUp { button } => {
            let up = matches!(record, InputRecord::MouseUp { .. });
            let mut m_input: MOUSEINPUT = unsafe { mem::zeroed() };
            m_input.dwFlags |= match (button, up) {
                (Btn::Left, false) => MOUSEEVENTF_LEFTDOWN,
                (Btn::Left, true) => MOUSEEVENTF_LEFTUP,
                (Btn::Right, false) => MOUSEEVENTF_RIGHTDOWN,
                (Btn::Right, true) => MOUSEEVENTF_RIGHTUP,
                (Btn::Mid, false) => MOUSEEVENTF_MIDDLEDOWN,
                (Btn::Mid, true) => MOUSEEVENTF_MIDDLEUP,
                (Btn::Backward | Btn::Forward, false) => MOUSEEVENTF_XDOWN,
                (Btn::Backward | Btn::Forward, true) => MOUSEEVENTF_XUP,
            };
            if matches!(button, Btn::Backward) {
                m_input.mouseData = XBUTTON1.into();
            } else if matches!(button, Btn::Forward) {
                m_input.mouseData = XBUTTON2.into();
            }
            input.type_ = INPUT_MOUSE;
            unsafe { *input.u.mi_mut() = m_input };
        }
        InputRecord::Wheel { axis, delta, x, y } => {
            let mut m_input: MOUSEINPUT = unsafe { mem::zeroed() };
            m_input.dwFlags |= match axis {
                WheelAxis::Vertical => MOUSEEVENTF_WHEEL,
                WheelAxis::Horizontal => MOUSEEVENTF_HWHEEL,
            };
            m_input.mouseData = delta as u32;
            m_input.dx = x;
            m_input.dy = y;
            input.type_ = INPUT_MOUSE;
            unsafe { *input.u.mi_mut() = m_input };
        }
    }

    let sent = unsafe { SendInput(1, &mut input, mem::size_of::<INPUT>() as c_int) };
    check_sent(sent, 1)
}

fn check_sent(sent: u32, requested: u32) -> Result<(), InputError> {
    if sent != requested {
        return Err(InputError::Injection {
            code: unsafe { GetLastError() },
        });
    }
    Ok(())
}
