//! Recording backend: keeps every submitted record instead of touching the
//! OS. Used by the test suite and as the stand-in backend on non-Windows
//! builds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::InputError;
use crate::oskbd::{InputBackend, InputRecord};

/// Clones share the same log, so a test can hold a handle while the code
/// under test owns another.
#[derive(Clone, Default)]
pub struct SimInput {
    records: Arc<Mutex<Vec<InputRecord>>>,
    unicode: Arc<Mutex<Vec<(char, bool)>>>,
    key_states: Arc<Mutex<FxHashMap<u16, i32>>>,
    cursor: Arc<Mutex<(i32, i32)>>,
    failing: Arc<AtomicBool>,
}

impl SimInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything submitted so far, in order.
    pub fn snapshot(&self) -> Vec<InputRecord> {
        self.records.lock().clone()
    }

    pub fn unicode_log(&self) -> Vec<(char, bool)> {
        self.unicode.lock().clone()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
        self.unicode.lock().clear();
    }

    /// Raw value the next `key_state` query reports for `vk`.
    pub fn set_key_state(&self, vk: u16, raw: i32) {
        self.key_states.lock().insert(vk, raw);
    }

    /// When set, every submission fails the way a rejected OS call does.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl InputBackend for SimInput {
    fn submit(&mut self, records: &[InputRecord]) -> Result<(), InputError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(InputError::Injection { code: 5 });
        }
        for record in records {
            log::debug!("sim send: {record:?}");
        }
        self.records.lock().extend_from_slice(records);
        Ok(())
    }

    fn key_state(&mut self, vk: u16) -> Result<i32, InputError> {
        Ok(self.key_states.lock().get(&vk).copied().unwrap_or(0))
    }

    fn cursor_position(&mut self) -> Result<(i32, i32), InputError> {
        Ok(*self.cursor.lock())
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) -> Result<(), InputError> {
        *self.cursor.lock() = (x, y);
        Ok(())
    }

    fn send_unicode(&mut self, c: char, up: bool) -> Result<(), InputError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(InputError::Injection { code: 5 });
        }
        self.unicode.lock().push((c, up));
        Ok(())
    }
}
