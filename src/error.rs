//! Typed errors for key lookup, validation and OS input submission.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Argument is the wrong shape or out of range. Nothing was sent to the OS.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Key or button name/code is not in the key table. Nothing was sent to the OS.
    #[error("unknown key or button: {0}")]
    Lookup(String),

    /// The OS rejected the injected input. Carries the last OS error code.
    #[error("input injection failed, OS error code {code}")]
    Injection { code: u32 },

    /// The OS returned a key state value outside the known pressed/released
    /// sentinels.
    #[error("unexpected key state value {value} for virtual key 0x{vk:02X}")]
    State { vk: u16, value: i32 },
}

impl InputError {
    pub fn validation(msg: impl Into<String>) -> Self {
        InputError::Validation(msg.into())
    }

    pub fn lookup(what: impl Into<String>) -> Self {
        InputError::Lookup(what.into())
    }
}
