//! keywake: OS-level synthetic keyboard/mouse input with a pausable
//! background loop that taps a key to keep a session awake.

pub mod error;
pub mod kbd_out;
pub mod keys;
pub mod oskbd;
pub mod scheduler;

pub use error::InputError;
pub use kbd_out::{KbdOut, ScrollDirection};
pub use scheduler::Ticker;
