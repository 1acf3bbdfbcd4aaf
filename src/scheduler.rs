//! Pausable, cancellable repeat loop that taps a key on every tick.
//!
//! One worker thread owns the injector; control threads only touch the
//! shared flag pair through the mutex+condvar, so a concurrent `stop()` or
//! `pause()` interrupts a wait instead of racing a plain bool.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::kbd_out::KbdOut;
use crate::oskbd::InputBackend;

/// How often the loop rechecks cancellation while paused. Bounds
/// pause-to-cancel latency even if a wakeup notification is lost.
const PAUSED_POLL: Duration = Duration::from_millis(250);

#[derive(Default)]
struct State {
    paused: bool,
    cancelled: bool,
}

struct Shared {
    state: Mutex<State>,
    cond: Condvar,
    interval: Duration,
}

/// A running tick loop. Dropping or stopping it is terminal; construct a new
/// one to run again.
pub struct Ticker {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Start the loop on a worker thread. Each tick waits a full `interval`
    /// and then presses and releases `key`; cancellation arriving mid-wait
    /// exits without firing.
    pub fn start<B>(
        mut kbd: KbdOut<B>,
        key: u16,
        interval: Duration,
        start_paused: bool,
    ) -> Ticker
    where
        B: InputBackend + Send + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                paused: start_paused,
                cancelled: false,
            }),
            cond: Condvar::new(),
            interval,
        });

        let worker_shared = shared.clone();
        let worker = std::thread::spawn(move || {
            log::info!("entering the tick loop");
            loop {
                let mut state = worker_shared.state.lock();
                if state.cancelled {
                    break;
                }
                if state.paused {
                    let _ = worker_shared.cond.wait_while_for(
                        &mut state,
                        |s| s.paused && !s.cancelled,
                        PAUSED_POLL,
                    );
                    continue;
                }
                // A plain timed wait, not a predicate wait: any notification
                // is a pause, resume or stop, and all of them abandon the
                // current countdown. Re-waiting under the same predicate
                // would keep the original deadline and fire a tick that a
                // quick pause+resume was meant to suppress.
                let timeout = worker_shared
                    .cond
                    .wait_for(&mut state, worker_shared.interval);
                if !timeout.timed_out() || state.cancelled || state.paused {
                    continue;
                }
                drop(state);
                if let Err(e) = kbd.press_release_key(key) {
                    log::error!("tick injection failed: {e}");
                }
            }
            log::info!("tick loop exited");
        });

        Ticker {
            shared,
            worker: Some(worker),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.shared.state.lock().paused
    }

    /// Suppress ticks until resumed. Effective at the next wakeup; a wait
    /// already in progress is interrupted and does not fire.
    pub fn pause(&self) {
        let mut state = self.shared.state.lock();
        state.paused = true;
        drop(state);
        self.shared.cond.notify_all();
        log::info!("ticker paused");
    }

    /// Resume ticking. The next tick waits the full interval again rather
    /// than finishing a partial countdown.
    pub fn resume(&self) {
        let mut state = self.shared.state.lock();
        state.paused = false;
        drop(state);
        self.shared.cond.notify_all();
        log::info!("ticker resumed");
    }

    /// Cancel the loop and wait for the worker to exit. After this returns
    /// no further key injections can be observed.
    pub fn stop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            if state.cancelled {
                return;
            }
            state.cancelled = true;
        }
        self.shared.cond.notify_all();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("tick loop worker panicked");
            }
        }
        log::info!("ticker stopped");
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
