//! Channel-backed input reporter
//!
//! Queues key events for the task that feeds the host input stack. Codes
//! the device does not advertise are dropped, as the host input core
//! would.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, Receiver};
use fpsense_core::input::is_capable;
use fpsense_core::InputReporter;

/// Event delivered to the host input stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Key state change (1 = press, 0 = release)
    Key { code: u16, value: i32 },
    /// End of an event batch
    Sync,
}

/// Input reporter over a bounded channel
///
/// Reporting never blocks; events are dropped and counted when the queue
/// is full.
pub struct ChannelInput<const N: usize> {
    queue: Channel<CriticalSectionRawMutex, InputEvent, N>,
    dropped: Mutex<CriticalSectionRawMutex, Cell<u32>>,
}

impl<const N: usize> Default for ChannelInput<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ChannelInput<N> {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            dropped: Mutex::new(Cell::new(0)),
        }
    }

    /// Receiving end for the host input task
    pub fn receiver(&self) -> Receiver<'_, CriticalSectionRawMutex, InputEvent, N> {
        self.queue.receiver()
    }

    /// Events lost to a full queue or unadvertised code
    pub fn dropped(&self) -> u32 {
        self.dropped.lock(|d| d.get())
    }

    fn push(&self, event: InputEvent) {
        if self.queue.try_send(event).is_err() {
            self.drop_one();
        }
    }

    fn drop_one(&self) {
        self.dropped.lock(|d| d.set(d.get().saturating_add(1)));
    }
}

impl<const N: usize> InputReporter for ChannelInput<N> {
    fn report_key(&self, code: u16, value: i32) {
        if !is_capable(code) {
            self.drop_one();
            return;
        }
        self.push(InputEvent::Key { code, value });
    }

    fn sync(&self) {
        self.push(InputEvent::Sync);
    }
}
