//! Channel-backed event fanout
//!
//! Broadcast events go to a pub/sub channel: every listener sees every
//! event, and a listener that falls behind loses the oldest ones. Session
//! signals are counted per session and wake one async waiter, the way a
//! SIGIO-style notification coalesces. A session's count is dropped when it
//! unsubscribes.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::pubsub::{self, PubSubChannel, Subscriber};
use embassy_sync::signal::Signal;
use fpsense_core::{EventFanout, SessionId};
use fpsense_protocol::NetEvent;
use heapless::LinearMap;

/// Listener on the broadcast channel
pub type EventSubscriber<'a, const CAP: usize, const SUBS: usize> =
    Subscriber<'a, CriticalSectionRawMutex, NetEvent, CAP, SUBS, 0>;

/// Event fanout over embassy-sync primitives
///
/// - `CAP`: broadcast events buffered per listener
/// - `SUBS`: broadcast listeners, also the number of sessions tracked for
///   signals
pub struct ChannelFanout<const CAP: usize, const SUBS: usize> {
    events: PubSubChannel<CriticalSectionRawMutex, NetEvent, CAP, SUBS, 0>,
    pending: Mutex<CriticalSectionRawMutex, RefCell<LinearMap<SessionId, u32, SUBS>>>,
    signalled: Signal<CriticalSectionRawMutex, SessionId>,
}

impl<const CAP: usize, const SUBS: usize> Default for ChannelFanout<CAP, SUBS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize, const SUBS: usize> ChannelFanout<CAP, SUBS> {
    pub const fn new() -> Self {
        Self {
            events: PubSubChannel::new(),
            pending: Mutex::new(RefCell::new(LinearMap::new())),
            signalled: Signal::new(),
        }
    }

    /// Start listening to broadcast events
    pub fn subscribe(&self) -> Result<EventSubscriber<'_, CAP, SUBS>, pubsub::Error> {
        self.events.subscriber()
    }

    /// Take and reset the signal count of a session
    pub fn take_pending(&self, session: SessionId) -> u32 {
        self.pending
            .lock(|pending| pending.borrow_mut().remove(&session).unwrap_or(0))
    }

    /// Wait until any session is signalled, returning the latest one
    pub async fn wait_signal(&self) -> SessionId {
        self.signalled.wait().await
    }
}

impl<const CAP: usize, const SUBS: usize> EventFanout for ChannelFanout<CAP, SUBS> {
    fn broadcast(&self, event: NetEvent) {
        self.events.immediate_publisher().publish_immediate(event);
    }

    fn signal(&self, session: SessionId) {
        let counted = self.pending.lock(|pending| {
            let mut pending = pending.borrow_mut();
            match pending.get_mut(&session) {
                Some(count) => {
                    *count = count.saturating_add(1);
                    true
                }
                None => pending.insert(session, 1).is_ok(),
            }
        });

        if !counted {
            #[cfg(feature = "defmt")]
            defmt::warn!("signal table full, dropping signal for {}", session);
        }
        self.signalled.signal(session);
    }

    fn unsubscribe(&self, session: SessionId) {
        self.pending
            .lock(|pending| pending.borrow_mut().remove(&session));
    }
}
