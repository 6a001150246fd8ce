//! Event fanout
//!
//! Events leave the core on two independent channels: a datagram broadcast
//! that every listener sees, and a per-session async signal for sessions
//! that asked for one. Both are fire-and-forget.

use fpsense_protocol::NetEvent;
use heapless::Vec;

use crate::config::MAX_SUBSCRIBERS;
use crate::error::Error;

/// Identifier of an open session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionId(pub u32);

/// Outbound event transport
///
/// Both methods must be non-blocking and callable from interrupt context.
pub trait EventFanout {
    /// Broadcast an event on the datagram channel
    fn broadcast(&self, event: NetEvent);

    /// Raise the async notification for one session
    fn signal(&self, session: SessionId);

    /// Forget any per-session state; the session will not be signalled
    /// again until it resubscribes
    fn unsubscribe(&self, session: SessionId);
}

impl<T: EventFanout + ?Sized> EventFanout for &T {
    fn broadcast(&self, event: NetEvent) {
        T::broadcast(self, event)
    }

    fn signal(&self, session: SessionId) {
        T::signal(self, session)
    }

    fn unsubscribe(&self, session: SessionId) {
        T::unsubscribe(self, session)
    }
}

/// Sessions registered for async notification
#[derive(Debug, Default)]
pub struct Subscribers {
    sessions: Vec<SessionId, MAX_SUBSCRIBERS>,
}

impl Subscribers {
    /// Create an empty subscriber set
    pub const fn new() -> Self {
        Self {
            sessions: Vec::new(),
        }
    }

    /// Add a session; adding twice is a no-op
    pub fn insert(&mut self, session: SessionId) -> Result<(), Error> {
        if self.contains(session) {
            return Ok(());
        }
        self.sessions
            .push(session)
            .map_err(|_| Error::SubscriberTableFull)
    }

    /// Remove a session; returns true if it was subscribed
    pub fn remove(&mut self, session: SessionId) -> bool {
        match self.sessions.iter().position(|s| *s == session) {
            Some(index) => {
                self.sessions.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Check if a session is subscribed
    pub fn contains(&self, session: SessionId) -> bool {
        self.sessions.contains(&session)
    }

    /// Number of subscribed sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no session is subscribed
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Subscribed sessions, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.iter().copied()
    }

    /// Signal every subscribed session
    pub fn notify<F: EventFanout + ?Sized>(&self, fanout: &F) {
        for session in self.sessions.iter() {
            fanout.signal(*session);
        }
    }
}
