//! Sensor device
//!
//! One [`Sensor`] exists per physical sensor, from attach to detach. It is
//! shared by three kinds of callers:
//!
//! - the interrupt handler ([`Sensor::handle_interrupt`])
//! - the display power callback ([`Sensor::on_display_notification`])
//! - user sessions (open, close, commands)
//!
//! The first two never sleep and only take the critical-section locks
//! guarding the flag word and subscriber set. Session calls are `async`
//! and serialize on the resource mutex, which they may hold across settle
//! delays.

mod command;
mod display;
mod interrupt;
mod resources;

pub use display::{BlankMode, DisplayNotification, NotificationKind, NotifyResult};
pub use interrupt::IrqToggle;

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use portable_atomic::{AtomicU32, Ordering};

use crate::board::{Board, SensorParts};
use crate::config::{SensorConfig, VERSION};
use crate::error::Error;
use crate::fanout::{EventFanout, SessionId, Subscribers};
use crate::power::{PowerRail, SpiClocks};
use crate::registry::{DeviceRegistry, Minor};
use crate::state::{DeviceFlags, Lifecycle, SharedFlags};
use crate::stats::{Diagnostics, DiagnosticsSnapshot};
use crate::wake::WakeLock;

/// Handle of one open session
///
/// Returned by [`Sensor::open`] and consumed by [`Sensor::close`], so a
/// session is closed at most once. A session opened before a
/// [`detach`](Sensor::detach) no longer counts as an opener.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    id: SessionId,
    epoch: u32,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }
}

/// Hardware owned by the session side, guarded by the resource mutex
pub(crate) struct Resources<B: Board> {
    pub(crate) lifecycle: Lifecycle,
    /// Bumped by detach; sessions from an older epoch are stale
    pub(crate) epoch: u32,
    pub(crate) minor: Option<Minor>,
    pub(crate) reset: B::Reset,
    pub(crate) irq: B::Irq,
    pub(crate) rail: PowerRail<B::Power>,
    pub(crate) clocks: SpiClocks<B::Clock>,
    pub(crate) delay: B::Delay,
}

/// Fingerprint sensor lifecycle and event core
pub struct Sensor<B: Board> {
    config: SensorConfig,
    flags: SharedFlags,
    hw: Mutex<CriticalSectionRawMutex, Resources<B>>,
    wake: WakeLock<B::Wake, B::Timer>,
    fanout: B::Fanout,
    input: B::Input,
    subscribers: BlockingMutex<CriticalSectionRawMutex, RefCell<Subscribers>>,
    next_session: AtomicU32,
    stats: Diagnostics,
}

impl<B: Board> Sensor<B> {
    /// Create a sensor from its board parts
    ///
    /// No hardware is touched until [`attach`](Self::attach).
    pub fn new(parts: SensorParts<B>, config: SensorConfig) -> Self {
        let SensorParts {
            reset,
            irq,
            power,
            core_clock,
            iface_clock,
            delay,
            wake,
            timer,
            fanout,
            input,
        } = parts;

        Self {
            config,
            flags: SharedFlags::new(),
            hw: Mutex::new(Resources {
                lifecycle: Lifecycle::Closed,
                epoch: 0,
                minor: None,
                reset,
                irq,
                rail: PowerRail::new(power, config.power_control, config.power_settle_ms),
                clocks: SpiClocks::new(core_clock, iface_clock),
                delay,
            }),
            wake: WakeLock::new(wake, timer, config.wake_hold_ms),
            fanout,
            input,
            subscribers: BlockingMutex::new(RefCell::new(Subscribers::new())),
            next_session: AtomicU32::new(1),
            stats: Diagnostics::new(),
        }
    }

    /// Take a minor number and configure the bus clocks
    ///
    /// Runs once after creation. The clocks are left disabled. On failure
    /// the minor number goes back to `registry`.
    pub async fn attach(&self, registry: &mut DeviceRegistry) -> Result<u8, Error> {
        let mut hw = self.hw.lock().await;
        if let Some(minor) = hw.minor.as_ref() {
            return Ok(minor.get());
        }

        let minor = registry.allocate()?;
        if let Err(e) = hw.clocks.configure(&self.flags, self.config.spi_clock_target_hz) {
            error!("failed to configure bus clock: {:?}", e);
            hw.clocks.release(&self.flags);
            registry.release(minor);
            return Err(e);
        }

        let number = minor.get();
        hw.minor = Some(minor);
        debug!("version V{}.{}.{}, minor {}", VERSION.0, VERSION.1, VERSION.2, number);
        Ok(number)
    }

    /// Tear everything down ahead of removal
    ///
    /// Releases the session hardware if any session is still open, drops
    /// the clocks and hands the minor number back to `registry`. Sessions
    /// opened before this call become stale: closing them does nothing.
    pub async fn detach(&self, registry: &mut DeviceRegistry) {
        let mut guard = self.hw.lock().await;
        let hw = &mut *guard;

        if hw.lifecycle.is_open() {
            warn!("detaching with {} open sessions", hw.lifecycle.openers());
            self.teardown(hw).await;
            hw.lifecycle = Lifecycle::Closed;
        }
        hw.epoch = hw.epoch.wrapping_add(1);
        hw.clocks.release(&self.flags);
        if let Some(minor) = hw.minor.take() {
            registry.release(minor);
        }

        let dropped = self
            .subscribers
            .lock(|subs| core::mem::take(&mut *subs.borrow_mut()));
        for session in dropped.iter() {
            self.fanout.unsubscribe(session);
        }
    }

    /// Minor number taken at attach, if attached
    pub async fn minor(&self) -> Option<u8> {
        self.hw.lock().await.minor.as_ref().map(Minor::get)
    }

    /// Register or unregister a session for async notification
    pub fn set_async(&self, session: &Session, enabled: bool) -> Result<(), Error> {
        if enabled {
            self.subscribers
                .lock(|subs| subs.borrow_mut().insert(session.id))
        } else {
            self.forget(session.id);
            Ok(())
        }
    }

    /// Check if a session receives async notifications
    pub fn is_subscribed(&self, session: &Session) -> bool {
        self.subscribers.lock(|subs| subs.borrow().contains(session.id))
    }

    /// Current device flags
    pub fn flags(&self) -> DeviceFlags {
        self.flags.snapshot()
    }

    /// Number of open sessions
    pub async fn openers(&self) -> u32 {
        self.hw.lock().await.lifecycle.openers()
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn wake_lock(&self) -> &WakeLock<B::Wake, B::Timer> {
        &self.wake
    }

    pub fn stats(&self) -> DiagnosticsSnapshot {
        self.stats.snapshot()
    }

    fn next_session_id(&self) -> SessionId {
        SessionId(self.next_session.fetch_add(1, Ordering::Relaxed))
    }

    /// Drop a session from the subscriber set and the fanout
    fn forget(&self, session: SessionId) {
        self.subscribers
            .lock(|subs| subs.borrow_mut().remove(session));
        self.fanout.unsubscribe(session);
    }

    /// Signal every subscribed session
    fn notify_subscribers(&self) {
        self.subscribers
            .lock(|subs| subs.borrow().notify(&self.fanout));
    }

    fn emit(&self, event: fpsense_protocol::NetEvent) {
        self.fanout.broadcast(event);
    }
}
