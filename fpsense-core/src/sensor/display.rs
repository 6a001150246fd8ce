//! Display-blank observer

use fpsense_protocol::NetEvent;

use super::Sensor;
use crate::board::Board;

/// Display notifier event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotificationKind {
    /// Blank state has changed
    Blank,
    /// Blank state is about to change
    EarlyBlank,
    /// Anything else the notifier sends
    Other(u32),
}

impl NotificationKind {
    /// Decode the notifier's event value
    pub fn from_raw(value: u32) -> Self {
        match value {
            0x01 => NotificationKind::Blank,
            0x02 => NotificationKind::EarlyBlank,
            other => NotificationKind::Other(other),
        }
    }
}

/// Display power state carried by a blank notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlankMode {
    Unblank,
    PowerDown,
    Other(i32),
}

impl BlankMode {
    pub fn from_raw(value: i32) -> Self {
        match value {
            0 => BlankMode::Unblank,
            1 => BlankMode::PowerDown,
            other => BlankMode::Other(other),
        }
    }
}

/// One callback from the display power notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayNotification {
    pub kind: NotificationKind,
    /// Blank payload, absent if the notifier sent none
    pub blank: Option<BlankMode>,
}

impl DisplayNotification {
    /// Completed blank transition to `mode`
    pub fn blank(mode: BlankMode) -> Self {
        Self {
            kind: NotificationKind::Blank,
            blank: Some(mode),
        }
    }
}

/// Answer to the display notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotifyResult {
    /// Notification kind not of interest
    Done,
    /// Notification handled
    Ok,
}

enum BlankOutcome {
    Applied,
    AlreadyBlank,
    Unpowered,
}

impl<B: Board> Sensor<B> {
    /// Handle a display power notification
    ///
    /// Never sleeps. Only completed blank transitions are acted on, and
    /// only while the sensor is powered.
    pub fn on_display_notification(&self, notification: &DisplayNotification) -> NotifyResult {
        if notification.kind != NotificationKind::Blank {
            return NotifyResult::Done;
        }

        match notification.blank {
            Some(BlankMode::PowerDown) => self.screen_off(),
            Some(BlankMode::Unblank) => self.screen_on(),
            Some(BlankMode::Other(value)) => debug!("received blank: {}", value),
            None => {}
        }

        NotifyResult::Ok
    }

    fn screen_off(&self) {
        let outcome = self.flags.update(|f| {
            if !f.powered {
                BlankOutcome::Unpowered
            } else if f.screen_blanked {
                BlankOutcome::AlreadyBlank
            } else {
                f.screen_blanked = true;
                f.expect_finger = true;
                BlankOutcome::Applied
            }
        });

        match outcome {
            BlankOutcome::Applied => {
                info!("received BLANK_POWERDOWN");
                self.emit(NetEvent::ScreenOff);
                self.notify_subscribers();
            }
            BlankOutcome::AlreadyBlank => debug!("display already blanked"),
            BlankOutcome::Unpowered => self.stats.dropped_display_events(),
        }
    }

    fn screen_on(&self) {
        let applied = self.flags.update(|f| {
            if f.powered {
                f.screen_blanked = false;
            }
            f.powered
        });

        if applied {
            info!("received BLANK_UNBLANK");
            self.emit(NetEvent::ScreenOn);
            self.notify_subscribers();
        } else {
            self.stats.dropped_display_events();
        }
    }
}
