use crate::config::GfxMode;
use crate::events::{AlsReason, InputReport, RadioReason, SonyEvent};

/// What a decoded firmware notification tells the outside world.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A key or button event, with its input translation if it has one.
    Key {
        event: SonyEvent,
        input: Option<InputReport>,
    },
    /// Radio state was refreshed; query the device for the new state.
    Radio(RadioReason),
    Als(AlsReason),
    Shock,
    GfxSwitch(GfxMode),
    /// Speed/stamina switch position; `true` is speed.
    SpeedStamina(bool),
    /// Handled generically: forwarded as is.
    Firmware { raw: u8 },
    /// Not understood. `code` is the secondary code if one was read.
    Unknown { raw: u8, code: Option<u32> },
}

impl Notification {
    #[must_use]
    pub const fn key(event: SonyEvent) -> Self {
        Self::Key {
            event,
            input: event.input(),
        }
    }
}

/// Receives notifications once the device lock has been released.
pub trait EventSink {
    fn report(&mut self, notification: &Notification);
}

impl<F: FnMut(&Notification)> EventSink for F {
    fn report(&mut self, notification: &Notification) {
        self(notification);
    }
}
