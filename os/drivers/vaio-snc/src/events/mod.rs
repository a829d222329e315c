//! Notification decoding.
//!
//! Notifications arrive as a single byte. Codes below `0x90` are the event
//! number itself; codes from `0x90` up name a handle offset whose capability
//! decides how to read the actual event (see [`route`]).

mod input;
pub mod route;
pub(crate) mod tables;

pub use input::{InputDevice, InputReport};
pub use route::{AlsReason, GfxReason, RadioReason, Route};

/// Raw notification codes from here on are handle-routed.
pub const HANDLE_EVENT_BASE: u8 = 0x90;

/// Semantic events, numbered as the vendor utilities number them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SonyEvent {
    JogDialDown = 1,
    JogDialUp = 2,
    JogDialDownPressed = 3,
    JogDialUpPressed = 4,
    JogDialPressed = 5,
    JogDialReleased = 6,
    CapturePressed = 7,
    CaptureReleased = 8,
    CapturePartialPressed = 9,
    CapturePartialReleased = 10,
    FnKeyEsc = 11,
    FnKeyF1 = 12,
    FnKeyF2 = 13,
    FnKeyF3 = 14,
    FnKeyF4 = 15,
    FnKeyF5 = 16,
    FnKeyF6 = 17,
    FnKeyF7 = 18,
    FnKeyF8 = 19,
    FnKeyF9 = 20,
    FnKeyF10 = 21,
    FnKeyF11 = 22,
    FnKeyF12 = 23,
    FnKey1 = 24,
    FnKey2 = 25,
    FnKeyD = 26,
    FnKeyE = 27,
    FnKeyF = 28,
    FnKeyS = 29,
    FnKeyB = 30,
    BluetoothPressed = 31,
    PKeyP1 = 32,
    PKeyP2 = 33,
    PKeyP3 = 34,
    BackPressed = 35,
    LidClosed = 36,
    LidOpened = 37,
    BluetoothOn = 38,
    BluetoothOff = 39,
    HelpPressed = 40,
    FnKeyOnly = 41,
    JogDialFastDown = 42,
    JogDialFastUp = 43,
    JogDialFastDownPressed = 44,
    JogDialFastUpPressed = 45,
    JogDialVFastDown = 46,
    JogDialVFastUp = 47,
    JogDialVFastDownPressed = 48,
    JogDialVFastUpPressed = 49,
    ZoomPressed = 50,
    ThumbPhrasePressed = 51,
    MEyeFace = 52,
    MEyeOpposite = 53,
    MemoryStickInsert = 54,
    MemoryStickEject = 55,
    AnyButtonReleased = 56,
    BatteryInsert = 57,
    BatteryRemove = 58,
    FnKeyReleased = 59,
    WirelessOn = 60,
    WirelessOff = 61,
    ZoomInPressed = 62,
    ZoomOutPressed = 63,
    CdEjectPressed = 64,
    ModeKeyPressed = 65,
    PKeyP4 = 66,
    PKeyP5 = 67,
    SettingKeyPressed = 68,
    VolumeUpPressed = 69,
    VolumeDownPressed = 70,
    BrightnessPressed = 71,
}

use SonyEvent as E;

#[rustfmt::skip]
const ALL: [SonyEvent; 71] = [
    E::JogDialDown, E::JogDialUp, E::JogDialDownPressed, E::JogDialUpPressed,
    E::JogDialPressed, E::JogDialReleased, E::CapturePressed, E::CaptureReleased,
    E::CapturePartialPressed, E::CapturePartialReleased, E::FnKeyEsc, E::FnKeyF1, E::FnKeyF2,
    E::FnKeyF3, E::FnKeyF4, E::FnKeyF5, E::FnKeyF6, E::FnKeyF7, E::FnKeyF8, E::FnKeyF9,
    E::FnKeyF10, E::FnKeyF11, E::FnKeyF12, E::FnKey1, E::FnKey2, E::FnKeyD, E::FnKeyE,
    E::FnKeyF, E::FnKeyS, E::FnKeyB, E::BluetoothPressed, E::PKeyP1, E::PKeyP2, E::PKeyP3,
    E::BackPressed, E::LidClosed, E::LidOpened, E::BluetoothOn, E::BluetoothOff,
    E::HelpPressed, E::FnKeyOnly, E::JogDialFastDown, E::JogDialFastUp,
    E::JogDialFastDownPressed, E::JogDialFastUpPressed, E::JogDialVFastDown,
    E::JogDialVFastUp, E::JogDialVFastDownPressed, E::JogDialVFastUpPressed, E::ZoomPressed,
    E::ThumbPhrasePressed, E::MEyeFace, E::MEyeOpposite, E::MemoryStickInsert,
    E::MemoryStickEject, E::AnyButtonReleased, E::BatteryInsert, E::BatteryRemove,
    E::FnKeyReleased, E::WirelessOn, E::WirelessOff, E::ZoomInPressed, E::ZoomOutPressed,
    E::CdEjectPressed, E::ModeKeyPressed, E::PKeyP4, E::PKeyP5, E::SettingKeyPressed,
    E::VolumeUpPressed, E::VolumeDownPressed, E::BrightnessPressed,
];

impl SonyEvent {
    /// Event with vendor number `code`; zero is "no event".
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        ALL.get(usize::from(code).checked_sub(1)?).copied()
    }

    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Translation table selected for a notification source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventTableId {
    /// Direct path: the raw code is the event number.
    Legacy,
    /// Hotkey capability `0x0100`.
    Hotkeys100,
    /// Hotkey capability `0x0127`.
    Hotkeys127,
}

impl EventTableId {
    pub const ALL: [Self; 3] = [Self::Legacy, Self::Hotkeys100, Self::Hotkeys127];
}

/// Map a raw code to its event. Total over all inputs; never panics.
#[must_use]
pub fn decode(generation: EventTableId, raw_code: u8) -> Option<SonyEvent> {
    let table = match generation {
        EventTableId::Legacy => return SonyEvent::from_code(raw_code),
        EventTableId::Hotkeys100 => tables::HOTKEYS_100,
        EventTableId::Hotkeys127 => tables::HOTKEYS_127,
    };
    tables::lookup(table, raw_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_is_dense() {
        for (i, e) in ALL.iter().enumerate() {
            assert_eq!(usize::from(e.code()), i + 1);
        }
        assert_eq!(SonyEvent::from_code(0), None);
        assert_eq!(SonyEvent::from_code(72), None);
        assert_eq!(SonyEvent::from_code(71), Some(E::BrightnessPressed));
    }

    #[test]
    fn direct_codes() {
        assert_eq!(decode(EventTableId::Legacy, 0x07), Some(E::CapturePressed));
        assert_eq!(decode(EventTableId::Legacy, 56), Some(E::AnyButtonReleased));
        assert_eq!(decode(EventTableId::Legacy, 0x90), None);
    }

    #[test]
    fn hotkey_tables() {
        assert_eq!(decode(EventTableId::Hotkeys100, 0x10), Some(E::AnyButtonReleased));
        assert_eq!(decode(EventTableId::Hotkeys100, 0x90), Some(E::PKeyP1));
        assert_eq!(decode(EventTableId::Hotkeys100, 0x8c), Some(E::FnKeyF12));
        assert_eq!(decode(EventTableId::Hotkeys100, 0x88), None);
        assert_eq!(decode(EventTableId::Hotkeys127, 0x81), Some(E::ModeKeyPressed));
        assert_eq!(decode(EventTableId::Hotkeys127, 0x06), Some(E::AnyButtonReleased));
        assert_eq!(decode(EventTableId::Hotkeys127, 0x87), Some(E::SettingKeyPressed));
    }

    #[test]
    fn zero_is_never_an_event() {
        for id in EventTableId::ALL {
            assert_eq!(decode(id, 0), None);
        }
    }
}
