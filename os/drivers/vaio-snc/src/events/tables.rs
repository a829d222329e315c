use super::SonyEvent as E;
use super::SonyEvent;

/// Ordered `(raw, event)` pairs; the first entry with a matching raw code
/// wins. Raw code zero never matches.
pub type EventTable = &'static [(u8, SonyEvent)];

pub const HOTKEYS_100: EventTable = &[
    (0x90, E::PKeyP1),
    (0x10, E::AnyButtonReleased),
    (0x91, E::PKeyP2),
    (0x11, E::AnyButtonReleased),
    (0x81, E::FnKeyF1),
    (0x01, E::FnKeyReleased),
    (0x82, E::FnKeyF2),
    (0x02, E::FnKeyReleased),
    (0x83, E::FnKeyF3),
    (0x03, E::FnKeyReleased),
    (0x84, E::FnKeyF4),
    (0x04, E::FnKeyReleased),
    (0x85, E::FnKeyF5),
    (0x05, E::FnKeyReleased),
    (0x86, E::FnKeyF6),
    (0x06, E::FnKeyReleased),
    (0x87, E::FnKeyF7),
    (0x07, E::FnKeyReleased),
    (0x89, E::FnKeyF9),
    (0x09, E::FnKeyReleased),
    (0x8A, E::FnKeyF10),
    (0x0A, E::FnKeyReleased),
    (0x8C, E::FnKeyF12),
    (0x0C, E::FnKeyReleased),
    (0x9f, E::CdEjectPressed),
    (0x1f, E::AnyButtonReleased),
];

// 0x06 is listed twice in firmware tables seen in the field.
pub const HOTKEYS_127: EventTable = &[
    (0x81, E::ModeKeyPressed),
    (0x01, E::AnyButtonReleased),
    (0x82, E::PKeyP1),
    (0x02, E::AnyButtonReleased),
    (0x83, E::PKeyP2),
    (0x03, E::AnyButtonReleased),
    (0x84, E::PKeyP3),
    (0x04, E::AnyButtonReleased),
    (0x85, E::PKeyP4),
    (0x05, E::AnyButtonReleased),
    (0x86, E::PKeyP5),
    (0x06, E::AnyButtonReleased),
    (0x06, E::AnyButtonReleased),
    (0x87, E::SettingKeyPressed),
    (0x07, E::AnyButtonReleased),
];

#[must_use]
pub fn lookup(table: EventTable, raw: u8) -> Option<SonyEvent> {
    if raw == 0 {
        return None;
    }
    table.iter().find(|&&(data, _)| data == raw).map(|&(_, ev)| ev)
}
