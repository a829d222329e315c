//! Controller generations and their event tables.

use crate::events::SonyEvent as E;
use bitflags::bitflags;

/// Vendor ID of every bridge that identifies a generation.
pub const PCI_VENDOR_INTEL: u16 = 0x8086;

/// A PCI device present on the machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PciId {
    pub vendor: u16,
    pub device: u16,
}

impl PciId {
    #[must_use]
    pub const fn intel(device: u16) -> Self {
        Self {
            vendor: PCI_VENDOR_INTEL,
            device,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpicModel {
    Type1,
    Type2,
    Type3,
}

/// Bridges that pin down the generation, checked in order.
const BRIDGES: [(u16, SpicModel); 5] = [
    (0x7113, SpicModel::Type1), // 82371AB_3
    (0x266a, SpicModel::Type2), // ICH6_1
    (0x27b9, SpicModel::Type3), // ICH7_1
    (0x2815, SpicModel::Type3), // ICH8_4
    (0x2917, SpicModel::Type3), // ICH9_1
];

impl SpicModel {
    /// Generation from the PCI devices present; defaults to type 2.
    #[must_use]
    pub fn detect(present: &[PciId]) -> Self {
        BRIDGES
            .iter()
            .find(|&&(device, _)| present.contains(&PciId::intel(device)))
            .map_or(Self::Type2, |&(_, model)| model)
    }

    /// Offset of the event data port from `io1`, used when the controller
    /// has no second I/O range.
    #[must_use]
    pub const fn evport_offset(self) -> u16 {
        match self {
            Self::Type1 => 0x04,
            Self::Type2 | Self::Type3 => 0x12,
        }
    }

    #[must_use]
    pub const fn classes(self) -> &'static [EventClassEntry] {
        match self {
            Self::Type1 => TYPE1,
            Self::Type2 => TYPE2,
            Self::Type3 => TYPE3,
        }
    }
}

bitflags! {
    /// Event classes a user may filter on.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct EventClass: u32 {
        const JOGGER = 0x0001;
        const CAPTURE = 0x0002;
        const FNKEY = 0x0004;
        const BLUETOOTH = 0x0008;
        const PKEY = 0x0010;
        const BACK = 0x0020;
        const HELP = 0x0040;
        const LID = 0x0080;
        const ZOOM = 0x0100;
        const THUMBPHRASE = 0x0200;
        const MEYE = 0x0400;
        const MEMORYSTICK = 0x0800;
        const BATTERY = 0x1000;
        const WIRELESS = 0x2000;
    }
}

/// Matches every filter, including bits no class uses.
const ANY: EventClass = EventClass::from_bits_retain(u32::MAX);

type Events = &'static [(u8, E)];

/// One row of a generation's class table.
#[derive(Debug)]
pub struct EventClassEntry {
    /// Bits that must all be set in the data mask.
    pub data: u8,
    pub mask: EventClass,
    pub events: Events,
}

const fn class(data: u8, mask: EventClass, events: Events) -> EventClassEntry {
    EventClassEntry { data, mask, events }
}

const RELEASE: Events = &[(0x00, E::AnyButtonReleased)];

const JOGGER: Events = &[
    (0x1f, E::JogDialUp),
    (0x01, E::JogDialDown),
    (0x5f, E::JogDialUpPressed),
    (0x41, E::JogDialDownPressed),
    (0x1e, E::JogDialFastUp),
    (0x02, E::JogDialFastDown),
    (0x5e, E::JogDialFastUpPressed),
    (0x42, E::JogDialFastDownPressed),
    (0x1d, E::JogDialVFastUp),
    (0x03, E::JogDialVFastDown),
    (0x5d, E::JogDialVFastUpPressed),
    (0x43, E::JogDialVFastDownPressed),
    (0x40, E::JogDialPressed),
];

const CAPTURE: Events = &[
    (0x05, E::CapturePartialPressed),
    (0x07, E::CapturePressed),
    (0x40, E::CapturePressed),
    (0x01, E::CapturePartialReleased),
];

const FNKEY: Events = &[
    (0x10, E::FnKeyEsc),
    (0x11, E::FnKeyF1),
    (0x12, E::FnKeyF2),
    (0x13, E::FnKeyF3),
    (0x14, E::FnKeyF4),
    (0x15, E::FnKeyF5),
    (0x16, E::FnKeyF6),
    (0x17, E::FnKeyF7),
    (0x18, E::FnKeyF8),
    (0x19, E::FnKeyF9),
    (0x1a, E::FnKeyF10),
    (0x1b, E::FnKeyF11),
    (0x1c, E::FnKeyF12),
    (0x1f, E::FnKeyReleased),
    (0x21, E::FnKey1),
    (0x22, E::FnKey2),
    (0x31, E::FnKeyD),
    (0x32, E::FnKeyE),
    (0x33, E::FnKeyF),
    (0x34, E::FnKeyS),
    (0x35, E::FnKeyB),
    (0x36, E::FnKeyOnly),
];

const PKEY: Events = &[
    (0x01, E::PKeyP1),
    (0x02, E::PKeyP2),
    (0x04, E::PKeyP3),
    (0x20, E::PKeyP1),
];

const BLUETOOTH: Events = &[
    (0x55, E::BluetoothPressed),
    (0x59, E::BluetoothOn),
    (0x5a, E::BluetoothOff),
];

const WIRELESS: Events = &[(0x59, E::WirelessOn), (0x5a, E::WirelessOff)];
const BACK: Events = &[(0x20, E::BackPressed)];
const HELP: Events = &[(0x3b, E::HelpPressed)];
const LID: Events = &[(0x51, E::LidClosed), (0x50, E::LidOpened)];

const ZOOM: Events = &[
    (0x39, E::ZoomPressed),
    (0x10, E::ZoomInPressed),
    (0x20, E::ZoomOutPressed),
    (0x04, E::ZoomPressed),
];

const THUMBPHRASE: Events = &[(0x3a, E::ThumbPhrasePressed)];
const MEYE: Events = &[(0x00, E::MEyeFace), (0x01, E::MEyeOpposite)];
const MEMORYSTICK: Events = &[(0x53, E::MemoryStickInsert), (0x54, E::MemoryStickEject)];
const BATTERY: Events = &[(0x20, E::BatteryInsert), (0x30, E::BatteryRemove)];
const VOLUME: Events = &[(0x01, E::VolumeUpPressed), (0x02, E::VolumeDownPressed)];
const BRIGHTNESS: Events = &[(0x80, E::BrightnessPressed)];

const TYPE1: &[EventClassEntry] = &[
    class(0x00, ANY, RELEASE),
    class(0x70, EventClass::MEYE, MEYE),
    class(0x30, EventClass::LID, LID),
    class(0x60, EventClass::CAPTURE, CAPTURE),
    class(0x10, EventClass::JOGGER, JOGGER),
    class(0x20, EventClass::FNKEY, FNKEY),
    class(0x30, EventClass::BLUETOOTH, BLUETOOTH),
    class(0x40, EventClass::PKEY, PKEY),
    class(0x30, EventClass::MEMORYSTICK, MEMORYSTICK),
    class(0x40, EventClass::BATTERY, BATTERY),
];

const TYPE2: &[EventClassEntry] = &[
    class(0x00, ANY, RELEASE),
    class(0x38, EventClass::LID, LID),
    class(0x11, EventClass::JOGGER, JOGGER),
    class(0x61, EventClass::CAPTURE, CAPTURE),
    class(0x21, EventClass::FNKEY, FNKEY),
    class(0x31, EventClass::BLUETOOTH, BLUETOOTH),
    class(0x08, EventClass::PKEY, PKEY),
    class(0x11, EventClass::BACK, BACK),
    class(0x21, EventClass::HELP, HELP),
    class(0x21, EventClass::ZOOM, ZOOM),
    class(0x20, EventClass::THUMBPHRASE, THUMBPHRASE),
    class(0x31, EventClass::MEMORYSTICK, MEMORYSTICK),
    class(0x41, EventClass::BATTERY, BATTERY),
    class(0x31, EventClass::PKEY, PKEY),
];

const TYPE3: &[EventClassEntry] = &[
    class(0x00, ANY, RELEASE),
    class(0x21, EventClass::FNKEY, FNKEY),
    class(0x31, EventClass::WIRELESS, WIRELESS),
    class(0x31, EventClass::MEMORYSTICK, MEMORYSTICK),
    class(0x41, EventClass::BATTERY, BATTERY),
    class(0x31, EventClass::PKEY, PKEY),
    class(0x05, EventClass::PKEY, PKEY),
    class(0x05, EventClass::ZOOM, ZOOM),
    class(0x05, EventClass::CAPTURE, CAPTURE),
    class(0x05, EventClass::PKEY, VOLUME),
    class(0x05, EventClass::PKEY, BRIGHTNESS),
];

/// Find the event for `(ev, data_mask)` among the classes `filter` lets
/// through. Rows are tried in order; a row whose data bits match but which
/// lacks `ev` does not end the search.
#[must_use]
pub fn decode(model: SpicModel, filter: EventClass, ev: u8, data_mask: u8) -> Option<E> {
    if ev == 0x00 || ev == 0xff {
        return None;
    }
    model
        .classes()
        .iter()
        .filter(|c| data_mask & c.data == c.data && filter.intersects(c.mask))
        .find_map(|c| c.events.iter().find(|&&(data, _)| data == ev))
        .map(|&(_, event)| event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_from_bridges() {
        assert_eq!(SpicModel::detect(&[]), SpicModel::Type2);
        assert_eq!(SpicModel::detect(&[PciId::intel(0x7113)]), SpicModel::Type1);
        assert_eq!(
            SpicModel::detect(&[PciId::intel(0x1234), PciId::intel(0x2815)]),
            SpicModel::Type3
        );
        let foreign = PciId {
            vendor: 0x10de,
            device: 0x7113,
        };
        assert_eq!(SpicModel::detect(&[foreign]), SpicModel::Type2);
    }

    #[test]
    fn first_matching_row_wins() {
        // 0x31 matches the wireless row before the memory stick row
        assert_eq!(
            decode(SpicModel::Type3, EventClass::all(), 0x59, 0x31),
            Some(E::WirelessOn)
        );
        // without the wireless class the same code is unknown
        let filter = EventClass::all() - EventClass::WIRELESS;
        assert_eq!(decode(SpicModel::Type3, filter, 0x59, 0x31), None);
        // a row lacking the code does not stop the search
        assert_eq!(
            decode(SpicModel::Type3, EventClass::all(), 0x53, 0x31),
            Some(E::MemoryStickInsert)
        );
    }

    #[test]
    fn data_bits_must_all_be_present() {
        assert_eq!(
            decode(SpicModel::Type1, EventClass::all(), 0x1f, 0x10),
            Some(E::JogDialUp)
        );
        assert_eq!(decode(SpicModel::Type1, EventClass::all(), 0x1f, 0x00), None);
    }

    #[test]
    fn idle_codes_are_ignored() {
        for model in [SpicModel::Type1, SpicModel::Type2, SpicModel::Type3] {
            assert_eq!(decode(model, EventClass::all(), 0x00, 0xff), None);
            assert_eq!(decode(model, EventClass::all(), 0xff, 0xff), None);
        }
    }
}
