//! Handle-routed notifications.
//!
//! For codes `0x90 + offset` the capability at `offset` decides what the
//! notification means. Hotkey handles need a second call to learn which key
//! fired; radio, light sensor and graphics handles carry a reason word; the
//! shock sensor's arrival alone is the signal.

use super::EventTableId;
use crate::handles::{CapabilityCode, HandleOffset};
use bitfield_struct::bitfield;

/// Reads the pending key code from a hotkey handle.
pub const HOTKEY_QUERY: u32 = 0x0200;
/// Reads the reason word from a radio handle.
pub const RADIO_QUERY: u32 = 0x0100;
/// Reads the reason word from a light sensor handle.
pub const ALS_QUERY: u32 = 0x0a00;
/// Reads the reason word from a graphics switch handle.
pub const GFX_QUERY: u32 = 0x0000;

/// Offset that reports the speed/stamina switch on machines without a
/// capability there.
pub const SPEED_STAMINA_OFFSET: HandleOffset = 0x0c;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Route {
    Hotkeys(EventTableId),
    Radio,
    Als,
    Shock,
    GfxSwitch,
    SpeedStamina,
    Generic,
}

/// Decide how to read a notification for `offset`.
#[must_use]
pub const fn route(capability: Option<CapabilityCode>, offset: HandleOffset, has_hsc1: bool) -> Route {
    match capability {
        Some(0x0100) => Route::Hotkeys(EventTableId::Hotkeys100),
        Some(0x0127) => Route::Hotkeys(EventTableId::Hotkeys127),
        Some(0x0124 | 0x0135) => Route::Radio,
        Some(0x012f | 0x0137) => Route::Als,
        Some(0x0134) => Route::Shock,
        Some(0x0128 | 0x0146 | 0x015b) => Route::GfxSwitch,
        None if offset == SPEED_STAMINA_OFFSET && has_hsc1 => Route::SpeedStamina,
        _ => Route::Generic,
    }
}

/// Why a radio handle notified.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RadioReason {
    /// The hardware kill switch moved.
    SwitchToggled,
    /// A battery was inserted or removed; WWAN depends on it.
    BatteryChanged,
    Other(u8),
}

impl RadioReason {
    #[must_use]
    pub const fn from_word(word: u32) -> Self {
        match word & 0x03 {
            1 => Self::SwitchToggled,
            2 => Self::BatteryChanged,
            #[allow(clippy::cast_possible_truncation)]
            other => Self::Other(other as u8),
        }
    }
}

/// Why a light sensor handle notified.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct AlsReason {
    /// Ambient light crossed a threshold; re-arm and recompute.
    pub lighting_changed: bool,
    /// The firmware changed the managed backlight level.
    pub level_changed: bool,
    #[bits(30)]
    __: u32,
}

/// Why a graphics switch handle notified.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GfxReason {
    ModeSwitch,
    OutputSwitch,
    Other(u8),
}

impl GfxReason {
    #[must_use]
    pub const fn from_word(word: u32) -> Self {
        match word & 0xff {
            1 => Self::ModeSwitch,
            2 => Self::OutputSwitch,
            #[allow(clippy::cast_possible_truncation)]
            other => Self::Other(other as u8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_capability() {
        assert_eq!(route(Some(0x0127), 0, false), Route::Hotkeys(EventTableId::Hotkeys127));
        assert_eq!(route(Some(0x0135), 4, false), Route::Radio);
        assert_eq!(route(Some(0x0134), 4, false), Route::Shock);
        assert_eq!(route(Some(0x0155), 4, false), Route::Generic);
    }

    #[test]
    fn speed_stamina_needs_hsc1_and_an_empty_slot() {
        assert_eq!(route(None, 0x0c, true), Route::SpeedStamina);
        assert_eq!(route(None, 0x0c, false), Route::Generic);
        assert_eq!(route(Some(0x0100), 0x0c, true), Route::Hotkeys(EventTableId::Hotkeys100));
    }

    #[test]
    fn reasons_use_masks() {
        assert_eq!(RadioReason::from_word(0x0101), RadioReason::SwitchToggled);
        assert_eq!(RadioReason::from_word(0x06), RadioReason::BatteryChanged);
        let als = AlsReason::from_bits(0b11);
        assert!(als.lighting_changed());
        assert!(als.level_changed());
        assert!(!AlsReason::from_bits(0b10).lighting_changed());
    }
}
