//! Every feature the control device can carry.
//!
//! Handle-backed kinds list the capabilities that implement them and are
//! matched against the probed handle table in offset order. Platform kinds
//! have no capability and are detected from method presence afterwards.

mod als;
mod backlight;
mod battery_care;
mod fan;
mod gfx;
mod hotkeys;
mod kbd_backlight;
mod lid_resume;
mod radio;
mod shock;
mod speed_stamina;
mod thermal;
mod toggle;
mod values;

pub use als::{
    AlsDevice, AlsProbe, AlsState, EcManaged, Lux, Photodiode, photodiode_kelvin, photodiode_lux,
    threshold_window,
};
pub use backlight::{Backlight, MAX_BRIGHTNESS};
pub use battery_care::{decode_limit, encode_limit};
pub use gfx::decode_status;
pub use radio::{RadioDeviceState, RadioError, RadioKind, RadioState, RadioStatus, Radios};
pub use speed_stamina::{OVGA_REVISION, OVGA_UUID};
pub use thermal::ThermalMode;
pub use toggle::ToggleDef;
pub use values::{NamedValue, SONY_MAX_BRIGHTNESS, VALUES, Validator};

use crate::lifecycle::FeatureKind;

pub static REGISTRY: [FeatureKind; 17] = [
    FeatureKind {
        name: "hotkeys",
        capabilities: hotkeys::CAPABILITIES,
        detect: hotkeys::Hotkeys::detect,
    },
    FeatureKind {
        name: "rfkill",
        capabilities: radio::CAPABILITIES,
        detect: radio::Radios::detect,
    },
    FeatureKind {
        name: "als",
        capabilities: als::CAPABILITIES,
        detect: als::Als::detect,
    },
    FeatureKind {
        name: "kbd_backlight",
        capabilities: kbd_backlight::CAPABILITIES,
        detect: kbd_backlight::KbdBacklight::detect,
    },
    FeatureKind {
        name: "battery_care",
        capabilities: battery_care::CAPABILITIES,
        detect: battery_care::BatteryCare::detect,
    },
    FeatureKind {
        name: "lowbatt",
        capabilities: toggle::LOW_BATTERY.capabilities,
        detect: toggle::Toggle::detect_low_battery,
    },
    FeatureKind {
        name: "lid_resume",
        capabilities: lid_resume::CAPABILITIES,
        detect: lid_resume::LidResume::detect,
    },
    FeatureKind {
        name: "thermal",
        capabilities: thermal::CAPABILITIES,
        detect: thermal::Thermal::detect,
    },
    FeatureKind {
        name: "fan",
        capabilities: fan::CAPABILITIES,
        detect: fan::Fan::detect,
    },
    FeatureKind {
        name: "touchpad",
        capabilities: toggle::TOUCHPAD.capabilities,
        detect: toggle::Toggle::detect_touchpad,
    },
    FeatureKind {
        name: "gfx_switch",
        capabilities: gfx::CAPABILITIES,
        detect: gfx::GfxSwitch::detect,
    },
    FeatureKind {
        name: "usb_charge",
        capabilities: toggle::USB_CHARGE.capabilities,
        detect: toggle::Toggle::detect_usb_charge,
    },
    FeatureKind {
        name: "highspeed_charging",
        capabilities: toggle::HIGHSPEED_CHARGING.capabilities,
        detect: toggle::Toggle::detect_highspeed_charging,
    },
    FeatureKind {
        name: "shock",
        capabilities: shock::CAPABILITIES,
        detect: shock::ShockSensor::detect,
    },
    // platform
    FeatureKind {
        name: "values",
        capabilities: &[],
        detect: values::NamedValues::detect,
    },
    FeatureKind {
        name: "backlight",
        capabilities: &[],
        detect: backlight::Backlight::detect,
    },
    FeatureKind {
        name: "speed_stamina",
        capabilities: &[],
        detect: speed_stamina::SpeedStamina::detect,
    },
];
