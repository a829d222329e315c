use super::SonyEvent;

/// Linux input event codes used by the key map.
mod code {
    pub const KEY_VOLUMEDOWN: u16 = 114;
    pub const KEY_VOLUMEUP: u16 = 115;
    pub const KEY_HELP: u16 = 138;
    pub const KEY_PROG1: u16 = 148;
    pub const KEY_PROG2: u16 = 149;
    pub const KEY_BACK: u16 = 158;
    pub const KEY_EJECTCD: u16 = 161;
    pub const KEY_F13: u16 = 183;
    pub const KEY_F14: u16 = 184;
    pub const KEY_F15: u16 = 185;
    pub const KEY_PROG3: u16 = 202;
    pub const KEY_PROG4: u16 = 203;
    pub const KEY_CAMERA: u16 = 212;
    pub const KEY_BLUETOOTH: u16 = 237;
    pub const KEY_WLAN: u16 = 238;
    pub const BTN_MIDDLE: u16 = 0x112;
    pub const BTN_THUMB: u16 = 0x121;
    pub const KEY_ZOOM: u16 = 0x174;
    pub const KEY_ZOOMIN: u16 = 0x1a2;
    pub const KEY_ZOOMOUT: u16 = 0x1a3;
    pub const KEY_FN: u16 = 0x1d0;
    pub const KEY_FN_ESC: u16 = 0x1d1;
    pub const KEY_FN_F1: u16 = 0x1d2;
    pub const KEY_FN_D: u16 = 0x1e0;
    pub const KEY_FN_E: u16 = 0x1e1;
    pub const KEY_FN_F: u16 = 0x1e2;
    pub const KEY_FN_S: u16 = 0x1e3;
    pub const KEY_FN_B: u16 = 0x1e4;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputDevice {
    Keyboard,
    JogDial,
}

/// What the input collaborator should emit for an event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputReport {
    /// Relative wheel motion on the jog dial.
    Wheel(i8),
    /// Key press; the host releases it shortly after. `scancode` is the
    /// event number so the key stays remappable.
    Key {
        device: InputDevice,
        code: u16,
        scancode: u8,
    },
}

impl SonyEvent {
    /// Key code on the keyboard device, if the event maps to one.
    #[must_use]
    pub const fn keycode(self) -> Option<u16> {
        let key = match self {
            Self::CapturePressed => code::KEY_CAMERA,
            Self::FnKeyEsc => code::KEY_FN_ESC,
            Self::FnKeyF1
            | Self::FnKeyF2
            | Self::FnKeyF3
            | Self::FnKeyF4
            | Self::FnKeyF5
            | Self::FnKeyF6
            | Self::FnKeyF7
            | Self::FnKeyF8
            | Self::FnKeyF9
            | Self::FnKeyF10
            | Self::FnKeyF11
            | Self::FnKeyF12 => code::KEY_FN_F1 + (self as u16 - Self::FnKeyF1 as u16),
            // the numbered Fn keys share codes with F1/F2
            Self::FnKey1 => code::KEY_FN_F1,
            Self::FnKey2 => code::KEY_FN_F1 + 1,
            Self::FnKeyD => code::KEY_FN_D,
            Self::FnKeyE => code::KEY_FN_E,
            Self::FnKeyF => code::KEY_FN_F,
            Self::FnKeyS => code::KEY_FN_S,
            Self::FnKeyB => code::KEY_FN_B,
            Self::BluetoothPressed | Self::BluetoothOn | Self::BluetoothOff => code::KEY_BLUETOOTH,
            Self::PKeyP1 => code::KEY_PROG1,
            Self::PKeyP2 => code::KEY_PROG2,
            Self::PKeyP3 => code::KEY_PROG3,
            Self::PKeyP4 => code::KEY_PROG4,
            Self::PKeyP5 => code::KEY_F14,
            Self::BackPressed => code::KEY_BACK,
            Self::HelpPressed => code::KEY_HELP,
            Self::FnKeyOnly => code::KEY_FN,
            Self::ZoomPressed => code::KEY_ZOOM,
            Self::ThumbPhrasePressed => code::BTN_THUMB,
            Self::WirelessOn | Self::WirelessOff => code::KEY_WLAN,
            Self::ZoomInPressed => code::KEY_ZOOMIN,
            Self::ZoomOutPressed => code::KEY_ZOOMOUT,
            Self::CdEjectPressed => code::KEY_EJECTCD,
            Self::ModeKeyPressed => code::KEY_F13,
            Self::SettingKeyPressed => code::KEY_F15,
            Self::VolumeUpPressed => code::KEY_VOLUMEUP,
            Self::VolumeDownPressed => code::KEY_VOLUMEDOWN,
            _ => return None,
        };
        Some(key)
    }

    /// Translate to an input report; `None` for events without one.
    #[must_use]
    pub const fn input(self) -> Option<InputReport> {
        match self {
            Self::JogDialUp | Self::JogDialUpPressed => Some(InputReport::Wheel(1)),
            Self::JogDialDown | Self::JogDialDownPressed => Some(InputReport::Wheel(-1)),
            Self::JogDialPressed => Some(InputReport::Key {
                device: InputDevice::JogDial,
                code: code::BTN_MIDDLE,
                scancode: self.code(),
            }),
            _ => match self.keycode() {
                Some(code) => Some(InputReport::Key {
                    device: InputDevice::Keyboard,
                    code,
                    scancode: self.code(),
                }),
                None => None,
            },
        }
    }
}
