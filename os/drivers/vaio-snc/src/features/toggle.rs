//! Single-bit switches: low battery beep, touchpad, USB charging and
//! high-speed charging.

use crate::attribute::{Attribute, parse_bool};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError};
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// Wire layout of one switch.
#[derive(Debug)]
pub struct ToggleDef {
    pub attribute: &'static str,
    pub capabilities: &'static [CapabilityCode],
    /// Command whose bit 0 must be set for the switch to exist.
    pub probe: Option<u32>,
    pub get: u32,
    /// Base command; the value is shifted in by `shift`.
    pub set: u32,
    pub shift: u32,
    /// Firmware bit is the negation of the exposed value.
    pub inverted: bool,
}

impl ToggleDef {
    fn set_word(&self, on: bool) -> u32 {
        (u32::from(on != self.inverted) << self.shift) | self.set
    }

    const fn decode(&self, word: u32) -> bool {
        (word & 1 == 1) != self.inverted
    }
}

pub const LOW_BATTERY: ToggleDef = ToggleDef {
    attribute: "lowbatt",
    capabilities: &[0x0121],
    probe: None,
    get: 0x0200,
    set: 0x0000,
    shift: 8,
    inverted: false,
};

pub const TOUCHPAD: ToggleDef = ToggleDef {
    attribute: "touchpad",
    capabilities: &[0x0105, 0x0148],
    probe: None,
    get: 0x0000,
    set: 0x0100,
    shift: 16,
    inverted: true,
};

pub const USB_CHARGE: ToggleDef = ToggleDef {
    attribute: "usb_charge",
    capabilities: &[0x0155],
    probe: None,
    get: 0x0000,
    set: 0x0100,
    shift: 16,
    inverted: false,
};

pub const HIGHSPEED_CHARGING: ToggleDef = ToggleDef {
    attribute: "battery_highspeed_charging",
    capabilities: &[0x0131],
    probe: Some(0x0000),
    get: 0x0100,
    set: 0x0200,
    shift: 16,
    inverted: false,
};

pub struct Toggle {
    def: &'static ToggleDef,
    capability: CapabilityCode,
    written: Option<bool>,
}

impl Toggle {
    fn detect(
        def: &'static ToggleDef,
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        let Some(capability) = cap else {
            return Ok(None);
        };
        if let Some(probe) = def.probe
            && fw.invoke(capability, probe)? & 1 == 0
        {
            return Ok(None);
        }
        Ok(Some(Box::new(Self {
            def,
            capability,
            written: None,
        })))
    }

    pub(super) fn detect_low_battery(
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        Self::detect(&LOW_BATTERY, fw, cap)
    }

    pub(super) fn detect_touchpad(
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        Self::detect(&TOUCHPAD, fw, cap)
    }

    pub(super) fn detect_usb_charge(
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        Self::detect(&USB_CHARGE, fw, cap)
    }

    pub(super) fn detect_highspeed_charging(
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        Self::detect(&HIGHSPEED_CHARGING, fw, cap)
    }
}

impl Feature for Toggle {
    fn attributes(&self) -> Vec<Attribute> {
        vec![Attribute::rw(self.def.attribute)]
    }

    fn show(&mut self, fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError> {
        if attr != self.def.attribute {
            return Err(AttributeError::NoSuchAttribute);
        }
        let word = fw.invoke(self.capability, self.def.get)?;
        Ok(format!("{}", u8::from(self.def.decode(word))))
    }

    fn store(&mut self, fw: &mut Dispatcher, attr: &str, input: &str) -> Result<(), AttributeError> {
        if attr != self.def.attribute {
            return Err(AttributeError::NoSuchAttribute);
        }
        let on = parse_bool(input)?;
        fw.invoke(self.capability, self.def.set_word(on))?;
        self.written = Some(on);
        Ok(())
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        if let Some(on) = self.written {
            fw.invoke(self.capability, self.def.set_word(on))?;
        }
        Ok(())
    }
}
