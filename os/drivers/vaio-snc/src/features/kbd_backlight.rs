//! Keyboard backlight mode and idle timeout.

use crate::attribute::{Attribute, parse_bounded};
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
use log::{debug, warn};

pub const CAPABILITIES: &[CapabilityCode] = &[0x0137, 0x0143, 0x014b, 0x014c, 0x0153, 0x0163];

/// Highest mode: 0 off, 1 automatic (lit on activity until the timeout), 2 on.
pub const MAX_MODE: u8 = 2;
pub const MAX_TIMEOUT: u8 = 3;

/// Presence probe and command base of a handle generation.
const fn layout(capability: CapabilityCode) -> (u32, u32, u32) {
    match capability {
        // (probe command, presence bit, command base)
        0x0137 => (0x0b00, 0x2, 0x0c00),
        _ => (0x0100, 0x1, 0x4000),
    }
}

pub struct KbdBacklight {
    capability: CapabilityCode,
    base: u32,
    has_timeout: bool,
    mode: u8,
    timeout: u8,
}

impl KbdBacklight {
    pub(super) fn detect(
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        let Some(capability) = cap else {
            return Ok(None);
        };
        let (probe, bit, base) = layout(capability);
        if fw.invoke(capability, probe)? & bit == 0 {
            debug!("no keyboard backlight behind {capability:#06x}");
            return Ok(None);
        }

        let mut kbd = Self {
            capability,
            base,
            has_timeout: capability != 0x0153,
            mode: 0,
            timeout: 0,
        };
        if let Some(mode) = config.kbd_backlight.filter(|&m| m <= MAX_MODE) {
            kbd.set_mode(fw, mode)?;
        }
        if kbd.has_timeout
            && let Some(timeout) = config.kbd_backlight_timeout.filter(|&t| t <= MAX_TIMEOUT)
        {
            kbd.set_timeout(fw, timeout)?;
        }
        Ok(Some(Box::new(kbd)))
    }

    fn set_mode(&mut self, fw: &mut Dispatcher, mode: u8) -> Result<(), DispatchError> {
        let v = u32::from(mode);
        fw.invoke(self.capability, (v << 16) | self.base)?;
        // force the light to the new state; automatic (1) has none to force
        if mode != 1 {
            fw.invoke(self.capability, (v << 15) | (self.base + 0x100))?;
        }
        self.mode = mode;
        Ok(())
    }

    fn set_timeout(&mut self, fw: &mut Dispatcher, timeout: u8) -> Result<(), DispatchError> {
        fw.invoke(self.capability, (u32::from(timeout) << 16) | (self.base + 0x200))?;
        self.timeout = timeout;
        Ok(())
    }
}

impl Feature for KbdBacklight {
    fn attributes(&self) -> Vec<Attribute> {
        let mut attrs = vec![Attribute::rw("kbd_backlight")];
        if self.has_timeout {
            attrs.push(Attribute::rw("kbd_backlight_timeout"));
        }
        attrs
    }

    fn show(&mut self, _fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError> {
        match attr {
            "kbd_backlight" => Ok(format!("{}", self.mode)),
            "kbd_backlight_timeout" if self.has_timeout => Ok(format!("{}", self.timeout)),
            _ => Err(AttributeError::NoSuchAttribute),
        }
    }

    fn store(&mut self, fw: &mut Dispatcher, attr: &str, input: &str) -> Result<(), AttributeError> {
        match attr {
            "kbd_backlight" => {
                let v = parse_bounded(input, MAX_MODE.into())?;
                self.set_mode(fw, u8::try_from(v).unwrap_or(MAX_MODE))?;
            }
            "kbd_backlight_timeout" if self.has_timeout => {
                let v = parse_bounded(input, MAX_TIMEOUT.into())?;
                self.set_timeout(fw, u8::try_from(v).unwrap_or(MAX_TIMEOUT))?;
            }
            _ => return Err(AttributeError::NoSuchAttribute),
        }
        Ok(())
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        self.set_mode(fw, self.mode)?;
        if self.has_timeout {
            self.set_timeout(fw, self.timeout)?;
        }
        Ok(())
    }

    fn cleanup(&mut self, fw: &mut Dispatcher) {
        for cmd in [self.base | 0x1_0000, self.base + 0x200] {
            if let Err(err) = fw.invoke(self.capability, cmd) {
                warn!("kbd backlight: cleanup call {cmd:#x} failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts() {
        assert_eq!(layout(0x0137), (0x0b00, 0x2, 0x0c00));
        assert_eq!(layout(0x0163), (0x0100, 0x1, 0x4000));
    }
}
