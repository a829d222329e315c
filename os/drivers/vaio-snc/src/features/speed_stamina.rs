//! Hybrid graphics selection through the discrete GPU's `_DSM`.

use crate::attribute::{Attribute, check_len};
use crate::config::{Config, GfxMode};
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError, ValidationError};
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use log::{debug, info};
use vaio_firmware::{Dsm, Method};

/// Interface UUID in firmware byte order.
pub const OVGA_UUID: [u8; 16] = [
    0xa0, 0xa0, 0x95, 0x9d, 0x60, 0x00, 0x48, 0x4d, 0xb3, 0x4d, 0x7e, 0x5f, 0xea, 0x12, 0x9f, 0xd4,
];
pub const OVGA_REVISION: u32 = 0x102;

const POWER: u32 = 3;
const LED: u32 = 2;

/// `(function, argument)` pairs selecting a mode, in call order.
const fn sequence(mode: GfxMode) -> Option<[(u32, u64); 2]> {
    match mode {
        GfxMode::Speed => Some([(POWER, 1), (LED, 0x12)]),
        GfxMode::Stamina => Some([(POWER, 2), (LED, 0x11)]),
        GfxMode::Auto => None,
    }
}

pub struct SpeedStamina {
    mode: Option<GfxMode>,
}

impl SpeedStamina {
    pub(super) fn detect(
        fw: &mut Dispatcher,
        _cap: Option<CapabilityCode>,
        config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        if !fw.has_method(Method::DSM) {
            return Ok(None);
        }
        let mut feature = Self { mode: None };
        match config.speed_stamina {
            Some(GfxMode::Auto) => debug!("speed/stamina: auto cannot be forced"),
            Some(mode) => feature.apply(fw, mode)?,
            None => {}
        }
        Ok(Some(Box::new(feature)))
    }

    fn apply(&mut self, fw: &mut Dispatcher, mode: GfxMode) -> Result<(), DispatchError> {
        let Some(steps) = sequence(mode) else {
            return Ok(());
        };
        for (function, argument) in steps {
            fw.channel().call_dsm(Dsm {
                uuid: OVGA_UUID,
                revision: OVGA_REVISION,
                function,
                argument: Some(argument),
            })?;
        }
        info!("switched to {} mode", mode.as_str());
        self.mode = Some(mode);
        Ok(())
    }
}

impl Feature for SpeedStamina {
    fn attributes(&self) -> Vec<Attribute> {
        vec![Attribute::rw("speed_stamina")]
    }

    fn show(&mut self, _fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError> {
        if attr != "speed_stamina" {
            return Err(AttributeError::NoSuchAttribute);
        }
        Ok(self.mode.unwrap_or(GfxMode::Stamina).as_str().to_string())
    }

    fn store(&mut self, fw: &mut Dispatcher, attr: &str, input: &str) -> Result<(), AttributeError> {
        if attr != "speed_stamina" {
            return Err(AttributeError::NoSuchAttribute);
        }
        let input = check_len(input)?;
        let mode = if input.starts_with("speed") {
            GfxMode::Speed
        } else if input.starts_with("stamina") {
            GfxMode::Stamina
        } else {
            return Err(ValidationError::UnknownChoice.into());
        };
        self.apply(fw, mode)?;
        Ok(())
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        match self.mode {
            Some(mode) => self.apply(fw, mode),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_sequences() {
        assert_eq!(sequence(GfxMode::Speed), Some([(3, 1), (2, 0x12)]));
        assert_eq!(sequence(GfxMode::Stamina), Some([(3, 2), (2, 0x11)]));
        assert_eq!(sequence(GfxMode::Auto), None);
    }
}
