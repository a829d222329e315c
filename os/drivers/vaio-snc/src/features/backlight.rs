//! Panel backlight driven by `GBRT`/`SBRT`.

use super::values::SONY_MAX_BRIGHTNESS;
use crate::attribute::Attribute;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError, ValidationError};
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use vaio_firmware::Method;

/// Highest level exposed to the backlight model; levels are 0-based.
pub const MAX_BRIGHTNESS: u8 = SONY_MAX_BRIGHTNESS - 1;

pub struct Backlight {
    level: Option<u8>,
}

impl Backlight {
    #[allow(clippy::unnecessary_wraps)]
    pub(super) fn detect(
        fw: &mut Dispatcher,
        _cap: Option<CapabilityCode>,
        config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        if config.video_backlight_owned || !fw.has_method(Method::GBRT) {
            return Ok(None);
        }
        Ok(Some(Box::new(Self { level: None })))
    }

    /// Current level as reported by the firmware.
    ///
    /// # Errors
    /// Firmware failure.
    pub fn brightness(&self, fw: &mut Dispatcher) -> Result<u8, DispatchError> {
        let raw = fw.channel().call_int(Method::GBRT, None)?;
        Ok(u8::try_from(raw.saturating_sub(1)).unwrap_or(MAX_BRIGHTNESS))
    }

    /// # Errors
    /// Level above [`MAX_BRIGHTNESS`] (nothing is written), or firmware
    /// failure.
    pub fn set_brightness(&mut self, fw: &mut Dispatcher, level: u8) -> Result<(), AttributeError> {
        if level > MAX_BRIGHTNESS {
            return Err(ValidationError::OutOfRange(level.into()).into());
        }
        fw.channel()
            .call_void(Method::SBRT, Some(u32::from(level) + 1))?;
        self.level = Some(level);
        Ok(())
    }
}

impl Feature for Backlight {
    fn attributes(&self) -> Vec<Attribute> {
        Vec::new()
    }

    fn show(&mut self, _fw: &mut Dispatcher, _attr: &str) -> Result<String, AttributeError> {
        Err(AttributeError::NoSuchAttribute)
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        if let Some(level) = self.level {
            fw.channel()
                .call_void(Method::SBRT, Some(u32::from(level) + 1))?;
        }
        Ok(())
    }

    fn as_backlight(&mut self) -> Option<&mut Backlight> {
        Some(self)
    }
}
