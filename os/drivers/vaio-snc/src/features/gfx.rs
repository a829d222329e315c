use crate::attribute::Attribute;
use crate::config::{Config, GfxMode};
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError};
use crate::events::{GfxReason, Route};
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use crate::notify::Notification;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use log::debug;

pub const CAPABILITIES: &[CapabilityCode] = &[0x0128, 0x0146, 0x015b];

/// Hybrid graphics switch position, read only.
pub struct GfxSwitch {
    capability: CapabilityCode,
}

impl GfxSwitch {
    #[allow(clippy::unnecessary_wraps)]
    pub(super) fn detect(
        _fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        Ok(cap.map(|capability| Box::new(Self { capability }) as Box<dyn Feature>))
    }

    fn status(&self, fw: &mut Dispatcher) -> Result<GfxMode, DispatchError> {
        let cmd = if self.capability == 0x015b { 0x0000 } else { 0x0100 };
        let word = fw.invoke(self.capability, cmd)?;
        Ok(decode_status(self.capability, word))
    }
}

/// Interpret a status word; the encoding differs per capability.
#[must_use]
pub const fn decode_status(capability: CapabilityCode, word: u32) -> GfxMode {
    match capability {
        // 1: discrete (speed), 0: integrated (stamina)
        0x0146 => {
            if word & 0x01 != 0 {
                GfxMode::Speed
            } else {
                GfxMode::Stamina
            }
        }
        // inverted
        0x015b => {
            if word & 0x01 != 0 {
                GfxMode::Stamina
            } else {
                GfxMode::Speed
            }
        }
        _ => {
            if word & 0x80 != 0 {
                GfxMode::Auto
            } else if word & 0x02 != 0 {
                GfxMode::Stamina
            } else {
                GfxMode::Speed
            }
        }
    }
}

impl Feature for GfxSwitch {
    fn attributes(&self) -> Vec<Attribute> {
        vec![Attribute::ro("gfx_switch_status")]
    }

    fn show(&mut self, fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError> {
        if attr != "gfx_switch_status" {
            return Err(AttributeError::NoSuchAttribute);
        }
        Ok(self.status(fw)?.as_str().to_string())
    }

    fn on_event(&mut self, fw: &mut Dispatcher, route: Route, reason: u32) -> Option<Notification> {
        if route != Route::GfxSwitch {
            return None;
        }
        debug!("gfx switch event: {:?}", GfxReason::from_word(reason));
        match self.status(fw) {
            Ok(mode) => Some(Notification::GfxSwitch(mode)),
            Err(err) => {
                debug!("cannot read gfx switch status: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_encodings() {
        assert_eq!(decode_status(0x0146, 1), GfxMode::Speed);
        assert_eq!(decode_status(0x015b, 1), GfxMode::Stamina);
        assert_eq!(decode_status(0x0128, 0x82), GfxMode::Auto);
        assert_eq!(decode_status(0x0128, 0x02), GfxMode::Stamina);
        assert_eq!(decode_status(0x0128, 0x00), GfxMode::Speed);
    }
}
