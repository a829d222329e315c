//! Battery charge limiter and health readout.

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

pub const CAPABILITIES: &[CapabilityCode] = &[0x0115, 0x0136, 0x013f];

const GET_LIMIT: u32 = 0x0000;
const SET_LIMIT: u32 = 0x0100;
const HEALTH: u32 = 0x0200;

/// Charge limit in percent from the limiter status word; 0 when off.
#[must_use]
pub const fn decode_limit(word: u32) -> u32 {
    if word & 0x1 == 0 {
        return 0;
    }
    match (word & 0x30) >> 4 {
        1 => 80,
        2 => 50,
        3 => 100,
        _ => 0,
    }
}

/// Command word selecting `limit` percent; `None` if no step fits.
#[must_use]
pub const fn encode_limit(capability: CapabilityCode, limit: u32) -> Option<u32> {
    if limit == 0 {
        return Some(SET_LIMIT);
    }
    let mut cmd = match limit {
        0..=50 => 0x20,
        51..=80 => 0x10,
        81..=100 => 0x30,
        _ => return None,
    };
    // older handles want the selector in both nibbles
    if capability != 0x013f {
        cmd |= cmd << 2;
    }
    Some(((cmd | 1) << 16) | SET_LIMIT)
}

pub struct BatteryCare {
    capability: CapabilityCode,
}

impl BatteryCare {
    #[allow(clippy::unnecessary_wraps)]
    pub(super) fn detect(
        _fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        Ok(cap.map(|capability| Box::new(Self { capability }) as Box<dyn Feature>))
    }

    const fn has_health(&self) -> bool {
        matches!(self.capability, 0x0136 | 0x013f)
    }
}

impl Feature for BatteryCare {
    fn attributes(&self) -> Vec<Attribute> {
        let mut attrs = vec![Attribute::rw("battery_care_limiter")];
        if self.has_health() {
            attrs.push(Attribute::ro("battery_care_health"));
        }
        attrs
    }

    fn show(&mut self, fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError> {
        match attr {
            "battery_care_limiter" => {
                let word = fw.invoke(self.capability, GET_LIMIT)?;
                Ok(format!("{}", decode_limit(word)))
            }
            "battery_care_health" if self.has_health() => {
                Ok(format!("{}", fw.invoke(self.capability, HEALTH)? & 0xff))
            }
            _ => Err(AttributeError::NoSuchAttribute),
        }
    }

    fn store(&mut self, fw: &mut Dispatcher, attr: &str, input: &str) -> Result<(), AttributeError> {
        match attr {
            "battery_care_limiter" => {
                let limit = parse_bounded(input, 100)?;
                if let Some(cmd) = encode_limit(self.capability, limit) {
                    fw.invoke(self.capability, cmd)?;
                }
                Ok(())
            }
            "battery_care_health" => Err(AttributeError::NotWritable),
            _ => Err(AttributeError::NoSuchAttribute),
        }
    }
}
