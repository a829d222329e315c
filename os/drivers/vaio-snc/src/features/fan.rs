//! Fan speed control.

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

pub const CAPABILITIES: &[CapabilityCode] = &[0x0149];

pub struct Fan {
    capability: CapabilityCode,
    speeds: u32,
    speed: Option<u32>,
}

impl Fan {
    pub(super) fn detect(
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        let Some(capability) = cap else {
            return Ok(None);
        };
        let speeds = fw.invoke(capability, 0x0000)? & 0xff;
        if speeds == 0 {
            return Ok(None);
        }
        Ok(Some(Box::new(Self {
            capability,
            speeds,
            speed: None,
        })))
    }

    fn apply(&self, fw: &mut Dispatcher, speed: u32) -> Result<(), DispatchError> {
        fw.invoke(self.capability, 0x0200 | (speed << 16)).map(drop)
    }
}

impl Feature for Fan {
    fn attributes(&self) -> Vec<Attribute> {
        vec![Attribute::ro("fan_speeds"), Attribute::rw("fan_control")]
    }

    fn show(&mut self, fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError> {
        match attr {
            "fan_speeds" => Ok(format!("{}", self.speeds)),
            "fan_control" => Ok(format!("{}", fw.invoke(self.capability, 0x0100)? & 0xff)),
            _ => Err(AttributeError::NoSuchAttribute),
        }
    }

    fn store(&mut self, fw: &mut Dispatcher, attr: &str, input: &str) -> Result<(), AttributeError> {
        match attr {
            "fan_control" => {
                let speed = parse_bounded(input, self.speeds)?;
                self.apply(fw, speed)?;
                self.speed = Some(speed);
                Ok(())
            }
            "fan_speeds" => Err(AttributeError::NotWritable),
            _ => Err(AttributeError::NoSuchAttribute),
        }
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        match self.speed {
            Some(speed) => self.apply(fw, speed),
            None => Ok(()),
        }
    }
}
