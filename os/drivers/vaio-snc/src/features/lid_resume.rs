//! Wake on lid open, per sleep state.

use crate::attribute::{Attribute, parse_bool};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError};
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

pub const CAPABILITIES: &[CapabilityCode] = &[0x0119, 0x015d];

/// Attribute name and status bit of each sleep state.
const STATES: [(&str, u32); 3] = [("lid_resume_S3", 0), ("lid_resume_S4", 1), ("lid_resume_S5", 2)];

pub struct LidResume {
    capability: CapabilityCode,
    status: u32,
    dirty: bool,
}

impl LidResume {
    pub(super) fn detect(
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        let Some(capability) = cap else {
            return Ok(None);
        };
        let status = fw.invoke(capability, 0x0000)? & 0x7;
        Ok(Some(Box::new(Self {
            capability,
            status,
            dirty: false,
        })))
    }

    /// `0x015d` only knows S5.
    fn states(&self) -> &'static [(&'static str, u32)] {
        if self.capability == 0x015d {
            &STATES[2..]
        } else {
            &STATES
        }
    }

    fn bit(&self, attr: &str) -> Option<u32> {
        self.states()
            .iter()
            .find(|(name, _)| *name == attr)
            .map(|&(_, bit)| bit)
    }

    fn apply(&self, fw: &mut Dispatcher, status: u32) -> Result<(), DispatchError> {
        fw.invoke(self.capability, (status << 16) | 0x0100).map(drop)
    }
}

impl Feature for LidResume {
    fn attributes(&self) -> Vec<Attribute> {
        self.states()
            .iter()
            .map(|&(name, _)| Attribute::rw(name))
            .collect()
    }

    fn show(&mut self, _fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError> {
        let bit = self.bit(attr).ok_or(AttributeError::NoSuchAttribute)?;
        Ok(format!("{}", (self.status >> bit) & 1))
    }

    fn store(&mut self, fw: &mut Dispatcher, attr: &str, input: &str) -> Result<(), AttributeError> {
        let bit = self.bit(attr).ok_or(AttributeError::NoSuchAttribute)?;
        let on = parse_bool(input)?;
        let status = if on {
            self.status | (1 << bit)
        } else {
            self.status & !(1 << bit)
        };
        self.apply(fw, status)?;
        self.status = status;
        self.dirty = true;
        Ok(())
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        if self.dirty {
            self.apply(fw, self.status)?;
        }
        Ok(())
    }
}
