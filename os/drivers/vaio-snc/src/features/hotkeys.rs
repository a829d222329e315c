use crate::attribute::Attribute;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError};
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

/// `(capability, command)` pairs that switch hotkey reporting on.
const SETUP: [(CapabilityCode, u32); 4] = [
    (0x0100, 0x0000),
    (0x0101, 0x0000),
    (0x0102, 0x0100),
    (0x0127, 0x0000),
];

pub const CAPABILITIES: &[CapabilityCode] = &[0x0100, 0x0101, 0x0102, 0x0127];

/// Hotkey handles only need to be told to report; decoding happens in
/// the notification path.
pub struct Hotkeys;

impl Hotkeys {
    fn setup(fw: &mut Dispatcher) -> Result<(), DispatchError> {
        for (cap, cmd) in SETUP {
            match fw.invoke(cap, cmd) {
                Ok(_) | Err(DispatchError::UnknownCapability(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    pub(super) fn detect(
        fw: &mut Dispatcher,
        _cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        Self::setup(fw)?;
        Ok(Some(Box::new(Self)))
    }
}

impl Feature for Hotkeys {
    fn attributes(&self) -> Vec<Attribute> {
        Vec::new()
    }

    fn show(&mut self, _fw: &mut Dispatcher, _attr: &str) -> Result<String, AttributeError> {
        Err(AttributeError::NoSuchAttribute)
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        Self::setup(fw)
    }
}
