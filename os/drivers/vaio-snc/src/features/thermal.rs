//! Thermal profile selection.

use crate::attribute::{Attribute, check_len};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError, ValidationError};
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

pub const CAPABILITIES: &[CapabilityCode] = &[0x0122];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ThermalMode {
    Balanced = 0,
    Silent = 1,
    Performance = 2,
}

impl ThermalMode {
    pub const ALL: [Self; 3] = [Self::Balanced, Self::Silent, Self::Performance];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Silent => "silent",
            Self::Performance => "performance",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|&m| m as u32 == code)
    }

    /// Whether the machine's profile mask offers this mode. Balanced is
    /// always available.
    #[must_use]
    pub const fn offered_by(self, profiles: u32) -> bool {
        let code = self as u32;
        code == 0 || profiles & code != 0
    }
}

pub struct Thermal {
    capability: CapabilityCode,
    profiles: u32,
    mode: Option<ThermalMode>,
}

impl Thermal {
    pub(super) fn detect(
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        let Some(capability) = cap else {
            return Ok(None);
        };
        let profiles = fw.invoke(capability, 0x0000)? & 0xff;
        Ok(Some(Box::new(Self {
            capability,
            profiles,
            mode: None,
        })))
    }

    fn apply(&self, fw: &mut Dispatcher, mode: ThermalMode) -> Result<(), DispatchError> {
        fw.invoke(self.capability, ((mode as u32) << 16) | 0x0200).map(drop)
    }
}

impl Feature for Thermal {
    fn attributes(&self) -> Vec<Attribute> {
        vec![Attribute::ro("thermal_profiles"), Attribute::rw("thermal_control")]
    }

    fn show(&mut self, fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError> {
        match attr {
            "thermal_profiles" => Ok(ThermalMode::ALL
                .into_iter()
                .filter(|m| m.offered_by(self.profiles))
                .map(ThermalMode::name)
                .collect::<Vec<_>>()
                .join(" ")),
            "thermal_control" => {
                let code = fw.invoke(self.capability, 0x0100)? & 0xff;
                Ok(ThermalMode::from_code(code)
                    .map_or("unknown", ThermalMode::name)
                    .to_string())
            }
            _ => Err(AttributeError::NoSuchAttribute),
        }
    }

    fn store(&mut self, fw: &mut Dispatcher, attr: &str, input: &str) -> Result<(), AttributeError> {
        match attr {
            "thermal_control" => {
                let mode = ThermalMode::from_name(check_len(input)?.trim())
                    .filter(|m| m.offered_by(self.profiles))
                    .ok_or(ValidationError::UnknownChoice)?;
                self.apply(fw, mode)?;
                self.mode = Some(mode);
                Ok(())
            }
            "thermal_profiles" => Err(AttributeError::NotWritable),
            _ => Err(AttributeError::NoSuchAttribute),
        }
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        let Some(mode) = self.mode else {
            return Ok(());
        };
        if fw.invoke(self.capability, 0x0100)? & 0xff != mode as u32 {
            self.apply(fw, mode)?;
        }
        Ok(())
    }
}
