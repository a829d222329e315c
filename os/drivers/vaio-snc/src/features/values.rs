//! Named values read and written through dedicated firmware methods.
//!
//! Older machines expose each setting as a getter/setter method pair rather
//! than behind a handle. A value is offered when at least one of its
//! methods exists; the first existing method of each list is the one used.
//! Writes are cached and replayed on resume in table order.

use crate::attribute::{Access, Attribute, parse_decimal};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError, ValidationError};
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use log::debug;
use vaio_firmware::Method;

/// Firmware brightness steps; the wire value is 1-based.
pub const SONY_MAX_BRIGHTNESS: u8 = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Validator {
    /// Strict `0`/`1`.
    Boolean,
    /// 0-based level outside, 1-based on the wire.
    Brightness,
}

impl Validator {
    /// User value to wire value.
    ///
    /// # Errors
    /// [`ValidationError::OutOfRange`] for values the firmware must not see.
    pub fn input(self, value: u64) -> Result<u32, ValidationError> {
        let max = match self {
            Self::Boolean => 1,
            Self::Brightness => u64::from(SONY_MAX_BRIGHTNESS) - 1,
        };
        let v = u32::try_from(value)
            .ok()
            .filter(|&v| u64::from(v) <= max)
            .ok_or(ValidationError::OutOfRange(value))?;
        Ok(match self {
            Self::Boolean => v,
            Self::Brightness => v + 1,
        })
    }

    /// Wire value to user value.
    #[must_use]
    pub fn output(self, value: u32) -> i64 {
        match self {
            Self::Boolean => i64::from(value),
            Self::Brightness => i64::from(value) - 1,
        }
    }
}

#[derive(Debug)]
pub struct NamedValue {
    pub name: &'static str,
    pub getters: &'static [Method],
    pub setters: &'static [Method],
    pub validator: Option<Validator>,
    /// Offered only with [`Config::debug`].
    pub debug: bool,
}

const fn m(name: &str) -> Method {
    let b = name.as_bytes();
    Method::from_name([b[0], b[1], b[2], b[3]])
}

macro_rules! named_value {
    ($name:literal, debug) => {
        named_value!($name, [$name], [], None, true)
    };
    ($name:literal, [$($get:literal),*], [$($set:literal),*], $validator:expr, $debug:literal) => {
        NamedValue {
            name: $name,
            getters: &[$(m($get)),*],
            setters: &[$(m($set)),*],
            validator: $validator,
            debug: $debug,
        }
    };
}

pub static VALUES: &[NamedValue] = &[
    named_value!("brightness_default", ["GPBR"], ["SPBR"], Some(Validator::Brightness), false),
    named_value!("fnkey", ["GHKE"], [], None, false),
    named_value!("cdpower", ["GCDP"], ["SCDP", "CDPW"], Some(Validator::Boolean), false),
    named_value!("audiopower", ["GAZP"], ["AZPW"], Some(Validator::Boolean), false),
    named_value!("lanpower", ["GLNP"], ["LNPW"], Some(Validator::Boolean), true),
    named_value!("lidstate", ["GLID"], [], Some(Validator::Boolean), false),
    named_value!("indicatorlamp", ["GILS"], ["SILS"], Some(Validator::Boolean), false),
    named_value!("gainbass", ["GMGB"], ["CMGB"], Some(Validator::Boolean), false),
    // debug-only firmware knobs
    named_value!("PID", ["GPID"], [], None, true),
    named_value!("CTR", ["GCTR"], ["SCTR"], None, true),
    named_value!("PCR", ["GPCR"], ["SPCR"], None, true),
    named_value!("CMI", ["GCMI"], ["SCMI"], None, true),
    named_value!("SN", ["SNIN"], ["SNNE", "SNCF"], None, true),
    named_value!("HSC0", ["HSC0"], [], None, true),
    named_value!("HSC3", [], ["HSC3"], None, true),
    named_value!("HSC1", ["HSC1"], [], None, true),
    named_value!("HSC4", [], ["HSC4"], None, true),
    named_value!("HSC2", ["HSC2"], [], None, true),
    named_value!("F100", debug),
    named_value!("F113", debug),
    named_value!("F101", debug),
    named_value!("F114", debug),
    named_value!("F115", debug),
    named_value!("F11D", debug),
    named_value!("F119", debug),
    named_value!("F121", debug),
    named_value!("F122", debug),
    named_value!("F124", debug),
    named_value!("F125", debug),
    named_value!("F126", debug),
    named_value!("F128", debug),
    named_value!("F105", debug),
    named_value!("HOMP", debug),
    named_value!("SN01", ["SNO1"], [], None, true),
    named_value!("SN03", [], ["SNO3"], None, true),
    named_value!("SN04", ["SNO4"], [], None, true),
    named_value!("SN05", [], ["SNO5"], None, true),
    named_value!("SN06", [], ["SNO6"], None, true),
    named_value!("PWAK", ["PWAK"], [], None, true),
    named_value!("EAWK", [], ["EAWK"], None, true),
];

struct ActiveValue {
    def: &'static NamedValue,
    getter: Option<Method>,
    setter: Option<Method>,
    /// Last wire value written.
    written: Option<u32>,
}

impl ActiveValue {
    fn access(&self) -> Access {
        match (self.getter.is_some(), self.setter.is_some()) {
            (true, true) => Access::ReadWrite,
            (false, true) => Access::WriteOnly,
            _ => Access::ReadOnly,
        }
    }
}

pub struct NamedValues {
    values: Vec<ActiveValue>,
}

impl NamedValues {
    #[allow(clippy::unnecessary_wraps)]
    pub(super) fn detect(
        fw: &mut Dispatcher,
        _cap: Option<CapabilityCode>,
        config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        let fw = &*fw;
        let first = |methods: &[Method]| methods.iter().copied().find(|&m| fw.has_method(m));

        let values: Vec<_> = VALUES
            .iter()
            .filter(|def| !def.debug || config.debug)
            .filter_map(|def| {
                let getter = first(def.getters);
                let setter = first(def.setters);
                if getter.is_none() && setter.is_none() {
                    return None;
                }
                debug!("named value {} present", def.name);
                Some(ActiveValue {
                    def,
                    getter,
                    setter,
                    written: None,
                })
            })
            .collect();

        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(Box::new(Self { values })))
    }

    fn find(&mut self, attr: &str) -> Result<&mut ActiveValue, AttributeError> {
        self.values
            .iter_mut()
            .find(|v| v.def.name == attr)
            .ok_or(AttributeError::NoSuchAttribute)
    }
}

impl Feature for NamedValues {
    fn attributes(&self) -> Vec<Attribute> {
        self.values
            .iter()
            .map(|v| Attribute {
                name: v.def.name,
                access: v.access(),
            })
            .collect()
    }

    fn show(&mut self, fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError> {
        let value = self.find(attr)?;
        let getter = value.getter.ok_or(AttributeError::NotReadable)?;
        let raw = fw.channel().call_int(getter, None)?;
        Ok(match value.def.validator {
            Some(validator) => format!("{}", validator.output(raw)),
            None => format!("{raw}"),
        })
    }

    fn store(&mut self, fw: &mut Dispatcher, attr: &str, input: &str) -> Result<(), AttributeError> {
        let value = self.find(attr)?;
        let setter = value.setter.ok_or(AttributeError::NotWritable)?;
        let parsed = parse_decimal(input)?;
        let wire = match value.def.validator {
            Some(validator) => validator.input(parsed)?,
            None => u32::try_from(parsed).map_err(|_| ValidationError::OutOfRange(parsed))?,
        };
        fw.channel().call_void(setter, Some(wire))?;
        value.written = Some(wire);
        Ok(())
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        for value in &self.values {
            if let (Some(setter), Some(wire)) = (value.setter, value.written) {
                fw.channel().call_void(setter, Some(wire))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_is_one_based_on_the_wire() {
        assert_eq!(Validator::Brightness.input(0), Ok(1));
        assert_eq!(Validator::Brightness.input(7), Ok(8));
        assert_eq!(
            Validator::Brightness.input(8),
            Err(ValidationError::OutOfRange(8))
        );
        assert_eq!(Validator::Brightness.output(1), 0);
        assert_eq!(Validator::Brightness.output(0), -1);
    }

    #[test]
    fn boolean_is_strict() {
        assert_eq!(Validator::Boolean.input(1), Ok(1));
        assert_eq!(Validator::Boolean.input(2), Err(ValidationError::OutOfRange(2)));
        assert_eq!(Validator::Boolean.output(5), 5);
    }

    #[test]
    fn table_methods() {
        let cd = VALUES.iter().find(|v| v.name == "cdpower").map(|v| v.setters);
        assert_eq!(cd, Some(&[m("SCDP"), m("CDPW")][..]));
        let f11d = VALUES.iter().find(|v| v.name == "F11D").map(|v| v.getters);
        assert_eq!(f11d, Some(&[Method::from_name(*b"F11D")][..]));
        assert!(VALUES.iter().filter(|v| !v.debug).all(|v| !v.getters.is_empty()));
    }
}
