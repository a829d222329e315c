//! Ambient light sensor.
//!
//! Two sensor models exist. Capability `0x012f` exposes a raw two-channel
//! photodiode; the driver converts counts to lux and arms the notification
//! window itself. On capability `0x0137` the embedded controller does the
//! math and reports lux and colour temperature directly.
//!
//! Command words (`v` in bits 16 and up):
//!
//! ```text
//! 0x0000  probe: bit 0 present, bits 8..16 min level, 16..24 max level
//! 0x0100  state: bit 0 power, bit 1 managed
//! 0x0200  set power            0x0300  set managed
//! 0x0400  light reading        0x0500  colour temperature (EC only)
//! 0x0600  set backlight level  0x0700  get backlight level
//! 0x0800  low threshold        0x0900  high threshold (photodiode only)
//! ```

use crate::attribute::{Attribute, parse_bool, parse_bounded};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError, ValidationError};
use crate::events::{AlsReason, Route};
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use crate::notify::Notification;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use bitfield_struct::bitfield;
use core::fmt;
use log::{debug, warn};

pub const CAPABILITIES: &[CapabilityCode] = &[0x012f, 0x0137];

const PROBE: u32 = 0x0000;
const STATE: u32 = 0x0100;
const SET_POWER: u32 = 0x0200;
const SET_MANAGED: u32 = 0x0300;
const READ_LIGHT: u32 = 0x0400;
const READ_KELVIN: u32 = 0x0500;
const SET_LEVEL: u32 = 0x0600;
const GET_LEVEL: u32 = 0x0700;
const LOW_THRESHOLD: u32 = 0x0800;
const HIGH_THRESHOLD: u32 = 0x0900;

#[bitfield(u32)]
pub struct AlsProbe {
    pub present: bool,
    #[bits(7)]
    __reserved: u8,
    pub min_level: u8,
    pub max_level: u8,
    __high: u8,
}

#[bitfield(u32)]
pub struct AlsState {
    pub power: bool,
    pub managed: bool,
    #[bits(30)]
    __reserved: u32,
}

/// Illuminance in hundredths of a lux.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Lux(pub u32);

impl fmt::Display for Lux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Convert photodiode counts (visible+IR, IR) to lux using the piecewise
/// fit for this sensor family.
#[must_use]
pub fn photodiode_lux(ch0: u16, ch1: u16) -> Lux {
    if ch0 == 0 {
        return Lux(0);
    }
    let ratio = u32::from(ch1) * 1000 / u32::from(ch0);
    // coefficients in units of 1e-5 lux per count
    let (k0, k1): (i64, i64) = match ratio {
        0..=125 => (3040, 2720),
        126..=250 => (3250, 4400),
        251..=375 => (3510, 5440),
        376..=500 => (3810, 6240),
        501..=610 => (2240, 3100),
        611..=800 => (1280, 1530),
        801..=1300 => (146, 112),
        _ => return Lux(0),
    };
    let raw = k0 * i64::from(ch0) - k1 * i64::from(ch1);
    Lux(u32::try_from(raw.max(0) / 1000).unwrap_or(u32::MAX))
}

/// Approximate correlated colour temperature from the IR share of the
/// reading: more infrared means a warmer source.
#[must_use]
pub fn photodiode_kelvin(ch0: u16, ch1: u16) -> u32 {
    if ch0 == 0 {
        return 0;
    }
    let ratio = u32::from(ch1) * 1000 / u32::from(ch0);
    7000u32.saturating_sub(ratio.saturating_mul(4)).max(2000)
}

/// Sensor model operations.
pub trait AlsDevice: Send {
    fn capability(&self) -> CapabilityCode;

    /// # Errors
    /// Firmware failure.
    fn init(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError>;

    fn exit(&mut self, _fw: &mut Dispatcher) {}

    /// # Errors
    /// Firmware failure.
    fn set_power(&mut self, fw: &mut Dispatcher, on: bool) -> Result<(), DispatchError> {
        fw.invoke(self.capability(), SET_POWER | (u32::from(on) << 16))
            .map(drop)
    }

    /// # Errors
    /// Firmware failure.
    fn get_power(&mut self, fw: &mut Dispatcher) -> Result<bool, DispatchError> {
        Ok(AlsState::from_bits(fw.invoke(self.capability(), STATE)?).power())
    }

    /// # Errors
    /// Firmware failure.
    fn get_lux(&mut self, fw: &mut Dispatcher) -> Result<Lux, DispatchError>;

    /// # Errors
    /// Firmware failure.
    fn get_kelvin(&mut self, fw: &mut Dispatcher) -> Result<u32, DispatchError>;

    /// Lighting changed; move the notification window if there is one.
    ///
    /// # Errors
    /// Firmware failure.
    fn rearm(&mut self, _fw: &mut Dispatcher) -> Result<(), DispatchError> {
        Ok(())
    }
}

/// Raw two-channel photodiode.
pub struct Photodiode {
    capability: CapabilityCode,
}

impl Photodiode {
    fn channels(&self, fw: &mut Dispatcher) -> Result<(u16, u16), DispatchError> {
        let raw = fw.invoke_buffer(self.capability, u64::from(READ_LIGHT), 8)?;
        Ok((
            u16::from_le_bytes([raw[0], raw[1]]),
            u16::from_le_bytes([raw[2], raw[3]]),
        ))
    }

    fn set_window(&self, fw: &mut Dispatcher, lo: u16, hi: u16) -> Result<(), DispatchError> {
        fw.invoke(self.capability, LOW_THRESHOLD | (u32::from(lo) << 16))?;
        fw.invoke(self.capability, HIGH_THRESHOLD | (u32::from(hi) << 16))?;
        Ok(())
    }
}

/// Notification window of ±1/8 around `ch0`.
#[must_use]
pub const fn threshold_window(ch0: u16) -> (u16, u16) {
    let delta = ch0 / 8;
    (ch0 - delta, ch0.saturating_add(delta))
}

impl AlsDevice for Photodiode {
    fn capability(&self) -> CapabilityCode {
        self.capability
    }

    fn init(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        self.set_power(fw, true)?;
        self.rearm(fw)
    }

    fn exit(&mut self, fw: &mut Dispatcher) {
        // widest window: the sensor stops notifying
        if let Err(err) = self.set_window(fw, 0, u16::MAX) {
            debug!("als: cannot disarm thresholds: {err}");
        }
    }

    fn get_lux(&mut self, fw: &mut Dispatcher) -> Result<Lux, DispatchError> {
        let (ch0, ch1) = self.channels(fw)?;
        Ok(photodiode_lux(ch0, ch1))
    }

    fn get_kelvin(&mut self, fw: &mut Dispatcher) -> Result<u32, DispatchError> {
        let (ch0, ch1) = self.channels(fw)?;
        Ok(photodiode_kelvin(ch0, ch1))
    }

    fn rearm(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        let (ch0, _) = self.channels(fw)?;
        let (lo, hi) = threshold_window(ch0);
        debug!("als: window {lo}..{hi}");
        self.set_window(fw, lo, hi)
    }
}

/// Sensor read out by the embedded controller.
pub struct EcManaged {
    capability: CapabilityCode,
}

impl AlsDevice for EcManaged {
    fn capability(&self) -> CapabilityCode {
        self.capability
    }

    fn init(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        self.set_power(fw, true)
    }

    fn get_lux(&mut self, fw: &mut Dispatcher) -> Result<Lux, DispatchError> {
        let word = fw.invoke(self.capability, READ_LIGHT)?;
        let integer = word & 0xffff;
        let hundredths = ((word >> 16) & 0xff).min(99);
        Ok(Lux(integer * 100 + hundredths))
    }

    fn get_kelvin(&mut self, fw: &mut Dispatcher) -> Result<u32, DispatchError> {
        fw.invoke(self.capability, READ_KELVIN)
    }
}

pub struct Als {
    capability: CapabilityCode,
    device: Box<dyn AlsDevice>,
    min_level: u8,
    max_level: u8,
    power: Option<bool>,
    managed: Option<bool>,
    level: Option<u8>,
}

impl Als {
    pub(super) fn detect(
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        let Some(capability) = cap else {
            return Ok(None);
        };
        let probe = AlsProbe::from_bits(fw.invoke(capability, PROBE)?);
        if !probe.present() {
            return Ok(None);
        }

        let mut device: Box<dyn AlsDevice> = if capability == 0x012f {
            Box::new(Photodiode { capability })
        } else {
            Box::new(EcManaged { capability })
        };
        device.init(fw)?;
        debug!(
            "als: levels {}..={}",
            probe.min_level(),
            probe.max_level()
        );

        Ok(Some(Box::new(Self {
            capability,
            device,
            min_level: probe.min_level(),
            max_level: probe.max_level(),
            power: None,
            managed: None,
            level: None,
        })))
    }

    fn state(&self, fw: &mut Dispatcher) -> Result<AlsState, DispatchError> {
        Ok(AlsState::from_bits(fw.invoke(self.capability, STATE)?))
    }

    fn set_managed(&self, fw: &mut Dispatcher, on: bool) -> Result<(), DispatchError> {
        fw.invoke(self.capability, SET_MANAGED | (u32::from(on) << 16))
            .map(drop)
    }

    fn set_level(&self, fw: &mut Dispatcher, level: u8) -> Result<(), DispatchError> {
        fw.invoke(self.capability, SET_LEVEL | (u32::from(level) << 16))
            .map(drop)
    }
}

impl Feature for Als {
    fn attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::rw("als_power"),
            Attribute::rw("als_managed"),
            Attribute::ro("als_lux"),
            Attribute::ro("als_kelvin"),
            Attribute::rw("als_backlight"),
        ]
    }

    fn show(&mut self, fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError> {
        Ok(match attr {
            "als_power" => format!("{}", u8::from(self.device.get_power(fw)?)),
            "als_managed" => format!("{}", u8::from(self.state(fw)?.managed())),
            "als_lux" => format!("{}", self.device.get_lux(fw)?),
            "als_kelvin" => format!("{}", self.device.get_kelvin(fw)?),
            "als_backlight" => format!("{}", fw.invoke(self.capability, GET_LEVEL)? & 0xff),
            _ => return Err(AttributeError::NoSuchAttribute),
        })
    }

    fn store(&mut self, fw: &mut Dispatcher, attr: &str, input: &str) -> Result<(), AttributeError> {
        match attr {
            "als_power" => {
                let on = parse_bool(input)?;
                self.device.set_power(fw, on)?;
                self.power = Some(on);
            }
            "als_managed" => {
                let on = parse_bool(input)?;
                self.set_managed(fw, on)?;
                self.managed = Some(on);
            }
            "als_backlight" => {
                let v = parse_bounded(input, u32::from(self.max_level))?;
                if v < u32::from(self.min_level) {
                    return Err(ValidationError::OutOfRange(u64::from(v)).into());
                }
                if self.state(fw)?.managed() {
                    return Err(AttributeError::Busy);
                }
                let level = u8::try_from(v).unwrap_or(self.max_level);
                self.set_level(fw, level)?;
                self.level = Some(level);
            }
            "als_lux" | "als_kelvin" => return Err(AttributeError::NotWritable),
            _ => return Err(AttributeError::NoSuchAttribute),
        }
        Ok(())
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        if let Some(on) = self.power {
            self.device.set_power(fw, on)?;
        }
        if let Some(on) = self.managed {
            self.set_managed(fw, on)?;
        }
        if let Some(level) = self.level
            && self.managed != Some(true)
        {
            self.set_level(fw, level)?;
        }
        self.device.rearm(fw)
    }

    fn cleanup(&mut self, fw: &mut Dispatcher) {
        self.device.exit(fw);
    }

    fn on_event(&mut self, fw: &mut Dispatcher, route: Route, reason: u32) -> Option<Notification> {
        if route != Route::Als {
            return None;
        }
        let reason = AlsReason::from_bits(reason);
        if reason.lighting_changed()
            && let Err(err) = self.device.rearm(fw)
        {
            warn!("als: cannot re-arm thresholds: {err}");
        }
        Some(Notification::Als(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lux_fit() {
        assert_eq!(photodiode_lux(0, 100), Lux(0));
        // ratio 0: 0.0304 lux per count
        assert_eq!(photodiode_lux(1000, 0), Lux(3040));
        // ratio 0.5: 0.0381*1000 - 0.0624*500 = 6.9 lux
        assert_eq!(photodiode_lux(1000, 500), Lux(690));
        // mostly infrared
        assert_eq!(photodiode_lux(100, 200), Lux(0));
    }

    #[test]
    fn lux_display() {
        assert_eq!(format!("{}", Lux(12345)), "123.45");
        assert_eq!(format!("{}", Lux(7)), "0.07");
    }

    #[test]
    fn window_is_an_eighth() {
        assert_eq!(threshold_window(800), (700, 900));
        assert_eq!(threshold_window(0), (0, 0));
        assert_eq!(threshold_window(u16::MAX), (57344, u16::MAX));
    }

    #[test]
    fn kelvin_bounds() {
        assert_eq!(photodiode_kelvin(1000, 0), 7000);
        assert_eq!(photodiode_kelvin(1000, 1000), 3000);
        assert_eq!(photodiode_kelvin(10, 1000), 2000);
    }

    #[test]
    fn probe_layout() {
        let p = AlsProbe::from_bits(0x00FF_0101);
        assert!(p.present());
        assert_eq!(p.min_level(), 1);
        assert_eq!(p.max_level(), 0xff);
    }
}
