//! Wireless radios behind the rfkill handles.
//!
//! Capability `0x0124` reports the fitted radios as a bitmask, `0x0135` as a
//! list of device codes. Both share the status and per-radio commands.

use crate::attribute::Attribute;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError};
use crate::events::{RadioReason, Route};
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use crate::notify::Notification;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use bitfield_struct::bitfield;
use log::{debug, info, warn};

pub const CAPABILITIES: &[CapabilityCode] = &[0x0124, 0x0135];

const ENUMERATE: u32 = 0x0b00;
const STATUS: u32 = 0x0200;
const SET_OFFSET: u32 = 0x0100;
const UNBLOCK: u32 = 0x00ff_0000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RadioKind {
    Wifi,
    Bluetooth,
    Wwan,
    Wimax,
}

impl RadioKind {
    pub const ALL: [Self; 4] = [Self::Wifi, Self::Bluetooth, Self::Wwan, Self::Wimax];

    /// Per-radio state query command.
    #[must_use]
    pub const fn address(self) -> u32 {
        match self {
            Self::Wifi => 0x0300,
            Self::Bluetooth => 0x0500,
            Self::Wwan => 0x0700,
            Self::Wimax => 0x0900,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wifi => "sony-wifi",
            Self::Bluetooth => "sony-bluetooth",
            Self::Wwan => "sony-wwan",
            Self::Wimax => "sony-wimax",
        }
    }

    /// Command word changing the soft block.
    #[must_use]
    pub const fn set_command(self, blocked: bool) -> u32 {
        let cmd = self.address() + SET_OFFSET;
        if blocked { cmd } else { cmd | UNBLOCK }
    }

    /// Radio named by a `0x0135` device code.
    #[must_use]
    pub const fn from_device_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::Wifi),
            0x10 => Some(Self::Bluetooth),
            0x30 => Some(Self::Wimax),
            c if c & 0xf0 == 0x20 || c & 0xf0 == 0x50 => Some(Self::Wwan),
            _ => None,
        }
    }
}

/// Answer to the status query.
#[bitfield(u32)]
pub struct RadioStatus {
    /// Hardware switch in the "on" position.
    pub switch_on: bool,
    /// A battery is present; WWAN cannot be powered without one.
    pub battery_present: bool,
    #[bits(30)]
    __: u32,
}

/// Answer to a per-radio state query.
#[bitfield(u32)]
pub struct RadioDeviceState {
    #[bits(1)]
    __low: u8,
    pub powered: bool,
    #[bits(30)]
    __high: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RadioState {
    pub kind: RadioKind,
    pub hw_blocked: bool,
    pub soft_blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RadioError {
    #[error("radio not fitted")]
    NotPresent,
    #[error("WWAN needs a battery")]
    BatteryRequired,
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl From<RadioError> for AttributeError {
    fn from(value: RadioError) -> Self {
        match value {
            RadioError::NotPresent => Self::Unsupported,
            RadioError::BatteryRequired => Self::BatteryRequired,
            RadioError::Dispatch(err) => err.into(),
        }
    }
}

pub struct Radios {
    capability: CapabilityCode,
    radios: Vec<RadioState>,
    battery_present: bool,
}

impl Radios {
    pub(super) fn detect(
        fw: &mut Dispatcher,
        cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        let Some(capability) = cap else {
            return Ok(None);
        };
        let kinds = enumerate(fw, capability)?;
        if kinds.is_empty() {
            return Ok(None);
        }

        let status = RadioStatus::from_bits(fw.invoke(capability, STATUS)?);
        let mut radios = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let state = RadioDeviceState::from_bits(fw.invoke(capability, kind.address())?);
            info!("{} found", kind.name());
            radios.push(RadioState {
                kind,
                hw_blocked: !status.switch_on(),
                soft_blocked: !state.powered(),
            });
        }

        Ok(Some(Box::new(Self {
            capability,
            radios,
            battery_present: status.battery_present(),
        })))
    }

    #[must_use]
    pub fn states(&self) -> &[RadioState] {
        &self.radios
    }

    #[must_use]
    pub fn state(&self, kind: RadioKind) -> Option<RadioState> {
        self.radios.iter().copied().find(|r| r.kind == kind)
    }

    #[must_use]
    pub const fn battery_present(&self) -> bool {
        self.battery_present
    }

    fn read_status(&mut self, fw: &mut Dispatcher) -> Result<RadioStatus, DispatchError> {
        let status = RadioStatus::from_bits(fw.invoke(self.capability, STATUS)?);
        self.battery_present = status.battery_present();
        for r in &mut self.radios {
            r.hw_blocked = !status.switch_on();
        }
        Ok(status)
    }

    /// Change the soft block of `kind`.
    ///
    /// WWAN changes are refused while no battery is present; the status is
    /// read fresh for that check and nothing is written.
    ///
    /// # Errors
    /// Radio not fitted, missing battery, or firmware failure.
    pub fn set_block(
        &mut self,
        fw: &mut Dispatcher,
        kind: RadioKind,
        blocked: bool,
    ) -> Result<(), RadioError> {
        if self.state(kind).is_none() {
            return Err(RadioError::NotPresent);
        }
        if kind == RadioKind::Wwan && !self.read_status(fw)?.battery_present() {
            debug!("refusing WWAN change without battery");
            return Err(RadioError::BatteryRequired);
        }

        fw.invoke(self.capability, kind.set_command(blocked))?;
        if let Some(r) = self.radios.iter_mut().find(|r| r.kind == kind) {
            r.soft_blocked = blocked;
        }
        Ok(())
    }

    /// Re-read the hardware switch.
    ///
    /// # Errors
    /// Firmware failure.
    pub fn hw_block(&mut self, fw: &mut Dispatcher, kind: RadioKind) -> Result<bool, RadioError> {
        if self.state(kind).is_none() {
            return Err(RadioError::NotPresent);
        }
        Ok(!self.read_status(fw)?.switch_on())
    }

    /// Switch toggled: re-read the hardware block and, while the switch is
    /// on, every radio's own state.
    fn switch_toggled(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        if !self.read_status(fw)?.switch_on() {
            return Ok(());
        }
        for r in &mut self.radios {
            let state = RadioDeviceState::from_bits(fw.invoke(self.capability, r.kind.address())?);
            r.soft_blocked = !state.powered();
        }
        Ok(())
    }

    fn battery_changed(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        let battery = self.read_status(fw)?.battery_present();
        if let Some(r) = self.radios.iter_mut().find(|r| r.kind == RadioKind::Wwan) {
            r.soft_blocked = !battery;
        }
        Ok(())
    }
}

fn enumerate(fw: &mut Dispatcher, capability: CapabilityCode) -> Result<Vec<RadioKind>, DispatchError> {
    let mut kinds = Vec::new();
    if capability == 0x0124 {
        let mask = fw.invoke(capability, ENUMERATE)?;
        for (bits, kind) in [
            (0x01, RadioKind::Wifi),
            (0x02, RadioKind::Bluetooth),
            (0x1c, RadioKind::Wwan),
            (0x20, RadioKind::Wimax),
        ] {
            if mask & bits != 0 {
                kinds.push(kind);
            }
        }
    } else {
        let codes = fw.invoke_buffer(capability, u64::from(ENUMERATE), 16)?;
        for code in codes.into_iter().take_while(|&c| c != 0xff) {
            match RadioKind::from_device_code(code) {
                Some(kind) if !kinds.contains(&kind) => kinds.push(kind),
                Some(_) => {}
                None => debug!("unknown radio device code {code:#04x}"),
            }
        }
    }
    Ok(kinds)
}

impl Feature for Radios {
    fn attributes(&self) -> Vec<Attribute> {
        Vec::new()
    }

    fn show(&mut self, _fw: &mut Dispatcher, _attr: &str) -> Result<String, AttributeError> {
        Err(AttributeError::NoSuchAttribute)
    }

    fn resume(&mut self, fw: &mut Dispatcher) -> Result<(), DispatchError> {
        let status = self.read_status(fw)?;
        for r in &self.radios {
            if r.kind == RadioKind::Wwan && !status.battery_present() {
                continue;
            }
            fw.invoke(self.capability, r.kind.set_command(r.soft_blocked))?;
        }
        Ok(())
    }

    fn on_event(&mut self, fw: &mut Dispatcher, route: Route, reason: u32) -> Option<Notification> {
        if route != Route::Radio {
            return None;
        }
        let reason = RadioReason::from_word(reason);
        let refreshed = match reason {
            RadioReason::SwitchToggled => self.switch_toggled(fw),
            RadioReason::BatteryChanged => self.battery_changed(fw),
            RadioReason::Other(_) => Ok(()),
        };
        if let Err(err) = refreshed {
            warn!("radio state refresh failed: {err}");
        }
        Some(Notification::Radio(reason))
    }

    fn as_radios(&mut self) -> Option<&mut Radios> {
        Some(self)
    }
}
