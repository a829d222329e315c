//! The programmable I/O control device.

use super::model::{EventClass, PciId, SpicModel, decode};
use crate::attribute::{Attribute, parse_bounded, parse_decimal};
use crate::config::Config;
use crate::error::AttributeError;
use crate::notify::{EventSink, Notification};
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use log::{debug, error, info, warn};
use vaio_firmware::spic::{EmbeddedController, PortIo, SpicPort, WaitBudget};
use vaio_firmware::{FirmwareChannel, Method};
use vaio_sync::DeviceLock;

/// Data mask under which some type 3 events need a follow-up command.
const TYPE3_FOLLOWUP_MASK: u8 = 0x31;

/// Embedded controller register holding the fan speed.
const FAN0_STATUS: u8 = 0x93;

const CAMERA_BRIGHTNESS: u8 = 0x00;
const CAMERA_CONTRAST: u8 = 0x01;
const CAMERA_HUE: u8 = 0x02;
const CAMERA_COLOR: u8 = 0x03;
const CAMERA_SHARPNESS: u8 = 0x04;
const CAMERA_PICTURE: u8 = 0x05;
const CAMERA_AGC: u8 = 0x06;
const CAMERA_STATUS: u8 = 0x07;
const CAMERA_CONTROL: u8 = 0x10;
const CAMERA_MUTE_MASK: u8 = 0x40;
const CAMERA_STATUS_READY: u8 = 0x02;

/// Power-up rounds before the camera is given up on.
const CAMERA_POWER_ATTEMPTS: u32 = 5;
/// Polls of the power switch and of the ready bit per round, 10 ms apart.
const CAMERA_SWITCH_POLLS: u32 = 100;
const CAMERA_READY_POLLS: u32 = 400;
const CAMERA_POLL_DELAY_US: u32 = 10_000;

/// Platform collaborators of one controller.
pub struct SpicPlatform {
    pub io: Box<dyn PortIo + Send>,
    pub ec: Box<dyn EmbeddedController + Send>,
    /// The controller's own firmware object, for `_DIS`.
    pub firmware: FirmwareChannel,
}

/// Commands of the motion eye camera behind the controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CameraCommand {
    Power(bool),
    Brightness(u8),
    Contrast(u8),
    Hue(u8),
    Color(u8),
    Sharpness(u8),
    Picture(u8),
    Agc(u8),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("camera control not enabled")]
    Disabled,
    #[error("camera did not power up")]
    NoResponse,
}

pub struct SpicState {
    port: SpicPort,
    ec: Box<dyn EmbeddedController + Send>,
    firmware: FirmwareChannel,
    model: SpicModel,
    filter: EventClass,
    compat: bool,
    camera: bool,
    camera_power: bool,
    bluetooth_power: bool,
    wwan_power: bool,
}

pub struct SpicDevice {
    state: DeviceLock<SpicState>,
}

impl SpicState {
    fn enable(&mut self) {
        self.port.call1(0x82);
        self.port.call2(0x81, 0xff);
        self.port.call1(if self.compat { 0x92 } else { 0x82 });
    }

    /// Release the controller's resources; absent `_DIS` is fine.
    fn disable(&mut self) {
        if !self.firmware.has_method(Method::DIS) {
            return;
        }
        match self.firmware.call_void(Method::DIS, None) {
            Ok(()) => debug!("controller disabled"),
            Err(err) => error!("cannot disable controller: {err}"),
        }
    }

    fn apply_bluetooth(&mut self, on: bool) {
        self.port.call2(0x96, u8::from(on));
        self.port.call1(0x82);
        self.bluetooth_power = on;
    }

    fn apply_wwan(&mut self, on: bool) {
        self.port.call2(0xb0, u8::from(on));
        self.port.call1(0x82);
        self.wwan_power = on;
    }

    /// Commands some type 3 machines need before they raise the real event.
    /// Returns whether the event was consumed.
    fn type3_followup(&mut self, ev: u8, data_mask: u8) -> bool {
        if data_mask != TYPE3_FOLLOWUP_MASK {
            return false;
        }
        match ev {
            0x5c | 0x5f => {
                self.port.call1(0xa0);
            }
            0x61 => {
                self.port.call1(0xb3);
            }
            _ => {}
        }
        true
    }

    fn camera_set(&mut self, func: u8, value: u8) {
        self.port.call3_while_busy(0x90, func, value, WaitBudget::SHORT);
    }

    fn camera_ready(&mut self) -> bool {
        let v = self.port.call2(0x8f, CAMERA_STATUS);
        v != 0xff && v & CAMERA_STATUS_READY != 0
    }

    fn camera_on(&mut self) -> Result<(), CameraError> {
        if self.camera_power {
            return Ok(());
        }
        let mut ready = false;
        for _ in 0..CAMERA_POWER_ATTEMPTS {
            for _ in 0..CAMERA_SWITCH_POLLS {
                if self.port.call2(0x91, 0x01) == 0 {
                    break;
                }
                self.port.delay(CAMERA_POLL_DELAY_US);
            }
            self.port.call1(0x93);

            for _ in 0..CAMERA_READY_POLLS {
                if self.camera_ready() {
                    ready = true;
                    break;
                }
                self.port.delay(CAMERA_POLL_DELAY_US);
            }
            if ready {
                break;
            }
        }
        if !ready {
            warn!("failed to power on camera");
            return Err(CameraError::NoResponse);
        }

        self.camera_set(CAMERA_CONTROL, 0x5a);
        self.camera_power = true;
        Ok(())
    }

    fn camera_off(&mut self) {
        self.camera_set(CAMERA_PICTURE, CAMERA_MUTE_MASK);
        if self.camera_power {
            self.port.call2(0x91, 0);
            self.camera_power = false;
        }
    }
}

impl SpicDevice {
    /// Pick the generation from `pci_ids`, open the controller at `io1`
    /// (and `io2`, when the firmware assigned a second range) and run the
    /// enable sequence.
    #[must_use]
    pub fn attach(
        platform: SpicPlatform,
        io1: u16,
        io2: Option<u16>,
        pci_ids: &[PciId],
        config: &Config,
    ) -> Self {
        let model = SpicModel::detect(pci_ids);
        info!("programmable I/O controller at {io1:#06x}, {model:?}");
        let mut state = SpicState {
            port: SpicPort::new(platform.io, io1, io2, model.evport_offset()),
            ec: platform.ec,
            firmware: platform.firmware,
            model,
            filter: EventClass::from_bits_retain(config.event_mask),
            compat: config.compat,
            camera: config.camera,
            camera_power: false,
            bluetooth_power: false,
            wwan_power: false,
        };
        state.enable();
        Self {
            state: DeviceLock::new(state),
        }
    }

    #[must_use]
    pub fn model(&self) -> SpicModel {
        self.state.with_lock(|state| state.model)
    }

    /// Read the pending event from the controller and report it.
    pub fn handle_irq(&self, sink: &mut dyn EventSink) {
        let event = self.state.with_lock(|state| {
            let (ev, data_mask) = state.port.read_event();
            if let Some(event) = decode(state.model, state.filter, ev, data_mask) {
                return Some(event);
            }
            if ev == 0x00 || ev == 0xff {
                return None;
            }
            if state.model == SpicModel::Type3 && state.type3_followup(ev, data_mask) {
                debug!("type 3 follow-up for [{ev:#04x}] [{data_mask:#04x}]");
                return None;
            }
            info!("unknown event [{ev:#04x}] [{data_mask:#04x}]");
            None
        });
        if let Some(event) = event {
            sink.report(&Notification::key(event));
        }
    }

    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attrs = vec![Attribute::rw("bluetoothpower"), Attribute::rw("fanspeed")];
        if self.model() == SpicModel::Type3 {
            attrs.push(Attribute::rw("wwanpower"));
        }
        attrs
    }

    #[must_use]
    pub fn bluetooth_power(&self) -> bool {
        self.state.with_lock(|state| state.bluetooth_power)
    }

    /// Unchanged values are not sent.
    pub fn set_bluetooth_power(&self, on: bool) {
        self.state.with_lock(|state| {
            if state.bluetooth_power != on {
                state.apply_bluetooth(on);
            }
        });
    }

    #[must_use]
    pub fn wwan_power(&self) -> bool {
        self.state.with_lock(|state| state.wwan_power)
    }

    /// Unchanged values are not sent.
    pub fn set_wwan_power(&self, on: bool) {
        self.state.with_lock(|state| {
            if state.wwan_power != on {
                state.apply_wwan(on);
            }
        });
    }

    /// # Errors
    /// The embedded controller did not answer.
    pub fn fan_speed(&self) -> Result<u8, AttributeError> {
        self.state
            .with_lock(|state| state.ec.read(FAN0_STATUS))
            .map_err(Into::into)
    }

    /// # Errors
    /// The embedded controller did not take the value.
    pub fn set_fan_speed(&self, speed: u8) -> Result<(), AttributeError> {
        self.state
            .with_lock(|state| state.ec.write(FAN0_STATUS, speed))
            .map_err(Into::into)
    }

    #[must_use]
    pub fn camera_power(&self) -> bool {
        self.state.with_lock(|state| state.camera_power)
    }

    /// Drive the motion eye camera. Only available when enabled in
    /// [`Config::camera`].
    ///
    /// # Errors
    /// Camera control disabled, or the camera did not power up.
    pub fn camera_command(&self, command: CameraCommand) -> Result<(), CameraError> {
        self.state.with_lock(|state| {
            if !state.camera {
                return Err(CameraError::Disabled);
            }
            match command {
                CameraCommand::Power(true) => return state.camera_on(),
                CameraCommand::Power(false) => state.camera_off(),
                CameraCommand::Brightness(v) => state.camera_set(CAMERA_BRIGHTNESS, v),
                CameraCommand::Contrast(v) => state.camera_set(CAMERA_CONTRAST, v),
                CameraCommand::Hue(v) => state.camera_set(CAMERA_HUE, v),
                CameraCommand::Color(v) => state.camera_set(CAMERA_COLOR, v),
                CameraCommand::Sharpness(v) => state.camera_set(CAMERA_SHARPNESS, v),
                CameraCommand::Picture(v) => state.camera_set(CAMERA_PICTURE, v),
                CameraCommand::Agc(v) => state.camera_set(CAMERA_AGC, v),
            }
            Ok(())
        })
    }

    /// # Errors
    /// Unknown attribute, or the embedded controller did not answer.
    pub fn read_attribute(&self, name: &str) -> Result<String, AttributeError> {
        let on = match name {
            "bluetoothpower" => self.bluetooth_power(),
            "wwanpower" if self.model() == SpicModel::Type3 => self.wwan_power(),
            "fanspeed" => return Ok(format!("{}", self.fan_speed()?)),
            _ => return Err(AttributeError::NoSuchAttribute),
        };
        Ok(format!("{}", u8::from(on)))
    }

    /// Any non-zero number switches a radio on.
    ///
    /// # Errors
    /// Unknown attribute, input that is not a decimal number, a fan speed
    /// above 255, or the embedded controller did not take the value.
    pub fn write_attribute(&self, name: &str, input: &str) -> Result<(), AttributeError> {
        match name {
            "bluetoothpower" => self.set_bluetooth_power(parse_decimal(input)? != 0),
            "wwanpower" if self.model() == SpicModel::Type3 => {
                self.set_wwan_power(parse_decimal(input)? != 0);
            }
            "fanspeed" => {
                let v = parse_bounded(input, u8::MAX.into())?;
                self.set_fan_speed(u8::try_from(v).unwrap_or(u8::MAX))?;
            }
            _ => return Err(AttributeError::NoSuchAttribute),
        }
        Ok(())
    }

    /// Release the controller until resume.
    pub fn on_suspend(&self) {
        self.state.with_lock(SpicState::disable);
    }

    /// Re-run the enable sequence and restore radio power.
    pub fn on_resume(&self) {
        self.state.with_lock(|state| {
            state.enable();
            state.apply_bluetooth(state.bluetooth_power);
            if state.model == SpicModel::Type3 {
                state.apply_wwan(state.wwan_power);
            }
        });
    }

    /// Release the controller for good.
    pub fn detach(self) {
        let mut state = self.state.into_inner();
        state.disable();
        info!("programmable I/O controller detached");
    }
}
