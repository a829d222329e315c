#![cfg(feature = "spic")]

mod common;

use common::{Firmware, Shared};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use vaio_firmware::spic::{EcError, EmbeddedController, PortIo};
use vaio_firmware::{FirmwareChannel, Method};
use vaio_snc::events::InputReport;
use vaio_snc::spic::{CameraCommand, CameraError, PciId, SpicDevice, SpicModel, SpicPlatform};
use vaio_snc::{AttributeError, Config, Notification, SonyEvent};

const IO1: u16 = 0x10a0;
const STATUS: u16 = IO1 + 4;

/// Idle controller: never busy, reads answer from per-port queues.
#[derive(Default)]
struct Controller {
    reads: HashMap<u16, VecDeque<u8>>,
    writes: Vec<(u16, u8)>,
}

#[derive(Clone, Default)]
struct Ports(Arc<Mutex<Controller>>);

impl Ports {
    fn raise(&self, ev: u8, data_port: u16, data_mask: u8) {
        let mut c = self.0.lock().unwrap();
        c.reads.entry(IO1).or_default().push_back(ev);
        c.reads.entry(data_port).or_default().push_back(data_mask);
    }

    fn take_writes(&self) -> Vec<(u16, u8)> {
        std::mem::take(&mut self.0.lock().unwrap().writes)
    }

    fn answer(&self, port: u16, values: &[u8]) {
        let mut c = self.0.lock().unwrap();
        c.reads.entry(port).or_default().extend(values);
    }
}

impl PortIo for Ports {
    fn inb(&mut self, port: u16) -> u8 {
        let mut c = self.0.lock().unwrap();
        c.reads.get_mut(&port).and_then(VecDeque::pop_front).unwrap_or(0)
    }

    fn outb(&mut self, port: u16, value: u8) {
        self.0.lock().unwrap().writes.push((port, value));
    }

    fn udelay(&mut self, _micros: u32) {}
}

/// Embedded controller registers; `None` once it stops answering.
#[derive(Clone, Default)]
struct Ec(Arc<Mutex<Option<HashMap<u8, u8>>>>);

impl Ec {
    fn working() -> Self {
        Self(Arc::new(Mutex::new(Some(HashMap::new()))))
    }
}

impl EmbeddedController for Ec {
    fn read(&mut self, addr: u8) -> Result<u8, EcError> {
        let regs = self.0.lock().unwrap();
        let regs = regs.as_ref().ok_or(EcError(addr))?;
        Ok(regs.get(&addr).copied().unwrap_or(0))
    }

    fn write(&mut self, addr: u8, value: u8) -> Result<(), EcError> {
        let mut regs = self.0.lock().unwrap();
        regs.as_mut().ok_or(EcError(addr))?.insert(addr, value);
        Ok(())
    }
}

fn attach_with(
    ports: &Ports,
    ec: &Ec,
    firmware: &Shared,
    bridge: Option<u16>,
    config: &Config,
) -> SpicDevice {
    let ids: Vec<PciId> = bridge.into_iter().map(PciId::intel).collect();
    let platform = SpicPlatform {
        io: Box::new(ports.clone()),
        ec: Box::new(ec.clone()),
        firmware: FirmwareChannel::new(Box::new(firmware.clone())),
    };
    SpicDevice::attach(platform, IO1, None, &ids, config)
}

fn attach(ports: &Ports, bridge: Option<u16>, config: &Config) -> SpicDevice {
    attach_with(ports, &Ec::working(), &Shared::default(), bridge, config)
}

fn reports(device: &SpicDevice) -> Vec<Notification> {
    let mut seen = Vec::new();
    device.handle_irq(&mut |n: &Notification| seen.push(*n));
    seen
}

#[test]
fn attach_enables_the_controller() {
    let ports = Ports::default();
    let device = attach(&ports, None, &Config::default());
    assert_eq!(device.model(), SpicModel::Type2);
    assert_eq!(
        ports.take_writes(),
        vec![(STATUS, 0x82), (STATUS, 0x81), (IO1, 0xff), (STATUS, 0x82)]
    );

    let compat = Config {
        compat: true,
        ..Config::default()
    };
    attach(&ports, None, &compat);
    assert_eq!(ports.take_writes().last(), Some(&(STATUS, 0x92)));
}

#[test]
fn interrupts_decode_by_generation() {
    let ports = Ports::default();
    let device = attach(&ports, Some(0x2815), &Config::default());
    assert_eq!(device.model(), SpicModel::Type3);

    ports.raise(0x59, IO1 + 0x12, 0x31);
    assert_eq!(reports(&device), vec![Notification::key(SonyEvent::WirelessOn)]);

    let device = attach(&ports, Some(0x7113), &Config::default());
    ports.raise(0x1f, IO1 + 0x04, 0x10);
    assert_eq!(
        reports(&device),
        vec![Notification::Key {
            event: SonyEvent::JogDialUp,
            input: Some(InputReport::Wheel(1)),
        }]
    );
}

#[test]
fn masked_classes_are_dropped() {
    let ports = Ports::default();
    let config = Config {
        event_mask: 0,
        ..Config::default()
    };
    let device = attach(&ports, Some(0x7113), &config);
    ports.raise(0x1f, IO1 + 0x04, 0x10);
    assert!(reports(&device).is_empty());
}

#[test]
fn type3_followups_are_consumed() {
    let ports = Ports::default();
    let device = attach(&ports, Some(0x27b9), &Config::default());
    ports.take_writes();

    ports.raise(0x5c, IO1 + 0x12, 0x31);
    assert!(reports(&device).is_empty());
    assert_eq!(ports.take_writes(), vec![(STATUS, 0xa0)]);

    ports.raise(0x61, IO1 + 0x12, 0x31);
    assert!(reports(&device).is_empty());
    assert_eq!(ports.take_writes(), vec![(STATUS, 0xb3)]);

    ports.raise(0x62, IO1 + 0x12, 0x31);
    assert!(reports(&device).is_empty());
    assert!(ports.take_writes().is_empty());
}

#[test]
fn unknown_events_are_not_reported() {
    let ports = Ports::default();
    let device = attach(&ports, None, &Config::default());
    ports.take_writes();

    for (ev, mask) in [(0x77, 0x00), (0x00, 0x31), (0xff, 0xff)] {
        ports.raise(ev, IO1 + 0x12, mask);
        assert!(reports(&device).is_empty());
    }
    assert!(ports.take_writes().is_empty());
}

#[test]
fn radio_power_skips_unchanged_values() {
    let ports = Ports::default();
    let device = attach(&ports, None, &Config::default());
    ports.take_writes();

    device.write_attribute("bluetoothpower", "1").unwrap();
    assert_eq!(
        ports.take_writes(),
        vec![(STATUS, 0x96), (IO1, 0x01), (STATUS, 0x82)]
    );
    device.write_attribute("bluetoothpower", "5").unwrap();
    assert!(ports.take_writes().is_empty());
    assert_eq!(device.read_attribute("bluetoothpower").as_deref(), Ok("1"));

    assert_eq!(
        device.write_attribute("wwanpower", "1"),
        Err(AttributeError::NoSuchAttribute)
    );
    assert!(device.write_attribute("bluetoothpower", "on").is_err());
    assert_eq!(
        device.attributes().iter().map(|a| a.name).collect::<Vec<_>>(),
        vec!["bluetoothpower", "fanspeed"]
    );
}

#[test]
fn resume_restores_radio_power() {
    let ports = Ports::default();
    let device = attach(&ports, Some(0x2917), &Config::default());
    device.set_wwan_power(true);
    ports.take_writes();

    device.on_resume();
    assert_eq!(
        ports.take_writes(),
        vec![
            (STATUS, 0x82),
            (STATUS, 0x81),
            (IO1, 0xff),
            (STATUS, 0x82),
            (STATUS, 0x96),
            (IO1, 0x00),
            (STATUS, 0x82),
            (STATUS, 0xb0),
            (IO1, 0x01),
            (STATUS, 0x82),
        ]
    );
    assert!(device.wwan_power());
    assert!(!device.bluetooth_power());
}

#[test]
fn fan_speed_lives_in_the_embedded_controller() {
    let ports = Ports::default();
    let ec = Ec::working();
    let device = attach_with(&ports, &ec, &Shared::default(), None, &Config::default());
    ports.take_writes();

    device.write_attribute("fanspeed", "180").unwrap();
    assert_eq!(ec.0.lock().unwrap().as_ref().unwrap().get(&0x93), Some(&180));
    assert_eq!(device.read_attribute("fanspeed").as_deref(), Ok("180"));
    // no controller port traffic for the fan
    assert!(ports.take_writes().is_empty());

    assert!(matches!(
        device.write_attribute("fanspeed", "256"),
        Err(AttributeError::Invalid(_))
    ));
    *ec.0.lock().unwrap() = None;
    let err = device.read_attribute("fanspeed").unwrap_err();
    assert_eq!(err, AttributeError::Controller(EcError(0x93)));
    assert_eq!(err.errno(), -AttributeError::EIO);
}

#[test]
fn camera_needs_to_be_enabled() {
    let ports = Ports::default();
    let device = attach(&ports, None, &Config::default());
    ports.take_writes();

    assert_eq!(
        device.camera_command(CameraCommand::Brightness(3)),
        Err(CameraError::Disabled)
    );
    assert!(ports.take_writes().is_empty());
}

#[test]
fn camera_powers_up_then_takes_settings() {
    let ports = Ports::default();
    let config = Config {
        camera: true,
        ..Config::default()
    };
    let device = attach(&ports, None, &config);
    ports.take_writes();

    // switch answers 0 at once; status reads not ready, then ready
    ports.answer(IO1, &[0x00, 0x00, 0x00, 0x02]);
    device.camera_command(CameraCommand::Power(true)).unwrap();
    assert!(device.camera_power());
    assert_eq!(
        ports.take_writes(),
        vec![
            (STATUS, 0x91),
            (IO1, 0x01),
            (STATUS, 0x93),
            (STATUS, 0x8f),
            (IO1, 0x07),
            (STATUS, 0x8f),
            (IO1, 0x07),
            (STATUS, 0x90),
            (IO1, 0x10),
            (IO1, 0x5a),
        ]
    );

    // already on: nothing to do
    device.camera_command(CameraCommand::Power(true)).unwrap();
    assert!(ports.take_writes().is_empty());

    device.camera_command(CameraCommand::Hue(0x20)).unwrap();
    assert_eq!(
        ports.take_writes(),
        vec![(STATUS, 0x90), (IO1, 0x02), (IO1, 0x20)]
    );

    device.camera_command(CameraCommand::Power(false)).unwrap();
    assert!(!device.camera_power());
    assert_eq!(
        ports.take_writes(),
        vec![
            (STATUS, 0x90),
            (IO1, 0x05),
            (IO1, 0x40),
            (STATUS, 0x91),
            (IO1, 0x00),
        ]
    );
}

#[test]
fn suspend_and_detach_disable_the_controller() {
    let ports = Ports::default();
    let firmware = Shared::new(Firmware::default().method(b"_DIS", 0));
    let device = attach_with(&ports, &Ec::working(), &firmware, None, &Config::default());

    device.on_suspend();
    assert_eq!(firmware.with(|fw| fw.args_of(Method::DIS)), vec![None]);
    device.on_resume();
    device.detach();
    assert_eq!(firmware.with(|fw| fw.args_of(Method::DIS)), vec![None, None]);
}

#[test]
fn missing_disable_method_is_skipped() {
    let ports = Ports::default();
    let firmware = Shared::default();
    let device = attach_with(&ports, &Ec::working(), &firmware, None, &Config::default());

    device.on_suspend();
    device.detach();
    assert!(firmware.with(|fw| fw.calls.is_empty()));
}
