#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use vaio_firmware::{AcpiStatus, FirmwareTransport, Method, Object, Payload};
use vaio_snc::{Config, Notification, SncDevice};

/// Scripted notebook control firmware.
///
/// Handle calls are answered from `answers`, keyed by capability and
/// command (offset stripped). Every evaluation is recorded.
#[derive(Default)]
pub struct Firmware {
    pub snc: bool,
    pub handles: [u16; 16],
    pub notify_mask: u32,
    pub answers: HashMap<(u16, u32), u32>,
    pub buffers: HashMap<(u16, u32), Vec<u8>>,
    /// Platform methods and their current integer value.
    pub methods: HashMap<Method, u32>,
    /// Setter method -> getter method it updates.
    pub links: Vec<(Method, Method)>,
    pub failing: Vec<Method>,
    pub calls: Vec<(Method, Payload)>,
}

impl Firmware {
    /// Firmware with the `SN0x` methods and `handles` at offsets 0, 1, ...
    pub fn with_handles(handles: &[u16]) -> Self {
        let mut fw = Self {
            snc: true,
            notify_mask: 0xffff,
            ..Self::default()
        };
        fw.handles[..handles.len()].copy_from_slice(handles);
        fw
    }

    pub fn answer(mut self, cap: u16, command: u32, value: u32) -> Self {
        self.answers.insert((cap, command), value);
        self
    }

    pub fn buffer(mut self, cap: u16, command: u32, bytes: &[u8]) -> Self {
        self.buffers.insert((cap, command), bytes.to_vec());
        self
    }

    pub fn method(mut self, name: &[u8; 4], value: u32) -> Self {
        self.methods.insert(Method::from_name(*name), value);
        self
    }

    pub fn link(mut self, setter: &[u8; 4], getter: &[u8; 4]) -> Self {
        let (s, g) = (Method::from_name(*setter), Method::from_name(*getter));
        self.methods.entry(s).or_insert(0);
        self.methods.entry(g).or_insert(0);
        self.links.push((s, g));
        self
    }

    fn is_snc(method: Method) -> bool {
        [
            Method::SN00,
            Method::SN02,
            Method::SN03,
            Method::SN05,
            Method::SN06,
            Method::SN07,
        ]
        .contains(&method)
    }

    fn handle_call(&self, arg: u64) -> (u16, u32) {
        let offset = (arg & 0xff) as usize;
        let cap = self.handles.get(offset).copied().unwrap_or(0);
        (cap, (arg & !0xff) as u32)
    }

    /// `(capability, command)` of every handle call, in order.
    pub fn handle_calls(&self) -> Vec<(u16, u32)> {
        self.calls
            .iter()
            .filter_map(|(m, p)| match (*m, p) {
                (Method::SN07, Payload::Integer(arg)) => Some(self.handle_call(*arg)),
                (Method::SN06, Payload::Buffer(b)) => {
                    Some(self.handle_call(u64::from_le_bytes(*b)))
                }
                _ => None,
            })
            .collect()
    }

    /// Integer arguments passed to `method`, in order.
    pub fn args_of(&self, method: Method) -> Vec<Option<u64>> {
        self.calls
            .iter()
            .filter(|(m, _)| *m == method)
            .map(|(_, p)| match p {
                Payload::Integer(v) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct Shared(pub Arc<Mutex<Firmware>>);

impl Shared {
    pub fn new(fw: Firmware) -> Self {
        Self(Arc::new(Mutex::new(fw)))
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Firmware) -> R) -> R {
        f(&mut self.0.lock().unwrap())
    }

    pub fn clear_calls(&self) {
        self.with(|fw| fw.calls.clear());
    }

    pub fn handle_calls(&self) -> Vec<(u16, u32)> {
        self.with(|fw| fw.handle_calls())
    }

    pub fn attach(&self, config: Config) -> SncDevice {
        SncDevice::attach(Box::new(self.clone()), config).unwrap()
    }
}

impl FirmwareTransport for Shared {
    fn evaluate(&mut self, method: Method, payload: &Payload) -> Result<Object, AcpiStatus> {
        let mut fw = self.0.lock().unwrap();
        fw.calls.push((method, payload.clone()));
        if fw.failing.contains(&method) {
            return Err(AcpiStatus::ERROR);
        }
        if !fw.has_method(method) {
            return Err(AcpiStatus::NOT_FOUND);
        }

        let arg = match payload {
            Payload::Integer(v) => Some(*v),
            Payload::Buffer(b) => Some(u64::from_le_bytes(*b)),
            _ => None,
        };
        let result = match (method, arg) {
            (Method::SN00, Some(arg)) if (0x20..0x30).contains(&arg) => {
                u64::from(fw.handles[(arg - 0x20) as usize])
            }
            (Method::SN00, Some(0x10)) => u64::from(fw.notify_mask),
            (Method::SN06, Some(arg)) => {
                let key = fw.handle_call(arg);
                if let Some(bytes) = fw.buffers.get(&key) {
                    return Ok(Object::Buffer(bytes.clone()));
                }
                u64::from(fw.answers.get(&key).copied().unwrap_or(0))
            }
            (Method::SN07, Some(arg)) => {
                let key = fw.handle_call(arg);
                u64::from(fw.answers.get(&key).copied().unwrap_or(0))
            }
            (m, _) if Firmware::is_snc(m) => 0,
            (Method::DSM, _) => return Ok(Object::None),
            (m, arg) => {
                let getter = fw.links.iter().find(|(s, _)| *s == m).map(|&(_, g)| g);
                if let (Some(getter), Some(v)) = (getter, arg) {
                    fw.methods.insert(getter, v as u32);
                }
                u64::from(fw.methods.get(&m).copied().unwrap_or(0))
            }
        };
        Ok(Object::Integer(result))
    }

    fn has_method(&self, method: Method) -> bool {
        self.0.lock().unwrap().has_method(method)
    }
}

impl Firmware {
    fn has_method(&self, method: Method) -> bool {
        (self.snc && Self::is_snc(method)) || self.methods.contains_key(&method)
    }
}

/// Sink collecting every notification.
pub fn collect(device: &SncDevice, raws: &[u8]) -> Vec<Notification> {
    let mut seen = Vec::new();
    for &raw in raws {
        device.handle_notification(raw, &mut |n: &Notification| seen.push(*n));
    }
    seen
}
