#![cfg(feature = "spic")]

use std::sync::{Arc, Mutex};
use vaio_firmware::spic::{PortIo, SpicPort, WaitBudget};

const IO1: u16 = 0x1080;
/// Second range, clear of the status port at `IO1 + 4`.
const IO2: u16 = 0x1090;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    In(u16),
    Out(u16, u8),
}

/// Controller that stays busy for `busy_polls` status reads after each
/// command write and answers data reads from a queue.
#[derive(Default)]
struct Controller {
    log: Vec<Access>,
    busy_polls: u32,
    busy_left: u32,
    data: Vec<u8>,
    delays: u32,
}

#[derive(Clone, Default)]
struct Shared(Arc<Mutex<Controller>>);

impl PortIo for Shared {
    fn inb(&mut self, port: u16) -> u8 {
        let mut c = self.0.lock().unwrap();
        c.log.push(Access::In(port));
        if port == IO1 + 4 {
            if c.busy_left > 0 {
                c.busy_left -= 1;
                return 0x02;
            }
            return 0x00;
        }
        if c.data.is_empty() { 0 } else { c.data.remove(0) }
    }

    fn outb(&mut self, port: u16, value: u8) {
        let mut c = self.0.lock().unwrap();
        c.log.push(Access::Out(port, value));
        c.busy_left = c.busy_polls;
    }

    fn udelay(&mut self, micros: u32) {
        self.0.lock().unwrap().delays += micros;
    }
}

fn writes(c: &Controller) -> Vec<(u16, u8)> {
    c.log
        .iter()
        .filter_map(|a| match *a {
            Access::Out(p, v) => Some((p, v)),
            Access::In(_) => None,
        })
        .collect()
}

#[test]
fn call2_writes_command_then_data() {
    let shared = Shared::default();
    shared.0.lock().unwrap().data = vec![0x5a];
    let mut port = SpicPort::new(Box::new(shared.clone()), IO1, None, 0x04);

    assert_eq!(port.call2(0x81, 0xff), 0x5a);

    let c = shared.0.lock().unwrap();
    assert_eq!(writes(&c), vec![(IO1 + 4, 0x81), (IO1, 0xff)]);
}

#[test]
fn call3_waits_for_busy_bit_between_bytes() {
    let shared = Shared::default();
    shared.0.lock().unwrap().busy_polls = 3;
    let mut port = SpicPort::new(Box::new(shared.clone()), IO1, None, 0x04);

    port.call3(0x90, 0x01, 0x20);

    let c = shared.0.lock().unwrap();
    assert_eq!(writes(&c), vec![(IO1 + 4, 0x90), (IO1, 0x01), (IO1, 0x20)]);
    // three busy polls each after the first two writes
    assert_eq!(c.delays, 6);
}

#[test]
fn stuck_controller_still_gets_the_command() {
    let shared = Shared::default();
    shared.0.lock().unwrap().busy_left = u32::MAX;
    let mut port = SpicPort::new(Box::new(shared.clone()), IO1, None, 0x04);

    port.call1(0x82);

    let c = shared.0.lock().unwrap();
    assert_eq!(writes(&c), vec![(IO1 + 4, 0x82)]);
    assert_eq!(c.delays, 9_999);
}

#[test]
fn event_mask_comes_from_second_range_when_present() {
    let shared = Shared::default();
    shared.0.lock().unwrap().data = vec![0x5c, 0x31];
    let mut port = SpicPort::new(Box::new(shared.clone()), IO1, Some(IO2), 0x12);

    assert_eq!(port.read_event(), (0x5c, 0x31));
    let c = shared.0.lock().unwrap();
    assert_eq!(c.log, vec![Access::In(IO1), Access::In(IO2)]);
}

#[test]
fn event_mask_uses_model_offset_otherwise() {
    let shared = Shared::default();
    shared.0.lock().unwrap().data = vec![0x10, 0x00];
    let mut port = SpicPort::new(Box::new(shared.clone()), IO1, None, 0x12);

    assert_eq!(port.read_event(), (0x10, 0x00));
    let c = shared.0.lock().unwrap();
    assert_eq!(c.log, vec![Access::In(IO1), Access::In(IO1 + 0x12)]);
}

#[test]
fn call3_is_repeated_until_the_controller_answers_zero() {
    let shared = Shared::default();
    shared.0.lock().unwrap().data = vec![0x01, 0x01, 0x00];
    let mut port = SpicPort::new(Box::new(shared.clone()), IO1, None, 0x04);

    assert!(port.call3_while_busy(0x90, 0x05, 0x40, WaitBudget::SHORT));
    let c = shared.0.lock().unwrap();
    assert_eq!(writes(&c).len(), 9);
    assert_eq!(c.delays, 2);
}

#[test]
fn call3_retries_are_bounded() {
    let shared = Shared::default();
    shared.0.lock().unwrap().data = vec![0x01; 32];
    let mut port = SpicPort::new(Box::new(shared.clone()), IO1, None, 0x04);

    assert!(!port.call3_while_busy(0x90, 0x05, 0x40, WaitBudget::SHORT));
    // nine attempts for a budget of ten
    assert_eq!(writes(&shared.0.lock().unwrap()).len(), 27);
}
