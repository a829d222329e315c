//! # Legacy programmable I/O controller
//!
//! Older Vaio models route hotkeys and a few device controls through the
//! Sony Programmable I/O Control device. Commands are written to the status
//! port (`io1 + 4`) and data moves through `io1`. Before every write the
//! controller's busy bit must clear.
//!
//! The busy waits are bounded by an iteration count, not a clock: each
//! iteration polls once and delays 1 µs. A wait that runs out of iterations
//! is logged and the command goes out regardless.

use alloc::boxed::Box;
use log::{debug, warn};

/// Raw port access provided by the platform.
pub trait PortIo {
    fn inb(&mut self, port: u16) -> u8;
    fn outb(&mut self, port: u16, value: u8);
    fn udelay(&mut self, micros: u32);
}

/// Iteration ceiling for a busy wait.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WaitBudget(pub u32);

impl WaitBudget {
    /// Command port handshakes.
    pub const LONG: Self = Self(10_000);
    /// Follow-up polls on an already responsive controller.
    pub const SHORT: Self = Self(10);
}

/// Poll `busy` until it clears or the budget runs out.
///
/// Returns `false` when the budget was exhausted. The countdown is
/// pre-decrementing, so a budget of `n` polls at most `n - 1` times.
pub fn wait_while<P: PortIo + ?Sized>(
    io: &mut P,
    budget: WaitBudget,
    busy: impl FnMut(&mut P) -> bool,
) -> bool {
    countdown(io, budget, busy, |io| io.udelay(1))
}

fn countdown<T: ?Sized>(
    target: &mut T,
    budget: WaitBudget,
    mut busy: impl FnMut(&mut T) -> bool,
    mut delay: impl FnMut(&mut T),
) -> bool {
    let mut n = budget.0;
    loop {
        n = n.saturating_sub(1);
        if n == 0 || !busy(target) {
            break;
        }
        delay(target);
    }
    if n == 0 {
        warn!("controller still busy after {} iterations", budget.0);
        return false;
    }
    true
}

/// Embedded controller register access provided by the platform.
pub trait EmbeddedController {
    /// # Errors
    /// The controller did not answer for `addr`.
    fn read(&mut self, addr: u8) -> Result<u8, EcError>;

    /// # Errors
    /// The controller did not accept the write to `addr`.
    fn write(&mut self, addr: u8, value: u8) -> Result<(), EcError>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("embedded controller register {0:#04x} not accessible")]
pub struct EcError(pub u8);

const STATUS_BUSY: u8 = 0x02;

/// Port window of one controller instance.
pub struct SpicPort {
    io: Box<dyn PortIo + Send>,
    io1: u16,
    io2: Option<u16>,
    evport_offset: u16,
}

impl SpicPort {
    /// `evport_offset` locates the event data-mask register relative to
    /// `io1` when the controller has no second I/O range.
    #[must_use]
    pub fn new(io: Box<dyn PortIo + Send>, io1: u16, io2: Option<u16>, evport_offset: u16) -> Self {
        Self {
            io,
            io1,
            io2,
            evport_offset,
        }
    }

    #[inline]
    const fn status_port(&self) -> u16 {
        self.io1 + 4
    }

    fn wait_ready(&mut self) {
        let status = self.status_port();
        let _ = wait_while(self.io.as_mut(), WaitBudget::LONG, |io| {
            io.inb(status) & STATUS_BUSY != 0
        });
    }

    /// Single-byte command; returns the data port reading.
    pub fn call1(&mut self, dev: u8) -> u8 {
        self.wait_ready();
        let status = self.status_port();
        self.io.outb(status, dev);
        let v1 = self.io.inb(status);
        let v2 = self.io.inb(self.io1);
        debug!("call1({dev:#04x}): {:#06x}", (u16::from(v2) << 8) | u16::from(v1));
        v2
    }

    /// Command plus one data byte.
    pub fn call2(&mut self, dev: u8, func: u8) -> u8 {
        self.wait_ready();
        self.io.outb(self.status_port(), dev);
        self.wait_ready();
        self.io.outb(self.io1, func);
        let v1 = self.io.inb(self.io1);
        debug!("call2({dev:#04x} - {func:#04x}): {v1:#06x}");
        v1
    }

    /// Command plus two data bytes.
    pub fn call3(&mut self, dev: u8, func: u8, value: u8) -> u8 {
        self.wait_ready();
        self.io.outb(self.status_port(), dev);
        self.wait_ready();
        self.io.outb(self.io1, func);
        self.wait_ready();
        self.io.outb(self.io1, value);
        let v1 = self.io.inb(self.io1);
        debug!("call3({dev:#04x} - {func:#04x} - {value:#04x}): {v1:#06x}");
        v1
    }

    /// Repeat `call3` while the controller answers non-zero.
    ///
    /// Returns `false` when `budget` ran out first.
    pub fn call3_while_busy(&mut self, dev: u8, func: u8, value: u8, budget: WaitBudget) -> bool {
        countdown(
            self,
            budget,
            |port| port.call3(dev, func, value) != 0,
            |port| port.io.udelay(1),
        )
    }

    /// Sleep between polls of slow peripherals.
    pub fn delay(&mut self, micros: u32) {
        self.io.udelay(micros);
    }

    /// Read a pending interrupt: `(event, data_mask)`.
    pub fn read_event(&mut self) -> (u8, u8) {
        let ev = self.io.inb(self.io1);
        let data_mask = match self.io2 {
            Some(port) => self.io.inb(port),
            None => self.io.inb(self.io1 + self.evport_offset),
        };
        debug!(
            "event ([{ev:02x}] [{data_mask:02x}]) at port {:#06x}(+{:#04x})",
            self.io1, self.evport_offset
        );
        (ev, data_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stuck {
        polls: u32,
        delays: u32,
    }

    impl PortIo for Stuck {
        fn inb(&mut self, _port: u16) -> u8 {
            self.polls += 1;
            STATUS_BUSY
        }
        fn outb(&mut self, _port: u16, _value: u8) {}
        fn udelay(&mut self, micros: u32) {
            self.delays += micros;
        }
    }

    #[test]
    fn exhausted_budget_reports_false() {
        let mut io = Stuck { polls: 0, delays: 0 };
        assert!(!wait_while(&mut io, WaitBudget::SHORT, |io| io.inb(0) != 0));
        assert_eq!(io.polls, 9);
        assert_eq!(io.delays, 9);
    }

    #[test]
    fn ready_controller_does_not_delay() {
        let mut io = Stuck { polls: 0, delays: 0 };
        assert!(wait_while(&mut io, WaitBudget::LONG, |_| false));
        assert_eq!(io.delays, 0);
    }
}
