//! # Vaio firmware channel
//!
//! Request/response transactions against the vendor firmware of Sony Vaio
//! laptops. The firmware publishes a handful of ACPI control methods on the
//! notebook control device (`SNC`); everything the driver does boils down to
//! evaluating one of them with an integer or buffer argument and interpreting
//! the result.
//!
//! ## Methods
//!
//! ```text
//! SN00  probe: capability code at handle offset / notification bitmask
//! SN02  enable notifications for a handle bitmask
//! SN03  disable notifications for a handle bitmask
//! SN05  acknowledge a delivered notification
//! SN06  wide call, 8-byte buffer argument, buffer result
//! SN07  narrow call, 32-bit argument, 32-bit result
//! ```
//!
//! Platform methods such as `GBRT`/`SBRT` (panel brightness) or `ECON`
//! (embedded controller enable) go through the same channel.
//!
//! ## Transport
//!
//! Actual method evaluation is platform business. The embedding host provides
//! a [`FirmwareTransport`]; the [`FirmwareChannel`] layers result-type checks
//! and buffer shaping on top. A failed evaluation is always reported to the
//! caller, the channel never retries.
//!
//! ## Legacy controller
//!
//! With the `spic` feature, [`spic`] provides the port-based command protocol
//! of the older programmable I/O controller, including its iteration-bounded
//! busy waits.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

mod channel;
mod method;
mod object;
#[cfg(feature = "spic")]
pub mod spic;

pub use channel::{FirmwareChannel, FirmwareError, FirmwareTransport};
pub use method::Method;
pub use object::{AcpiStatus, Dsm, Object, ObjectKind, Payload};
