//! # Programmable I/O control device
//!
//! Pre-SNC machines report hotkeys through an interrupt from the Sony
//! Programmable I/O Control device. Each interrupt leaves an event byte and
//! a data mask in the controller's ports. Which event a byte means depends on
//! the controller generation, picked once from the chipset's PCI bridges,
//! and on the data mask bits selecting an event class.

mod device;
mod model;

pub use device::{CameraCommand, CameraError, SpicDevice, SpicPlatform, SpicState};
pub use model::{EventClass, EventClassEntry, PCI_VENDOR_INTEL, PciId, SpicModel, decode};
