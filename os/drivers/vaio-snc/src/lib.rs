//! # Vaio notebook control
//!
//! Feature discovery, capability dispatch and event decoding for the Sony
//! Vaio notebook control device (`SNC`).
//!
//! ## Handles
//!
//! The firmware does not promise a fixed set of features. Instead, it
//! publishes up to 16 *handles*: slots that each hold a 16-bit capability
//! code. At attach, every slot is probed once and the result cached in a
//! [`HandleTable`]. A feature then talks to the firmware by capability; the
//! [`Dispatcher`] resolves the capability to its offset and folds that into
//! the call argument:
//!
//! ```text
//! SN00(0x20 + offset)             -> capability code at offset
//! SN07(command | offset)          -> 32-bit result
//! SN06(command | offset)          -> buffer result
//! ```
//!
//! Capabilities the machine lacks fail with
//! [`DispatchError::UnknownCapability`]; the feature is simply unsupported.
//!
//! ## Features
//!
//! Each feature the driver knows (radios, light sensor, keyboard backlight,
//! battery care, ...) is a [`FeatureKind`] in [`REGISTRY`]. Kinds are
//! detected once, in handle offset order, and then live through the
//! [`LifecycleState`] machine: resume re-applies cached settings, detach
//! releases them.
//!
//! ## Notifications
//!
//! Firmware notifications carry one byte. [`SncDevice::handle_notification`]
//! decodes it, refreshes the state it concerns, acknowledges it, and only
//! then hands a [`Notification`] to the caller's [`EventSink`].
//!
//! ## Legacy controller
//!
//! With the `spic` feature, [`spic`] decodes the interrupts of the older
//! programmable I/O controller.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

pub mod attribute;
mod config;
mod device;
mod dispatcher;
mod error;
pub mod events;
pub mod features;
mod handles;
mod lifecycle;
mod notify;
#[cfg(feature = "spic")]
pub mod spic;

pub use config::{Config, GfxMode};
pub use device::{SncDevice, SncState};
pub use dispatcher::Dispatcher;
pub use error::{AttachError, AttributeError, DispatchError, ValidationError};
pub use events::{EventTableId, SonyEvent, decode};
pub use features::REGISTRY;
pub use handles::{CapabilityCode, HANDLE_SLOTS, HandleOffset, HandleTable, PROBE_BASE};
pub use lifecycle::{DetectFn, Feature, FeatureKind, FeatureSet, FeatureSlot, LifecycleState};
pub use notify::{EventSink, Notification};
