//! # Device lock
//!
//! The firmware exposes a single request/response channel with no request
//! identifiers, so only one call may be outstanding per device. Every piece of
//! per-device state (the handle table, each feature's cached settings) lives
//! behind one [`DeviceLock`] and is only touched while the lock is held.
//!
//! The lock spins instead of sleeping: notification handlers run in whatever
//! context the platform delivers them in, and critical sections are bounded
//! by a handful of firmware calls.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod device_lock;

pub use device_lock::{DeviceGuard, DeviceLock};
