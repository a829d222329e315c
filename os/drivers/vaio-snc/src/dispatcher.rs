//! Capability calls.
//!
//! Every handle-based call is `SN07(offset | command)` (narrow) or
//! `SN06(offset | command)` (wide). The offset comes from the handle table;
//! the meaning of the command bits is owned by each feature.

use crate::error::DispatchError;
use crate::handles::{CapabilityCode, HandleOffset, HandleTable};
use alloc::vec::Vec;
use log::debug;
use vaio_firmware::{FirmwareChannel, FirmwareError, Method};

/// Probe argument returning the bitmask of handles able to notify.
const NOTIFY_MASK_PROBE: u32 = 0x10;

pub struct Dispatcher {
    channel: FirmwareChannel,
    handles: HandleTable,
}

impl Dispatcher {
    #[must_use]
    pub fn new(channel: FirmwareChannel) -> Self {
        Self {
            channel,
            handles: HandleTable::default(),
        }
    }

    /// Rebuild the handle table from scratch.
    pub fn probe(&mut self) -> &HandleTable {
        let channel = &mut self.channel;
        self.handles = HandleTable::discover(|arg| channel.call_int(Method::SN00, Some(arg)));
        for (offset, cap) in self.handles.iter() {
            debug!("found handle {cap:#06x} at offset {offset}");
        }
        &self.handles
    }

    #[inline]
    #[must_use]
    pub const fn handles(&self) -> &HandleTable {
        &self.handles
    }

    #[inline]
    pub fn channel(&mut self) -> &mut FirmwareChannel {
        &mut self.channel
    }

    #[inline]
    #[must_use]
    pub fn has_method(&self, method: Method) -> bool {
        self.channel.has_method(method)
    }

    fn resolve(&self, capability: CapabilityCode) -> Result<HandleOffset, DispatchError> {
        self.handles
            .find(capability)
            .ok_or(DispatchError::UnknownCapability(capability))
    }

    /// Narrow call against `capability`.
    ///
    /// # Errors
    /// [`DispatchError::UnknownCapability`] if the machine lacks it, otherwise
    /// the firmware failure.
    pub fn invoke(
        &mut self,
        capability: CapabilityCode,
        command_bits: u32,
    ) -> Result<u32, DispatchError> {
        let offset = self.resolve(capability)?;
        let arg = command_bits | u32::from(offset);
        let result = self.channel.call_int(Method::SN07, Some(arg))?;
        debug!("called handle {capability:#06x} arg {arg:#x}: {result:#x}");
        Ok(result)
    }

    /// Wide call against `capability`, result shaped to `out_capacity` bytes.
    ///
    /// # Errors
    /// Same as [`invoke`](Self::invoke).
    pub fn invoke_buffer(
        &mut self,
        capability: CapabilityCode,
        command_bits: u64,
        out_capacity: usize,
    ) -> Result<Vec<u8>, DispatchError> {
        let offset = self.resolve(capability)?;
        let arg = command_bits | u64::from(offset);
        let result = self.channel.call_buffer(Method::SN06, arg, out_capacity)?;
        debug!("called handle {capability:#06x} arg {arg:#x}: {result:02x?}");
        Ok(result)
    }

    /// Handles that may raise notifications.
    ///
    /// # Errors
    /// Firmware failure.
    pub fn notification_mask(&mut self) -> Result<u32, FirmwareError> {
        self.channel.call_int(Method::SN00, Some(NOTIFY_MASK_PROBE))
    }

    /// # Errors
    /// Firmware failure.
    pub fn enable_notifications(&mut self, mask: u32) -> Result<(), FirmwareError> {
        self.channel.call_void(Method::SN02, Some(mask))
    }

    /// # Errors
    /// Firmware failure.
    pub fn disable_notifications(&mut self, mask: u32) -> Result<(), FirmwareError> {
        self.channel.call_void(Method::SN03, Some(mask))
    }

    /// Clear a delivered notification so it is not raised again.
    ///
    /// # Errors
    /// Firmware failure.
    pub fn acknowledge(&mut self, offset: HandleOffset) -> Result<(), FirmwareError> {
        self.channel
            .call_void(Method::SN05, Some(1u32 << (offset & 0x1f)))
    }
}
