//! Per-feature lifecycle.
//!
//! ```text
//! Undetected -> Detecting -> Active <-> Suspended -> Detached
//!                        \-> Unsupported -----------/
//! ```
//!
//! Detection runs once per attach. Resume re-applies cached settings and
//! never re-detects. A failed re-apply is logged and the feature stays
//! active.

use crate::attribute::Attribute;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError};
use crate::events::Route;
use crate::features::{Backlight, Radios};
use crate::handles::{CapabilityCode, HandleOffset};
use crate::notify::Notification;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use log::{debug, error, info, warn};

/// Runtime state of one detected feature.
pub trait Feature: Send {
    fn attributes(&self) -> Vec<Attribute>;

    /// # Errors
    /// Unknown attribute or firmware failure.
    fn show(&mut self, fw: &mut Dispatcher, attr: &str) -> Result<String, AttributeError>;

    /// # Errors
    /// Invalid input, unknown attribute or firmware failure.
    fn store(
        &mut self,
        _fw: &mut Dispatcher,
        _attr: &str,
        _input: &str,
    ) -> Result<(), AttributeError> {
        Err(AttributeError::NotWritable)
    }

    /// Re-apply cached settings after a power transition.
    ///
    /// # Errors
    /// The first firmware failure.
    fn resume(&mut self, _fw: &mut Dispatcher) -> Result<(), DispatchError> {
        Ok(())
    }

    /// Release firmware-side state on detach.
    fn cleanup(&mut self, _fw: &mut Dispatcher) {}

    /// React to a handle-routed notification carrying `reason`.
    fn on_event(&mut self, _fw: &mut Dispatcher, _route: Route, _reason: u32) -> Option<Notification> {
        None
    }

    fn as_radios(&mut self) -> Option<&mut Radios> {
        None
    }

    fn as_backlight(&mut self) -> Option<&mut Backlight> {
        None
    }
}

/// Detection hook: `Ok(None)` means the feature is absent.
pub type DetectFn = fn(
    &mut Dispatcher,
    Option<CapabilityCode>,
    &Config,
) -> Result<Option<Box<dyn Feature>>, DispatchError>;

/// A feature the driver knows how to run.
pub struct FeatureKind {
    pub name: &'static str,
    /// Capabilities that implement it. Empty for platform features that do
    /// not live behind a handle.
    pub capabilities: &'static [CapabilityCode],
    pub detect: DetectFn,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Undetected,
    Detecting,
    Active,
    Unsupported,
    Suspended,
    Detached,
}

pub struct FeatureSlot {
    kind: &'static FeatureKind,
    capability: Option<CapabilityCode>,
    offset: Option<HandleOffset>,
    state: LifecycleState,
    feature: Option<Box<dyn Feature>>,
}

impl FeatureSlot {
    #[must_use]
    pub const fn new(kind: &'static FeatureKind) -> Self {
        Self {
            kind,
            capability: None,
            offset: None,
            state: LifecycleState::Undetected,
            feature: None,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name
    }

    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    #[must_use]
    pub const fn capability(&self) -> Option<CapabilityCode> {
        self.capability
    }

    #[must_use]
    pub const fn offset(&self) -> Option<HandleOffset> {
        self.offset
    }

    /// Run detection; `found` is the capability and offset it was matched
    /// at, `None` for platform features.
    pub fn detect(
        &mut self,
        fw: &mut Dispatcher,
        found: Option<(CapabilityCode, HandleOffset)>,
        config: &Config,
    ) {
        if self.state != LifecycleState::Undetected {
            return;
        }
        self.state = LifecycleState::Detecting;
        self.capability = found.map(|(c, _)| c);
        self.offset = found.map(|(_, o)| o);

        match (self.kind.detect)(fw, self.capability, config) {
            Ok(Some(feature)) => {
                info!("{} active ({:#06x?})", self.kind.name, self.capability);
                self.feature = Some(feature);
                self.state = LifecycleState::Active;
            }
            Ok(None) | Err(DispatchError::UnknownCapability(_)) => {
                debug!("{} not supported", self.kind.name);
                self.state = LifecycleState::Unsupported;
            }
            Err(err) => {
                error!("{} setup failed: {err}", self.kind.name);
                self.state = LifecycleState::Unsupported;
            }
        }
    }

    /// Allow another detection after an unsupported capability.
    fn rearm(&mut self) {
        if self.state == LifecycleState::Unsupported {
            self.state = LifecycleState::Undetected;
            self.capability = None;
            self.offset = None;
        }
    }

    /// Record that the handle table has no capability for this feature.
    pub fn absent(&mut self) {
        if self.state == LifecycleState::Undetected {
            debug!("{} not supported", self.kind.name);
            self.state = LifecycleState::Unsupported;
        }
    }

    #[must_use]
    pub fn feature(&mut self) -> Option<&mut (dyn Feature + 'static)> {
        match self.state {
            LifecycleState::Active | LifecycleState::Suspended => self.feature.as_deref_mut(),
            _ => None,
        }
    }

    pub fn suspend(&mut self) {
        if self.state == LifecycleState::Active {
            self.state = LifecycleState::Suspended;
        }
    }

    pub fn resume(&mut self, fw: &mut Dispatcher) {
        if self.state != LifecycleState::Suspended {
            return;
        }
        if let Some(feature) = self.feature.as_deref_mut()
            && let Err(err) = feature.resume(fw)
        {
            warn!("{}: failed to restore settings: {err}", self.kind.name);
        }
        self.state = LifecycleState::Active;
    }

    pub fn detach(&mut self, fw: &mut Dispatcher) {
        if let Some(mut feature) = self.feature.take() {
            feature.cleanup(fw);
        }
        self.state = LifecycleState::Detached;
    }
}

/// All features of one device, activated in handle offset order.
pub struct FeatureSet {
    slots: Vec<FeatureSlot>,
}

impl FeatureSet {
    /// Detect every kind in `registry` against the probed handle table.
    ///
    /// Each kind activates at most once, from the first offset holding one of
    /// its capabilities whose detection succeeds. Platform kinds go last.
    pub fn activate(
        registry: &'static [FeatureKind],
        fw: &mut Dispatcher,
        config: &Config,
    ) -> Self {
        let mut pending: Vec<FeatureSlot> = registry.iter().map(FeatureSlot::new).collect();
        let mut slots = Vec::with_capacity(pending.len());

        let handles: Vec<_> = fw.handles().iter().collect();
        for (offset, cap) in handles {
            let mut i = 0;
            while i < pending.len() {
                let slot = &mut pending[i];
                if slot.kind.capabilities.contains(&cap) {
                    slot.rearm();
                    slot.detect(fw, Some((cap, offset)), config);
                    if slot.state == LifecycleState::Active {
                        slots.push(pending.remove(i));
                        continue;
                    }
                }
                i += 1;
            }
        }

        for mut slot in pending {
            if slot.kind.capabilities.is_empty() {
                slot.detect(fw, None, config);
            } else {
                slot.absent();
            }
            slots.push(slot);
        }

        Self { slots }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureSlot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FeatureSlot> {
        self.slots.iter_mut()
    }

    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&FeatureSlot> {
        self.slots.iter().find(|s| s.name() == name)
    }

    /// Active feature publishing attribute `attr`.
    pub fn owner_of(&mut self, attr: &str) -> Option<&mut (dyn Feature + 'static)> {
        self.slots
            .iter_mut()
            .filter_map(FeatureSlot::feature)
            .find(|f| f.attributes().iter().any(|a| a.name == attr))
    }

    /// Active features activated from `capability`.
    pub fn by_capability(
        &mut self,
        capability: CapabilityCode,
    ) -> impl Iterator<Item = &mut (dyn Feature + 'static)> {
        self.slots
            .iter_mut()
            .filter(move |s| s.capability == Some(capability))
            .filter_map(FeatureSlot::feature)
    }

    pub fn radios(&mut self) -> Option<&mut Radios> {
        self.slots
            .iter_mut()
            .filter_map(FeatureSlot::feature)
            .find_map(|f| f.as_radios())
    }

    pub fn backlight(&mut self) -> Option<&mut Backlight> {
        self.slots
            .iter_mut()
            .filter_map(FeatureSlot::feature)
            .find_map(|f| f.as_backlight())
    }

    pub fn suspend(&mut self) {
        self.slots.iter_mut().for_each(FeatureSlot::suspend);
    }

    pub fn resume(&mut self, fw: &mut Dispatcher) {
        for slot in &mut self.slots {
            slot.resume(fw);
        }
    }

    pub fn detach(&mut self, fw: &mut Dispatcher) {
        for slot in &mut self.slots {
            slot.detach(fw);
        }
    }
}
