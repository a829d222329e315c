//! The notebook control device.
//!
//! One [`SncDevice`] per attached firmware device. All state sits behind a
//! single [`DeviceLock`]; notification handling, attribute access and power
//! transitions serialize on it. Notifications are handed to the caller's
//! [`EventSink`] only after the lock has been released.

use crate::attribute::{Access, Attribute, check_len};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttachError, AttributeError};
use crate::events::route::{ALS_QUERY, GFX_QUERY, HOTKEY_QUERY, RADIO_QUERY, route};
use crate::events::{EventTableId, HANDLE_EVENT_BASE, Route, decode};
use crate::features::{REGISTRY, RadioError, RadioKind, RadioState};
use crate::handles::{CapabilityCode, HANDLE_SLOTS, HandleOffset};
use crate::lifecycle::{FeatureSet, FeatureSlot, LifecycleState};
use crate::notify::{EventSink, Notification};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use log::{debug, info, warn};
use vaio_firmware::{FirmwareChannel, FirmwareTransport, Method};
use vaio_sync::DeviceLock;

/// Debug listing of the probed handle table.
const HANDLES_ATTRIBUTE: &str = "handles";

pub struct SncState {
    dispatcher: Dispatcher,
    features: FeatureSet,
    config: Config,
    /// Handles enabled for notification at attach.
    notify_mask: u32,
}

pub struct SncDevice {
    state: DeviceLock<SncState>,
}

impl SncDevice {
    /// Probe the firmware and bring up every supported feature.
    ///
    /// # Errors
    /// [`AttachError::NotSnc`] if the firmware has no `SN00` method and
    /// no platform feature either.
    pub fn attach(
        transport: Box<dyn FirmwareTransport + Send>,
        config: Config,
    ) -> Result<Self, AttachError> {
        let mut dispatcher = Dispatcher::new(FirmwareChannel::new(transport));
        enable_ec(&mut dispatcher);

        let has_snc = dispatcher.has_method(Method::SN00);
        let has_handles = has_snc && !dispatcher.probe().is_empty();
        let mut notify_mask = 0;
        if has_handles {
            notify_mask = dispatcher.notification_mask().unwrap_or_else(|err| {
                warn!("cannot read notification mask: {err}");
                0
            });
            if let Err(err) = dispatcher.enable_notifications(notify_mask) {
                warn!("cannot enable notifications: {err}");
            }
        }

        let features = FeatureSet::activate(&REGISTRY, &mut dispatcher, &config);
        let active = features
            .iter()
            .filter(|s| s.state() == LifecycleState::Active)
            .count();
        if !has_snc && active == 0 {
            return Err(AttachError::NotSnc);
        }
        info!("notebook control device attached, {active} features active");

        Ok(Self {
            state: DeviceLock::new(SncState {
                dispatcher,
                features,
                config,
                notify_mask,
            }),
        })
    }

    /// Decode notification `raw`, refresh whatever state it concerns and
    /// report the outcome to `sink`.
    pub fn handle_notification(&self, raw: u8, sink: &mut dyn EventSink) {
        let notification = self.state.with_lock(|state| state.decode(raw));
        sink.report(&notification);
    }

    /// Published attributes of every active feature.
    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        self.state.with_lock(|state| {
            let mut attrs: Vec<Attribute> = state
                .features
                .iter_mut()
                .filter_map(FeatureSlot::feature)
                .flat_map(|f| f.attributes())
                .collect();
            if state.config.debug {
                attrs.push(Attribute::ro(HANDLES_ATTRIBUTE));
            }
            attrs
        })
    }

    /// # Errors
    /// Unknown or write-only attribute, or firmware failure.
    pub fn read_attribute(&self, name: &str) -> Result<String, AttributeError> {
        self.state.with_lock(|state| {
            if name == HANDLES_ATTRIBUTE && state.config.debug {
                return Ok(state.dispatcher.handles().listing());
            }
            let SncState {
                dispatcher,
                features,
                ..
            } = state;
            let feature = features
                .owner_of(name)
                .ok_or(AttributeError::NoSuchAttribute)?;
            if !access_of(&feature.attributes(), name).readable() {
                return Err(AttributeError::NotReadable);
            }
            feature.show(dispatcher, name)
        })
    }

    /// # Errors
    /// Unknown or read-only attribute, invalid input, or firmware failure.
    /// Invalid input never reaches the firmware.
    pub fn write_attribute(&self, name: &str, input: &str) -> Result<(), AttributeError> {
        let input = check_len(input)?;
        self.state.with_lock(|state| {
            if name == HANDLES_ATTRIBUTE && state.config.debug {
                return Err(AttributeError::NotWritable);
            }
            let SncState {
                dispatcher,
                features,
                ..
            } = state;
            let feature = features
                .owner_of(name)
                .ok_or(AttributeError::NoSuchAttribute)?;
            if !access_of(&feature.attributes(), name).writable() {
                return Err(AttributeError::NotWritable);
            }
            feature.store(dispatcher, name, input)
        })
    }

    /// # Errors
    /// No backlight, or firmware failure.
    pub fn brightness(&self) -> Result<u8, AttributeError> {
        self.state.with_lock(|state| {
            let backlight = state
                .features
                .backlight()
                .ok_or(AttributeError::Unsupported)?;
            Ok(backlight.brightness(&mut state.dispatcher)?)
        })
    }

    /// # Errors
    /// No backlight, level above [`crate::features::MAX_BRIGHTNESS`], or
    /// firmware failure.
    pub fn set_brightness(&self, level: u8) -> Result<(), AttributeError> {
        self.state.with_lock(|state| {
            let backlight = state
                .features
                .backlight()
                .ok_or(AttributeError::Unsupported)?;
            backlight.set_brightness(&mut state.dispatcher, level)
        })
    }

    /// # Errors
    /// Radio not fitted, WWAN without battery, or firmware failure.
    pub fn set_radio_block(&self, kind: RadioKind, blocked: bool) -> Result<(), RadioError> {
        self.state.with_lock(|state| {
            let radios = state.features.radios().ok_or(RadioError::NotPresent)?;
            radios.set_block(&mut state.dispatcher, kind, blocked)
        })
    }

    /// # Errors
    /// Radio not fitted, or firmware failure.
    pub fn radio_hw_block(&self, kind: RadioKind) -> Result<bool, RadioError> {
        self.state.with_lock(|state| {
            let radios = state.features.radios().ok_or(RadioError::NotPresent)?;
            radios.hw_block(&mut state.dispatcher, kind)
        })
    }

    /// Cached state of `kind`, as of the last refresh.
    #[must_use]
    pub fn radio_state(&self, kind: RadioKind) -> Option<RadioState> {
        self.state
            .with_lock(|state| state.features.radios().and_then(|r| r.state(kind)))
    }

    #[must_use]
    pub fn feature_state(&self, name: &str) -> Option<LifecycleState> {
        self.state
            .with_lock(|state| state.features.slot(name).map(FeatureSlot::state))
    }

    pub fn on_suspend(&self) {
        self.state.with_lock(|state| state.features.suspend());
    }

    /// Re-enable the firmware side and re-apply cached settings. Nothing
    /// is re-detected.
    pub fn on_resume(&self) {
        self.state.with_lock(|state| {
            enable_ec(&mut state.dispatcher);
            if !state.dispatcher.handles().is_empty()
                && let Err(err) = state.dispatcher.enable_notifications(state.notify_mask)
            {
                warn!("cannot re-enable notifications: {err}");
            }
            state.features.resume(&mut state.dispatcher);
        });
    }

    /// Stop notifications and release every feature.
    pub fn detach(self) {
        let mut state = self.state.into_inner();
        if !state.dispatcher.handles().is_empty()
            && let Err(err) = state.dispatcher.disable_notifications(state.notify_mask)
        {
            warn!("cannot disable notifications: {err}");
        }
        state.features.detach(&mut state.dispatcher);
        info!("notebook control device detached");
    }
}

impl SncState {
    fn decode(&mut self, raw: u8) -> Notification {
        if raw < HANDLE_EVENT_BASE {
            return decode(EventTableId::Legacy, raw).map_or_else(
                || {
                    info!("unknown event {raw:#04x}");
                    Notification::Unknown { raw, code: None }
                },
                Notification::key,
            );
        }

        let offset: HandleOffset = raw - HANDLE_EVENT_BASE;
        if usize::from(offset) >= HANDLE_SLOTS {
            info!("event {raw:#04x} outside the handle table");
            return Notification::Unknown { raw, code: None };
        }
        let capability = self.dispatcher.handles().capability_at(offset);
        let has_hsc1 = self.dispatcher.has_method(Method::HSC1);
        let notification = match (route(capability, offset, has_hsc1), capability) {
            (Route::Hotkeys(table), Some(cap)) => self.hotkey(raw, cap, table),
            (r @ (Route::Radio | Route::Als | Route::Shock | Route::GfxSwitch), Some(cap)) => {
                self.feature_event(raw, cap, r)
            }
            (Route::SpeedStamina, _) => self.speed_stamina(raw),
            _ => {
                debug!("generic event {raw:#04x} at offset {offset}");
                Notification::Firmware { raw }
            }
        };

        if let Err(err) = self.dispatcher.acknowledge(offset) {
            warn!("cannot acknowledge event {raw:#04x}: {err}");
        }
        notification
    }

    fn hotkey(&mut self, raw: u8, cap: CapabilityCode, table: EventTableId) -> Notification {
        #[allow(clippy::cast_possible_truncation)]
        let code = match self.dispatcher.invoke(cap, HOTKEY_QUERY) {
            Ok(word) => (word & 0xff) as u8,
            Err(err) => {
                warn!("cannot read hotkey for {cap:#06x}: {err}");
                return Notification::Unknown { raw, code: None };
            }
        };
        if let Some(event) = decode(table, code) {
            return Notification::key(event);
        }
        info!("unknown hotkey {raw:#04x}/{code:#04x} (handle {cap:#06x})");
        Notification::Unknown {
            raw,
            code: Some(code.into()),
        }
    }

    fn feature_event(&mut self, raw: u8, cap: CapabilityCode, route: Route) -> Notification {
        let query = match route {
            Route::Radio => Some(RADIO_QUERY),
            Route::Als => Some(ALS_QUERY),
            Route::GfxSwitch => Some(GFX_QUERY),
            _ => None,
        };
        let reason = match query.map(|q| self.dispatcher.invoke(cap, q)) {
            None => 0,
            Some(Ok(reason)) => reason,
            Some(Err(err)) => {
                warn!("cannot read event reason for {cap:#06x}: {err}");
                return Notification::Unknown { raw, code: None };
            }
        };

        let dispatcher = &mut self.dispatcher;
        self.features
            .by_capability(cap)
            .find_map(|f| f.on_event(dispatcher, route, reason))
            .unwrap_or(Notification::Firmware { raw })
    }

    fn speed_stamina(&mut self, raw: u8) -> Notification {
        match self.dispatcher.channel().call_int(Method::HSC1, None) {
            Ok(word) => Notification::SpeedStamina(word & 0x02 != 0),
            Err(err) => {
                warn!("cannot read speed/stamina switch: {err}");
                Notification::Unknown { raw, code: None }
            }
        }
    }
}

fn access_of(attrs: &[Attribute], name: &str) -> Access {
    attrs
        .iter()
        .find(|a| a.name == name)
        .map_or(Access::ReadOnly, |a| a.access)
}

fn enable_ec(dispatcher: &mut Dispatcher) {
    if dispatcher.has_method(Method::ECON)
        && let Err(err) = dispatcher.channel().call_void(Method::ECON, Some(1))
    {
        warn!("cannot enable embedded controller: {err}");
    }
}
