use crate::attribute::Attribute;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{AttributeError, DispatchError};
use crate::events::Route;
use crate::handles::CapabilityCode;
use crate::lifecycle::Feature;
use crate::notify::Notification;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

pub const CAPABILITIES: &[CapabilityCode] = &[0x0134];

/// Hard disk shock sensor. Presence only; every notification is a hit.
pub struct ShockSensor;

impl ShockSensor {
    #[allow(clippy::unnecessary_wraps)]
    pub(super) fn detect(
        _fw: &mut Dispatcher,
        _cap: Option<CapabilityCode>,
        _config: &Config,
    ) -> Result<Option<Box<dyn Feature>>, DispatchError> {
        Ok(Some(Box::new(Self)))
    }
}

impl Feature for ShockSensor {
    fn attributes(&self) -> Vec<Attribute> {
        Vec::new()
    }

    fn show(&mut self, _fw: &mut Dispatcher, _attr: &str) -> Result<String, AttributeError> {
        Err(AttributeError::NoSuchAttribute)
    }

    fn on_event(&mut self, _fw: &mut Dispatcher, route: Route, _reason: u32) -> Option<Notification> {
        (route == Route::Shock).then_some(Notification::Shock)
    }
}
