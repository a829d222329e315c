use vaio_firmware::FirmwareError;

/// Outcome of a capability call that did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The machine does not implement the capability. Not a failure.
    #[error("capability {0:#06x} not present")]
    UnknownCapability(u16),
    #[error(transparent)]
    Firmware(#[from] FirmwareError),
}

/// Rejected user input. No firmware call is made for these.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("input longer than 31 bytes")]
    TooLong,
    #[error("not a decimal number")]
    NotANumber,
    #[error("value {0} out of range")]
    OutOfRange(u64),
    #[error("unrecognized choice")]
    UnknownChoice,
}

/// Failure of an attribute read or write as seen by the exposition layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("no such attribute")]
    NoSuchAttribute,
    #[error("attribute is write-only")]
    NotReadable,
    #[error("attribute is read-only")]
    NotWritable,
    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationError),
    #[error("firmware call failed: {0}")]
    Io(DispatchError),
    #[error("battery required")]
    BatteryRequired,
    #[error("value is under firmware control")]
    Busy,
    #[error("not supported on this machine")]
    Unsupported,
    #[cfg(feature = "spic")]
    #[error("embedded controller access failed: {0}")]
    Controller(#[from] vaio_firmware::spic::EcError),
}

impl AttributeError {
    pub const EINVAL: i32 = 22;
    pub const EIO: i32 = 5;
    pub const ENOENT: i32 = 2;
    pub const EBUSY: i32 = 16;
    pub const EPERM: i32 = 1;
    pub const ENODEV: i32 = 19;

    /// Negative errno for the host's file layer.
    #[must_use]
    pub const fn errno(&self) -> i32 {
        let errno = match self {
            Self::Invalid(_) => Self::EINVAL,
            Self::Io(_) => Self::EIO,
            #[cfg(feature = "spic")]
            Self::Controller(_) => Self::EIO,
            Self::NoSuchAttribute => Self::ENOENT,
            Self::NotReadable | Self::NotWritable => Self::EPERM,
            Self::BatteryRequired | Self::Busy => Self::EBUSY,
            Self::Unsupported => Self::ENODEV,
        };
        -errno
    }
}

impl From<DispatchError> for AttributeError {
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::UnknownCapability(_) => Self::Unsupported,
            err @ DispatchError::Firmware(_) => Self::Io(err),
        }
    }
}

impl From<FirmwareError> for AttributeError {
    fn from(value: FirmwareError) -> Self {
        Self::Io(DispatchError::Firmware(value))
    }
}

/// Errors that abort attaching the whole device.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachError {
    #[error("not a Sony notebook control device")]
    NotSnc,
}
