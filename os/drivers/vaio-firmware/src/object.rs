use alloc::vec::Vec;
use core::fmt;

/// Argument handed to a firmware method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    None,
    /// Narrow call argument.
    Integer(u64),
    /// Wide call argument: a 64-bit word packed little-endian.
    Buffer([u8; 8]),
    /// Device specific method call.
    Dsm(Dsm),
}

impl Payload {
    /// Pack a wide-call argument word.
    #[inline]
    #[must_use]
    pub const fn wide(word: u64) -> Self {
        Self::Buffer(word.to_le_bytes())
    }

    #[inline]
    #[must_use]
    pub fn from_int(arg: Option<u32>) -> Self {
        arg.map_or(Self::None, |v| Self::Integer(u64::from(v)))
    }
}

/// `_DSM` arguments: function `function` of interface `uuid` at `revision`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsm {
    /// UUID in firmware byte order.
    pub uuid: [u8; 16],
    pub revision: u32,
    pub function: u32,
    /// Packed into a one-element package when present.
    pub argument: Option<u64>,
}

/// Result of a firmware evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Integer(u64),
    Buffer(Vec<u8>),
    Package(Vec<Object>),
    None,
}

impl Object {
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        match self {
            Self::Integer(_) => ObjectKind::Integer,
            Self::Buffer(_) => ObjectKind::Buffer,
            Self::Package(_) => ObjectKind::Package,
            Self::None => ObjectKind::None,
        }
    }

    #[must_use]
    pub const fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Integer,
    Buffer,
    Package,
    None,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::Buffer => "buffer",
            Self::Package => "package",
            Self::None => "nothing",
        })
    }
}

/// Platform evaluation status as reported by the transport.
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct AcpiStatus(pub u32);

impl AcpiStatus {
    pub const ERROR: Self = Self(0x0001);
    pub const NOT_FOUND: Self = Self(0x0005);
    pub const TYPE: Self = Self(0x000D);
    pub const BAD_PARAMETER: Self = Self(0x1001);
    pub const AML_OPERAND_VALUE: Self = Self(0x3008);
}

impl fmt::Debug for AcpiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AcpiStatus({:#06x})", self.0)
    }
}

impl fmt::Display for AcpiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ERROR => f.write_str("AE_ERROR"),
            Self::NOT_FOUND => f.write_str("AE_NOT_FOUND"),
            Self::TYPE => f.write_str("AE_TYPE"),
            Self::BAD_PARAMETER => f.write_str("AE_BAD_PARAMETER"),
            Self::AML_OPERAND_VALUE => f.write_str("AE_AML_OPERAND_VALUE"),
            Self(other) => write!(f, "{other:#06x}"),
        }
    }
}
