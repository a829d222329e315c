use crate::{AcpiStatus, Dsm, Method, Object, ObjectKind, Payload};
use alloc::boxed::Box;
use alloc::vec::Vec;
use log::debug;

/// Platform binding that actually evaluates firmware methods.
pub trait FirmwareTransport {
    /// Evaluate `method` on the control device with `payload`.
    ///
    /// # Errors
    /// Returns the platform status when evaluation fails.
    fn evaluate(&mut self, method: Method, payload: &Payload) -> Result<Object, AcpiStatus>;

    /// Whether the control device exposes `method` at all.
    fn has_method(&self, method: Method) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FirmwareError {
    #[error("{method} evaluation failed: {status}")]
    EvaluationFailed { method: Method, status: AcpiStatus },
    #[error("{method} returned {found} where {expected} was expected")]
    UnexpectedType {
        method: Method,
        expected: ObjectKind,
        found: ObjectKind,
    },
    #[error("method {0} not present")]
    MethodNotFound(Method),
}

/// One request/response transaction at a time against the firmware.
pub struct FirmwareChannel {
    transport: Box<dyn FirmwareTransport + Send>,
}

impl FirmwareChannel {
    #[must_use]
    pub fn new(transport: Box<dyn FirmwareTransport + Send>) -> Self {
        Self { transport }
    }

    #[inline]
    #[must_use]
    pub fn has_method(&self, method: Method) -> bool {
        self.transport.has_method(method)
    }

    /// Raw evaluation. No result shaping, no retries.
    ///
    /// # Errors
    /// [`FirmwareError::EvaluationFailed`] with the platform status.
    pub fn call(&mut self, method: Method, payload: &Payload) -> Result<Object, FirmwareError> {
        self.transport
            .evaluate(method, payload)
            .map_err(|status| match status {
                AcpiStatus::NOT_FOUND if !self.transport.has_method(method) => {
                    FirmwareError::MethodNotFound(method)
                }
                status => FirmwareError::EvaluationFailed { method, status },
            })
    }

    /// Narrow call: 32-bit argument (or none), 32-bit integer result.
    ///
    /// # Errors
    /// Evaluation failures, or [`FirmwareError::UnexpectedType`] if the
    /// firmware returned anything but an integer.
    pub fn call_int(&mut self, method: Method, arg: Option<u32>) -> Result<u32, FirmwareError> {
        let obj = self.call(method, &Payload::from_int(arg))?;
        match obj {
            #[allow(clippy::cast_possible_truncation)]
            Object::Integer(v) => {
                debug!("{method}({arg:#x?}) -> {v:#x}");
                Ok(v as u32)
            }
            other => Err(FirmwareError::UnexpectedType {
                method,
                expected: ObjectKind::Integer,
                found: other.kind(),
            }),
        }
    }

    /// Setter call: the result, whatever its type, is dropped.
    ///
    /// # Errors
    /// Evaluation failures only.
    pub fn call_void(&mut self, method: Method, arg: Option<u32>) -> Result<(), FirmwareError> {
        self.call(method, &Payload::from_int(arg)).map(drop)
    }

    /// Wide call: 8-byte argument word, buffer result shaped to exactly
    /// `capacity` bytes.
    ///
    /// Longer buffers are truncated and shorter ones zero-padded. Some
    /// firmware revisions answer with a plain integer instead; its low four
    /// bytes are taken in little-endian order.
    ///
    /// # Errors
    /// Evaluation failures, or [`FirmwareError::UnexpectedType`] for results
    /// that are neither buffer nor integer.
    pub fn call_buffer(
        &mut self,
        method: Method,
        arg: u64,
        capacity: usize,
    ) -> Result<Vec<u8>, FirmwareError> {
        let obj = self.call(method, &Payload::wide(arg))?;
        let mut out = match obj {
            Object::Buffer(bytes) => {
                if bytes.len() > capacity {
                    debug!(
                        "{method}({arg:#x}): {} byte buffer truncated to {capacity}",
                        bytes.len()
                    );
                }
                bytes
            }
            #[allow(clippy::cast_possible_truncation)]
            Object::Integer(v) => {
                debug!("{method}({arg:#x}): integer result in place of a buffer");
                (v as u32).to_le_bytes().to_vec()
            }
            other => {
                return Err(FirmwareError::UnexpectedType {
                    method,
                    expected: ObjectKind::Buffer,
                    found: other.kind(),
                });
            }
        };
        out.resize(capacity, 0);
        Ok(out)
    }

    /// Device specific method call on the control device.
    ///
    /// # Errors
    /// Evaluation failures.
    pub fn call_dsm(&mut self, dsm: Dsm) -> Result<Object, FirmwareError> {
        debug!("_DSM function {:#x} arg {:#x?}", dsm.function, dsm.argument);
        self.call(Method::DSM, &Payload::Dsm(dsm))
    }
}
