//! Shared error types.

use std::error::Error;
use std::fmt;

use crate::device::MemoryUsage;

/// Device memory allocation failure.
///
/// Surfaced when the backend cannot satisfy an `alloc_buffer` call. There
/// is no recovery path inside the pools: the error propagates to the host,
/// which terminates or reinitialises the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The device is out of memory for the requested usage class.
    OutOfDeviceMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Usage class of the failed request.
        usage: MemoryUsage,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfDeviceMemory { requested, usage } => {
                write!(
                    f,
                    "out of device memory: requested {requested} bytes of {usage} memory"
                )
            }
        }
    }
}

impl Error for AllocError {}
