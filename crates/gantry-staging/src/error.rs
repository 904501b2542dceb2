//! Staging allocator error types.

use std::error::Error;
use std::fmt;

use gantry_core::AllocError;

/// Errors from staging pool construction and allocation.
///
/// Transient unavailability (an active ring region) is never an error —
/// it is resolved internally by the pooled fallback. The only runtime
/// failure a caller can observe is device memory exhaustion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StagingError {
    /// A configuration invariant was violated.
    InvalidConfig {
        /// Which invariant failed.
        reason: &'static str,
    },
    /// The device allocator failed. Unrecoverable.
    Device(AllocError),
}

impl fmt::Display for StagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => {
                write!(f, "invalid staging configuration: {reason}")
            }
            Self::Device(err) => write!(f, "device allocation failed: {err}"),
        }
    }
}

impl Error for StagingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Device(err) => Some(err),
            Self::InvalidConfig { .. } => None,
        }
    }
}

impl From<AllocError> for StagingError {
    fn from(err: AllocError) -> Self {
        Self::Device(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::MemoryUsage;

    #[test]
    fn device_error_wraps_with_source() {
        let inner = AllocError::OutOfDeviceMemory {
            requested: 1024,
            usage: MemoryUsage::Download,
        };
        let err = StagingError::from(inner.clone());
        assert_eq!(err, StagingError::Device(inner));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("1024"));
    }

    #[test]
    fn invalid_config_displays_reason() {
        let err = StagingError::InvalidConfig {
            reason: "ring_capacity must be positive",
        };
        assert!(err.to_string().contains("ring_capacity"));
    }
}
