//! Error kinds shared by the FFT and CQT engines
//!
//! The host boundary only sees success/failure, but inside the crate every
//! rejection carries its cause.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Transform length {0} is not a positive power of two")]
    InvalidLength(usize),

    #[error("Parameter `{name}` must be positive (got {value})")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Required buffer pointer is null")]
    NullBuffer,

    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Failed to allocate transform tables")]
    Allocation,

    #[error("Engine is not initialized")]
    Uninitialized,

    #[error("Engine is already initialized; free it before re-initializing")]
    AlreadyInitialized,

    #[error("Kernel bank holds {available} bins but {requested} were requested")]
    BankTooSmall { requested: usize, available: usize },
}

impl From<std::collections::TryReserveError> for TransformError {
    fn from(_: std::collections::TryReserveError) -> Self {
        TransformError::Allocation
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;

/// Allocate a zero-filled vector, reporting allocation failure instead of aborting
pub(crate) fn try_zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, T::default());
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TransformError::InvalidLength(12);
        assert_eq!(err.to_string(), "Transform length 12 is not a positive power of two");

        let err = TransformError::BankTooSmall { requested: 24, available: 12 };
        assert!(err.to_string().contains("24"));
    }

    #[test]
    fn test_try_zeroed() {
        let v: Vec<f32> = try_zeroed(16).unwrap();
        assert_eq!(v.len(), 16);
        assert!(v.iter().all(|&x| x == 0.0));

        let huge: Result<Vec<f32>> = try_zeroed(usize::MAX / 2);
        assert_eq!(huge, Err(TransformError::Allocation));
    }
}
