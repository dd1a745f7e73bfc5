//! Spectral CQT - FFT and Constant-Q Transform Core
//!
//! In-place radix-2 FFT and constant-Q analysis over host-owned buffers,
//! exposed to wasm/C hosts through [`ffi`] and to Python through PyO3.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod error;
pub mod spectrum;
pub mod cqt;
pub mod ffi;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{Result, TransformError};
pub use spectrum::{ConstantQAnalyzer, FftEngine};
pub use cqt::{CqtConfig, CqtEngine};
