//! Constant-Q transform built on the FFT engine

pub mod config;
pub mod kernel;
pub mod engine;

pub use config::CqtConfig;
pub use kernel::KernelBank;
pub use engine::CqtEngine;
