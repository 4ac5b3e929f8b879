//! Shared utilities
//! Author: kartik4091

pub mod logging;

pub use self::logging::{init_logging, LogLevel};
