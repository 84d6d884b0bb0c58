//! Logging macros gated on a per-module `ENABLE_LOGS` const.
//!
//! Modules opt in by declaring the flag and importing the macros from the
//! crate root:
//!
//! ```rust
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info};
//! ```
//!
//! With the flag set to `false` the call sites compile away to nothing,
//! which keeps hot paths (the per-tick evaluation) quiet without touching
//! the `RUST_LOG` filter.

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
