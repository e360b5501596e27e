//! Logging macros gated by a module-level `ENABLE_LOGS` switch.
//!
//! Estimator and controller modules log per frame / per measurement, which is
//! noisy on a phone. Each such module declares its own switch:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("sampled {} frames", count);
//! ```
//!
//! Output goes through the `log` facade, so the host's logger (env_logger in
//! [`crate::init_logging`]) decides the final filtering.

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

/// Also used for recovered failures such as a frame that could not be decoded.
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
