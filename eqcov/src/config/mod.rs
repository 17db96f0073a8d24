//! Configuration for the coverage checker.
//!
//! - Environment variable parsing with type safety (`EQCOV_*`)
//! - TOML configuration tables
//! - Source tracking for debugging

pub mod checker;
pub mod env;
pub mod source;

pub use checker::CheckerConfig;
pub use env::{EnvError, EnvParser};
pub use source::{ConfigSource, Sourced};

#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
