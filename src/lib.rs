//! Extensibility core of a plugin-driven task runner.
//!
//! Plugins declare typed global parameters, register hook handlers and
//! contribute tasks; a [`RuntimeEnvironment`](prelude::RuntimeEnvironment)
//! assembles them.
//!

pub use hardhat_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hardhat_internal::prelude::*;
}
