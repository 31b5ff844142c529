//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Read once at startup; there is no reload path
//! - Every section is optional, so an empty file yields `ServerConfig::default()`
//! - serde handles shape errors; `validate_config` reports every semantic error at once
//! - The CLI may override the bind address, after which validation runs again

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, RoutingConfig, ServerConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
