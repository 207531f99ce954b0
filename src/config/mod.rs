//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ToolkitConfig (validated, immutable)
//!     → CLI flag overrides
//!     → passed by reference to each command
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ContractConfig;
pub use schema::KeysConfig;
pub use schema::NetworkConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
pub use schema::ToolkitConfig;
