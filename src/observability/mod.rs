//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! rpc / walker / stream / faucet produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms, gauges)
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//!     → whatever `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - The library never installs a metrics recorder; without one the macros are no-ops
//! - Secrets (mnemonics, signatures) are never logged

pub mod logging;
pub mod metrics;
