//! Logos Telemetry - logging and request correlation for the capability registry.
//!
//! This crate provides:
//! - Configurable `tracing` subscriber setup with several output formats
//! - A [`RequestContext`] that ties every capability invocation to a caller
//!   and a correlation id
//!
//! # Example
//!
//! ```rust,no_run
//! use logos_telemetry::{LogConfig, LogFormat, RequestContext, setup_logging};
//!
//! # fn main() -> Result<(), logos_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("logos_registry::bridge=trace");
//! setup_logging(&config)?;
//!
//! let ctx = RequestContext::new("dispatcher").with_caller("user-42");
//! let span = ctx.span();
//! let _guard = span.enter();
//! tracing::info!("Dispatching capability");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::RequestContext;
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging,
};
