//! Logos Registry - capability registry and cross-runtime dispatch.
//!
//! This crate provides:
//! - Filesystem discovery of expert components with category inference
//! - Static metadata extraction from Python and script sources
//! - An external interpreter bridge with a deterministic simulated fallback
//! - A snapshot-based registry with category aggregates
//! - Capability dispatch, feedback, weighted search and listings
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use logos_registry::prelude::*;
//!
//! # async fn run() -> Result<(), RegistryError> {
//! let registry = Arc::new(Registry::new(
//!     RegistryConfig::with_roots(["./agents"]),
//!     BridgeConfig::default(),
//! ));
//! registry.initialize().await?;
//!
//! let dispatcher = Dispatcher::new(Arc::clone(&registry));
//! let outcome = dispatcher
//!     .chat("finance-tax-expert", "How do I file?", "user-1")
//!     .await?;
//! println!("{}", outcome.result);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod bridge;
pub mod category;
pub mod component;
pub mod discovery;
pub mod dispatcher;
pub mod error;
pub mod extract;
pub mod listing;
pub mod loader;
pub mod native;
pub mod prelude;
pub mod registry;
pub mod search;
pub mod usage;

pub use bridge::{BridgeConfig, BridgeStatus, ExternalBridge, is_simulated};
pub use category::{CategoryAggregate, FeatureCounts, normalize_category};
pub use component::{
    CapabilityDescriptor, ComponentDescriptor, ComponentId, ComponentStats, ExecutionPath,
    FeatureFlags, Parameter,
};
pub use discovery::{DiscoveryReport, DiscoveryWarning, RegistryConfig};
pub use dispatcher::{Dispatcher, ExecutionOutcome};
pub use error::{
    BridgeError, BridgeResult, DiscoveryError, DiscoveryResult, RegistryError, RegistryResult,
};
pub use listing::{
    ComponentFilter, Feature, ListingItem, Page, Pagination, SortOrder, SystemStats,
};
pub use native::{CapabilityHandler, NativeComponent};
pub use registry::{Registry, RegistryBuilder, RegistryState};
pub use usage::{UsageEvent, UsageSink};
