//! Prelude module - commonly used types for convenient import.
//!
//! Use `use logos_registry::prelude::*;` to import all essential types.

// Errors
pub use crate::{BridgeError, DiscoveryError, RegistryError, RegistryResult};

// Registry
pub use crate::{Registry, RegistryBuilder, RegistryConfig, RegistryState};

// Components
pub use crate::{
    CapabilityDescriptor, ComponentDescriptor, ComponentId, ComponentStats, ExecutionPath,
    FeatureFlags,
};

// Bridge
pub use crate::{BridgeConfig, ExternalBridge};

// Dispatch
pub use crate::{CapabilityHandler, Dispatcher, ExecutionOutcome, NativeComponent};
pub use crate::{UsageEvent, UsageSink};

// Listing
pub use crate::{ComponentFilter, Pagination, SortOrder};
