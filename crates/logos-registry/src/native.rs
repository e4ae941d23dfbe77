//! In-process components registered by the host.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use logos_telemetry::RequestContext;
use serde_json::{Map, Value};

use crate::category::{default_automotive, default_capabilities, default_iot, normalize_category};
use crate::component::{CapabilityDescriptor, ComponentDescriptor, ComponentId, ExecutionPath, FeatureFlags};
use crate::error::RegistryResult;
use crate::loader::ComponentMetadata;

/// Executes capabilities of a native component.
///
/// Parameters have already been checked against the capability's
/// required list when `call` runs.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    /// Run `capability` with `params`.
    async fn call(
        &self,
        capability: &str,
        params: &Map<String, Value>,
        ctx: &RequestContext,
    ) -> RegistryResult<Value>;
}

/// A host-provided component: descriptor metadata plus its handler.
#[derive(Clone)]
pub struct NativeComponent {
    metadata: ComponentMetadata,
    handler: Arc<dyn CapabilityHandler>,
    explicit_capabilities: bool,
}

impl fmt::Debug for NativeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeComponent")
            .field("id", &self.id())
            .field("capabilities", &self.metadata.capabilities.len())
            .finish_non_exhaustive()
    }
}

impl NativeComponent {
    /// A native component with the category's default capability set.
    pub fn new(
        name: impl Into<String>,
        category: &str,
        handler: impl CapabilityHandler + 'static,
    ) -> Self {
        let name = name.into();
        let category = normalize_category(category);
        let metadata = ComponentMetadata {
            description: format!("{name} component"),
            name,
            version: "1.0.0".to_owned(),
            author: "host".to_owned(),
            capabilities: default_capabilities(&category),
            feature_flags: FeatureFlags {
                iot_enabled: default_iot(&category),
                automotive_enabled: default_automotive(&category),
                ..FeatureFlags::default()
            },
            category,
        };
        Self {
            metadata,
            handler: Arc::new(handler),
            explicit_capabilities: false,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.metadata.version = version.into();
        self
    }

    /// Set the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.metadata.author = author.into();
        self
    }

    /// Declare a capability. The first call replaces the default set.
    #[must_use]
    pub fn with_capability(mut self, capability: CapabilityDescriptor) -> Self {
        if !self.explicit_capabilities {
            self.metadata.capabilities.clear();
            self.explicit_capabilities = true;
        }
        self.metadata.capabilities.retain(|c| c.name != capability.name);
        self.metadata.capabilities.push(capability);
        self
    }

    /// Set feature flags.
    #[must_use]
    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.metadata.feature_flags = features;
        self
    }

    /// The id this component registers under.
    #[must_use]
    pub fn id(&self) -> ComponentId {
        self.metadata.id()
    }

    pub(crate) fn descriptor(&self) -> ComponentDescriptor {
        self.metadata
            .clone()
            .into_descriptor(self.id(), ExecutionPath::Native, None)
    }

    pub(crate) fn handler(&self) -> Arc<dyn CapabilityHandler> {
        Arc::clone(&self.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl CapabilityHandler for Echo {
        async fn call(
            &self,
            capability: &str,
            params: &Map<String, Value>,
            _ctx: &RequestContext,
        ) -> RegistryResult<Value> {
            Ok(serde_json::json!({ "capability": capability, "params": params }))
        }
    }

    #[test]
    fn defaults_then_explicit_capabilities() {
        let c = NativeComponent::new("Tax Advisor", "fin", Echo);
        assert_eq!(c.id().as_str(), "finance-tax-advisor");
        assert!(c.descriptor().has_capability("portfolio_analysis"));

        let c = c
            .with_capability(CapabilityDescriptor::new("estimate", "Estimate tax").with_required("income", "float"))
            .with_capability(CapabilityDescriptor::new("file", "File a return"));
        let d = c.descriptor();
        assert_eq!(d.capabilities.len(), 2);
        assert_eq!(d.execution_path, ExecutionPath::Native);
        assert!(!d.has_capability("consult"));
    }

    #[tokio::test]
    async fn handler_is_callable() {
        let c = NativeComponent::new("Echo", "general", Echo);
        let out = c
            .handler()
            .call("consult", &Map::new(), &RequestContext::new("test"))
            .await
            .unwrap();
        assert_eq!(out["capability"], "consult");
    }
}
