//! Component and capability descriptors.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Globally unique component identifier, `{category}-{slug(name)}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// Derive the id from an already normalized category and a display name.
    #[must_use]
    pub fn derive(category: &str, name: &str) -> Self {
        Self(format!("{category}-{}", slugify(name)))
    }

    /// Wrap an existing id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ComponentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ComponentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Lower-case `text`, collapsing every run of non-alphanumerics to one `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// One declared parameter of a capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name as passed in the request params.
    pub name: String,
    /// Human-readable type hint.
    pub hint: String,
}

/// The normalized shape of one invocable operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    /// Operation name, unique within its component.
    pub name: String,
    /// First line of documentation.
    pub description: String,
    /// Declared parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Names of parameters that must be present on invocation.
    pub required_parameters: Vec<String>,
}

impl CapabilityDescriptor {
    /// A capability with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            required_parameters: Vec::new(),
        }
    }

    /// Add an optional parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, hint: impl Into<String>) -> Self {
        self.push_parameter(name.into(), hint.into(), false);
        self
    }

    /// Add a required parameter.
    #[must_use]
    pub fn with_required(mut self, name: impl Into<String>, hint: impl Into<String>) -> Self {
        self.push_parameter(name.into(), hint.into(), true);
        self
    }

    /// Append a parameter, keeping `required_parameters` a subset of
    /// `parameters`. A repeated name is ignored.
    pub fn push_parameter(&mut self, name: String, hint: String, required: bool) {
        if self.parameters.iter().any(|p| p.name == name) {
            return;
        }
        if required {
            self.required_parameters.push(name.clone());
        }
        self.parameters.push(Parameter { name, hint });
    }

    /// First required parameter (in declaration order) absent from `params`.
    #[must_use]
    pub fn first_missing<'a>(
        &'a self,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Option<&'a str> {
        self.required_parameters
            .iter()
            .find(|name| !params.contains_key(name.as_str()))
            .map(String::as_str)
    }
}

/// How calls to a component are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPath {
    /// In-process handler (or the generic echo fallback when none is set).
    Native,
    /// A fresh external interpreter process per call.
    Bridged,
}

impl fmt::Display for ExecutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Bridged => f.write_str("bridged"),
        }
    }
}

/// Optional feature switches a component declares.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    /// Accepts or produces audio.
    pub audio_enabled: bool,
    /// Listed in the marketplace.
    pub marketplace_enabled: bool,
    /// Talks to IoT devices.
    pub iot_enabled: bool,
    /// Integrates with vehicles.
    pub automotive_enabled: bool,
}

/// Usage and rating counters. The only mutable part of a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStats {
    /// Number of dispatched invocations.
    pub usage_count: u64,
    /// Mean rating in `[0, 5]`.
    pub rating: f64,
    /// Last time either counter changed.
    pub last_updated: DateTime<Utc>,
}

impl Default for ComponentStats {
    fn default() -> Self {
        Self {
            usage_count: 0,
            rating: 5.0,
            last_updated: Utc::now(),
        }
    }
}

impl ComponentStats {
    /// Count one invocation.
    pub fn record_usage(&mut self) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.last_updated = Utc::now();
    }

    /// Fold a new rating into the running mean weighted by usage.
    #[allow(clippy::cast_precision_loss)]
    pub fn apply_rating(&mut self, rating: f64) {
        let weight = self.usage_count as f64;
        self.rating = ((self.rating * weight + rating) / (weight + 1.0)).clamp(0.0, 5.0);
        self.last_updated = Utc::now();
    }
}

/// The normalized shape of one registered component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    /// Unique id.
    pub id: ComponentId,
    /// Display name.
    pub name: String,
    /// Human-readable summary.
    pub description: String,
    /// Declared version.
    pub version: String,
    /// Declared author.
    pub author: String,
    /// Normalized category.
    pub category: String,
    /// Never empty once registered.
    pub capabilities: Vec<CapabilityDescriptor>,
    /// Dispatch discriminant.
    pub execution_path: ExecutionPath,
    /// Declared or category-defaulted features.
    pub feature_flags: FeatureFlags,
    /// Counters as of when this copy was taken.
    pub stats: ComponentStats,
    /// Source file the component was discovered from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl ComponentDescriptor {
    /// Look up a capability by name.
    #[must_use]
    pub fn capability(&self, name: &str) -> Option<&CapabilityDescriptor> {
        self.capabilities.iter().find(|c| c.name == name)
    }

    /// Whether the component declares the capability.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        self.capability(name).is_some()
    }
}
