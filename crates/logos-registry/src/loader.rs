//! Turns a discovered source file into a component descriptor.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::bridge::ExternalBridge;
use crate::category::{default_automotive, default_capabilities, default_iot, normalize_category};
use crate::component::{
    CapabilityDescriptor, ComponentDescriptor, ComponentId, ComponentStats, ExecutionPath,
    FeatureFlags,
};
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::extract::{Dialect, MetadataFragment};

const DEFAULT_VERSION: &str = "1.0.0";
const DEFAULT_AUTHOR: &str = "unknown";

/// Fully resolved metadata: every gap in the extracted fragment filled.
#[derive(Debug, Clone)]
pub struct ComponentMetadata {
    /// Display name.
    pub name: String,
    /// Summary.
    pub description: String,
    /// Version string.
    pub version: String,
    /// Author string.
    pub author: String,
    /// Normalized category.
    pub category: String,
    /// Never empty.
    pub capabilities: Vec<CapabilityDescriptor>,
    /// Declared or defaulted features.
    pub feature_flags: FeatureFlags,
}

impl ComponentMetadata {
    /// Fill the gaps in `fragment` using the file name and category tables.
    #[must_use]
    pub fn resolve(fragment: MetadataFragment, raw_category: &str, path: &Path) -> Self {
        let category = normalize_category(raw_category);
        let name = fragment.name.unwrap_or_else(|| name_from_path(path));
        let description = fragment
            .description
            .unwrap_or_else(|| format!("{name} component"));
        let capabilities = if fragment.capabilities.is_empty() {
            default_capabilities(&category)
        } else {
            fragment.capabilities
        };
        let declared = fragment.features;
        let feature_flags = FeatureFlags {
            audio_enabled: declared.audio.unwrap_or(false),
            marketplace_enabled: declared.marketplace.unwrap_or(false),
            iot_enabled: declared.iot.unwrap_or_else(|| default_iot(&category)),
            automotive_enabled: declared
                .automotive
                .unwrap_or_else(|| default_automotive(&category)),
        };

        Self {
            name,
            description,
            version: fragment.version.unwrap_or_else(|| DEFAULT_VERSION.to_owned()),
            author: fragment.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_owned()),
            category,
            capabilities,
            feature_flags,
        }
    }

    /// The id this metadata registers under.
    #[must_use]
    pub fn id(&self) -> ComponentId {
        ComponentId::derive(&self.category, &self.name)
    }

    /// Build a descriptor with fresh stats.
    #[must_use]
    pub fn into_descriptor(
        self,
        id: ComponentId,
        execution_path: ExecutionPath,
        source_path: Option<PathBuf>,
    ) -> ComponentDescriptor {
        ComponentDescriptor {
            id,
            name: self.name,
            description: self.description,
            version: self.version,
            author: self.author,
            category: self.category,
            capabilities: self.capabilities,
            execution_path,
            feature_flags: self.feature_flags,
            stats: ComponentStats::default(),
            source_path,
        }
    }
}

/// `cardiology_agent.py` to `Cardiology Expert`.
fn name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("component");
    let trimmed = stem
        .strip_suffix("_agent")
        .or_else(|| stem.strip_suffix("-agent"))
        .filter(|s| !s.is_empty());
    let words: Vec<String> = trimmed
        .unwrap_or(stem)
        .split(['_', '-', '.'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect();
    let base = words.join(" ");
    if trimmed.is_some() {
        format!("{base} Expert")
    } else {
        base
    }
}

/// Load one candidate file into a descriptor.
///
/// Python sources become bridged components; script sources are native.
///
/// # Errors
///
/// Returns [`DiscoveryError::NotAnAgent`] for unknown extensions and
/// [`DiscoveryError::FileRead`] if the file cannot be read.
pub async fn load_component(
    bridge: &ExternalBridge,
    path: &Path,
    raw_category: &str,
) -> DiscoveryResult<ComponentDescriptor> {
    let dialect = Dialect::from_path(path).ok_or_else(|| DiscoveryError::NotAnAgent {
        path: path.to_path_buf(),
    })?;
    let fragment = bridge.extract_agent_metadata(path).await?;
    let metadata = ComponentMetadata::resolve(fragment, raw_category, path);
    let id = metadata.id();

    debug!(
        component_id = %id,
        path = %path.display(),
        capabilities = metadata.capabilities.len(),
        "Loaded component metadata"
    );

    Ok(match dialect {
        Dialect::Python => bridge.create_component_wrapper(id, path, metadata),
        Dialect::Script => metadata.into_descriptor(id, ExecutionPath::Native, Some(path.to_path_buf())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_from_file_stem() {
        assert_eq!(name_from_path(Path::new("x/cardiology_agent.py")), "Cardiology Expert");
        assert_eq!(
            name_from_path(Path::new("tax-planning-agent.ts")),
            "Tax Planning Expert"
        );
        assert_eq!(name_from_path(Path::new("agent_template.py")), "Agent Template");
        assert_eq!(name_from_path(Path::new("_agent.py")), "Agent");
    }

    #[test]
    fn empty_fragment_gets_defaults() {
        let meta = ComponentMetadata::resolve(
            MetadataFragment::default(),
            "fin",
            Path::new("tax_agent.py"),
        );
        assert_eq!(meta.category, "finance");
        assert_eq!(meta.name, "Tax Expert");
        assert_eq!(meta.id().as_str(), "finance-tax-expert");
        assert_eq!(meta.version, DEFAULT_VERSION);
        assert!(meta.capabilities.iter().any(|c| c.name == "portfolio_analysis"));
        assert!(!meta.feature_flags.iot_enabled);
    }

    #[test]
    fn declared_features_override_category_defaults() {
        let mut fragment = MetadataFragment::default();
        fragment.features.iot = Some(false);
        let meta = ComponentMetadata::resolve(fragment, "engineering", Path::new("bridge_agent.py"));
        assert!(!meta.feature_flags.iot_enabled);

        let meta = ComponentMetadata::resolve(
            MetadataFragment::default(),
            "engineering",
            Path::new("bridge_agent.py"),
        );
        assert!(meta.feature_flags.iot_enabled);
    }
}
