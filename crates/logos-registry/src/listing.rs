//! Client-facing listing items, filtered listing, and system statistics.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::bridge::BridgeStatus;
use crate::category::{FeatureCounts, normalize_category};
use crate::component::ComponentDescriptor;
use crate::registry::{Registry, RegistryState};
use crate::search;

/// Default page size.
pub const DEFAULT_PAGE_LIMIT: usize = 20;
/// Largest page size honoured.
pub const MAX_PAGE_LIMIT: usize = 100;
/// Length of the top and recent lists in [`SystemStats`].
const STATS_LIST_LEN: usize = 10;

/// Name and summary of one capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilitySummary {
    /// Capability name.
    pub name: String,
    /// First doc line.
    pub description: String,
}

/// Feature switches in listing form.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingFeatures {
    /// Audio.
    pub audio: bool,
    /// Marketplace.
    pub marketplace: bool,
    /// `IoT`.
    pub iot: bool,
    /// Automotive.
    pub automotive: bool,
}

/// Usage metadata in listing form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingMetadata {
    /// Mean rating.
    pub rating: f64,
    /// Invocation count.
    pub usage: u64,
}

/// One component as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingItem {
    /// Component id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Summary.
    pub description: String,
    /// Normalized category.
    pub category: String,
    /// Capabilities, name and description only.
    pub capabilities: Vec<CapabilitySummary>,
    /// Feature switches.
    pub features: ListingFeatures,
    /// Rating and usage.
    pub metadata: ListingMetadata,
}

impl From<&ComponentDescriptor> for ListingItem {
    fn from(d: &ComponentDescriptor) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            description: d.description.clone(),
            category: d.category.clone(),
            capabilities: d
                .capabilities
                .iter()
                .map(|c| CapabilitySummary {
                    name: c.name.clone(),
                    description: c.description.clone(),
                })
                .collect(),
            features: ListingFeatures {
                audio: d.feature_flags.audio_enabled,
                marketplace: d.feature_flags.marketplace_enabled,
                iot: d.feature_flags.iot_enabled,
                automotive: d.feature_flags.automotive_enabled,
            },
            metadata: ListingMetadata {
                rating: d.stats.rating,
                usage: d.stats.usage_count,
            },
        }
    }
}

/// A feature a listing can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// `audioEnabled`
    Audio,
    /// `marketplaceEnabled`
    Marketplace,
    /// `iotEnabled`
    Iot,
    /// `automotiveEnabled`
    Automotive,
}

impl Feature {
    fn enabled_on(self, d: &ComponentDescriptor) -> bool {
        let f = &d.feature_flags;
        match self {
            Self::Audio => f.audio_enabled,
            Self::Marketplace => f.marketplace_enabled,
            Self::Iot => f.iot_enabled,
            Self::Automotive => f.automotive_enabled,
        }
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audio" => Ok(Self::Audio),
            "marketplace" => Ok(Self::Marketplace),
            "iot" => Ok(Self::Iot),
            "automotive" => Ok(Self::Automotive),
            other => Err(format!(
                "unknown feature '{other}'; expected audio, marketplace, iot or automotive"
            )),
        }
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most used first.
    Popularity,
    /// Highest rated first.
    Rating,
    /// Alphabetical by name.
    Name,
    /// Discovery order.
    #[default]
    Discovery,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "popularity" | "usage" => Ok(Self::Popularity),
            "rating" => Ok(Self::Rating),
            "name" => Ok(Self::Name),
            "discovery" => Ok(Self::Discovery),
            other => Err(format!(
                "unknown sort '{other}'; expected popularity, rating, name or discovery"
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Popularity => "popularity",
            Self::Rating => "rating",
            Self::Name => "name",
            Self::Discovery => "discovery",
        })
    }
}

/// Listing filter. Every set field must match.
#[derive(Debug, Clone, Default)]
pub struct ComponentFilter {
    /// Category, synonyms allowed.
    pub category: Option<String>,
    /// Required capability name.
    pub capability: Option<String>,
    /// Required feature.
    pub feature: Option<Feature>,
    /// Free-text query, ranked by relevance unless `sort` is set.
    pub query: Option<String>,
    /// Explicit order.
    pub sort: Option<SortOrder>,
}

/// Offset and limit for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Items to skip.
    pub offset: usize,
    /// Page size, clamped to `1..=100`.
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    /// Pagination with the limit clamped.
    #[must_use]
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Matches before pagination.
    pub total: usize,
    /// Offset used.
    pub offset: usize,
    /// Limit used.
    pub limit: usize,
}

/// Capability totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStats {
    /// Capabilities across all components.
    pub total: usize,
    /// Capabilities per category.
    pub by_category: BTreeMap<String, usize>,
    /// Distinct capability names.
    pub unique: usize,
}

/// Registry-wide statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    /// Registered components.
    pub total_components: usize,
    /// Non-empty categories.
    pub total_categories: usize,
    /// Components per category.
    pub components_by_category: BTreeMap<String, usize>,
    /// Capability totals.
    pub capabilities: CapabilityStats,
    /// Feature counts across all components.
    pub features: FeatureCounts,
    /// Most used, ties by rating then discovery order.
    pub top_components: Vec<ListingItem>,
    /// Most recently discovered, newest first.
    pub recently_added: Vec<ListingItem>,
    /// Interpreter probe result.
    pub bridge: BridgeStatus,
    /// Lifecycle state.
    pub state: RegistryState,
}

fn by_popularity(a: &ComponentDescriptor, b: &ComponentDescriptor) -> Ordering {
    b.stats
        .usage_count
        .cmp(&a.stats.usage_count)
        .then_with(|| b.stats.rating.total_cmp(&a.stats.rating))
}

impl Registry {
    /// Filtered, sorted, paginated listing.
    #[must_use]
    pub fn list_components(&self, filter: &ComponentFilter, pagination: Pagination) -> Page<ListingItem> {
        let category = filter.category.as_deref().map(normalize_category);
        let mut matches: Vec<ComponentDescriptor> = self
            .get_all_components()
            .into_iter()
            .filter(|d| category.as_ref().is_none_or(|c| &d.category == c))
            .filter(|d| {
                filter
                    .capability
                    .as_deref()
                    .is_none_or(|cap| d.has_capability(cap))
            })
            .filter(|d| filter.feature.is_none_or(|f| f.enabled_on(d)))
            .collect();

        if let Some(query) = filter.query.as_deref().filter(|q| !q.trim().is_empty()) {
            matches = search::rank(matches, query)
                .into_iter()
                .map(|(d, _)| d)
                .collect();
        }

        match filter.sort {
            Some(SortOrder::Popularity) => matches.sort_by(by_popularity),
            Some(SortOrder::Rating) => {
                matches.sort_by(|a, b| b.stats.rating.total_cmp(&a.stats.rating));
            },
            Some(SortOrder::Name) => {
                matches.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            },
            Some(SortOrder::Discovery) | None => {},
        }

        let pagination = Pagination::new(pagination.offset, pagination.limit);
        let total = matches.len();
        let items = matches
            .iter()
            .skip(pagination.offset)
            .take(pagination.limit)
            .map(ListingItem::from)
            .collect();

        Page {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        }
    }

    /// Registry-wide counts plus bridge health.
    #[must_use]
    pub fn system_stats(&self) -> SystemStats {
        let all = self.get_all_components();

        let mut components_by_category = BTreeMap::new();
        let mut capabilities_by_category: BTreeMap<String, usize> = BTreeMap::new();
        let mut unique = BTreeSet::new();
        let mut features = FeatureCounts::default();
        let mut total_capabilities: usize = 0;

        for d in &all {
            let count = components_by_category.entry(d.category.clone()).or_insert(0_usize);
            *count = count.saturating_add(1);
            let caps = capabilities_by_category.entry(d.category.clone()).or_insert(0);
            *caps = caps.saturating_add(d.capabilities.len());
            total_capabilities = total_capabilities.saturating_add(d.capabilities.len());
            unique.extend(d.capabilities.iter().map(|c| c.name.clone()));
            features.add(d);
        }

        let mut popular: Vec<&ComponentDescriptor> = all.iter().collect();
        popular.sort_by(|a, b| by_popularity(a, b));
        let top_components = popular
            .into_iter()
            .take(STATS_LIST_LEN)
            .map(ListingItem::from)
            .collect();
        let recently_added = all
            .iter()
            .rev()
            .take(STATS_LIST_LEN)
            .map(ListingItem::from)
            .collect();

        SystemStats {
            total_components: all.len(),
            total_categories: components_by_category.len(),
            components_by_category,
            capabilities: CapabilityStats {
                total: total_capabilities,
                by_category: capabilities_by_category,
                unique: unique.len(),
            },
            features,
            top_components,
            recently_added,
            bridge: self.bridge().status(),
            state: self.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        assert_eq!(Pagination::new(0, 0).limit, 1);
        assert_eq!(Pagination::new(5, 1000).limit, MAX_PAGE_LIMIT);
        assert_eq!(Pagination::default().limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn sort_and_feature_parse() {
        assert_eq!("Rating".parse::<SortOrder>().unwrap(), SortOrder::Rating);
        assert_eq!("usage".parse::<SortOrder>().unwrap(), SortOrder::Popularity);
        assert!("random".parse::<SortOrder>().is_err());
        assert_eq!("IOT".parse::<Feature>().unwrap(), Feature::Iot);
        assert!("video".parse::<Feature>().is_err());
    }
}
