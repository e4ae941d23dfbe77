//! Weighted substring search over component descriptors.

use crate::component::ComponentDescriptor;
use crate::registry::Registry;

const NAME_WEIGHT: u32 = 10;
const CATEGORY_WEIGHT: u32 = 5;
const DESCRIPTION_WEIGHT: u32 = 3;
const CAPABILITY_WEIGHT: u32 = 2;

/// Relevance of `descriptor` for an already lower-cased `needle`.
#[must_use]
pub fn score(descriptor: &ComponentDescriptor, needle: &str) -> u32 {
    if needle.is_empty() {
        return 0;
    }
    let hit = |haystack: &str| haystack.to_lowercase().contains(needle);

    let mut total: u32 = 0;
    if hit(&descriptor.name) {
        total = total.saturating_add(NAME_WEIGHT);
    }
    if hit(&descriptor.category) {
        total = total.saturating_add(CATEGORY_WEIGHT);
    }
    if hit(&descriptor.description) {
        total = total.saturating_add(DESCRIPTION_WEIGHT);
    }
    for cap in &descriptor.capabilities {
        if hit(&cap.name) || hit(&cap.description) {
            total = total.saturating_add(CAPABILITY_WEIGHT);
        }
    }
    total
}

/// Rank `components` against `query`, dropping zero scores.
///
/// The sort is stable, so ties keep their input order.
#[must_use]
pub fn rank(components: Vec<ComponentDescriptor>, query: &str) -> Vec<(ComponentDescriptor, u32)> {
    let needle = query.trim().to_lowercase();
    let mut scored: Vec<(ComponentDescriptor, u32)> = components
        .into_iter()
        .filter_map(|d| {
            let s = score(&d, &needle);
            (s > 0).then_some((d, s))
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}

impl Registry {
    /// Components matching `query`, best first. An empty query matches
    /// nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<ComponentDescriptor> {
        rank(self.get_all_components(), query)
            .into_iter()
            .map(|(d, _)| d)
            .collect()
    }
}
