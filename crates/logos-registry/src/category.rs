//! Category normalization, display metadata, and per-category defaults.

use serde::Serialize;

use crate::component::{CapabilityDescriptor, ComponentDescriptor};

/// Raw spelling to canonical category.
const SYNONYMS: &[(&str, &str)] = &[
    ("med", "medical"),
    ("medicine", "medical"),
    ("health", "medical"),
    ("healthcare", "medical"),
    ("fin", "finance"),
    ("financial", "finance"),
    ("tech", "technology"),
    ("eng", "engineering"),
    ("biz", "business"),
    ("sci", "sciences"),
    ("science", "sciences"),
    ("math", "mathematics"),
    ("maths", "mathematics"),
    ("geo", "geography"),
    ("env", "environment"),
    ("auto", "automotive"),
    ("law", "legal"),
    ("edu", "education"),
    ("cs", "computer_science"),
    ("compsci", "computer_science"),
    ("econ", "economics"),
];

/// Canonical category, display name, description.
const CATEGORY_INFO: &[(&str, &str, &str)] = &[
    ("medical", "Medical & Health", "Clinical specialties, diagnostics and wellness"),
    ("finance", "Finance", "Investment, accounting, tax and risk"),
    ("legal", "Legal", "Contracts, compliance and regulation"),
    ("technology", "Technology", "Software, infrastructure and security"),
    ("engineering", "Engineering", "Design, analysis and systems engineering"),
    ("business", "Business", "Strategy, operations and management"),
    ("sciences", "Sciences", "Natural and life sciences"),
    ("mathematics", "Mathematics", "Pure and applied mathematics"),
    ("geography", "Geography", "Places, regions and spatial analysis"),
    ("environment", "Environment", "Energy, climate and sustainability"),
    ("automotive", "Automotive", "Vehicles, diagnostics and mobility"),
    ("education", "Education", "Teaching, tutoring and curricula"),
    ("computer_science", "Computer Science", "Algorithms, languages and systems"),
    ("economics", "Economics", "Markets, policy and economic modelling"),
    ("humanities", "Humanities", "History, philosophy and languages"),
    ("arts", "Arts", "Creative work and criticism"),
    ("physics", "Physics", "Physical systems and modelling"),
    ("iot", "Internet of Things", "Connected devices and automation"),
    ("general", "General", "Components without a more specific category"),
];

/// Categories whose components talk to IoT devices unless they say otherwise.
const IOT_CATEGORIES: &[&str] = &["iot", "engineering", "technology", "automotive", "environment"];

/// Categories whose components integrate with vehicles unless they say otherwise.
const AUTOMOTIVE_CATEGORIES: &[&str] = &["automotive", "transportation"];

/// Canonical form of a raw category label.
///
/// Trims, lower-cases and maps spaces and dashes to underscores before
/// consulting the synonym table. Unknown labels pass through in that form.
#[must_use]
pub fn normalize_category(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect();
    if cleaned.is_empty() {
        return "general".to_owned();
    }
    SYNONYMS
        .iter()
        .find(|(from, _)| *from == cleaned)
        .map_or(cleaned, |(_, to)| (*to).to_owned())
}

/// Display name and description for a normalized category.
#[must_use]
pub fn category_info(category: &str) -> (String, String) {
    if let Some((_, name, desc)) = CATEGORY_INFO.iter().find(|(id, ..)| *id == category) {
        return ((*name).to_owned(), (*desc).to_owned());
    }
    let name = title_case(category);
    let desc = format!("{name} specialists");
    (name, desc)
}

/// Whether components in `category` default to IoT support.
#[must_use]
pub fn default_iot(category: &str) -> bool {
    IOT_CATEGORIES.contains(&category)
}

/// Whether components in `category` default to automotive support.
#[must_use]
pub fn default_automotive(category: &str) -> bool {
    AUTOMOTIVE_CATEGORIES.contains(&category)
}

/// The capability set substituted when extraction finds none.
///
/// Always starts with `analyze`, `consult` and `generate`.
#[must_use]
pub fn default_capabilities(category: &str) -> Vec<CapabilityDescriptor> {
    let mut caps = vec![
        CapabilityDescriptor::new("analyze", "Analyze the supplied data")
            .with_required("data", "any")
            .with_parameter("options", "dict"),
        CapabilityDescriptor::new("consult", "Answer a question within the component's domain")
            .with_required("query", "str")
            .with_parameter("context", "dict"),
        CapabilityDescriptor::new("generate", "Generate content from a prompt")
            .with_required("prompt", "str")
            .with_parameter("options", "dict"),
    ];
    caps.extend(category_extras(category));
    caps
}

fn category_extras(category: &str) -> Vec<CapabilityDescriptor> {
    match category {
        "medical" => vec![
            CapabilityDescriptor::new("diagnose", "Suggest differential diagnoses")
                .with_required("symptoms", "list"),
            CapabilityDescriptor::new("treatment_plan", "Outline a treatment plan")
                .with_required("condition", "str"),
        ],
        "finance" => vec![
            CapabilityDescriptor::new("portfolio_analysis", "Assess a portfolio")
                .with_required("portfolio", "dict"),
            CapabilityDescriptor::new("risk_assessment", "Assess financial risk")
                .with_required("profile", "dict"),
        ],
        "legal" => vec![
            CapabilityDescriptor::new("contract_review", "Review a contract")
                .with_required("contract", "str"),
        ],
        "technology" | "computer_science" => vec![
            CapabilityDescriptor::new("code_review", "Review source code")
                .with_required("code", "str")
                .with_parameter("language", "str"),
        ],
        "engineering" => vec![
            CapabilityDescriptor::new("design_review", "Review a technical design")
                .with_required("specification", "str"),
        ],
        "education" => vec![
            CapabilityDescriptor::new("lesson_plan", "Draft a lesson plan")
                .with_required("topic", "str"),
        ],
        "automotive" => vec![
            CapabilityDescriptor::new("vehicle_diagnostics", "Interpret vehicle diagnostic data")
                .with_required("vehicle_data", "dict"),
        ],
        "iot" => vec![
            CapabilityDescriptor::new("device_control", "Send a command to a device")
                .with_required("device_id", "str")
                .with_required("command", "str"),
        ],
        _ => Vec::new(),
    }
}

fn title_case(category: &str) -> String {
    category
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Feature counts within a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureCounts {
    /// Components with audio enabled.
    pub audio: usize,
    /// Components listed in the marketplace.
    pub marketplace: usize,
    /// Components with IoT enabled.
    pub iot: usize,
    /// Components with automotive enabled.
    pub automotive: usize,
}

impl FeatureCounts {
    pub(crate) fn add(&mut self, descriptor: &ComponentDescriptor) {
        let f = &descriptor.feature_flags;
        if f.audio_enabled {
            self.audio = self.audio.saturating_add(1);
        }
        if f.marketplace_enabled {
            self.marketplace = self.marketplace.saturating_add(1);
        }
        if f.iot_enabled {
            self.iot = self.iot.saturating_add(1);
        }
        if f.automotive_enabled {
            self.automotive = self.automotive.saturating_add(1);
        }
    }
}

/// Derived per-category statistics, recomputed on every rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAggregate {
    /// Normalized category id.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Short description.
    pub description: String,
    /// Registered components in this category.
    pub component_count: usize,
    /// Sum of capability counts over those components.
    pub capability_count: usize,
    /// Per-feature counts.
    pub features: FeatureCounts,
}

impl CategoryAggregate {
    /// An empty aggregate for `category`.
    #[must_use]
    pub fn empty(category: &str) -> Self {
        let (display_name, description) = category_info(category);
        Self {
            id: category.to_owned(),
            display_name,
            description,
            component_count: 0,
            capability_count: 0,
            features: FeatureCounts::default(),
        }
    }

    pub(crate) fn add(&mut self, descriptor: &ComponentDescriptor) {
        self.component_count = self.component_count.saturating_add(1);
        self.capability_count = self
            .capability_count
            .saturating_add(descriptor.capabilities.len());
        self.features.add(descriptor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_map_to_canonical() {
        assert_eq!(normalize_category("fin"), "finance");
        assert_eq!(normalize_category("Med"), "medical");
        assert_eq!(normalize_category(" law "), "legal");
        assert_eq!(normalize_category("finance"), "finance");
    }

    #[test]
    fn unknown_categories_pass_through_lowercased() {
        assert_eq!(normalize_category("Earth Sciences"), "earth_sciences");
        assert_eq!(normalize_category("Quantum"), "quantum");
        assert_eq!(normalize_category(""), "general");
    }

    #[test]
    fn defaults_always_include_core_three() {
        for cat in ["general", "medical", "finance", "unknown_thing"] {
            let names: Vec<_> = default_capabilities(cat)
                .into_iter()
                .map(|c| c.name)
                .collect();
            assert_eq!(&names[..3], ["analyze", "consult", "generate"]);
        }
        assert_eq!(default_capabilities("medical").len(), 5);
    }

    #[test]
    fn consult_requires_query() {
        let caps = default_capabilities("general");
        let consult = caps.iter().find(|c| c.name == "consult").unwrap();
        assert_eq!(consult.required_parameters, vec!["query".to_owned()]);
    }

    #[test]
    fn unknown_category_info_is_title_cased() {
        let (name, _) = category_info("earth_sciences");
        assert_eq!(name, "Earth Sciences");
        let (name, _) = category_info("finance");
        assert_eq!(name, "Finance");
    }

    #[test]
    fn feature_allow_lists() {
        assert!(default_iot("engineering"));
        assert!(!default_iot("legal"));
        assert!(default_automotive("automotive"));
        assert!(!default_automotive("medical"));
    }
}
