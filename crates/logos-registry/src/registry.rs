//! The component registry.
//!
//! Readers work against an immutable [`Snapshot`] behind an `Arc`. A
//! rebuild (initialize or refresh) assembles a new snapshot off to the side
//! and swaps it in with one write, so no reader ever sees a half-built
//! index. Rebuilds are serialized by an async lifecycle mutex.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;
use tracing::{info, warn};

use crate::bridge::{BridgeConfig, ExternalBridge};
use crate::category::{CategoryAggregate, normalize_category};
use crate::component::{ComponentDescriptor, ComponentId, ComponentStats};
use crate::discovery::{DiscoveryReport, RegistryConfig, run_discovery};
use crate::error::{RegistryError, RegistryResult};
use crate::native::{CapabilityHandler, NativeComponent};

/// Registry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryState {
    /// Nothing loaded yet.
    Uninitialized,
    /// First discovery pass running.
    Initializing,
    /// Serving a settled snapshot.
    Ready,
    /// Serving the old snapshot while a new one is built.
    Refreshing,
}

/// One registered component with its live counters.
pub(crate) struct Entry {
    pub(crate) descriptor: ComponentDescriptor,
    pub(crate) stats: Mutex<ComponentStats>,
    pub(crate) handler: Option<Arc<dyn CapabilityHandler>>,
}

impl Entry {
    fn new(descriptor: ComponentDescriptor, handler: Option<Arc<dyn CapabilityHandler>>) -> Self {
        let stats = Mutex::new(descriptor.stats.clone());
        Self {
            descriptor,
            stats,
            handler,
        }
    }

    /// Copy of the counters.
    pub(crate) fn stats(&self) -> ComponentStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` to the counters under the lock.
    pub(crate) fn update_stats<R>(&self, f: impl FnOnce(&mut ComponentStats) -> R) -> R {
        let mut guard = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Descriptor with the current counters filled in.
    pub(crate) fn snapshot(&self) -> ComponentDescriptor {
        let mut d = self.descriptor.clone();
        d.stats = self.stats();
        d
    }
}

/// Immutable indices over one generation of components.
#[derive(Default)]
pub(crate) struct Snapshot {
    /// Discovery order.
    pub(crate) entries: Vec<Arc<Entry>>,
    by_id: HashMap<ComponentId, usize>,
    by_category: HashMap<String, Vec<usize>>,
    categories: BTreeMap<String, CategoryAggregate>,
}

impl Snapshot {
    /// Insert unless the id is taken. Returns whether it was inserted.
    fn insert(&mut self, entry: Entry) -> bool {
        let id = entry.descriptor.id.clone();
        if self.by_id.contains_key(&id) {
            return false;
        }
        let idx = self.entries.len();
        self.by_category
            .entry(entry.descriptor.category.clone())
            .or_default()
            .push(idx);
        self.by_id.insert(id, idx);
        self.entries.push(Arc::new(entry));
        true
    }

    fn recompute_aggregates(&mut self) {
        let mut categories: BTreeMap<String, CategoryAggregate> = BTreeMap::new();
        for entry in &self.entries {
            let d = &entry.descriptor;
            categories
                .entry(d.category.clone())
                .or_insert_with(|| CategoryAggregate::empty(&d.category))
                .add(d);
        }
        self.categories = categories;
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Arc<Entry>> {
        self.by_id
            .get(&ComponentId::new(id))
            .and_then(|&i| self.entries.get(i))
    }

    fn in_category(&self, category: &str) -> impl Iterator<Item = &Arc<Entry>> {
        self.by_category
            .get(category)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.entries.get(i))
    }

    fn clone_shallow(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            by_id: self.by_id.clone(),
            by_category: self.by_category.clone(),
            categories: self.categories.clone(),
        }
    }
}

/// Builder for [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    config: RegistryConfig,
    bridge_config: BridgeConfig,
    bridge: Option<Arc<ExternalBridge>>,
    natives: Vec<NativeComponent>,
}

impl RegistryBuilder {
    /// Discovery settings.
    #[must_use]
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Bridge settings, used unless a bridge is supplied directly.
    #[must_use]
    pub fn bridge_config(mut self, config: BridgeConfig) -> Self {
        self.bridge_config = config;
        self
    }

    /// Use an existing bridge.
    #[must_use]
    pub fn bridge(mut self, bridge: Arc<ExternalBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Register a native component ahead of discovered files.
    #[must_use]
    pub fn native(mut self, component: NativeComponent) -> Self {
        self.natives.push(component);
        self
    }

    /// Build the registry. Nothing is discovered until
    /// [`Registry::initialize`].
    #[must_use]
    pub fn build(self) -> Registry {
        let bridge = self
            .bridge
            .unwrap_or_else(|| Arc::new(ExternalBridge::new(self.bridge_config)));
        Registry {
            config: self.config,
            bridge,
            natives: self.natives,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            state: Mutex::new(RegistryState::Uninitialized),
            last_report: Mutex::new(DiscoveryReport::default()),
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }
}

/// The central component store.
///
/// Construct one per process and share it by reference or `Arc`.
pub struct Registry {
    config: RegistryConfig,
    bridge: Arc<ExternalBridge>,
    natives: Vec<NativeComponent>,
    snapshot: RwLock<Arc<Snapshot>>,
    state: Mutex<RegistryState>,
    last_report: Mutex<DiscoveryReport>,
    lifecycle: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("state", &self.state())
            .field("components", &self.len())
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// A registry with the given discovery and bridge settings.
    #[must_use]
    pub fn new(config: RegistryConfig, bridge_config: BridgeConfig) -> Self {
        Self::builder()
            .config(config)
            .bridge_config(bridge_config)
            .build()
    }

    /// Discovery settings.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The bridge used for bridged components.
    #[must_use]
    pub fn bridge(&self) -> &ExternalBridge {
        &self.bridge
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RegistryState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: RegistryState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Report from the most recent completed rebuild.
    #[must_use]
    pub fn last_report(&self) -> DiscoveryReport {
        self.last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn swap(&self, next: Snapshot) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }

    /// Probe the bridge and run discovery.
    ///
    /// A second call, or a call racing another initialize, is a logged
    /// no-op returning the existing report.
    ///
    /// # Errors
    ///
    /// Per-file discovery failures land in the report, not here. Currently
    /// always `Ok`.
    pub async fn initialize(&self) -> RegistryResult<DiscoveryReport> {
        let _guard = self.lifecycle.lock().await;
        if self.state() == RegistryState::Ready {
            info!("Registry already initialized, skipping");
            return Ok(self.last_report());
        }

        self.set_state(RegistryState::Initializing);
        let (snapshot, report) = self.build_snapshot().await;
        self.install(snapshot, &report);
        Ok(report)
    }

    /// Rebuild from scratch and swap the result in atomically.
    ///
    /// Readers keep the previous snapshot until the swap. Counters start
    /// over because every descriptor is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RefreshInProgress`] if another rebuild holds
    /// the lifecycle lock.
    pub async fn refresh(&self) -> RegistryResult<DiscoveryReport> {
        let Ok(_guard) = self.lifecycle.try_lock() else {
            warn!("Refresh requested while another rebuild is running");
            return Err(RegistryError::RefreshInProgress);
        };

        self.set_state(RegistryState::Refreshing);
        let (snapshot, report) = self.build_snapshot().await;
        self.install(snapshot, &report);
        Ok(report)
    }

    fn install(&self, snapshot: Snapshot, report: &DiscoveryReport) {
        let count = snapshot.entries.len();
        let categories = snapshot.categories.len();
        self.swap(snapshot);
        *self
            .last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = report.clone();
        self.set_state(RegistryState::Ready);
        info!(components = count, categories, "Registry ready");
    }

    async fn build_snapshot(&self) -> (Snapshot, DiscoveryReport) {
        self.bridge.initialize().await;

        let mut next = Snapshot::default();
        let mut native = 0_usize;
        for component in &self.natives {
            if next.insert(Entry::new(component.descriptor(), Some(component.handler()))) {
                native = native.saturating_add(1);
            } else {
                warn!(component_id = %component.id(), "Duplicate native component id, keeping first");
            }
        }

        let mut report = run_discovery(&self.config, &self.bridge, |descriptor| {
            next.insert(Entry::new(descriptor, None))
        })
        .await;
        report.native = native;

        next.recompute_aggregates();
        (next, report)
    }

    /// Add one component to the live snapshot.
    ///
    /// The category is normalized first. A duplicate id is a no-op and
    /// returns `false`. Components added this way do not survive a refresh.
    pub async fn register_component(&self, mut descriptor: ComponentDescriptor) -> bool {
        let _guard = self.lifecycle.lock().await;
        descriptor.category = normalize_category(&descriptor.category);

        let mut next = self.current().clone_shallow();
        let id = descriptor.id.clone();
        if !next.insert(Entry::new(descriptor, None)) {
            info!(component_id = %id, "Component already registered, ignoring");
            return false;
        }
        next.recompute_aggregates();
        self.swap(next);
        info!(component_id = %id, "Registered component");
        true
    }

    /// Number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current().entries.len()
    }

    /// Whether no components are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up one component.
    #[must_use]
    pub fn get_component(&self, id: &str) -> Option<ComponentDescriptor> {
        self.current().get(id).map(|e| e.snapshot())
    }

    /// All components in discovery order.
    #[must_use]
    pub fn get_all_components(&self) -> Vec<ComponentDescriptor> {
        self.current().entries.iter().map(|e| e.snapshot()).collect()
    }

    /// Components in a category. The query is normalized, so synonyms work.
    #[must_use]
    pub fn get_components_by_category(&self, category: &str) -> Vec<ComponentDescriptor> {
        let category = normalize_category(category);
        self.current()
            .in_category(&category)
            .map(|e| e.snapshot())
            .collect()
    }

    /// Aggregates for every non-empty category, ordered by id.
    #[must_use]
    pub fn get_all_categories(&self) -> Vec<CategoryAggregate> {
        self.current().categories.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{CapabilityDescriptor, ExecutionPath, FeatureFlags};

    fn descriptor(id: &str, category: &str) -> ComponentDescriptor {
        ComponentDescriptor {
            id: ComponentId::new(id),
            name: id.to_owned(),
            description: String::new(),
            version: "1.0.0".into(),
            author: "test".into(),
            category: category.into(),
            capabilities: vec![CapabilityDescriptor::new("consult", "")],
            execution_path: ExecutionPath::Native,
            feature_flags: FeatureFlags {
                audio_enabled: true,
                ..FeatureFlags::default()
            },
            stats: ComponentStats::default(),
            source_path: None,
        }
    }

    fn registry() -> Registry {
        Registry::builder()
            .config(RegistryConfig::with_roots(Vec::<std::path::PathBuf>::new()))
            .bridge(Arc::new(ExternalBridge::simulated(BridgeConfig::default())))
            .build()
    }

    #[tokio::test]
    async fn refresh_is_rejected_while_rebuild_holds_lock() {
        let registry = registry();
        registry.initialize().await.unwrap();

        let guard = registry.lifecycle.lock().await;
        let err = registry.refresh().await.unwrap_err();
        assert!(matches!(err, RegistryError::RefreshInProgress));
        assert_eq!(registry.state(), RegistryState::Ready);
        drop(guard);

        assert!(registry.refresh().await.is_ok());
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let registry = registry();
        assert!(registry.register_component(descriptor("finance-a", "finance")).await);
        assert!(!registry.register_component(descriptor("finance-a", "finance")).await);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn register_normalizes_category() {
        let registry = registry();
        registry.register_component(descriptor("x", "fin")).await;

        let d = registry.get_component("x").unwrap();
        assert_eq!(d.category, "finance");
        assert_eq!(registry.get_components_by_category("finance").len(), 1);
        assert_eq!(registry.get_components_by_category("fin").len(), 1);
    }

    #[tokio::test]
    async fn aggregates_track_components() {
        let registry = registry();
        registry.register_component(descriptor("a", "legal")).await;
        registry.register_component(descriptor("b", "legal")).await;
        registry.register_component(descriptor("c", "medical")).await;

        let cats = registry.get_all_categories();
        assert_eq!(cats.len(), 2);
        let legal = cats.iter().find(|c| c.id == "legal").unwrap();
        assert_eq!(legal.component_count, 2);
        assert_eq!(legal.capability_count, 2);
        assert_eq!(legal.features.audio, 2);
        assert_eq!(legal.display_name, "Legal");
    }

    #[tokio::test]
    async fn empty_initialize_reaches_ready() {
        let registry = registry();
        assert_eq!(registry.state(), RegistryState::Uninitialized);
        let report = registry.initialize().await.unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(registry.state(), RegistryState::Ready);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn readers_keep_old_snapshot() {
        let registry = registry();
        registry.register_component(descriptor("a", "legal")).await;
        let held = registry.current();
        registry.register_component(descriptor("b", "legal")).await;

        assert_eq!(held.entries.len(), 1);
        assert_eq!(registry.len(), 2);
    }
}
