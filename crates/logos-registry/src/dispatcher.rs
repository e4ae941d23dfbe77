//! Capability dispatch.
//!
//! Looks the component up in the current snapshot, validates the request
//! against the capability contract, then routes it to a native handler,
//! the external bridge, or the echo fallback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use logos_telemetry::RequestContext;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::component::{ComponentStats, ExecutionPath};
use crate::error::{RegistryError, RegistryResult};
use crate::registry::{Entry, Registry, RegistryState};
use crate::usage::{UsageEvent, UsageSink};

/// Successful invocation result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    /// Always `true`; failures are returned as errors.
    pub success: bool,
    /// Component that ran.
    pub component_id: String,
    /// Capability that ran.
    pub capability_name: String,
    /// Whatever the capability returned.
    pub result: Value,
    /// Completion time.
    pub timestamp: DateTime<Utc>,
}

/// Routes capability invocations for a [`Registry`].
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    usage_sink: Option<Arc<dyn UsageSink>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("usage_sink", &self.usage_sink.is_some())
            .finish()
    }
}

impl Dispatcher {
    /// Dispatcher over `registry`.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            usage_sink: None,
        }
    }

    /// Notify `sink` after each successful dispatch.
    #[must_use]
    pub fn with_usage_sink(mut self, sink: Arc<dyn UsageSink>) -> Self {
        self.usage_sink = Some(sink);
        self
    }

    /// The registry being dispatched against.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    fn lookup(&self, component_id: &str) -> RegistryResult<Arc<Entry>> {
        if self.registry.state() == RegistryState::Uninitialized {
            return Err(RegistryError::NotInitialized);
        }
        self.registry
            .current()
            .get(component_id)
            .cloned()
            .ok_or_else(|| RegistryError::ComponentNotFound(component_id.to_owned()))
    }

    /// Invoke one capability.
    ///
    /// Usage is counted once the request passes validation, before
    /// execution, so failed executions still count.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotInitialized`] before the first discovery pass
    /// - [`RegistryError::ComponentNotFound`] / [`RegistryError::CapabilityNotFound`]
    /// - [`RegistryError::Validation`] naming the first missing required parameter
    /// - [`RegistryError::Bridge`] or [`RegistryError::Native`] when execution fails
    pub async fn execute_capability(
        &self,
        component_id: &str,
        capability: &str,
        params: Map<String, Value>,
        caller_id: &str,
    ) -> RegistryResult<ExecutionOutcome> {
        let ctx = RequestContext::new("dispatcher")
            .with_caller(caller_id)
            .with_operation(capability)
            .with_metadata("component_id", component_id);
        let span = info_span!(
            "dispatch",
            component_id,
            capability,
            caller_id,
            request_id = %ctx.request_id,
        );

        self.dispatch(component_id, capability, params, &ctx)
            .instrument(span)
            .await
    }

    async fn dispatch(
        &self,
        component_id: &str,
        capability: &str,
        params: Map<String, Value>,
        ctx: &RequestContext,
    ) -> RegistryResult<ExecutionOutcome> {
        // The snapshot read lock is released inside lookup; nothing below
        // holds a registry lock across execution.
        let entry = self.lookup(component_id)?;
        let descriptor = &entry.descriptor;

        let cap = descriptor
            .capability(capability)
            .ok_or_else(|| RegistryError::CapabilityNotFound {
                component: component_id.to_owned(),
                capability: capability.to_owned(),
            })?;
        if let Some(field) = cap.first_missing(&params) {
            debug!(field, "Missing required parameter");
            return Err(RegistryError::Validation {
                field: field.to_owned(),
            });
        }

        entry.update_stats(ComponentStats::record_usage);

        let result = match (&entry.handler, descriptor.execution_path, &descriptor.source_path) {
            (Some(handler), ..) => handler.call(capability, &params, ctx).await?,
            (None, ExecutionPath::Bridged, Some(path)) => self
                .registry
                .bridge()
                .execute_capability(path, capability, &params)
                .await
                .inspect_err(|e| warn!(error = %e, "Bridged execution failed"))?,
            _ => echo(component_id, capability, &params),
        };

        let timestamp = Utc::now();
        info!(elapsed_ms = ctx.elapsed_ms(), "Capability executed");
        self.notify_usage(component_id, capability, ctx, timestamp);

        Ok(ExecutionOutcome {
            success: true,
            component_id: component_id.to_owned(),
            capability_name: capability.to_owned(),
            result,
            timestamp,
        })
    }

    fn notify_usage(
        &self,
        component_id: &str,
        capability: &str,
        ctx: &RequestContext,
        timestamp: DateTime<Utc>,
    ) {
        let Some(sink) = &self.usage_sink else {
            return;
        };
        let sink = Arc::clone(sink);
        let event = UsageEvent {
            component_id: component_id.to_owned(),
            caller_id: ctx.caller_id.clone().unwrap_or_default(),
            capability: capability.to_owned(),
            timestamp,
        };
        tokio::spawn(
            async move {
                if let Err(e) = sink.record(event).await {
                    warn!(error = %e, "Usage sink rejected event");
                }
            }
            .in_current_span(),
        );
    }

    /// Ask a component a free-text question via its `consult` capability.
    ///
    /// # Errors
    ///
    /// Same as [`execute_capability`](Self::execute_capability).
    pub async fn chat(
        &self,
        component_id: &str,
        message: &str,
        caller_id: &str,
    ) -> RegistryResult<ExecutionOutcome> {
        let mut params = Map::new();
        params.insert("query".to_owned(), Value::String(message.to_owned()));
        self.execute_capability(component_id, "consult", params, caller_id)
            .await
    }

    /// Fold a rating into the component's usage-weighted mean.
    ///
    /// Returns the updated counters.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotInitialized`] before the first discovery pass;
    /// [`RegistryError::ComponentNotFound`] for an unknown id;
    /// [`RegistryError::Validation`] on `rating` outside `[0, 5]`.
    pub fn submit_feedback(
        &self,
        component_id: &str,
        rating: f64,
        comment: Option<&str>,
        caller_id: &str,
    ) -> RegistryResult<ComponentStats> {
        let entry = self.lookup(component_id)?;
        if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
            return Err(RegistryError::Validation {
                field: "rating".to_owned(),
            });
        }

        let stats = entry.update_stats(|s| {
            s.apply_rating(rating);
            s.clone()
        });
        info!(
            component_id,
            caller_id,
            rating,
            comment = comment.unwrap_or(""),
            new_rating = stats.rating,
            "Feedback recorded"
        );
        Ok(stats)
    }
}

/// Generic fallback when there is neither a handler nor a bridgeable source.
fn echo(component_id: &str, capability: &str, params: &Map<String, Value>) -> Value {
    json!({
        "echo": true,
        "componentId": component_id,
        "capability": capability,
        "params": params,
        "message": "No handler is registered for this component; request echoed",
    })
}
