//! Normalized per-workflow status.
//!
//! Each workflow kind resolves its phases through a [`PhaseStrategy`] looked up in a
//! [`StatusRegistry`]; unknown kinds use the strategy registered under [`WILDCARD_KIND`].

mod next_command;
mod strategy;

pub use next_command::{next_command, NextCommandRow, ANY_PHASE, NEXT_COMMANDS};
pub use strategy::{
    Completion, GenericPhaseStrategy, OrderedPhaseStrategy, PhaseResolution, PhaseState,
    PhaseStrategy, INITIALIZING, NOT_STARTED,
};

use crate::descriptor::WorkflowStateDescriptor;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub const WILDCARD_KIND: &str = "*";

/// Uniform status view of one workflow instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedStatus {
    pub workflow_kind: String,
    pub state_file: String,
    pub current_phase: String,
    pub completion: Completion,
    pub phase_detail: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_next_command: Option<String>,
    pub strategy: &'static str,
}

/// `workflow_kind -> strategy` with a wildcard default.
#[derive(Clone)]
pub struct StatusRegistry {
    strategies: HashMap<String, Arc<dyn PhaseStrategy>>,
}

impl StatusRegistry {
    /// Registry with only the generic fallback.
    pub fn empty() -> Self {
        let mut strategies: HashMap<String, Arc<dyn PhaseStrategy>> = HashMap::new();
        strategies.insert(WILDCARD_KIND.to_string(), Arc::new(GenericPhaseStrategy));
        Self { strategies }
    }

    /// Registry with the built-in workflow kinds.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(
            "docs",
            OrderedPhaseStrategy::new(
                &["survey", "interview", "synthesis", "drafting", "review"],
                &["documents_total", "documents_complete"],
            ),
        );
        registry.register(
            "audit",
            OrderedPhaseStrategy::new(
                &[
                    "reconnaissance",
                    "analysis",
                    "findings",
                    "verification",
                    "report",
                ],
                &["subsystems_total", "subsystems_complete", "findings_total"],
            ),
        );
        registry.register(
            "verify",
            OrderedPhaseStrategy::new(
                &["planning", "harness", "properties", "execution", "triage"],
                &["properties_total", "properties_passing"],
            ),
        );
        registry
    }

    pub fn register(&mut self, kind: &str, strategy: impl PhaseStrategy + 'static) {
        self.strategies
            .insert(kind.to_string(), Arc::new(strategy));
    }

    pub fn strategy_for(&self, kind: &str) -> &dyn PhaseStrategy {
        self.strategies
            .get(kind)
            .or_else(|| self.strategies.get(WILDCARD_KIND))
            .map(Arc::as_ref)
            .unwrap_or(&GenericPhaseStrategy)
    }

    pub fn normalize(&self, descriptor: &WorkflowStateDescriptor) -> NormalizedStatus {
        let strategy = self.strategy_for(&descriptor.workflow_kind);
        let resolution = strategy.resolve(&descriptor.raw_fields);

        let current_state = resolution
            .phases
            .iter()
            .find(|(name, _)| *name == resolution.current_phase)
            .map(|(_, state)| *state);
        let lookup = next_command::lookup_completion(resolution.completion, current_state);
        let recommended_next_command = next_command(
            &descriptor.workflow_kind,
            &resolution.current_phase,
            lookup,
        )
        .map(str::to_string);

        NormalizedStatus {
            workflow_kind: descriptor.workflow_kind.clone(),
            state_file: descriptor.relative_path.clone(),
            current_phase: resolution.current_phase,
            completion: resolution.completion,
            phase_detail: resolution.detail,
            last_updated: descriptor.last_updated,
            recommended_next_command,
            strategy: strategy.label(),
        }
    }

    /// One status per descriptor, in descriptor order.
    pub fn aggregate(&self, descriptors: &[WorkflowStateDescriptor]) -> Vec<NormalizedStatus> {
        descriptors.iter().map(|d| self.normalize(d)).collect()
    }
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
