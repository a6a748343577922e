use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const NOT_STARTED: &str = "not started";
pub const INITIALIZING: &str = "initializing";

/// Status of a single phase as written by a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    NotStarted,
    InProgress,
    Complete,
}

impl PhaseState {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "in_progress" | "inprogress" | "active" | "running" | "started" => {
                PhaseState::InProgress
            }
            "complete" | "completed" | "done" | "finished" => PhaseState::Complete,
            _ => PhaseState::NotStarted,
        }
    }

    /// Accepts both `{"status": "..."}` and a bare status string.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::parse(s)),
            Value::Object(obj) => obj
                .get("status")
                .and_then(Value::as_str)
                .map(Self::parse),
            _ => None,
        }
    }
}

/// Overall completion of a workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    NotStarted,
    InProgress,
    Complete,
}

impl Completion {
    pub fn as_str(self) -> &'static str {
        match self {
            Completion::NotStarted => "not_started",
            Completion::InProgress => "in_progress",
            Completion::Complete => "complete",
        }
    }
}

/// Outcome of resolving a descriptor's phases.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseResolution {
    pub current_phase: String,
    pub completion: Completion,
    pub phases: Vec<(String, PhaseState)>,
    pub detail: BTreeMap<String, Value>,
}

impl PhaseResolution {
    /// Apply the resolution rule to phases listed in declaration order.
    ///
    /// First in-progress phase wins, else the last complete one, else "not started".
    pub fn from_ordered(phases: Vec<(String, PhaseState)>) -> Self {
        let current_phase = phases
            .iter()
            .find(|(_, state)| *state == PhaseState::InProgress)
            .or_else(|| {
                phases
                    .iter()
                    .rev()
                    .find(|(_, state)| *state == PhaseState::Complete)
            })
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| NOT_STARTED.to_string());

        let complete = phases
            .iter()
            .filter(|(_, state)| *state == PhaseState::Complete)
            .count();
        let completion = if !phases.is_empty() && complete == phases.len() {
            Completion::Complete
        } else if phases
            .iter()
            .any(|(_, state)| *state != PhaseState::NotStarted)
        {
            Completion::InProgress
        } else {
            Completion::NotStarted
        };

        let mut detail = BTreeMap::new();
        detail.insert("phases_total".to_string(), Value::from(phases.len()));
        detail.insert("phases_complete".to_string(), Value::from(complete));

        Self {
            current_phase,
            completion,
            phases,
            detail,
        }
    }
}

/// Resolves the current phase for one family of workflow kinds.
pub trait PhaseStrategy: Send + Sync {
    /// Short label reported alongside the status (`registered` / `generic`).
    fn label(&self) -> &'static str;

    fn resolve(&self, fields: &Map<String, Value>) -> PhaseResolution;
}

/// Closed, ordered phase list plus the numeric progress fields worth surfacing.
pub struct OrderedPhaseStrategy {
    phases: Vec<String>,
    detail_fields: Vec<String>,
}

impl OrderedPhaseStrategy {
    pub fn new(phases: &[&str], detail_fields: &[&str]) -> Self {
        Self {
            phases: phases.iter().map(|p| p.to_string()).collect(),
            detail_fields: detail_fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn phases(&self) -> &[String] {
        &self.phases
    }
}

impl PhaseStrategy for OrderedPhaseStrategy {
    fn label(&self) -> &'static str {
        "registered"
    }

    fn resolve(&self, fields: &Map<String, Value>) -> PhaseResolution {
        let declared = fields.get("phases").and_then(Value::as_object);
        let phases = self
            .phases
            .iter()
            .map(|name| {
                let state = declared
                    .and_then(|map| map.get(name))
                    .and_then(PhaseState::from_value)
                    .unwrap_or(PhaseState::NotStarted);
                (name.clone(), state)
            })
            .collect();

        let mut resolution = PhaseResolution::from_ordered(phases);
        for field in &self.detail_fields {
            if let Some(value) = lookup_progress_field(fields, field) {
                resolution.detail.insert(field.clone(), value);
            }
        }
        resolution
    }
}

/// Progress counters may sit at the top level or under `progress`.
fn lookup_progress_field(fields: &Map<String, Value>, name: &str) -> Option<Value> {
    fields
        .get(name)
        .or_else(|| {
            fields
                .get("progress")
                .and_then(Value::as_object)
                .and_then(|p| p.get(name))
        })
        .filter(|v| v.is_number())
        .cloned()
}

/// Fallback for workflow kinds nobody registered.
///
/// Phase fields are discovered by shape: entries of a `phases` map, top-level `<phase>_status`
/// (or `<phase>Status`) strings, and top-level objects carrying a `status` string.
pub struct GenericPhaseStrategy;

impl GenericPhaseStrategy {
    fn collect_phases(fields: &Map<String, Value>) -> Vec<(String, PhaseState)> {
        let mut phases: Vec<(String, PhaseState)> = Vec::new();
        let mut push = |name: String, state: PhaseState| {
            if !name.is_empty() && !phases.iter().any(|(existing, _)| *existing == name) {
                phases.push((name, state));
            }
        };

        for (key, value) in fields {
            if key == "phases" {
                if let Some(map) = value.as_object() {
                    for (name, phase) in map {
                        if let Some(state) = PhaseState::from_value(phase) {
                            push(name.clone(), state);
                        }
                    }
                }
                continue;
            }
            if let Some(name) = status_suffix_phase(key) {
                if let Some(raw) = value.as_str() {
                    push(name, PhaseState::parse(raw));
                }
                continue;
            }
            if let Some(state) = value
                .as_object()
                .and_then(|obj| obj.get("status"))
                .and_then(Value::as_str)
                .map(PhaseState::parse)
            {
                push(key.clone(), state);
            }
        }
        phases
    }
}

impl PhaseStrategy for GenericPhaseStrategy {
    fn label(&self) -> &'static str {
        "generic"
    }

    fn resolve(&self, fields: &Map<String, Value>) -> PhaseResolution {
        let phases = Self::collect_phases(fields);
        if phases.is_empty() {
            let mut resolution = PhaseResolution::from_ordered(Vec::new());
            resolution.current_phase = INITIALIZING.to_string();
            return resolution;
        }
        PhaseResolution::from_ordered(phases)
    }
}

/// `interview_status` / `interviewStatus` -> `interview`. A bare `status` names no phase.
fn status_suffix_phase(key: &str) -> Option<String> {
    let lower = key.to_ascii_lowercase();
    if !lower.ends_with("status") || lower == "status" {
        return None;
    }
    let stem = &key[..key.len() - "status".len()];
    let stem = stem.trim_end_matches(['_', '-', '.']);
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
