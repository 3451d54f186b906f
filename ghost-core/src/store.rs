//! # Session State Container
//!
//! Explicit store for everything the front-end renders. State changes go
//! through named transition functions only, so each mutation is a
//! traceable operation rather than ambient side effects scattered across
//! handlers. A generation counter lets a newer analysis supersede an
//! in-flight one: stale completions are discarded, never published.

use crate::logbuf::LogBuffer;
use crate::metrics::{GasBreakdown, MemoryHeap};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Lifecycle of the signed intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntentState {
    Idle,
    Signing,
    Monitoring,
    Executed,
}

impl fmt::Display for IntentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntentState::Idle => "Idle",
            IntentState::Signing => "Signing",
            IntentState::Monitoring => "Monitoring",
            IntentState::Executed => "Executed",
        };
        f.write_str(name)
    }
}

/// One row of the three-way cost comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: String,
    pub status_text: String,
    /// `None` for the savings row, which has no gas figure of its own.
    pub gas_used: Option<u64>,
    /// Signed decimal string: costs are negative, savings positive.
    pub outcome: String,
}

/// Result record of one audit or pre-flight analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub source_id: String,
    pub rows: [ComparisonRow; 3],
}

/// Everything a completed analysis publishes in one shot.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub breakdown: GasBreakdown,
    pub memory: MemoryHeap,
    pub multiplier: f64,
}

/// Immutable view for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub result: Option<AnalysisResult>,
    pub breakdown: Option<GasBreakdown>,
    pub memory: Option<MemoryHeap>,
    pub multiplier: Option<f64>,
    pub intent: IntentState,
    pub busy: bool,
    pub logs: Vec<String>,
}

impl DashboardSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Default)]
struct AnalysisState {
    result: Option<AnalysisResult>,
    breakdown: Option<GasBreakdown>,
    memory: Option<MemoryHeap>,
    multiplier: Option<f64>,
}

#[derive(Debug)]
pub struct DashboardStore {
    logs: Arc<LogBuffer>,
    analysis: Mutex<AnalysisState>,
    intent: Mutex<IntentState>,
    generation: AtomicU64,
    busy: AtomicBool,
}

impl DashboardStore {
    pub fn new() -> Self {
        let logs = Arc::new(LogBuffer::new());
        logs.push("[READY] Awaiting transaction hash for deep-state audit...");
        Self {
            logs,
            analysis: Mutex::new(AnalysisState::default()),
            intent: Mutex::new(IntentState::Idle),
            generation: AtomicU64::new(0),
            busy: AtomicBool::new(false),
        }
    }

    /// Shared handle to the trace stream.
    pub fn logs(&self) -> Arc<LogBuffer> {
        self.logs.clone()
    }

    /// Start a new analysis action, superseding any in-flight one.
    /// Returns the generation token the action must present to publish.
    pub fn begin_analysis(&self) -> u64 {
        // serialized with publish/finish so a stale completion can never
        // interleave with a newer begin
        let _analysis = self.analysis.lock().unwrap();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.busy.store(true, Ordering::SeqCst);
        generation
    }

    /// Publish a completed analysis. Returns `false` (and changes
    /// nothing) when a newer action has superseded `generation`.
    pub fn publish_analysis(&self, generation: u64, outcome: AnalysisOutcome) -> bool {
        let mut analysis = self.analysis.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        analysis.result = Some(outcome.result);
        analysis.breakdown = Some(outcome.breakdown);
        analysis.memory = Some(outcome.memory);
        analysis.multiplier = Some(outcome.multiplier);
        self.busy.store(false, Ordering::SeqCst);
        true
    }

    /// Close out a failed analysis without publishing. The busy flag is
    /// only cleared when `generation` is still the current action.
    pub fn finish_analysis(&self, generation: u64) {
        let _analysis = self.analysis.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) == generation {
            self.busy.store(false, Ordering::SeqCst);
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn intent_state(&self) -> IntentState {
        *self.intent.lock().unwrap()
    }

    /// Compare-and-set transition; returns whether it applied.
    pub fn transition_intent(&self, from: IntentState, to: IntentState) -> bool {
        let mut state = self.intent.lock().unwrap();
        if *state == from {
            *state = to;
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let analysis = self.analysis.lock().unwrap();
        DashboardSnapshot {
            result: analysis.result.clone(),
            breakdown: analysis.breakdown,
            memory: analysis.memory,
            multiplier: analysis.multiplier,
            intent: self.intent_state(),
            busy: self.is_busy(),
            logs: self.logs.snapshot(),
        }
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}
