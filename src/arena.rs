//! The label arena: bulk allocator for one solve's labels.
//!
//! The re-architecture note in the design notes calls for arena allocation
//! with stable indices rather than a bumpalo-style arena of boxed values:
//! every label lives in one growable `Vec`, `previous` is an index into that
//! vector, and the whole vector is dropped in a single step between DSSR
//! iterations and between solves. There is no per-label deallocation.

use crate::activity::ChargeMode;
use crate::memory::GroupMemory;

/// Stable index of a label within its arena. Never reused across a
/// `reset()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(u32);

/// One DP state: cumulative utility, SOC, cost, visited set, and the
/// decisions that produced it. See the data model for field meaning.
#[derive(Debug, Clone)]
pub struct Label {
    pub act_id: usize,
    pub time: u32,
    pub start_time: u32,
    pub duration: u32,
    pub deviation_start: f64,
    pub deviation_dur: f64,
    pub soc_at_activity_start: f64,
    pub current_soc: f64,
    pub delta_soc: f64,
    pub charge_duration: u32,
    pub charge_mode: ChargeMode,
    pub charge_cost_at_activity_start: f64,
    pub current_charge_cost: f64,
    pub utility: f64,
    pub mem: GroupMemory,
    pub previous: Option<LabelId>,
}

/// Default resident-label cap per solve before the engine reports
/// `ResourceError::ArenaExhausted`. Generous enough for realistic activity
/// counts and horizons; a caller enumerating charge durations at full
/// per-interval granularity on a very large activity table may need to raise
/// it.
pub const DEFAULT_MAX_LABELS: usize = 2_000_000;

/// Owns every label produced during one DP solve.
pub struct LabelArena {
    labels: Vec<Label>,
    max_labels: usize,
}

impl LabelArena {
    pub fn new() -> Self {
        LabelArena::with_capacity_limit(DEFAULT_MAX_LABELS)
    }

    pub fn with_capacity_limit(max_labels: usize) -> Self {
        LabelArena { labels: Vec::new(), max_labels }
    }

    /// Allocates a new label, returning its stable id.
    pub fn alloc(&mut self, label: Label) -> Result<LabelId, crate::errors::ResourceError> {
        if self.labels.len() >= self.max_labels {
            return Err(crate::errors::ResourceError::ArenaExhausted(self.labels.len()));
        }
        let id = LabelId(self.labels.len() as u32);
        self.labels.push(label);
        Ok(id)
    }

    pub fn get(&self, id: LabelId) -> &Label {
        &self.labels[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Frees every label allocated so far in one step. Must be called
    /// between DSSR iterations and between solves.
    pub fn free_bucket(&mut self) {
        self.labels.clear();
    }
}

impl Default for LabelArena {
    fn default() -> Self {
        LabelArena::new()
    }
}
