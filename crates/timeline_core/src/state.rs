use crate::view_model::HarvestView;
use crate::Record;

/// Identifier of one harvest batch; each batch gets at most one deferred
/// completion recheck.
pub type BatchId = u64;

/// Drive-loop phase. `Done` is terminal and never re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Advancing,
    Done,
}

/// Configuration for one collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOptions {
    /// Stop once this many records have been collected.
    pub target_count: usize,
    /// Delay between an advance and the next progress check.
    pub tick_delay_ms: u64,
    /// Delay before the single completion recheck of a batch.
    pub recheck_delay_ms: u64,
    /// Optional bound on drive-loop passes. `None` preserves the unbounded
    /// behavior: the loop advances forever if the source stops yielding.
    pub max_passes: Option<u64>,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            target_count: 100,
            tick_delay_ms: 100,
            recheck_delay_ms: 500,
            max_passes: None,
        }
    }
}

/// A record held back because its author image has not resolved yet.
///
/// The pair is retried exactly once, when its batch's recheck fires; it is
/// then either promoted into the output or dropped for good.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRecord<N> {
    pub node: N,
    pub batch: BatchId,
    pub record: Record,
}

/// Process-wide state for the duration of one collection run.
///
/// The record vector is append-only and capped at the target count; the
/// pass counter and batch counter are monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestState<N> {
    options: HarvestOptions,
    records: Vec<Record>,
    pending: Vec<PendingRecord<N>>,
    current_batch: BatchId,
    passes: u64,
    phase: Phase,
}

impl<N> Default for HarvestState<N> {
    fn default() -> Self {
        Self::new(HarvestOptions::default())
    }
}

impl<N> HarvestState<N> {
    pub fn new(options: HarvestOptions) -> Self {
        Self {
            options,
            records: Vec::new(),
            pending: Vec::new(),
            current_batch: 0,
            passes: 0,
            phase: Phase::Advancing,
        }
    }

    /// True once the output collection has reached the target count.
    /// Checked before every extraction, not just at batch boundaries.
    pub fn at_capacity(&self) -> bool {
        self.records.len() >= self.options.target_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn options(&self) -> &HarvestOptions {
        &self.options
    }

    /// Progress snapshot for logging and UIs.
    pub fn view(&self) -> HarvestView {
        HarvestView {
            collected: self.records.len(),
            pending: self.pending.len(),
            target: self.options.target_count,
            passes: self.passes,
            done: self.phase == Phase::Done,
        }
    }

    /// Consume the state and hand out the final record sequence.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub(crate) fn push_record(&mut self, record: Record) {
        self.records.push(record);
    }

    pub(crate) fn push_pending(&mut self, node: N, record: Record) {
        self.pending.push(PendingRecord {
            node,
            batch: self.current_batch,
            record,
        });
    }

    pub(crate) fn current_batch(&self) -> BatchId {
        self.current_batch
    }

    pub(crate) fn batch_has_pending(&self, batch: BatchId) -> bool {
        self.pending.iter().any(|p| p.batch == batch)
    }

    pub(crate) fn open_next_batch(&mut self) {
        self.current_batch += 1;
    }

    pub(crate) fn count_pass(&mut self) -> u64 {
        self.passes += 1;
        self.passes
    }

    pub(crate) fn pass_budget_spent(&self) -> bool {
        match self.options.max_passes {
            Some(max) => self.passes >= max,
            None => false,
        }
    }

    pub(crate) fn finish(&mut self) {
        self.records.truncate(self.options.target_count);
        self.phase = Phase::Done;
    }
}

impl<N: PartialEq> HarvestState<N> {
    /// Nodes of `batch` still awaiting their author image, in arrival order.
    pub fn pending_nodes(&self, batch: BatchId) -> Vec<N>
    where
        N: Clone,
    {
        self.pending
            .iter()
            .filter(|p| p.batch == batch)
            .map(|p| p.node.clone())
            .collect()
    }

    pub(crate) fn take_pending(&mut self, node: &N) -> Option<PendingRecord<N>> {
        let index = self.pending.iter().position(|p| &p.node == node)?;
        Some(self.pending.remove(index))
    }
}
