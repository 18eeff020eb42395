/// Progress snapshot of one collection run, for logging and UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HarvestView {
    /// Records in the output collection.
    pub collected: usize,
    /// Records awaiting their deferred completion recheck.
    pub pending: usize,
    /// Target count for this run.
    pub target: usize,
    /// Drive-loop passes performed so far.
    pub passes: u64,
    pub done: bool,
}
