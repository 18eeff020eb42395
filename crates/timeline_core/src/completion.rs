/// Single-assignment completion cell.
///
/// The compound event sources (tick timer, mutation callback, deferred
/// recheck) could each observe the finished state; the cell guarantees the
/// final result settles exactly once. A second resolve is a no-op.
#[derive(Debug, Default)]
pub struct CompletionCell<T> {
    slot: Option<T>,
}

impl<T> CompletionCell<T> {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Store the value if the cell is still empty. Returns whether the
    /// value was stored; a losing second resolve discards its value.
    pub fn resolve(&mut self, value: T) -> bool {
        if self.slot.is_some() {
            return false;
        }
        self.slot = Some(value);
        true
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.is_some()
    }

    pub fn into_inner(self) -> Option<T> {
        self.slot
    }
}
