use crate::BatchId;

/// Why the run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The output collection reached the target count.
    TargetReached,
    /// The optional pass budget ran out before the target was reached.
    PassBudgetExhausted,
}

/// Side effect requested by a state transition, executed by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<N> {
    /// Issue one advance action (scroll by one viewport) against the host.
    Advance,
    /// Re-enter the progress check after the pacing delay.
    ScheduleTick { delay_ms: u64 },
    /// Arm the single deferred completion recheck for `batch`.
    ScheduleRecheck { batch: BatchId, delay_ms: u64 },
    /// Look up the author image for a pending node (avatar step only,
    /// never the full extractor) and report back via `Msg::AvatarBackfilled`.
    ResolveAvatar { node: N },
    /// Cancel the mutation subscription. Emitted exactly once.
    CancelSubscription,
    /// The run is over; the final records are in the state.
    Complete { reason: FinishReason },
}
