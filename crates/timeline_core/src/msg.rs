use crate::{BatchId, Record};

/// One stimulus against the harvest state.
///
/// Every external event source (initial scan, mutation notifications,
/// deferred rechecks, the pacing timer) is funneled through one of these,
/// so each transition is atomic over the shared state.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg<N> {
    /// The extractor produced a record for a not-yet-seen item node.
    RecordExtracted { node: N, record: Record },
    /// A harvest batch (initial scan or one mutation delivery) finished.
    BatchClosed,
    /// The deferred recheck looked up the author image for a pending node.
    /// `None` means the image still has not resolved; the pair is dropped.
    AvatarBackfilled { node: N, avatar: Option<String> },
    /// A batch recheck timer fired; the driver resolves avatars for
    /// `pending_nodes(batch)` and feeds back `AvatarBackfilled`.
    RecheckDue { batch: BatchId },
    /// Drive-loop progress check.
    Tick,
}
