use std::time::Duration;

use chrono::Utc;
use futures_util::StreamExt;
use harvest_logging::{harvest_debug, harvest_info, harvest_warn};
use tokio::time::{self, Instant};
use tokio_util::time::DelayQueue;

use timeline_core::{
    update, BatchId, CompletionCell, Effect, FinishReason, HarvestOptions, HarvestState, Msg,
    Record,
};
use timeline_engine::{csv_filename, extract, resolve_avatar, to_csv, ItemSource, OutputSink};

use crate::host::HostEnvironment;

/// Final result of one collection run. Produced exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestOutcome {
    /// The final record sequence, in harvest order, capped at the target.
    pub records: Vec<Record>,
    /// The delimited-text serialization of `records`.
    pub csv: String,
    pub reason: FinishReason,
}

/// Run one collection against `source` and `host` until the target count
/// is reached (or the optional pass budget runs out), then persist the CSV
/// through `sink` and resolve the outcome.
///
/// Everything runs on the calling task: the pacing timer, the mutation
/// subscription and the deferred rechecks are multiplexed cooperatively,
/// and each state transition runs to completion before the next.
pub async fn run_harvest<S, H>(
    source: &S,
    host: &mut H,
    sink: &dyn OutputSink,
    options: HarvestOptions,
) -> HarvestOutcome
where
    S: ItemSource,
    H: HostEnvironment<Node = S::Node>,
{
    let mut driver = Driver {
        source,
        host,
        state: HarvestState::new(options),
        recheck_requests: Vec::new(),
        next_tick: None,
        subscription_open: false,
        completion: CompletionCell::new(),
    };

    // One-time full-document scan, before observing mutations.
    driver.harvest(source.items_in_document());
    harvest_info!(
        "Initial scan: {} collected, {} pending (target {})",
        driver.state.view().collected,
        driver.state.view().pending,
        driver.state.view().target
    );

    let mut rx = driver.host.subscribe();
    driver.subscription_open = true;

    let mut rechecks: DelayQueue<BatchId> = DelayQueue::new();
    for (batch, delay) in driver.recheck_requests.drain(..) {
        rechecks.insert(batch, delay);
    }

    // The first progress check runs immediately after the initial scan.
    let mut tick = Box::pin(time::sleep(Duration::ZERO));

    loop {
        let subscription_open = driver.subscription_open;
        tokio::select! {
            _ = &mut tick => {
                driver.dispatch(Msg::Tick);
            }
            added = rx.recv(), if subscription_open => {
                match added {
                    Some(roots) => driver.harvest_added(&roots),
                    // Channel closed by the host; keep pacing regardless.
                    None => driver.subscription_open = false,
                }
            }
            Some(expired) = rechecks.next() => {
                driver.dispatch(Msg::RecheckDue { batch: expired.into_inner() });
            }
        }

        for (batch, delay) in driver.recheck_requests.drain(..) {
            rechecks.insert(batch, delay);
        }
        if let Some(delay) = driver.next_tick.take() {
            tick.as_mut().reset(Instant::now() + delay);
        }
        if driver.completion.is_resolved() {
            break;
        }
    }

    let reason = driver
        .completion
        .into_inner()
        .expect("drive loop exits only after completion");
    let records = driver.state.into_records();
    let csv = to_csv(&records);
    harvest_info!("Harvest done ({reason:?}): {} records", records.len());

    let filename = csv_filename(Utc::now());
    if let Err(err) = sink.save(&filename, &csv) {
        harvest_warn!("Failed to persist {}: {}", filename, err);
    }

    HarvestOutcome {
        records,
        csv,
        reason,
    }
}

struct Driver<'a, S: ItemSource, H: HostEnvironment<Node = S::Node>> {
    source: &'a S,
    host: &'a mut H,
    state: HarvestState<S::Node>,
    /// Recheck timers requested by effects, armed by the run loop.
    recheck_requests: Vec<(BatchId, Duration)>,
    next_tick: Option<Duration>,
    subscription_open: bool,
    completion: CompletionCell<FinishReason>,
}

impl<S, H> Driver<'_, S, H>
where
    S: ItemSource,
    H: HostEnvironment<Node = S::Node>,
{
    /// Harvest one batch of item nodes: cap check before every extraction,
    /// partially processed batches are fine.
    fn harvest(&mut self, items: Vec<S::Node>) {
        for node in items {
            if self.state.at_capacity() {
                break;
            }
            if let Some(record) = extract(self.source, &node) {
                self.dispatch(Msg::RecordExtracted { node, record });
            }
        }
        self.dispatch(Msg::BatchClosed);
    }

    /// Harvest the items below a batch of newly added roots.
    fn harvest_added(&mut self, roots: &[S::Node]) {
        let items: Vec<S::Node> = roots
            .iter()
            .flat_map(|root| self.source.items_under(root))
            .collect();
        harvest_debug!("{} added roots, {} items", roots.len(), items.len());
        self.harvest(items);
    }

    fn dispatch(&mut self, msg: Msg<S::Node>) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.perform(effect);
        }
    }

    fn perform(&mut self, effect: Effect<S::Node>) {
        match effect {
            Effect::Advance => {
                harvest_debug!("Advance (pass {})", self.state.view().passes);
                self.host.advance();
            }
            Effect::ScheduleTick { delay_ms } => {
                self.next_tick = Some(Duration::from_millis(delay_ms));
            }
            Effect::ScheduleRecheck { batch, delay_ms } => {
                self.recheck_requests
                    .push((batch, Duration::from_millis(delay_ms)));
            }
            Effect::ResolveAvatar { node } => {
                // Avatar step only; the rest of the record is already final.
                let avatar = resolve_avatar(self.source, &node);
                self.dispatch(Msg::AvatarBackfilled { node, avatar });
            }
            Effect::CancelSubscription => {
                self.host.unsubscribe();
                self.subscription_open = false;
            }
            Effect::Complete { reason } => {
                self.completion.resolve(reason);
            }
        }
    }
}
