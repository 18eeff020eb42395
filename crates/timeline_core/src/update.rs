use crate::{Effect, FinishReason, HarvestState, Msg, Phase};

/// Pure update function: applies a message to state and returns any effects.
///
/// Execution is single-threaded and each transition runs to completion, so
/// the cap check always reflects every promotion applied so far.
pub fn update<N: Clone + PartialEq>(
    mut state: HarvestState<N>,
    msg: Msg<N>,
) -> (HarvestState<N>, Vec<Effect<N>>) {
    let effects = match msg {
        Msg::RecordExtracted { node, record } => {
            if record.is_complete() {
                if !state.at_capacity() {
                    state.push_record(record);
                }
            } else {
                // All other fields are final; only the image may arrive late.
                state.push_pending(node, record);
            }
            Vec::new()
        }
        Msg::BatchClosed => {
            let batch = state.current_batch();
            let effects = if state.batch_has_pending(batch) && !state.at_capacity() {
                vec![Effect::ScheduleRecheck {
                    batch,
                    delay_ms: state.options().recheck_delay_ms,
                }]
            } else {
                Vec::new()
            };
            state.open_next_batch();
            effects
        }
        Msg::RecheckDue { batch } => state
            .pending_nodes(batch)
            .into_iter()
            .map(|node| Effect::ResolveAvatar { node })
            .collect(),
        Msg::AvatarBackfilled { node, avatar } => {
            if let Some(mut pending) = state.take_pending(&node) {
                match avatar {
                    Some(url) if !state.at_capacity() => {
                        pending.record.author_image_url = Some(url);
                        state.push_record(pending.record);
                    }
                    // Unresolved or over the cap: dropped, never retried,
                    // never emitted incomplete.
                    _ => {}
                }
            }
            Vec::new()
        }
        Msg::Tick => match state.phase() {
            Phase::Done => Vec::new(),
            Phase::Advancing => {
                if state.at_capacity() {
                    state.finish();
                    vec![
                        Effect::CancelSubscription,
                        Effect::Complete {
                            reason: FinishReason::TargetReached,
                        },
                    ]
                } else if state.pass_budget_spent() {
                    state.finish();
                    vec![
                        Effect::CancelSubscription,
                        Effect::Complete {
                            reason: FinishReason::PassBudgetExhausted,
                        },
                    ]
                } else {
                    state.count_pass();
                    vec![
                        Effect::Advance,
                        Effect::ScheduleTick {
                            delay_ms: state.options().tick_delay_ms,
                        },
                    ]
                }
            }
        },
    };

    (state, effects)
}
