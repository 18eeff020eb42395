use pretty_assertions::assert_eq;
use timeline_core::{
    update, Effect, FinishReason, HarvestOptions, HarvestState, Msg, Record,
};

type Node = u32;

fn options(target: usize) -> HarvestOptions {
    HarvestOptions {
        target_count: target,
        ..HarvestOptions::default()
    }
}

fn complete_record(handle: &str) -> Record {
    Record {
        author_handle: Some(handle.to_string()),
        author_image_url: Some(format!("https://pbs.example.net/{handle}.jpg")),
        ..Record::default()
    }
}

fn incomplete_record(handle: &str) -> Record {
    Record {
        author_handle: Some(handle.to_string()),
        ..Record::default()
    }
}

fn extract(
    state: HarvestState<Node>,
    node: Node,
    record: Record,
) -> HarvestState<Node> {
    let (state, effects) = update(state, Msg::RecordExtracted { node, record });
    assert!(effects.is_empty());
    state
}

#[test]
fn complete_records_are_appended_until_the_cap() {
    harvest_logging::initialize_for_tests();
    let mut state = HarvestState::<Node>::new(options(2));
    for node in 0..3 {
        state = extract(state, node, complete_record(&format!("user{node}")));
    }
    assert_eq!(state.view().collected, 2);
    assert!(state.at_capacity());
}

#[test]
fn incomplete_records_are_buffered_not_emitted() {
    let state = HarvestState::<Node>::new(options(10));
    let state = extract(state, 1, incomplete_record("late"));
    assert_eq!(state.view().collected, 0);
    assert_eq!(state.view().pending, 1);
}

#[test]
fn closing_a_batch_with_pending_records_schedules_one_recheck() {
    let state = HarvestState::<Node>::new(options(10));
    let state = extract(state, 1, incomplete_record("late"));
    let (state, effects) = update(state, Msg::BatchClosed);
    assert_eq!(
        effects,
        vec![Effect::ScheduleRecheck {
            batch: 0,
            delay_ms: 500
        }]
    );

    // A batch with nothing pending schedules nothing.
    let state = extract(state, 2, complete_record("done"));
    let (_, effects) = update(state, Msg::BatchClosed);
    assert!(effects.is_empty());
}

#[test]
fn no_recheck_is_scheduled_once_the_cap_is_reached() {
    let state = HarvestState::<Node>::new(options(1));
    let state = extract(state, 1, complete_record("first"));
    let state = extract(state, 2, incomplete_record("late"));
    let (_, effects) = update(state, Msg::BatchClosed);
    assert!(effects.is_empty());
}

#[test]
fn recheck_due_asks_for_the_avatar_of_every_pending_node_in_the_batch() {
    let state = HarvestState::<Node>::new(options(10));
    let state = extract(state, 1, incomplete_record("a"));
    let state = extract(state, 2, incomplete_record("b"));
    let (state, _) = update(state, Msg::BatchClosed);
    // Pending from a later batch is not part of this recheck.
    let state = extract(state, 3, incomplete_record("c"));

    let (_, effects) = update(state, Msg::RecheckDue { batch: 0 });
    assert_eq!(
        effects,
        vec![
            Effect::ResolveAvatar { node: 1 },
            Effect::ResolveAvatar { node: 2 },
        ]
    );
}

#[test]
fn backfilled_avatar_promotes_the_pending_record() {
    let state = HarvestState::<Node>::new(options(10));
    let state = extract(state, 1, incomplete_record("late"));
    let (state, _) = update(state, Msg::BatchClosed);
    assert_eq!(state.view().collected, 0);

    let (state, effects) = update(
        state,
        Msg::AvatarBackfilled {
            node: 1,
            avatar: Some("https://pbs.example.net/late.jpg".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().collected, 1);
    assert_eq!(state.view().pending, 0);

    let record = state.into_records().remove(0);
    assert_eq!(
        record.author_image_url.as_deref(),
        Some("https://pbs.example.net/late.jpg")
    );
    assert_eq!(record.author_handle.as_deref(), Some("late"));
}

#[test]
fn unresolved_avatar_drops_the_pending_record_for_good() {
    let state = HarvestState::<Node>::new(options(10));
    let state = extract(state, 1, incomplete_record("never"));
    let (state, _) = update(state, Msg::AvatarBackfilled { node: 1, avatar: None });
    assert_eq!(state.view().collected, 0);
    assert_eq!(state.view().pending, 0);

    // A stray second backfill for the same node is a no-op.
    let (state, effects) = update(
        state,
        Msg::AvatarBackfilled {
            node: 1,
            avatar: Some("https://pbs.example.net/never.jpg".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().collected, 0);
}

#[test]
fn backfill_over_the_cap_is_dropped() {
    let state = HarvestState::<Node>::new(options(1));
    let state = extract(state, 1, incomplete_record("late"));
    let state = extract(state, 2, complete_record("fast"));
    let (state, _) = update(
        state,
        Msg::AvatarBackfilled {
            node: 1,
            avatar: Some("https://pbs.example.net/late.jpg".to_string()),
        },
    );
    assert_eq!(state.view().collected, 1);
    assert_eq!(state.view().pending, 0);
}

#[test]
fn tick_below_target_advances_and_reschedules() {
    let state = HarvestState::<Node>::new(options(10));
    let (state, effects) = update(state, Msg::Tick);
    assert_eq!(
        effects,
        vec![Effect::Advance, Effect::ScheduleTick { delay_ms: 100 }]
    );
    assert_eq!(state.view().passes, 1);
}

#[test]
fn tick_at_target_finishes_exactly_once() {
    let state = HarvestState::<Node>::new(options(1));
    let state = extract(state, 1, complete_record("only"));

    let (state, effects) = update(state, Msg::Tick);
    assert_eq!(
        effects,
        vec![
            Effect::CancelSubscription,
            Effect::Complete {
                reason: FinishReason::TargetReached
            },
        ]
    );
    assert!(state.view().done);

    // Late timers fire harmlessly against the terminal state.
    let (state, effects) = update(state, Msg::Tick);
    assert!(effects.is_empty());
    assert_eq!(state.into_records().len(), 1);
}

#[test]
fn spending_the_pass_budget_finishes_with_a_partial_harvest() {
    let state = HarvestState::<Node>::new(HarvestOptions {
        target_count: 10,
        max_passes: Some(2),
        ..HarvestOptions::default()
    });
    let state = extract(state, 1, complete_record("only"));

    let (state, effects) = update(state, Msg::Tick);
    assert_eq!(effects.first(), Some(&Effect::Advance));
    let (state, effects) = update(state, Msg::Tick);
    assert_eq!(effects.first(), Some(&Effect::Advance));

    let (state, effects) = update(state, Msg::Tick);
    assert_eq!(
        effects,
        vec![
            Effect::CancelSubscription,
            Effect::Complete {
                reason: FinishReason::PassBudgetExhausted
            },
        ]
    );
    assert_eq!(state.into_records().len(), 1);
}
