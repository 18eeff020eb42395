use pretty_assertions::assert_eq;
use timeline_core::CompletionCell;

#[test]
fn first_resolve_wins() {
    let mut cell = CompletionCell::new();
    assert!(!cell.is_resolved());
    assert!(cell.resolve("first"));
    assert!(cell.is_resolved());
    assert_eq!(cell.into_inner(), Some("first"));
}

#[test]
fn second_resolve_is_a_noop_not_an_error() {
    let mut cell = CompletionCell::new();
    assert!(cell.resolve(1));
    assert!(!cell.resolve(2));
    assert_eq!(cell.into_inner(), Some(1));
}

#[test]
fn unresolved_cell_yields_nothing() {
    let cell = CompletionCell::<u8>::new();
    assert_eq!(cell.into_inner(), None);
}
