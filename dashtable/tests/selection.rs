use dashtable::{RowId, SelectionFlags, SelectionState};

fn ids(raw: &[&str]) -> Vec<RowId> {
    raw.iter().map(|s| RowId::from(*s)).collect()
}

#[test]
fn test_toggle_twice_restores_selection() {
    let start: SelectionState = ids(&["a", "b"]).into_iter().collect();
    let id = RowId::from("c");
    assert_eq!(start.toggled(&id).toggled(&id), start);

    let id = RowId::from("a");
    assert_eq!(start.toggled(&id).toggled(&id), start);
}

#[test]
fn test_toggle_all_selects_window() {
    let window = ids(&["a", "b", "c"]);
    let state = SelectionState::default().with_all_toggled(&window);
    assert!(window.iter().all(|id| state.is_selected(id)));
    assert_eq!(state.len(), 3);
}

#[test]
fn test_toggle_all_deselects_exactly_the_window() {
    let window = ids(&["a", "b"]);
    let state: SelectionState = ids(&["a", "b", "x", "y"]).into_iter().collect();
    let expected: SelectionState = ids(&["x", "y"]).into_iter().collect();
    assert_eq!(state.with_all_toggled(&window), expected);
}

#[test]
fn test_partial_window_is_completed_not_cleared() {
    let window = ids(&["a", "b", "c"]);
    let state: SelectionState = ids(&["a"]).into_iter().collect();
    let next = state.with_all_toggled(&window);
    assert_eq!(next.len(), 3);
}

#[test]
fn test_flags() {
    let window = ids(&["a", "b"]);

    let none = SelectionFlags::compute(&SelectionState::default(), &window);
    assert!(!none.all_selected);
    assert!(!none.indeterminate);

    let some: SelectionState = ids(&["a", "z"]).into_iter().collect();
    let flags = SelectionFlags::compute(&some, &window);
    assert!(!flags.all_selected);
    assert!(flags.indeterminate);
    assert_eq!(flags.selected_in_window, 1);

    let all: SelectionState = ids(&["a", "b"]).into_iter().collect();
    let flags = SelectionFlags::compute(&all, &window);
    assert!(flags.all_selected);
    assert!(!flags.indeterminate);
}

#[test]
fn test_empty_window_is_never_all_selected() {
    let state: SelectionState = ids(&["a"]).into_iter().collect();
    let flags = SelectionFlags::compute(&state, &[]);
    assert!(!flags.all_selected);
    assert!(!flags.indeterminate);
}
