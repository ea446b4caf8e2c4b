use std::sync::{Arc, Mutex};

use dashtable::{
    ActionError, BulkAction, ColumnDescriptor, ConfigError, FilterValue, FilteringState,
    LoadError, PaginationState, RowId, RowIdResolver, SelectionScope, SelectionState,
    SelectionWindow, SortDirection, SortingState, StateError, TableAction, TableCallbacks,
    TableConfig, TableEngine, TableError, TableStatus,
};
use serde_json::{Value, json};

type Log<S> = Arc<Mutex<Vec<Arc<S>>>>;

fn recorder<S: Send + Sync + 'static>() -> (Log<S>, impl Fn(Arc<S>) + Send + Sync + 'static) {
    let log: Log<S> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    (log, move |state| sink.lock().unwrap().push(state))
}

fn columns() -> Vec<ColumnDescriptor<Value>> {
    vec![
        ColumnDescriptor::new("name").sortable().filterable(),
        ColumnDescriptor::new("group").filterable(),
        ColumnDescriptor::new("status"),
    ]
}

/// Rows 1..=n; rows 1..=7 are in group "a", the rest in group "b".
fn rows(n: i64) -> Vec<Value> {
    (1..=n)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("user-{:02}", i),
                "group": if i <= 7 { "a" } else { "b" },
                "status": if i % 2 == 0 { "archived" } else { "active" },
            })
        })
        .collect()
}

fn engine(config: TableConfig, callbacks: TableCallbacks, n: i64) -> TableEngine<Value> {
    TableEngine::builder(config)
        .columns(columns())
        .row_id(RowIdResolver::key("id"))
        .callbacks(callbacks)
        .rows(rows(n))
        .build()
        .unwrap()
}

fn ids(rows: &[&Value]) -> Vec<i64> {
    rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

#[test]
fn test_filter_clamps_page_and_notifies() {
    let (pages, on_page) = recorder::<PaginationState>();
    let (filters, on_filter) = recorder::<FilteringState>();
    let callbacks = TableCallbacks::new()
        .on_pagination_change(on_page)
        .on_filtering_change(on_filter);
    let mut engine = engine(TableConfig::new(SelectionScope::Persistent), callbacks, 25);

    assert_eq!(engine.view().total_pages, 3);
    engine.set_page_index(2).unwrap();
    assert_eq!(engine.view().rows.len(), 5);

    engine
        .set_column_filter("group", Some(FilterValue::text("a")))
        .unwrap();

    let view = engine.view();
    assert_eq!(view.filtered_rows, 7);
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.pagination.page_index(), 0);
    assert_eq!(view.rows.len(), 7);

    let pages = pages.lock().unwrap();
    let indices: Vec<usize> = pages.iter().map(|p| p.page_index()).collect();
    assert_eq!(indices, vec![2, 0]);
    assert!(Arc::ptr_eq(pages.last().unwrap(), &engine.pagination()));
    assert_eq!(filters.lock().unwrap().len(), 1);
}

#[test]
fn test_page_index_past_end_is_clamped_immediately() {
    let mut engine = engine(TableConfig::new(SelectionScope::Persistent), TableCallbacks::new(), 25);
    engine.set_page_index(9).unwrap();
    assert_eq!(engine.pagination().page_index(), 2);
}

#[test]
fn test_toggle_sort_cycle() {
    let (sorts, on_sort) = recorder::<SortingState>();
    let mut engine = engine(
        TableConfig::new(SelectionScope::Persistent),
        TableCallbacks::new().on_sorting_change(on_sort),
        5,
    );

    let state = engine.toggle_sort("name").unwrap();
    assert_eq!(state.direction_of("name"), Some(SortDirection::Asc));
    assert_eq!(ids(&engine.view().rows), vec![1, 2, 3, 4, 5]);

    let state = engine.toggle_sort("name").unwrap();
    assert_eq!(state.direction_of("name"), Some(SortDirection::Desc));
    assert_eq!(ids(&engine.view().rows), vec![5, 4, 3, 2, 1]);

    let state = engine.toggle_sort("name").unwrap();
    assert!(state.is_empty());
    assert_eq!(ids(&engine.view().rows), vec![1, 2, 3, 4, 5]);

    let sorts = sorts.lock().unwrap();
    assert_eq!(sorts.len(), 3);
    assert!(Arc::ptr_eq(sorts.last().unwrap(), &engine.sorting()));
}

#[test]
fn test_sort_validation() {
    let mut engine = engine(TableConfig::new(SelectionScope::Persistent), TableCallbacks::new(), 3);
    assert_eq!(
        engine.toggle_sort("group"),
        Err(TableError::State(StateError::NotSortable {
            column: "group".into()
        }))
    );
    assert_eq!(
        engine.toggle_sort("missing"),
        Err(TableError::State(StateError::unknown_column("missing")))
    );
    assert!(engine.sorting().is_empty());
}

#[test]
fn test_filter_validation() {
    let mut engine = engine(TableConfig::new(SelectionScope::Persistent), TableCallbacks::new(), 3);
    let err = engine
        .set_column_filter("status", Some(FilterValue::text("active")))
        .unwrap_err();
    assert_eq!(
        err,
        TableError::State(StateError::NotFilterable {
            column: "status".into()
        })
    );
}

#[test]
fn test_unchanged_snapshot_does_not_notify() {
    let (sorts, on_sort) = recorder::<SortingState>();
    let mut engine = engine(
        TableConfig::new(SelectionScope::Persistent),
        TableCallbacks::new().on_sorting_change(on_sort),
        3,
    );
    engine.toggle_sort("name").unwrap();
    let before = engine.sorting();
    engine.set_sorting((*before).clone()).unwrap();

    assert_eq!(sorts.lock().unwrap().len(), 1);
    assert!(Arc::ptr_eq(&before, &engine.sorting()));
}

#[test]
fn test_persistent_selection_survives_filtering() {
    let (selections, on_select) = recorder::<SelectionState>();
    let mut engine = engine(
        TableConfig::new(SelectionScope::Persistent),
        TableCallbacks::new().on_selection_change(on_select),
        3,
    );
    for id in 1..=3i64 {
        engine.toggle_row(&RowId::from(id));
    }
    assert!(engine.view().is_all_selected());

    engine
        .set_column_filter("name", Some(FilterValue::one_of(["user-01", "user-02"])))
        .unwrap();

    let view = engine.view();
    assert_eq!(ids(&view.rows), vec![1, 2]);
    assert_eq!(view.selection.len(), 3);
    assert!(view.is_all_selected());
    assert!(!view.is_indeterminate());
    assert_eq!(view.flags.selected_in_window, 2);
    assert_eq!(selections.lock().unwrap().len(), 3);
}

#[test]
fn test_page_scoped_selection_clears_on_page_change() {
    let (selections, on_select) = recorder::<SelectionState>();
    let mut engine = engine(
        TableConfig::new(SelectionScope::PageScoped),
        TableCallbacks::new().on_selection_change(on_select),
        25,
    );
    engine.toggle_row(&RowId::from(1i64));
    assert_eq!(engine.selection().len(), 1);

    engine.next_page().unwrap();
    assert!(engine.selection().is_empty());

    let selections = selections.lock().unwrap();
    assert_eq!(selections.len(), 2);
    assert!(selections[1].is_empty());
}

#[test]
fn test_page_scoped_selection_kept_when_page_unchanged() {
    let mut engine = engine(TableConfig::new(SelectionScope::PageScoped), TableCallbacks::new(), 5);
    engine.toggle_row(&RowId::from(1i64));
    // Every row stays on the only page, in the same order.
    engine.set_global_filter("user").unwrap();
    assert_eq!(engine.selection().len(), 1);
}

#[test]
fn test_page_scoped_selection_kept_when_rows_reorder() {
    let (selections, on_select) = recorder::<SelectionState>();
    let mut engine = engine(
        TableConfig::new(SelectionScope::PageScoped),
        TableCallbacks::new().on_selection_change(on_select),
        3,
    );
    engine.toggle_row(&RowId::from(1i64));
    engine.set_sorting(SortingState::desc("name")).unwrap();

    assert_eq!(ids(&engine.view().rows), vec![3, 2, 1]);
    assert!(engine.is_selected(&RowId::from(1i64)));
    assert_eq!(selections.lock().unwrap().len(), 1);
}

#[test]
fn test_next_page_at_max_index_stays_on_last_page() {
    let mut engine = engine(TableConfig::new(SelectionScope::Persistent), TableCallbacks::new(), 25);
    engine.set_pagination(PaginationState::new(usize::MAX, 10).unwrap()).unwrap();
    engine.next_page().unwrap();
    assert_eq!(engine.pagination().page_index(), 2);
}

#[test]
fn test_toggle_all_over_current_page() {
    let mut engine = engine(TableConfig::new(SelectionScope::Persistent), TableCallbacks::new(), 25);
    engine.toggle_row(&RowId::from(25i64));

    assert!(engine.toggle_all().is_empty());
    assert_eq!(engine.selection().len(), 11);
    assert!(engine.view().is_all_selected());

    engine.toggle_all();
    let selection = engine.selection();
    assert_eq!(selection.len(), 1);
    assert!(selection.is_selected(&RowId::from(25i64)));
}

#[test]
fn test_toggle_all_over_filtered_rows() {
    let config = TableConfig::new(SelectionScope::Persistent)
        .with_selection_window(SelectionWindow::FilteredRows);
    let mut engine = engine(config, TableCallbacks::new(), 25);
    engine
        .set_column_filter("group", Some(FilterValue::text("b")))
        .unwrap();

    engine.toggle_all();
    assert_eq!(engine.selection().len(), 18);
    assert!(engine.view().is_all_selected());
}

#[test]
fn test_unresolvable_row_ids_are_skipped() {
    let mut engine = TableEngine::builder(TableConfig::new(SelectionScope::Persistent))
        .columns(columns())
        .row_id(RowIdResolver::key("id"))
        .rows(vec![
            json!({"id": "a", "name": "x"}),
            json!({"name": "no id"}),
            json!({"id": "c", "name": "z"}),
        ])
        .build()
        .unwrap();

    let skipped = engine.toggle_all();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].row_index, Some(1));
    assert_eq!(engine.selection().len(), 2);

    let view = engine.view();
    assert_eq!(view.skipped.len(), 1);
    assert_eq!(view.row_ids[1], None);
    assert!(view.is_all_selected());
    let orphan = engine.rows()[1].clone();
    let err = engine.toggle_row_for(&orphan).unwrap_err();
    assert_eq!(err.row_index, None);
    assert!(!err.to_string().contains("row 0"));
}

#[test]
fn test_status_transitions() {
    let mut engine = TableEngine::<Value>::builder(TableConfig::new(SelectionScope::Persistent))
        .columns(columns())
        .row_id(RowIdResolver::key("id"))
        .build()
        .unwrap();
    assert_eq!(engine.status(), TableStatus::Idle);

    engine.set_load_state(true, None);
    assert_eq!(engine.status(), TableStatus::Loading);

    engine.set_rows(rows(3));
    assert_eq!(engine.status(), TableStatus::Loading);

    engine.set_load_state(false, None);
    assert_eq!(engine.status(), TableStatus::Ready);

    let err = LoadError::new("upstream timed out");
    engine.set_load_state(true, Some(err.clone()));
    assert_eq!(engine.status(), TableStatus::Error(err));
    assert_eq!(
        engine.view().status.as_error().map(|e| e.message.as_str()),
        Some("upstream timed out")
    );
}

#[test]
fn test_rows_replacement_clamps_page() {
    let mut engine = engine(TableConfig::new(SelectionScope::Persistent), TableCallbacks::new(), 25);
    engine.set_page_index(2).unwrap();
    engine.set_rows(rows(4));
    assert_eq!(engine.pagination().page_index(), 0);
}

#[test]
fn test_page_size_change() {
    let mut engine = engine(TableConfig::new(SelectionScope::Persistent), TableCallbacks::new(), 25);
    engine.set_page_index(1).unwrap();
    engine.set_page_size(5).unwrap();
    assert_eq!(engine.pagination().page_index(), 0);
    assert_eq!(engine.view().total_pages, 5);
    assert!(matches!(
        engine.set_page_size(0),
        Err(TableError::State(StateError::InvalidPageSize { size: 0 }))
    ));
}

#[test]
fn test_duplicate_columns_fail_to_build() {
    let err = TableEngine::<Value>::builder(TableConfig::new(SelectionScope::Persistent))
        .columns(vec![ColumnDescriptor::new("name"), ColumnDescriptor::new("name")])
        .row_id(RowIdResolver::key("id"))
        .build()
        .unwrap_err();
    assert_eq!(err, TableError::Config(ConfigError::duplicate_column("name")));
}

#[test]
fn test_missing_row_id_resolver_fails_to_build() {
    let err = TableEngine::<Value>::builder(TableConfig::new(SelectionScope::Persistent))
        .columns(columns())
        .build()
        .unwrap_err();
    assert_eq!(err, TableError::Config(ConfigError::MissingRowIdResolver));
}

#[test]
fn test_row_actions() {
    let archived: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&archived);
    let engine = TableEngine::builder(TableConfig::new(SelectionScope::Persistent))
        .columns(columns())
        .row_id(RowIdResolver::key("id"))
        .row_actions(vec![
            TableAction::new("archive", "Archive", move |row: &Value| {
                sink.lock().unwrap().push(row["name"].as_str().unwrap().to_string());
            })
            .enabled_when(|row: &Value| row["status"] == "active"),
        ])
        .rows(rows(3))
        .build()
        .unwrap();

    let listed = engine.row_actions(&engine.rows()[1]);
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].1);

    engine.run_row_action("archive", &RowId::from(1i64)).unwrap();
    assert_eq!(*archived.lock().unwrap(), vec!["user-01".to_string()]);

    assert_eq!(
        engine.run_row_action("archive", &RowId::from(2i64)),
        Err(ActionError::ActionDisabled {
            id: "archive".into()
        })
    );
    assert_eq!(
        engine.run_row_action("delete", &RowId::from(1i64)),
        Err(ActionError::UnknownAction { id: "delete".into() })
    );
    assert_eq!(
        engine.run_row_action("archive", &RowId::from(99i64)),
        Err(ActionError::UnknownRow { row_id: "99".into() })
    );
}

#[test]
fn test_bulk_actions_use_selection() {
    let counts: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&counts);
    let mut engine = TableEngine::builder(TableConfig::new(SelectionScope::Persistent))
        .columns(columns())
        .row_id(RowIdResolver::key("id"))
        .bulk_actions(vec![BulkAction::new(
            "export",
            "Export",
            move |rows: &[&Value]| sink.lock().unwrap().push(rows.len()),
        )])
        .rows(rows(5))
        .build()
        .unwrap();

    assert!(!engine.bulk_actions()[0].1);
    assert!(engine.run_bulk_action("export").is_err());

    engine.toggle_row(&RowId::from(2i64));
    engine.toggle_row(&RowId::from(4i64));
    assert!(engine.bulk_actions()[0].1);
    engine.run_bulk_action("export").unwrap();

    assert_eq!(*counts.lock().unwrap(), vec![2]);
    assert_eq!(ids(&engine.selected_rows()), vec![2, 4]);
}
