use dashtable::{PaginationState, paginate};

#[test]
fn test_twenty_five_rows_make_three_pages() {
    let rows: Vec<u32> = (1..=25).collect();
    let state = PaginationState::new(2, 10).unwrap();
    let page = paginate(&rows, &state);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.rows, &[21, 22, 23, 24, 25]);
    assert_eq!(page.showing(), Some((21, 25)));
    assert!(!page.clamped);
    assert!(!page.has_next());
    assert!(page.has_previous());
}

#[test]
fn test_page_never_exceeds_page_size() {
    let rows: Vec<u32> = (0..97).collect();
    for size in [1, 3, 10, 50, 200] {
        let pages = PaginationState::first(size).total_pages(rows.len());
        for index in 0..pages + 2 {
            let page = paginate(&rows, &PaginationState::new(index, size).unwrap());
            assert!(page.rows.len() <= size);
            assert!(page.state.page_index() < page.total_pages);
        }
    }
}

#[test]
fn test_empty_rows_have_one_page() {
    let rows: Vec<u32> = Vec::new();
    let page = paginate(&rows, &PaginationState::new(4, 10).unwrap());
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.state.page_index(), 0);
    assert!(page.rows.is_empty());
    assert_eq!(page.showing(), None);
}

#[test]
fn test_out_of_range_index_is_clamped() {
    let rows: Vec<u32> = (0..7).collect();
    let page = paginate(&rows, &PaginationState::new(2, 10).unwrap());
    assert!(page.clamped);
    assert_eq!(page.state.page_index(), 0);
    assert_eq!(page.rows.len(), 7);
}

#[test]
fn test_page_size_change_returns_to_first_page() {
    let state = PaginationState::new(3, 10).unwrap().with_page_size(25);
    assert_eq!(state.page_index(), 0);
    assert_eq!(state.page_size(), 25);
}

#[test]
fn test_zero_page_size_is_rejected() {
    assert!(PaginationState::new(0, 0).is_err());
}
