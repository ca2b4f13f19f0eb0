mod common;
use common::*;
use page_select::*;

#[test]
fn respect_groups_keeps_ranges_and_singletons() {
    let doc = numbered_document(12);
    assert_eq!(
        select_ok("1-3,7,9-11", &doc, &respect_groups()),
        vec![vec![1, 2, 3], vec![7], vec![9, 10, 11]]
    );
}

#[test]
fn quoted_commas_stay_in_one_segment() {
    let doc = text_document(&["A, B", "A", "C", "nothing"]);
    assert_eq!(
        select_ok("contains:\"A, B\",contains:\"C\"", &doc, &respect_groups()),
        vec![vec![1], vec![3]]
    );
}

#[test]
fn evaluation_is_deterministic() {
    let doc = marked_document(
        40,
        &[("Chapter", &[1, 9, 17, 30]), ("Summary", &[5, 12, 20, 35])],
    );
    let options = SelectOptions {
        grouping: GroupingMode::RespectGroups,
        group_start: Some("contains:Chapter".into()),
        filter: Some("contains:Summary".into()),
        ..Default::default()
    };
    let expression = "contains:Chapter to contains:Summary, type:text & !contains:Chapter, last 3";
    let first = select_pages(expression, &doc, &options).unwrap();
    for _ in 0..5 {
        assert_eq!(select_pages(expression, &doc, &options).unwrap(), first);
    }
}

#[test]
fn not_over_and_over_or() {
    let doc = text_document(&["A", "B", "B C", "A C", "C", "A B C"]);
    // A | (B & !C)
    assert_eq!(
        select_ok(
            "contains:'A' | contains:'B' & !contains:'C'",
            &doc,
            &SelectOptions::default()
        ),
        vec![vec![1, 2, 4, 6]]
    );
}

#[test]
fn pattern_sections_pair_greedily() {
    let doc = marked_document(12, &[("Chapter", &[1, 5, 9]), ("Summary", &[4, 8, 12])]);
    assert_eq!(
        select_ok(
            "contains:'Chapter' to contains:'Summary'",
            &doc,
            &respect_groups()
        ),
        vec![
            vec![1, 2, 3, 4],
            vec![5, 6, 7, 8],
            vec![9, 10, 11, 12]
        ]
    );
}

#[test]
fn stepped_range() {
    let doc = numbered_document(20);
    assert_eq!(
        select_ok("5:20:3", &doc, &SelectOptions::default()),
        vec![vec![5, 8, 11, 14, 17, 20]]
    );
}

#[test]
fn first_n_checks_document_length() {
    assert_eq!(
        select_ok("first 3", &numbered_document(10), &SelectOptions::default()),
        vec![vec![1, 2, 3]]
    );
    let err = select_err("first 3", &numbered_document(2), &SelectOptions::default());
    assert_eq!(
        as_range_error(&err),
        &RangeError::CountOutOfBounds { count: 3, total: 2 }
    );
}

#[test]
fn start_without_later_end_is_dropped() {
    let doc = marked_document(10, &[("Chapter", &[2, 8]), ("Summary", &[5])]);
    let result = select_pages(
        "contains:'Chapter' to contains:'Summary'",
        &doc,
        &respect_groups(),
    )
    .unwrap();
    assert_eq!(result.page_groups(), vec![vec![2, 3, 4, 5]]);

    let doc = marked_document(10, &[("Chapter", &[6]), ("Summary", &[2])]);
    let result = select_pages(
        "contains:'Chapter' to contains:'Summary'",
        &doc,
        &respect_groups(),
    )
    .unwrap();
    assert!(result.is_empty());
}

#[test]
fn filter_by_group_index() {
    let doc = numbered_document(10);
    let options = SelectOptions {
        grouping: GroupingMode::RespectGroups,
        filter: Some("1,3".into()),
        ..Default::default()
    };
    assert_eq!(
        select_ok("1,3,5,7,9", &doc, &options),
        vec![vec![1], vec![5]]
    );
}

#[test]
fn boundary_split_with_start_only() {
    let doc = marked_document(10, &[("Chapter", &[1, 6])]);
    let options = SelectOptions {
        group_start: Some("contains:'Chapter'".into()),
        ..Default::default()
    };
    assert_eq!(
        select_ok("1-10", &doc, &options),
        vec![vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10]]
    );
}
