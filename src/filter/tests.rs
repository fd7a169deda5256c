use super::TagIndex;
use crate::record::ImageRecord;

fn records() -> Vec<ImageRecord> {
    vec![
        ImageRecord::new("/d/a.png", vec!["cat".into(), "dog".into()]),
        ImageRecord::new("/d/b.png", vec![]),
        ImageRecord::new("/d/c.png", vec!["Dog".into(), "cat".into(), "cat".into()]),
    ]
}

#[test]
fn rebuild_counts_occurrences_and_sorts_vocabulary() {
    let mut index = TagIndex::new();
    index.rebuild(&records());
    assert_eq!(index.vocabulary(), ["Dog", "cat", "dog"]);
    assert_eq!(index.count("cat"), 3);
    assert_eq!(index.count("dog"), 1);
    assert_eq!(index.count("missing"), 0);
    assert_eq!(index.label("cat"), "cat (3)");
}

#[test]
fn rebuild_drops_active_filters() {
    let mut index = TagIndex::new();
    index.rebuild(&records());
    index.toggle("cat");
    index.rebuild(&records());
    assert!(!index.has_active());
}

#[test]
fn toggle_flips_flag() {
    let mut index = TagIndex::new();
    assert!(index.toggle("cat"));
    assert!(index.is_active("cat"));
    assert!(!index.toggle("cat"));
    assert!(!index.is_active("cat"));
    assert!(index.toggle("cat"));
}

#[test]
fn clear_keeps_counts() {
    let mut index = TagIndex::new();
    index.rebuild(&records());
    index.toggle("dog");
    index.clear();
    assert!(index.active_tags().is_empty());
    assert_eq!(index.count("dog"), 1);
}

#[test]
fn active_tags_follow_vocabulary_order() {
    let mut index = TagIndex::new();
    index.rebuild(&records());
    index.toggle("dog");
    index.toggle("Dog");
    index.toggle("gone");
    assert_eq!(index.active_tags(), ["Dog", "dog", "gone"]);
}

#[test]
fn search_is_case_insensitive() {
    let mut index = TagIndex::new();
    index.rebuild(&records());
    assert_eq!(index.search("DO"), ["Dog", "dog"]);
    assert_eq!(index.search("  ").len(), 3);
}

#[test]
fn partition_without_filters_is_single_group() {
    let mut index = TagIndex::new();
    let recs = records();
    index.rebuild(&recs);
    let partition = index.partition(&recs);
    assert!(!partition.filtered);
    assert_eq!(partition.with, [0, 1, 2]);
    assert!(partition.without.is_empty());
}

#[test]
fn partition_with_filters_splits_matching_first() {
    let mut index = TagIndex::new();
    let recs = records();
    index.rebuild(&recs);
    index.toggle("dog");
    index.toggle("Dog");
    let partition = index.partition(&recs);
    assert!(partition.filtered);
    assert_eq!(partition.with, [0, 2]);
    assert_eq!(partition.without, [1]);
}

#[test]
fn filter_on_vanished_tag_matches_nothing() {
    let mut index = TagIndex::new();
    let recs = records();
    index.rebuild(&recs);
    index.toggle("gone");
    let partition = index.partition(&recs);
    assert!(partition.filtered);
    assert!(partition.with.is_empty());
    assert_eq!(partition.without, [0, 1, 2]);
}
