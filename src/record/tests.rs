use hashbrown::HashSet;
use std::path::Path;

use super::{ImageRecord, Position};

fn record(tags: &[&str]) -> ImageRecord {
    ImageRecord::new("/data/a.png", tags.iter().map(|t| t.to_string()).collect())
}

fn chosen(tags: &[&str]) -> HashSet<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

#[test]
fn sidecar_path_shares_base_name() {
    let rec = record(&[]);
    assert_eq!(rec.tags_path(), Path::new("/data/a.txt"));
    assert_eq!(rec.file_name(), "a.png");
    assert!(!rec.is_dirty());
}

#[test]
fn add_tag_trims_and_appends() {
    let mut rec = record(&["cat"]);
    assert!(rec.add_tag("  dog "));
    assert_eq!(rec.tags(), ["cat", "dog"]);
    assert!(rec.is_dirty());
}

#[test]
fn add_tag_ignores_blank_and_existing() {
    let mut rec = record(&["cat"]);
    assert!(!rec.add_tag("   "));
    assert!(!rec.add_tag("cat"));
    assert!(!rec.is_dirty());
    // exact, case-sensitive comparison
    assert!(rec.add_tag("Cat"));
}

#[test]
fn add_then_remove_restores_tags_but_stays_dirty() {
    let mut rec = record(&["cat", "dog"]);
    assert!(rec.add_tag("bird"));
    assert!(rec.remove_tag("bird"));
    assert_eq!(rec.tags(), ["cat", "dog"]);
    assert!(rec.is_dirty());
}

#[test]
fn remove_tag_drops_first_occurrence_only() {
    let mut rec = record(&["cat", "dog", "cat"]);
    assert!(rec.remove_tag("cat"));
    assert_eq!(rec.tags(), ["dog", "cat"]);
    assert!(!record(&["dog"]).remove_tag("cat"));
}

#[test]
fn dedupe_keeps_first_occurrence_order() {
    let mut rec = record(&["b", "a", "b", "c", "a"]);
    assert!(rec.dedupe());
    assert_eq!(rec.tags(), ["b", "a", "c"]);
}

#[test]
fn dedupe_marks_dirty_without_duplicates() {
    let mut rec = record(&["a", "b"]);
    assert!(!rec.dedupe());
    assert_eq!(rec.tags(), ["a", "b"]);
    assert!(rec.is_dirty());
}

#[test]
fn reposition_moves_chosen_to_beginning() {
    let mut rec = record(&["a", "x", "b", "y"]);
    assert!(rec.reposition(&chosen(&["y", "x"]), Position::Beginning));
    assert_eq!(rec.tags(), ["x", "y", "a", "b"]);
}

#[test]
fn reposition_moves_chosen_to_ending() {
    let mut rec = record(&["x", "a", "y", "b"]);
    assert!(rec.reposition(&chosen(&["x", "y"]), Position::Ending));
    assert_eq!(rec.tags(), ["a", "b", "x", "y"]);
}

#[test]
fn reposition_both_ways_keeps_membership() {
    let mut rec = record(&["a", "x", "b", "y", "c"]);
    let set = chosen(&["x", "c"]);
    rec.reposition(&set, Position::Beginning);
    rec.reposition(&set, Position::Ending);

    let mut after: Vec<_> = rec.tags().to_vec();
    after.sort();
    assert_eq!(after, ["a", "b", "c", "x", "y"]);
    assert_eq!(rec.tags(), ["a", "b", "y", "x", "c"]);
}

#[test]
fn reposition_without_chosen_tags_is_noop() {
    let mut rec = record(&["a", "b"]);
    assert!(!rec.reposition(&chosen(&["z"]), Position::Beginning));
    assert!(!rec.is_dirty());
}

#[test]
fn remove_tags_drops_every_match() {
    let mut rec = record(&["cat", "dog", "cat", "bird"]);
    assert!(rec.remove_tags(&["cat".into(), "bird".into()]));
    assert_eq!(rec.tags(), ["dog"]);
    assert!(rec.is_dirty());
}

#[test]
fn remove_tags_without_match_leaves_record_clean() {
    let mut rec = record(&["dog"]);
    assert!(!rec.remove_tags(&["cat".into()]));
    assert!(!rec.is_dirty());
}

#[test]
fn replace_does_not_duplicate_existing_target() {
    let mut rec = record(&["cat", "dog", "feline"]);
    assert!(rec.replace_tags(&[("cat".into(), "feline".into())]));
    assert_eq!(rec.tags(), ["dog", "feline"]);
    assert!(rec.is_dirty());
}

#[test]
fn replace_appends_new_tag_at_end() {
    let mut rec = record(&["cat", "dog"]);
    assert!(rec.replace_tags(&[("cat".into(), "feline".into())]));
    assert_eq!(rec.tags(), ["dog", "feline"]);
}

#[test]
fn replace_skips_absent_tags() {
    let mut rec = record(&["dog"]);
    assert!(!rec.replace_tags(&[("cat".into(), "feline".into())]));
    assert_eq!(rec.tags(), ["dog"]);
    assert!(!rec.is_dirty());
}
