//! End-to-end tests driving a mapper chain the way the code generator does:
//! push a nested mapper when entering an inlined body, replay line visits,
//! pop on exit, finish into the aggregate mapping table.

use line_map::{CallSiteMarker, FileMapping, RangeMapping, Smap, SourceInfo};
use line_mapper::{MapperError, SourceMapper};
use pretty_assertions::assert_eq;

fn file(name: &str, path: &str, ranges: &[RangeMapping]) -> FileMapping {
    let mut fm = FileMapping::new(name, path);
    for r in ranges {
        fm.add_range_mapping(*r);
    }
    fm
}

/// A callee whose emitted lines 1..=5 came from Callee.kt lines 10..=14.
fn callee_smap() -> Smap {
    Smap::new(vec![file(
        "Callee.kt",
        "pkg/Callee.kt",
        &[RangeMapping::new(10, 1, 5)],
    )])
    .unwrap()
}

fn root_mapper() -> SourceMapper {
    SourceMapper::new(SourceInfo::new("Top.kt", "top/Top.kt", 20))
}

#[test]
fn identity_mapper_passes_lines_through() {
    let mut mapper = SourceMapper::Identical;
    assert_eq!(mapper.visit_line_number(7), 7);
    assert_eq!(mapper.visit_line_number(-1), -1);
}

#[test]
fn root_mapper_never_remaps_its_own_lines() {
    let mut mapper = root_mapper();
    assert_eq!(mapper.visit_line_number(3), 3);
    assert_eq!(mapper.visit_line_number(-1), -1);
}

#[test]
fn nested_visit_translates_then_allocates_in_parent() {
    let mut mapper = root_mapper();
    mapper.push_nested(&callee_smap(), false).unwrap();

    // Destination line 3 of the callee is source line 12 of Callee.kt; the
    // root allocates the first synthetic line above its own 20.
    assert_eq!(mapper.visit_line_number(3), 21);

    mapper.pop_nested();
    let smap = mapper.finish().unwrap();
    let callee = &smap.file_mappings()[1];
    assert_eq!(callee.name, "Callee.kt");
    assert_eq!(callee.line_mappings(), &[RangeMapping::new(12, 21, 1)]);
}

#[test]
fn repeated_visits_to_one_line_reuse_the_allocation() {
    let mut mapper = root_mapper();
    mapper.push_nested(&callee_smap(), false).unwrap();

    assert_eq!(mapper.visit_line_number(3), 21);
    assert_eq!(mapper.visit_line_number(3), 21);

    mapper.pop_nested();
    let smap = mapper.finish().unwrap();
    // Without the memo the second visit would have opened a second range.
    assert_eq!(smap.file_mappings()[1].line_mappings().len(), 1);
}

#[test]
fn sequential_visits_fold_through_the_chain() {
    let mut mapper = root_mapper();
    mapper.push_nested(&callee_smap(), false).unwrap();

    let emitted: Vec<i32> = (1..=5).map(|line| mapper.visit_line_number(line)).collect();
    assert_eq!(emitted, vec![21, 22, 23, 24, 25]);

    mapper.pop_nested();
    let smap = mapper.finish().unwrap();
    assert_eq!(
        smap.file_mappings()[1].line_mappings(),
        &[RangeMapping::new(10, 21, 5)]
    );
}

#[test]
fn revisits_resolve_to_the_original_allocations() {
    let mut mapper = root_mapper();
    mapper.push_nested(&callee_smap(), false).unwrap();
    let first: Vec<i32> = (1..=5).map(|line| mapper.visit_line_number(line)).collect();
    assert_eq!(first, vec![21, 22, 23, 24, 25]);

    let again: Vec<i32> = [5, 4, 1].iter().map(|&line| mapper.visit_line_number(line)).collect();
    assert_eq!(again, vec![25, 24, 21]);
}

#[test]
fn inline_lambda_body_lines_pass_through_unchanged() {
    // The lambda body occupies lines 5..=7 of the file being compiled; a
    // second file's ranges were inlined into the lambda.
    let lambda_smap = Smap::new(vec![
        file("Top.kt", "top/Top.kt", &[RangeMapping::new(5, 5, 3)]),
        file("Bar.kt", "bar/Bar.kt", &[RangeMapping::new(100, 30, 2)]),
    ])
    .unwrap();

    let mut mapper = root_mapper();
    mapper.push_nested(&lambda_smap, true).unwrap();

    // Inside the lambda's own first range: untouched.
    assert_eq!(mapper.visit_line_number(6), 6);
    // Inside any other range: delegated and allocated normally.
    assert_eq!(mapper.visit_line_number(30), 21);

    mapper.pop_nested();
    let smap = mapper.finish().unwrap();
    let bar = &smap.file_mappings()[1];
    assert_eq!(bar.name, "Bar.kt");
    assert_eq!(bar.line_mappings(), &[RangeMapping::new(100, 21, 1)]);
}

#[test]
fn two_level_nesting_forwards_to_the_root_allocator() {
    let mut mapper = root_mapper();
    mapper.push_nested(&callee_smap(), false).unwrap();

    // A lambda inlined inside the callee's body: its own range covers the
    // callee's emitted lines, the extra range belongs to a third file.
    let lambda_smap = Smap::new(vec![
        file("Callee.kt", "pkg/Callee.kt", &[RangeMapping::new(1, 1, 5)]),
        file("Deep.kt", "pkg/Deep.kt", &[RangeMapping::new(7, 6, 1)]),
    ])
    .unwrap();
    mapper.push_nested(&lambda_smap, false).unwrap();

    // Line 6 translates to Deep.kt:7 and is allocated by the root.
    assert_eq!(mapper.visit_line_number(6), 21);
    // Line 2 translates to Callee.kt:2 through the inner mapping's first
    // range, then is forwarded through the outer nested mapper untouched.
    assert_eq!(mapper.visit_line_number(2), 22);

    mapper.pop_nested();
    mapper.pop_nested();
    let smap = mapper.finish().unwrap();
    let names: Vec<&str> = smap.file_mappings().iter().map(|fm| fm.name.as_str()).collect();
    assert_eq!(names, vec!["Top.kt", "Deep.kt", "Callee.kt"]);
}

#[test]
fn call_site_marker_tags_ranges_and_breaks_folding() {
    let mut mapper = root_mapper();
    mapper.set_call_site_marker(Some(CallSiteMarker::new(17)));
    mapper.push_nested(&callee_smap(), false).unwrap();
    mapper.visit_line_number(1);
    mapper.visit_line_number(2);

    // A new call site starts a fresh range even though line 3 would fold.
    mapper.set_call_site_marker(Some(CallSiteMarker::new(18)));
    mapper.visit_line_number(3);

    mapper.pop_nested();
    let smap = mapper.finish().unwrap();
    let ranges = smap.file_mappings()[1].line_mappings();
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0].call_site, Some(CallSiteMarker::new(17)));
    assert_eq!(ranges[0].range, 2);
    assert_eq!(ranges[1].call_site, Some(CallSiteMarker::new(18)));
}

#[test]
fn from_smap_replays_non_default_mappings_verbatim() {
    let input = Smap::new(vec![
        file("Foo.kt", "foo/Foo.kt", &[RangeMapping::new(1, 1, 10)]),
        file(
            "Bar.kt",
            "bar/Bar.kt",
            &[RangeMapping::new(5, 11, 3), RangeMapping::new(100, 14, 1)],
        ),
    ])
    .unwrap();

    let mapper = SourceMapper::from_smap(&input);
    let output = mapper.finish().unwrap();

    assert_eq!(output.file_mappings().len(), 2);
    assert_eq!(output.file_mappings()[0].line_mappings(), &[RangeMapping::new(1, 1, 10)]);
    assert_eq!(
        output.file_mappings()[1].line_mappings(),
        input.file_mappings()[1].line_mappings()
    );
}

#[test]
fn from_smap_allocates_above_existing_destinations() {
    let input = Smap::new(vec![
        file("Foo.kt", "foo/Foo.kt", &[RangeMapping::new(1, 1, 10)]),
        file("Bar.kt", "bar/Bar.kt", &[RangeMapping::new(5, 11, 3)]),
    ])
    .unwrap();

    let mut mapper = SourceMapper::from_smap(&input);
    // Highest existing destination is 13; the next allocation must clear it.
    assert_eq!(mapper.visit_line_for_source(7, "Baz.kt", "baz/Baz.kt"), 14);
}

#[test]
fn finish_with_active_nested_mapper_is_rejected() {
    let mut mapper = root_mapper();
    mapper.push_nested(&callee_smap(), false).unwrap();
    assert_eq!(mapper.finish().unwrap_err(), MapperError::UnfinishedChain);
}

#[test]
#[should_panic(expected = "no nested mapper")]
fn pop_without_push_panics() {
    let mut mapper = root_mapper();
    mapper.pop_nested();
}

#[test]
#[should_panic(expected = "no mapping range covers destination line")]
fn visit_outside_callee_ranges_panics() {
    let mut mapper = root_mapper();
    mapper.push_nested(&callee_smap(), false).unwrap();
    mapper.visit_line_number(99);
}
