//! Whole-document rechecks driven in bounded chunks, interleaved with edits.

mod common;

use common::*;
use core_highlight::HighlightEvent;
use core_text::Document;
use pretty_assertions::assert_eq;

fn full_recheck(doc: &Document) -> Vec<std::ops::Range<usize>> {
    let (mut fresh, _log) = engine_with(english(), manual_options());
    fresh.slot_rehighlight(doc);
    spans(&fresh)
}

#[test]
fn steps_advance_by_word_budget() {
    let doc = Document::from_str("t", "aa bb cc dd ee");
    let (mut engine, log) = engine_with(english(), manual_options());
    engine.schedule_rehighlight();
    assert!(!engine.rehighlight_step(&doc, 2));
    assert_eq!(spans(&engine), vec![0..2, 3..5]);
    assert!(!engine.rehighlight_step(&doc, 2));
    assert!(engine.rehighlight_step(&doc, 2));
    assert!(!engine.rehighlight_pending());
    assert_eq!(drain(&log).len(), 5);
    // nothing scheduled: a step is a no-op
    assert!(engine.rehighlight_step(&doc, 2));
}

#[test]
fn edit_before_the_cursor_shifts_it() {
    let mut doc = Document::from_str("t", "aa bb cc dd ee");
    let (mut engine, _log) = engine_with(english(), manual_options());
    engine.schedule_rehighlight();
    engine.rehighlight_step(&doc, 2);

    let d = doc.insert(0, "x");
    engine.contents_change(&doc, d.position, d.added, d.removed);
    while !engine.rehighlight_step(&doc, 2) {}
    assert_eq!(spans(&engine), full_recheck(&doc));
    assert_eq!(spans(&engine), vec![0..3, 4..6, 7..9, 10..12, 13..15]);
}

#[test]
fn edit_across_the_cursor_is_covered_once() {
    let mut doc = Document::from_str("t", "aa bb cc dd ee");
    let (mut engine, log) = engine_with(english(), manual_options());
    engine.schedule_rehighlight();
    engine.rehighlight_step(&doc, 2);
    drain(&log);

    let d = doc.remove(4..7);
    assert_eq!(doc.text(), "aa bc dd ee");
    engine.contents_change(&doc, d.position, d.added, d.removed);
    assert_eq!(
        drain(&log),
        vec![
            HighlightEvent::Unhighlight(3..4),
            HighlightEvent::Highlight(3..5)
        ]
    );
    while !engine.rehighlight_step(&doc, 1) {}
    assert_eq!(spans(&engine), full_recheck(&doc));
    assert_eq!(
        drain(&log),
        vec![HighlightEvent::Highlight(6..8), HighlightEvent::Highlight(9..11)]
    );
}

#[test]
fn rescheduling_restarts_without_duplicate_markup() {
    let doc = Document::from_str("t", "aa bb cc dd ee");
    let (mut engine, log) = engine_with(english(), manual_options());
    engine.schedule_rehighlight();
    engine.rehighlight_step(&doc, 3);
    engine.schedule_rehighlight();
    while !engine.rehighlight_step(&doc, 3) {}
    let highlights = drain(&log)
        .into_iter()
        .filter(|e| matches!(e, HighlightEvent::Highlight(_)))
        .count();
    assert_eq!(highlights, 5);
}

#[test]
fn deactivation_cancels_pending_work() {
    let doc = Document::from_str("t", "aa bb cc dd ee");
    let (mut engine, _log) = engine_with(english(), manual_options());
    engine.schedule_rehighlight();
    engine.rehighlight_step(&doc, 1);
    engine.set_active(&doc, false);
    assert!(!engine.rehighlight_pending());
    assert!(engine.misspelled_ranges().is_empty());
}
