//! Automatic mode: the error-density policy switching checking on and off.

mod common;

use common::*;
use core_highlight::{ActiveReason, HighlightEvent};
use core_text::Document;
use pretty_assertions::assert_eq;

const NOISY: &str = "the cat sat on the mat qq ww ee rr tt";

#[test]
fn too_many_errors_disable_checking() {
    let doc = Document::from_str("t", NOISY);
    let (mut engine, log) = engine_with(english(), automatic_options());
    engine.slot_rehighlight(&doc);

    assert!(!engine.active());
    assert!(engine.misspelled_ranges().is_empty());
    let events = drain(&log);
    let highlights = events
        .iter()
        .filter(|e| matches!(e, HighlightEvent::Highlight(_)))
        .count();
    let unhighlights = events
        .iter()
        .filter(|e| matches!(e, HighlightEvent::Unhighlight(_)))
        .count();
    assert_eq!((highlights, unhighlights), (5, 5));
    assert_eq!(
        events.last(),
        Some(&HighlightEvent::ActiveChanged {
            active: false,
            reason: ActiveReason::TooManyErrors,
            description: "Too many misspelled words. As-you-type spell checking disabled."
                .to_string(),
        })
    );
}

#[test]
fn low_error_density_keeps_checking_and_resets_counters() {
    let doc = Document::from_str("t", "the cat sat on the mat the cat sat qq");
    let (mut engine, _log) = engine_with(english(), automatic_options());
    engine.slot_rehighlight(&doc);
    assert!(engine.active());
    assert_eq!(engine.misspelled_ranges().len(), 1);
    let state = engine.state();
    assert_eq!((state.checked_word_count, state.error_count), (0, 0));
}

#[test]
fn small_samples_are_never_judged() {
    let doc = Document::from_str("t", "qq ww ee");
    let (mut engine, _log) = engine_with(english(), automatic_options());
    engine.slot_rehighlight(&doc);
    assert!(engine.active());
    assert_eq!(engine.misspelled_ranges().len(), 3);
    assert_eq!(engine.state().error_count, 3);
}

#[test]
fn typed_errors_trip_the_policy() {
    let mut doc = Document::from_str("t", "the cat sat on");
    let (mut engine, log) = engine_with(english(), automatic_options());
    engine.slot_rehighlight(&doc);
    assert!(engine.active());

    let d = doc.insert(14, " qq ww ee rr tt zz");
    engine.contents_change(&doc, d.position, d.added, d.removed);
    assert!(!engine.active());
    assert!(engine.misspelled_ranges().is_empty());
    assert!(
        drain(&log).contains(&HighlightEvent::active_changed(false, ActiveReason::TooManyErrors))
    );

    // inactive: further edits check nothing
    let d = doc.insert(0, "xx ");
    engine.contents_change(&doc, d.position, d.added, d.removed);
    assert!(drain(&log).is_empty());
}

#[test]
fn set_active_is_ignored_in_automatic_mode() {
    let doc = Document::from_str("t", NOISY);
    let (mut engine, log) = engine_with(english(), automatic_options());
    engine.slot_rehighlight(&doc);
    drain(&log);

    assert!(!engine.set_active(&doc, true));
    assert!(!engine.active());
    assert!(drain(&log).is_empty());
}

#[test]
fn switching_to_automatic_evaluates_immediately() {
    let doc = Document::from_str("t", NOISY);
    let (mut engine, log) = engine_with(english(), manual_options());
    engine.slot_rehighlight(&doc);
    assert!(engine.active());
    drain(&log);

    engine.set_automatic(&doc, true);
    assert!(engine.automatic());
    assert!(!engine.active());
    assert!(engine.misspelled_ranges().is_empty());
    assert!(
        drain(&log).contains(&HighlightEvent::active_changed(false, ActiveReason::TooManyErrors))
    );
}

#[test]
fn language_change_rearms_checking() {
    let doc = Document::from_str("t", "die katze sitzt auf der matte die katze sitzt qq");
    let (mut engine, log) = engine_with(bilingual(), automatic_options());
    engine.slot_rehighlight(&doc);
    assert!(!engine.active());
    drain(&log);

    engine.set_current_language(&doc, "de_DE");
    assert_eq!(engine.current_language(), "de_DE");
    assert!(engine.active());
    let events = drain(&log);
    assert_eq!(
        events[..2],
        [
            HighlightEvent::LanguageChanged("de_DE".into()),
            HighlightEvent::active_changed(true, ActiveReason::Rearmed),
        ]
    );
    assert_eq!(events[2..], [HighlightEvent::Highlight(46..48)]);
}
