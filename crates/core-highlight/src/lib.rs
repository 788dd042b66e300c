//! As-you-type spell-check highlighting.
//!
//! `HighlightEngine` watches a host document through change notifications,
//! checks the words an edit touched against a `Speller`, and reports which
//! ranges gain or lose misspelled markup through `HighlightEvent`s.

mod cursor;
mod engine;
mod options;
mod policy;
mod ranges;

pub use cursor::CursorContext;
pub use engine::{EngineState, HighlightEngine};
pub use options::EngineOptions;
pub use policy::{DensityPolicy, Verdict};
pub use ranges::{MisspelledRange, RangeSet};

pub use core_events::{ActiveReason, HighlightEvent, HighlightObserver};
