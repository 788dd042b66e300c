/// Where the host's caret and selection currently are.
///
/// Stored clamped to the document length at the time of the notification;
/// queries clamp again against the live document, so a stale context yields
/// empty answers rather than panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorContext {
    pub cursor_position: usize,
    pub selection_start: usize,
    pub selection_end: usize,
}

impl CursorContext {
    pub fn at(position: usize) -> Self {
        Self {
            cursor_position: position,
            selection_start: position,
            selection_end: position,
        }
    }

    /// Build a context, ordering the selection and clamping all three offsets
    /// to `len`.
    pub fn new(cursor: usize, selection_a: usize, selection_b: usize, len: usize) -> Self {
        let (lo, hi) = if selection_a <= selection_b {
            (selection_a, selection_b)
        } else {
            (selection_b, selection_a)
        };
        Self {
            cursor_position: cursor.min(len),
            selection_start: lo.min(len),
            selection_end: hi.min(len),
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selection_start < self.selection_end
    }

    /// Offset the word-under-mouse query looks at.
    pub fn anchor(&self) -> usize {
        if self.has_selection() {
            self.selection_start
        } else {
            self.cursor_position
        }
    }
}
