//! Derive the retained subset of a [`crate::types::RowSet`] from a discard set.

use std::collections::BTreeSet;

use crate::types::RowSet;

/// Row counts before and after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanStats {
    pub input_rows: usize,
    pub discarded: usize,
    pub retained: usize,
}

/// Returns a new [`RowSet`] without the rows whose original index is in `discard`.
///
/// The result keeps the column set, preserves relative row order and is re-indexed `0..n`.
/// Indices in `discard` that do not name a row are ignored.
pub fn clean(rows: &RowSet, discard: &BTreeSet<usize>) -> RowSet {
    rows.drop_rows(discard).reset_index()
}

/// Like [`clean`], also reporting row counts.
pub fn clean_with_stats(rows: &RowSet, discard: &BTreeSet<usize>) -> (RowSet, CleanStats) {
    let cleaned = clean(rows, discard);
    let stats = CleanStats {
        input_rows: rows.row_count(),
        discarded: rows.row_count() - cleaned.row_count(),
        retained: cleaned.row_count(),
    };
    (cleaned, stats)
}
