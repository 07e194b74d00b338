//! Left joins between row sets.

use std::collections::HashMap;

use crate::error::QualityResult;
use crate::types::{RowSet, Value};

/// Left-join `right` onto `left` where `left[left_on] == right[right_on]`.
///
/// - Every left row is kept; it is repeated once per matching right row, or padded with nulls
///   when nothing matches.
/// - Keys compare by trimmed canonical text; null keys never match.
/// - The right key column is dropped when it has the same name as the left key.
/// - Right columns whose name collides with a left column get `suffix` appended.
/// - If either key column is missing, `left` is returned unchanged (re-indexed).
///
/// The result is indexed `0..n`.
pub fn left_join(
    left: &RowSet,
    right: &RowSet,
    left_on: &str,
    right_on: &str,
    suffix: &str,
) -> QualityResult<RowSet> {
    let (Some(left_key), Some(right_key)) = (left.index_of(left_on), right.index_of(right_on))
    else {
        tracing::warn!(left_on, right_on, "join key column absent, join skipped");
        return Ok(left.clone().reset_index());
    };

    let keep: Vec<usize> = (0..right.columns().len())
        .filter(|&c| !(c == right_key && left_on == right_on))
        .collect();

    let mut columns = left.columns().to_vec();
    for &c in &keep {
        let name = &right.columns()[c];
        if left.has_column(name) {
            columns.push(format!("{name}{suffix}"));
        } else {
            columns.push(name.clone());
        }
    }

    let mut lookup: HashMap<String, Vec<usize>> = HashMap::new();
    for (pos, row) in right.rows().iter().enumerate() {
        if let Some(k) = row[right_key].trimmed_key() {
            lookup.entry(k).or_default().push(pos);
        }
    }

    let mut rows = Vec::with_capacity(left.row_count());
    for (_, row) in left.iter() {
        let matches = row[left_key]
            .trimmed_key()
            .and_then(|k| lookup.get(&k))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if matches.is_empty() {
            let mut out = row.to_vec();
            out.extend(keep.iter().map(|_| Value::Null));
            rows.push(out);
            continue;
        }
        for &pos in matches {
            let r = &right.rows()[pos];
            let mut out = row.to_vec();
            out.extend(keep.iter().map(|&c| r[c].clone()));
            rows.push(out);
        }
    }

    RowSet::new(columns, rows)
}
