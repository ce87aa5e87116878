// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Row packing and continuation-marker line wrapping
//!
//! The format caps physical lines at a fixed column limit. Short atomic
//! records (one per joint or member) are greedily packed into shared rows;
//! a single overlong clause is split at whitespace with a trailing `-`
//! marker so the joiner can reassemble it.

use crate::ranges::FeaturePosition;

/// Column limit for generic clauses
pub const COLUMN_LIMIT: usize = 78;

/// Declared input width emitted in the file header
pub const INPUT_WIDTH: usize = 79;

/// Greedily pack atomic records into rows of at most `limit` columns.
///
/// Records are appended in the given order, separated by one space; a record
/// that would push the row past the limit starts a new row.
pub fn pack_rows(records: &[String], limit: usize) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    for rec in records {
        match rows.last_mut() {
            Some(row) if row.len() + rec.len() <= limit => {
                row.push(' ');
                row.push_str(rec);
            }
            _ => rows.push(rec.clone()),
        }
    }
    rows
}

/// Render one clause (feature text + compressed id list) as wrapped lines.
///
/// A clause that fits the limit becomes a single line. Otherwise the id list
/// is cut at the last space before the limit (reserving two columns for the
/// continuation marker), with the feature text on the first line when it
/// leads, or appended to the final line when it trails. A trailing feature
/// that no longer fits on the final line moves to its own line.
pub fn wrap_clause(
    feature: &str,
    ids: &str,
    position: FeaturePosition,
    limit: usize,
) -> Vec<String> {
    if ids.len() + feature.len() <= limit {
        return match position {
            FeaturePosition::Leading => vec![format!("{feature} {ids}")],
            FeaturePosition::Trailing => vec![format!("{ids} {feature}")],
        };
    }

    let mut lines = Vec::new();
    let mut budget = match position {
        FeaturePosition::Leading => limit.saturating_sub(feature.len() + 2),
        FeaturePosition::Trailing => limit - 2,
    };
    let mut rest = ids.to_string();
    let mut first = true;
    while rest.len() > budget {
        let Some(cut) = split_point(&rest, budget) else {
            break;
        };
        let piece = format!("{}-", &rest[..cut]);
        if first && position == FeaturePosition::Leading {
            lines.push(format!("{feature} {piece}"));
        } else {
            lines.push(piece);
        }
        rest = rest.split_off(cut);
        budget = limit - 2;
        first = false;
    }
    match position {
        FeaturePosition::Trailing => {
            if rest.len() + feature.len() > limit {
                lines.push(format!("{rest} -"));
                lines.push(feature.to_string());
            } else {
                lines.push(format!("{rest} {feature}"));
            }
        }
        FeaturePosition::Leading => {
            if first {
                // No split point existed; fall back to one overlong line
                lines.push(format!("{feature} {rest}"));
            } else {
                lines.push(rest);
            }
        }
    }
    lines
}

/// Wrap one already-assembled logical line at the column limit.
pub fn wrap_line(line: &str, limit: usize) -> Vec<String> {
    if line.len() <= limit {
        return vec![line.to_string()];
    }
    let budget = limit - 2;
    let mut lines = Vec::new();
    let mut rest = line.to_string();
    while rest.len() > budget {
        let Some(cut) = split_point(&rest, budget) else {
            break;
        };
        lines.push(format!("{}-", &rest[..cut]));
        rest = rest.split_off(cut);
    }
    lines.push(rest);
    lines
}

/// Index just past the last space within the first `budget` bytes,
/// or `None` when the prefix holds no space.
fn split_point(s: &str, budget: usize) -> Option<usize> {
    s[..budget].rfind(' ').map(|i| i + 1)
}
