// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compact id-range syntax: `a TO b` expansion and run compression
//!
//! Id lists appear in almost every section. On decode a token list may carry
//! the literal `TO` between two ids; on encode sorted ids collapse back into
//! `first TO last` runs. Clause assembly also lives here because the position
//! of the feature text (before or after the id list) depends on the feature
//! kind.

use crate::wrap::wrap_clause;
use rustc_hash::FxHashMap;

/// Where a clause's feature text sits relative to its id list
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FeaturePosition {
    /// `BETA 90 MEMB 1 TO 5` — feature first
    Leading,
    /// `1 TO 5 PINNED` — ids first
    Trailing,
}

/// Expand a token list, filling `a TO b` with every id in `(a, b)`.
///
/// The surrounding tokens already contribute the endpoints. Empty tokens are
/// ignored; any other unparsable token yields `None`.
pub fn expand_ids<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Option<Vec<u32>> {
    let toks: Vec<&str> = tokens.into_iter().filter(|t| !t.is_empty()).collect();
    let mut out = Vec::new();
    for (i, tok) in toks.iter().enumerate() {
        if *tok == "TO" {
            let a: u32 = toks.get(i.wrapping_sub(1))?.parse().ok()?;
            let b: u32 = toks.get(i + 1)?.parse().ok()?;
            for id in a + 1..b {
                out.push(id);
            }
        } else {
            out.push(tok.parse().ok()?);
        }
    }
    Some(out)
}

/// Compress a set of ids into the compact range syntax.
///
/// Ids are sorted ascending and deduplicated; runs of two or more
/// consecutive ids encode as `first TO last`, single ids stay bare.
pub fn compress_ids(ids: &[u32]) -> String {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts: Vec<String> = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[j] + 1 {
            j += 1;
        }
        if j > i {
            parts.push(format!("{} TO {}", sorted[i], sorted[j]));
        } else {
            parts.push(sorted[i].to_string());
        }
        i = j + 1;
    }
    parts.join(" ")
}

/// Group (feature, id) pairs by feature text, compress each id set and
/// render wrapped clause lines.
///
/// First-seen feature order is preserved. Spring clauses always put their
/// feature text first, whatever position the caller asked for.
pub fn emit_grouped_clauses(
    entries: impl IntoIterator<Item = (String, u32)>,
    position: FeaturePosition,
    limit: usize,
) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: FxHashMap<String, Vec<u32>> = FxHashMap::default();
    for (feature, id) in entries {
        groups
            .entry(feature.clone())
            .or_insert_with(|| {
                order.push(feature);
                Vec::new()
            })
            .push(id);
    }

    let mut lines = Vec::new();
    for feature in &order {
        let ids = compress_ids(&groups[feature]);
        let position = if feature.contains("SPRINGS") {
            FeaturePosition::Leading
        } else {
            position
        };
        lines.extend(wrap_clause(feature, &ids, position, limit));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap::COLUMN_LIMIT;

    #[test]
    fn compresses_runs() {
        assert_eq!(
            compress_ids(&[1, 2, 3, 4, 5, 7, 9, 10, 11]),
            "1 TO 5 7 9 TO 11"
        );
        assert_eq!(compress_ids(&[4, 2]), "2 4");
        assert_eq!(compress_ids(&[8, 7]), "7 TO 8");
    }

    #[test]
    fn expansion_inverts_compression() {
        let expanded = expand_ids("1 TO 5 7 9 TO 11".split_whitespace()).unwrap();
        assert_eq!(expanded, vec![1, 2, 3, 4, 5, 7, 9, 10, 11]);
    }

    #[test]
    fn expansion_rejects_junk() {
        assert_eq!(expand_ids(["1", "x"]), None);
        assert_eq!(expand_ids(["TO", "3"]), None);
    }

    #[test]
    fn clauses_group_by_feature() {
        let entries = vec![
            ("PINNED".to_string(), 1),
            ("FIXED".to_string(), 4),
            ("PINNED".to_string(), 2),
            ("PINNED".to_string(), 3),
        ];
        let lines = emit_grouped_clauses(entries, FeaturePosition::Trailing, COLUMN_LIMIT);
        assert_eq!(lines, vec!["1 TO 3 PINNED", "4 FIXED"]);
    }

    #[test]
    fn spring_clauses_flip_to_leading() {
        let entries = vec![("SPRINGS 1 0.5 2 0.8".to_string(), 4)];
        let lines = emit_grouped_clauses(entries, FeaturePosition::Trailing, COLUMN_LIMIT);
        assert_eq!(lines, vec!["SPRINGS 1 0.5 2 0.8 4"]);
    }

    #[test]
    fn leading_feature_comes_first() {
        let entries = vec![
            ("BETA 90 MEMB".to_string(), 7),
            ("BETA 90 MEMB".to_string(), 8),
        ];
        let lines = emit_grouped_clauses(entries, FeaturePosition::Leading, COLUMN_LIMIT);
        assert_eq!(lines, vec!["BETA 90 MEMB 7 TO 8"]);
    }
}
