// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Physical-to-logical line reassembly
//!
//! The wire format splits long records across physical lines with a trailing
//! `-` marker and allows `*` comment lines anywhere. This pass removes
//! comments and blank lines and merges continuations, leaving one logical
//! line per record for the section scanner.

use memchr::memchr_iter;

/// Split raw file content into logical lines.
///
/// Comments (`*` as the first non-blank character) and blank lines are
/// dropped. A line whose predecessor ends with the continuation marker is
/// merged into it, except after lines carrying `TITLE`, which may end in a
/// legitimate hyphen. Output preserves original record order.
pub fn join_lines(content: &str) -> Vec<String> {
    let mut logical: Vec<String> = Vec::new();
    let bytes = content.as_bytes();
    let mut start = 0usize;
    for nl in memchr_iter(b'\n', bytes) {
        push_line(&content[start..nl], &mut logical);
        start = nl + 1;
    }
    if start < content.len() {
        push_line(&content[start..], &mut logical);
    }
    logical
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn push_line(raw: &str, logical: &mut Vec<String>) {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.trim().is_empty() || line.trim_start().starts_with('*') {
        return;
    }
    if let Some(prev) = logical.last_mut() {
        if let Some(joined) = try_join(prev, line) {
            *prev = joined;
            return;
        }
    }
    logical.push(line.to_string());
}

/// Merge `next` into `prev` when `prev` ends with the continuation marker.
///
/// The marker (and a single trailing space after it) is stripped. When the
/// marker was preceded by a space no extra separator is inserted, otherwise
/// one space joins the halves.
fn try_join(prev: &str, next: &str) -> Option<String> {
    if prev.contains("TITLE") {
        return None;
    }
    let base = prev
        .strip_suffix("- ")
        .or_else(|| prev.strip_suffix('-'))?;
    let extra = if base.ends_with(' ') { "" } else { " " };
    Some(format!("{base}{extra}{next}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comments_and_blanks() {
        let content = "JOINT COORDINATES\n* a comment\n\n1 0.000 0.000 0.000;\n";
        let lines = join_lines(content);
        assert_eq!(lines, vec!["JOINT COORDINATES", "1 0.000 0.000 0.000;"]);
    }

    #[test]
    fn merges_continuation_with_space_before_marker() {
        let lines = join_lines("1 2 3 -\n4 5 PINNED\n");
        assert_eq!(lines, vec!["1 2 3 4 5 PINNED"]);
    }

    #[test]
    fn merges_continuation_without_space_before_marker() {
        let lines = join_lines("1 2 3-\n4 5 PINNED\n");
        assert_eq!(lines, vec!["1 2 3 4 5 PINNED"]);
    }

    #[test]
    fn marker_followed_by_trailing_space() {
        let lines = join_lines("1 2 3 - \n4 5 FIXED\n");
        assert_eq!(lines, vec!["1 2 3 4 5 FIXED"]);
    }

    #[test]
    fn title_lines_never_continue() {
        let lines = join_lines("LOAD 1 LOADTYPE Live TITLE WIND-\nSELFWEIGHT Y -1\n");
        assert_eq!(
            lines,
            vec!["LOAD 1 LOADTYPE Live TITLE WIND-", "SELFWEIGHT Y -1"]
        );
    }

    #[test]
    fn no_trailing_newline() {
        let lines = join_lines("FINISH");
        assert_eq!(lines, vec!["FINISH"]);
    }
}
