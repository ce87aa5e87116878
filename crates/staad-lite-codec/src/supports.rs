// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extractor for the `SUPPORTS` section
//!
//! Rows are `<ids> FIXED`, `<ids> PINNED` or `<ids> FIXED BUT <tokens>`,
//! where a `K`-prefixed axis token carries a spring stiffness and a bare
//! axis token releases that degree of freedom. When both appear for one
//! axis the spring wins.

use crate::cursor::{require_f64, starts_numeric, LineCursor};
use crate::ranges::expand_ids;
use staad_lite_model::{
    CodecError, JointId, Restraint, RestraintSet, Result, StdDocument, Support, SupportKind,
};

const SECTION: &str = "SUPPORTS";

/// Read support rows until the first non-numeric line.
pub fn read_supports(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    while let Some(line) = cur.take_if(starts_numeric) {
        let toks: Vec<&str> = line.split_whitespace().collect();
        let kind_at = toks
            .iter()
            .position(|t| *t == "FIXED" || *t == "PINNED")
            .ok_or_else(|| CodecError::malformed(SECTION, line))?;
        let joints: Vec<JointId> = expand_ids(toks[..kind_at].iter().copied())
            .ok_or_else(|| CodecError::malformed(SECTION, line))?
            .into_iter()
            .map(JointId)
            .collect();

        let kind = match toks[kind_at] {
            "PINNED" => SupportKind::Pinned,
            "FIXED" if toks.get(kind_at + 1) == Some(&"BUT") => {
                SupportKind::FixedBut(read_restraints(&toks[kind_at + 2..], line)?)
            }
            _ => SupportKind::Fixed,
        };
        doc.supports.push(Support { kind, joints });
    }
    Ok(())
}

fn read_restraints(toks: &[&str], line: &str) -> Result<RestraintSet> {
    let mut set = RestraintSet::default();
    let mut i = 0;
    while i < toks.len() {
        let tok = toks[i];
        if let Some(axis) = tok.strip_prefix('K') {
            let value = toks
                .get(i + 1)
                .ok_or_else(|| CodecError::malformed(SECTION, line))?;
            let stiffness = require_f64(value, SECTION, line)?;
            // Springs override an earlier bare-axis release
            *slot(&mut set, axis, line)? = Some(Restraint::Spring(stiffness));
            i += 2;
        } else {
            let target = slot(&mut set, tok, line)?;
            if !matches!(target, Some(Restraint::Spring(_))) {
                *target = Some(Restraint::Released);
            }
            i += 1;
        }
    }
    Ok(set)
}

fn slot<'a>(
    set: &'a mut RestraintSet,
    axis: &str,
    line: &str,
) -> Result<&'a mut Option<Restraint>> {
    match axis {
        "FX" => Ok(&mut set.fx),
        "FY" => Ok(&mut set.fy),
        "FZ" => Ok(&mut set.fz),
        "MX" => Ok(&mut set.mx),
        "MY" => Ok(&mut set.my),
        "MZ" => Ok(&mut set.mz),
        _ => Err(CodecError::malformed(SECTION, line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(src: &[&str]) -> StdDocument {
        let lines: Vec<String> = src.iter().map(|s| s.to_string()).collect();
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        read_supports(&mut cur, &mut doc).unwrap();
        doc
    }

    #[test]
    fn fixed_and_pinned_rows() {
        let doc = decode(&["1 TO 4 FIXED", "5 7 PINNED"]);
        assert_eq!(doc.supports.len(), 2);
        assert_eq!(doc.supports[0].kind, SupportKind::Fixed);
        assert_eq!(doc.supports[0].joints.len(), 4);
        assert_eq!(doc.supports[1].kind, SupportKind::Pinned);
        assert_eq!(doc.supports[1].joints, vec![JointId(5), JointId(7)]);
    }

    #[test]
    fn fixed_but_springs_and_releases() {
        let doc = decode(&["9 FIXED BUT KFY 5000 MX MZ"]);
        match &doc.supports[0].kind {
            SupportKind::FixedBut(set) => {
                assert_eq!(set.fy, Some(Restraint::Spring(5000.0)));
                assert_eq!(set.mx, Some(Restraint::Released));
                assert_eq!(set.mz, Some(Restraint::Released));
                assert_eq!(set.fx, None);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn spring_wins_over_release_on_the_same_axis() {
        for line in ["3 FIXED BUT KFX 200 FX", "3 FIXED BUT FX KFX 200"] {
            let doc = decode(&[line]);
            match &doc.supports[0].kind {
                SupportKind::FixedBut(set) => {
                    assert_eq!(set.fx, Some(Restraint::Spring(200.0)));
                }
                other => panic!("unexpected kind: {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_axis_token_is_fatal() {
        let lines: Vec<String> = vec!["3 FIXED BUT KQX 1".to_string()];
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        assert!(read_supports(&mut cur, &mut doc).is_err());
    }
}
