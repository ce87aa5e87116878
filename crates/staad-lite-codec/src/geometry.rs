// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extractors for the geometry sections: `JOINT COORDINATES`,
//! `MEMBER INCIDENCES`, `ELEMENT INCIDENCES SHELL` and group definitions
//!
//! Coordinate and incidence rows may carry several `;`-separated records per
//! physical line, and tolerate a leading type tag before the id.

use crate::cursor::{require_f64, require_u32, starts_numeric, LineCursor};
use crate::ranges::expand_ids;
use staad_lite_model::{
    CodecError, Group, GroupKind, GroupMembers, JointId, MemberIncidence, Result, ShapeId,
    ShellIncidence, StdDocument, Vec3,
};

/// Read `JOINT COORDINATES` rows until the first non-numeric line.
pub fn read_joints(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    const SECTION: &str = "JOINT COORDINATES";
    while let Some(line) = cur.take_if(starts_numeric) {
        for record in line.split(';') {
            let toks: Vec<&str> = record.split_whitespace().collect();
            if toks.is_empty() {
                continue;
            }
            // A 5-token record carries a leading type tag before the id
            let base = match toks.len() {
                4 => 0,
                5 => 1,
                _ => return Err(CodecError::malformed(SECTION, line)),
            };
            let id = require_u32(toks[base], SECTION, line)?;
            let x = require_f64(toks[base + 1], SECTION, line)?;
            let y = require_f64(toks[base + 2], SECTION, line)?;
            let z = require_f64(toks[base + 3], SECTION, line)?;
            doc.joints.insert(JointId(id), Vec3::new(x, y, z));
        }
    }
    Ok(())
}

/// Read `MEMBER INCIDENCES` rows. Duplicate ids overwrite silently, matching
/// the format's redefinition semantics.
pub fn read_members(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    const SECTION: &str = "MEMBER INCIDENCES";
    while let Some(line) = cur.take_if(starts_numeric) {
        for record in line.split(';') {
            let toks: Vec<&str> = record.split_whitespace().collect();
            if toks.is_empty() {
                continue;
            }
            let base = match toks.len() {
                3 => 0,
                4 => 1,
                _ => return Err(CodecError::malformed(SECTION, line)),
            };
            let id = require_u32(toks[base], SECTION, line)?;
            let start = require_u32(toks[base + 1], SECTION, line)?;
            let end = require_u32(toks[base + 2], SECTION, line)?;
            doc.members.insert(
                ShapeId(id),
                MemberIncidence::new(JointId(start), JointId(end)),
            );
        }
    }
    Ok(())
}

/// Read `ELEMENT INCIDENCES SHELL` rows, distinguishing triangles from
/// quadrilaterals by token count.
pub fn read_shells(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    const SECTION: &str = "ELEMENT INCIDENCES SHELL";
    while let Some(line) = cur.take_if(starts_numeric) {
        for record in line.split(';') {
            let toks: Vec<&str> = record.split_whitespace().collect();
            if toks.is_empty() {
                continue;
            }
            if toks.len() != 4 && toks.len() != 5 {
                return Err(CodecError::malformed(SECTION, line));
            }
            let id = require_u32(toks[0], SECTION, line)?;
            let mut nodes = Vec::with_capacity(toks.len() - 1);
            for tok in &toks[1..] {
                nodes.push(JointId(require_u32(tok, SECTION, line)?));
            }
            doc.shells.insert(ShapeId(id), ShellIncidence::new(nodes));
        }
    }
    Ok(())
}

/// Read a `START GROUP DEFINITION` block up to its end marker.
pub fn read_groups(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    const SECTION: &str = "GROUP DEFINITION";
    while let Some(line) = cur.peek() {
        if line == "END GROUP DEFINITION" {
            cur.advance();
            break;
        }
        let Some(kind) = GroupKind::parse(line) else {
            cur.advance();
            continue;
        };
        cur.advance();
        while let Some(group_line) = cur.take_if(|l| l.starts_with('_')) {
            let mut toks = group_line.split_whitespace();
            let name = toks
                .next()
                .map(|t| t.trim_start_matches('_').to_string())
                .unwrap_or_default();
            let ids = expand_ids(toks)
                .ok_or_else(|| CodecError::malformed(SECTION, group_line))?;
            insert_group(doc, kind, name, ids);
        }
    }
    Ok(())
}

/// Merge ids into an existing group of the same name and kind, or add one.
fn insert_group(doc: &mut StdDocument, kind: GroupKind, name: String, ids: Vec<u32>) {
    if let Some(group) = doc
        .groups
        .iter_mut()
        .find(|g| g.kind == kind && g.name == name)
    {
        match &mut group.members {
            GroupMembers::Joints(list) => list.extend(ids.into_iter().map(JointId)),
            GroupMembers::Shapes(list) => list.extend(ids.into_iter().map(ShapeId)),
        }
        return;
    }
    let members = match kind {
        GroupKind::Joint => GroupMembers::Joints(ids.into_iter().map(JointId).collect()),
        _ => GroupMembers::Shapes(ids.into_iter().map(ShapeId).collect()),
    };
    doc.groups.push(Group {
        name,
        kind,
        members,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn joint_records_split_on_semicolons() {
        let lines = lines(&["3 1.000 2.000 0.000; 4 0.000 0.000 3.500;", "SUPPORTS"]);
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        read_joints(&mut cur, &mut doc).unwrap();
        assert_eq!(doc.joints[&JointId(3)], Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(doc.joints[&JointId(4)], Vec3::new(0.0, 0.0, 3.5));
        // Cursor stops at the next section header
        assert_eq!(cur.peek(), Some("SUPPORTS"));
    }

    #[test]
    fn five_token_joint_rows_skip_the_type_tag() {
        let lines = lines(&["1 7 0.000 1.000 0.000;"]);
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        read_joints(&mut cur, &mut doc).unwrap();
        assert_eq!(doc.joints[&JointId(7)], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn member_redefinition_wins_last() {
        let lines = lines(&["1 1 2; 1 2 3;"]);
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        read_members(&mut cur, &mut doc).unwrap();
        assert_eq!(doc.members[&ShapeId(1)].start, JointId(2));
        assert_eq!(doc.members[&ShapeId(1)].end, JointId(3));
    }

    #[test]
    fn shells_by_token_count() {
        let lines = lines(&["10 1 2 3; 11 1 2 3 4;"]);
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        read_shells(&mut cur, &mut doc).unwrap();
        assert!(doc.shells[&ShapeId(10)].is_triangle());
        assert!(doc.shells[&ShapeId(11)].is_quad());
    }

    #[test]
    fn malformed_coordinate_row_is_fatal() {
        let lines = lines(&["3 1.000 abc 0.000;"]);
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        assert!(read_joints(&mut cur, &mut doc).is_err());
    }

    #[test]
    fn groups_by_section_kind() {
        let lines = lines(&[
            "JOINT",
            "_BASE 1 TO 3",
            "GEOMETRY",
            "_COLUMNS 1 2 5",
            "END GROUP DEFINITION",
            "FINISH",
        ]);
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        read_groups(&mut cur, &mut doc).unwrap();
        assert_eq!(doc.groups.len(), 2);
        assert_eq!(doc.groups[0].kind, GroupKind::Joint);
        assert_eq!(
            doc.groups[0].members,
            GroupMembers::Joints(vec![JointId(1), JointId(2), JointId(3)])
        );
        assert_eq!(doc.groups[1].kind, GroupKind::Geometry);
        assert_eq!(cur.peek(), Some("FINISH"));
    }
}
