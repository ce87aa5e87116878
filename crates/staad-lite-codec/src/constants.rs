// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extractors for the per-member side tables: `CONSTANTS` (material
//! assignment, beta angles) and `MEMBER OFFSET`
//!
//! A beta clause only fixes the local-z axis once the member's global span
//! direction is known, so raw angles are collected during the scan and
//! resolved against the incidence table afterwards.

use crate::cursor::{require_f64, require_u32, starts_numeric, LineCursor};
use crate::ranges::expand_ids;
use staad_lite_model::{
    AssignmentTarget, AxisDirection, CodecError, MaterialAssignment, MemberOffset, Result, ShapeId,
    StdDocument, Vec3,
};

const CONSTANTS_SECTION: &str = "CONSTANTS";
const OFFSET_SECTION: &str = "MEMBER OFFSET";

/// Beta angles gathered during the scan, resolved after incidences are known
pub type RawBetas = Vec<(u32, Vec<ShapeId>)>;

#[derive(PartialEq)]
enum LastClause {
    None,
    Material,
    Beta,
}

/// Read `MATERIAL` and `BETA` clauses until an unrecognized line.
pub fn read_constants(
    cur: &mut LineCursor,
    doc: &mut StdDocument,
    raw_betas: &mut RawBetas,
) -> Result<()> {
    let mut last = LastClause::None;
    while let Some(line) = cur.peek() {
        let toks: Vec<&str> = line.split_whitespace().collect();
        match toks.first() {
            Some(&"MATERIAL") => {
                read_material_clause(&toks, doc, line)?;
                last = LastClause::Material;
            }
            Some(&"BETA") => {
                read_beta_clause(&toks, raw_betas, line)?;
                last = LastClause::Beta;
            }
            // A bare id row extends the id list of the preceding beta clause
            _ if starts_numeric(line) && last == LastClause::Beta => {
                let ids = expand_ids(toks.iter().copied())
                    .ok_or_else(|| CodecError::malformed(CONSTANTS_SECTION, line))?;
                if let Some((_, members)) = raw_betas.last_mut() {
                    members.extend(ids.into_iter().map(ShapeId));
                }
            }
            _ => break,
        }
        cur.advance();
    }
    Ok(())
}

/// `MATERIAL <name> MEMB <ids>` or `MATERIAL <name> ALL`
fn read_material_clause(toks: &[&str], doc: &mut StdDocument, line: &str) -> Result<()> {
    if let Some(at) = toks.iter().position(|t| *t == "MEMB") {
        let name = toks[1..at].join(" ");
        let ids: Vec<ShapeId> = expand_ids(toks[at + 1..].iter().copied())
            .ok_or_else(|| CodecError::malformed(CONSTANTS_SECTION, line))?
            .into_iter()
            .map(ShapeId)
            .collect();
        // Merge into an earlier clause for the same material
        if let Some(existing) = doc.material_assignments.iter_mut().find(|a| {
            a.material == name && matches!(a.target, AssignmentTarget::Shapes(_))
        }) {
            if let AssignmentTarget::Shapes(list) = &mut existing.target {
                list.extend(ids);
            }
            return Ok(());
        }
        doc.material_assignments.push(MaterialAssignment {
            material: name,
            target: AssignmentTarget::Shapes(ids),
        });
    } else if toks.last() == Some(&"ALL") && toks.len() > 2 {
        let name = toks[1..toks.len() - 1].join(" ");
        doc.material_assignments.push(MaterialAssignment {
            material: name,
            target: AssignmentTarget::All,
        });
    }
    Ok(())
}

/// `BETA <angle> MEMB <ids>`
fn read_beta_clause(toks: &[&str], raw_betas: &mut RawBetas, line: &str) -> Result<()> {
    let angle = require_u32(
        toks.get(1).copied().unwrap_or_default(),
        CONSTANTS_SECTION,
        line,
    )?;
    let at = toks
        .iter()
        .position(|t| *t == "MEMB")
        .ok_or_else(|| CodecError::malformed(CONSTANTS_SECTION, line))?;
    let ids: Vec<ShapeId> = expand_ids(toks[at + 1..].iter().copied())
        .ok_or_else(|| CodecError::malformed(CONSTANTS_SECTION, line))?
        .into_iter()
        .map(ShapeId)
        .collect();
    raw_betas.push((angle, ids));
    Ok(())
}

/// Resolve collected beta angles into local-z-axis vectors.
///
/// Members not aligned to a single global axis are skipped with a warning;
/// so are angles outside the 0/90/180/270 set.
pub fn resolve_betas(doc: &mut StdDocument, raw_betas: RawBetas) {
    for (angle, members) in raw_betas {
        for id in members {
            let Some(member) = doc.members.get(&id) else {
                log::warn!("Beta angle references unknown member {id}");
                continue;
            };
            let Some(direction) = member.span().axis_direction() else {
                log::warn!(
                    "Member {id} does not span a single global axis; beta angle skipped"
                );
                continue;
            };
            match local_z_axis(direction, angle) {
                Some(local_z) => {
                    doc.beta_angles.insert(id, local_z);
                }
                None => log::warn!("Unsupported beta angle {angle} on member {id}"),
            }
        }
    }
}

/// Fixed lookup of (span direction, beta angle) to the local-z unit vector,
/// 6 directions by 4 angles.
pub fn local_z_axis(direction: AxisDirection, angle: u32) -> Option<Vec3> {
    use AxisDirection::*;
    let v = match (direction, angle) {
        (PlusZ, 0) => [-1.0, 0.0, 0.0],
        (PlusZ, 90) => [0.0, -1.0, 0.0],
        (PlusZ, 180) => [1.0, 0.0, 0.0],
        (PlusZ, 270) => [0.0, 1.0, 0.0],
        (MinusZ, 0) => [1.0, 0.0, 0.0],
        (MinusZ, 90) => [0.0, -1.0, 0.0],
        (MinusZ, 180) => [-1.0, 0.0, 0.0],
        (MinusZ, 270) => [0.0, 1.0, 0.0],
        (PlusY, 0) => [0.0, 0.0, 1.0],
        (PlusY, 90) => [1.0, 0.0, 0.0],
        (PlusY, 180) => [0.0, 0.0, -1.0],
        (PlusY, 270) => [-1.0, 0.0, 0.0],
        (MinusY, 0) => [0.0, 0.0, 1.0],
        (MinusY, 90) => [-1.0, 0.0, 0.0],
        (MinusY, 180) => [0.0, 0.0, -1.0],
        (MinusY, 270) => [1.0, 0.0, 0.0],
        (PlusX, 0) => [0.0, 0.0, 1.0],
        (PlusX, 90) => [0.0, -1.0, 0.0],
        (PlusX, 180) => [0.0, 0.0, -1.0],
        (PlusX, 270) => [0.0, 1.0, 0.0],
        (MinusX, 0) => [0.0, 0.0, -1.0],
        (MinusX, 90) => [0.0, -1.0, 0.0],
        (MinusX, 180) => [0.0, 0.0, 1.0],
        (MinusX, 270) => [0.0, 1.0, 0.0],
        _ => return None,
    };
    Some(Vec3::from(v))
}

/// Beta angle reproducing a member's local-z axis, for the encode direction.
/// Angle 0 is the format's default orientation and emits no clause.
pub fn beta_angle_for(direction: AxisDirection, local_z: Vec3) -> Option<u32> {
    for angle in [90u32, 180, 270] {
        if local_z_axis(direction, angle) == Some(local_z) {
            return Some(angle);
        }
    }
    None
}

/// Read `<ids> START|END <x> <y> <z>` rows of a `MEMBER OFFSET` section.
pub fn read_offsets(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    while let Some(line) = cur.take_if(starts_numeric) {
        let toks: Vec<&str> = line.split_whitespace().collect();
        let at = toks
            .iter()
            .position(|t| *t == "START" || *t == "END")
            .ok_or_else(|| CodecError::malformed(OFFSET_SECTION, line))?;
        if toks.len() != at + 4 {
            return Err(CodecError::malformed(OFFSET_SECTION, line));
        }
        let ids = expand_ids(toks[..at].iter().copied())
            .ok_or_else(|| CodecError::malformed(OFFSET_SECTION, line))?;
        let vector = Vec3::new(
            require_f64(toks[at + 1], OFFSET_SECTION, line)?,
            require_f64(toks[at + 2], OFFSET_SECTION, line)?,
            require_f64(toks[at + 3], OFFSET_SECTION, line)?,
        );
        for id in ids {
            let offset = doc
                .offsets
                .entry(ShapeId(id))
                .or_insert_with(MemberOffset::default);
            if toks[at] == "START" {
                offset.start = Some(vector);
            } else {
                offset.end = Some(vector);
            }
        }
    }
    Ok(())
}
