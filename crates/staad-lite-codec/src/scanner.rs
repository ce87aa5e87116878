// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Section scanner: one linear pass over the logical line stream
//!
//! Sections may appear in any order and are independent; a header keyword
//! hands the cursor to that section's extractor, which consumes record rows
//! and stops at the first line it does not recognize. Anything outside a
//! known section is skipped.

use crate::constants::{self, RawBetas};
use crate::cursor::LineCursor;
use crate::{geometry, loads, materials, properties, supports, units};
use staad_lite_model::{CodecError, Result, StdDocument};

/// Decode the joined line stream into a document.
///
/// Unit and up-axis declarations are resolved first (the last declaration
/// wins file-wide), then every section is scanned in one pass, and finally
/// cross-record state is resolved: member endpoint coordinates, beta-angle
/// vectors and combination categories.
pub fn scan(lines: &[String]) -> Result<StdDocument> {
    let mut doc = StdDocument::default();
    for line in lines {
        units::scan_declaration(line, &mut doc)?;
    }
    let factor = doc.units.force_factor();

    let mut raw_betas = RawBetas::new();
    let mut cur = LineCursor::new(lines);
    while let Some(line) = cur.peek() {
        if let Some(title) = line.strip_prefix("STAAD SPACE") {
            doc.name = title.trim().to_string();
            cur.advance();
        } else if line == "JOINT COORDINATES" {
            cur.advance();
            geometry::read_joints(&mut cur, &mut doc)?;
        } else if line == "MEMBER INCIDENCES" {
            cur.advance();
            geometry::read_members(&mut cur, &mut doc)?;
        } else if line == "ELEMENT INCIDENCES SHELL" {
            cur.advance();
            geometry::read_shells(&mut cur, &mut doc)?;
        } else if line == "DEFINE MATERIAL START" {
            cur.advance();
            materials::read_materials(&mut cur, &mut doc, factor)?;
        } else if line == "START USER TABLE" {
            cur.advance();
            properties::read_user_table(&mut cur, &mut doc)?;
        } else if line.starts_with("MEMBER PROPERTY") {
            cur.advance();
            properties::read_member_properties(&mut cur, &mut doc)?;
        } else if line == "ELEMENT PROPERTY" {
            cur.advance();
            properties::read_element_properties(&mut cur, &mut doc)?;
        } else if line == "CONSTANTS" {
            cur.advance();
            constants::read_constants(&mut cur, &mut doc, &mut raw_betas)?;
        } else if line == "MEMBER OFFSET" {
            cur.advance();
            constants::read_offsets(&mut cur, &mut doc)?;
        } else if line == "SUPPORTS" || line == "SUPPORT" {
            cur.advance();
            supports::read_supports(&mut cur, &mut doc)?;
        } else if line == "START GROUP DEFINITION" {
            cur.advance();
            geometry::read_groups(&mut cur, &mut doc)?;
        } else if line == "DEFINE ENVELOPE" {
            cur.advance();
            loads::read_envelopes(&mut cur, &mut doc)?;
        } else if loads::is_combination_header(line) {
            loads::read_combination(&mut cur, &mut doc)?;
        } else if loads::is_case_header(line) {
            loads::read_load_case(&mut cur, &mut doc, factor)?;
        } else {
            cur.advance();
        }
    }

    finish(&mut doc, raw_betas)?;
    Ok(doc)
}

/// Resolve cross-record state once every section has been read.
fn finish(doc: &mut StdDocument, raw_betas: RawBetas) -> Result<()> {
    let StdDocument {
        joints, members, ..
    } = doc;
    for (id, member) in members.iter_mut() {
        let start = joints
            .get(&member.start)
            .ok_or(CodecError::UndefinedJoint {
                member: *id,
                joint: member.start,
            })?;
        let end = joints.get(&member.end).ok_or(CodecError::UndefinedJoint {
            member: *id,
            joint: member.end,
        })?;
        member.start_coords = *start;
        member.end_coords = *end;
    }

    constants::resolve_betas(doc, raw_betas);

    let envelopes: Vec<_> = doc
        .envelopes
        .iter()
        .map(|(id, env)| (*id, env.combinations.clone()))
        .collect();
    for (envelope_id, combinations) in envelopes {
        for combination in combinations {
            if let Some(comb) = doc.combinations.get_mut(&combination) {
                comb.category = Some(envelope_id);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joiner::join_lines;
    use staad_lite_model::{
        CombinationId, EnvelopeId, ForceUnit, JointId, ShapeId, UpAxis, Vec3,
    };

    const TEST_STD: &str = "STAAD SPACE PORTAL FRAME
START JOB INFORMATION
ENGINEER DATE 05/08/2026
END JOB INFORMATION
INPUT WIDTH 79
UNIT METER KN
SET Z UP
JOINT COORDINATES
1 0.000 0.000 0.000; 2 0.000 0.000 3.000; 3 6.000 0.000 3.000;
4 6.000 0.000 0.000;
MEMBER INCIDENCES
1 1 2; 2 2 3; 3 3 4;
DEFINE MATERIAL START
ISOTROPIC STEEL
E 2.1e+08
POISSON 0.3
DENSITY 76.8195
END DEFINE MATERIAL
MEMBER PROPERTY EUROPEAN
1 TO 3 TABLE ST HE200A
CONSTANTS
MATERIAL STEEL MEMB 1 TO 3
SUPPORTS
1 4 FIXED
LOAD 1 LOADTYPE Dead TITLE SELF WEIGHT
SELFWEIGHT Z -1
LOAD 2 LOADTYPE Live TITLE IMPOSED
MEMBER LOAD
2 UNI GZ -5
LOAD COMB 101 ULS
1 1.35 2 1.5
PERFORM ANALYSIS
DEFINE ENVELOPE
101 ENVELOPE 1 TYPE STRENGTH
END DEFINE ENVELOPE
FINISH
";

    #[test]
    fn scans_a_complete_file() {
        let lines = join_lines(TEST_STD);
        let doc = scan(&lines).unwrap();

        assert_eq!(doc.name, "PORTAL FRAME");
        assert_eq!(doc.units.force, ForceUnit::KiloNewton);
        assert_eq!(doc.up_axis, UpAxis::Z);
        assert_eq!(doc.joints.len(), 4);
        assert_eq!(doc.members.len(), 3);
        assert_eq!(doc.materials.len(), 1);
        assert_eq!(doc.member_properties.len(), 1);
        assert_eq!(doc.supports.len(), 1);
        assert_eq!(doc.load_cases.len(), 2);
        assert_eq!(doc.combinations.len(), 1);
        assert_eq!(doc.envelopes.len(), 1);

        // Endpoint coordinates are cached on the incidence records
        let member = &doc.members[&ShapeId(2)];
        assert_eq!(member.start_coords, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(member.end_coords, Vec3::new(6.0, 0.0, 3.0));

        // The combination picked up its envelope as category
        assert_eq!(
            doc.combinations[&CombinationId(101)].category,
            Some(EnvelopeId(1))
        );
    }

    #[test]
    fn member_with_missing_joint_is_fatal() {
        let lines = join_lines("MEMBER INCIDENCES\n1 1 2;\n");
        let err = scan(&lines).unwrap_err();
        assert!(matches!(err, CodecError::UndefinedJoint { .. }));
    }

    #[test]
    fn sections_in_any_order() {
        let content = "SUPPORTS\n1 PINNED\nJOINT COORDINATES\n1 0.0 0.0 0.0;\n";
        let doc = scan(&join_lines(content)).unwrap();
        assert_eq!(doc.supports.len(), 1);
        assert_eq!(doc.joints.len(), 1);
        assert_eq!(doc.joints[&JointId(1)], Vec3::new(0.0, 0.0, 0.0));
    }
}
