// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Declared-unit and up-axis handling
//!
//! Only two force units (N, kN) and two up-axis conventions (Y, Z) exist in
//! the format. Force-like values are scaled to canonical Newtons as the
//! extractors read them; this module additionally remaps a `Y`-up document
//! into the canonical `Z`-up convention.

use staad_lite_model::{
    Axis, CodecError, ForceComponents, ForceUnit, LoadDirection, LoadItem, Result, StdDocument,
    SupportKind, UpAxis, Vec3,
};

/// Recognize `UNIT` and `SET <axis> UP` declarations.
///
/// The last declaration in the file wins and applies to the whole record
/// set. Returns an error for force units or axes outside the supported set.
pub fn scan_declaration(line: &str, doc: &mut StdDocument) -> Result<()> {
    let toks: Vec<&str> = line.split_whitespace().collect();
    match toks.as_slice() {
        ["UNIT", length, force, ..] => {
            doc.units.length = (*length).to_string();
            doc.units.force = match *force {
                "N" => ForceUnit::Newton,
                "KN" => ForceUnit::KiloNewton,
                other => return Err(CodecError::UnsupportedForceUnit(other.to_string())),
            };
        }
        ["SET", axis, "UP"] => {
            doc.up_axis = match *axis {
                "Y" => UpAxis::Y,
                "Z" => UpAxis::Z,
                other => return Err(CodecError::UnsupportedUpAxis(other.to_string())),
            };
        }
        _ => {}
    }
    Ok(())
}

/// Remap the document into the canonical `Z`-up convention.
///
/// A `Z`-up document passes through untouched. For `Y`-up input the
/// coordinate map is `(x, y, z) -> (x, -z, y)`; support restraints swap
/// their Y and Z axis slots, joint-load and support-displacement components
/// swap FY/FZ and MY/MZ with a sign flip on the value landing in the new
/// FY/MY slot, and global member/element load directions swap `GY`/`GZ`
/// with the magnitude negated on the `GZ` to `GY` move.
pub fn normalize(doc: &mut StdDocument) {
    if doc.up_axis == UpAxis::Z {
        return;
    }
    doc.up_axis = UpAxis::Z;

    for coords in doc.joints.values_mut() {
        *coords = map_vec(*coords);
    }
    for member in doc.members.values_mut() {
        member.start_coords = map_vec(member.start_coords);
        member.end_coords = map_vec(member.end_coords);
    }
    for local_z in doc.beta_angles.values_mut() {
        *local_z = map_vec(*local_z);
    }

    for support in &mut doc.supports {
        if let SupportKind::FixedBut(set) = &mut support.kind {
            std::mem::swap(&mut set.fy, &mut set.fz);
            std::mem::swap(&mut set.my, &mut set.mz);
        }
    }

    for case in doc.load_cases.values_mut() {
        for item in &mut case.items {
            match item {
                LoadItem::SelfWeight { direction, .. } => *direction = Axis::Z,
                LoadItem::JointLoad { components, .. }
                | LoadItem::SupportDisplacement { components, .. } => {
                    map_components(components);
                }
                LoadItem::MemberLoad {
                    kind, direction, ..
                } => {
                    if map_direction(direction) == Some(true) {
                        negate_member_magnitudes(kind);
                    }
                }
                LoadItem::ElementLoad {
                    kind, direction, ..
                } => {
                    if map_direction(direction) == Some(true) {
                        negate_element_magnitudes(kind);
                    }
                }
                LoadItem::Repeat { .. } => {}
            }
        }
    }
}

fn map_vec(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.z, v.y)
}

fn map_components(c: &mut ForceComponents) {
    let fy = c.fz.map(|v| -v);
    let fz = c.fy;
    c.fy = fy;
    c.fz = fz;
    let my = c.mz.map(|v| -v);
    let mz = c.my;
    c.my = my;
    c.mz = mz;
}

/// Swap global Y/Z direction codes. Returns `Some(true)` when the magnitude
/// must be negated (`GZ` to `GY`), `Some(false)` for the opposite move and
/// `None` when the direction is untouched.
fn map_direction(direction: &mut LoadDirection) -> Option<bool> {
    match direction {
        LoadDirection::GY => {
            *direction = LoadDirection::GZ;
            Some(false)
        }
        LoadDirection::GZ => {
            *direction = LoadDirection::GY;
            Some(true)
        }
        _ => None,
    }
}

fn negate_member_magnitudes(kind: &mut staad_lite_model::MemberLoadKind) {
    use staad_lite_model::MemberLoadKind::*;
    match kind {
        Uniform { force, .. } => *force = -*force,
        UniformMoment { moment, .. } => *moment = -*moment,
        Concentrated { force, .. } => *force = -*force,
        Linear { w1, w2 } => {
            *w1 = -*w1;
            *w2 = -*w2;
        }
        Trapezoidal { w1, w2, .. } => {
            *w1 = -*w1;
            *w2 = -*w2;
        }
    }
}

fn negate_element_magnitudes(kind: &mut staad_lite_model::ElementLoadKind) {
    use staad_lite_model::ElementLoadKind::*;
    match kind {
        Pressure { force } => *force = -*force,
        Concentrated { force, .. } => *force = -*force,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staad_lite_model::{JointId, LoadCase, LoadCaseId, MemberLoadKind, ShapeId};

    #[test]
    fn unit_declaration_sets_force_factor() {
        let mut doc = StdDocument::default();
        scan_declaration("UNIT METER N", &mut doc).unwrap();
        assert_eq!(doc.units.force_factor(), 1.0);
        scan_declaration("UNIT METER KN", &mut doc).unwrap();
        assert_eq!(doc.units.force_factor(), 1000.0);
    }

    #[test]
    fn unknown_force_unit_is_fatal() {
        let mut doc = StdDocument::default();
        let err = scan_declaration("UNIT FEET KIP", &mut doc).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedForceUnit(_)));
    }

    #[test]
    fn unknown_up_axis_is_fatal() {
        let mut doc = StdDocument::default();
        let err = scan_declaration("SET X UP", &mut doc).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedUpAxis(_)));
    }

    #[test]
    fn y_up_coordinates_are_remapped() {
        let mut doc = StdDocument::default();
        doc.joints.insert(JointId(1), Vec3::new(1.0, 2.0, 3.0));
        normalize(&mut doc);
        assert_eq!(doc.joints[&JointId(1)], Vec3::new(1.0, -3.0, 2.0));
        assert_eq!(doc.up_axis, UpAxis::Z);
    }

    #[test]
    fn gz_member_load_becomes_negated_gy() {
        let mut doc = StdDocument::default();
        let mut case = LoadCase::new("DL");
        case.items.push(LoadItem::MemberLoad {
            kind: MemberLoadKind::Uniform {
                force: 10.0,
                d1: None,
                d2: None,
                d3: None,
            },
            direction: LoadDirection::GZ,
            members: vec![ShapeId(1)],
        });
        doc.load_cases.insert(LoadCaseId(1), case);
        normalize(&mut doc);

        let case = &doc.load_cases[&LoadCaseId(1)];
        match &case.items[0] {
            LoadItem::MemberLoad {
                kind: MemberLoadKind::Uniform { force, .. },
                direction,
                ..
            } => {
                assert_eq!(*direction, LoadDirection::GY);
                assert_eq!(*force, -10.0);
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn joint_load_components_swap_with_sign() {
        let mut doc = StdDocument::default();
        let mut case = LoadCase::new("DL");
        case.items.push(LoadItem::JointLoad {
            components: ForceComponents {
                fy: Some(2.0),
                fz: Some(3.0),
                mz: Some(4.0),
                ..Default::default()
            },
            joints: vec![JointId(1)],
        });
        doc.load_cases.insert(LoadCaseId(1), case);
        normalize(&mut doc);

        match &doc.load_cases[&LoadCaseId(1)].items[0] {
            LoadItem::JointLoad { components, .. } => {
                assert_eq!(components.fy, Some(-3.0));
                assert_eq!(components.fz, Some(2.0));
                assert_eq!(components.my, Some(-4.0));
                assert_eq!(components.mz, None);
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn z_up_documents_pass_through() {
        let mut doc = StdDocument::default();
        doc.up_axis = UpAxis::Z;
        doc.joints.insert(JointId(1), Vec3::new(1.0, 2.0, 3.0));
        normalize(&mut doc);
        assert_eq!(doc.joints[&JointId(1)], Vec3::new(1.0, 2.0, 3.0));
    }
}
