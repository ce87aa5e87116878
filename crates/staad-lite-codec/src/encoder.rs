// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document-to-text serializer
//!
//! Sections are emitted in the conventional order, each assembled from the
//! row packer and clause wrapper, into one in-memory buffer. Nothing touches
//! the filesystem here, so an encode error never leaves a partial file.

use crate::constants::beta_angle_for;
use crate::ranges::{compress_ids, emit_grouped_clauses, FeaturePosition};
use crate::wrap::{pack_rows, wrap_clause, wrap_line, COLUMN_LIMIT, INPUT_WIDTH};
use crate::StdEncoder;
use staad_lite_model::{
    AssignmentTarget, CodecError, ElementLoadKind, ForceComponents, LoadItem, MemberLoadKind,
    Restraint, RestraintSet, Result, SectionProfile, SelfWeightTarget, StdDocument, SupportKind,
    GRAVITY,
};
use std::f64::consts::PI;

/// Serialize a document into std-format text.
pub fn encode_document(doc: &StdDocument, options: &StdEncoder) -> Result<String> {
    let factor = doc.units.force_factor();
    let mut out: Vec<String> = Vec::new();

    out.push(format!("STAAD SPACE {}", doc.name).trim_end().to_string());
    write_job_information(&mut out, options);
    out.push(format!("INPUT WIDTH {INPUT_WIDTH}"));
    out.push(format!(
        "UNIT {} {}",
        doc.units.length,
        doc.units.force.as_str()
    ));
    out.push(format!("SET {} UP", doc.up_axis.as_str()));

    write_joints(&mut out, doc);
    write_members(&mut out, doc);
    write_shells(&mut out, doc)?;
    write_user_tables(&mut out, doc);
    write_groups(&mut out, doc);
    write_element_properties(&mut out, doc);
    write_materials(&mut out, doc, factor);
    write_member_properties(&mut out, doc);
    write_constants(&mut out, doc);
    write_supports(&mut out, doc);
    write_offsets(&mut out, doc);
    write_load_cases(&mut out, doc, factor);
    write_repeat_combinations(&mut out, doc);
    write_combinations(&mut out, doc);
    out.push("PERFORM ANALYSIS".to_string());
    write_envelopes(&mut out, doc);
    out.push("FINISH".to_string());

    let mut text = out.join("\n");
    text.push('\n');
    Ok(text)
}

/// Plain decimal rendering: integral values lose the fraction, everything
/// else keeps the shortest representation that parses back exactly.
fn num(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn write_job_information(out: &mut Vec<String>, options: &StdEncoder) {
    if options.engineer.is_none() && options.date.is_none() && options.job_part.is_none() {
        return;
    }
    out.push("START JOB INFORMATION".to_string());
    if let Some(date) = &options.date {
        out.push(format!("ENGINEER DATE {date}"));
    }
    if let Some(engineer) = &options.engineer {
        out.push(format!("ENGINEER NAME {engineer}"));
    }
    if let Some(part) = &options.job_part {
        out.push(format!("JOB PART {part}"));
    }
    out.push("END JOB INFORMATION".to_string());
}

fn write_joints(out: &mut Vec<String>, doc: &StdDocument) {
    if doc.joints.is_empty() {
        return;
    }
    out.push("JOINT COORDINATES".to_string());
    let records: Vec<String> = doc
        .joints
        .iter()
        .map(|(id, c)| format!("{id} {:.3} {:.3} {:.3};", c.x, c.y, c.z))
        .collect();
    out.extend(pack_rows(&records, COLUMN_LIMIT));
}

fn write_members(out: &mut Vec<String>, doc: &StdDocument) {
    if doc.members.is_empty() {
        return;
    }
    out.push("MEMBER INCIDENCES".to_string());
    let records: Vec<String> = doc
        .members
        .iter()
        .map(|(id, m)| format!("{id} {} {};", m.start, m.end))
        .collect();
    out.extend(pack_rows(&records, COLUMN_LIMIT));
}

fn write_shells(out: &mut Vec<String>, doc: &StdDocument) -> Result<()> {
    if doc.shells.is_empty() {
        return Ok(());
    }
    out.push("ELEMENT INCIDENCES SHELL".to_string());
    let mut records = Vec::with_capacity(doc.shells.len());
    for (id, shell) in &doc.shells {
        if !shell.is_triangle() && !shell.is_quad() {
            return Err(CodecError::UnsupportedShape {
                element: *id,
                nodes: shell.nodes.len(),
            });
        }
        let nodes: Vec<String> = shell.nodes.iter().map(|n| n.to_string()).collect();
        records.push(format!("{id} {};", nodes.join(" ")));
    }
    out.extend(pack_rows(&records, COLUMN_LIMIT));
    Ok(())
}

fn write_user_tables(out: &mut Vec<String>, doc: &StdDocument) {
    let mut tables: Vec<u32> = doc
        .member_properties
        .iter()
        .filter_map(|p| match &p.profile {
            SectionProfile::UserTable(t) => Some(t.table),
            _ => None,
        })
        .collect();
    tables.sort_unstable();
    tables.dedup();
    if tables.is_empty() {
        return;
    }

    out.push("START USER TABLE".to_string());
    for table in tables {
        out.push(format!("TABLE {table}"));
        for property in &doc.member_properties {
            let SectionProfile::UserTable(section) = &property.profile else {
                continue;
            };
            if section.table != table {
                continue;
            }
            out.push("GENERAL".to_string());
            out.push(section.name.clone());
            let constants: Vec<String> =
                section.constants.as_array().iter().map(|v| num(*v)).collect();
            out.extend(wrap_line(&constants.join(" "), COLUMN_LIMIT));
            out.push("PROFILE_POINTS".to_string());
            let points: Vec<String> = section
                .polygon
                .iter()
                .flat_map(|p| [num(p[0]), num(p[1])])
                .collect();
            out.extend(wrap_line(&points.join(" "), COLUMN_LIMIT));
        }
    }
    out.push("END".to_string());
}

fn write_groups(out: &mut Vec<String>, doc: &StdDocument) {
    use staad_lite_model::{GroupKind, GroupMembers};
    if doc.groups.is_empty() {
        return;
    }
    out.push("START GROUP DEFINITION".to_string());
    for kind in [
        GroupKind::Joint,
        GroupKind::Member,
        GroupKind::Element,
        GroupKind::Floor,
        GroupKind::Geometry,
    ] {
        let mut entries: Vec<(String, u32)> = Vec::new();
        for group in doc.groups.iter().filter(|g| g.kind == kind) {
            let feature = format!("_{}", group.name);
            match &group.members {
                GroupMembers::Joints(ids) => {
                    entries.extend(ids.iter().map(|id| (feature.clone(), id.0)))
                }
                GroupMembers::Shapes(ids) => {
                    entries.extend(ids.iter().map(|id| (feature.clone(), id.0)))
                }
            }
        }
        if !entries.is_empty() {
            out.push(kind.as_str().to_string());
            out.extend(emit_grouped_clauses(
                entries,
                FeaturePosition::Leading,
                COLUMN_LIMIT,
            ));
        }
    }
    out.push("END GROUP DEFINITION".to_string());
}

fn write_element_properties(out: &mut Vec<String>, doc: &StdDocument) {
    if doc.element_properties.is_empty() {
        return;
    }
    out.push("ELEMENT PROPERTY".to_string());
    for property in &doc.element_properties {
        let thicknesses: Vec<String> = property.thicknesses.iter().map(|t| num(*t)).collect();
        let feature = format!("THICKNESS {}", thicknesses.join(" "));
        let ids: Vec<u32> = property.elements.iter().map(|e| e.0).collect();
        out.extend(wrap_clause(
            &feature,
            &compress_ids(&ids),
            FeaturePosition::Trailing,
            COLUMN_LIMIT,
        ));
    }
}

fn write_materials(out: &mut Vec<String>, doc: &StdDocument, factor: f64) {
    if doc.materials.is_empty() {
        return;
    }
    out.push("DEFINE MATERIAL START".to_string());
    for material in doc.materials.values() {
        out.push(format!("ISOTROPIC {}", material.name));
        if let Some(e) = material.youngs_modulus {
            out.push(format!("E {}", num(e / factor)));
        }
        if let Some(poisson) = material.poissons_ratio {
            out.push(format!("POISSON {}", num(poisson)));
        }
        if let Some(density) = material.mass_density {
            // Back to the file's weight density
            out.push(format!("DENSITY {}", num(density * GRAVITY / factor)));
        }
        if let Some(alpha) = material.thermal_coefficient {
            out.push(format!("ALPHA {}", num(alpha)));
        }
        if let Some(damp) = material.damping_ratio {
            out.push(format!("DAMP {}", num(damp)));
        }
        if let Some(g) = material.shear_modulus {
            out.push(format!("G {}", num(g / factor)));
        }
        if let Some(type_token) = &material.type_token {
            out.push(format!("TYPE {type_token}"));
        }
    }
    out.push("END DEFINE MATERIAL".to_string());
}

fn profile_clause(profile: &SectionProfile) -> String {
    match profile {
        SectionProfile::Catalog { name } => format!("TABLE ST {name}"),
        SectionProfile::Rectangle { depth, width } => {
            format!("PRIS YD {} ZD {}", num(*depth), num(*width))
        }
        SectionProfile::Tee {
            depth,
            flange_width,
            stem_depth,
            stem_width,
        } => format!(
            "PRIS YD {} ZD {} YB {} ZB {}",
            num(*depth),
            num(*flange_width),
            num(*stem_depth),
            num(*stem_width)
        ),
        SectionProfile::Trapezoid {
            depth,
            top_width,
            bottom_width,
        } => format!(
            "PRIS YD {} ZD {} ZB {}",
            num(*depth),
            num(*top_width),
            num(*bottom_width)
        ),
        SectionProfile::Circle { diameter } => format!("PRIS YD {}", num(*diameter)),
        SectionProfile::Pipe {
            outer_diameter,
            inner_diameter,
        } => format!(
            "TABLE ST PIPE OD {} ID {}",
            num(*outer_diameter),
            num(*inner_diameter)
        ),
        SectionProfile::RoundTaper {
            start_diameter,
            end_diameter,
            thickness,
        } => format!(
            "PRIS ROUND STA {} END {} THI {}",
            num(*start_diameter),
            num(*end_diameter),
            num(*thickness)
        ),
        SectionProfile::TaperedI { params } => {
            let values: Vec<String> = params.iter().map(|p| num(*p)).collect();
            format!("TAPERED {}", values.join(" "))
        }
        SectionProfile::UserTable(section) => {
            format!("UPTABLE {} {}", section.table, section.name)
        }
    }
}

fn write_member_properties(out: &mut Vec<String>, doc: &StdDocument) {
    if doc.member_properties.is_empty() {
        return;
    }
    out.push("MEMBER PROPERTY EUROPEAN".to_string());
    for property in &doc.member_properties {
        if property.members.is_empty() {
            continue;
        }
        let ids: Vec<u32> = property.members.iter().map(|m| m.0).collect();
        out.extend(wrap_clause(
            &profile_clause(&property.profile),
            &compress_ids(&ids),
            FeaturePosition::Trailing,
            COLUMN_LIMIT,
        ));
    }
}

fn write_constants(out: &mut Vec<String>, doc: &StdDocument) {
    if doc.beta_angles.is_empty() && doc.material_assignments.is_empty() {
        return;
    }
    out.push("CONSTANTS".to_string());

    let mut beta_entries: Vec<(String, u32)> = Vec::new();
    for (id, local_z) in &doc.beta_angles {
        let Some(member) = doc.members.get(id) else {
            log::warn!("Beta angle on unknown member {id} skipped");
            continue;
        };
        let Some(direction) = member.span().axis_direction() else {
            log::warn!(
                "Member {id} does not span a single global axis; beta angle skipped"
            );
            continue;
        };
        match beta_angle_for(direction, *local_z) {
            Some(angle) => beta_entries.push((format!("BETA {angle} MEMB"), id.0)),
            // The default orientation needs no clause
            None => {}
        }
    }
    out.extend(emit_grouped_clauses(
        beta_entries,
        FeaturePosition::Leading,
        COLUMN_LIMIT,
    ));

    let mut material_entries: Vec<(String, u32)> = Vec::new();
    for assignment in &doc.material_assignments {
        match &assignment.target {
            AssignmentTarget::All => {
                out.push(format!("MATERIAL {} ALL", assignment.material));
            }
            AssignmentTarget::Shapes(ids) => material_entries.extend(
                ids.iter()
                    .map(|id| (format!("MATERIAL {} MEMB", assignment.material), id.0)),
            ),
        }
    }
    out.extend(emit_grouped_clauses(
        material_entries,
        FeaturePosition::Leading,
        COLUMN_LIMIT,
    ));
}

fn restraint_clause(set: &RestraintSet) -> String {
    let mut parts = vec!["FIXED BUT".to_string()];
    let axes = [
        ("FX", set.fx),
        ("FY", set.fy),
        ("FZ", set.fz),
        ("MX", set.mx),
        ("MY", set.my),
        ("MZ", set.mz),
    ];
    for (axis, restraint) in axes {
        match restraint {
            Some(Restraint::Released) => parts.push(axis.to_string()),
            Some(Restraint::Spring(stiffness)) => {
                parts.push(format!("K{axis} {}", num(stiffness)))
            }
            None => {}
        }
    }
    parts.join(" ")
}

fn write_supports(out: &mut Vec<String>, doc: &StdDocument) {
    if doc.supports.is_empty() {
        return;
    }
    out.push("SUPPORTS".to_string());
    for support in &doc.supports {
        let feature = match &support.kind {
            SupportKind::Fixed => "FIXED".to_string(),
            SupportKind::Pinned => "PINNED".to_string(),
            SupportKind::FixedBut(set) => restraint_clause(set),
        };
        let ids: Vec<u32> = support.joints.iter().map(|j| j.0).collect();
        out.extend(wrap_clause(
            &feature,
            &compress_ids(&ids),
            FeaturePosition::Trailing,
            COLUMN_LIMIT,
        ));
    }
}

fn write_offsets(out: &mut Vec<String>, doc: &StdDocument) {
    if doc.offsets.is_empty() {
        return;
    }
    out.push("MEMBER OFFSET".to_string());
    let mut entries: Vec<(String, u32)> = Vec::new();
    for (id, offset) in &doc.offsets {
        if let Some(v) = offset.start {
            entries.push((
                format!("START {} {} {}", num(v.x), num(v.y), num(v.z)),
                id.0,
            ));
        }
        if let Some(v) = offset.end {
            entries.push((format!("END {} {} {}", num(v.x), num(v.y), num(v.z)), id.0));
        }
    }
    out.extend(emit_grouped_clauses(
        entries,
        FeaturePosition::Trailing,
        COLUMN_LIMIT,
    ));
}

/// Component pairs of a joint-load or support-displacement record, back in
/// file units (and degrees for prescribed rotations).
fn components_clause(c: &ForceComponents, factor: f64, displacement: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    let slots = [
        ("FX", c.fx, false),
        ("FY", c.fy, false),
        ("FZ", c.fz, false),
        ("MX", c.mx, true),
        ("MY", c.my, true),
        ("MZ", c.mz, true),
    ];
    for (key, value, rotation) in slots {
        if let Some(mut value) = value {
            value /= factor;
            if displacement && rotation {
                value *= 180.0 / PI;
            }
            parts.push(format!("{key} {}", num(value)));
        }
    }
    parts.join(" ")
}

fn member_load_clause(kind: &MemberLoadKind, direction: &str, factor: f64) -> String {
    fn offsets(d1: &Option<f64>, d2: &Option<f64>, d3: &Option<f64>) -> String {
        let mut text = String::new();
        for d in [d1, d2, d3].into_iter().flatten() {
            text.push(' ');
            text.push_str(&num(*d));
        }
        text
    }
    match kind {
        MemberLoadKind::Uniform { force, d1, d2, d3 } => {
            format!("UNI {direction} {}{}", num(force / factor), offsets(d1, d2, d3))
        }
        MemberLoadKind::UniformMoment { moment, d1, d2, d3 } => {
            format!("UMOM {direction} {}{}", num(moment / factor), offsets(d1, d2, d3))
        }
        MemberLoadKind::Concentrated { force, d1, d2, d3 } => {
            format!("CON {direction} {}{}", num(force / factor), offsets(d1, d2, d3))
        }
        MemberLoadKind::Linear { w1, w2 } => {
            format!("LIN {direction} {} {}", num(w1 / factor), num(w2 / factor))
        }
        MemberLoadKind::Trapezoidal { w1, w2, d1, d2 } => format!(
            "TRAP {direction} {} {} {} {}",
            num(w1 / factor),
            num(w2 / factor),
            num(*d1),
            num(*d2)
        ),
    }
}

fn write_load_cases(out: &mut Vec<String>, doc: &StdDocument, factor: f64) {
    for (id, case) in &doc.load_cases {
        out.push(format!(
            "LOAD {id} LOADTYPE {} TITLE {}",
            case.category, case.name
        ));
        let mut block: Option<&'static str> = None;
        for item in &case.items {
            match item {
                LoadItem::SelfWeight {
                    direction,
                    factor: weight_factor,
                    target,
                } => {
                    block = None;
                    let mut line =
                        format!("SELFWEIGHT {} {}", direction.as_str(), num(*weight_factor));
                    if let SelfWeightTarget::Shapes(ids) = target {
                        let ids: Vec<u32> = ids.iter().map(|s| s.0).collect();
                        line.push_str(&format!(" LIST {}", compress_ids(&ids)));
                    }
                    out.extend(wrap_line(&line, COLUMN_LIMIT));
                }
                LoadItem::JointLoad { components, joints } => {
                    if block != Some("JOINT LOAD") {
                        out.push("JOINT LOAD".to_string());
                        block = Some("JOINT LOAD");
                    }
                    let ids: Vec<u32> = joints.iter().map(|j| j.0).collect();
                    out.extend(wrap_clause(
                        &components_clause(components, factor, false),
                        &compress_ids(&ids),
                        FeaturePosition::Trailing,
                        COLUMN_LIMIT,
                    ));
                }
                LoadItem::SupportDisplacement { components, joints } => {
                    if block != Some("SUPPORT DISPLACEMENT LOAD") {
                        out.push("SUPPORT DISPLACEMENT LOAD".to_string());
                        block = Some("SUPPORT DISPLACEMENT LOAD");
                    }
                    let ids: Vec<u32> = joints.iter().map(|j| j.0).collect();
                    out.extend(wrap_clause(
                        &components_clause(components, factor, true),
                        &compress_ids(&ids),
                        FeaturePosition::Trailing,
                        COLUMN_LIMIT,
                    ));
                }
                LoadItem::MemberLoad {
                    kind,
                    direction,
                    members,
                } => {
                    if block != Some("MEMBER LOAD") {
                        out.push("MEMBER LOAD".to_string());
                        block = Some("MEMBER LOAD");
                    }
                    let clause = member_load_clause(kind, direction.as_str(), factor);
                    let ids: Vec<u32> = members.iter().map(|m| m.0).collect();
                    out.extend(wrap_clause(
                        &clause,
                        &compress_ids(&ids),
                        FeaturePosition::Trailing,
                        COLUMN_LIMIT,
                    ));
                }
                LoadItem::ElementLoad {
                    kind,
                    direction,
                    elements,
                } => {
                    if block != Some("ELEMENT LOAD") {
                        out.push("ELEMENT LOAD".to_string());
                        block = Some("ELEMENT LOAD");
                    }
                    let clause = match kind {
                        ElementLoadKind::Pressure { force } => {
                            format!("PR {} {}", direction.as_str(), num(force / factor))
                        }
                        ElementLoadKind::Concentrated { force, x, y } => format!(
                            "PR {} {} {} {}",
                            direction.as_str(),
                            num(force / factor),
                            num(*x),
                            num(*y)
                        ),
                    };
                    let ids: Vec<u32> = elements.iter().map(|e| e.0).collect();
                    out.extend(wrap_clause(
                        &clause,
                        &compress_ids(&ids),
                        FeaturePosition::Trailing,
                        COLUMN_LIMIT,
                    ));
                }
                LoadItem::Repeat { factors } => {
                    block = None;
                    out.push("REPEAT LOAD".to_string());
                    let pairs: Vec<String> = factors
                        .iter()
                        .map(|(case_id, f)| format!("{case_id} {}", num(*f)))
                        .collect();
                    out.extend(wrap_line(&pairs.join(" "), COLUMN_LIMIT));
                }
            }
        }
    }
}

fn write_repeat_combinations(out: &mut Vec<String>, doc: &StdDocument) {
    for (id, combination) in doc.combinations.iter().filter(|(_, c)| c.non_linear) {
        out.push(format!("LOAD {} LOADTYPE Live TITLE {}", id.0, combination.name));
        out.push("REPEAT LOAD".to_string());
        let pairs: Vec<String> = combination
            .factors
            .iter()
            .map(|(case_id, f)| format!("{case_id} {}", num(*f)))
            .collect();
        out.extend(wrap_line(&pairs.join(" "), COLUMN_LIMIT));
    }
}

fn write_combinations(out: &mut Vec<String>, doc: &StdDocument) {
    for (id, combination) in doc.combinations.iter().filter(|(_, c)| !c.non_linear) {
        out.push(format!("LOAD COMB {} {}", id.0, combination.name));
        let pairs: Vec<String> = combination
            .factors
            .iter()
            .map(|(case_id, f)| format!("{case_id} {}", num(*f)))
            .collect();
        out.extend(wrap_line(&pairs.join(" "), COLUMN_LIMIT));
    }
}

fn write_envelopes(out: &mut Vec<String>, doc: &StdDocument) {
    if doc.envelopes.is_empty() {
        return;
    }
    out.push("DEFINE ENVELOPE".to_string());
    let mut entries: Vec<(String, u32)> = Vec::new();
    for (id, envelope) in &doc.envelopes {
        let mut feature = format!("ENVELOPE {}", id.0);
        if let Some(kind) = &envelope.kind {
            feature.push_str(&format!(" TYPE {kind}"));
        }
        entries.extend(envelope.combinations.iter().map(|c| (feature.clone(), c.0)));
    }
    out.extend(emit_grouped_clauses(
        entries,
        FeaturePosition::Trailing,
        COLUMN_LIMIT,
    ));
    out.push("END DEFINE ENVELOPE".to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_number_rendering() {
        assert_eq!(num(2.0), "2");
        assert_eq!(num(-1.0), "-1");
        assert_eq!(num(0.3), "0.3");
        assert_eq!(num(-5000.0), "-5000");
        assert_eq!(num(1.2e-5), "0.000012");
    }

    #[test]
    fn restraint_clause_orders_axes() {
        let set = RestraintSet {
            fy: Some(Restraint::Spring(5000.0)),
            mx: Some(Restraint::Released),
            mz: Some(Restraint::Released),
            ..Default::default()
        };
        assert_eq!(restraint_clause(&set), "FIXED BUT KFY 5000 MX MZ");
    }
}
