// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extractors for member section profiles and shell thickness records
//!
//! Member property rows are `<ids> <clause>` where the clause shape is
//! picked by token pattern, most specific first. `START USER TABLE` blocks
//! define arbitrary polygon sections that later `UPTABLE` rows must resolve
//! against; an unresolved reference aborts the decode.

use crate::cursor::{require_f64, require_u32, starts_numeric, starts_with_number, LineCursor};
use crate::ranges::expand_ids;
use staad_lite_model::{
    normalize_profile_name, CodecError, ElementProperty, MemberProperty, Result, SectionConstants,
    SectionProfile, ShapeId, StdDocument, UserTableSection,
};

const MEMBER_SECTION: &str = "MEMBER PROPERTY";
const ELEMENT_SECTION: &str = "ELEMENT PROPERTY";
const TABLE_SECTION: &str = "USER TABLE";

/// Read `<ids> <clause>` rows of a `MEMBER PROPERTY` section.
pub fn read_member_properties(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    while let Some(line) = cur.take_if(starts_numeric) {
        let toks: Vec<&str> = line.split_whitespace().collect();
        let (ids, clause) = split_ids(&toks);
        let members: Vec<ShapeId> = expand_ids(ids.iter().copied())
            .ok_or_else(|| CodecError::malformed(MEMBER_SECTION, line))?
            .into_iter()
            .map(ShapeId)
            .collect();

        if clause.first() == Some(&"UPTABLE") {
            resolve_user_table(doc, clause, members, line)?;
            continue;
        }
        let profile = parse_profile_clause(clause, line)?;
        doc.member_properties.push(MemberProperty { profile, members });
    }
    Ok(())
}

/// Split a row into its leading id tokens (ids and `TO`) and the clause.
fn split_ids<'a>(toks: &'a [&'a str]) -> (&'a [&'a str], &'a [&'a str]) {
    let end = toks
        .iter()
        .position(|t| *t != "TO" && !t.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .unwrap_or(toks.len());
    (&toks[..end], &toks[end..])
}

/// Match an `UPTABLE <table> <name>` reference against a previously decoded
/// user-table definition.
fn resolve_user_table(
    doc: &mut StdDocument,
    clause: &[&str],
    members: Vec<ShapeId>,
    line: &str,
) -> Result<()> {
    let table = require_u32(
        clause.get(1).copied().unwrap_or_default(),
        MEMBER_SECTION,
        line,
    )?;
    let name = clause.get(2..).unwrap_or_default().join(" ");
    if name.is_empty() {
        return Err(CodecError::malformed(MEMBER_SECTION, line));
    }
    let entry = doc.member_properties.iter_mut().find(|p| {
        matches!(&p.profile, SectionProfile::UserTable(t) if t.table == table && t.name == name)
    });
    match entry {
        Some(property) => {
            property.members.extend(members);
            Ok(())
        }
        None => Err(CodecError::UnresolvedUserTable {
            table,
            profile: name,
        }),
    }
}

/// Decode one property clause into a profile, most specific pattern first.
fn parse_profile_clause(clause: &[&str], line: &str) -> Result<SectionProfile> {
    match clause {
        ["PRIS", "ROUND", rest @ ..] => {
            let values = keyword_values(rest, &["STA", "END", "THI"], line)?;
            Ok(SectionProfile::RoundTaper {
                start_diameter: values[0],
                end_diameter: values[1],
                thickness: values[2],
            })
        }
        ["PRIS", rest @ ..] => parse_prismatic(rest, line),
        ["TAPERED", rest @ ..] => {
            if rest.len() != 7 {
                return Err(CodecError::malformed(MEMBER_SECTION, line));
            }
            let mut params = [0.0; 7];
            for (slot, tok) in params.iter_mut().zip(rest) {
                *slot = require_f64(tok, MEMBER_SECTION, line)?;
            }
            Ok(SectionProfile::TaperedI { params })
        }
        ["TABLE", "ST", "PIPE", rest @ ..] if rest.contains(&"OD") && rest.contains(&"ID") => {
            let values = keyword_values(rest, &["OD", "ID"], line)?;
            Ok(SectionProfile::Pipe {
                outer_diameter: values[0],
                inner_diameter: values[1],
            })
        }
        ["TABLE", "ST", name, ..] => Ok(SectionProfile::Catalog {
            name: normalize_profile_name(name),
        }),
        _ => Err(CodecError::malformed(MEMBER_SECTION, line)),
    }
}

/// Dispatch `PRIS` key sets by specificity: YD+ZD+YB+ZB, then YD+ZD+ZB,
/// then YD+ZD, then YD alone.
fn parse_prismatic(rest: &[&str], line: &str) -> Result<SectionProfile> {
    let mut yd = None;
    let mut zd = None;
    let mut yb = None;
    let mut zb = None;
    let mut i = 0;
    while i + 1 < rest.len() {
        let value = require_f64(rest[i + 1], MEMBER_SECTION, line)?;
        match rest[i] {
            "YD" => yd = Some(value),
            "ZD" => zd = Some(value),
            "YB" => yb = Some(value),
            "ZB" => zb = Some(value),
            _ => return Err(CodecError::malformed(MEMBER_SECTION, line)),
        }
        i += 2;
    }
    match (yd, zd, yb, zb) {
        (Some(depth), Some(flange_width), Some(stem_depth), Some(stem_width)) => {
            Ok(SectionProfile::Tee {
                depth,
                flange_width,
                stem_depth,
                stem_width,
            })
        }
        (Some(depth), Some(top_width), None, Some(bottom_width)) => Ok(SectionProfile::Trapezoid {
            depth,
            top_width,
            bottom_width,
        }),
        (Some(depth), Some(width), None, None) => Ok(SectionProfile::Rectangle { depth, width }),
        (Some(diameter), None, None, None) => Ok(SectionProfile::Circle { diameter }),
        _ => Err(CodecError::malformed(MEMBER_SECTION, line)),
    }
}

/// Collect `<key> <value>` pairs in the given key order.
fn keyword_values(rest: &[&str], keys: &[&str], line: &str) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(keys.len());
    for key in keys {
        let at = rest
            .iter()
            .position(|t| t == key)
            .ok_or_else(|| CodecError::malformed(MEMBER_SECTION, line))?;
        let tok = rest
            .get(at + 1)
            .ok_or_else(|| CodecError::malformed(MEMBER_SECTION, line))?;
        out.push(require_f64(tok, MEMBER_SECTION, line)?);
    }
    Ok(out)
}

/// Read a `START USER TABLE` block up to its `END` marker.
pub fn read_user_table(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    let mut table = 1u32;
    while let Some(line) = cur.peek() {
        if line == "END" {
            cur.advance();
            break;
        }
        if let Some(rest) = line.strip_prefix("TABLE ") {
            table = require_u32(rest.trim(), TABLE_SECTION, line)?;
            cur.advance();
        } else if line.starts_with("UNIT") {
            cur.advance();
        } else if line == "GENERAL" {
            cur.advance();
            read_general_section(cur, doc, table)?;
        } else {
            cur.advance();
        }
    }
    Ok(())
}

/// One `GENERAL` entry: name, 16 section constants, then `PROFILE_POINTS`
/// and the polygon point pairs.
fn read_general_section(cur: &mut LineCursor, doc: &mut StdDocument, table: u32) -> Result<()> {
    let name = cur
        .next_line()
        .ok_or_else(|| CodecError::malformed(TABLE_SECTION, "GENERAL"))?
        .to_string();

    let mut values: Vec<f64> = Vec::new();
    while let Some(line) = cur.peek() {
        if line == "PROFILE_POINTS" {
            break;
        }
        for tok in line.split_whitespace() {
            values.push(require_f64(tok, TABLE_SECTION, line)?);
        }
        cur.advance();
    }
    if cur.take_if(|l| l == "PROFILE_POINTS").is_none() || values.len() != 16 {
        return Err(CodecError::malformed(TABLE_SECTION, &name));
    }
    let mut constants = [0.0; 16];
    constants.copy_from_slice(&values);

    let mut points: Vec<f64> = Vec::new();
    while let Some(line) = cur.take_if(starts_with_number) {
        for tok in line.split_whitespace() {
            points.push(require_f64(tok, TABLE_SECTION, line)?);
        }
    }
    if points.is_empty() || points.len() % 2 != 0 {
        return Err(CodecError::malformed(TABLE_SECTION, &name));
    }
    let polygon = points.chunks(2).map(|p| [p[0], p[1]]).collect();

    doc.member_properties.push(MemberProperty {
        profile: SectionProfile::UserTable(UserTableSection {
            table,
            name,
            constants: SectionConstants::from_array(constants),
            polygon,
        }),
        members: Vec::new(),
    });
    Ok(())
}

/// Read `<ids> THICKNESS <t1..t4>` rows of an `ELEMENT PROPERTY` section.
pub fn read_element_properties(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    while let Some(line) = cur.take_if(starts_numeric) {
        let toks: Vec<&str> = line.split_whitespace().collect();
        let at = toks
            .iter()
            .position(|t| *t == "THICKNESS")
            .ok_or_else(|| CodecError::malformed(ELEMENT_SECTION, line))?;
        let elements: Vec<ShapeId> = expand_ids(toks[..at].iter().copied())
            .ok_or_else(|| CodecError::malformed(ELEMENT_SECTION, line))?
            .into_iter()
            .map(ShapeId)
            .collect();
        let values = &toks[at + 1..];
        if values.is_empty() || values.len() > 4 {
            return Err(CodecError::malformed(ELEMENT_SECTION, line));
        }
        let mut thicknesses = Vec::with_capacity(values.len());
        for tok in values {
            thicknesses.push(require_f64(tok, ELEMENT_SECTION, line)?);
        }
        doc.element_properties.push(ElementProperty {
            thicknesses,
            elements,
        });
    }
    Ok(())
}
