// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extractors for primary load cases, combinations and envelopes
//!
//! A case starts at a `LOAD <n>` header and owns every item block that
//! follows it. Item record lines pick their sub-parser from the first
//! keyword; member/element sub-kinds pair a shape keyword with a direction
//! code drawn from a fixed priority list, first match wins.

use crate::cursor::{first_token, require_f64, require_u32, starts_numeric, LineCursor};
use crate::ranges::expand_ids;
use staad_lite_model::{
    Axis, CodecError, CombinationId, Envelope, EnvelopeId, ForceComponents, JointId, LoadCase,
    LoadCaseId, LoadCombination, LoadDirection, LoadItem, ElementLoadKind, MemberLoadKind, Result,
    SelfWeightTarget, ShapeId, StdDocument,
};
use std::collections::BTreeMap;
use std::f64::consts::PI;

const CASE_SECTION: &str = "LOAD";
const COMB_SECTION: &str = "LOAD COMB";
const ENVELOPE_SECTION: &str = "DEFINE ENVELOPE";

/// Direction priority for member load records
const MEMBER_DIRECTIONS: [LoadDirection; 9] = [
    LoadDirection::GX,
    LoadDirection::GY,
    LoadDirection::GZ,
    LoadDirection::PX,
    LoadDirection::PY,
    LoadDirection::PZ,
    LoadDirection::X,
    LoadDirection::Y,
    LoadDirection::Z,
];

/// Direction priority for linearly varying loads (member-local only)
const LINEAR_DIRECTIONS: [LoadDirection; 3] =
    [LoadDirection::X, LoadDirection::Y, LoadDirection::Z];

/// Direction priority for element load records
const ELEMENT_DIRECTIONS: [LoadDirection; 6] = [
    LoadDirection::GX,
    LoadDirection::GY,
    LoadDirection::GZ,
    LoadDirection::LX,
    LoadDirection::LY,
    LoadDirection::LZ,
];

/// `LOAD <n> ...` primary case header (but not `LOAD COMB`)
pub fn is_case_header(line: &str) -> bool {
    let mut toks = line.split_whitespace();
    toks.next() == Some("LOAD")
        && toks
            .next()
            .is_some_and(|t| t.parse::<u32>().is_ok())
}

/// `LOAD COMB <n> ...` combination header
pub fn is_combination_header(line: &str) -> bool {
    line.starts_with("LOAD COMB ")
}

/// Read one primary load case: header plus all item blocks that follow.
pub fn read_load_case(cur: &mut LineCursor, doc: &mut StdDocument, factor: f64) -> Result<()> {
    let Some(header) = cur.next_line() else {
        return Ok(());
    };
    let (id, case) = parse_case_header(header)?;
    let mut case = case;

    while let Some(line) = cur.peek() {
        if first_token(line) == "SELFWEIGHT" {
            read_selfweight_rows(cur, &mut case)?;
        } else if line == "JOINT LOAD" {
            cur.advance();
            read_node_load_rows(cur, &mut case, factor, false)?;
        } else if line == "SUPPORT DISPLACEMENT LOAD" {
            cur.advance();
            read_node_load_rows(cur, &mut case, factor, true)?;
        } else if line == "MEMBER LOAD" {
            cur.advance();
            read_member_load_rows(cur, &mut case, factor)?;
        } else if line == "ELEMENT LOAD" {
            cur.advance();
            read_element_load_rows(cur, &mut case, factor)?;
        } else if line == "REPEAT LOAD" {
            cur.advance();
            read_repeat_row(cur, &mut case)?;
        } else {
            break;
        }
    }
    doc.load_cases.insert(LoadCaseId(id), case);
    Ok(())
}

/// Pull id, `LOADTYPE` category and name out of a case header line.
fn parse_case_header(header: &str) -> Result<(u32, LoadCase)> {
    let toks: Vec<&str> = header.split_whitespace().collect();
    let id = require_u32(
        toks.get(1).copied().unwrap_or_default(),
        CASE_SECTION,
        header,
    )?;
    let loadtype_at = toks.iter().position(|t| *t == "LOADTYPE");
    let category = loadtype_at
        .and_then(|i| toks.get(i + 1))
        .map(|t| (*t).to_string())
        .unwrap_or_else(|| "Live".to_string());

    let name = if let Some((_, rest)) = header.split_once("TITLE LOAD CASE ") {
        format!("LOAD CASE {}", first_token(rest))
    } else if let Some((_, rest)) = header.split_once("TITLE ") {
        rest.trim().to_string()
    } else {
        // Inline name: everything after the id, minus the LOADTYPE pair
        let mut parts: Vec<&str> = Vec::new();
        let mut skip_next = false;
        for tok in toks.iter().skip(2) {
            if skip_next {
                skip_next = false;
                continue;
            }
            if *tok == "LOADTYPE" {
                skip_next = true;
                continue;
            }
            parts.push(tok);
        }
        parts.join(" ")
    };
    let name = if name.is_empty() {
        format!("LOAD CASE {id}")
    } else {
        name
    };

    let mut case = LoadCase::new(name);
    case.category = category;
    Ok((id, case))
}

/// Consecutive `SELFWEIGHT <axis> <factor> [LIST <ids>]` rows
fn read_selfweight_rows(cur: &mut LineCursor, case: &mut LoadCase) -> Result<()> {
    while let Some(line) = cur.take_if(|l| first_token(l) == "SELFWEIGHT") {
        let toks: Vec<&str> = line.split_whitespace().collect();
        let direction = toks
            .get(1)
            .and_then(|t| Axis::parse(t))
            .ok_or_else(|| CodecError::malformed(CASE_SECTION, line))?;
        let factor = require_f64(
            toks.get(2).copied().unwrap_or_default(),
            CASE_SECTION,
            line,
        )?;
        let target = match toks.iter().position(|t| *t == "LIST") {
            Some(at) => SelfWeightTarget::Shapes(
                expand_ids(toks[at + 1..].iter().copied())
                    .ok_or_else(|| CodecError::malformed(CASE_SECTION, line))?
                    .into_iter()
                    .map(ShapeId)
                    .collect(),
            ),
            None => SelfWeightTarget::All,
        };
        case.items.push(LoadItem::SelfWeight {
            direction,
            factor,
            target,
        });
    }
    Ok(())
}

/// `<ids> FX <v> [FY <v> ..]` rows of a joint-load or support-displacement
/// block. Displacement rotations arrive in degrees and become radians.
fn read_node_load_rows(
    cur: &mut LineCursor,
    case: &mut LoadCase,
    factor: f64,
    displacement: bool,
) -> Result<()> {
    const COMPONENTS: [&str; 6] = ["FX", "FY", "FZ", "MX", "MY", "MZ"];
    while let Some(line) = cur.take_if(starts_numeric) {
        let toks: Vec<&str> = line.split_whitespace().collect();
        let first_at = toks
            .iter()
            .position(|t| COMPONENTS.contains(t))
            .ok_or_else(|| CodecError::malformed(CASE_SECTION, line))?;
        let joints: Vec<JointId> = expand_ids(toks[..first_at].iter().copied())
            .ok_or_else(|| CodecError::malformed(CASE_SECTION, line))?
            .into_iter()
            .map(JointId)
            .collect();

        let mut components = ForceComponents::default();
        let mut i = first_at;
        while i < toks.len() {
            let key = toks[i];
            let value_tok = toks
                .get(i + 1)
                .ok_or_else(|| CodecError::malformed(CASE_SECTION, line))?;
            let mut value = require_f64(value_tok, CASE_SECTION, line)? * factor;
            let rotation = key.starts_with('M');
            if displacement && rotation {
                value *= PI / 180.0;
            }
            match key {
                "FX" => components.fx = Some(value),
                "FY" => components.fy = Some(value),
                "FZ" => components.fz = Some(value),
                "MX" => components.mx = Some(value),
                "MY" => components.my = Some(value),
                "MZ" => components.mz = Some(value),
                _ => return Err(CodecError::malformed(CASE_SECTION, line)),
            }
            i += 2;
        }
        let item = if displacement {
            LoadItem::SupportDisplacement { components, joints }
        } else {
            LoadItem::JointLoad { components, joints }
        };
        case.items.push(item);
    }
    Ok(())
}

/// `<ids> UNI|UMOM|CON|LIN|TRAP <dir> <values>` rows
fn read_member_load_rows(cur: &mut LineCursor, case: &mut LoadCase, factor: f64) -> Result<()> {
    const KEYWORDS: [&str; 5] = ["UNI", "UMOM", "CON", "LIN", "TRAP"];
    while let Some(line) = cur.take_if(starts_numeric) {
        let toks: Vec<&str> = line.split_whitespace().collect();
        let kw_at = toks
            .iter()
            .position(|t| KEYWORDS.contains(t))
            .ok_or_else(|| CodecError::malformed(CASE_SECTION, line))?;
        let members: Vec<ShapeId> = expand_ids(toks[..kw_at].iter().copied())
            .ok_or_else(|| CodecError::malformed(CASE_SECTION, line))?
            .into_iter()
            .map(ShapeId)
            .collect();
        let keyword = toks[kw_at];
        let rest = &toks[kw_at + 1..];
        let priority: &[LoadDirection] = if keyword == "LIN" {
            &LINEAR_DIRECTIONS
        } else {
            &MEMBER_DIRECTIONS
        };
        let (direction, values) = select_direction(rest, priority, line)?;

        let kind = match keyword {
            "UNI" => {
                let (magnitude, d) = magnitude_and_offsets(values, factor, line)?;
                MemberLoadKind::Uniform {
                    force: magnitude,
                    d1: d[0],
                    d2: d[1],
                    d3: d[2],
                }
            }
            "UMOM" => {
                let (magnitude, d) = magnitude_and_offsets(values, factor, line)?;
                MemberLoadKind::UniformMoment {
                    moment: magnitude,
                    d1: d[0],
                    d2: d[1],
                    d3: d[2],
                }
            }
            "CON" => {
                let (magnitude, d) = magnitude_and_offsets(values, factor, line)?;
                MemberLoadKind::Concentrated {
                    force: magnitude,
                    d1: d[0],
                    d2: d[1],
                    d3: d[2],
                }
            }
            "LIN" => {
                if values.len() != 2 {
                    return Err(CodecError::malformed(CASE_SECTION, line));
                }
                MemberLoadKind::Linear {
                    w1: require_f64(values[0], CASE_SECTION, line)? * factor,
                    w2: require_f64(values[1], CASE_SECTION, line)? * factor,
                }
            }
            _ => {
                if values.len() != 4 {
                    return Err(CodecError::malformed(CASE_SECTION, line));
                }
                MemberLoadKind::Trapezoidal {
                    w1: require_f64(values[0], CASE_SECTION, line)? * factor,
                    w2: require_f64(values[1], CASE_SECTION, line)? * factor,
                    // Span positions are lengths; the force factor leaves them alone
                    d1: require_f64(values[2], CASE_SECTION, line)?,
                    d2: require_f64(values[3], CASE_SECTION, line)?,
                }
            }
        };
        case.items.push(LoadItem::MemberLoad {
            kind,
            direction,
            members,
        });
    }
    Ok(())
}

/// `<ids> PR <dir> <p> [<x> <y>]` rows
fn read_element_load_rows(cur: &mut LineCursor, case: &mut LoadCase, factor: f64) -> Result<()> {
    while let Some(line) = cur.take_if(starts_numeric) {
        let toks: Vec<&str> = line.split_whitespace().collect();
        let kw_at = toks
            .iter()
            .position(|t| *t == "PR")
            .ok_or_else(|| CodecError::malformed(CASE_SECTION, line))?;
        let elements: Vec<ShapeId> = expand_ids(toks[..kw_at].iter().copied())
            .ok_or_else(|| CodecError::malformed(CASE_SECTION, line))?
            .into_iter()
            .map(ShapeId)
            .collect();
        let (direction, values) = select_direction(&toks[kw_at + 1..], &ELEMENT_DIRECTIONS, line)?;
        let force = require_f64(
            values.first().copied().unwrap_or_default(),
            CASE_SECTION,
            line,
        )? * factor;
        let kind = if values.len() == 3 {
            ElementLoadKind::Concentrated {
                force,
                x: require_f64(values[1], CASE_SECTION, line)?,
                y: require_f64(values[2], CASE_SECTION, line)?,
            }
        } else {
            ElementLoadKind::Pressure { force }
        };
        case.items.push(LoadItem::ElementLoad {
            kind,
            direction,
            elements,
        });
    }
    Ok(())
}

/// One `<case> <factor> ..` row following a `REPEAT LOAD` marker
fn read_repeat_row(cur: &mut LineCursor, case: &mut LoadCase) -> Result<()> {
    let line = cur
        .take_if(starts_numeric)
        .ok_or_else(|| CodecError::malformed(CASE_SECTION, "REPEAT LOAD"))?;
    let factors = factor_pairs(line)?;
    case.items.push(LoadItem::Repeat { factors });
    Ok(())
}

/// Match the first direction code from the priority list present in the
/// tokens, returning it and the value tokens that follow it.
fn select_direction<'a>(
    rest: &'a [&'a str],
    priority: &[LoadDirection],
    line: &str,
) -> Result<(LoadDirection, &'a [&'a str])> {
    for direction in priority {
        if let Some(at) = rest.iter().position(|t| *t == direction.as_str()) {
            return Ok((*direction, &rest[at + 1..]));
        }
    }
    Err(CodecError::malformed(CASE_SECTION, line))
}

/// Leading magnitude (force-scaled) plus up to three positional offsets
fn magnitude_and_offsets(
    values: &[&str],
    factor: f64,
    line: &str,
) -> Result<(f64, [Option<f64>; 3])> {
    if values.is_empty() || values.len() > 4 {
        return Err(CodecError::malformed(CASE_SECTION, line));
    }
    let magnitude = require_f64(values[0], CASE_SECTION, line)? * factor;
    let mut d = [None; 3];
    for (slot, tok) in d.iter_mut().zip(&values[1..]) {
        *slot = Some(require_f64(tok, CASE_SECTION, line)?);
    }
    Ok((magnitude, d))
}

/// Alternating `<id> <factor>` tokens of a combination or repeat row
fn factor_pairs(line: &str) -> Result<BTreeMap<LoadCaseId, f64>> {
    let toks: Vec<&str> = line.split_whitespace().collect();
    if toks.len() % 2 != 0 {
        return Err(CodecError::malformed(COMB_SECTION, line));
    }
    let mut factors = BTreeMap::new();
    for pair in toks.chunks(2) {
        let id = require_u32(pair[0], COMB_SECTION, line)?;
        let factor = require_f64(pair[1], COMB_SECTION, line)?;
        factors.insert(LoadCaseId(id), factor);
    }
    Ok(factors)
}

/// `LOAD COMB <id> <name>` header plus its factor row.
pub fn read_combination(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    let Some(header) = cur.next_line() else {
        return Ok(());
    };
    let toks: Vec<&str> = header.split_whitespace().collect();
    let id = require_u32(
        toks.get(2).copied().unwrap_or_default(),
        COMB_SECTION,
        header,
    )?;
    let name = toks.get(3..).unwrap_or_default().join(" ");
    let factor_line = cur
        .take_if(starts_numeric)
        .ok_or_else(|| CodecError::malformed(COMB_SECTION, header))?;
    doc.combinations.insert(
        CombinationId(id),
        LoadCombination {
            name,
            factors: factor_pairs(factor_line)?,
            category: None,
            non_linear: false,
        },
    );
    Ok(())
}

/// `DEFINE ENVELOPE` block: `<combos> ENVELOPE <id> [TYPE <tag>]` rows.
pub fn read_envelopes(cur: &mut LineCursor, doc: &mut StdDocument) -> Result<()> {
    while let Some(line) = cur.peek() {
        if line == "END DEFINE ENVELOPE" {
            cur.advance();
            break;
        }
        let toks: Vec<&str> = line.split_whitespace().collect();
        let at = toks
            .iter()
            .position(|t| *t == "ENVELOPE")
            .ok_or_else(|| CodecError::malformed(ENVELOPE_SECTION, line))?;
        let combinations: Vec<CombinationId> = expand_ids(toks[..at].iter().copied())
            .ok_or_else(|| CodecError::malformed(ENVELOPE_SECTION, line))?
            .into_iter()
            .map(CombinationId)
            .collect();
        let id = require_u32(
            toks.get(at + 1).copied().unwrap_or_default(),
            ENVELOPE_SECTION,
            line,
        )?;
        let kind = toks
            .iter()
            .position(|t| *t == "TYPE")
            .and_then(|i| toks.get(i + 1))
            .map(|t| (*t).to_string());
        doc.envelopes.insert(
            EnvelopeId(id),
            Envelope { kind, combinations },
        );
        cur.advance();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_case(src: &[&str], factor: f64) -> StdDocument {
        let lines: Vec<String> = src.iter().map(|s| s.to_string()).collect();
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        while cur.peek().is_some_and(is_case_header) {
            read_load_case(&mut cur, &mut doc, factor).unwrap();
        }
        doc
    }

    #[test]
    fn header_name_variants() {
        let doc = decode_case(
            &[
                "LOAD 1 LOADTYPE Dead TITLE SELF WEIGHT",
                "LOAD 2 TITLE LOAD CASE 2",
                "LOAD 3 CRANE",
            ],
            1000.0,
        );
        assert_eq!(doc.load_cases[&LoadCaseId(1)].name, "SELF WEIGHT");
        assert_eq!(doc.load_cases[&LoadCaseId(1)].category, "Dead");
        assert_eq!(doc.load_cases[&LoadCaseId(2)].name, "LOAD CASE 2");
        assert_eq!(doc.load_cases[&LoadCaseId(2)].category, "Live");
        assert_eq!(doc.load_cases[&LoadCaseId(3)].name, "CRANE");
    }

    #[test]
    fn selfweight_with_list() {
        let doc = decode_case(
            &["LOAD 1 TITLE DL", "SELFWEIGHT Y -1.15 LIST 1 TO 3 7"],
            1000.0,
        );
        match &doc.load_cases[&LoadCaseId(1)].items[0] {
            LoadItem::SelfWeight {
                direction,
                factor,
                target,
            } => {
                assert_eq!(*direction, Axis::Y);
                assert_eq!(*factor, -1.15);
                assert_eq!(
                    *target,
                    SelfWeightTarget::Shapes(vec![
                        ShapeId(1),
                        ShapeId(2),
                        ShapeId(3),
                        ShapeId(7)
                    ])
                );
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn joint_load_components_scale() {
        let doc = decode_case(
            &["LOAD 4 TITLE LL", "JOINT LOAD", "5 6 FY -10 MZ 2.5"],
            1000.0,
        );
        match &doc.load_cases[&LoadCaseId(4)].items[0] {
            LoadItem::JointLoad { components, joints } => {
                assert_eq!(components.fy, Some(-10000.0));
                assert_eq!(components.mz, Some(2500.0));
                assert_eq!(components.fx, None);
                assert_eq!(joints.len(), 2);
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn support_displacement_rotations_become_radians() {
        let doc = decode_case(
            &["LOAD 5 TITLE SETTLE", "SUPPORT DISPLACEMENT LOAD", "2 FY -0.01 MX 90"],
            1.0,
        );
        match &doc.load_cases[&LoadCaseId(5)].items[0] {
            LoadItem::SupportDisplacement { components, .. } => {
                assert_eq!(components.fy, Some(-0.01));
                let mx = components.mx.unwrap();
                assert!((mx - PI / 2.0).abs() < 1e-12);
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn member_load_sub_kinds() {
        let doc = decode_case(
            &[
                "LOAD 6 TITLE ML",
                "MEMBER LOAD",
                "1 TO 3 UNI GY -5",
                "4 CON GZ -12 1.5",
                "5 LIN Y 0 -3",
                "6 TRAP GY -2 -4 0.5 2.5",
                "7 UMOM GX 1.2",
            ],
            1000.0,
        );
        let items = &doc.load_cases[&LoadCaseId(6)].items;
        assert_eq!(items.len(), 5);
        match &items[0] {
            LoadItem::MemberLoad {
                kind: MemberLoadKind::Uniform { force, d1, .. },
                direction,
                members,
            } => {
                assert_eq!(*force, -5000.0);
                assert_eq!(*d1, None);
                assert_eq!(*direction, LoadDirection::GY);
                assert_eq!(members.len(), 3);
            }
            other => panic!("unexpected item: {other:?}"),
        }
        match &items[1] {
            LoadItem::MemberLoad {
                kind: MemberLoadKind::Concentrated { force, d1, .. },
                ..
            } => {
                assert_eq!(*force, -12000.0);
                assert_eq!(*d1, Some(1.5));
            }
            other => panic!("unexpected item: {other:?}"),
        }
        match &items[3] {
            LoadItem::MemberLoad {
                kind: MemberLoadKind::Trapezoidal { w1, w2, d1, d2 },
                ..
            } => {
                assert_eq!((*w1, *w2), (-2000.0, -4000.0));
                // Positions stay in length units
                assert_eq!((*d1, *d2), (0.5, 2.5));
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn element_load_pressure_and_concentrated() {
        let doc = decode_case(
            &[
                "LOAD 7 TITLE EL",
                "ELEMENT LOAD",
                "10 11 PR GY -4",
                "12 PR LZ -6 0.25 0.3",
            ],
            1000.0,
        );
        let items = &doc.load_cases[&LoadCaseId(7)].items;
        match &items[0] {
            LoadItem::ElementLoad {
                kind: ElementLoadKind::Pressure { force },
                direction,
                elements,
            } => {
                assert_eq!(*force, -4000.0);
                assert_eq!(*direction, LoadDirection::GY);
                assert_eq!(elements.len(), 2);
            }
            other => panic!("unexpected item: {other:?}"),
        }
        match &items[1] {
            LoadItem::ElementLoad {
                kind: ElementLoadKind::Concentrated { force, x, y },
                direction,
                ..
            } => {
                assert_eq!(*force, -6000.0);
                assert_eq!((*x, *y), (0.25, 0.3));
                assert_eq!(*direction, LoadDirection::LZ);
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn repeat_load_factors() {
        let doc = decode_case(
            &["LOAD 8 TITLE NL", "REPEAT LOAD", "1 1.5 2 1.2"],
            1000.0,
        );
        match &doc.load_cases[&LoadCaseId(8)].items[0] {
            LoadItem::Repeat { factors } => {
                assert_eq!(factors[&LoadCaseId(1)], 1.5);
                assert_eq!(factors[&LoadCaseId(2)], 1.2);
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn combination_with_factors() {
        let lines: Vec<String> = ["LOAD COMB 101 ULS 1", "1 1.35 2 1.5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        read_combination(&mut cur, &mut doc).unwrap();
        let comb = &doc.combinations[&CombinationId(101)];
        assert_eq!(comb.name, "ULS 1");
        assert_eq!(comb.factors[&LoadCaseId(1)], 1.35);
        assert!(!comb.non_linear);
    }

    #[test]
    fn envelopes_with_type_and_ranges() {
        let lines: Vec<String> = [
            "101 TO 103 ENVELOPE 1 TYPE STRENGTH",
            "104 ENVELOPE 2",
            "END DEFINE ENVELOPE",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let mut cur = LineCursor::new(&lines);
        let mut doc = StdDocument::default();
        read_envelopes(&mut cur, &mut doc).unwrap();
        let first = &doc.envelopes[&EnvelopeId(1)];
        assert_eq!(first.kind.as_deref(), Some("STRENGTH"));
        assert_eq!(first.combinations.len(), 3);
        assert_eq!(doc.envelopes[&EnvelopeId(2)].kind, None);
    }
}
