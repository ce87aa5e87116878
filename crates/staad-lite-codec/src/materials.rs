// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extractor for the `DEFINE MATERIAL START` block
//!
//! Each material begins at an `ISOTROPIC <name>` line and accumulates
//! key/value rows until the next `ISOTROPIC` or the end marker. Moduli are
//! force-scaled; the file's weight density becomes mass density.

use crate::cursor::{require_f64, LineCursor};
use staad_lite_model::{Material, Result, StdDocument, GRAVITY};

const SECTION: &str = "DEFINE MATERIAL";

/// Read materials until `END DEFINE MATERIAL`.
pub fn read_materials(cur: &mut LineCursor, doc: &mut StdDocument, factor: f64) -> Result<()> {
    while let Some(line) = cur.peek() {
        if line == "END DEFINE MATERIAL" {
            cur.advance();
            break;
        }
        let Some(name) = line.strip_prefix("ISOTROPIC ") else {
            cur.advance();
            continue;
        };
        let mut material = Material::new(name.trim());
        cur.advance();
        while let Some(row) = cur.peek() {
            if row.starts_with("ISOTROPIC") || row == "END DEFINE MATERIAL" {
                break;
            }
            read_property_row(row, &mut material, factor)?;
            cur.advance();
        }
        material.derive_category();
        doc.materials.insert(material.name.clone(), material);
    }
    Ok(())
}

fn read_property_row(row: &str, material: &mut Material, factor: f64) -> Result<()> {
    let toks: Vec<&str> = row.split_whitespace().collect();
    let (Some(key), Some(value)) = (toks.first(), toks.get(1)) else {
        return Ok(());
    };
    match *key {
        "E" => material.youngs_modulus = Some(require_f64(value, SECTION, row)? * factor),
        "G" => material.shear_modulus = Some(require_f64(value, SECTION, row)? * factor),
        "POISSON" => material.poissons_ratio = Some(require_f64(value, SECTION, row)?),
        // The file stores weight density; divide out gravity after scaling
        "DENSITY" => {
            material.mass_density = Some(require_f64(value, SECTION, row)? * factor / GRAVITY)
        }
        "ALPHA" => material.thermal_coefficient = Some(require_f64(value, SECTION, row)?),
        "DAMP" => material.damping_ratio = Some(require_f64(value, SECTION, row)?),
        "TYPE" => material.type_token = Some((*value).to_string()),
        _ => {}
    }
    Ok(())
}
