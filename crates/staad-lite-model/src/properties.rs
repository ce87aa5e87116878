// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Section profiles for members and thickness records for shell elements

use crate::ShapeId;
use serde::{Deserialize, Serialize};

/// The 16 scalar section constants of a user-table `GENERAL` section,
/// in file order
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct SectionConstants {
    pub area: f64,
    pub depth: f64,
    pub web_thickness: f64,
    pub width: f64,
    pub flange_thickness: f64,
    pub second_moment_area_z: f64,
    pub second_moment_area_y: f64,
    pub second_moment_area_x: f64,
    pub section_modulus_z: f64,
    pub section_modulus_y: f64,
    pub shear_area_y: f64,
    pub shear_area_z: f64,
    pub plastic_section_modulus_z: f64,
    pub plastic_section_modulus_y: f64,
    pub warping_constant: f64,
    pub depth_of_web: f64,
}

impl SectionConstants {
    /// Values in file order, matching the user-table data line
    pub fn as_array(&self) -> [f64; 16] {
        [
            self.area,
            self.depth,
            self.web_thickness,
            self.width,
            self.flange_thickness,
            self.second_moment_area_z,
            self.second_moment_area_y,
            self.second_moment_area_x,
            self.section_modulus_z,
            self.section_modulus_y,
            self.shear_area_y,
            self.shear_area_z,
            self.plastic_section_modulus_z,
            self.plastic_section_modulus_y,
            self.warping_constant,
            self.depth_of_web,
        ]
    }

    pub fn from_array(v: [f64; 16]) -> Self {
        Self {
            area: v[0],
            depth: v[1],
            web_thickness: v[2],
            width: v[3],
            flange_thickness: v[4],
            second_moment_area_z: v[5],
            second_moment_area_y: v[6],
            second_moment_area_x: v[7],
            section_modulus_z: v[8],
            section_modulus_y: v[9],
            shear_area_y: v[10],
            shear_area_z: v[11],
            plastic_section_modulus_z: v[12],
            plastic_section_modulus_y: v[13],
            warping_constant: v[14],
            depth_of_web: v[15],
        }
    }
}

/// User-defined arbitrary polygon section from a `START USER TABLE` block
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct UserTableSection {
    pub table: u32,
    pub name: String,
    pub constants: SectionConstants,
    /// Ordered polygon points, as (y, z) pairs
    pub polygon: Vec<[f64; 2]>,
}

/// Cross-section profile assigned to members
///
/// One variant per clause shape the format supports. Dimensions are in file
/// length units and never force-scaled.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum SectionProfile {
    /// `TABLE ST <name>` catalog section, name vendor-normalized
    Catalog { name: String },
    /// `PRIS YD <d> ZD <w>` rectangular solid
    Rectangle { depth: f64, width: f64 },
    /// `PRIS YD <d> ZD <w> YB <sd> ZB <sw>` tee
    Tee {
        depth: f64,
        flange_width: f64,
        stem_depth: f64,
        stem_width: f64,
    },
    /// `PRIS YD <d> ZD <wt> ZB <wb>` trapezoid
    Trapezoid {
        depth: f64,
        top_width: f64,
        bottom_width: f64,
    },
    /// `PRIS YD <d>` circular solid
    Circle { diameter: f64 },
    /// `TABLE ST PIPE OD <od> ID <id>` circular hollow
    Pipe {
        outer_diameter: f64,
        inner_diameter: f64,
    },
    /// `PRIS ROUND STA <s> END <e> THI <t>` tapered round hollow
    RoundTaper {
        start_diameter: f64,
        end_diameter: f64,
        thickness: f64,
    },
    /// `TAPERED <f1> .. <f7>` tapered I-section
    TaperedI { params: [f64; 7] },
    /// `UPTABLE <table> <name>` user-defined polygon section
    UserTable(UserTableSection),
}

/// A section profile together with the members it is assigned to
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MemberProperty {
    pub profile: SectionProfile,
    pub members: Vec<ShapeId>,
}

/// Shell thickness record from the `ELEMENT PROPERTY` section
///
/// Holds 1 to 4 corner thicknesses: a single value applies uniformly to all
/// corners, otherwise one value per listed corner in order.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ElementProperty {
    pub thicknesses: Vec<f64>,
    pub elements: Vec<ShapeId>,
}

impl ElementProperty {
    /// Thickness at a corner index, applying the single-value fan-out rule
    pub fn thickness_at(&self, corner: usize) -> Option<f64> {
        if self.thicknesses.len() == 1 {
            self.thicknesses.first().copied()
        } else {
            self.thicknesses.get(corner).copied()
        }
    }
}

/// Normalize a vendor catalog section name the way the interchange format
/// spells it: `HE*`/`*CHS`/`*RHS`/`*SHS` names get their digit and letter
/// segments regrouped, and `X` separators are lowered.
pub fn normalize_profile_name(name: &str) -> String {
    let mut name = name.to_string();
    let bytes = name.as_bytes();
    let reorder = (name.len() > 2
        && name.starts_with("HE")
        && bytes[2].is_ascii_digit())
        || name.ends_with("CHS")
        || name.ends_with("RHS")
        || name.ends_with("SHS");
    if reorder {
        let digits: String = name.chars().filter(|c| c.is_ascii_digit()).collect();
        let letters: String = name.chars().filter(|c| !c.is_ascii_digit()).collect();
        name = format!("{letters}{digits}");
    }
    name.replace('X', "x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thickness_fan_out() {
        let uniform = ElementProperty {
            thicknesses: vec![0.2],
            elements: vec![ShapeId(10)],
        };
        assert_eq!(uniform.thickness_at(3), Some(0.2));

        let per_corner = ElementProperty {
            thicknesses: vec![0.2, 0.25, 0.3],
            elements: vec![ShapeId(11)],
        };
        assert_eq!(per_corner.thickness_at(1), Some(0.25));
        assert_eq!(per_corner.thickness_at(3), None);
    }

    #[test]
    fn vendor_name_normalization() {
        assert_eq!(normalize_profile_name("HE200A"), "HEA200");
        assert_eq!(normalize_profile_name("200SHS"), "SHS200");
        assert_eq!(normalize_profile_name("UB305X165X40"), "UB305x165x40");
        // Plain names pass through
        assert_eq!(normalize_profile_name("IPE300"), "IPE300");
    }
}
