// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Isotropic material records and their assignment to shapes

use crate::ShapeId;
use serde::{Deserialize, Serialize};

/// Material category derived from the name or `TYPE` token
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, Default)]
pub enum MaterialCategory {
    Concrete,
    Steel,
    #[default]
    Custom,
}

/// Isotropic linear-elastic material
///
/// Values are stored canonical: moduli in N/m², mass density in kg/m³
/// (weight density divided by gravitational acceleration at decode time).
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct Material {
    pub name: String,
    pub youngs_modulus: Option<f64>,
    pub shear_modulus: Option<f64>,
    pub poissons_ratio: Option<f64>,
    pub mass_density: Option<f64>,
    /// Thermal expansion coefficient (`ALPHA`)
    pub thermal_coefficient: Option<f64>,
    /// Damping ratio (`DAMP`)
    pub damping_ratio: Option<f64>,
    /// Raw `TYPE` token, when present
    pub type_token: Option<String>,
    pub category: MaterialCategory,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Classify the material from its name and `TYPE` token.
    ///
    /// A name or type containing `CONCRETE` or `STEEL` selects that category;
    /// everything else is treated as a custom material.
    pub fn derive_category(&mut self) {
        let name = self.name.to_uppercase();
        let type_token = self
            .type_token
            .as_deref()
            .unwrap_or("")
            .to_uppercase();
        self.category = if name.contains("CONCRETE") || type_token.contains("CONCRETE") {
            MaterialCategory::Concrete
        } else if name.contains("STEEL") || type_token.contains("STEEL") {
            MaterialCategory::Steel
        } else {
            MaterialCategory::Custom
        };
    }
}

/// Shapes a material is assigned to via a `CONSTANTS` clause
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum AssignmentTarget {
    /// `MATERIAL <name> ALL`
    All,
    /// `MATERIAL <name> MEMB <ids>`
    Shapes(Vec<ShapeId>),
}

/// One material-to-shape assignment from the `CONSTANTS` section
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MaterialAssignment {
    pub material: String,
    pub target: AssignmentTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_from_name_or_type() {
        let mut m = Material::new("STEEL");
        m.derive_category();
        assert_eq!(m.category, MaterialCategory::Steel);

        let mut m = Material::new("C35");
        m.type_token = Some("CONCRETE".to_string());
        m.derive_category();
        assert_eq!(m.category, MaterialCategory::Concrete);

        let mut m = Material::new("TIMBER_GL24");
        m.derive_category();
        assert_eq!(m.category, MaterialCategory::Custom);
    }
}
