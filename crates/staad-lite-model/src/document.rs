// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The decoded/encodable document and its completeness check

use crate::{
    CodecError, CombinationId, ElementProperty, Envelope, EnvelopeId, Group, JointId, LoadCase,
    LoadCaseId, LoadCombination, Material, MaterialAssignment, MemberIncidence, MemberOffset,
    MemberProperty, Result, ShapeId, ShellIncidence, Support, UnitSystem, UpAxis, Vec3,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One complete record set of the text model format
///
/// Id-keyed tables are ordered maps so the encoder walks ids ascending.
/// A document is created once per decode call and handed to the
/// model-builder; the codec keeps no state across calls.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct StdDocument {
    /// Model name from the `STAAD SPACE` title line
    pub name: String,
    pub units: UnitSystem,
    pub up_axis: UpAxis,
    pub joints: BTreeMap<JointId, Vec3>,
    pub members: BTreeMap<ShapeId, MemberIncidence>,
    pub shells: BTreeMap<ShapeId, ShellIncidence>,
    pub materials: BTreeMap<String, Material>,
    pub material_assignments: Vec<MaterialAssignment>,
    pub member_properties: Vec<MemberProperty>,
    pub element_properties: Vec<ElementProperty>,
    pub supports: Vec<Support>,
    /// Local-z-axis unit vectors derived from `BETA` clauses
    pub beta_angles: BTreeMap<ShapeId, Vec3>,
    pub offsets: BTreeMap<ShapeId, MemberOffset>,
    pub load_cases: BTreeMap<LoadCaseId, LoadCase>,
    pub combinations: BTreeMap<CombinationId, LoadCombination>,
    pub envelopes: BTreeMap<EnvelopeId, Envelope>,
    pub groups: Vec<Group>,
}

impl StdDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Check that the record set can build a structural model.
    ///
    /// Optional record types only produce a warning through the log facade;
    /// mandatory ones return the corresponding completeness error.
    pub fn check_completeness(&self) -> Result<()> {
        if self.joints.is_empty() {
            log::warn!("No joint has been defined in the model");
        }
        if self.members.is_empty() {
            log::warn!("No member has been defined in the model");
        }
        if self.shells.is_empty() {
            log::warn!("No shell element has been defined in the model");
        }
        let has_structure = !self.members.is_empty() || !self.shells.is_empty();
        if self.materials.is_empty() && has_structure {
            return Err(CodecError::MissingMaterials);
        }
        if self.member_properties.is_empty() && !self.members.is_empty() {
            return Err(CodecError::MissingSectionProfiles);
        }
        if self.element_properties.is_empty() && !self.shells.is_empty() {
            return Err(CodecError::MissingThickness);
        }
        if self.load_cases.is_empty() {
            log::warn!("No load case has been defined in the model");
        }
        if self.combinations.is_empty() {
            log::warn!("No load combination has been defined in the model");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SectionProfile, ShellIncidence};

    fn doc_with_member() -> StdDocument {
        let mut doc = StdDocument::new("TEST");
        doc.joints.insert(JointId(1), Vec3::new(0.0, 0.0, 0.0));
        doc.joints.insert(JointId(2), Vec3::new(1.0, 0.0, 0.0));
        doc.members
            .insert(ShapeId(1), MemberIncidence::new(JointId(1), JointId(2)));
        doc.materials
            .insert("STEEL".to_string(), Material::new("STEEL"));
        doc
    }

    #[test]
    fn members_without_profiles_are_fatal() {
        let doc = doc_with_member();
        assert!(matches!(
            doc.check_completeness(),
            Err(CodecError::MissingSectionProfiles)
        ));
    }

    #[test]
    fn members_without_materials_are_fatal() {
        let mut doc = doc_with_member();
        doc.materials.clear();
        assert!(matches!(
            doc.check_completeness(),
            Err(CodecError::MissingMaterials)
        ));
    }

    #[test]
    fn shells_without_thickness_are_fatal() {
        let mut doc = doc_with_member();
        doc.member_properties.push(MemberProperty {
            profile: SectionProfile::Circle { diameter: 0.4 },
            members: vec![ShapeId(1)],
        });
        doc.shells.insert(
            ShapeId(2),
            ShellIncidence::new(vec![JointId(1), JointId(2), JointId(1)]),
        );
        assert!(matches!(
            doc.check_completeness(),
            Err(CodecError::MissingThickness)
        ));
    }

    #[test]
    fn missing_load_cases_only_warn() {
        let mut doc = doc_with_member();
        doc.member_properties.push(MemberProperty {
            profile: SectionProfile::Circle { diameter: 0.4 },
            members: vec![ShapeId(1)],
        });
        assert!(doc.check_completeness().is_ok());
    }

    #[test]
    fn empty_document_passes() {
        // Nothing mandatory applies when there is no structure at all
        let doc = StdDocument::new("EMPTY");
        assert!(doc.check_completeness().is_ok());
    }
}
