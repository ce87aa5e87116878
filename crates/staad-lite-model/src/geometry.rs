// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry records: joints, member incidences, shell incidences, offsets
//! and named groups

use crate::{JointId, ShapeId, Vec3};
use serde::{Deserialize, Serialize};

/// Two-node line element between joints
///
/// Endpoint coordinates are cached from the joint table after decode so
/// consumers can resolve member directions without a joint lookup.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MemberIncidence {
    pub start: JointId,
    pub end: JointId,
    pub start_coords: Vec3,
    pub end_coords: Vec3,
}

impl MemberIncidence {
    pub fn new(start: JointId, end: JointId) -> Self {
        Self {
            start,
            end,
            start_coords: Vec3::default(),
            end_coords: Vec3::default(),
        }
    }

    /// Span vector from start to end joint
    pub fn span(&self) -> Vec3 {
        Vec3::new(
            self.end_coords.x - self.start_coords.x,
            self.end_coords.y - self.start_coords.y,
            self.end_coords.z - self.start_coords.z,
        )
    }
}

/// Shell element over 3 (triangle) or 4 (quadrilateral) joints
///
/// Node order is preserved exactly as read; it encodes element orientation.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ShellIncidence {
    pub nodes: Vec<JointId>,
}

impl ShellIncidence {
    pub fn new(nodes: Vec<JointId>) -> Self {
        Self { nodes }
    }

    pub fn is_triangle(&self) -> bool {
        self.nodes.len() == 3
    }

    pub fn is_quad(&self) -> bool {
        self.nodes.len() == 4
    }
}

/// Start/end eccentricity vectors of a member's physical centerline
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct MemberOffset {
    pub start: Option<Vec3>,
    pub end: Option<Vec3>,
}

/// Section a group was declared under
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GroupKind {
    Joint,
    Member,
    Element,
    Floor,
    Geometry,
}

impl GroupKind {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "JOINT" => Some(GroupKind::Joint),
            "MEMBER" => Some(GroupKind::Member),
            "ELEMENT" => Some(GroupKind::Element),
            "FLOOR" => Some(GroupKind::Floor),
            "GEOMETRY" => Some(GroupKind::Geometry),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Joint => "JOINT",
            GroupKind::Member => "MEMBER",
            GroupKind::Element => "ELEMENT",
            GroupKind::Floor => "FLOOR",
            GroupKind::Geometry => "GEOMETRY",
        }
    }
}

/// Members of a named group: joint ids or shared-space shape ids, depending
/// on the declaring section
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum GroupMembers {
    Joints(Vec<JointId>),
    Shapes(Vec<ShapeId>),
}

/// Named group declared under `START GROUP DEFINITION`
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub kind: GroupKind,
    pub members: GroupMembers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_span_runs_start_to_end() {
        let mut m = MemberIncidence::new(JointId(1), JointId(2));
        m.start_coords = Vec3::new(0.0, 0.0, 0.0);
        m.end_coords = Vec3::new(0.0, 0.0, 4.0);
        assert_eq!(m.span(), Vec3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn shell_arity() {
        let tri = ShellIncidence::new(vec![JointId(1), JointId(2), JointId(3)]);
        assert!(tri.is_triangle());
        assert!(!tri.is_quad());
    }
}
