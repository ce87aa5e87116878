// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types shared by every record family
//!
//! Identifiers are assigned by the source of truth (the model on encode, the
//! file on decode) and never regenerated by the codec. Joints live in their
//! own id space; members, shell elements and other geometry share one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe joint (node) identifier
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct JointId(pub u32);

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for JointId {
    fn from(id: u32) -> Self {
        JointId(id)
    }
}

/// Identifier in the shared member/element/geometry id space
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ShapeId {
    fn from(id: u32) -> Self {
        ShapeId(id)
    }
}

/// Primary load case identifier
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct LoadCaseId(pub u32);

impl fmt::Display for LoadCaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LoadCaseId {
    fn from(id: u32) -> Self {
        LoadCaseId(id)
    }
}

/// Load combination identifier
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct CombinationId(pub u32);

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CombinationId {
    fn from(id: u32) -> Self {
        CombinationId(id)
    }
}

/// Envelope identifier
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct EnvelopeId(pub u32);

impl fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EnvelopeId {
    fn from(id: u32) -> Self {
        EnvelopeId(id)
    }
}

/// 3-component vector in file length units
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Classify the vector as a signed global axis direction.
    ///
    /// Returns `None` when the vector has more than one non-zero component,
    /// i.e. it is not aligned with a single global axis.
    pub fn axis_direction(&self) -> Option<AxisDirection> {
        let zeros = [self.x, self.y, self.z]
            .iter()
            .filter(|c| **c == 0.0)
            .count();
        if zeros != 2 {
            return None;
        }
        if self.x > 0.0 {
            Some(AxisDirection::PlusX)
        } else if self.x < 0.0 {
            Some(AxisDirection::MinusX)
        } else if self.y > 0.0 {
            Some(AxisDirection::PlusY)
        } else if self.y < 0.0 {
            Some(AxisDirection::MinusY)
        } else if self.z > 0.0 {
            Some(AxisDirection::PlusZ)
        } else {
            Some(AxisDirection::MinusZ)
        }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

/// Signed global axis direction of an axis-aligned member span
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum AxisDirection {
    PlusX,
    MinusX,
    PlusY,
    MinusY,
    PlusZ,
    MinusZ,
}

/// Unsigned global axis
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Vertical axis convention declared by the file (`SET <axis> UP`)
///
/// `Z` is the canonical convention; a `Y`-up file is remapped by the
/// normalizer. Any other declared axis is a fatal format error.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, Default)]
pub enum UpAxis {
    #[default]
    Y,
    Z,
}

impl UpAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpAxis::Y => "Y",
            UpAxis::Z => "Z",
        }
    }
}

/// Force unit declared by the file's `UNIT` record
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, Default)]
pub enum ForceUnit {
    Newton,
    #[default]
    KiloNewton,
}

impl ForceUnit {
    /// Multiplier from file force values to canonical Newtons
    pub fn to_newton(&self) -> f64 {
        match self {
            ForceUnit::Newton => 1.0,
            ForceUnit::KiloNewton => 1000.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ForceUnit::Newton => "N",
            ForceUnit::KiloNewton => "KN",
        }
    }
}

/// Declared units of the file
///
/// Lengths are carried through untouched; only force-like values are scaled
/// to canonical Newtons on decode.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct UnitSystem {
    /// Length unit token as declared (e.g. `METER`)
    pub length: String,
    pub force: ForceUnit,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self {
            length: "METER".to_string(),
            force: ForceUnit::KiloNewton,
        }
    }
}

impl UnitSystem {
    /// Multiplier applied to force/moment/displacement values on decode
    pub fn force_factor(&self) -> f64 {
        self.force.to_newton()
    }
}

/// Direction code attached to member and element load items
///
/// `G*` are global axes, `P*` projected global axes, `L*` element-local axes
/// and the bare `X`/`Y`/`Z` member-local axes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LoadDirection {
    GX,
    GY,
    GZ,
    PX,
    PY,
    PZ,
    LX,
    LY,
    LZ,
    X,
    Y,
    Z,
}

impl LoadDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadDirection::GX => "GX",
            LoadDirection::GY => "GY",
            LoadDirection::GZ => "GZ",
            LoadDirection::PX => "PX",
            LoadDirection::PY => "PY",
            LoadDirection::PZ => "PZ",
            LoadDirection::LX => "LX",
            LoadDirection::LY => "LY",
            LoadDirection::LZ => "LZ",
            LoadDirection::X => "X",
            LoadDirection::Y => "Y",
            LoadDirection::Z => "Z",
        }
    }
}

/// Gravitational acceleration used to turn weight density into mass density
pub const GRAVITY: f64 = 9.81;
