// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Load cases, load items, combinations and envelopes
//!
//! Each load kind is a tagged variant so consumption sites can match
//! exhaustively instead of probing key/value maps.

use crate::{Axis, CombinationId, EnvelopeId, JointId, LoadCaseId, LoadDirection, ShapeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shapes a self-weight item applies to
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum SelfWeightTarget {
    All,
    /// `LIST <ids>` subset
    Shapes(Vec<ShapeId>),
}

/// Force/moment components of a joint load or support displacement,
/// in canonical units
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct ForceComponents {
    pub fx: Option<f64>,
    pub fy: Option<f64>,
    pub fz: Option<f64>,
    pub mx: Option<f64>,
    pub my: Option<f64>,
    pub mz: Option<f64>,
}

impl ForceComponents {
    pub fn is_empty(&self) -> bool {
        self.fx.is_none()
            && self.fy.is_none()
            && self.fz.is_none()
            && self.mx.is_none()
            && self.my.is_none()
            && self.mz.is_none()
    }
}

/// Member load sub-variants (`MEMBER LOAD` section)
///
/// Magnitudes are canonical; the `d*` values are positions along the member
/// in file length units.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum MemberLoadKind {
    /// `UNI` uniform force
    Uniform {
        force: f64,
        d1: Option<f64>,
        d2: Option<f64>,
        d3: Option<f64>,
    },
    /// `UMOM` uniform moment
    UniformMoment {
        moment: f64,
        d1: Option<f64>,
        d2: Option<f64>,
        d3: Option<f64>,
    },
    /// `CON` concentrated force
    Concentrated {
        force: f64,
        d1: Option<f64>,
        d2: Option<f64>,
        d3: Option<f64>,
    },
    /// `LIN` linearly varying load over the full span
    Linear { w1: f64, w2: f64 },
    /// `TRAP` trapezoidal load between two positions
    Trapezoidal { w1: f64, w2: f64, d1: f64, d2: f64 },
}

impl MemberLoadKind {
    /// Keyword selecting this sub-variant in the record line
    pub fn keyword(&self) -> &'static str {
        match self {
            MemberLoadKind::Uniform { .. } => "UNI",
            MemberLoadKind::UniformMoment { .. } => "UMOM",
            MemberLoadKind::Concentrated { .. } => "CON",
            MemberLoadKind::Linear { .. } => "LIN",
            MemberLoadKind::Trapezoidal { .. } => "TRAP",
        }
    }
}

/// Element load sub-variants (`ELEMENT LOAD` section)
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum ElementLoadKind {
    /// `PR <p>` pressure over the full element
    Pressure { force: f64 },
    /// `PR <p> <x> <y>` concentrated pressure at local coordinates
    Concentrated { force: f64, x: f64, y: f64 },
}

/// One load item inside a primary load case
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum LoadItem {
    SelfWeight {
        direction: Axis,
        factor: f64,
        target: SelfWeightTarget,
    },
    JointLoad {
        components: ForceComponents,
        joints: Vec<JointId>,
    },
    /// Prescribed support displacement; translations in file length units,
    /// rotations converted to radians at decode time
    SupportDisplacement {
        components: ForceComponents,
        joints: Vec<JointId>,
    },
    MemberLoad {
        kind: MemberLoadKind,
        direction: LoadDirection,
        members: Vec<ShapeId>,
    },
    ElementLoad {
        kind: ElementLoadKind,
        direction: LoadDirection,
        elements: Vec<ShapeId>,
    },
    /// `REPEAT LOAD` factors over previously defined cases
    Repeat { factors: BTreeMap<LoadCaseId, f64> },
}

/// Primary load case
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LoadCase {
    pub name: String,
    /// `LOADTYPE` token; defaults to `Live` when the file omits it
    pub category: String,
    /// Items in file order
    pub items: Vec<LoadItem>,
}

impl LoadCase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: "Live".to_string(),
            items: Vec::new(),
        }
    }

    /// True when the case holds nothing but repeat-load factors
    pub fn is_repeat_only(&self) -> bool {
        self.items.len() == 1 && matches!(self.items[0], LoadItem::Repeat { .. })
    }
}

/// Weighted combination of load cases
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LoadCombination {
    pub name: String,
    pub factors: BTreeMap<LoadCaseId, f64>,
    /// Envelope this combination belongs to, when any
    pub category: Option<EnvelopeId>,
    /// Sequential (repeat-load) combination rather than a weighted sum
    pub non_linear: bool,
}

/// Named grouping of combinations for worst-case reporting
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct Envelope {
    /// Optional `TYPE` tag
    pub kind: Option<String>,
    pub combinations: Vec<CombinationId>,
}
