// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point support records

use crate::JointId;
use serde::{Deserialize, Serialize};

/// Partial restraint of one degree of freedom in a `FIXED BUT` support
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum Restraint {
    /// Bare axis token: the degree of freedom is fully released
    Released,
    /// `K*` token: elastic spring with the given stiffness
    Spring(f64),
}

/// Per-axis restraint set of a `FIXED BUT` support
///
/// `None` means the degree of freedom stays fixed. Axis order is the file's:
/// three translations, then three rotations.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct RestraintSet {
    pub fx: Option<Restraint>,
    pub fy: Option<Restraint>,
    pub fz: Option<Restraint>,
    pub mx: Option<Restraint>,
    pub my: Option<Restraint>,
    pub mz: Option<Restraint>,
}

impl RestraintSet {
    pub fn is_empty(&self) -> bool {
        self.fx.is_none()
            && self.fy.is_none()
            && self.fz.is_none()
            && self.mx.is_none()
            && self.my.is_none()
            && self.mz.is_none()
    }
}

/// Support variant
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum SupportKind {
    /// All six degrees of freedom fixed
    Fixed,
    /// Translations fixed, rotations released
    Pinned,
    /// Per-axis releases and springs
    FixedBut(RestraintSet),
}

/// A support condition and the joints it is assigned to
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Support {
    pub kind: SupportKind,
    pub joints: Vec<JointId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restraint_set_emptiness() {
        let mut set = RestraintSet::default();
        assert!(set.is_empty());
        set.fy = Some(Restraint::Spring(500.0));
        assert!(!set.is_empty());
    }
}
