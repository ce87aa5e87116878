// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for std-file decode and encode operations

use crate::{JointId, ShapeId};
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while decoding or encoding a std file
///
/// Format and completeness errors abort the decode; encode errors are raised
/// before any output is persisted. Non-fatal completeness findings are logged
/// instead of being returned here.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Force unit other than N or KN
    #[error("Unsupported force unit: {0} (only N and KN are supported)")]
    UnsupportedForceUnit(String),

    /// Declared up-axis other than Y or Z
    #[error("Unsupported up axis: {0} (only Y and Z are supported)")]
    UnsupportedUpAxis(String),

    /// A section record with no resolvable shape
    #[error("Malformed {section} record: {line:?}")]
    MalformedRecord { section: &'static str, line: String },

    /// `UPTABLE` reference with no matching user-table definition
    #[error("No user table definition matches table {table} profile {profile:?}")]
    UnresolvedUserTable { table: u32, profile: String },

    /// Member endpoint referencing an undefined joint
    #[error("Member {member} references undefined joint {joint}")]
    UndefinedJoint { member: ShapeId, joint: JointId },

    /// No materials while structural members or elements exist
    #[error("No material has been defined in the model")]
    MissingMaterials,

    /// No section profiles while members exist
    #[error("No section profile has been defined in the model")]
    MissingSectionProfiles,

    /// No element thickness while shell elements exist
    #[error("No thickness has been defined in the model")]
    MissingThickness,

    /// Shell element with a node count the format cannot express
    #[error("Shell element {element} has {nodes} nodes (only 3 or 4 are supported)")]
    UnsupportedShape { element: ShapeId, nodes: usize },

    /// Support restraint set the format cannot express
    #[error("Unsupported support: {0}")]
    UnsupportedSupport(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl CodecError {
    /// Create a new malformed-record error
    pub fn malformed(section: &'static str, line: impl Into<String>) -> Self {
        CodecError::MalformedRecord {
            section,
            line: line.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        CodecError::Other(msg.into())
    }
}
