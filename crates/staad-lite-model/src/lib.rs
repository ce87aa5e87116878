// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STAAD-Lite Model - Record types for the std text model codec
//!
//! This crate defines the typed records a std file decodes into and encodes
//! from: joints, member and shell incidences, materials, section profiles,
//! supports, load cases, combinations, envelopes and groups, held together by
//! [`StdDocument`]. The codec itself lives in `staad-lite-codec`; downstream
//! model builders consume the records from here.
//!
//! Every polymorphic record family is a tagged enum ([`SectionProfile`],
//! [`SupportKind`], [`LoadItem`]) so consumers pattern-match exhaustively
//! instead of probing string-keyed maps.
//!
//! # Example
//!
//! ```ignore
//! use staad_lite_model::{StdDocument, LoadItem};
//!
//! fn count_joint_loads(doc: &StdDocument) -> usize {
//!     doc.load_cases
//!         .values()
//!         .flat_map(|case| &case.items)
//!         .filter(|item| matches!(item, LoadItem::JointLoad { .. }))
//!         .count()
//! }
//! ```

pub mod document;
pub mod error;
pub mod geometry;
pub mod loads;
pub mod materials;
pub mod properties;
pub mod supports;
pub mod types;

// Re-export all public types
pub use document::*;
pub use error::*;
pub use geometry::*;
pub use loads::*;
pub use materials::*;
pub use properties::*;
pub use supports::*;
pub use types::*;
