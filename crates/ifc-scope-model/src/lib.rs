// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Scope Model - Shared types and host-facing traits
//!
//! This crate defines the vocabulary shared between the classification and
//! isolation engine and the host application that loads and renders models.
//! Nothing in here knows how IFC files are parsed or how fragments are drawn;
//! those concerns live behind the traits.
//!
//! # Architecture
//!
//! - [`ElementRef`] / [`ElementSet`] - Identify elements across loaded models
//! - [`ElementUniverse`] - Read-only view of every element currently known
//! - [`RenderBackend`] - Outbound visibility and highlight mutations
//! - [`Aabb`] / [`CameraPose`] - Bounds and camera placement values
//! - [`HighlightStyle`] - Visual overlay applied to highlighted elements
//!
//! # Example
//!
//! ```ignore
//! use ifc_scope_model::{ElementRef, ElementSet, ModelId, ElementId};
//!
//! let mut set = ElementSet::new();
//! set.insert(ElementRef::new("example", 28910));
//! assert!(set.contains(&ModelId::from("example"), ElementId(28910)));
//! ```

pub mod geometry;
pub mod style;
pub mod traits;
pub mod types;

// Re-export all public types
pub use geometry::*;
pub use style::*;
pub use traits::*;
pub use types::*;
