// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Scope Engine - Element classification and isolation
//!
//! This crate groups the elements of loaded IFC models into named categories
//! by their type tag and drives the renderer's visibility and highlight
//! state from those categories. It works against the traits defined in
//! `ifc-scope-model` and never touches IFC files or geometry itself.
//!
//! # Features
//!
//! - **Ordered category rules** - first matching rule wins, case-insensitive
//! - **Incremental index** - elements are classified as the loader reports them
//! - **Batched isolation** - one renderer commit per user action
//! - **Reset wins** - a reset drops batches that were started before it
//! - **Room navigation** - metadata lookup, floor directory, preset camera views
//!
//! # Example
//!
//! ```ignore
//! use ifc_scope_engine::{CommandRecorder, ViewerSession};
//! use ifc_scope_model::ElementRef;
//!
//! let mut session = ViewerSession::builtin()?;
//! session.on_element_observed(ElementRef::new("example", 28910), "IFCSPACE");
//!
//! let mut backend = CommandRecorder::new();
//! session.isolate_category("Räume", &mut backend);
//! println!("{}", backend.to_json()?);
//! ```

pub mod backend;
pub mod camera;
pub mod classifier;
pub mod config;
pub mod error;
pub mod index;
pub mod isolation;
pub mod metadata;
pub mod session;

pub use backend::{CommandRecorder, RenderCommand};
pub use camera::{FramingConfig, ViewDirection};
pub use classifier::{
    CategoryInfo, CategoryRule, CategoryRuleConfig, CategoryRuleSet, Classifier,
    DEFAULT_IFC_LABEL, UNCLASSIFIED, UNCLASSIFIED_DISPLAY_NAME,
};
pub use config::{ViewStyles, ViewerConfig};
pub use error::{Error, Result};
pub use index::CategoryIndex;
pub use isolation::{ApplyOutcome, IsolationController, ViewTicket, ViewUpdate};
pub use metadata::{
    fallback_label, FloorDirectory, FloorRooms, MetadataEntry, MetadataTable, RoomRef,
};
pub use session::{ElementInfo, RoomBanner, RoomFocus, ViewerSession};
