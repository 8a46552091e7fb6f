// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer session
//!
//! [`ViewerSession`] bundles the rule set, category index, isolation
//! controller, metadata and framing state of one viewer. The host feeds it
//! loader events and calls its actions from UI handlers; every action that
//! changes the view takes the render backend to push to.

use crate::camera::{FramingConfig, ViewDirection};
use crate::classifier::{CategoryInfo, CategoryRuleSet, Classifier};
use crate::config::{ViewStyles, ViewerConfig};
use crate::error::Result;
use crate::index::CategoryIndex;
use crate::isolation::{ApplyOutcome, IsolationController, ViewTicket, ViewUpdate};
use crate::metadata::{fallback_label, FloorDirectory, MetadataEntry, MetadataTable, RoomRef};
use ifc_scope_model::{
    Aabb, CameraPose, ElementId, ElementRef, ElementSet, ElementUniverse, ModelId, RenderBackend,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Data for the picked-element panel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub element: ElementRef,
    pub type_tag: String,
    pub category: CategoryInfo,
    /// Metadata name, or `"<ifc label> #<id>"`
    pub name: String,
    pub metadata: Option<MetadataEntry>,
}

/// Top bar content after focusing a room
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomBanner {
    pub room: ElementId,
    pub metadata: Option<MetadataEntry>,
}

impl fmt::Display for RoomBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(entry) = &self.metadata else {
            return write!(f, "Focus: Raum {} (Keine Metadaten gefunden)", self.room.0);
        };
        write!(f, "{} | Typ: {}", entry.name, entry.room_type)?;
        if let Some(number) = &entry.room_number {
            write!(f, " | ID: {}", number)?;
        }
        write!(f, " | Etage: {}", entry.floor)
    }
}

/// Result of focusing a single room
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomFocus {
    pub element: ElementRef,
    pub pose: CameraPose,
    pub banner: RoomBanner,
}

/// Classification and isolation state of one viewer
#[derive(Debug)]
pub struct ViewerSession {
    rules: Arc<CategoryRuleSet>,
    index: CategoryIndex,
    isolation: IsolationController,
    metadata: MetadataTable,
    floors: FloorDirectory,
    framing: FramingConfig,
    styles: ViewStyles,
    rooms_category: String,
    model_bounds: FxHashMap<ModelId, Aabb>,
    scene_bounds: Aabb,
}

impl ViewerSession {
    /// Create a session from a configuration
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let rules = Arc::new(config.rule_set()?);
        log::info!(
            "[Session] Created with {} categories, rooms in {:?}",
            rules.len(),
            config.rooms_category
        );

        Ok(Self {
            index: CategoryIndex::new(Classifier::new(Arc::clone(&rules))),
            rules,
            isolation: IsolationController::new(),
            metadata: config.metadata,
            floors: config.floors,
            framing: config.framing,
            styles: config.styles,
            rooms_category: config.rooms_category,
            model_bounds: FxHashMap::default(),
            scene_bounds: Aabb::empty(),
        })
    }

    /// Session with the built-in configuration
    pub fn builtin() -> Result<Self> {
        Self::new(ViewerConfig::builtin())
    }

    pub fn rules(&self) -> &CategoryRuleSet {
        &self.rules
    }

    pub fn index(&self) -> &CategoryIndex {
        &self.index
    }

    pub fn isolation(&self) -> &IsolationController {
        &self.isolation
    }

    pub fn metadata(&self) -> &MetadataTable {
        &self.metadata
    }

    pub fn floors(&self) -> &FloorDirectory {
        &self.floors
    }

    pub fn rooms_category(&self) -> &str {
        &self.rooms_category
    }

    // Loader events

    /// An element was converted by the loader
    pub fn on_element_observed(&mut self, element: ElementRef, type_tag: impl Into<String>) {
        self.index.observe(element, type_tag);
    }

    /// A batch of elements was converted by the loader
    pub fn on_elements_observed(
        &mut self,
        elements: impl IntoIterator<Item = (ElementRef, String)>,
    ) {
        let mut count = 0usize;
        for (element, type_tag) in elements {
            self.index.observe(element, type_tag);
            count += 1;
        }
        log::debug!("[Session] Observed {} elements", count);
    }

    /// A model was unloaded
    pub fn on_model_removed(&mut self, model: &ModelId) {
        if self.index.remove_model(model) {
            log::info!("[Session] Removed model {}", model);
        }
        self.isolation.forget_model(model);
        self.model_bounds.remove(model);
    }

    /// Bounding box of a loaded model, used for framing
    pub fn set_model_bounds(&mut self, model: impl Into<ModelId>, bounds: Aabb) {
        self.model_bounds.insert(model.into(), bounds);
    }

    /// Bounding box of the whole scene, used when no visible model has bounds
    pub fn set_scene_bounds(&mut self, bounds: Aabb) {
        self.scene_bounds = bounds;
    }

    // Category panel

    /// Category names for the filter panel
    pub fn category_names(&self) -> Vec<&str> {
        self.index.categories()
    }

    /// Category infos for the filter panel, including display names
    pub fn categories(&self) -> Vec<CategoryInfo> {
        let classifier = self.index.classifier();
        self.index
            .categories()
            .into_iter()
            .filter_map(|name| classifier.info(name))
            .collect()
    }

    pub fn elements_in_category(&self, name: &str) -> ElementSet {
        self.index.elements_in_category(name)
    }

    /// Show only the elements of a category
    ///
    /// An unknown category isolates nothing and hides every model.
    pub fn isolate_category<B: RenderBackend + ?Sized>(
        &mut self,
        name: &str,
        backend: &mut B,
    ) -> ApplyOutcome {
        if self.index.bucket(name).is_none() {
            log::warn!("[Session] Unknown category {:?}", name);
        }
        let targets = self.index.elements_in_category(name);
        log::debug!("[Session] Isolating {} ({} elements)", name, targets.len());
        let ticket = self.isolation.ticket();
        self.isolation
            .update(ticket, &self.index, backend, |view| view.isolate(&targets))
    }

    /// Show every element and clear highlights
    pub fn show_all<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> ViewTicket {
        self.isolation.show_all(&self.index, backend)
    }

    /// Ticket for a batch that is applied later
    pub fn ticket(&self) -> ViewTicket {
        self.isolation.ticket()
    }

    /// Apply a custom batch against the session's element universe
    pub fn update<B, F>(&mut self, ticket: ViewTicket, backend: &mut B, f: F) -> ApplyOutcome
    where
        B: RenderBackend + ?Sized,
        F: FnOnce(&mut ViewUpdate<'_, CategoryIndex, B>),
    {
        self.isolation.update(ticket, &self.index, backend, f)
    }

    // Inspection

    /// Describe a picked element
    ///
    /// Returns `None` for references the index does not know.
    pub fn inspect(&self, element: &ElementRef) -> Option<ElementInfo> {
        let Some(category) = self.index.category_of(element) else {
            log::warn!("[Session] Picked unknown element {}", element);
            return None;
        };
        let category = self
            .index
            .classifier()
            .info(category)
            .unwrap_or_else(CategoryInfo::unclassified);
        let metadata = self.metadata.lookup(element.element).cloned();
        let name = match &metadata {
            Some(entry) => entry.name.clone(),
            None => fallback_label(&category.ifc_label, element.element),
        };

        Some(ElementInfo {
            element: element.clone(),
            type_tag: self.index.type_tag_of(element).unwrap_or_default().to_string(),
            category,
            name,
            metadata,
        })
    }

    // Room navigation

    /// Rooms listed on a floor
    pub fn rooms_on_floor(&self, label: &str) -> &[RoomRef] {
        self.floors.rooms_on(label)
    }

    /// Show every room, highlighted, from the bird's-eye view
    pub fn show_all_spaces<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> CameraPose {
        let rooms = self.index.elements_in_category(&self.rooms_category);
        let style = self.styles.room_overview.clone();
        log::debug!("[Session] Showing {} rooms", rooms.len());

        let ticket = self.isolation.ticket();
        self.isolation.update(ticket, &self.index, backend, |view| {
            view.isolate(&rooms);
            view.highlight(&rooms, &style);
        });
        self.frame(ViewDirection::BirdsEye)
    }

    /// Isolate and highlight a single room and look at it from above
    ///
    /// Returns `None` without touching the renderer if no loaded model has
    /// the room.
    pub fn focus_room<B: RenderBackend + ?Sized>(
        &mut self,
        room: impl Into<ElementId>,
        backend: &mut B,
    ) -> Option<RoomFocus> {
        let room = room.into();
        let rooms = self.index.elements_in_category(&self.rooms_category);
        let Some(model) = rooms
            .to_sorted_vec()
            .into_iter()
            .find(|r| r.element == room)
            .map(|r| r.model)
        else {
            log::warn!("[Session] Room {} is not loaded", room);
            return None;
        };

        let element = ElementRef::new(model, room);
        let target: ElementSet = std::iter::once(element.clone()).collect();
        let style = self.styles.selection.clone();

        let ticket = self.isolation.ticket();
        self.isolation.update(ticket, &self.index, backend, |view| {
            view.isolate(&target);
            view.highlight(&target, &style);
        });

        let banner = RoomBanner {
            room,
            metadata: self.metadata.lookup(room).cloned(),
        };
        log::debug!("[Session] Focused room: {}", banner);

        Some(RoomFocus {
            element,
            pose: self.frame(ViewDirection::Up),
            banner,
        })
    }

    /// Back to the overview: all rooms visible, no highlight
    ///
    /// This is a reset; batches from tickets taken earlier are dropped.
    pub fn reset_view<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> CameraPose {
        let rooms = self.index.elements_in_category(&self.rooms_category);
        self.isolation.reset(&self.index, backend, |view| view.isolate(&rooms));
        log::debug!("[Session] View reset");
        self.frame(ViewDirection::BirdsEye)
    }

    // Camera

    /// Bounds of the visible models
    pub fn visible_bounds(&self) -> Aabb {
        self.index
            .model_ids()
            .iter()
            .filter(|model| self.isolation.is_model_visible(model))
            .filter_map(|model| self.model_bounds.get(model))
            .fold(Aabb::empty(), |acc, b| acc.union(b))
    }

    /// Camera pose for a preset direction over the visible models
    pub fn frame(&self, direction: ViewDirection) -> CameraPose {
        self.framing
            .frame(direction, &self.visible_bounds(), &self.scene_bounds)
    }
}
