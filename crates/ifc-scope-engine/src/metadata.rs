// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curated room metadata and the floor directory

use ifc_scope_model::ElementId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Descriptive data for one element, usually a room
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataEntry {
    pub name: String,
    /// Usage type ("Lecture Hall", "Büro", ...)
    pub room_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    /// Floor label ("EG", "1OG", ...)
    pub floor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MetadataEntry {
    pub fn new(
        name: impl Into<String>,
        room_type: impl Into<String>,
        floor: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            room_type: room_type.into(),
            room_number: None,
            floor: floor.into(),
            note: None,
        }
    }

    pub fn with_room_number(mut self, number: impl Into<String>) -> Self {
        self.room_number = Some(number.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Static element ID -> metadata table
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataTable {
    entries: FxHashMap<ElementId, MetadataEntry>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry
    pub fn insert(&mut self, id: impl Into<ElementId>, entry: MetadataEntry) {
        self.entries.insert(id.into(), entry);
    }

    /// Metadata for an element, `None` when the table has no entry
    pub fn lookup(&self, id: ElementId) -> Option<&MetadataEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by element ID
    pub fn iter_sorted(&self) -> Vec<(ElementId, &MetadataEntry)> {
        let mut entries: Vec<(ElementId, &MetadataEntry)> =
            self.entries.iter().map(|(id, e)| (*id, e)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}

impl FromIterator<(ElementId, MetadataEntry)> for MetadataTable {
    fn from_iter<T: IntoIterator<Item = (ElementId, MetadataEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Display name for an element without metadata: `"<typeLabel> #<id>"`
pub fn fallback_label(type_label: &str, id: ElementId) -> String {
    format!("{} {}", type_label, id)
}

/// Room entry in the floor directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRef {
    pub id: ElementId,
    pub name: String,
}

impl RoomRef {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One floor and the rooms listed on it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorRooms {
    pub label: String,
    #[serde(default)]
    pub rooms: Vec<RoomRef>,
}

/// Ordered list of floors for the room navigation panel
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorDirectory {
    floors: Vec<FloorRooms>,
}

impl FloorDirectory {
    pub fn new(floors: Vec<FloorRooms>) -> Self {
        Self { floors }
    }

    /// Floors in display order
    pub fn floors(&self) -> &[FloorRooms] {
        &self.floors
    }

    /// Floor labels in display order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.floors.iter().map(|f| f.label.as_str())
    }

    /// Rooms on a floor (empty for unknown floors)
    pub fn rooms_on(&self, label: &str) -> &[RoomRef] {
        self.floors
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.rooms.as_slice())
            .unwrap_or(&[])
    }

    /// Floor a room is listed on
    pub fn floor_of(&self, id: ElementId) -> Option<&str> {
        self.floors
            .iter()
            .find(|f| f.rooms.iter().any(|r| r.id == id))
            .map(|f| f.label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }
}
