// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer configuration
//!
//! Category rules, room metadata, the floor directory, framing parameters
//! and highlight styles. [`ViewerConfig::builtin`] carries the data for the
//! faculty building (GuG) the viewer ships with; deployments can load their
//! own JSON file instead.

use crate::camera::FramingConfig;
use crate::classifier::{CategoryRuleConfig, CategoryRuleSet};
use crate::error::{Error, Result};
use crate::metadata::{FloorDirectory, FloorRooms, MetadataEntry, MetadataTable, RoomRef};
use ifc_scope_model::HighlightStyle;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highlight styles of the room flows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewStyles {
    /// Used when every room is shown
    pub room_overview: HighlightStyle,
    /// Used for a single focused room
    pub selection: HighlightStyle,
}

impl Default for ViewStyles {
    fn default() -> Self {
        Self {
            room_overview: HighlightStyle::room_overview(),
            selection: HighlightStyle::selection(),
        }
    }
}

/// Complete viewer configuration
///
/// Missing fields in a JSON file take the built-in values, except that a
/// file bringing its own `categories` describes another building: its
/// `metadata` and `floors` then default to empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ViewerConfigFile")]
pub struct ViewerConfig {
    /// Category rules in priority order
    pub categories: Vec<CategoryRuleConfig>,
    /// Category holding the rooms (spaces)
    pub rooms_category: String,
    pub metadata: MetadataTable,
    pub floors: FloorDirectory,
    pub framing: FramingConfig,
    pub styles: ViewStyles,
}

/// JSON form of [`ViewerConfig`] before defaults are filled in
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewerConfigFile {
    categories: Option<Vec<CategoryRuleConfig>>,
    rooms_category: Option<String>,
    metadata: Option<MetadataTable>,
    floors: Option<FloorDirectory>,
    #[serde(default)]
    framing: FramingConfig,
    #[serde(default)]
    styles: ViewStyles,
}

impl From<ViewerConfigFile> for ViewerConfig {
    fn from(file: ViewerConfigFile) -> Self {
        let builtin = ViewerConfig::builtin();
        let (categories, metadata, floors) = match file.categories {
            Some(categories) => (
                categories,
                file.metadata.unwrap_or_default(),
                file.floors.unwrap_or_default(),
            ),
            None => (
                builtin.categories,
                file.metadata.unwrap_or(builtin.metadata),
                file.floors.unwrap_or(builtin.floors),
            ),
        };

        Self {
            categories,
            rooms_category: file.rooms_category.unwrap_or(builtin.rooms_category),
            metadata,
            floors,
            framing: file.framing,
            styles: file.styles,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ViewerConfig {
    /// Built-in configuration for the GuG faculty building
    pub fn builtin() -> Self {
        Self {
            categories: builtin_categories(),
            rooms_category: "Räume".to_string(),
            metadata: builtin_metadata(),
            floors: builtin_floors(),
            framing: FramingConfig::default(),
            styles: ViewStyles::default(),
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "[Config] Loaded {} categories, {} metadata entries, {} floors",
            config.categories.len(),
            config.metadata.len(),
            config.floors.floors().len()
        );
        Ok(config)
    }

    /// Read and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("[Config] Reading {}", path.display());
        Self::from_json_str(&json)
    }

    /// Serialize as pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Compile the category rules
    pub fn rule_set(&self) -> Result<CategoryRuleSet> {
        CategoryRuleSet::new(self.categories.iter().cloned())
    }

    /// Check the whole configuration
    pub fn validate(&self) -> Result<()> {
        self.framing.validate()?;
        let rules = self.rule_set()?;
        if !rules.contains(&self.rooms_category) {
            return Err(Error::UnknownRoomsCategory(self.rooms_category.clone()));
        }
        for (id, entry) in self.metadata.iter_sorted() {
            if entry.name.trim().is_empty() {
                log::warn!("[Config] Metadata entry {} has an empty name", id);
            }
        }
        Ok(())
    }
}

fn builtin_categories() -> Vec<CategoryRuleConfig> {
    vec![
        CategoryRuleConfig::new("Wände", &["WALL"]).with_ifc_label("IfcWall"),
        CategoryRuleConfig::new("Türen", &["DOOR"]).with_ifc_label("IfcDoor"),
        CategoryRuleConfig::new("Fenster", &["WINDOW"]).with_ifc_label("IfcWindow"),
        CategoryRuleConfig::new("Räume", &["SPACE"]).with_ifc_label("IfcSpace"),
        CategoryRuleConfig::new("Bodenplatten", &["SLAB"])
            .with_display_name("Bodenplatten/Decken")
            .with_ifc_label("IfcSlab"),
        CategoryRuleConfig::new("Träger/Stützen", &["MEMBER|COLUMN|BEAM"])
            .with_display_name("Träger / Stützen")
            .with_ifc_label("IfcMember"),
        CategoryRuleConfig::new("Andere Bauteile", &["PROXY|ROOF|FURNISHING"])
            .with_display_name("Sonstige Bauteile")
            .with_ifc_label("IfcBuildingElement"),
    ]
}

fn builtin_metadata() -> MetadataTable {
    let room = |name: &str, room_type: &str, number: &str, floor: &str| {
        MetadataEntry::new(name, room_type, floor)
            .with_room_number(number)
            .with_note("...")
    };

    let mut table = MetadataTable::new();
    table.insert(28910, room("JORDAN-HÖRSAAL", "Lecture Hall", "002", "EG"));
    table.insert(35597, room("SKY-HÖRSAAL", "Lecture Hall", "048", "EG"));
    table.insert(43656, room("GIK Büro und Sekretariat", "Büro", "041", "EG"));
    table.insert(35609, room("HAID-HÖRSAAL", "Lecture Hall", "040", "EG"));
    table.insert(35621, room("PC-Pool", "Computer Pool", "039", "EG"));
    table.insert(
        43786,
        room(
            "GIK Büro und Besprechungsraum",
            "Büro und Besprechungsraum",
            "034",
            "EG",
        ),
    );
    table.insert(43834, room("IPF Besprechungsraum", "Besprechungsraum", "028", "EG"));
    table.insert(43910, room("FRITZ-HALLER-HÖRSAAL(HS37)", "Lecture Hall", "001", "EG"));
    table.insert(43789, room("Fakultätsbibliothek", "Bibliothek", "005", "EG"));
    table.insert(43498, room("Neuer-HÖRSAAL", "Lecture Hall", "003", "EG"));
    table.insert(43587, room("EGON-EIERMANN-HÖRSAAL(HS16)", "Lecture Hall", "101", "1OG"));
    table.insert(43603, room("HÖRSAAL 9", "Lecture Hall", "102", "1OG"));
    table.insert(43865, room("Zeichnensaal", "Lecture Hall", "204", "2OG"));
    table.insert(43851, room("Observatorium", "Observatorium", "301", "Dach"));
    table
}

fn builtin_floors() -> FloorDirectory {
    let floor = |label: &str, rooms: &[(u32, &str)]| FloorRooms {
        label: label.to_string(),
        rooms: rooms
            .iter()
            .map(|(id, name)| RoomRef::new(*id, *name))
            .collect(),
    };

    FloorDirectory::new(vec![
        floor("KL", &[]),
        floor(
            "EG",
            &[
                (28910, "Jordan-Hörsaal"),
                (35597, "Sky-Hörsaal"),
                (43656, "GIK Büro und Sekretariat"),
                (35609, "Haid-Hörsaal"),
                (35621, "PC-Pool"),
                (43786, "GIK Büro und Besprechungsraum"),
                (43834, "IPF Besprechungsraum"),
                (43910, "Fritz-Haller-Hörsaal(HS37)"),
                (43789, "Fakultätsbibliothek"),
                (43498, "Neuer-Hörsaal"),
            ],
        ),
        floor(
            "1OG",
            &[(43587, "Egon-Eiermann-Hörsaal(HS16)"), (43603, "Hörsaal 9")],
        ),
        floor("2OG", &[(43865, "Zeichnensaal")]),
        floor("Dach", &[(43851, "Observatorium")]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_scope_model::ElementId;

    #[test]
    fn test_builtin_is_valid() {
        let config = ViewerConfig::builtin();
        config.validate().unwrap();

        let rules = config.rule_set().unwrap();
        assert_eq!(
            rules.names().collect::<Vec<_>>(),
            [
                "Wände",
                "Türen",
                "Fenster",
                "Räume",
                "Bodenplatten",
                "Träger/Stützen",
                "Andere Bauteile"
            ]
        );
        assert_eq!(config.metadata.len(), 14);
        assert_eq!(
            config.floors.labels().collect::<Vec<_>>(),
            ["KL", "EG", "1OG", "2OG", "Dach"]
        );
        assert_eq!(config.floors.rooms_on("EG").len(), 10);
    }

    #[test]
    fn test_builtin_metadata() {
        let config = ViewerConfig::builtin();
        let entry = config.metadata.lookup(ElementId(43851)).unwrap();
        assert_eq!(entry.name, "Observatorium");
        assert_eq!(entry.room_number.as_deref(), Some("301"));
        assert_eq!(entry.floor, "Dach");
    }

    #[test]
    fn test_json_round_trip() {
        let config = ViewerConfig::builtin();
        let json = config.to_json_string().unwrap();
        let back = ViewerConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_builtin_defaults() {
        let config = ViewerConfig::from_json_str(r#"{"framing": {"multiplier": 2.0}}"#).unwrap();
        assert_eq!(config.framing.multiplier, 2.0);
        assert_eq!(config.framing.min_extent, 20.0);
        assert_eq!(config.rooms_category, "Räume");
        assert_eq!(config.metadata.len(), 14);
        assert_eq!(config.floors.floors().len(), 5);
    }

    #[test]
    fn test_custom_categories() {
        let json = r#"{
            "categories": [
                {"name": "Walls", "patterns": ["WALL"]},
                {"name": "Spaces", "patterns": ["SPACE"], "ifc_label": "IfcSpace"}
            ],
            "rooms_category": "Spaces"
        }"#;
        let config = ViewerConfig::from_json_str(json).unwrap();
        assert_eq!(config.rule_set().unwrap().len(), 2);
        // another building does not inherit the built-in room data
        assert!(config.metadata.is_empty());
        assert!(config.floors.is_empty());
    }

    #[test]
    fn test_custom_categories_keep_supplied_metadata() {
        let json = r#"{
            "categories": [{"name": "Spaces", "patterns": ["SPACE"]}],
            "rooms_category": "Spaces",
            "metadata": {"7": {"name": "Aula", "room_type": "Hall", "floor": "EG"}}
        }"#;
        let config = ViewerConfig::from_json_str(json).unwrap();
        assert_eq!(config.metadata.len(), 1);
        assert_eq!(config.metadata.lookup(ElementId(7)).unwrap().name, "Aula");
        assert!(config.metadata.lookup(ElementId(28910)).is_none());
    }

    #[test]
    fn test_unknown_rooms_category() {
        let json = r#"{
            "categories": [{"name": "Walls", "patterns": ["WALL"]}]
        }"#;
        let err = ViewerConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::UnknownRoomsCategory(ref name) if name == "Räume"));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{"colour": "red"}"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{"categories": [{"name": "X", "patterns": ["("]}]}"#),
            Err(Error::InvalidPattern { .. })
        ));
        assert!(matches!(
            ViewerConfig::from_path("/nonexistent/viewer.json"),
            Err(Error::Io(_))
        ));
    }
}
