// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Highlight styles applied on top of visibility

use serde::{Deserialize, Serialize};

/// Which faces of a highlighted element are rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderedFaces {
    /// Front faces only
    One,
    /// Front and back faces
    #[default]
    Two,
}

/// Visual overlay for highlighted elements
///
/// Deserialized styles are normalized like [`HighlightStyle::with_opacity`]:
/// opacity is clamped and `transparent` follows from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "HighlightStyleDef")]
pub struct HighlightStyle {
    /// RGB color
    pub color: [u8; 3],
    /// Opacity in 0.0..=1.0
    pub opacity: f32,
    /// Whether the material is rendered as transparent
    pub transparent: bool,
    pub rendered_faces: RenderedFaces,
}

impl HighlightStyle {
    /// Create an opaque style from a `0xRRGGBB` value
    pub fn from_hex(rgb: u32) -> Self {
        Self {
            color: [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8],
            opacity: 1.0,
            transparent: false,
            rendered_faces: RenderedFaces::Two,
        }
    }

    /// Set opacity (clamped), marks the style transparent below 1.0
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = self.opacity < 1.0;
        self
    }

    pub fn with_faces(mut self, faces: RenderedFaces) -> Self {
        self.rendered_faces = faces;
        self
    }

    /// Sky-blue translucent overlay used when every room is shown
    pub fn room_overview() -> Self {
        Self::from_hex(0x90CAF9).with_opacity(0.5)
    }

    /// Opaque gold used for a single focused element
    pub fn selection() -> Self {
        Self::from_hex(0xFFD700)
    }

    /// Color as `0xRRGGBB`
    pub fn hex(&self) -> u32 {
        ((self.color[0] as u32) << 16) | ((self.color[1] as u32) << 8) | self.color[2] as u32
    }

    /// RGBA color [r, g, b, a] where values are 0.0-1.0
    pub fn rgba(&self) -> [f32; 4] {
        [
            self.color[0] as f32 / 255.0,
            self.color[1] as f32 / 255.0,
            self.color[2] as f32 / 255.0,
            self.opacity,
        ]
    }
}

/// Wire form of [`HighlightStyle`]; a stored `transparent` flag is ignored
#[derive(Deserialize)]
struct HighlightStyleDef {
    color: [u8; 3],
    opacity: f32,
    #[serde(default)]
    rendered_faces: RenderedFaces,
}

impl From<HighlightStyleDef> for HighlightStyle {
    fn from(def: HighlightStyleDef) -> Self {
        Self {
            color: def.color,
            opacity: 1.0,
            transparent: false,
            rendered_faces: def.rendered_faces,
        }
        .with_opacity(def.opacity)
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::selection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let overview = HighlightStyle::room_overview();
        assert_eq!(overview.hex(), 0x90CAF9);
        assert_eq!(overview.opacity, 0.5);
        assert!(overview.transparent);
        assert_eq!(overview.rendered_faces, RenderedFaces::Two);

        let selection = HighlightStyle::selection();
        assert_eq!(selection.color, [255, 215, 0]);
        assert!(!selection.transparent);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let style = HighlightStyle::from_hex(0x000000).with_opacity(3.0);
        assert_eq!(style.opacity, 1.0);
        assert!(!style.transparent);
    }

    #[test]
    fn test_deserialize_normalizes_opacity() {
        let style: HighlightStyle =
            serde_json::from_str(r#"{"color":[0,0,0],"opacity":3.0,"transparent":true}"#)
                .unwrap();
        assert_eq!(style.opacity, 1.0);
        assert!(!style.transparent);

        let faded: HighlightStyle =
            serde_json::from_str(r#"{"color":[0,0,0],"opacity":0.25,"transparent":false}"#)
                .unwrap();
        assert!(faded.transparent);
        assert_eq!(faded.rendered_faces, RenderedFaces::Two);
    }

    #[test]
    fn test_json_round_trip_keeps_presets() {
        let overview = HighlightStyle::room_overview();
        let json = serde_json::to_string(&overview).unwrap();
        assert_eq!(serde_json::from_str::<HighlightStyle>(&json).unwrap(), overview);
    }

    #[test]
    fn test_rgba() {
        let rgba = HighlightStyle::from_hex(0xFF0000).rgba();
        assert_eq!(rgba, [1.0, 0.0, 0.0, 1.0]);
    }
}
