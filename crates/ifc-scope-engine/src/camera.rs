// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera framing for preset view directions
//!
//! Computes where to put the camera so that a bounding box fits the view.
//! The host's camera controller animates to the returned pose.

use crate::error::{Error, Result};
use ifc_scope_model::{Aabb, CameraPose};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Preset view directions of the view menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewDirection {
    /// Looking down from above
    Up,
    /// Looking up from below
    Down,
    Front,
    Back,
    Left,
    Right,
    /// Diagonal view from above and in front
    BirdsEye,
}

impl ViewDirection {
    pub const ALL: [ViewDirection; 7] = [
        ViewDirection::Up,
        ViewDirection::Down,
        ViewDirection::Front,
        ViewDirection::Back,
        ViewDirection::Left,
        ViewDirection::Right,
        ViewDirection::BirdsEye,
    ];

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            ViewDirection::Up => "Oben",
            ViewDirection::Down => "Unten",
            ViewDirection::Front => "Vorne",
            ViewDirection::Back => "Hinten",
            ViewDirection::Left => "Links",
            ViewDirection::Right => "Rechts",
            ViewDirection::BirdsEye => "Vogelperspektive",
        }
    }

    /// Unit offset from target to eye
    fn axis(&self) -> Vector3<f64> {
        match self {
            ViewDirection::Up => Vector3::new(0.0, 1.0, 0.0),
            ViewDirection::Down => Vector3::new(0.0, -1.0, 0.0),
            ViewDirection::Front => Vector3::new(0.0, 0.0, 1.0),
            ViewDirection::Back => Vector3::new(0.0, 0.0, -1.0),
            ViewDirection::Left => Vector3::new(-1.0, 0.0, 0.0),
            ViewDirection::Right => Vector3::new(1.0, 0.0, 0.0),
            // not normalized: the eye sits at (0, d, d)
            ViewDirection::BirdsEye => Vector3::new(0.0, 1.0, 1.0),
        }
    }
}

impl fmt::Display for ViewDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let direction = match s.trim().to_lowercase().as_str() {
            "up" | "top" | "oben" => ViewDirection::Up,
            "down" | "bottom" | "unten" => ViewDirection::Down,
            "front" | "vorne" => ViewDirection::Front,
            "back" | "hinten" => ViewDirection::Back,
            "left" | "links" => ViewDirection::Left,
            "right" | "rechts" => ViewDirection::Right,
            "birds_eye" | "birdseye" | "birds-eye" | "vogelperspektive" => {
                ViewDirection::BirdsEye
            }
            _ => return Err(Error::UnknownDirection(s.to_string())),
        };
        Ok(direction)
    }
}

/// Framing parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FramingConfig {
    /// Distance factor applied to the largest box extent
    pub multiplier: f64,
    /// Lower bound for the extent used in the distance
    pub min_extent: f64,
    /// Distance factor for the bird's-eye view
    pub birds_eye_multiplier: f64,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            multiplier: 1.5,
            min_extent: 20.0,
            birds_eye_multiplier: 0.8,
        }
    }
}

impl FramingConfig {
    /// Check that every factor is finite and positive
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("multiplier", self.multiplier),
            ("min_extent", self.min_extent),
            ("birds_eye_multiplier", self.birds_eye_multiplier),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::framing(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Camera pose showing `bounds` from `direction`
    ///
    /// An empty `bounds` falls back to `fallback`; if that is empty as well
    /// the camera targets the origin.
    pub fn frame(&self, direction: ViewDirection, bounds: &Aabb, fallback: &Aabb) -> CameraPose {
        let target_box = if !bounds.is_empty() {
            bounds
        } else {
            fallback
        };

        let (center, extent) = if target_box.is_empty() {
            (Point3::origin(), 0.0)
        } else {
            (target_box.center(), target_box.max_extent())
        };

        let factor = match direction {
            ViewDirection::BirdsEye => self.birds_eye_multiplier,
            _ => self.multiplier,
        };
        let distance = extent.max(self.min_extent) * factor;

        CameraPose::new(center + direction.axis() * distance, center)
    }
}
