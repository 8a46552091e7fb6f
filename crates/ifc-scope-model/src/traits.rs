// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing traits
//!
//! These traits are the seams between the engine and the host application:
//! the engine reads the set of loaded elements through [`ElementUniverse`]
//! and pushes visibility and highlight changes through [`RenderBackend`].

use crate::{ElementId, ElementRef, HighlightStyle, ModelId};
use rustc_hash::FxHashSet;

/// Read-only view of every element currently known
///
/// The engine's category index implements this; hosts may provide their own
/// implementation when they track loaded elements elsewhere.
pub trait ElementUniverse {
    /// IDs of all loaded models, sorted
    fn model_ids(&self) -> Vec<ModelId>;

    /// Elements of a loaded model
    ///
    /// # Returns
    /// `None` if the model is not loaded
    fn model_elements(&self, model: &ModelId) -> Option<&FxHashSet<ElementId>>;

    /// Check if a model is loaded
    fn has_model(&self, model: &ModelId) -> bool {
        self.model_elements(model).is_some()
    }

    /// Check if an element reference is still valid
    fn contains(&self, element: &ElementRef) -> bool {
        self.model_elements(&element.model)
            .is_some_and(|ids| ids.contains(&element.element))
    }

    /// Total element count across all models
    fn element_count(&self) -> usize {
        self.model_ids()
            .iter()
            .filter_map(|m| self.model_elements(m))
            .map(|ids| ids.len())
            .sum()
    }
}

/// Outbound visibility and highlight mutations
///
/// Mutations are buffered by the renderer and become visible on the next
/// [`commit`](RenderBackend::commit). The engine issues exactly one commit
/// per logical user action. Element slices are always sorted.
pub trait RenderBackend {
    /// Show or hide a whole model container
    fn set_model_visible(&mut self, model: &ModelId, visible: bool);

    /// Show or hide individual elements inside a model
    fn set_elements_visible(&mut self, model: &ModelId, elements: &[ElementId], visible: bool);

    /// Apply a highlight style to elements of a model
    fn highlight(&mut self, model: &ModelId, elements: &[ElementId], style: &HighlightStyle);

    /// Remove every highlight from a model
    fn reset_highlight(&mut self, model: &ModelId);

    /// Flush buffered mutations to the screen
    fn commit(&mut self);
}
