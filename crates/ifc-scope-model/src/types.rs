// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core identifier types for elements and models
//!
//! Identifiers are assigned by the upstream model loader and never change.
//! An element never moves between models.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe element identifier
///
/// Wraps the express ID the loader assigned to an element (e.g., #28910
/// becomes ElementId(28910)). Only unique within one model.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(id: u32) -> Self {
        ElementId(id)
    }
}

impl From<ElementId> for u32 {
    fn from(id: ElementId) -> Self {
        id.0
    }
}

impl From<ElementId> for u64 {
    fn from(id: ElementId) -> Self {
        id.0 as u64
    }
}

/// Identifier of a loaded model (the loader's model / fragment key)
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ModelId(pub String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        ModelId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        ModelId(id.to_string())
    }
}

impl From<String> for ModelId {
    fn from(id: String) -> Self {
        ModelId(id)
    }
}

/// Reference to one element of one loaded model
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct ElementRef {
    pub model: ModelId,
    pub element: ElementId,
}

impl ElementRef {
    /// Create a new element reference
    pub fn new(model: impl Into<ModelId>, element: impl Into<ElementId>) -> Self {
        Self {
            model: model.into(),
            element: element.into(),
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.model, self.element)
    }
}

/// Set of element references grouped by model
///
/// This is the shape of every category query result and every isolate or
/// highlight target. Models with no elements are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "FxHashMap<ModelId, FxHashSet<ElementId>>",
    into = "FxHashMap<ModelId, FxHashSet<ElementId>>"
)]
pub struct ElementSet {
    models: FxHashMap<ModelId, FxHashSet<ElementId>>,
}

impl ElementSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference, returns `true` if it was not present yet
    pub fn insert(&mut self, element: ElementRef) -> bool {
        self.models
            .entry(element.model)
            .or_default()
            .insert(element.element)
    }

    /// Add several elements of the same model
    pub fn insert_many(
        &mut self,
        model: &ModelId,
        elements: impl IntoIterator<Item = ElementId>,
    ) {
        let mut iter = elements.into_iter().peekable();
        if iter.peek().is_none() {
            return;
        }
        self.models.entry(model.clone()).or_default().extend(iter);
    }

    /// Remove a reference, returns `true` if it was present
    pub fn remove(&mut self, element: &ElementRef) -> bool {
        let Some(ids) = self.models.get_mut(&element.model) else {
            return false;
        };
        let removed = ids.remove(&element.element);
        if ids.is_empty() {
            self.models.remove(&element.model);
        }
        removed
    }

    /// Drop every element of a model, returns `true` if the model was present
    pub fn remove_model(&mut self, model: &ModelId) -> bool {
        self.models.remove(model).is_some()
    }

    pub fn contains(&self, model: &ModelId, element: ElementId) -> bool {
        self.models
            .get(model)
            .is_some_and(|ids| ids.contains(&element))
    }

    pub fn contains_ref(&self, element: &ElementRef) -> bool {
        self.contains(&element.model, element.element)
    }

    /// Elements of one model, if the model has any
    pub fn elements_of(&self, model: &ModelId) -> Option<&FxHashSet<ElementId>> {
        self.models.get(model)
    }

    /// Models with at least one element, in arbitrary order
    pub fn models(&self) -> impl Iterator<Item = &ModelId> {
        self.models.keys()
    }

    /// Total number of element references
    pub fn len(&self) -> usize {
        self.models.values().map(|ids| ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterate all references (arbitrary order)
    pub fn iter(&self) -> impl Iterator<Item = ElementRef> + '_ {
        self.models.iter().flat_map(|(model, ids)| {
            ids.iter().map(move |id| ElementRef {
                model: model.clone(),
                element: *id,
            })
        })
    }

    /// All references sorted by model then element
    pub fn to_sorted_vec(&self) -> Vec<ElementRef> {
        let mut refs: Vec<ElementRef> = self.iter().collect();
        refs.sort();
        refs
    }

    /// Merge another set into this one
    pub fn extend_from(&mut self, other: &ElementSet) {
        for (model, ids) in &other.models {
            self.insert_many(model, ids.iter().copied());
        }
    }

    /// Keep only models accepted by the predicate
    pub fn retain_models(&mut self, mut keep: impl FnMut(&ModelId) -> bool) {
        self.models.retain(|model, _| keep(model));
    }
}

impl From<FxHashMap<ModelId, FxHashSet<ElementId>>> for ElementSet {
    fn from(mut models: FxHashMap<ModelId, FxHashSet<ElementId>>) -> Self {
        models.retain(|_, ids| !ids.is_empty());
        Self { models }
    }
}

impl From<ElementSet> for FxHashMap<ModelId, FxHashSet<ElementId>> {
    fn from(set: ElementSet) -> Self {
        set.models
    }
}

impl FromIterator<ElementRef> for ElementSet {
    fn from_iter<T: IntoIterator<Item = ElementRef>>(iter: T) -> Self {
        let mut set = ElementSet::new();
        for element in iter {
            set.insert(element);
        }
        set
    }
}

impl Extend<ElementRef> for ElementSet {
    fn extend<T: IntoIterator<Item = ElementRef>>(&mut self, iter: T) {
        for element in iter {
            self.insert(element);
        }
    }
}
