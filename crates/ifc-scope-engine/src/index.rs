// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Category index over all loaded elements
//!
//! The index owns the element universe (every element the loader reported,
//! with its type tag) and a derived bucket per category. Buckets are a cache:
//! they can be rebuilt at any time from the universe and the rule set.
//!
//! Invariant: every element of the universe sits in exactly one bucket, the
//! one of the first matching rule, or the unclassified bucket.

use crate::classifier::{Classifier, UNCLASSIFIED};
use ifc_scope_model::{ElementId, ElementRef, ElementSet, ElementUniverse, ModelId};
use rustc_hash::{FxHashMap, FxHashSet};

/// Bucket slot: rule position, or `None` for unclassified
type Slot = Option<usize>;

#[derive(Clone, Debug)]
struct ElementEntry {
    type_tag: String,
    slot: Slot,
}

#[derive(Clone, Debug, Default)]
struct ModelEntry {
    ids: FxHashSet<ElementId>,
    entries: FxHashMap<ElementId, ElementEntry>,
}

/// Mapping category name -> elements, kept in sync with the loaded models
#[derive(Clone, Debug)]
pub struct CategoryIndex {
    classifier: Classifier,
    models: FxHashMap<ModelId, ModelEntry>,
    /// One bucket per rule, in rule order
    buckets: Vec<ElementSet>,
    unclassified: ElementSet,
}

impl CategoryIndex {
    /// Create an empty index
    pub fn new(classifier: Classifier) -> Self {
        let buckets = vec![ElementSet::new(); classifier.rules().len()];
        Self {
            classifier,
            models: FxHashMap::default(),
            buckets,
            unclassified: ElementSet::new(),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Replace the whole index with a new element collection
    ///
    /// A later build fully supersedes an earlier one.
    pub fn build(&mut self, elements: impl IntoIterator<Item = (ElementRef, String)>) {
        self.clear();
        for (element, type_tag) in elements {
            self.observe(element, type_tag);
        }
        log::debug!(
            "[Index] Built index: {} elements in {} models",
            self.len(),
            self.models.len()
        );
    }

    /// Add one element (or re-tag a known one)
    ///
    /// Returns the name of the category the element now belongs to.
    pub fn observe(&mut self, element: ElementRef, type_tag: impl Into<String>) -> &str {
        let type_tag = type_tag.into();
        let slot = self.slot_for(&type_tag);

        let model = self.models.entry(element.model.clone()).or_default();
        model.ids.insert(element.element);
        let previous = model
            .entries
            .insert(element.element, ElementEntry { type_tag, slot });

        match previous {
            Some(old) if old.slot == slot => {}
            Some(old) => {
                self.bucket_mut(old.slot).remove(&element);
                self.bucket_mut(slot).insert(element);
            }
            None => {
                self.bucket_mut(slot).insert(element);
            }
        }

        self.slot_name(slot)
    }

    /// Drop every element of a model
    ///
    /// Returns `false` if the model was not known.
    pub fn remove_model(&mut self, model: &ModelId) -> bool {
        if self.models.remove(model).is_none() {
            return false;
        }
        for bucket in &mut self.buckets {
            bucket.remove_model(model);
        }
        self.unclassified.remove_model(model);
        log::debug!("[Index] Removed model {}", model);
        true
    }

    /// Reclassify the current universe from scratch
    pub fn rebuild(&mut self) {
        let elements: Vec<(ElementRef, String)> = self
            .models
            .iter()
            .flat_map(|(model, entry)| {
                entry.entries.iter().map(move |(id, e)| {
                    (ElementRef::new(model.clone(), *id), e.type_tag.clone())
                })
            })
            .collect();
        self.build(elements);
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.models.clear();
        for bucket in &mut self.buckets {
            *bucket = ElementSet::new();
        }
        self.unclassified = ElementSet::new();
    }

    /// Elements classified under a category
    ///
    /// Unknown category names yield an empty set.
    pub fn elements_in_category(&self, name: &str) -> ElementSet {
        self.bucket(name).cloned().unwrap_or_default()
    }

    /// Borrowing variant of [`elements_in_category`](Self::elements_in_category)
    pub fn bucket(&self, name: &str) -> Option<&ElementSet> {
        if name == UNCLASSIFIED {
            return Some(&self.unclassified);
        }
        let position = self.classifier.rules().position(name)?;
        self.buckets.get(position)
    }

    /// Category an element is currently classified under
    pub fn category_of(&self, element: &ElementRef) -> Option<&str> {
        let entry = self.entry(element)?;
        Some(self.slot_name(entry.slot))
    }

    /// Type tag reported for an element
    pub fn type_tag_of(&self, element: &ElementRef) -> Option<&str> {
        self.entry(element).map(|e| e.type_tag.as_str())
    }

    /// Category names for listing: configured rules in order, then the
    /// unclassified bucket if it holds anything
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classifier.rules().names().collect();
        if !self.unclassified.is_empty() {
            names.push(UNCLASSIFIED);
        }
        names
    }

    /// Element count per listed category
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        self.categories()
            .into_iter()
            .map(|name| (name, self.bucket(name).map_or(0, ElementSet::len)))
            .collect()
    }

    /// Every known element
    pub fn all_elements(&self) -> ElementSet {
        let mut all = ElementSet::new();
        for (model, entry) in &self.models {
            all.insert_many(model, entry.ids.iter().copied());
        }
        all
    }

    /// Total element count
    pub fn len(&self) -> usize {
        self.models.values().map(|m| m.ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.models.values().all(|m| m.ids.is_empty())
    }

    fn entry(&self, element: &ElementRef) -> Option<&ElementEntry> {
        self.models
            .get(&element.model)?
            .entries
            .get(&element.element)
    }

    fn slot_for(&self, type_tag: &str) -> Slot {
        self.classifier
            .rules()
            .rules()
            .iter()
            .position(|rule| rule.matches(type_tag))
    }

    fn slot_name(&self, slot: Slot) -> &str {
        match slot {
            Some(position) => self.classifier.rules().rules()[position].name(),
            None => UNCLASSIFIED,
        }
    }

    fn bucket_mut(&mut self, slot: Slot) -> &mut ElementSet {
        match slot {
            Some(position) => &mut self.buckets[position],
            None => &mut self.unclassified,
        }
    }
}

impl ElementUniverse for CategoryIndex {
    fn model_ids(&self) -> Vec<ModelId> {
        let mut ids: Vec<ModelId> = self.models.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn model_elements(&self, model: &ModelId) -> Option<&FxHashSet<ElementId>> {
        self.models.get(model).map(|m| &m.ids)
    }
}
