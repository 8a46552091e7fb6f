// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Category rules and type-tag classification
//!
//! A [`CategoryRuleSet`] is an ordered list of named rules, each holding one
//! or more case-insensitive patterns over element type tags. It is built once
//! and never edited afterwards. The [`Classifier`] resolves a type tag to the
//! first rule (in declaration order) with a matching pattern.

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the implicit bucket for tags no rule matches
pub const UNCLASSIFIED: &str = "unclassified";

/// Display name of the unclassified bucket
pub const UNCLASSIFIED_DISPLAY_NAME: &str = "Unbekannt";

/// IFC label used when a rule does not declare one
pub const DEFAULT_IFC_LABEL: &str = "IfcElement";

/// Declarative form of a category rule, as found in configuration files
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryRuleConfig {
    /// Unique category name
    pub name: String,
    /// Label shown in the UI (defaults to `name`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// IFC class label used for fallback element names (e.g. "IfcWall")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifc_label: Option<String>,
    /// Case-insensitive regular expressions over type tags
    pub patterns: Vec<String>,
}

impl CategoryRuleConfig {
    pub fn new(name: impl Into<String>, patterns: &[&str]) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            ifc_label: None,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_ifc_label(mut self, ifc_label: impl Into<String>) -> Self {
        self.ifc_label = Some(ifc_label.into());
        self
    }
}

/// Compiled category rule
#[derive(Clone, Debug)]
pub struct CategoryRule {
    name: String,
    display_name: String,
    ifc_label: String,
    patterns: Vec<Regex>,
}

impl CategoryRule {
    fn compile(config: CategoryRuleConfig) -> Result<Self> {
        let patterns = config
            .patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| Error::invalid_pattern(&config.name, pattern, e))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            display_name: config.display_name.unwrap_or_else(|| config.name.clone()),
            ifc_label: config
                .ifc_label
                .unwrap_or_else(|| DEFAULT_IFC_LABEL.to_string()),
            name: config.name,
            patterns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn ifc_label(&self) -> &str {
        &self.ifc_label
    }

    /// Check if any pattern matches the type tag
    pub fn matches(&self, type_tag: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(type_tag))
    }

    pub fn info(&self) -> CategoryInfo {
        CategoryInfo {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            ifc_label: self.ifc_label.clone(),
        }
    }
}

/// Resolved category, as handed to the UI layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    pub display_name: String,
    pub ifc_label: String,
}

impl CategoryInfo {
    /// Info for the unclassified bucket
    pub fn unclassified() -> Self {
        Self {
            name: UNCLASSIFIED.to_string(),
            display_name: UNCLASSIFIED_DISPLAY_NAME.to_string(),
            ifc_label: DEFAULT_IFC_LABEL.to_string(),
        }
    }

    pub fn is_unclassified(&self) -> bool {
        self.name == UNCLASSIFIED
    }
}

/// Ordered, immutable set of category rules
#[derive(Clone, Debug, Default)]
pub struct CategoryRuleSet {
    rules: Vec<CategoryRule>,
}

impl CategoryRuleSet {
    /// Compile a rule set
    ///
    /// Declaration order is priority order. Fails on invalid patterns, empty
    /// or duplicate names, and on the reserved unclassified name.
    pub fn new(configs: impl IntoIterator<Item = CategoryRuleConfig>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        let mut rules = Vec::new();

        for config in configs {
            if config.name.trim().is_empty() {
                return Err(Error::EmptyCategoryName);
            }
            if config.name == UNCLASSIFIED {
                return Err(Error::ReservedCategoryName(config.name));
            }
            if !seen.insert(config.name.clone()) {
                return Err(Error::DuplicateCategory(config.name));
            }
            rules.push(CategoryRule::compile(config)?);
        }

        Ok(Self { rules })
    }

    /// Rules in priority order
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Configured category names in priority order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name())
    }

    pub fn get(&self, name: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Position of a category in priority order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule matching the type tag
    pub fn first_match(&self, type_tag: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.matches(type_tag))
    }
}

/// Maps type tags to category names
///
/// Cheap to clone; clones share the same rule set.
#[derive(Clone, Debug)]
pub struct Classifier {
    rules: Arc<CategoryRuleSet>,
}

impl Classifier {
    pub fn new(rules: Arc<CategoryRuleSet>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CategoryRuleSet {
        &self.rules
    }

    /// Name of the first matching category, or [`UNCLASSIFIED`]
    pub fn classify(&self, type_tag: &str) -> &str {
        self.rules
            .first_match(type_tag)
            .map(|r| r.name())
            .unwrap_or(UNCLASSIFIED)
    }

    /// Full category info for a type tag
    pub fn category(&self, type_tag: &str) -> CategoryInfo {
        self.rules
            .first_match(type_tag)
            .map(CategoryRule::info)
            .unwrap_or_else(CategoryInfo::unclassified)
    }

    /// Category info by name (`None` for names that are not configured)
    pub fn info(&self, name: &str) -> Option<CategoryInfo> {
        if name == UNCLASSIFIED {
            return Some(CategoryInfo::unclassified());
        }
        self.rules.get(name).map(CategoryRule::info)
    }
}
