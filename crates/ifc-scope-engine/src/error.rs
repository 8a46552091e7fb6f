// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for configuration loading
//!
//! Only building a rule set or loading a configuration can fail. Runtime
//! classification, index queries and visibility changes absorb bad input.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum Error {
    /// A category pattern is not a valid regular expression
    #[error("Invalid pattern {pattern:?} in category {category:?}: {source}")]
    InvalidPattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Two rules share the same category name
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    /// A rule has an empty name
    #[error("Category name must not be empty")]
    EmptyCategoryName,

    /// A rule uses the name reserved for unclassified elements
    #[error("Category name {0:?} is reserved")]
    ReservedCategoryName(String),

    /// The rooms category does not name a configured rule
    #[error("Rooms category {0:?} is not a configured category")]
    UnknownRoomsCategory(String),

    /// Framing parameters are out of range
    #[error("Invalid framing configuration: {0}")]
    InvalidFraming(String),

    /// A view direction name was not recognized
    #[error("Unknown view direction: {0:?}")]
    UnknownDirection(String),

    /// Malformed JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid pattern error
    pub fn invalid_pattern(
        category: impl Into<String>,
        pattern: impl Into<String>,
        source: regex::Error,
    ) -> Self {
        Error::InvalidPattern {
            category: category.into(),
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a framing error
    pub fn framing(msg: impl Into<String>) -> Self {
        Error::InvalidFraming(msg.into())
    }
}
