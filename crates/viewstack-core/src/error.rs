//! # Errors
//!
//! Every failure the navigator can surface. Configuration errors are fatal
//! and never retried; construction errors leave the back-stack untouched.
//! Popping the root is not an error (`Navigator::pop` returns `false`).

use crate::controller::BoxError;
use crate::DestinationId;
use thiserror::Error;

/// Errors from graph building, factory resolution and navigation.
#[derive(Debug, Error)]
pub enum NavError {
    /// A destination was declared without a controller type name.
    #[error("destination {0} has no controller name")]
    MissingControllerName(DestinationId),

    /// No factory is registered under this name.
    #[error("no controller factory registered for `{name}`")]
    UnknownController { name: String },

    /// The id is not part of the graph.
    #[error("destination {0} is not in the graph")]
    UnknownDestination(DestinationId),

    /// The graph definition is structurally invalid.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// The graph document could not be parsed.
    #[error("graph format error: {0}")]
    GraphFormat(#[from] serde_json::Error),

    /// `start` was called on a navigator that already has entries.
    #[error("navigator already holds {depth} entries")]
    NotEmpty { depth: usize },

    /// The controller factory failed while instantiating.
    #[error("failed to construct `{name}` for destination {destination}: {source}")]
    Construction {
        destination: DestinationId,
        name: String,
        #[source]
        source: BoxError,
    },
}

impl NavError {
    /// Whether this is a configuration error (as opposed to a runtime
    /// construction failure).
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Construction { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================
