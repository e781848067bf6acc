//! # Destinations and Graphs
//!
//! A graph document declares destinations by id and controller name:
//!
//! ```json
//! {
//!   "start": 1,
//!   "destinations": [
//!     { "id": 1, "label": "inbox", "name": ".Inbox" },
//!     { "id": 2, "label": "message", "name": "mail.Message" }
//!   ],
//!   "transitions": { "navigate": { "enter": { "name": "slide-in" }, "exit": { "name": "slide-out" } } }
//! }
//! ```
//!
//! Building a `NavGraph` resolves every controller name up front, so an
//! unknown or missing name fails when the graph is loaded rather than on
//! first navigation.

use crate::config::NavigatorConfig;
use crate::controller::{ControllerFactory, RenderContext};
use crate::error::NavError;
use crate::registry::FactoryRegistry;
use crate::DestinationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

// =============================================================================
// DEFINITIONS (serde)
// =============================================================================

/// One destination as written in a graph document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationDef {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Controller type name; required, but optional here so its absence is
    /// reported as a configuration error instead of a parse error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A whole graph document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    pub destinations: Vec<DestinationDef>,
    #[serde(default)]
    pub transitions: NavigatorConfig,
}

impl GraphDefinition {
    /// Parse a JSON graph document.
    pub fn from_json(text: &str) -> Result<Self, NavError> {
        Ok(serde_json::from_str(text)?)
    }
}

// =============================================================================
// DESTINATION
// =============================================================================

/// Immutable, resolved destination.
#[derive(Clone)]
pub struct Destination {
    id: DestinationId,
    label: Option<String>,
    name: String,
    factory: Rc<dyn ControllerFactory>,
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Destination")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("name", &self.name)
            .finish()
    }
}

impl Destination {
    /// Resolve a destination against a registry.
    pub fn resolve(
        id: DestinationId,
        name: &str,
        registry: &FactoryRegistry,
        context: &RenderContext,
    ) -> Result<Self, NavError> {
        let factory = registry.resolve(context, name)?;
        Ok(Self {
            id,
            label: None,
            name: context.qualify(name),
            factory,
        })
    }

    /// Build a destination from an already-resolved factory.
    pub fn with_factory(
        id: DestinationId,
        name: impl Into<String>,
        factory: impl ControllerFactory + 'static,
    ) -> Self {
        Self {
            id,
            label: None,
            name: name.into(),
            factory: Rc::new(factory),
        }
    }

    #[must_use]
    pub fn id(&self) -> DestinationId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Fully-qualified controller name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn factory(&self) -> &dyn ControllerFactory {
        self.factory.as_ref()
    }
}

// =============================================================================
// GRAPH
// =============================================================================

/// Resolved navigation graph.
#[derive(Debug, Clone)]
pub struct NavGraph {
    destinations: BTreeMap<DestinationId, Destination>,
    start: Option<DestinationId>,
    config: NavigatorConfig,
}

impl NavGraph {
    /// Resolve every destination of a definition.
    ///
    /// Fails on the first missing or unknown controller name, on duplicate
    /// ids, and on a start id that is not declared.
    pub fn build(
        definition: &GraphDefinition,
        registry: &FactoryRegistry,
        context: &RenderContext,
    ) -> Result<Self, NavError> {
        let mut destinations = BTreeMap::new();

        for def in &definition.destinations {
            let id = DestinationId(def.id);
            let name = def
                .name
                .as_deref()
                .filter(|n| !n.is_empty())
                .ok_or(NavError::MissingControllerName(id))?;

            let mut destination = Destination::resolve(id, name, registry, context)?;
            destination.label = def.label.clone();

            if destinations.insert(id, destination).is_some() {
                return Err(NavError::InvalidGraph(format!("duplicate destination {}", id)));
            }
        }

        let start = definition.start.map(DestinationId);
        if let Some(start) = start {
            if !destinations.contains_key(&start) {
                return Err(NavError::InvalidGraph(format!(
                    "start destination {} is not declared",
                    start
                )));
            }
        }

        tracing::debug!(
            destinations = destinations.len(),
            start = ?start,
            "navigation graph built"
        );

        Ok(Self {
            destinations,
            start,
            config: definition.transitions.clone(),
        })
    }

    /// Parse and resolve a JSON graph document in one step.
    pub fn from_json(
        text: &str,
        registry: &FactoryRegistry,
        context: &RenderContext,
    ) -> Result<Self, NavError> {
        Self::build(&GraphDefinition::from_json(text)?, registry, context)
    }

    /// Look up a destination.
    pub fn get(&self, id: DestinationId) -> Result<&Destination, NavError> {
        self.destinations
            .get(&id)
            .ok_or(NavError::UnknownDestination(id))
    }

    /// Find a destination by label.
    #[must_use]
    pub fn by_label(&self, label: &str) -> Option<&Destination> {
        self.destinations
            .values()
            .find(|d| d.label.as_deref() == Some(label))
    }

    #[must_use]
    pub fn start(&self) -> Option<DestinationId> {
        self.start
    }

    /// Transition defaults declared by the document.
    #[must_use]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Destinations in id order.
    pub fn destinations(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentNode;
    use crate::controller::{Controller, InflationContext};

    struct Blank;

    impl Controller for Blank {
        fn produce_content(&mut self, _ctx: &InflationContext<'_>) -> ContentNode {
            ContentNode::new("blank")
        }
    }

    fn registry() -> FactoryRegistry {
        let mut registry = FactoryRegistry::new();
        registry.register_fn("mail.Inbox", |_| Blank);
        registry.register_fn("mail.Message", |_| Blank);
        registry
    }

    const GRAPH: &str = r#"{
        "start": 1,
        "destinations": [
            { "id": 1, "label": "inbox", "name": ".Inbox" },
            { "id": 2, "label": "message", "name": "mail.Message" }
        ]
    }"#;

    #[test]
    fn builds_and_resolves_relative_names() {
        let graph = NavGraph::from_json(GRAPH, &registry(), &RenderContext::new("mail"));
        let graph = graph.expect("graph should build");
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.start(), Some(DestinationId(1)));
        assert_eq!(graph.get(DestinationId(1)).map(|d| d.name()).ok(), Some("mail.Inbox"));
        assert_eq!(graph.by_label("message").map(|d| d.id()), Some(DestinationId(2)));
    }

    #[test]
    fn missing_name_is_fatal() {
        let json = r#"{ "destinations": [ { "id": 5 } ] }"#;
        let err = NavGraph::from_json(json, &registry(), &RenderContext::default()).err();
        assert!(matches!(err, Some(NavError::MissingControllerName(DestinationId(5)))));
    }

    #[test]
    fn unknown_name_is_fatal() {
        let json = r#"{ "destinations": [ { "id": 1, "name": "mail.Drafts" } ] }"#;
        let err = NavGraph::from_json(json, &registry(), &RenderContext::default()).err();
        assert!(matches!(err, Some(NavError::UnknownController { .. })));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{ "destinations": [
            { "id": 1, "name": "mail.Inbox" },
            { "id": 1, "name": "mail.Message" }
        ] }"#;
        let err = NavGraph::from_json(json, &registry(), &RenderContext::default()).err();
        assert!(matches!(err, Some(NavError::InvalidGraph(_))));
    }

    #[test]
    fn undeclared_start_is_rejected() {
        let json = r#"{ "start": 9, "destinations": [ { "id": 1, "name": "mail.Inbox" } ] }"#;
        let err = NavGraph::from_json(json, &registry(), &RenderContext::default()).err();
        assert!(matches!(err, Some(NavError::InvalidGraph(_))));
    }

    #[test]
    fn malformed_json_is_a_format_error() {
        let err = NavGraph::from_json("{", &registry(), &RenderContext::default()).err();
        assert!(matches!(err, Some(NavError::GraphFormat(_))));
    }

    #[test]
    fn unknown_lookup_reports_id() {
        let graph = NavGraph::from_json(GRAPH, &registry(), &RenderContext::new("mail"));
        let err = graph.ok().and_then(|g| g.get(DestinationId(42)).err());
        assert!(matches!(err, Some(NavError::UnknownDestination(DestinationId(42)))));
    }
}
