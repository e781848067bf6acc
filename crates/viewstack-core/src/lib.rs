//! # viewstack-core
//!
//! In-place view-stack navigation: a back-stack of mounted controllers kept
//! in sync with a single render surface.
//!
//! The crate is synchronous and single-threaded. The host owns the render
//! surface and the event loop; this crate owns the stack and decides what
//! the surface shows.
//!
//! ```text
//!   NavGraph ──(Destination)──► Navigator ──(clear/insert/play_effect)──► RenderSurface
//!       ▲                          │  ▲
//!       │ resolve(name)            │  └── complete_effect(ticket)  (host signal)
//!   FactoryRegistry                └──► NavigationObserver::on_navigated
//! ```

pub mod args;
pub mod config;
pub mod content;
pub mod controller;
pub mod destination;
pub mod error;
pub mod navigator;
pub mod registry;
pub mod surface;
pub mod transition;

pub use args::{ArgValue, Args};
pub use config::{Effect, NavOptions, NavigatorConfig, TransitionConfig};
pub use content::{ContentNode, MountId};
pub use controller::{
    BoxError, Controller, ControllerFactory, InflationContext, LifecycleState, Mount,
    RenderContext,
};
pub use destination::{Destination, DestinationDef, GraphDefinition, NavGraph};
pub use error::NavError;
pub use navigator::{NavigationObserver, Navigator, StackEntry};
pub use registry::{FactoryRegistry, RegistryStats};
pub use surface::{EffectTarget, MemorySurface, PlayedEffect, RenderSurface};
pub use transition::{Step, Transition, TransitionPhase, TransitionTicket};

use serde::{Deserialize, Serialize};

// =============================================================================
// PRIMITIVES
// =============================================================================

/// Identifier of a destination, unique within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DestinationId(pub u64);

impl std::fmt::Display for DestinationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a navigation notification was fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationReason {
    /// A new entry was pushed onto the back-stack.
    Added,
    /// The top entry was popped; the id is the new top.
    Popped,
}

impl std::fmt::Display for NavigationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => f.write_str("added"),
            Self::Popped => f.write_str("popped"),
        }
    }
}
